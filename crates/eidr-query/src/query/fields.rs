//! Named query elements and the field paths they expand to.

use crate::expression::Tree;
use std::fmt;
use std::str::FromStr;

/// A named field that text and existence predicates can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Title,
    Name,
    AltTitle,
    Actor,
    Director,
    Contributor,
    AssociatedOrg,
    Aoid,
    RefType,
    StructuralType,
    Mode,
    Language,
    Country,
    Description,
    Registrant,
    Status,
    DistributionNumber,
    HouseSequence,
}

/// (tree, path relative to the tree root)
type FieldPath = (Tree, &'static str);

impl Element {
    pub const ALL: [Element; 18] = [
        Element::Title,
        Element::Name,
        Element::AltTitle,
        Element::Actor,
        Element::Director,
        Element::Contributor,
        Element::AssociatedOrg,
        Element::Aoid,
        Element::RefType,
        Element::StructuralType,
        Element::Mode,
        Element::Language,
        Element::Country,
        Element::Description,
        Element::Registrant,
        Element::Status,
        Element::DistributionNumber,
        Element::HouseSequence,
    ];

    /// Key used for this element in a JSON query object.
    pub fn key(&self) -> &'static str {
        match self {
            Element::Title => "title",
            Element::Name => "name",
            Element::AltTitle => "alttitle",
            Element::Actor => "actor",
            Element::Director => "director",
            Element::Contributor => "contributor",
            Element::AssociatedOrg => "associatedorg",
            Element::Aoid => "aoid",
            Element::RefType => "reftype",
            Element::StructuralType => "structuraltype",
            Element::Mode => "mode",
            Element::Language => "language",
            Element::Country => "country",
            Element::Description => "description",
            Element::Registrant => "registrant",
            Element::Status => "status",
            Element::DistributionNumber => "distributionnumber",
            Element::HouseSequence => "housesequence",
        }
    }

    fn relative_paths(&self) -> &'static [FieldPath] {
        use Tree::{Base, Extra};
        match self {
            Element::Title => &[(Base, "ResourceName"), (Base, "AlternateResourceName")],
            Element::Name => &[(Base, "ResourceName")],
            Element::AltTitle => &[(Base, "AlternateResourceName")],
            Element::Actor => &[(Base, "Credits/Actor/DisplayName")],
            Element::Director => &[(Base, "Credits/Director/DisplayName")],
            Element::Contributor => &[
                (Base, "Credits/Actor/DisplayName"),
                (Base, "Credits/Director/DisplayName"),
            ],
            Element::AssociatedOrg => &[
                (Base, "AssociatedOrg/DisplayName"),
                (Base, "AssociatedOrg/AlternateName"),
            ],
            Element::Aoid => &[(Base, "AlternateID")],
            Element::RefType => &[(Base, "ReferentType")],
            Element::StructuralType => &[(Base, "StructuralType")],
            Element::Mode => &[(Base, "Mode")],
            Element::Language => &[(Base, "OriginalLanguage"), (Base, "VersionLanguage")],
            Element::Country => &[(Base, "CountryOfOrigin")],
            Element::Description => &[(Base, "Description")],
            Element::Registrant => &[(Base, "Administrators/Registrant")],
            Element::Status => &[(Base, "Status")],
            Element::DistributionNumber => &[
                (Extra, "EpisodeInfo/SequenceInfo/DistributionNumber"),
                (Extra, "SeasonInfo/SequenceInfo/DistributionNumber"),
            ],
            Element::HouseSequence => &[
                (Extra, "EpisodeInfo/SequenceInfo/HouseSequence"),
                (Extra, "SeasonInfo/SequenceInfo/HouseSequence"),
            ],
        }
    }

    /// Absolute field paths this element expands to, in table order.
    pub fn paths(&self) -> Vec<String> {
        self.relative_paths()
            .iter()
            .map(|(tree, relative)| tree.path(relative))
            .collect()
    }

    /// The single path of this element, if it has exactly one.
    pub fn single_path(&self) -> Option<String> {
        match self.relative_paths() {
            [(tree, relative)] => Some(tree.path(relative)),
            _ => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Element {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::ALL
            .iter()
            .copied()
            .find(|element| element.key() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for element in Element::ALL {
            assert_eq!(element.key().parse::<Element>(), Ok(element));
        }
        assert!("unknown".parse::<Element>().is_err());
        assert!("Title".parse::<Element>().is_err());
    }

    #[test]
    fn test_title_paths() {
        assert_eq!(
            Element::Title.paths(),
            vec![
                "/FullMetadata/BaseObjectData/ResourceName".to_string(),
                "/FullMetadata/BaseObjectData/AlternateResourceName".to_string(),
            ]
        );
        assert_eq!(Element::Title.single_path(), None);
        assert_eq!(
            Element::RefType.single_path().as_deref(),
            Some("/FullMetadata/BaseObjectData/ReferentType")
        );
    }

    #[test]
    fn test_every_element_has_paths() {
        for element in Element::ALL {
            assert!(!element.paths().is_empty(), "{element} has no paths");
        }
    }

    // An older copy of this table spelled the org path `Associatedorg`, which
    // the registry never matches.
    #[test]
    fn test_associated_org_casing_is_canonical() {
        for element in Element::ALL {
            for path in element.paths() {
                assert!(!path.contains("Associatedorg"), "{path}");
            }
        }
        assert!(Element::AssociatedOrg
            .paths()
            .iter()
            .all(|p| p.contains("/AssociatedOrg/")));
    }
}
