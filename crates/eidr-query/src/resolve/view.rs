//! Identifier namespaces, view names and the resolution table joining them.

use crate::error::{EidrError, Result};
use crate::id;
use std::fmt;
use std::str::FromStr;

/// Which registry an identifier belongs to, derived from its DOI prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `10.5240`: audiovisual content records.
    Content,
    /// `10.5237`: parties (studios, distributors, registrants).
    Party,
    /// `10.5239`: services (channels, platforms).
    Service,
}

impl Namespace {
    /// Validate `identifier` and classify it.
    pub fn of(identifier: &str) -> Result<Self> {
        if !id::validate(identifier) {
            return Err(EidrError::invalid(format!(
                "invalid EIDR identifier '{identifier}'"
            )));
        }
        match id::prefix(identifier) {
            "10.5240" => Ok(Namespace::Content),
            "10.5237" => Ok(Namespace::Party),
            "10.5239" => Ok(Namespace::Service),
            other => Err(EidrError::unsupported(format!(
                "unsupported identifier type '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Content => "content",
            Namespace::Party => "party",
            Namespace::Service => "service",
        }
    }

    /// Path prefix of the resolve endpoint, before the encoded identifier.
    pub(crate) fn resolve_path(&self) -> &'static str {
        match self {
            Namespace::Content => "/EIDR/object/",
            Namespace::Party => "/EIDR/party/resolve/",
            Namespace::Service => "/EIDR/service/resolve/",
        }
    }

    /// The views this namespace can be resolved to.
    pub fn views(&self) -> &'static [View] {
        match self {
            Namespace::Content => &View::ALL,
            Namespace::Party | Namespace::Service => &[View::Full, View::DoiKernel],
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named extraction profile for a resolved record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Full,
    SelfDefined,
    Simple,
    Provenance,
    DoiKernel,
    AlternateIds,
    LinkedAlternateIds,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Full,
        View::SelfDefined,
        View::Simple,
        View::Provenance,
        View::DoiKernel,
        View::AlternateIds,
        View::LinkedAlternateIds,
    ];

    /// Wire name, used both in the `type` query parameter and by callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Full => "Full",
            View::SelfDefined => "SelfDefined",
            View::Simple => "Simple",
            View::Provenance => "Provenance",
            View::DoiKernel => "DOIKernel",
            View::AlternateIds => "AlternateIDs",
            View::LinkedAlternateIds => "LinkedAlternateIDs",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = EidrError;

    fn from_str(s: &str) -> Result<Self> {
        View::ALL
            .iter()
            .copied()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| EidrError::unsupported(format!("unsupported resolution type '{s}'")))
    }
}

/// How the payload of a resolve response is reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Merge `BaseObjectData` (required) with the optional `ExtraObjectMetadata`.
    Merged { attribute: &'static str },
    /// `{ ID, <property>: [...] }`, the property defaulting to an empty list.
    IdList {
        attribute: &'static str,
        property: &'static str,
    },
    /// The attribute's fields with the attribute marker removed.
    Stripped { attribute: &'static str },
}

impl Extraction {
    pub fn attribute(&self) -> &'static str {
        match self {
            Extraction::Merged { attribute }
            | Extraction::IdList { attribute, .. }
            | Extraction::Stripped { attribute } => attribute,
        }
    }
}

/// The resolution table: `None` when the namespace has no such view.
pub fn extraction_for(namespace: Namespace, view: View) -> Option<Extraction> {
    use Extraction::{IdList, Merged, Stripped};

    let extraction = match (namespace, view) {
        (Namespace::Content, View::Full) => Merged {
            attribute: "FullMetadata",
        },
        (Namespace::Content, View::SelfDefined) => Merged {
            attribute: "SelfDefinedMetadata",
        },
        (Namespace::Content, View::Simple) => Stripped {
            attribute: "SimpleMetadata",
        },
        (Namespace::Content, View::Provenance) => Stripped {
            attribute: "ProvenanceMetadata",
        },
        (Namespace::Content, View::AlternateIds) => IdList {
            attribute: "AlternateIDs",
            property: "AlternateID",
        },
        (Namespace::Content, View::LinkedAlternateIds) => IdList {
            attribute: "LinkedAlternateIDs",
            property: "LinkedAlternateID",
        },
        (_, View::DoiKernel) => Stripped {
            attribute: "kernelMetadata",
        },
        (Namespace::Party, View::Full) => Stripped { attribute: "Party" },
        (Namespace::Service, View::Full) => Stripped {
            attribute: "Service",
        },
        (Namespace::Party | Namespace::Service, _) => return None,
    };
    Some(extraction)
}
