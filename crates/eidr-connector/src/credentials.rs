//! Registry credentials and the headers derived from them.
//!
//! The registry authenticates with `Eidr <user>:<party>:<shadow>`, where the
//! shadow is the base64-encoded MD5 digest of the account password. The
//! shadow is supplied ready-made; the password itself never reaches this
//! crate.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_shadow: Option<String>,
}

impl Credentials {
    pub fn new(
        user_id: impl Into<String>,
        party_id: impl Into<String>,
        password_shadow: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            party_id: Some(party_id.into()),
            password_shadow: Some(password_shadow.into()),
        }
    }

    /// Anonymous credentials: enough to resolve, not to query.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when a user, party and password shadow are all present.
    pub fn is_authenticated(&self) -> bool {
        self.parts().is_some()
    }

    /// Value of the `Authorization` header, if authenticated.
    pub fn authorization(&self) -> Option<String> {
        self.parts()
            .map(|(user, party, shadow)| format!("Eidr {user}:{party}:{shadow}"))
    }

    fn parts(&self) -> Option<(&str, &str, &str)> {
        Some((
            present(&self.user_id)?,
            present(&self.party_id)?,
            present(&self.password_shadow)?,
        ))
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

// Keep the shadow out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("party_id", &self.party_id)
            .field(
                "password_shadow",
                &self.password_shadow.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
