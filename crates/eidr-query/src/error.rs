//! Error taxonomy shared by the compiler, the dispatcher and the connector.

use serde::Serialize;

/// Registry status codes that mean the caller is not allowed to see the record.
const ACCESS_DENIED_CODES: [&str; 2] = ["4", "5"];

/// Coarse classification of an [`EidrError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidInput,
    Unauthorized,
    UnsupportedOperation,
    TransportError,
    RegistryError,
    UnrecognizedResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalidInput",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::UnsupportedOperation => "unsupportedOperation",
            ErrorKind::TransportError => "transportError",
            ErrorKind::RegistryError => "registryError",
            ErrorKind::UnrecognizedResponse => "unrecognizedResponse",
        }
    }
}

/// Every failure surfaced by this workspace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EidrError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Transport failed with status {status}: {message}")]
    Transport { status: u16, message: String },
    #[error("Registry returned status {code}: {message}")]
    Registry { code: String, message: String },
    #[error("Unrecognized response: {0}")]
    UnrecognizedResponse(String),
}

pub type Result<T> = std::result::Result<T, EidrError>;

impl EidrError {
    pub fn invalid(detail: impl Into<String>) -> Self {
        EidrError::InvalidInput(detail.into())
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        EidrError::Unsupported(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EidrError::InvalidInput(_) => ErrorKind::InvalidInput,
            EidrError::Unauthorized(_) => ErrorKind::Unauthorized,
            EidrError::Unsupported(_) => ErrorKind::UnsupportedOperation,
            EidrError::Transport { .. } => ErrorKind::TransportError,
            EidrError::Registry { .. } => ErrorKind::RegistryError,
            EidrError::UnrecognizedResponse(_) => ErrorKind::UnrecognizedResponse,
        }
    }

    /// Registry codes 4 and 5 are authentication/authorization refusals.
    pub fn is_access_denied(&self) -> bool {
        match self {
            EidrError::Registry { code, .. } => ACCESS_DENIED_CODES.contains(&code.as_str()),
            _ => false,
        }
    }

    /// Stable, HTTP-flavoured status code for this failure.
    ///
    /// Transport failures carry the transport's own status verbatim.
    pub fn status_code(&self) -> u16 {
        match self {
            EidrError::InvalidInput(_) => 400,
            EidrError::Unauthorized(_) => 401,
            EidrError::Unsupported(_) => 501,
            EidrError::Transport { status, .. } => *status,
            EidrError::Registry { .. } if self.is_access_denied() => 403,
            EidrError::Registry { .. } => 502,
            EidrError::UnrecognizedResponse(_) => 502,
        }
    }

    /// Human-readable detail without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            EidrError::InvalidInput(d)
            | EidrError::Unauthorized(d)
            | EidrError::Unsupported(d)
            | EidrError::UnrecognizedResponse(d) => d.clone(),
            EidrError::Transport { message, .. } => message.clone(),
            EidrError::Registry { code, message } => format!("[{code}] {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_access_denied_codes() {
        for code in ["4", "5"] {
            let err = EidrError::Registry {
                code: code.to_string(),
                message: "denied".to_string(),
            };
            assert!(err.is_access_denied());
            assert_eq!(err.status_code(), 403);
            assert_eq!(err.kind(), ErrorKind::RegistryError);
        }

        let err = EidrError::Registry {
            code: "3".to_string(),
            message: "not found".to_string(),
        };
        assert!(!err.is_access_denied());
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_transport_status_is_verbatim() {
        let err = EidrError::Transport {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert_eq!(err.detail(), "Service Unavailable");
    }

    #[test]
    fn test_display_includes_detail() {
        let err = EidrError::invalid("bad id: 10.5240/XYZ");
        assert_eq!(err.to_string(), "Invalid input: bad id: 10.5240/XYZ");
        assert_eq!(err.status_code(), 400);
        assert!(!err.is_access_denied());
    }
}
