use std::fmt;
use thiserror::Error;

/// External collaborator a failed call was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Sheets,
    Tracker,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Service::Sheets => "spreadsheet store",
            Service::Tracker => "issue tracker",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error("missing required configuration: {}", .0.join(", "))]
    ConfigurationMissing(Vec<&'static str>),

    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfiguration { key: &'static str, reason: String },

    #[error("{service} call failed: {message}")]
    Upstream { service: Service, message: String },

    #[error("{service} returned HTTP {status}: {body}")]
    UpstreamStatus {
        service: Service,
        status: u16,
        body: String,
    },

    #[error("malformed row {row}, column {column}: {reason}")]
    MalformedRow {
        row: u32,
        column: char,
        reason: String,
    },
}

impl BridgeError {
    pub fn upstream(service: Service, message: impl Into<String>) -> Self {
        BridgeError::Upstream {
            service,
            message: message.into(),
        }
    }

    /// True for failures raised before any external call was attempted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BridgeError::ConfigurationMissing(_) | BridgeError::InvalidConfiguration { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
