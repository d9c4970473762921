use thiserror::Error;

pub type Result<T> = std::result::Result<T, FacebookError>;

#[derive(Debug, Error)]
pub enum FacebookError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        error_type: Option<String>,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{operation} requires an access token")]
    MissingCredentials { operation: String },

    #[error("Insufficient permission: \"{scope}\" has not been granted")]
    InsufficientPermission { scope: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification callers branch on: retry/report, re-authenticate,
/// or request an additional grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    MissingCredentials,
    InsufficientPermission,
    InvalidRequest,
}

impl FacebookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FacebookError::Network(_) | FacebookError::Api { .. } | FacebookError::Parse(_) => {
                ErrorKind::Transport
            }
            FacebookError::MissingCredentials { .. } => ErrorKind::MissingCredentials,
            FacebookError::InsufficientPermission { .. } => ErrorKind::InsufficientPermission,
            FacebookError::InvalidArgument(_) | FacebookError::Config(_) => {
                ErrorKind::InvalidRequest
            }
        }
    }

    pub fn is_missing_credentials(&self) -> bool {
        self.kind() == ErrorKind::MissingCredentials
    }

    pub fn is_insufficient_permission(&self) -> bool {
        self.kind() == ErrorKind::InsufficientPermission
    }
}

impl From<reqwest::Error> for FacebookError {
    fn from(err: reqwest::Error) -> Self {
        FacebookError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FacebookError {
    fn from(err: serde_json::Error) -> Self {
        FacebookError::Parse(err.to_string())
    }
}
