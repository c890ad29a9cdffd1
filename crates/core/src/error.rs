/// Errors raised while talking to the registration backend.
///
/// Validation failures never reach this type: they are resolved locally and reported as
/// [`crate::AttemptOutcome::Invalid`]. A creation-time conflict is not an error either; it
/// is reported as [`crate::SubmissionOutcome::AlreadyExists`].
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A 2xx body that could not be decoded.
    #[error("malformed response at {path}: {reason}")]
    MalformedResponse { path: String, reason: String },

    /// A 2xx body whose `status` is neither success nor an existing-patient conflict.
    #[error("{message}")]
    UnexpectedStatus {
        status: Option<String>,
        message: String,
    },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RegistrationError {
    /// HTTP status reported by the server, when the error came from a response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RegistrationError::Http { status, .. } => Some(*status),
            RegistrationError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("API URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("invalid duplicate payload {0:?} (expected 'full' or 'key')")]
    InvalidDuplicatePayload(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
