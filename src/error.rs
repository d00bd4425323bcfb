use serde::Serialize;

/// Main error type for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// I/O errors (terminal, env files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// An index-based edit pointed outside the compare list
    #[error("Index {index} is out of bounds for {len} compare field(s)")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The list length at the time of the call.
        len: usize,
    },

    /// The last remaining compare field cannot be removed
    #[error("At least one compare field must remain")]
    LastCompareField,

    /// A submission is already in flight
    #[error("A comparison is already being submitted")]
    SubmissionInProgress,

    /// A submission handed back to a form that did not start it
    #[error("Submission {0} was not started by this form")]
    UnknownSubmission(uuid::Uuid),

    /// Network-level failure (connect, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx status returned by the service
    #[error("Server returned {status}: {body}")]
    Server {
        /// The HTTP status code.
        status: u16,
        /// The response body, possibly empty.
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Standard error report format, used for machine-readable CLI output
#[derive(Serialize)]
#[derive(Debug)]
pub struct ErrorResponse {
    /// Short error kind
    pub kind: &'static str,
    /// Error message
    pub message: String,
    /// HTTP status when the service answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl AppError {
    /// True for the outcomes of a settled request: transport, server and
    /// malformed-response failures.
    pub fn is_submission_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Server { .. } | Self::MalformedResponse(_)
        )
    }

    /// Short machine-friendly name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::IndexOutOfBounds { .. } => "index_out_of_bounds",
            Self::LastCompareField => "last_compare_field",
            Self::SubmissionInProgress => "submission_in_progress",
            Self::UnknownSubmission(_) => "unknown_submission",
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Convert the error to a JSON-serializable report
    pub fn to_json(&self) -> ErrorResponse {
        let status = match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        };

        ErrorResponse {
            kind: self.kind(),
            message: self.to_string(),
            status,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AppError::Server {
                status: status.as_u16(),
                body: String::new(),
            }
        } else if err.is_decode() {
            AppError::MalformedResponse(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
