//! Error types for the file sender
//!
//! Every variant maps to a stable string code that scripted commands
//! print in their JSON failure object.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No API credentials configured. Run 'tgsend config --api-id ID --api-hash HASH' first.")]
    NoCredentials,

    #[error("Not authenticated. Run 'tgsend auth' first.")]
    NotAuthorized,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Specify recipient with --to (name) or --to-id (Telegram ID)")]
    NoRecipient,

    #[error("Could not find entity with ID {id}: {reason}")]
    EntityNotFound { id: i64, reason: String },

    #[error("No contact found matching '{0}'")]
    ContactNotFound(String),

    #[error("No good match found for '{query}'. Best match: '{best}' (score: {score})")]
    LowMatchScore {
        query: String,
        best: String,
        score: u8,
    },

    #[error("{0}")]
    SendCodeFailed(String),

    #[error("Invalid code")]
    InvalidCode,

    #[error("{0}")]
    PasswordFailed(String),

    #[error("{0}")]
    SignInFailed(String),

    #[error("Session is locked by another tgsend process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Interrupted")]
    Interrupted,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable code surfaced as the `error` field of a scripted failure.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NoCredentials => "no_credentials",
            Error::NotAuthorized => "not_authorized",
            Error::FileNotFound(_) => "file_not_found",
            Error::NotAFile(_) => "not_a_file",
            Error::NoRecipient => "no_recipient",
            Error::EntityNotFound { .. } => "entity_not_found",
            Error::ContactNotFound(_) => "contact_not_found",
            Error::LowMatchScore { .. } => "low_match_score",
            Error::SendCodeFailed(_) => "send_code_failed",
            Error::InvalidCode => "invalid_code",
            Error::PasswordFailed(_) => "password_failed",
            Error::SignInFailed(_) => "sign_in_failed",
            Error::SessionLocked => "session_locked",
            Error::LockError(_)
            | Error::TelegramError(_)
            | Error::Interrupted
            | Error::InvalidArgument(_)
            | Error::IoError(_)
            | Error::SerializationError(_) => "error",
        }
    }
}

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::TelegramError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}
