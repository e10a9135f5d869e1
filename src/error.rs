use buddy::BuddyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Buddy(#[from] BuddyError),

    /// Login, Google login or register was refused; carries the store's message.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A listing fetch failed; carries the list's error marker.
    #[error("failed to load {what}: {message}")]
    Load { what: &'static str, message: String },

    #[error("invalid arguments: {0}")]
    Usage(String),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("interrupted")]
    Interrupted,
}
