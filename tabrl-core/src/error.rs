//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Fallible operations return [`anyhow::Result`]; the variants below are wrapped in
/// the [`anyhow::Error`] and can be recovered with `downcast_ref::<TabrlError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TabrlError {
    /// A parameter or configuration value is invalid.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The algorithm name is not registered.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The environment name is not registered.
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// No session with the given id.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The session cannot accept the requested operation in its current status.
    #[error("Session {id} is {status}, expected {expected}")]
    InvalidSessionState {
        /// Session id.
        id: String,
        /// Current status.
        status: String,
        /// Status required by the operation.
        expected: String,
    },

    /// Failure raised by an environment.
    #[error("Environment error: {0}")]
    Environment(String),

    /// A frame could not be encoded.
    #[error("Frame encoding error: {0}")]
    FrameEncoding(String),

    /// Training or a replay panicked.
    #[error("Panicked: {0}")]
    Panic(String),
}

impl TabrlError {
    /// Returns `true` for errors caused by a bad request, i.e. invalid parameters
    /// or unknown algorithm/environment names.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnknownAlgorithm(_) | Self::UnknownEnvironment(_)
        )
    }

    /// Returns `true` if the error refers to a session that does not exist.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}

/// Returns the [`TabrlError`] wrapped in `err`, if any.
pub fn tabrl_error(err: &anyhow::Error) -> Option<&TabrlError> {
    err.downcast_ref::<TabrlError>()
}
