//! Training sessions.
use chrono::{DateTime, Local};
use serde::Serialize;
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use tabrl_core::params::Parameters;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Lifecycle of a session.
///
/// ```text
/// Created -> Training -> Complete
///                     -> Error
/// ```
///
/// `Complete` and `Error` are final.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SessionStatus {
    /// Created and not trained yet.
    Created,

    /// A training run is in progress.
    Training,

    /// Training finished normally.
    Complete,

    /// Training failed with the given message.
    Error(String),
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Training => write!(f, "training"),
            Self::Complete => write!(f, "complete"),
            Self::Error(_) => write!(f, "error"),
        }
    }
}

/// Snapshot of a session.
#[derive(Clone, Debug, Serialize)]
pub struct SessionInfo {
    /// Session id.
    pub id: String,

    /// Name of the algorithm.
    pub algorithm: String,

    /// Name of the environment.
    pub environment: String,

    /// Parameters resolved against the schema of the algorithm.
    pub parameters: Parameters,

    /// Seed given at creation.
    pub seed: Option<u64>,

    /// Current status.
    pub status: SessionStatus,

    /// Time of creation.
    pub created_at: DateTime<Local>,
}

/// Returns a new session id, 32 lowercase hex digits.
///
/// The first half is a process-wide counter, so ids never repeat within a process.
pub(crate) fn new_session_id() -> String {
    let n = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:016x}{:016x}", n, fastrand::u64(..))
}
