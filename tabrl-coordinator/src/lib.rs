//! Training sessions for tabrl.
//!
//! [`TrainingCoordinator`] stores sessions, each binding an algorithm to an
//! environment, and dispatches training and policy replay to them.
//! [`TrainingStream`] runs the training of a session on a worker thread and
//! turns its progress into Server-Sent Events chunks, see [`SseChunk`].
//!
//! ```no_run
//! # use anyhow::Result;
//! # use std::sync::Arc;
//! # use tabrl_core::params::Parameters;
//! # use tabrl_coordinator::{CoordinatorConfig, TrainingCoordinator, TrainingStream};
//! # fn run(coordinator: Arc<TrainingCoordinator>) -> Result<()> {
//! let config = CoordinatorConfig::default();
//! let id = coordinator.create_session("Q-Learning", "FrozenLake-v1", &Parameters::new(), Some(42))?;
//! let mut stream = TrainingStream::spawn(coordinator.clone(), &id, &config)?;
//! for chunk in &mut stream {
//!     print!("{}", chunk);
//! }
//! stream.join()?;
//! # Ok(())
//! # }
//! ```
mod coordinator;
mod messages;
mod session;
mod sse;
mod stream;
pub use coordinator::{CoordinatorConfig, TrainingCoordinator};
pub use messages::{PolicyReplayEvent, TrainingEvent};
pub use session::{SessionInfo, SessionStatus};
pub use sse::SseChunk;
pub use stream::{replay_policy_event, TrainingStream};
