//! An interactive sandbox for tabular reinforcement learning.
//!
//! A user picks an algorithm and an environment, trains it while watching the
//! reward, the learned value table and a rendered frame of every episode, and
//! then replays the learned policy.
//!
//! tabrl consists of the following crates:
//!
//! * [tabrl-core](tabrl_core) provides the environment and algorithm traits,
//!   parameter schemas and frames.
//! * [tabrl-tabular-agent](tabrl_tabular_agent) implements tabular Q-learning.
//! * [tabrl-frozen-lake](tabrl_frozen_lake) is the FrozenLake grid world.
//! * [tabrl-coordinator](tabrl_coordinator) manages training sessions and streams
//!   their progress as Server-Sent Events.
//!
//! This crate registers the algorithms and environments above and ships the
//! `tabrl` command line tool.
//!
//! ```no_run
//! use anyhow::Result;
//! use std::sync::Arc;
//! use tabrl::{default_coordinator, FROZEN_LAKE_NO_SLIP, Q_LEARNING};
//! use tabrl_coordinator::{replay_policy_event, CoordinatorConfig, TrainingStream};
//! use tabrl_core::params::Parameters;
//!
//! fn main() -> Result<()> {
//!     let coordinator = Arc::new(default_coordinator());
//!     let params = Parameters::new().with("num_episodes", 200usize);
//!     let id = coordinator.create_session(Q_LEARNING, FROZEN_LAKE_NO_SLIP, &params, Some(42))?;
//!
//!     let mut stream = TrainingStream::spawn(coordinator.clone(), &id, &CoordinatorConfig::default())?;
//!     for chunk in &mut stream {
//!         print!("{}", chunk);
//!     }
//!     stream.join()?;
//!
//!     let replay = replay_policy_event(&coordinator, &id);
//!     println!("{:?}", replay);
//!     Ok(())
//! }
//! ```
mod registry;
pub use registry::{
    DefaultAlgorithmRegistry, DefaultEnvironmentRegistry, FROZEN_LAKE, FROZEN_LAKE_NO_SLIP,
    Q_LEARNING,
};
use tabrl_coordinator::TrainingCoordinator;

/// Creates a coordinator with the default registries.
pub fn default_coordinator() -> TrainingCoordinator {
    TrainingCoordinator::new(DefaultAlgorithmRegistry, DefaultEnvironmentRegistry)
}
