//! FrozenLake grid world.
//!
//! The agent walks on a frozen lake from the start cell `S` to the goal `G`
//! without falling into a hole `H`. On the slippery lake the agent moves in the
//! intended direction only with probability 1/3 and slips to either
//! perpendicular direction otherwise.
//!
//! ```
//! use anyhow::Result;
//! use tabrl_core::DiscreteEnv;
//! use tabrl_frozen_lake::{FrozenLake, FrozenLakeConfig, RIGHT, DOWN};
//!
//! fn main() -> Result<()> {
//!     let config = FrozenLakeConfig::default().is_slippery(false);
//!     let mut env = FrozenLake::build(&config, Some(42))?;
//!     let (obs, _) = env.reset(None)?;
//!     assert_eq!(obs, 0);
//!
//!     let step = env.step(RIGHT)?;
//!     assert_eq!(step.obs, 1);
//!     let step = env.step(DOWN)?;
//!     assert!(step.is_terminated);
//!     assert_eq!(step.reward, 0.0);
//!     Ok(())
//! }
//! ```
mod env;
pub use env::{Cell, FrozenLake, FrozenLakeConfig, CELL_SIZE, DOWN, LEFT, RIGHT, UP};
