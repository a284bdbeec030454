//! Tabular reinforcement learning algorithms.
//!
//! The algorithms in this crate store one value per state-action pair of a
//! [`DiscreteEnv`](tabrl_core::DiscreteEnv) and implement
//! [`Algorithm`](tabrl_core::Algorithm).
pub mod q_learning;
pub use q_learning::{QInit, QLearning, QLearningConfig, ValueTable, MAX_STEPS_PER_EPISODE};
