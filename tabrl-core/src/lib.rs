#![warn(missing_docs)]
//! Core traits and types of a sandbox for tabular reinforcement learning.
//!
//! * [`DiscreteEnv`] - environments with finite state and action spaces.
//! * [`Algorithm`] - learning algorithms bound to an environment.
//! * [`AlgorithmRegistry`], [`EnvironmentRegistry`] - name based construction.
//! * [`params`] - loosely typed parameters and the schemas validating them.
//! * [`Frame`] - rendered images and their transport encoding.
pub mod error;
pub mod params;
pub mod record;

mod base;
pub use base::{
    Algorithm, AlgorithmRegistry, BoxedAlgorithm, BoxedEnv, DiscreteEnv, EnvironmentRegistry,
    EpisodeCallback, EpisodeResult, LearningData, Step, StepCallback,
};
pub use error::TabrlError;

mod frame;
pub use frame::Frame;
