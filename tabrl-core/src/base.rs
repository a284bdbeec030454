//! Core functionalities.
mod algorithm;
mod env;
mod registry;
mod step;
pub use algorithm::{
    Algorithm, BoxedAlgorithm, EpisodeCallback, EpisodeResult, LearningData, StepCallback,
};
pub use env::{BoxedEnv, DiscreteEnv};
pub use registry::{AlgorithmRegistry, EnvironmentRegistry};
pub use step::Step;
