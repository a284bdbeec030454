//! Learning algorithms.
use crate::{frame::Frame, params::ParameterSchema};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Learned artifact of an algorithm in a form that can be serialized and
/// visualized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningData {
    /// State-action values, one row per state and one column per action.
    pub value_table: Vec<Vec<f64>>,
}

/// Result of a single training episode.
#[derive(Clone, Debug)]
pub struct EpisodeResult {
    /// Index of the episode, starting at 0.
    pub episode: usize,

    /// Sum of rewards obtained in the episode.
    pub reward: f64,

    /// Snapshot of the learned values after the episode.
    pub learning_data: LearningData,

    /// Frame rendered after the episode finished.
    pub frame: Frame,
}

/// Receives one [`EpisodeResult`] per training episode.
///
/// An error returned by the callback aborts training and is propagated to the
/// caller of [`Algorithm::train`].
pub type EpisodeCallback<'a> = dyn FnMut(EpisodeResult) -> Result<()> + 'a;

/// Receives every frame rendered while replaying a policy.
pub type StepCallback<'a> = dyn FnMut(&Frame) + 'a;

/// A learning algorithm bound to an environment.
///
/// Implementations run single-threaded: the caller must not invoke [`train`] and
/// [`run_policy`] concurrently on the same object.
///
/// [`train`]: Algorithm::train
/// [`run_policy`]: Algorithm::run_policy
pub trait Algorithm {
    /// Runs `num_episodes` training episodes.
    ///
    /// `on_episode` is invoked synchronously after every episode.
    fn train(&mut self, num_episodes: usize, on_episode: &mut EpisodeCallback<'_>) -> Result<()>;

    /// Runs a single episode with the current policy without exploration and
    /// returns the frames rendered after every step.
    fn run_policy(&mut self, on_step: Option<&mut StepCallback<'_>>) -> Result<Vec<Frame>>;

    /// Returns a snapshot of the learned values.
    fn learning_data(&self) -> LearningData;

    /// Tunable parameters of the algorithm.
    ///
    /// Defaults may depend on the environment the algorithm will be trained on.
    fn parameter_schema(environment: Option<&str>) -> ParameterSchema
    where
        Self: Sized;
}

/// An algorithm behind a pointer, as stored in sessions.
pub type BoxedAlgorithm = Box<dyn Algorithm + Send>;
