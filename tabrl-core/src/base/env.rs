//! Environment.
use super::Step;
use crate::{frame::Frame, record::Record};
use anyhow::Result;

/// Represents an environment with finite, discrete state and action spaces.
///
/// States and actions are indices in `0..num_states()` and `0..num_actions()`.
pub trait DiscreteEnv {
    /// The number of states.
    fn num_states(&self) -> usize;

    /// The number of actions.
    fn num_actions(&self) -> usize;

    /// Resets the environment and returns the initial observation.
    ///
    /// If `seed` is given, the random number generator of the environment is
    /// re-seeded before the reset.
    fn reset(&mut self, seed: Option<u64>) -> Result<(usize, Record)>;

    /// Performs an environment step.
    fn step(&mut self, act: usize) -> Result<Step>;

    /// Renders the current state of the environment.
    fn render(&self) -> Result<Frame>;

    /// States in which an episode ends and no further reward can be obtained.
    fn terminal_states(&self) -> Vec<usize> {
        Vec::new()
    }
}

/// An environment behind a pointer, as stored in sessions.
pub type BoxedEnv = Box<dyn DiscreteEnv + Send>;

impl<E: DiscreteEnv + ?Sized> DiscreteEnv for Box<E> {
    fn num_states(&self) -> usize {
        (**self).num_states()
    }

    fn num_actions(&self) -> usize {
        (**self).num_actions()
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(usize, Record)> {
        (**self).reset(seed)
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        (**self).step(act)
    }

    fn render(&self) -> Result<Frame> {
        (**self).render()
    }

    fn terminal_states(&self) -> Vec<usize> {
        (**self).terminal_states()
    }
}
