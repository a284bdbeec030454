//! Environment step.
use crate::record::Record;

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// A [`DiscreteEnv`](crate::DiscreteEnv) emits a [`Step`] object at every
/// interaction step.
#[derive(Clone, Debug)]
pub struct Step {
    /// Action applied to the environment.
    pub act: usize,

    /// Observation after the action, a state index.
    pub obs: usize,

    /// Reward.
    pub reward: f64,

    /// Flag denoting if the episode reached a terminal state.
    pub is_terminated: bool,

    /// Flag denoting if the episode was cut off, e.g. by a time limit.
    pub is_truncated: bool,

    /// Information defined by the environment.
    pub info: Record,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(
        act: usize,
        obs: usize,
        reward: f64,
        is_terminated: bool,
        is_truncated: bool,
        info: Record,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
