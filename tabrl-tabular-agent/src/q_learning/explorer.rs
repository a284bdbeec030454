//! Exploration strategy of Q-learning.
use super::value_table::argmax_random_tiebreak;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy action selection with a constant epsilon.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Probability of taking a uniformly random action.
    pub eps: f64,
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new(eps: f64) -> Self {
        Self { eps }
    }

    /// Takes an action based on the action values of the current state.
    ///
    /// * `q` - action values, one per action.
    pub fn action(&self, q: &[f64], rng: &mut impl Rng) -> usize {
        if rng.gen::<f64>() < self.eps {
            rng.gen_range(0..q.len())
        } else {
            argmax_random_tiebreak(q, rng)
        }
    }
}
