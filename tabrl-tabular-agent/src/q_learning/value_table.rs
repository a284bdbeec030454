//! Dense table of state-action values.
use super::QInit;
use anyhow::Result;
use rand::{seq::SliceRandom, Rng};
use tabrl_core::TabrlError;

/// State-action values stored row-major, one row per state.
///
/// The shape is fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTable {
    n_states: usize,
    n_actions: usize,
    data: Vec<f64>,
}

impl ValueTable {
    /// Creates a table of shape `(n_states, n_actions)` initialized by `init`.
    ///
    /// Fails with [`TabrlError::Validation`] if the shape is empty or the
    /// initialization is invalid, see [`QInit::validate`].
    pub fn new(n_states: usize, n_actions: usize, init: &QInit, rng: &mut impl Rng) -> Result<Self> {
        if n_states == 0 || n_actions == 0 {
            return Err(TabrlError::Validation(format!(
                "value table needs at least one state and one action, got ({}, {})",
                n_states, n_actions
            ))
            .into());
        }
        init.validate()?;

        let n = n_states * n_actions;
        let data = match *init {
            QInit::Fixed { value } => vec![value; n],
            QInit::Random { min, max } => (0..n).map(|_| rng.gen_range(min..max)).collect(),
        };

        Ok(Self {
            n_states,
            n_actions,
            data,
        })
    }

    /// `(n_states, n_actions)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_states, self.n_actions)
    }

    /// Value of `(state, action)`.
    #[inline]
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.data[state * self.n_actions + action]
    }

    /// Sets the value of `(state, action)`.
    #[inline]
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        self.data[state * self.n_actions + action] = value;
    }

    /// Values of all actions in `state`.
    #[inline]
    pub fn row(&self, state: usize) -> &[f64] {
        let i = state * self.n_actions;
        &self.data[i..i + self.n_actions]
    }

    /// Sets all values of `state` to zero.
    pub fn zero_row(&mut self, state: usize) {
        let i = state * self.n_actions;
        self.data[i..i + self.n_actions].fill(0.0);
    }

    /// Minimum, maximum and mean of all values.
    pub fn stats(&self) -> (f64, f64, f64) {
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = self.data.iter().sum::<f64>() / self.data.len() as f64;
        (min, max, mean)
    }

    /// Copies the table into nested vectors, one per state.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.data
            .chunks(self.n_actions)
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Returns the index of the largest value, choosing uniformly among ties.
///
/// Ties are common early in training, e.g. when all values are initialized to
/// the same constant. `values` must not be empty.
pub fn argmax_random_tiebreak(values: &[f64], rng: &mut impl Rng) -> usize {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let best = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == max)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    match best.choose(&mut *rng) {
        Some(&i) => i,
        // Only reachable with NaN values
        None => rng.gen_range(0..values.len()),
    }
}
