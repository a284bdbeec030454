//! Tabular Q-learning.
mod base;
mod config;
mod explorer;
mod value_table;
pub use base::{QLearning, MAX_STEPS_PER_EPISODE};
pub use config::{num_episodes_default, parameter_schema, QInit, QLearningConfig};
pub use explorer::EpsilonGreedy;
pub use value_table::{argmax_random_tiebreak, ValueTable};
