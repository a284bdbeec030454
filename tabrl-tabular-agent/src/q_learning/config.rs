//! Configuration of [`QLearning`](super::QLearning).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_core::{
    params::{ParamSpec, ParameterSchema, Parameters},
    TabrlError,
};

const PARAMETER_NAMES: [&str; 8] = [
    "learning_rate",
    "discount_factor",
    "exploration_rate",
    "num_episodes",
    "q_init_strategy",
    "q_init_value",
    "q_init_min",
    "q_init_max",
];

/// Initialization of the value table.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum QInit {
    /// Every value is set to `value`.
    Fixed {
        /// Initial value.
        value: f64,
    },

    /// Values are drawn uniformly from `[min, max)`.
    Random {
        /// Inclusive lower bound.
        min: f64,
        /// Exclusive upper bound.
        max: f64,
    },
}

impl Default for QInit {
    fn default() -> Self {
        Self::Fixed { value: 0.0 }
    }
}

impl QInit {
    /// Builds an initialization from a strategy name, `fixed` or `random`.
    ///
    /// `value` is used by `fixed`, `min` and `max` by `random`.
    pub fn from_name(strategy: &str, value: f64, min: f64, max: f64) -> Result<Self> {
        let init = match strategy {
            "fixed" => Self::Fixed { value },
            "random" => Self::Random { min, max },
            _ => {
                return Err(TabrlError::Validation(format!(
                    "Unknown Q-value initialization strategy: {}",
                    strategy
                ))
                .into())
            }
        };
        init.validate()?;
        Ok(init)
    }

    /// Checks that values are finite and that `min < max` for `random`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Fixed { value } if !value.is_finite() => Err(TabrlError::Validation(
                format!("Invalid Q-value initialization: value ({}) must be finite", value),
            )
            .into()),
            Self::Random { min, max } if !(min.is_finite() && max.is_finite()) => {
                Err(TabrlError::Validation(format!(
                    "Invalid Q-value initialization: bounds ({}, {}) must be finite",
                    min, max
                ))
                .into())
            }
            Self::Random { min, max } if min >= max => Err(TabrlError::Validation(format!(
                "Invalid Q-value initialization: min ({}) must be less than max ({})",
                min, max
            ))
            .into()),
            _ => Ok(()),
        }
    }
}

/// Configuration of [`QLearning`](super::QLearning).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct QLearningConfig {
    /// Step size of the update, in `(0, 1]`.
    pub learning_rate: f64,

    /// Discount of future rewards, in `[0, 1)`.
    pub discount_factor: f64,

    /// Probability of taking a random action during training, in `[0, 1]`.
    pub exploration_rate: f64,

    /// The number of training episodes requested by clients.
    pub num_episodes: usize,

    /// Initialization of the value table.
    pub q_init: QInit,

    /// Seed of the random number generator. If `None`, the generator is seeded
    /// from the operating system.
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            exploration_rate: 0.1,
            num_episodes: num_episodes_default(None),
            q_init: QInit::default(),
            seed: None,
        }
    }
}

impl QLearningConfig {
    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the exploration rate.
    pub fn exploration_rate(mut self, v: f64) -> Self {
        self.exploration_rate = v;
        self
    }

    /// Sets the number of training episodes.
    pub fn num_episodes(mut self, v: usize) -> Self {
        self.num_episodes = v;
        self
    }

    /// Sets the initialization of the value table.
    pub fn q_init(mut self, v: QInit) -> Self {
        self.q_init = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: Option<u64>) -> Self {
        self.seed = v;
        self
    }

    /// Builds a configuration from loosely typed parameters.
    ///
    /// Missing parameters keep their default values. Unknown names, values of a
    /// wrong type or out of range fail with [`TabrlError::Validation`].
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        if let Some((name, _)) = params
            .iter()
            .find(|(name, _)| !PARAMETER_NAMES.contains(&name.as_str()))
        {
            return Err(
                TabrlError::Validation(format!("unknown parameter '{}'", name)).into(),
            );
        }

        let default = Self::default();
        let q_init = QInit::from_name(
            params.str_or("q_init_strategy", "fixed")?,
            params.f64_or("q_init_value", 0.0)?,
            params.f64_or("q_init_min", 0.0)?,
            params.f64_or("q_init_max", 1.0)?,
        )?;
        let config = Self {
            learning_rate: params.f64_or("learning_rate", default.learning_rate)?,
            discount_factor: params.f64_or("discount_factor", default.discount_factor)?,
            exploration_rate: params.f64_or("exploration_rate", default.exploration_rate)?,
            num_episodes: params.usize_or("num_episodes", default.num_episodes)?,
            q_init,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the ranges of the scalar parameters and the initialization.
    pub fn validate(&self) -> Result<()> {
        let in_range = |name: &str, v: f64, ok: bool, range: &str| -> Result<()> {
            if ok && v.is_finite() {
                Ok(())
            } else {
                Err(TabrlError::Validation(format!("{} must be in {}, got {}", name, range, v)).into())
            }
        };
        let lr = self.learning_rate;
        let gamma = self.discount_factor;
        let eps = self.exploration_rate;
        in_range("learning_rate", lr, lr > 0.0 && lr <= 1.0, "(0, 1]")?;
        in_range("discount_factor", gamma, (0.0..1.0).contains(&gamma), "[0, 1)")?;
        in_range("exploration_rate", eps, (0.0..=1.0).contains(&eps), "[0, 1]")?;
        self.q_init.validate()
    }

    /// Constructs [`QLearningConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QLearningConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Default number of training episodes for an environment.
///
/// Stochastic environments need more episodes to converge than deterministic ones.
pub fn num_episodes_default(environment: Option<&str>) -> usize {
    match environment {
        Some("FrozenLake-v1") => 5000,
        Some("FrozenLake-v1-NoSlip") => 500,
        _ => 1000,
    }
}

/// Tunable parameters of Q-learning.
pub fn parameter_schema(environment: Option<&str>) -> ParameterSchema {
    ParameterSchema::new()
        .with(
            "learning_rate",
            ParamSpec::float(0.1, "Alpha - controls how much new information overrides old")
                .min(0.01)
                .max(1.0),
        )
        .with(
            "discount_factor",
            ParamSpec::float(0.95, "Gamma - importance of future rewards")
                .min(0.0)
                .max(0.99),
        )
        .with(
            "exploration_rate",
            ParamSpec::float(0.1, "Epsilon - probability of random action")
                .min(0.0)
                .max(1.0),
        )
        .with(
            "num_episodes",
            ParamSpec::int(
                num_episodes_default(environment) as i64,
                "Number of training episodes",
            ),
        )
        .with(
            "q_init_strategy",
            ParamSpec::choice(
                "fixed",
                &["fixed", "random"],
                "Initialization of Q-values: a fixed value or uniform random values",
            ),
        )
        .with(
            "q_init_value",
            ParamSpec::float(0.0, "Fixed value for Q-value initialization"),
        )
        .with(
            "q_init_min",
            ParamSpec::float(0.0, "Minimum bound for random Q-value initialization"),
        )
        .with(
            "q_init_max",
            ParamSpec::float(1.0, "Maximum bound for random Q-value initialization"),
        )
}
