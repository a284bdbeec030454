//! Registries of algorithms and environments.
use super::{BoxedAlgorithm, BoxedEnv};
use crate::params::{ParameterSchema, Parameters};
use anyhow::Result;

/// Maps environment names to constructors.
pub trait EnvironmentRegistry: Send + Sync {
    /// Names of the supported environments.
    fn names(&self) -> Vec<String>;

    /// Returns `true` if the environment is supported.
    fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|n| n == name)
    }

    /// Builds an environment. `seed` seeds the random number generator of the
    /// environment.
    ///
    /// Fails with [`TabrlError::UnknownEnvironment`](crate::TabrlError) for an
    /// unsupported name.
    fn build(&self, name: &str, seed: Option<u64>) -> Result<BoxedEnv>;
}

/// Maps algorithm names to constructors and parameter schemas.
pub trait AlgorithmRegistry: Send + Sync {
    /// Names of the supported algorithms.
    fn names(&self) -> Vec<String>;

    /// Returns `true` if the algorithm is supported.
    fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|n| n == name)
    }

    /// Parameter schema of the algorithm, optionally specialized for an environment.
    ///
    /// Fails with [`TabrlError::UnknownAlgorithm`](crate::TabrlError) for an
    /// unsupported name.
    fn parameter_schema(&self, name: &str, environment: Option<&str>) -> Result<ParameterSchema>;

    /// Builds an algorithm bound to `env`.
    ///
    /// `params` are expected to be resolved against the schema of the algorithm.
    fn build(
        &self,
        name: &str,
        env: BoxedEnv,
        params: &Parameters,
        seed: Option<u64>,
    ) -> Result<BoxedAlgorithm>;
}
