//! Registries of the algorithms and environments shipped with tabrl.
use anyhow::Result;
use log::debug;
use tabrl_core::{
    params::{ParameterSchema, Parameters},
    Algorithm, AlgorithmRegistry, BoxedAlgorithm, BoxedEnv, EnvironmentRegistry, TabrlError,
};
use tabrl_frozen_lake::{FrozenLake, FrozenLakeConfig};
use tabrl_tabular_agent::{QLearning, QLearningConfig};

/// Name of tabular Q-learning.
pub const Q_LEARNING: &str = "Q-Learning";

/// Name of the slippery FrozenLake.
pub const FROZEN_LAKE: &str = "FrozenLake-v1";

/// Name of the deterministic FrozenLake.
pub const FROZEN_LAKE_NO_SLIP: &str = "FrozenLake-v1-NoSlip";

/// Environments: [`FROZEN_LAKE_NO_SLIP`] and [`FROZEN_LAKE`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultEnvironmentRegistry;

impl EnvironmentRegistry for DefaultEnvironmentRegistry {
    fn names(&self) -> Vec<String> {
        vec![FROZEN_LAKE_NO_SLIP.to_string(), FROZEN_LAKE.to_string()]
    }

    fn build(&self, name: &str, seed: Option<u64>) -> Result<BoxedEnv> {
        let config = match name {
            FROZEN_LAKE_NO_SLIP => FrozenLakeConfig::default().is_slippery(false),
            FROZEN_LAKE => FrozenLakeConfig::default().is_slippery(true),
            _ => return Err(TabrlError::UnknownEnvironment(name.to_string()).into()),
        };
        debug!("Builds {} with seed {:?}", name, seed);
        Ok(Box::new(FrozenLake::build(&config, seed)?))
    }
}

/// Algorithms: [`Q_LEARNING`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAlgorithmRegistry;

impl AlgorithmRegistry for DefaultAlgorithmRegistry {
    fn names(&self) -> Vec<String> {
        vec![Q_LEARNING.to_string()]
    }

    fn parameter_schema(&self, name: &str, environment: Option<&str>) -> Result<ParameterSchema> {
        match name {
            Q_LEARNING => Ok(QLearning::<BoxedEnv>::parameter_schema(environment)),
            _ => Err(TabrlError::UnknownAlgorithm(name.to_string()).into()),
        }
    }

    fn build(
        &self,
        name: &str,
        env: BoxedEnv,
        params: &Parameters,
        seed: Option<u64>,
    ) -> Result<BoxedAlgorithm> {
        match name {
            Q_LEARNING => {
                let config = QLearningConfig::from_parameters(params)?.seed(seed);
                Ok(Box::new(QLearning::build(env, config)?))
            }
            _ => Err(TabrlError::UnknownAlgorithm(name.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tabrl_core::{params::ParamValue, DiscreteEnv};

    #[test]
    fn test_names() {
        let envs = DefaultEnvironmentRegistry;
        assert!(envs.contains(FROZEN_LAKE));
        assert!(envs.contains(FROZEN_LAKE_NO_SLIP));
        assert!(!envs.contains("CartPole-v1"));
        assert!(envs.build("CartPole-v1", None).is_err());

        let algos = DefaultAlgorithmRegistry;
        assert_eq!(algos.names(), vec![Q_LEARNING.to_string()]);
        assert!(algos.parameter_schema("DQN", None).is_err());
    }

    #[test]
    fn test_schema_depends_on_environment() {
        let algos = DefaultAlgorithmRegistry;
        let episodes = |env: Option<&str>| {
            algos
                .parameter_schema(Q_LEARNING, env)
                .unwrap()
                .get("num_episodes")
                .map(|spec| spec.default.clone())
        };
        assert_eq!(episodes(Some(FROZEN_LAKE)), Some(ParamValue::Int(5000)));
        assert_eq!(episodes(Some(FROZEN_LAKE_NO_SLIP)), Some(ParamValue::Int(500)));
        assert_eq!(episodes(None), Some(ParamValue::Int(1000)));
    }

    #[test]
    fn test_build_frozen_lake() {
        let env = DefaultEnvironmentRegistry.build(FROZEN_LAKE, Some(0)).unwrap();
        assert_eq!((env.num_states(), env.num_actions()), (16, 4));
        assert_eq!(env.terminal_states(), vec![5, 7, 11, 12, 15]);
    }
}
