//! Tabular Q-learning agent.
use super::{
    config::{parameter_schema, QLearningConfig},
    explorer::EpsilonGreedy,
    value_table::{argmax_random_tiebreak, ValueTable},
};
use anyhow::Result;
use log::{debug, info};
use rand::{rngs::SmallRng, SeedableRng};
use tabrl_core::{
    params::ParameterSchema, Algorithm, DiscreteEnv, EpisodeCallback, EpisodeResult, Frame,
    LearningData, StepCallback, TabrlError,
};

/// The maximum number of environment steps in an episode, both in training and
/// in policy replay. An episode hitting the limit ends normally.
pub const MAX_STEPS_PER_EPISODE: usize = 100;

/// Tabular Q-learning with epsilon-greedy exploration.
///
/// The agent owns the environment it is trained on. After every step
/// `(s, a, r, s')` the value table is updated as
///
/// ```text
/// a' = argmax Q(s', .)  (ties broken uniformly at random)
/// Q(s, a) += learning_rate * (r + discount_factor * Q(s', a') - Q(s, a))
/// ```
///
/// Rows of the terminal states declared by the environment are set to zero at
/// construction and never updated.
pub struct QLearning<E: DiscreteEnv> {
    env: E,
    q_table: ValueTable,
    is_terminal: Vec<bool>,
    learning_rate: f64,
    discount_factor: f64,
    explorer: EpsilonGreedy,
    rng: SmallRng,
}

impl<E: DiscreteEnv> QLearning<E> {
    /// Builds an agent bound to `env`.
    ///
    /// Fails with [`TabrlError::Validation`] if the configuration is invalid.
    pub fn build(env: E, config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let (n_states, n_actions) = (env.num_states(), env.num_actions());
        let mut q_table = ValueTable::new(n_states, n_actions, &config.q_init, &mut rng)?;

        let mut is_terminal = vec![false; n_states];
        for s in env.terminal_states() {
            if s >= n_states {
                return Err(TabrlError::Validation(format!(
                    "terminal state {} is out of range for {} states",
                    s, n_states
                ))
                .into());
            }
            is_terminal[s] = true;
            q_table.zero_row(s);
        }

        Ok(Self {
            env,
            q_table,
            is_terminal,
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            explorer: EpsilonGreedy::new(config.exploration_rate),
            rng,
        })
    }

    /// The value table.
    pub fn value_table(&self) -> &ValueTable {
        &self.q_table
    }

    /// The environment the agent is bound to.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Discount factor.
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Exploration rate.
    pub fn exploration_rate(&self) -> f64 {
        self.explorer.eps
    }

    /// Returns `true` if the environment declared `state` as terminal.
    pub fn is_terminal(&self, state: usize) -> bool {
        self.is_terminal.get(state).copied().unwrap_or(false)
    }

    fn check_obs(&self, obs: usize) -> Result<usize> {
        if obs < self.q_table.shape().0 {
            Ok(obs)
        } else {
            Err(TabrlError::Environment(format!(
                "observation {} is out of range for {} states",
                obs,
                self.q_table.shape().0
            ))
            .into())
        }
    }

    fn check_reward(&self, reward: f64) -> Result<f64> {
        if reward.is_finite() {
            Ok(reward)
        } else {
            Err(TabrlError::Environment(format!("reward {} is not finite", reward)).into())
        }
    }

    /// Applies the one-step update for the transition `(state, action, reward, next_state)`.
    fn update(&mut self, state: usize, action: usize, reward: f64, next_state: usize) {
        if self.is_terminal[state] {
            return;
        }
        let best_next = argmax_random_tiebreak(self.q_table.row(next_state), &mut self.rng);
        let td_target = reward + self.discount_factor * self.q_table.get(next_state, best_next);
        let td_error = td_target - self.q_table.get(state, action);
        let q = self.q_table.get(state, action) + self.learning_rate * td_error;
        self.q_table.set(state, action, q);
    }

    /// Runs a training episode and returns the sum of rewards.
    fn run_episode(&mut self) -> Result<f64> {
        let (obs, _) = self.env.reset(None)?;
        let mut state = self.check_obs(obs)?;
        let mut total_reward = 0.0;

        for _ in 0..MAX_STEPS_PER_EPISODE {
            let action = self.explorer.action(self.q_table.row(state), &mut self.rng);
            let step = self.env.step(action)?;
            let next_state = self.check_obs(step.obs)?;
            let reward = self.check_reward(step.reward)?;
            total_reward += reward;
            self.update(state, action, reward, next_state);
            state = next_state;
            if step.is_done() {
                break;
            }
        }

        Ok(total_reward)
    }
}

impl<E: DiscreteEnv> Algorithm for QLearning<E> {
    fn train(&mut self, num_episodes: usize, on_episode: &mut EpisodeCallback<'_>) -> Result<()> {
        info!("Starts training Q-learning for {} episodes", num_episodes);

        for episode in 0..num_episodes {
            let reward = self.run_episode()?;

            // Rendered once, after the episode has finished
            let frame = self.env.render()?;

            if episode % 100 == 0 {
                let (min, max, mean) = self.q_table.stats();
                debug!(
                    "Episode {}: reward = {}, Q-table min = {:.4}, max = {:.4}, mean = {:.4}, state 0 = {:?}",
                    episode,
                    reward,
                    min,
                    max,
                    mean,
                    self.q_table.row(0)
                );
            }

            on_episode(EpisodeResult {
                episode,
                reward,
                learning_data: self.learning_data(),
                frame,
            })?;
        }

        Ok(())
    }

    fn run_policy(&mut self, mut on_step: Option<&mut StepCallback<'_>>) -> Result<Vec<Frame>> {
        let (obs, _) = self.env.reset(None)?;
        let mut state = self.check_obs(obs)?;
        let mut frames = Vec::new();

        for _ in 0..MAX_STEPS_PER_EPISODE {
            let action = argmax_random_tiebreak(self.q_table.row(state), &mut self.rng);
            let step = self.env.step(action)?;
            state = self.check_obs(step.obs)?;

            let frame = self.env.render()?;
            if let Some(f) = on_step.as_mut() {
                f(&frame);
            }
            frames.push(frame);

            if step.is_done() {
                break;
            }
        }

        info!("Replayed policy in {} steps", frames.len());
        Ok(frames)
    }

    fn learning_data(&self) -> LearningData {
        LearningData {
            value_table: self.q_table.to_nested(),
        }
    }

    fn parameter_schema(environment: Option<&str>) -> ParameterSchema {
        parameter_schema(environment)
    }
}
