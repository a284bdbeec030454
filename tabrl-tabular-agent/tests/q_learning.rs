use anyhow::Result;
use tabrl_core::{
    record::Record, Algorithm, DiscreteEnv, EpisodeResult, Frame, Step, TabrlError,
};
use tabrl_tabular_agent::{QInit, QLearning, QLearningConfig, MAX_STEPS_PER_EPISODE};
use test_log::test;

/// Deterministic two-state environment.
///
/// From state 0, action 0 moves to the terminal state 1 with reward 1 and
/// action 1 stays in state 0 with reward 0.
#[derive(Default)]
struct TwoStates {
    state: usize,
    n_steps: usize,
}

impl DiscreteEnv for TwoStates {
    fn num_states(&self) -> usize {
        2
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self, _seed: Option<u64>) -> Result<(usize, Record)> {
        self.state = 0;
        self.n_steps = 0;
        Ok((0, Record::empty()))
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        self.n_steps += 1;
        let (obs, reward) = match act {
            0 => (1, 1.0),
            _ => (0, 0.0),
        };
        self.state = obs;
        Ok(Step::new(act, obs, reward, obs == 1, false, Record::empty()))
    }

    fn render(&self) -> Result<Frame> {
        Frame::filled(2, 1, [self.state as u8, self.n_steps as u8, 0])
    }

    fn terminal_states(&self) -> Vec<usize> {
        vec![1]
    }
}

/// Never terminates; every episode runs into the step ceiling.
#[derive(Default)]
struct Endless;

impl DiscreteEnv for Endless {
    fn num_states(&self) -> usize {
        3
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self, _seed: Option<u64>) -> Result<(usize, Record)> {
        Ok((0, Record::empty()))
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        Ok(Step::new(act, act, 0.0, false, false, Record::empty()))
    }

    fn render(&self) -> Result<Frame> {
        Frame::filled(1, 1, [0, 0, 0])
    }
}

/// Fails on the third step.
#[derive(Default)]
struct Faulty {
    n_steps: usize,
}

impl DiscreteEnv for Faulty {
    fn num_states(&self) -> usize {
        2
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self, _seed: Option<u64>) -> Result<(usize, Record)> {
        Ok((0, Record::empty()))
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        self.n_steps += 1;
        if self.n_steps == 3 {
            return Err(TabrlError::Environment("broken".to_string()).into());
        }
        Ok(Step::new(act, 0, 0.0, false, false, Record::empty()))
    }

    fn render(&self) -> Result<Frame> {
        Frame::filled(1, 1, [0, 0, 0])
    }
}

/// Returns a NaN reward on the second step.
#[derive(Default)]
struct NanReward {
    n_steps: usize,
}

impl DiscreteEnv for NanReward {
    fn num_states(&self) -> usize {
        2
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self, _seed: Option<u64>) -> Result<(usize, Record)> {
        Ok((0, Record::empty()))
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        self.n_steps += 1;
        let reward = if self.n_steps == 2 { f64::NAN } else { 0.0 };
        Ok(Step::new(act, 0, reward, false, false, Record::empty()))
    }

    fn render(&self) -> Result<Frame> {
        Frame::filled(1, 1, [0, 0, 0])
    }
}

fn config() -> QLearningConfig {
    QLearningConfig::default()
        .learning_rate(0.1)
        .discount_factor(0.95)
        .exploration_rate(0.0)
        .seed(Some(42))
}

fn train(agent: &mut impl Algorithm, num_episodes: usize) -> Result<Vec<EpisodeResult>> {
    let mut results = Vec::new();
    agent.train(num_episodes, &mut |r| {
        results.push(r);
        Ok(())
    })?;
    Ok(results)
}

#[test]
fn test_value_table_shape() -> Result<()> {
    let agent = QLearning::build(Endless, config())?;
    assert_eq!(agent.value_table().shape(), (3, 2));
    assert_eq!(agent.learning_data().value_table.len(), 3);

    let config = config().q_init(QInit::Random { min: 2.0, max: 3.0 });
    let agent = QLearning::build(Endless, config)?;
    let table = agent.learning_data().value_table;
    assert!(table.iter().flatten().all(|&v| (2.0..3.0).contains(&v)));
    Ok(())
}

#[test]
fn test_inverted_random_bounds_fail() {
    let config = config().q_init(QInit::Random { min: 1.0, max: -1.0 });
    let err = QLearning::build(TwoStates::default(), config).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<TabrlError>(),
        Some(TabrlError::Validation(_))
    ));
}

#[test]
fn test_one_greedy_episode() -> Result<()> {
    let mut agent = QLearning::build(TwoStates::default(), config())?;
    let results = train(&mut agent, 1)?;

    // Self-loops taken while both values tie at zero leave Q(0, 1) unchanged
    let table = agent.value_table();
    assert!((table.get(0, 0) - 0.1).abs() < 1e-12);
    assert_eq!(table.get(0, 1), 0.0);
    assert_eq!(table.row(1), &[0.0, 0.0]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].reward, 1.0);
    Ok(())
}

#[test]
fn test_episode_results_are_ordered() -> Result<()> {
    let mut agent = QLearning::build(TwoStates::default(), config())?;
    let results = train(&mut agent, 25)?;
    assert_eq!(results.len(), 25);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.episode, i);
        assert_eq!(r.learning_data.value_table.len(), 2);
        // Rendered after the episode: the agent sits in the terminal state
        assert_eq!(r.frame.pixel(0, 0).map(|p| p[0]), Some(1));
    }
    assert_eq!(results.last().unwrap().learning_data, agent.learning_data());
    Ok(())
}

#[test]
fn test_callback_error_aborts_training() -> Result<()> {
    let mut agent = QLearning::build(TwoStates::default(), config())?;
    let mut n_calls = 0;
    let res = agent.train(10, &mut |r| {
        n_calls += 1;
        if r.episode == 2 {
            anyhow::bail!("stop");
        }
        Ok(())
    });
    assert!(res.is_err());
    assert_eq!(n_calls, 3);
    Ok(())
}

#[test]
fn test_environment_failure_propagates() -> Result<()> {
    let config = config().exploration_rate(1.0);
    let mut agent = QLearning::build(Faulty::default(), config)?;
    let err = train(&mut agent, 5).err().unwrap();
    assert_eq!(
        err.downcast_ref::<TabrlError>(),
        Some(&TabrlError::Environment("broken".to_string()))
    );
    Ok(())
}

#[test]
fn test_non_finite_reward_is_rejected() -> Result<()> {
    let mut agent = QLearning::build(NanReward::default(), config())?;
    let err = train(&mut agent, 3).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<TabrlError>(),
        Some(TabrlError::Environment(_))
    ));
    assert!(agent
        .value_table()
        .to_nested()
        .iter()
        .flatten()
        .all(|v| v.is_finite()));
    Ok(())
}

#[test]
fn test_terminal_rows_stay_zero() -> Result<()> {
    let config = config()
        .exploration_rate(0.5)
        .q_init(QInit::Random { min: 0.5, max: 1.0 });
    let mut agent = QLearning::build(TwoStates::default(), config)?;
    assert_eq!(agent.value_table().row(1), &[0.0, 0.0]);
    assert!(agent.value_table().row(0).iter().all(|&v| v >= 0.5));
    train(&mut agent, 200)?;
    assert_eq!(agent.value_table().row(1), &[0.0, 0.0]);
    Ok(())
}

#[test]
fn test_episodes_are_capped() -> Result<()> {
    let config = config().exploration_rate(1.0);
    let mut agent = QLearning::build(Endless, config)?;
    let results = train(&mut agent, 3)?;
    assert_eq!(results.len(), 3);

    let mut n_frames = 0;
    let frames = agent.run_policy(Some(&mut |_: &Frame| n_frames += 1))?;
    assert_eq!(frames.len(), MAX_STEPS_PER_EPISODE);
    assert_eq!(n_frames, MAX_STEPS_PER_EPISODE);
    Ok(())
}

#[test]
fn test_run_policy_renders_every_step() -> Result<()> {
    let mut agent = QLearning::build(TwoStates::default(), config())?;
    train(&mut agent, 50)?;

    let mut seen = Vec::new();
    let frames = agent.run_policy(Some(&mut |f: &Frame| seen.push(f.clone())))?;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames, seen);
    assert_eq!(frames[0].pixel(0, 0), Some([1, 1, 0]));

    // Replay leaves the value table untouched
    let before = agent.learning_data();
    agent.run_policy(None)?;
    assert_eq!(before, agent.learning_data());
    Ok(())
}

#[test]
fn test_greedy_convergence() -> Result<()> {
    let mut agent = QLearning::build(TwoStates::default(), config())?;
    train(&mut agent, 500)?;
    assert!((agent.value_table().get(0, 0) - 1.0).abs() < 1e-6);

    // Fixed point of the update
    let before = agent.learning_data();
    train(&mut agent, 100)?;
    let after = agent.learning_data();
    for (r0, r1) in before.value_table.iter().zip(after.value_table.iter()) {
        for (v0, v1) in r0.iter().zip(r1.iter()) {
            assert!((v0 - v1).abs() < 1e-6);
        }
    }
    Ok(())
}

#[test]
fn test_exploring_convergence() -> Result<()> {
    let config = config().exploration_rate(0.2);
    let mut agent = QLearning::build(TwoStates::default(), config)?;
    train(&mut agent, 3000)?;
    let table = agent.value_table();
    assert!((table.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((table.get(0, 1) - 0.95).abs() < 1e-6);
    Ok(())
}
