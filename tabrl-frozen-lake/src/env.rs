mod config;
mod render;
use anyhow::Result;
use log::trace;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tabrl_core::{record::Record, DiscreteEnv, Frame, Step, TabrlError};
pub use config::FrozenLakeConfig;
pub use render::CELL_SIZE;

/// Moves to the left.
pub const LEFT: usize = 0;

/// Moves down.
pub const DOWN: usize = 1;

/// Moves to the right.
pub const RIGHT: usize = 2;

/// Moves up.
pub const UP: usize = 3;

const NUM_ACTIONS: usize = 4;

/// A cell of the lake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Start, frozen.
    Start,
    /// Frozen surface.
    Frozen,
    /// Hole; ends the episode.
    Hole,
    /// Goal; ends the episode with reward 1.
    Goal,
}

impl Cell {
    fn parse(c: char) -> Option<Self> {
        match c {
            'S' => Some(Self::Start),
            'F' => Some(Self::Frozen),
            'H' => Some(Self::Hole),
            'G' => Some(Self::Goal),
            _ => None,
        }
    }

    /// Returns `true` for holes and the goal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Hole | Self::Goal)
    }
}

/// FrozenLake grid world.
///
/// States are cell indices `row * ncol + col`. Moving off the grid leaves the
/// agent in place. Reaching `G` gives reward 1, every other transition gives 0.
/// The info record of a step carries the probability of the transition under
/// the key `prob`.
pub struct FrozenLake {
    cells: Vec<Cell>,
    nrow: usize,
    ncol: usize,
    start: usize,
    is_slippery: bool,
    max_episode_steps: usize,
    state: usize,
    n_steps: usize,
    rng: SmallRng,
}

impl FrozenLake {
    /// Constructs a lake.
    ///
    /// `seed` seeds the generator of slippery moves, otherwise it is seeded from
    /// the operating system. Fails with [`TabrlError::Validation`] if the map is
    /// not a non-empty rectangle of `S`, `F`, `H` and `G` with exactly one `S`.
    pub fn build(config: &FrozenLakeConfig, seed: Option<u64>) -> Result<Self> {
        let nrow = config.map.len();
        let ncol = config.map.first().map(|row| row.chars().count()).unwrap_or(0);
        if nrow == 0 || ncol == 0 {
            return Err(TabrlError::Validation("the map of the lake is empty".to_string()).into());
        }

        let mut cells = Vec::with_capacity(nrow * ncol);
        for row in config.map.iter() {
            if row.chars().count() != ncol {
                return Err(TabrlError::Validation(format!(
                    "rows of the map must have {} cells, got '{}'",
                    ncol, row
                ))
                .into());
            }
            for c in row.chars() {
                let cell = Cell::parse(c).ok_or_else(|| {
                    TabrlError::Validation(format!("unknown cell '{}' in the map", c))
                })?;
                cells.push(cell);
            }
        }

        let starts = cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == Cell::Start)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let start = match starts.as_slice() {
            [s] => *s,
            _ => {
                return Err(TabrlError::Validation(format!(
                    "the map must have exactly one start cell, got {}",
                    starts.len()
                ))
                .into())
            }
        };

        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Ok(Self {
            cells,
            nrow,
            ncol,
            start,
            is_slippery: config.is_slippery,
            max_episode_steps: config.max_episode_steps,
            state: start,
            n_steps: 0,
            rng,
        })
    }

    /// `(nrow, ncol)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    /// The cell at a state index.
    pub fn cell(&self, state: usize) -> Option<Cell> {
        self.cells.get(state).copied()
    }

    /// The current state.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Returns `true` for the slippery lake.
    pub fn is_slippery(&self) -> bool {
        self.is_slippery
    }

    /// The state reached by moving from `state` in direction `act`.
    fn next_state(&self, state: usize, act: usize) -> usize {
        let (mut row, mut col) = (state / self.ncol, state % self.ncol);
        match act {
            LEFT => col = col.saturating_sub(1),
            DOWN => row = (row + 1).min(self.nrow - 1),
            RIGHT => col = (col + 1).min(self.ncol - 1),
            _ => row = row.saturating_sub(1),
        }
        row * self.ncol + col
    }
}

impl DiscreteEnv for FrozenLake {
    fn num_states(&self) -> usize {
        self.cells.len()
    }

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(usize, Record)> {
        if let Some(seed) = seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }
        self.state = self.start;
        self.n_steps = 0;
        Ok((self.state, Record::from_scalar("prob", 1.0)))
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        if act >= NUM_ACTIONS {
            return Err(TabrlError::Environment(format!(
                "action {} is out of range for {} actions",
                act, NUM_ACTIONS
            ))
            .into());
        }

        let (dir, prob) = if self.is_slippery {
            // The intended direction or one of its two perpendiculars
            let dir = (act + NUM_ACTIONS - 1 + self.rng.gen_range(0..3)) % NUM_ACTIONS;
            (dir, 1.0 / 3.0)
        } else {
            (act, 1.0)
        };

        self.state = self.next_state(self.state, dir);
        self.n_steps += 1;
        let cell = self.cells[self.state];
        let reward = if cell == Cell::Goal { 1.0 } else { 0.0 };
        let is_terminated = cell.is_terminal();
        let is_truncated = self.n_steps >= self.max_episode_steps;
        trace!("act = {}, dir = {}, state = {}", act, dir, self.state);

        Ok(Step::new(
            act,
            self.state,
            reward,
            is_terminated,
            is_truncated,
            Record::from_scalar("prob", prob),
        ))
    }

    fn render(&self) -> Result<Frame> {
        render::render(&self.cells, self.ncol, self.state)
    }

    fn terminal_states(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_terminal())
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lake(is_slippery: bool) -> FrozenLake {
        let config = FrozenLakeConfig::default().is_slippery(is_slippery);
        FrozenLake::build(&config, Some(42)).unwrap()
    }

    #[test]
    fn test_moves_on_the_border() {
        let env = lake(false);
        assert_eq!(env.next_state(0, LEFT), 0);
        assert_eq!(env.next_state(0, UP), 0);
        assert_eq!(env.next_state(0, DOWN), 4);
        assert_eq!(env.next_state(0, RIGHT), 1);
        assert_eq!(env.next_state(15, DOWN), 15);
        assert_eq!(env.next_state(15, RIGHT), 15);
        assert_eq!(env.next_state(7, RIGHT), 7);
    }

    #[test]
    fn test_terminal_states() {
        assert_eq!(lake(true).terminal_states(), vec![5, 7, 11, 12, 15]);
    }

    #[test]
    fn test_invalid_maps() {
        for map in [vec![], vec!["SF", "F"], vec!["SX"], vec!["FF", "FG"], vec!["SS", "FG"]] {
            let config = FrozenLakeConfig::default().map(map.clone());
            let err = FrozenLake::build(&config, None).err().unwrap();
            assert!(
                matches!(err.downcast_ref::<TabrlError>(), Some(TabrlError::Validation(_))),
                "{:?}",
                map
            );
        }
    }

    #[test]
    fn test_invalid_action() {
        let mut env = lake(false);
        env.reset(None).unwrap();
        assert!(env.step(4).is_err());
    }

    #[test]
    fn test_slippery_directions() {
        let mut env = lake(true);
        let mut counts = [0usize; 16];
        for _ in 0..3000 {
            env.reset(None).unwrap();
            let step = env.step(RIGHT).unwrap();
            assert_eq!(step.info.get_scalar("prob"), Some(1.0 / 3.0));
            counts[step.obs] += 1;
        }
        // Right to 1, down to 4, up stays in 0
        assert_eq!(counts[0] + counts[1] + counts[4], 3000);
        for s in [0, 1, 4] {
            assert!((800..1200).contains(&counts[s]), "{:?}", counts);
        }
    }

    #[test]
    fn test_reset_seed_reproduces_trajectory() {
        let mut env = lake(true);
        let run = |env: &mut FrozenLake| {
            env.reset(Some(7)).unwrap();
            (0..20).map(|_| env.step(DOWN).unwrap().obs).collect::<Vec<_>>()
        };
        let first = run(&mut env);
        let second = run(&mut env);
        assert_eq!(first, second);
    }
}
