//! Configuration of [`FrozenLake`](super::FrozenLake).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`FrozenLake`](super::FrozenLake).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FrozenLakeConfig {
    /// Rows of the map, top to bottom. Each character is one of `S`, `F`, `H`
    /// and `G`.
    pub map: Vec<String>,

    /// If `true`, the agent may slip to a perpendicular direction.
    pub is_slippery: bool,

    /// Episodes are truncated after this number of steps.
    pub max_episode_steps: usize,
}

impl Default for FrozenLakeConfig {
    fn default() -> Self {
        Self {
            map: ["SFFF", "FHFH", "FFFH", "HFFG"]
                .iter()
                .map(|row| row.to_string())
                .collect(),
            is_slippery: true,
            max_episode_steps: 100,
        }
    }
}

impl FrozenLakeConfig {
    /// Sets the map.
    pub fn map<S: Into<String>>(mut self, rows: impl IntoIterator<Item = S>) -> Self {
        self.map = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the slippery flag.
    pub fn is_slippery(mut self, v: bool) -> Self {
        self.is_slippery = v;
        self
    }

    /// Sets the step limit of an episode.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Constructs [`FrozenLakeConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`FrozenLakeConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
