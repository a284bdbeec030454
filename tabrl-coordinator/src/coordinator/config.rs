//! Configuration of [`TrainingCoordinator`](super::TrainingCoordinator) and the
//! streams it feeds.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
    time::Duration,
};

/// Configuration of training streams.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CoordinatorConfig {
    /// A stream emits a keep-alive chunk after waiting this long for an event.
    ///
    /// The default value is 1000.
    pub keep_alive_interval_ms: u64,

    /// The number of training episodes of a session whose parameters do not
    /// include `num_episodes`.
    ///
    /// The default value is 1000.
    pub default_num_episodes: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            keep_alive_interval_ms: 1000,
            default_num_episodes: 1000,
        }
    }
}

impl CoordinatorConfig {
    /// Sets the keep-alive interval in milliseconds.
    pub fn keep_alive_interval_ms(mut self, v: u64) -> Self {
        self.keep_alive_interval_ms = v;
        self
    }

    /// Sets the fallback number of training episodes.
    pub fn default_num_episodes(mut self, v: usize) -> Self {
        self.default_num_episodes = v;
        self
    }

    /// The keep-alive interval.
    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_millis(self.keep_alive_interval_ms)
    }

    /// Constructs [`CoordinatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CoordinatorConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
