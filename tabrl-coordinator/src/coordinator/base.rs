use crate::session::{new_session_id, SessionInfo, SessionStatus};
use anyhow::Result;
use chrono::Local;
use log::{error, info};
use std::{
    any::Any,
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tabrl_core::{
    params::{ParameterSchema, Parameters},
    AlgorithmRegistry, BoxedAlgorithm, EnvironmentRegistry, EpisodeCallback, Frame, StepCallback,
    TabrlError,
};

/// Recovers the guard of a poisoned mutex. Session data is replaced as a whole,
/// never left half-written.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `f`, turning a panic into [`TabrlError::Panic`]. The algorithm guard is
/// dropped while unwinding; the poisoned mutex is recovered by [`lock`].
fn catch_panic<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(TabrlError::Panic(panic_message(payload.as_ref())).into())
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown cause".to_string()
    }
}

struct SessionEntry {
    info: Mutex<SessionInfo>,
    algorithm: Mutex<BoxedAlgorithm>,
}

/// Manages training sessions.
///
/// A session binds an algorithm to an environment built from the registries given
/// at construction. The coordinator is shared between threads, typically behind an
/// [`Arc`]:
///
/// * The session store can be read, extended and cleared concurrently.
/// * Operations on the same session must be serialized by the caller. A second
///   [`train`](Self::train) on a session fails since training is accepted only
///   for sessions in [`SessionStatus::Created`].
pub struct TrainingCoordinator {
    algorithms: Box<dyn AlgorithmRegistry>,
    environments: Box<dyn EnvironmentRegistry>,
    sessions: Mutex<HashMap<String, Arc<SessionEntry>>>,
}

impl TrainingCoordinator {
    /// Creates a coordinator without sessions.
    pub fn new(
        algorithms: impl AlgorithmRegistry + 'static,
        environments: impl EnvironmentRegistry + 'static,
    ) -> Self {
        Self {
            algorithms: Box::new(algorithms),
            environments: Box::new(environments),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The algorithm registry.
    pub fn algorithms(&self) -> &dyn AlgorithmRegistry {
        self.algorithms.as_ref()
    }

    /// The environment registry.
    pub fn environments(&self) -> &dyn EnvironmentRegistry {
        self.environments.as_ref()
    }

    /// Parameter schema of an algorithm, see [`AlgorithmRegistry::parameter_schema`].
    pub fn parameter_schema(
        &self,
        algorithm: &str,
        environment: Option<&str>,
    ) -> Result<ParameterSchema> {
        self.algorithms.parameter_schema(algorithm, environment)
    }

    /// Creates a session and returns its id.
    ///
    /// `params` are validated against the schema of the algorithm and missing
    /// parameters take their defaults. `seed` seeds both the environment and the
    /// algorithm.
    ///
    /// Fails with [`TabrlError::UnknownAlgorithm`] or
    /// [`TabrlError::UnknownEnvironment`] for unsupported names and with
    /// [`TabrlError::Validation`] for invalid parameters. No session is created
    /// on failure.
    pub fn create_session(
        &self,
        algorithm: &str,
        environment: &str,
        params: &Parameters,
        seed: Option<u64>,
    ) -> Result<String> {
        if !self.algorithms.contains(algorithm) {
            return Err(TabrlError::UnknownAlgorithm(algorithm.to_string()).into());
        }
        if !self.environments.contains(environment) {
            return Err(TabrlError::UnknownEnvironment(environment.to_string()).into());
        }

        let parameters = self
            .algorithms
            .parameter_schema(algorithm, Some(environment))?
            .resolve(params)?;
        let env = self.environments.build(environment, seed)?;
        let algo = self.algorithms.build(algorithm, env, &parameters, seed)?;

        let id = new_session_id();
        let info = SessionInfo {
            id: id.clone(),
            algorithm: algorithm.to_string(),
            environment: environment.to_string(),
            parameters,
            seed,
            status: SessionStatus::Created,
            created_at: Local::now(),
        };
        let entry = SessionEntry {
            info: Mutex::new(info),
            algorithm: Mutex::new(algo),
        };
        lock(&self.sessions).insert(id.clone(), Arc::new(entry));
        info!("Created session {} ({} on {})", id, algorithm, environment);

        Ok(id)
    }

    fn entry(&self, id: &str) -> Result<Arc<SessionEntry>> {
        lock(&self.sessions)
            .get(id)
            .cloned()
            .ok_or_else(|| TabrlError::SessionNotFound(id.to_string()).into())
    }

    /// Returns `true` if the session exists.
    pub fn session_exists(&self, id: &str) -> bool {
        lock(&self.sessions).contains_key(id)
    }

    /// Returns a snapshot of the session.
    ///
    /// Fails with [`TabrlError::SessionNotFound`] if it does not exist.
    pub fn get_session(&self, id: &str) -> Result<SessionInfo> {
        let entry = self.entry(id)?;
        let info = lock(&entry.info).clone();
        Ok(info)
    }

    /// Snapshots of all sessions, oldest first.
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        let entries = lock(&self.sessions).values().cloned().collect::<Vec<_>>();
        let mut sessions = entries
            .iter()
            .map(|e| lock(&e.info).clone())
            .collect::<Vec<_>>();
        sessions.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        sessions
    }

    /// The number of sessions.
    pub fn num_sessions(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Trains the algorithm of the session for `num_episodes` episodes.
    ///
    /// `on_episode` is invoked on the calling thread after every episode. The
    /// session moves to [`SessionStatus::Training`] before the first episode and
    /// to [`SessionStatus::Complete`] or [`SessionStatus::Error`] when training
    /// returns; a failure is also returned to the caller. A panic of the
    /// algorithm or of `on_episode` is reported as [`TabrlError::Panic`].
    ///
    /// Fails with [`TabrlError::SessionNotFound`] for an unknown id and with
    /// [`TabrlError::InvalidSessionState`] unless the session is
    /// [`SessionStatus::Created`]; the status is unchanged in both cases.
    pub fn train(
        &self,
        id: &str,
        num_episodes: usize,
        on_episode: &mut EpisodeCallback<'_>,
    ) -> Result<()> {
        let entry = self.entry(id)?;
        {
            let mut info = lock(&entry.info);
            if info.status != SessionStatus::Created {
                return Err(TabrlError::InvalidSessionState {
                    id: id.to_string(),
                    status: info.status.to_string(),
                    expected: SessionStatus::Created.to_string(),
                }
                .into());
            }
            info.status = SessionStatus::Training;
        }
        info!("Starts training session {} for {} episodes", id, num_episodes);

        let result = catch_panic(|| lock(&entry.algorithm).train(num_episodes, on_episode));

        let mut info = lock(&entry.info);
        match &result {
            Ok(()) => {
                info.status = SessionStatus::Complete;
                info!("Finished training session {}", id);
            }
            Err(e) => {
                info.status = SessionStatus::Error(e.to_string());
                error!("Training session {} failed: {}", id, e);
            }
        }
        result
    }

    /// Replays the greedy policy of the session for one episode and returns
    /// the frame rendered after every step.
    ///
    /// The session does not need to be trained. Fails with
    /// [`TabrlError::SessionNotFound`] for an unknown id and with
    /// [`TabrlError::Panic`] if the replay panics.
    pub fn run_policy(&self, id: &str, on_step: Option<&mut StepCallback<'_>>) -> Result<Vec<Frame>> {
        let entry = self.entry(id)?;
        let frames = catch_panic(|| lock(&entry.algorithm).run_policy(on_step))?;
        info!("Replayed policy of session {} in {} frames", id, frames.len());
        Ok(frames)
    }

    /// Removes all sessions.
    pub fn reset_all_sessions(&self) {
        let mut sessions = lock(&self.sessions);
        let n = sessions.len();
        sessions.clear();
        info!("Reset {} sessions", n);
    }
}
