//! Streaming of training progress.
use crate::{
    messages::StreamMessage, CoordinatorConfig, PolicyReplayEvent, SseChunk, TrainingCoordinator,
    TrainingEvent,
};
use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tabrl_core::{EpisodeResult, Frame};

const COMPLETE_MESSAGE: &str = "Training completed successfully";

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs the training of a session on a worker thread and yields its progress as
/// [`SseChunk`]s.
///
/// ```mermaid
/// sequenceDiagram
///     participant C as Client
///     participant S as TrainingStream
///     participant W as Worker thread
///     S->>W: spawn
///     loop every episode
///         W->>S: TrainingEvent::Training
///         S->>C: data chunk
///     end
///     W->>S: TrainingEvent::Complete or Error
///     S->>C: data chunk
///     W->>S: end marker
/// ```
///
/// While no message arrives within the keep-alive interval the stream yields
/// [`SseChunk::KeepAlive`]. Events arrive in the order of the episodes and
/// exactly one terminal event, [`TrainingEvent::Complete`] or
/// [`TrainingEvent::Error`], is sent last on every path. The iteration ends after
/// the end marker, or when the worker is gone.
///
/// Dropping the stream does not stop training: the worker logs a warning and
/// finishes the run, leaving the session in a final status.
pub struct TrainingStream {
    receiver: Receiver<StreamMessage>,
    keep_alive_interval: Duration,
    handle: Option<JoinHandle<()>>,
    finished: bool,
}

impl TrainingStream {
    /// Starts training the session on a new thread.
    ///
    /// The number of episodes is the `num_episodes` parameter of the session,
    /// or [`CoordinatorConfig::default_num_episodes`] if absent.
    ///
    /// Fails with [`TabrlError::SessionNotFound`](tabrl_core::TabrlError) for an
    /// unknown id. Errors of the training itself are reported in the stream.
    pub fn spawn(
        coordinator: Arc<TrainingCoordinator>,
        session_id: &str,
        config: &CoordinatorConfig,
    ) -> Result<Self> {
        let session = coordinator.get_session(session_id)?;
        let num_episodes = session
            .parameters
            .usize_or("num_episodes", config.default_num_episodes)?;

        let (sender, receiver) = unbounded();
        let id = session.id;
        let handle = thread::spawn(move || {
            Self::run(&coordinator, &id, num_episodes, sender);
        });
        info!("Spawned training thread for session {}", session_id);

        Ok(Self {
            receiver,
            keep_alive_interval: config.keep_alive_interval(),
            handle: Some(handle),
            finished: false,
        })
    }

    /// Body of the worker thread.
    fn run(
        coordinator: &TrainingCoordinator,
        id: &str,
        num_episodes: usize,
        sender: Sender<StreamMessage>,
    ) {
        let mut connected = true;
        let result = coordinator.train(id, num_episodes, &mut |r: EpisodeResult| {
            if !connected {
                return Ok(());
            }
            let event = TrainingEvent::Training {
                episode: r.episode,
                reward: r.reward,
                learning_data: r.learning_data,
                frame: r.frame.to_base64_png()?,
            };
            if sender.send(StreamMessage::Event(event)).is_err() {
                warn!(
                    "Stream of session {} was closed at episode {}, training continues",
                    id, r.episode
                );
                connected = false;
            }
            Ok(())
        });

        let last = match result {
            Ok(()) => TrainingEvent::Complete {
                message: COMPLETE_MESSAGE.to_string(),
            },
            Err(e) => TrainingEvent::Error {
                message: e.to_string(),
            },
        };
        // Sending fails only if the stream is gone
        let _ = sender.send(StreamMessage::Event(last));
        let _ = sender.send(StreamMessage::End);
    }

    /// Waits for the worker thread to finish.
    pub fn join(mut self) -> Result<()> {
        match self.handle.take() {
            Some(h) => h
                .join()
                .map_err(|_| anyhow!("training thread panicked")),
            None => Ok(()),
        }
    }
}

/// Serializes an event into a data chunk. On failure, returns a chunk with a
/// [`TrainingEvent::Error`] payload, after which the stream must end.
fn event_chunk<T: Serialize>(event: &T) -> std::result::Result<SseChunk, SseChunk> {
    SseChunk::data(event).map_err(|e| {
        error!("Failed to serialize training event: {}", e);
        let payload = json!({
            "status": "error",
            "message": format!("failed to serialize training event: {}", e),
        });
        SseChunk::Data(payload.to_string())
    })
}

impl Iterator for TrainingStream {
    type Item = SseChunk;

    fn next(&mut self) -> Option<SseChunk> {
        if self.finished {
            return None;
        }

        match self.receiver.recv_timeout(self.keep_alive_interval) {
            Ok(StreamMessage::Event(event)) => match event_chunk(&event) {
                Ok(chunk) => Some(chunk),
                Err(chunk) => {
                    self.finished = true;
                    Some(chunk)
                }
            },
            Err(RecvTimeoutError::Timeout) => Some(SseChunk::KeepAlive),
            Ok(StreamMessage::End) | Err(RecvTimeoutError::Disconnected) => {
                self.finished = true;
                None
            }
        }
    }
}

/// Replays the policy of a session and packs all frames into one event.
///
/// Failures, including an unknown session id, are reported as
/// [`PolicyReplayEvent::Error`].
pub fn replay_policy_event(coordinator: &TrainingCoordinator, session_id: &str) -> PolicyReplayEvent {
    let frames = coordinator.run_policy(session_id, None).and_then(|frames| {
        frames
            .iter()
            .map(Frame::to_base64_png)
            .collect::<Result<Vec<_>>>()
    });
    match frames {
        Ok(frames) => PolicyReplayEvent::Complete {
            num_frames: frames.len(),
            frames,
        },
        Err(e) => {
            error!("Replay of session {} failed: {}", session_id, e);
            PolicyReplayEvent::Error {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::ser::{Error as _, Serializer};

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_serialization_failure_ends_the_stream() {
        let (sender, receiver) = unbounded();
        let mut stream = TrainingStream {
            receiver,
            keep_alive_interval: Duration::from_millis(10),
            handle: None,
            finished: false,
        };
        let chunk = event_chunk(&Unserializable).unwrap_err();
        let event: TrainingEvent = serde_json::from_str(chunk.payload().unwrap()).unwrap();
        match event {
            TrainingEvent::Error { message } => assert!(message.contains("not representable")),
            e => panic!("unexpected event: {:?}", e),
        }

        sender
            .send(StreamMessage::Event(TrainingEvent::Complete {
                message: COMPLETE_MESSAGE.to_string(),
            }))
            .unwrap();
        assert!(stream.next().unwrap().payload().is_some());
        assert_eq!(stream.next(), Some(SseChunk::KeepAlive));
        drop(sender);
        assert_eq!(stream.next(), None);
        assert!(stream.join().is_ok());
    }
}
