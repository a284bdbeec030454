//! Messages sent to clients.
use serde::{Deserialize, Serialize};
use tabrl_core::LearningData;

/// Event of a training stream.
///
/// Serialized with a `status` field, `"training"`, `"complete"` or `"error"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TrainingEvent {
    /// Result of a training episode.
    Training {
        /// Index of the episode, starting at 0.
        episode: usize,

        /// Sum of rewards in the episode.
        reward: f64,

        /// Learned values after the episode.
        learning_data: LearningData,

        /// Base64 PNG of the frame rendered after the episode.
        frame: String,
    },

    /// Training finished normally.
    Complete {
        /// Human readable message.
        message: String,
    },

    /// Training failed.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl TrainingEvent {
    /// Returns `true` for [`TrainingEvent::Complete`] and [`TrainingEvent::Error`].
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Training { .. })
    }
}

/// Result of a policy replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PolicyReplayEvent {
    /// All frames of the replayed episode.
    Complete {
        /// Base64 PNG frames in order.
        frames: Vec<String>,

        /// The number of frames.
        num_frames: usize,
    },

    /// The replay failed.
    Error {
        /// Description of the failure.
        message: String,
    },
}

/// Messages from a training thread to its stream.
pub(crate) enum StreamMessage {
    /// An event to be forwarded to the client.
    Event(TrainingEvent),

    /// No more messages follow.
    End,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_training_event_json() {
        let event = TrainingEvent::Training {
            episode: 3,
            reward: 1.0,
            learning_data: LearningData {
                value_table: vec![vec![0.5, 0.0]],
            },
            frame: "iVBORw0KGgo".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "status": "training",
                "episode": 3,
                "reward": 1.0,
                "learning_data": {"value_table": [[0.5, 0.0]]},
                "frame": "iVBORw0KGgo",
            })
        );
        assert!(!event.is_terminal());

        let event = TrainingEvent::Error {
            message: "boom".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"status": "error", "message": "boom"})
        );
        assert!(event.is_terminal());
    }

    #[test]
    fn test_policy_replay_event_json() {
        let event = PolicyReplayEvent::Complete {
            frames: vec!["a".to_string(), "b".to_string()],
            num_frames: 2,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"status": "complete", "frames": ["a", "b"], "num_frames": 2})
        );
    }
}
