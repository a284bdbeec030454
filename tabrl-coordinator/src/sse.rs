//! Server-Sent Events chunks.
use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// A chunk of an event stream.
///
/// The [`Display`](fmt::Display) implementation writes the wire format, i.e.
/// `data: <json>\n\n` or the comment `: keep-alive\n\n`.
#[derive(Clone, Debug, PartialEq)]
pub enum SseChunk {
    /// A JSON payload.
    Data(String),

    /// Sent while no event is available, to keep the connection open.
    KeepAlive,
}

impl SseChunk {
    /// Serializes `payload` into a data chunk.
    pub fn data<T: Serialize>(payload: &T) -> Result<Self> {
        Ok(Self::Data(serde_json::to_string(payload)?))
    }

    /// The JSON payload, `None` for keep-alive chunks.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Data(json) => Some(json),
            Self::KeepAlive => None,
        }
    }
}

impl fmt::Display for SseChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(json) => write!(f, "data: {}\n\n", json),
            Self::KeepAlive => write!(f, ": keep-alive\n\n"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TrainingEvent;

    #[test]
    fn test_wire_format() {
        let chunk = SseChunk::data(&TrainingEvent::Complete {
            message: "done".to_string(),
        })
        .unwrap();
        assert_eq!(
            chunk.to_string(),
            "data: {\"status\":\"complete\",\"message\":\"done\"}\n\n"
        );
        assert_eq!(SseChunk::KeepAlive.to_string(), ": keep-alive\n\n");
        assert_eq!(SseChunk::KeepAlive.payload(), None);
    }
}
