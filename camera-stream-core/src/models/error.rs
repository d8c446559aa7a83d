use thiserror::Error;

use super::params::VideoCodec;
use super::stream_id::StreamId;

/// Errors that can occur while managing stream sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream session {0} not found")]
    SessionNotFound(StreamId),

    #[error("failed to launch encoder: {0}")]
    SpawnFailed(String),

    #[error("unsupported video codec: {0:?}")]
    UnsupportedCodec(VideoCodec),

    #[error("process control failed: {0}")]
    ControlFailed(String),

    #[error("loopback device unavailable: {0}")]
    LoopbackUnavailable(String),

    #[error("snapshot capture failed: {0}")]
    SnapshotFailed(String),

    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),
}
