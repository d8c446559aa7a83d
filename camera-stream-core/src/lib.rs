//! # camera-stream-core
//!
//! Platform-agnostic stream-session manager for a camera accessory.
//!
//! Translates controller-negotiated session parameters (endpoints, keys,
//! codec settings) into external media-encoder invocations, tracks each
//! encoder process's lifecycle, and coordinates shared access to one
//! physical camera across concurrent streams and snapshots. Platform
//! backends (Unix ffmpeg in `camera-stream-unix`) implement the
//! `Transcoder` trait and plug into the generic `SessionRegistry`.
//!
//! ## Architecture
//!
//! ```text
//! camera-stream-core (this crate)
//! ├── traits/       ← Transcoder, TranscoderProcess
//! ├── models/       ← StreamError, StreamId, negotiated params, config, snapshot
//! ├── command       ← CommandBuilder (pure parameter → argument translation)
//! ├── process       ← StreamProcess lifecycle state machine
//! ├── loopback      ← LoopbackCoordinator (shared-device bridge)
//! ├── capture       ← SnapshotCapturer (one-shot frame grab)
//! └── session       ← SessionRegistry (coarse-locked coordinator)
//! ```

pub mod capture;
pub mod command;
pub mod loopback;
pub mod models;
pub mod process;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use capture::SnapshotCapturer;
pub use command::CommandBuilder;
pub use loopback::LoopbackCoordinator;
pub use models::config::{CaptureBackend, StreamConfiguration};
pub use models::error::StreamError;
pub use models::params::{
    AudioCodec, AudioParameters, ControllerAddr, H264Level, H264Profile, IpVersion,
    RtpParameters, SetupRequest, SetupResponse, SrtpKeys, VideoAttributes, VideoCodec,
    VideoCodecParameters, VideoParameters,
};
pub use models::snapshot::Snapshot;
pub use models::state::ProcessState;
pub use models::stream_id::StreamId;
pub use process::StreamProcess;
pub use session::{ReconfigureOutcome, SessionRegistry};
pub use traits::transcoder::{Transcoder, TranscoderProcess};
