//! # camera-stream-unix
//!
//! Unix (Linux/macOS) ffmpeg backend for camera-stream-kit.
//!
//! Provides:
//! - `FfmpegTranscoder` — spawns the external `ffmpeg` encoder for streams,
//!   snapshots, and loopback bridges
//! - `SignalControlledProcess` — pause/resume/terminate a running encoder
//!   via POSIX signals (`SIGSTOP`/`SIGCONT`/`SIGINT`)
//! - `platform` — per-OS default configuration resolved once at startup
//!
//! ## Platform Requirements
//! - An `ffmpeg` binary on PATH (or set via `FfmpegTranscoder::with_binary`)
//! - Linux: `v4l2loopback` for the shared capture device
//!
//! ## Usage
//! ```ignore
//! use camera_stream_core::SessionRegistry;
//! use camera_stream_unix::{platform, FfmpegTranscoder};
//!
//! let config = platform::default_configuration();
//! let transcoder = FfmpegTranscoder::new(&config);
//! let registry = SessionRegistry::new(config, transcoder).unwrap();
//! ```

#[cfg(unix)]
pub mod ffmpeg;
#[cfg(unix)]
pub mod platform;
#[cfg(unix)]
pub mod process;

#[cfg(unix)]
pub use ffmpeg::FfmpegTranscoder;
#[cfg(unix)]
pub use process::SignalControlledProcess;
