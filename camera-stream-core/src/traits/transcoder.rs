use std::path::Path;

use crate::models::error::StreamError;

/// Control handle over one running encoder process.
///
/// Implemented per platform (Unix backends use POSIX signals). Pause and
/// resume are fire-and-forget: no acknowledgment from the process is
/// awaited, the portable state machine in [`crate::process::StreamProcess`]
/// is the source of truth for what was requested.
pub trait TranscoderProcess: Send {
    /// Ask the process to pause producing output.
    fn pause(&mut self) -> Result<(), StreamError>;

    /// Ask a paused process to continue.
    fn resume(&mut self) -> Result<(), StreamError>;

    /// Ask the process to shut down cleanly.
    fn interrupt(&mut self) -> Result<(), StreamError>;

    /// Block until the process exits. No timeout is applied — an
    /// unresponsive process stalls the caller indefinitely.
    fn wait(&mut self) -> Result<(), StreamError>;
}

/// Interface to the external media encoder.
///
/// Implemented by platform backends (e.g. `FfmpegTranscoder` in
/// `camera-stream-unix`) and by in-memory mocks in tests. The core never
/// spawns a process directly; every invocation goes through this seam with
/// an argument list built by [`crate::command::CommandBuilder`].
pub trait Transcoder: Send + Sync {
    /// Launch a long-running encoder invocation.
    fn spawn(&self, args: &[String]) -> Result<Box<dyn TranscoderProcess>, StreamError>;

    /// Run a one-shot invocation to completion and return the bytes it
    /// wrote to `output`. Blocks the caller for the process duration.
    fn capture_frame(&self, args: &[String], output: &Path) -> Result<Vec<u8>, StreamError>;
}
