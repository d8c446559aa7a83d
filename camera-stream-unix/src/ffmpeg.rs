//! ffmpeg invocation backend.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use camera_stream_core::models::config::StreamConfiguration;
use camera_stream_core::models::error::StreamError;
use camera_stream_core::traits::transcoder::{Transcoder, TranscoderProcess};

use crate::process::SignalControlledProcess;

/// Runs the `ffmpeg` binary for streams, snapshots, and loopback bridges.
///
/// Encoder output is discarded unless the configuration's verbose switch is
/// set, in which case stdout/stderr pass through for diagnosis.
pub struct FfmpegTranscoder {
    binary: String,
    verbose: bool,
}

impl FfmpegTranscoder {
    pub fn new(config: &StreamConfiguration) -> Self {
        Self {
            binary: "ffmpeg".into(),
            verbose: config.verbose_encoder_output,
        }
    }

    /// Use a different encoder binary (e.g. a pinned build outside PATH).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.binary);
        command.args(args).stdin(Stdio::null());
        if self.verbose {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command
    }
}

impl Transcoder for FfmpegTranscoder {
    fn spawn(&self, args: &[String]) -> Result<Box<dyn TranscoderProcess>, StreamError> {
        log::debug!("spawning {} {}", self.binary, args.join(" "));
        let child = self
            .command(args)
            .spawn()
            .map_err(|e| StreamError::SpawnFailed(format!("{}: {e}", self.binary)))?;
        Ok(Box::new(SignalControlledProcess::new(child)))
    }

    fn capture_frame(&self, args: &[String], output: &Path) -> Result<Vec<u8>, StreamError> {
        log::debug!("capturing {} {}", self.binary, args.join(" "));
        let status = self
            .command(args)
            .status()
            .map_err(|e| StreamError::SpawnFailed(format!("{}: {e}", self.binary)))?;

        if !status.success() {
            let _ = fs::remove_file(output);
            return Err(StreamError::SnapshotFailed(format!(
                "encoder exited with {status}"
            )));
        }

        let data = fs::read(output).map_err(|e| {
            StreamError::SnapshotFailed(format!("reading {}: {e}", output.display()))
        })?;
        let _ = fs::remove_file(output);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcoder(binary: &str) -> FfmpegTranscoder {
        FfmpegTranscoder::new(&StreamConfiguration::default()).with_binary(binary)
    }

    #[test]
    fn missing_binary_reports_spawn_failure() {
        let err = transcoder("definitely-not-an-encoder")
            .spawn(&[])
            .err()
            .unwrap();
        assert!(matches!(err, StreamError::SpawnFailed(_)));
    }

    #[test]
    fn capture_frame_reads_and_removes_the_output_file() {
        let output = std::env::temp_dir().join("camera-stream-unix-capture-test.jpg");
        fs::write(&output, [0xFF, 0xD8]).unwrap();

        // `true` stands in for an encoder run that already wrote the file.
        let data = transcoder("true").capture_frame(&[], &output).unwrap();
        assert_eq!(data, vec![0xFF, 0xD8]);
        assert!(!output.exists());
    }

    #[test]
    fn failing_invocation_reports_snapshot_failure() {
        let output = std::env::temp_dir().join("camera-stream-unix-missing.jpg");
        let err = transcoder("false").capture_frame(&[], &output).err().unwrap();
        assert!(matches!(err, StreamError::SnapshotFailed(_)));
    }
}
