//! One-shot still-frame capture.

use std::path::PathBuf;

use crate::command::CommandBuilder;
use crate::models::config::StreamConfiguration;
use crate::models::error::StreamError;
use crate::models::snapshot::Snapshot;
use crate::traits::transcoder::Transcoder;

/// Captures single frames by running the encoder to completion.
///
/// Reads from the same (possibly loopback) input as live streams, so the
/// registry brackets every capture with the loopback start/teardown
/// protocol. The call blocks for the duration of the external process.
pub struct SnapshotCapturer {
    builder: CommandBuilder,
}

impl SnapshotCapturer {
    pub fn new(config: &StreamConfiguration) -> Self {
        Self {
            builder: CommandBuilder::from_configuration(config),
        }
    }

    /// Grab one frame at the requested dimensions.
    pub fn capture(
        &self,
        transcoder: &dyn Transcoder,
        width: u32,
        height: u32,
    ) -> Result<Snapshot, StreamError> {
        let output = temp_output();
        let args = self.builder.snapshot_args(width, height, &output);

        log::debug!("capturing snapshot to {}", output.display());
        let data = transcoder.capture_frame(&args, &output)?;
        Ok(Snapshot::new(data, width, height))
    }
}

/// Unique temp path so concurrent captures never clobber each other.
fn temp_output() -> PathBuf {
    std::env::temp_dir().join(format!("snapshot_{}.jpg", uuid::Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::traits::transcoder::TranscoderProcess;

    struct RecordingTranscoder {
        outputs: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl Transcoder for RecordingTranscoder {
        fn spawn(&self, _args: &[String]) -> Result<Box<dyn TranscoderProcess>, StreamError> {
            Err(StreamError::SpawnFailed("snapshot-only".into()))
        }

        fn capture_frame(&self, args: &[String], out: &Path) -> Result<Vec<u8>, StreamError> {
            assert_eq!(args.last().unwrap(), &out.to_string_lossy());
            self.outputs.lock().push(out.to_path_buf());
            Ok(vec![0xFF, 0xD8, 0xFF])
        }
    }

    #[test]
    fn capture_returns_frame_bytes_and_dimensions() {
        let transcoder = RecordingTranscoder {
            outputs: Arc::new(Mutex::new(Vec::new())),
        };
        let capturer = SnapshotCapturer::new(&StreamConfiguration::default());

        let shot = capturer.capture(&transcoder, 320, 240).unwrap();
        assert_eq!(shot.data, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!((shot.width, shot.height), (320, 240));
    }

    #[test]
    fn each_capture_uses_a_fresh_temp_file() {
        let outputs = Arc::new(Mutex::new(Vec::new()));
        let transcoder = RecordingTranscoder {
            outputs: Arc::clone(&outputs),
        };
        let capturer = SnapshotCapturer::new(&StreamConfiguration::default());

        capturer.capture(&transcoder, 320, 240).unwrap();
        capturer.capture(&transcoder, 320, 240).unwrap();

        let outputs = outputs.lock();
        assert_ne!(outputs[0], outputs[1]);
    }
}
