//! Loopback bridge that multiplexes one physical camera.
//!
//! Some capture APIs grant exclusive device access, so a live stream and an
//! on-demand snapshot cannot read the camera at the same time. The bridge
//! copies frames from the physical device into a virtual loopback device
//! that does allow concurrent readers; streams and snapshots then consume
//! the loopback path instead.

use crate::command::CommandBuilder;
use crate::models::error::StreamError;
use crate::traits::transcoder::{Transcoder, TranscoderProcess};

/// Runs the physical→virtual bridge process on demand.
///
/// Owned by the session registry, which only calls [`stop`] after it has
/// recomputed, under its lock, that no session is active and no snapshot is
/// in flight. The bridge itself never decides when to shut down.
///
/// [`stop`]: LoopbackCoordinator::stop
pub struct LoopbackCoordinator {
    capture_api: String,
    input_filename: String,
    loopback_filename: String,
    bridge: Option<Box<dyn TranscoderProcess>>,
}

impl LoopbackCoordinator {
    pub fn new(
        capture_api: impl Into<String>,
        input_filename: impl Into<String>,
        loopback_filename: impl Into<String>,
    ) -> Self {
        Self {
            capture_api: capture_api.into(),
            input_filename: input_filename.into(),
            loopback_filename: loopback_filename.into(),
            bridge: None,
        }
    }

    /// Whether the bridge process is currently attached.
    pub fn is_running(&self) -> bool {
        self.bridge.is_some()
    }

    /// Start the bridge. Safe to call when already running (no-op).
    pub fn start(&mut self, transcoder: &dyn Transcoder) -> Result<(), StreamError> {
        if self.bridge.is_some() {
            return Ok(());
        }

        let args = CommandBuilder::bridge_args(
            &self.capture_api,
            &self.input_filename,
            &self.loopback_filename,
        );
        log::info!(
            "starting loopback bridge {} -> {}",
            self.input_filename,
            self.loopback_filename
        );

        let process = transcoder.spawn(&args).map_err(|e| {
            StreamError::LoopbackUnavailable(format!(
                "bridge to {} failed: {e}",
                self.loopback_filename
            ))
        })?;
        self.bridge = Some(process);
        Ok(())
    }

    /// Tear the bridge down and wait for it to exit.
    pub fn stop(&mut self) {
        let Some(mut process) = self.bridge.take() else {
            return;
        };

        log::info!("stopping loopback bridge {}", self.loopback_filename);
        if let Err(e) = process.interrupt() {
            log::warn!("interrupting loopback bridge failed: {e}");
        }
        if let Err(e) = process.wait() {
            log::warn!("waiting for loopback bridge exit failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct NullProcess;

    impl TranscoderProcess for NullProcess {
        fn pause(&mut self) -> Result<(), StreamError> {
            Ok(())
        }
        fn resume(&mut self) -> Result<(), StreamError> {
            Ok(())
        }
        fn interrupt(&mut self) -> Result<(), StreamError> {
            Ok(())
        }
        fn wait(&mut self) -> Result<(), StreamError> {
            Ok(())
        }
    }

    struct CountingTranscoder {
        spawns: Arc<AtomicUsize>,
    }

    impl Transcoder for CountingTranscoder {
        fn spawn(&self, _args: &[String]) -> Result<Box<dyn TranscoderProcess>, StreamError> {
            self.spawns.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NullProcess))
        }

        fn capture_frame(&self, _args: &[String], _out: &Path) -> Result<Vec<u8>, StreamError> {
            Err(StreamError::SnapshotFailed("not a snapshot backend".into()))
        }
    }

    #[test]
    fn start_is_idempotent() {
        let spawns = Arc::new(AtomicUsize::new(0));
        let transcoder = CountingTranscoder {
            spawns: Arc::clone(&spawns),
        };
        let mut loopback = LoopbackCoordinator::new("v4l2", "/dev/video0", "/dev/video99");

        loopback.start(&transcoder).unwrap();
        loopback.start(&transcoder).unwrap();
        loopback.start(&transcoder).unwrap();

        assert!(loopback.is_running());
        assert_eq!(spawns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_then_start_spawns_again() {
        let spawns = Arc::new(AtomicUsize::new(0));
        let transcoder = CountingTranscoder {
            spawns: Arc::clone(&spawns),
        };
        let mut loopback = LoopbackCoordinator::new("v4l2", "/dev/video0", "/dev/video99");

        loopback.start(&transcoder).unwrap();
        loopback.stop();
        assert!(!loopback.is_running());

        loopback.start(&transcoder).unwrap();
        assert_eq!(spawns.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stop_without_start_is_a_noop() {
        let mut loopback = LoopbackCoordinator::new("v4l2", "/dev/video0", "/dev/video99");
        loopback.stop();
        assert!(!loopback.is_running());
    }
}
