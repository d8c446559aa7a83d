//! Lifecycle state machine around one external encoder invocation.

use crate::models::error::StreamError;
use crate::models::state::ProcessState;
use crate::traits::transcoder::{Transcoder, TranscoderProcess};

/// One external encoder invocation and its lifecycle.
///
/// The state machine (see [`ProcessState`]) is the portable contract;
/// the actual pause/resume/terminate mechanics live behind
/// [`TranscoderProcess`]. Control-signal failures on a live process are
/// logged and swallowed — only spawn failures surface to the caller.
pub struct StreamProcess {
    state: ProcessState,
    handle: Option<Box<dyn TranscoderProcess>>,
}

impl StreamProcess {
    pub fn new() -> Self {
        Self {
            state: ProcessState::Idle,
            handle: None,
        }
    }

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    /// Whether an encoder process is attached (running or suspended).
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Spawn the encoder. Transitions: idle → running.
    ///
    /// A failed spawn is terminal: the process moves to `failed` and is
    /// never retried through this handle.
    pub fn start(
        &mut self,
        transcoder: &dyn Transcoder,
        args: &[String],
    ) -> Result<(), StreamError> {
        if self.state != ProcessState::Idle {
            return Err(StreamError::SpawnFailed(format!(
                "cannot start from {:?} state",
                self.state
            )));
        }

        log::debug!("starting encoder: {}", args.join(" "));
        match transcoder.spawn(args) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = ProcessState::Running;
                Ok(())
            }
            Err(e) => {
                self.state = ProcessState::Failed;
                Err(e)
            }
        }
    }

    /// Send the pause control signal. Transitions: running → suspended.
    ///
    /// Fire-and-forget: no acknowledgment from the process is awaited.
    pub fn suspend(&mut self) {
        if self.state != ProcessState::Running {
            log::debug!("suspend ignored in {:?} state", self.state);
            return;
        }

        if let Some(handle) = &mut self.handle {
            if let Err(e) = handle.pause() {
                log::warn!("pause signal failed: {e}");
            }
        }
        self.state = ProcessState::Suspended;
    }

    /// Send the continue control signal. Transitions: suspended → running.
    pub fn resume(&mut self) {
        if self.state != ProcessState::Suspended {
            log::debug!("resume ignored in {:?} state", self.state);
            return;
        }

        if let Some(handle) = &mut self.handle {
            if let Err(e) = handle.resume() {
                log::warn!("continue signal failed: {e}");
            }
        }
        self.state = ProcessState::Running;
    }

    /// Interrupt the process and block until it exits.
    /// Transitions: running/suspended → stopped.
    ///
    /// No timeout is applied — an unresponsive encoder stalls the caller
    /// indefinitely.
    pub fn stop(&mut self) {
        if !self.state.is_active() {
            log::debug!("stop ignored in {:?} state", self.state);
            return;
        }

        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.interrupt() {
                log::warn!("interrupt signal failed: {e}");
            }
            if let Err(e) = handle.wait() {
                log::warn!("waiting for encoder exit failed: {e}");
            }
        }
        self.state = ProcessState::Stopped;
    }

    /// Accepted in any state; mid-stream reconfiguration is not supported
    /// and nothing changes beyond this log line.
    pub fn reconfigure(&self) {
        log::debug!("reconfigure requested in {:?} state; not supported", self.state);
    }
}

impl Default for StreamProcess {
    fn default() -> Self {
        Self::new()
    }
}
