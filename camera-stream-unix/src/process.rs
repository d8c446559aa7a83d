//! Signal-based control over a spawned encoder process.

use std::process::Child;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use camera_stream_core::models::error::StreamError;
use camera_stream_core::traits::transcoder::TranscoderProcess;

/// `TranscoderProcess` over a POSIX child process.
///
/// Pause and resume map to `SIGSTOP`/`SIGCONT`, clean shutdown to `SIGINT`
/// so the encoder can flush its output. The signals are fire-and-forget;
/// only `wait` observes the process again.
pub struct SignalControlledProcess {
    child: Child,
}

impl SignalControlledProcess {
    pub fn new(child: Child) -> Self {
        Self { child }
    }

    fn signal(&self, signal: Signal) -> Result<(), StreamError> {
        let pid = Pid::from_raw(self.child.id() as i32);
        kill(pid, signal)
            .map_err(|e| StreamError::ControlFailed(format!("{signal:?} to pid {pid}: {e}")))
    }
}

impl TranscoderProcess for SignalControlledProcess {
    fn pause(&mut self) -> Result<(), StreamError> {
        self.signal(Signal::SIGSTOP)
    }

    fn resume(&mut self) -> Result<(), StreamError> {
        self.signal(Signal::SIGCONT)
    }

    fn interrupt(&mut self) -> Result<(), StreamError> {
        self.signal(Signal::SIGINT)
    }

    fn wait(&mut self) -> Result<(), StreamError> {
        let status = self
            .child
            .wait()
            .map_err(|e| StreamError::ControlFailed(format!("wait failed: {e}")))?;
        log::debug!("encoder pid {} exited with {status}", self.child.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use super::*;

    #[test]
    fn interrupt_terminates_a_sleeping_process() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let mut process = SignalControlledProcess::new(child);

        process.interrupt().unwrap();
        // Returns promptly because SIGINT terminates sleep.
        process.wait().unwrap();
    }

    #[test]
    fn pause_and_resume_deliver_signals() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let mut process = SignalControlledProcess::new(child);

        process.pause().unwrap();
        process.resume().unwrap();
        process.interrupt().unwrap();
        process.wait().unwrap();
    }

    #[test]
    fn signaling_an_exited_process_reports_control_failure() {
        let child = Command::new("true").spawn().unwrap();
        let mut process = SignalControlledProcess::new(child);
        process.wait().unwrap();

        assert!(matches!(
            process.pause(),
            Err(StreamError::ControlFailed(_))
        ));
    }
}
