/// Encoder process state machine.
///
/// State transitions:
/// ```text
/// idle → running ⇄ suspended
///          ↓          ↓
///        stopped ← ──┘
/// ```
/// A failed spawn moves `idle → failed`; both `stopped` and `failed` are
/// terminal, the process is never restarted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
    Idle,
    Running,
    Suspended,
    Stopped,
    Failed,
}

impl ProcessState {
    /// Whether an external encoder process is attached and alive.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Suspended)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }
}
