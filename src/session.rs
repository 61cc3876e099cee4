use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

/// How a child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReport { Exited(i32), Signaled(i32) }

impl ExitReport {
    /// Final report for a wait status, `None` for stop/continue/still-alive transitions.
    pub fn from_wait_status(ws: WaitStatus) -> Option<Self> {
        match ws {
            WaitStatus::Exited(_, code) => Some(ExitReport::Exited(code)),
            WaitStatus::Signaled(_, sig, _) => Some(ExitReport::Signaled(sig as i32)),
            _ => None,
        }
    }

    /// Shell-style process exit code (128 + signal for signal deaths).
    pub fn code(&self) -> i32 {
        match *self { ExitReport::Exited(c) => c, ExitReport::Signaled(s) => 128 + s }
    }
}

impl Default for ExitReport {
    fn default() -> Self { ExitReport::Exited(0) }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReport::Exited(c) => write!(f, "exit status {c}"),
            ExitReport::Signaled(s) => write!(f, "terminated by signal {s}"),
        }
    }
}

/// Handle on the flag deciding whether a trailing `&` is honored.
///
/// The flag itself must be `'static` because the SIGTSTP handler flips it.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundGate { flag: &'static AtomicBool }

impl BackgroundGate {
    pub fn new(flag: &'static AtomicBool) -> Self { BackgroundGate { flag } }
    /// A gate not wired to any signal handler, starting in the given state.
    pub fn detached(admitted: bool) -> Self { BackgroundGate { flag: Box::leak(Box::new(AtomicBool::new(admitted))) } }
    pub fn admitted(&self) -> bool { self.flag.load(Ordering::SeqCst) }
    pub fn set(&self, admitted: bool) { self.flag.store(admitted, Ordering::SeqCst) }
}

#[derive(Debug)]
pub struct SessionState {
    last_foreground: ExitReport,
    gate: BackgroundGate,
    pid: Pid,
}

impl SessionState {
    pub fn new(pid: Pid, gate: BackgroundGate) -> Self {
        SessionState { last_foreground: ExitReport::default(), gate, pid }
    }
    pub fn pid(&self) -> Pid { self.pid }
    pub fn gate(&self) -> BackgroundGate { self.gate }
    pub fn last_foreground(&self) -> ExitReport { self.last_foreground }
    /// Only foreground waits call this; background completions are reported, never recorded.
    pub fn record_foreground(&mut self, report: ExitReport) { self.last_foreground = report; }
}
