use std::time::Instant;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, info, warn};
use crate::error::{Result, ShellError};
use crate::session::ExitReport;

/// Concurrent background jobs a session can track.
pub const MAX_BACKGROUND_JOBS: usize = 500;

#[derive(Debug, Clone, Copy)]
pub struct Job { pub pid: Pid, pub admitted: Instant }

/// A background job observed to have terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion { pub pid: Pid, pub report: ExitReport }

impl std::fmt::Display for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "background pid {} is done: {}", self.pid, self.report)
    }
}

/// Fixed-capacity arena of background jobs; freed slots are reused by index.
#[derive(Debug)]
pub struct JobTable { slots: Vec<Option<Job>>, capacity: usize, live: usize }

impl JobTable {
    pub fn with_capacity(capacity: usize) -> Self { JobTable { slots: Vec::new(), capacity, live: 0 } }
    pub fn capacity(&self) -> usize { self.capacity }
    pub fn len(&self) -> usize { self.live }
    pub fn is_empty(&self) -> bool { self.live == 0 }
    pub fn is_full(&self) -> bool { self.live >= self.capacity }
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ { self.slots.iter().flatten().map(|j| j.pid) }
    pub fn contains(&self, pid: Pid) -> bool { self.pids().any(|p| p == pid) }

    /// Fails before anything is forked when the table cannot take another job.
    pub fn ensure_room(&self) -> Result<()> {
        if self.is_full() { return Err(ShellError::JobTableFull { capacity: self.capacity }); }
        Ok(())
    }

    /// Track `pid`, returning its slot index.
    pub fn register(&mut self, pid: Pid) -> Result<usize> {
        self.ensure_room()?;
        let job = Job { pid, admitted: Instant::now() };
        let slot = match self.slots.iter().position(|s| s.is_none()) {
            Some(i) => { self.slots[i] = Some(job); i }
            None => { self.slots.push(Some(job)); self.slots.len() - 1 }
        };
        self.live += 1;
        info!(pid = pid.as_raw(), slot, "background job admitted");
        Ok(slot)
    }

    /// Non-blocking check of every tracked job; finished ones are reaped and removed.
    ///
    /// A wait failure stops the scan and leaves the failing job tracked. Jobs
    /// already reaped in this pass are still returned; the failure surfaces as
    /// `WaitFailed` on the next poll that reaps nothing before reaching it.
    pub fn poll(&mut self) -> Result<Vec<Completion>> {
        let mut done = Vec::new();
        for slot in self.slots.iter_mut() {
            let Some(job) = *slot else { continue };
            let ws = match waitpid(job.pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(ws) => ws,
                Err(Errno::EINTR) => continue,
                Err(e) if done.is_empty() => return Err(ShellError::WaitFailed(e)),
                Err(e) => {
                    warn!(pid = job.pid.as_raw(), error = %e, "wait failed; returning jobs reaped so far");
                    break;
                }
            };
            if let WaitStatus::StillAlive = ws { continue; }
            let Some(report) = ExitReport::from_wait_status(ws) else { continue };
            *slot = None;
            self.live -= 1;
            debug!(pid = job.pid.as_raw(), elapsed_ms = job.admitted.elapsed().as_millis() as u64, %report, "background job reaped");
            done.push(Completion { pid: job.pid, report });
        }
        Ok(done)
    }

    /// Send `sig` to every tracked job. Best effort; delivery failures are only logged.
    pub fn signal_all(&self, sig: Signal) -> usize {
        let mut sent = 0;
        for pid in self.pids() {
            match kill(pid, sig) {
                Ok(()) => sent += 1,
                Err(e) => warn!(pid = pid.as_raw(), error = %e, "could not signal background job"),
            }
        }
        sent
    }
}

impl Default for JobTable {
    fn default() -> Self { JobTable::with_capacity(MAX_BACKGROUND_JOBS) }
}
