use std::fmt::Display;
use std::io::Write;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tracing::{debug, info, warn};
use crate::builtins::{self, Builtin};
use crate::config::{Config, ConfigError};
use crate::error::Result;
use crate::expand::expand_pid;
use crate::jobs::{Completion, JobTable};
use crate::launch::{self, Prepared};
use crate::parse::{self, Command, ExecMode};
use crate::session::{BackgroundGate, ExitReport, SessionState};

/// What the prompt loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow { Continue, Exit(i32) }

/// One interactive session: state, background jobs and the sink notices go to.
pub struct Shell<W: Write> {
    session: SessionState,
    jobs: JobTable,
    config: Config,
    exit_signal: Signal,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(config: Config, gate: BackgroundGate, out: W) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let exit_signal = config.exit_signal()?;
        let jobs = JobTable::with_capacity(config.job_capacity);
        Ok(Shell { session: SessionState::new(nix::unistd::getpid(), gate), jobs, config, exit_signal, out })
    }

    pub fn session(&self) -> &SessionState { &self.session }
    pub fn jobs(&self) -> &JobTable { &self.jobs }
    pub fn config(&self) -> &Config { &self.config }
    pub fn output(&mut self) -> &mut W { &mut self.out }
    pub fn into_output(self) -> W { self.out }

    /// Run one trimmed line. Recoverable errors come back as `Err` for the caller to report.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let expanded = expand_pid(line, self.session.pid().as_raw());
        let cmd = parse::parse_line(&expanded, self.session.gate().admitted(), self.config.max_args)?;
        match Builtin::lookup(cmd.program()) {
            Some(b) => self.run_builtin(b, &cmd),
            None => { self.launch(&cmd)?; Ok(Flow::Continue) }
        }
    }

    /// Like [`Shell::execute`] but prints recoverable errors; only fatal ones are returned.
    pub fn dispatch(&mut self, line: &str) -> Result<Flow> {
        match self.execute(line) {
            Err(e) if e.is_fatal() => Err(e),
            Err(e) if e.is_silent() => Ok(Flow::Continue),
            Err(e) => { debug!(error = %e, "command failed"); self.notice(&e); Ok(Flow::Continue) }
            ok => ok,
        }
    }

    fn run_builtin(&mut self, builtin: Builtin, cmd: &Command) -> Result<Flow> {
        match builtin {
            Builtin::Cd => {
                let dir = builtins::change_directory(cmd.args())?;
                debug!(dir = %dir.display(), "changed directory");
                Ok(Flow::Continue)
            }
            Builtin::Status => {
                let line = builtins::status_line(self.session.last_foreground());
                self.notice(line);
                Ok(Flow::Continue)
            }
            Builtin::Exit => { self.shutdown()?; Ok(Flow::Exit(0)) }
        }
    }

    fn launch(&mut self, cmd: &Command) -> Result<()> {
        let prepared = Prepared::new(cmd)?;
        if prepared.mode() == ExecMode::Background { self.jobs.ensure_room()?; }
        let pid = launch::spawn(&prepared, &mut self.out)?;
        match prepared.mode() {
            ExecMode::Foreground => {
                let report = launch::wait_foreground(pid)?;
                debug!(pid = pid.as_raw(), %report, "foreground child finished");
                self.session.record_foreground(report);
                if let ExitReport::Signaled(_) = report { self.notice(report); }
            }
            ExecMode::Background => {
                self.jobs.register(pid)?;
                self.notice(format_args!("background pid is {pid}"));
            }
        }
        Ok(())
    }

    /// Reap finished background jobs and announce each one.
    pub fn reap(&mut self) -> Result<Vec<Completion>> {
        let done = self.jobs.poll()?;
        for c in &done { self.notice(c); }
        Ok(done)
    }

    /// The `exit` sweep: drop finished jobs, then signal whatever is still tracked.
    pub fn shutdown(&mut self) -> Result<Vec<Pid>> {
        self.reap()?;
        let pids: Vec<Pid> = self.jobs.pids().collect();
        let sent = self.jobs.signal_all(self.exit_signal);
        if sent < pids.len() { warn!(sent, tracked = pids.len(), "not every background job was signaled"); }
        info!(jobs = pids.len(), signal = %self.exit_signal, "session ending");
        Ok(pids)
    }

    /// Write one notice line and flush it before anything else happens.
    pub fn notice(&mut self, line: impl Display) {
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}
