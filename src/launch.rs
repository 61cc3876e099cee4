use std::ffi::CString;
use std::io::Write;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::{execvp, fork, ForkResult, Pid};
use tracing::debug;
use crate::error::{Result, ShellError, EXEC_FAILURE_STATUS, REDIRECT_FAILURE_STATUS};
use crate::parse::{Command, ExecMode};
use crate::redirect::PreparedRedir;
use crate::session::ExitReport;
use crate::signals;

/// Everything the child needs, converted before `fork`.
#[derive(Debug)]
pub struct Prepared { argv: Vec<CString>, redir: PreparedRedir, mode: ExecMode }

impl Prepared {
    pub fn new(cmd: &Command) -> Result<Self> {
        let argv = cmd.argv.iter().map(|s| CString::new(s.as_str())).collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| ShellError::NulInArgument)?;
        Ok(Prepared { argv, redir: PreparedRedir::new(&cmd.redir)?, mode: cmd.mode })
    }
    pub fn mode(&self) -> ExecMode { self.mode }
}

/// Fork and exec the command; the parent gets the child's pid back.
///
/// `out` is flushed first so buffered notices are not duplicated into the child.
pub fn spawn(prepared: &Prepared, out: &mut impl Write) -> Result<Pid> {
    let _ = out.flush();
    match unsafe { fork() } {
        Ok(ForkResult::Child) => run_child(prepared),
        Ok(ForkResult::Parent { child }) => {
            debug!(pid = child.as_raw(), mode = ?prepared.mode, "spawned child");
            Ok(child)
        }
        Err(e) => Err(ShellError::SpawnFailed(e)),
    }
}

// -------- Child side: never returns to shell logic ---------
fn run_child(prepared: &Prepared) -> ! {
    if let Err(e) = prepare_child(prepared) {
        eprintln!("{e}");
        std::process::exit(REDIRECT_FAILURE_STATUS);
    }
    let prog = &prepared.argv[0];
    let source = match execvp(prog, &prepared.argv) { Ok(never) => match never {}, Err(e) => e };
    let e = ShellError::ExecReplaceFailed { program: prog.to_string_lossy().into_owned(), source };
    eprintln!("{e}");
    std::process::exit(EXEC_FAILURE_STATUS);
}

fn prepare_child(prepared: &Prepared) -> Result<()> {
    signals::apply_child_dispositions(prepared.mode).map_err(ShellError::ChildSignalSetupFailed)?;
    prepared.redir.apply()
}

// -------- Parent side ---------

/// Block until `pid` has exited or been killed; stop/continue transitions keep waiting.
pub fn wait_foreground(pid: Pid) -> Result<ExitReport> {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED)) {
            Ok(ws) => match ExitReport::from_wait_status(ws) {
                Some(report) => return Ok(report),
                None => debug!(pid = pid.as_raw(), status = ?ws, "foreground child changed state"),
            },
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(ShellError::WaitFailed(e)),
        }
    }
}
