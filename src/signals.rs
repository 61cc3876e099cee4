//! Signal dispositions for the session and its children.
//!
//! The session ignores SIGINT so Ctrl-C only reaches the foreground child, and
//! uses SIGTSTP to switch background admission on and off. Children never see
//! the SIGTSTP handler: they ignore it.

use std::sync::atomic::{AtomicBool, Ordering};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use crate::parse::ExecMode;
use crate::session::BackgroundGate;

static BACKGROUND_ADMITTED: AtomicBool = AtomicBool::new(true);

pub const FOREGROUND_ONLY_ON: &str = "\nEntering foreground-only mode (& is now ignored)\n";
pub const FOREGROUND_ONLY_OFF: &str = "\nExiting foreground-only mode\n";

/// Gate backed by the flag the SIGTSTP handler toggles.
pub fn session_gate() -> BackgroundGate { BackgroundGate::new(&BACKGROUND_ADMITTED) }

extern "C" fn toggle_background(_: libc::c_int) {
    // previous value true => admission is now off
    let was_admitted = BACKGROUND_ADMITTED.fetch_xor(true, Ordering::SeqCst);
    let msg = if was_admitted { FOREGROUND_ONLY_ON } else { FOREGROUND_ONLY_OFF };
    // write(2) only: async-signal-safe
    unsafe { libc::write(libc::STDOUT_FILENO, msg.as_ptr() as *const libc::c_void, msg.len()); }
}

/// Install the session dispositions. Called once before the first prompt.
pub fn install_session_handlers() -> nix::Result<()> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    // SA_RESTART keeps a blocking read or waitpid going after a toggle
    let toggle = SigAction::new(SigHandler::Handler(toggle_background), SaFlags::SA_RESTART, SigSet::all());
    unsafe {
        sigaction(Signal::SIGINT, &ignore)?;
        sigaction(Signal::SIGTSTP, &toggle)?;
    }
    Ok(())
}

/// Runs in a freshly forked child, before exec. Only sigaction is called here.
///
/// SIGPIPE goes back to default as well: the Rust runtime ignores it in the
/// session, and an ignored disposition would survive exec.
pub fn apply_child_dispositions(mode: ExecMode) -> nix::Result<()> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    let sigint = match mode { ExecMode::Foreground => &default, ExecMode::Background => &ignore };
    unsafe {
        sigaction(Signal::SIGINT, sigint)?;
        sigaction(Signal::SIGTSTP, &ignore)?;
        sigaction(Signal::SIGPIPE, &default)?;
    }
    Ok(())
}
