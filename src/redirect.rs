use std::ffi::{CStr, CString};
use std::os::unix::io::RawFd;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};
use crate::error::{Result, ShellError};
use crate::parse::RedirSpec;

/// Redirection paths converted ahead of `fork`, so the child does not allocate.
#[derive(Debug, Default)]
pub struct PreparedRedir { in_file: Option<CString>, out_file: Option<CString> }

impl PreparedRedir {
    pub fn new(spec: &RedirSpec) -> Result<Self> {
        let conv = |p: &Option<String>| p.as_deref().map(CString::new).transpose().map_err(|_| ShellError::NulInArgument);
        Ok(PreparedRedir { in_file: conv(&spec.in_file)?, out_file: conv(&spec.out_file)? })
    }

    /// Child only: bind the opened files to fd 0 / fd 1.
    pub fn apply(&self) -> Result<()> {
        if let Some(p) = &self.in_file { bind(p, OFlag::O_RDONLY, Mode::empty(), libc::STDIN_FILENO)?; }
        if let Some(p) = &self.out_file {
            let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
            bind(p, OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC, mode, libc::STDOUT_FILENO)?;
        }
        Ok(())
    }
}

fn bind(path: &CStr, flags: OFlag, mode: Mode, target: RawFd) -> Result<()> {
    let failed = |source| ShellError::RedirectionOpenFailed { path: path.to_string_lossy().into_owned(), source };
    let fd = open(path, flags, mode).map_err(failed)?;
    if fd == target { return Ok(()); }
    dup2(fd, target).map_err(failed)?;
    let _ = close(fd);
    Ok(())
}
