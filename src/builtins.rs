use std::path::PathBuf;
use crate::error::{Result, ShellError};
use crate::session::ExitReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin { Cd, Status, Exit }

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name { "cd" => Some(Builtin::Cd), "status" => Some(Builtin::Status), "exit" => Some(Builtin::Exit), _ => None }
    }
}

/// `cd [dir]`: no argument means `$HOME`. On failure the working directory is unchanged.
pub fn change_directory(args: &[String]) -> Result<PathBuf> {
    let target = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => std::env::var_os("HOME").map(PathBuf::from).ok_or(ShellError::HomeNotSet)?,
    };
    nix::unistd::chdir(&target).map_err(|source| ShellError::DirectoryChangeFailed { path: target.clone(), source })?;
    Ok(target)
}

/// The line `status` prints.
pub fn status_line(last: ExitReport) -> String { last.to_string() }
