use std::path::PathBuf;
use nix::errno::Errno;

pub type Result<T> = std::result::Result<T, ShellError>;

/// Child exit status when signal or redirection setup fails before exec.
pub const REDIRECT_FAILURE_STATUS: i32 = 1;
/// Child exit status when the program image could not be replaced.
pub const EXEC_FAILURE_STATUS: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("empty command")]
    EmptyCommand,
    #[error("{operator}: missing filename")]
    MalformedRedirection { operator: &'static str },
    #[error("too many arguments ({count}, limit {limit})")]
    TooManyArguments { count: usize, limit: usize },
    #[error("argument contains a NUL byte")]
    NulInArgument,
    #[error("cd: {}: {source}", path.display())]
    DirectoryChangeFailed { path: PathBuf, #[source] source: Errno },
    #[error("cd: HOME not set")]
    HomeNotSet,
    #[error("fork failed: {0}")]
    SpawnFailed(#[source] Errno),
    #[error("waitpid failed: {0}")]
    WaitFailed(#[source] Errno),
    #[error("background job limit reached ({capacity} jobs)")]
    JobTableFull { capacity: usize },
    // The three below only ever occur inside a forked child.
    #[error("cannot reset signal dispositions: {0}")]
    ChildSignalSetupFailed(#[source] Errno),
    #[error("{path}: {source}")]
    RedirectionOpenFailed { path: String, #[source] source: Errno },
    #[error("{program}: {source}")]
    ExecReplaceFailed { program: String, #[source] source: Errno },
}

impl ShellError {
    /// Fatal errors end the session; everything else is reported and the loop continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::SpawnFailed(_) | ShellError::WaitFailed(_) | ShellError::JobTableFull { .. })
    }

    /// Errors the prompt loop swallows without printing anything.
    pub fn is_silent(&self) -> bool { matches!(self, ShellError::EmptyCommand) }
}
