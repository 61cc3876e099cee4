//! smallsh: a small interactive shell with `cd`/`status`/`exit` built-ins,
//! `<`/`>` redirection, background jobs and a SIGTSTP foreground-only toggle.

pub mod builtins;
pub mod config;
pub mod error;
pub mod expand;
pub mod jobs;
pub mod launch;
pub mod parse;
pub mod redirect;
pub mod repl;
pub mod session;
pub mod shell;
pub mod signals;

pub use error::{Result, ShellError};
pub use shell::{Flow, Shell};
