use std::io::{BufRead, Write};
use tracing::{debug, trace};
use crate::error::Result;
use crate::shell::{Flow, Shell};

/// What to do with a raw input line before it reaches the shell.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> { Skip, TooLong, Run(&'a str) }

pub fn classify_line(raw: &str, max_len: usize) -> Line<'_> {
    let line = raw.trim_end_matches(['\n', '\r']);
    if line.len() > max_len { return Line::TooLong; }
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') { return Line::Skip; }
    Line::Run(line)
}

/// Prompt, read, dispatch, reap; until `exit` or end of input.
///
/// Returns the session's exit code. Only fatal errors are returned as `Err`.
pub fn run<R: BufRead, W: Write>(shell: &mut Shell<W>, mut input: R, show_prompt: bool) -> Result<i32> {
    let mut buf = String::new();
    loop {
        if show_prompt {
            let prompt = shell.config().prompt.clone();
            let out = shell.output();
            let _ = write!(out, "{prompt}");
            let _ = out.flush();
        }
        buf.clear();
        let n = match input.read_line(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => { debug!(error = %e, "stdin read failed, ending session"); 0 }
        };
        if n == 0 {
            shell.shutdown()?;
            return Ok(0);
        }
        let flow = match classify_line(&buf, shell.config().max_line_length) {
            Line::Skip => Flow::Continue,
            Line::TooLong => { shell.notice("line too long"); Flow::Continue }
            Line::Run(line) => { trace!(line, "dispatching"); shell.dispatch(line)? }
        };
        if let Flow::Exit(code) = flow { return Ok(code); }
        shell.reap()?;
    }
}
