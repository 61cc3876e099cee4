use crate::error::{Result, ShellError};

pub const BACKGROUND_MARKER: &str = "&";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode { Foreground, Background }

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedirSpec { pub in_file: Option<String>, pub out_file: Option<String> }

/// One classified input line: program plus arguments, redirections and where it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command { pub argv: Vec<String>, pub redir: RedirSpec, pub mode: ExecMode }

impl Command {
    pub fn program(&self) -> &str { &self.argv[0] }
    pub fn args(&self) -> &[String] { &self.argv[1..] }
}

pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let toks: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
    if toks.is_empty() { return Err(ShellError::EmptyCommand); }
    Ok(toks)
}

/// Turn tokens into a [`Command`].
///
/// A trailing `&` is stripped only while `background_admitted` is true; otherwise it
/// stays in argv as a literal argument. Redirections are scanned after that, so
/// `cmd > out &` and `cmd & > out` differ: in the latter `&` is an ordinary word.
/// For repeated `<` or `>` the last one wins. `max_args` bounds the program plus
/// its arguments; operators and filenames do not count.
pub fn classify(mut toks: Vec<String>, background_admitted: bool, max_args: usize) -> Result<Command> {
    let mut mode = ExecMode::Foreground;
    if background_admitted && toks.last().map(|t| t == BACKGROUND_MARKER).unwrap_or(false) {
        toks.pop();
        mode = ExecMode::Background;
    }
    let mut redir = RedirSpec::default();
    let mut argv: Vec<String> = Vec::with_capacity(toks.len());
    let mut it = toks.into_iter();
    while let Some(t) = it.next() {
        match t.as_str() {
            "<" => { redir.in_file = Some(it.next().ok_or(ShellError::MalformedRedirection { operator: "<" })?); }
            ">" => { redir.out_file = Some(it.next().ok_or(ShellError::MalformedRedirection { operator: ">" })?); }
            _ => argv.push(t),
        }
    }
    if argv.is_empty() { return Err(ShellError::EmptyCommand); }
    if argv.len() > max_args { return Err(ShellError::TooManyArguments { count: argv.len(), limit: max_args }); }
    Ok(Command { argv, redir, mode })
}

/// Tokenize and classify an already expanded line.
pub fn parse_line(line: &str, background_admitted: bool, max_args: usize) -> Result<Command> {
    classify(tokenize(line)?, background_admitted, max_args)
}
