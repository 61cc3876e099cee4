use anyhow::Result;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use smallsh::config::Config;
use smallsh::{repl, signals, Flow, Shell};

const LOG_ENV: &str = "SMALLSH_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let mut script: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;
    while let Some(a) = args.next() {
        match a.as_str() {
            "-c" => { script = Some(args.next().ok_or_else(|| anyhow::anyhow!("missing command after -c"))?); }
            "--config" => { let v = args.next().ok_or_else(|| anyhow::anyhow!("missing value after --config"))?; config_path = Some(PathBuf::from(v)); }
            "-h" | "--help" => { eprintln!("usage: smallsh-rs [-c <command>] [--config <file.json>]\n       config file may also be given via $SMALLSH_CONFIG; log filter via ${LOG_ENV}"); return Ok(()); }
            other => { anyhow::bail!("unknown arg: {other}"); }
        }
    }
    init_logging();
    let config = Config::load(config_path.as_deref())?;
    signals::install_session_handlers()?;
    let mut shell = Shell::new(config, signals::session_gate(), io::stdout())?;
    info!(pid = shell.session().pid().as_raw(), "session started");

    let outcome = match script {
        Some(line) => run_once(&mut shell, &line),
        None => repl::run(&mut shell, io::stdin().lock(), atty::is(atty::Stream::Stdin)),
    };
    match outcome {
        Ok(code) => { let _ = shell.output().flush(); std::process::exit(code); }
        Err(e) => {
            let _ = shell.output().flush();
            error!(error = %e, "fatal");
            eprintln!("smallsh: {e}");
            std::process::exit(1);
        }
    }
}

/// `-c`: one line, then reap and exit with the last foreground code.
fn run_once<W: Write>(shell: &mut Shell<W>, line: &str) -> smallsh::Result<i32> {
    let flow = match repl::classify_line(line, shell.config().max_line_length) {
        repl::Line::Run(l) => shell.dispatch(l)?,
        repl::Line::Skip => Flow::Continue,
        repl::Line::TooLong => { shell.notice("line too long"); Flow::Exit(1) }
    };
    shell.reap()?;
    Ok(match flow { Flow::Exit(code) => code, Flow::Continue => shell.session().last_foreground().code() })
}
