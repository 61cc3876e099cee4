use std::borrow::Cow;
use smallsh::expand::expand_pid;
use smallsh::parse::{classify, parse_line, tokenize, ExecMode, RedirSpec};
use smallsh::ShellError;

fn toks(s: &str) -> Vec<String> { tokenize(s).unwrap() }

#[test]
fn expand_replaces_every_marker() {
    assert_eq!(expand_pid("echo $$", 42), "echo 42");
    assert_eq!(expand_pid("a$$b$$c", 7), "a7b7c");
    assert_eq!(expand_pid("$$$$", 13), "1313");
    assert_eq!(expand_pid("$$$", 5), "5$");
    assert_eq!(expand_pid("$$", 99), "99");
}

#[test]
fn expand_without_marker_borrows() {
    assert!(matches!(expand_pid("echo $HOME $", 1), Cow::Borrowed("echo $HOME $")));
}

#[test]
fn tokenize_splits_on_whitespace_runs() {
    assert_eq!(toks("  ls   -la\t/tmp  "), vec!["ls", "-la", "/tmp"]);
}

#[test]
fn tokenize_empty_line_is_empty_command() {
    assert!(matches!(tokenize("   \t "), Err(ShellError::EmptyCommand)));
}

#[test]
fn trailing_ampersand_selects_background_when_admitted() {
    let cmd = classify(toks("sleep 5 &"), true, 512).unwrap();
    assert_eq!(cmd.argv, vec!["sleep", "5"]);
    assert_eq!(cmd.mode, ExecMode::Background);
}

#[test]
fn trailing_ampersand_is_literal_when_not_admitted() {
    let cmd = classify(toks("echo hi &"), false, 512).unwrap();
    assert_eq!(cmd.argv, vec!["echo", "hi", "&"]);
    assert_eq!(cmd.mode, ExecMode::Foreground);
}

#[test]
fn ampersand_in_the_middle_is_an_argument() {
    let cmd = classify(toks("echo & x"), true, 512).unwrap();
    assert_eq!(cmd.argv, vec!["echo", "&", "x"]);
    assert_eq!(cmd.mode, ExecMode::Foreground);
}

#[test]
fn redirections_are_removed_from_argv() {
    let cmd = classify(toks("sort -r < in.txt > out.txt"), true, 512).unwrap();
    assert_eq!(cmd.argv, vec!["sort", "-r"]);
    assert_eq!(cmd.redir, RedirSpec { in_file: Some("in.txt".into()), out_file: Some("out.txt".into()) });
    assert_eq!(cmd.program(), "sort");
    assert_eq!(cmd.args(), ["-r".to_string()]);
}

#[test]
fn background_marker_is_stripped_before_redirection_scan() {
    let cmd = classify(toks("cat < in > out &"), true, 512).unwrap();
    assert_eq!(cmd.mode, ExecMode::Background);
    assert_eq!(cmd.argv, vec!["cat"]);
    assert_eq!(cmd.redir.out_file.as_deref(), Some("out"));

    // `&` followed by a redirection is not trailing
    let cmd = classify(toks("cat & > out"), true, 512).unwrap();
    assert_eq!(cmd.mode, ExecMode::Foreground);
    assert_eq!(cmd.argv, vec!["cat", "&"]);
}

#[test]
fn last_redirection_wins() {
    let cmd = classify(toks("cmd > a < b > c < d"), true, 512).unwrap();
    assert_eq!(cmd.redir.in_file.as_deref(), Some("d"));
    assert_eq!(cmd.redir.out_file.as_deref(), Some("c"));
}

#[test]
fn operator_as_last_token_is_malformed() {
    assert!(matches!(classify(toks("cat <"), true, 512), Err(ShellError::MalformedRedirection { operator: "<" })));
    assert!(matches!(classify(toks("ls >"), true, 512), Err(ShellError::MalformedRedirection { operator: ">" })));
    // `&` is stripped first, leaving `>` last
    assert!(matches!(classify(toks("ls > &"), true, 512), Err(ShellError::MalformedRedirection { operator: ">" })));
}

#[test]
fn redirection_only_has_no_program() {
    assert!(matches!(classify(toks("> out"), true, 512), Err(ShellError::EmptyCommand)));
    assert!(matches!(classify(toks("&"), true, 512), Err(ShellError::EmptyCommand)));
}

#[test]
fn argument_limit_is_enforced() {
    let line = vec!["x"; 6].join(" ");
    assert!(matches!(parse_line(&line, true, 5), Err(ShellError::TooManyArguments { count: 6, limit: 5 })));
    assert!(parse_line(&line, true, 6).is_ok());
}

#[test]
fn argument_limit_ignores_operators_and_filenames() {
    let cmd = parse_line("sort -r < in.txt > out.txt &", true, 2).unwrap();
    assert_eq!(cmd.argv, vec!["sort", "-r"]);
    assert!(matches!(parse_line("sort -r -u < in.txt", true, 2), Err(ShellError::TooManyArguments { count: 3, limit: 2 })));
}
