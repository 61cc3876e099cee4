use test_util::{canonical, run_script, run_script_with, write_sh};

#[test]
fn status_before_any_foreground_command() {
    let out = run_script("status\n");
    assert_eq!(out.code, 0);
    assert_eq!(out.stdout, "exit status 0\n");
}

#[test]
fn status_reports_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_sh(dir.path(), "seven.sh", "exit 7\n");
    let out = run_script(&format!("sh {script}\nstatus\n"));
    assert_eq!(out.lines(), vec!["exit status 7"]);
}

#[test]
fn status_reports_terminating_signal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_sh(dir.path(), "die.sh", "kill -9 $$\n");
    let out = run_script(&format!("sh {script}\nstatus\n"));
    // once right away, once from `status`
    assert_eq!(out.lines(), vec!["terminated by signal 9", "terminated by signal 9"]);
}

#[test]
fn builtins_do_not_touch_last_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_sh(dir.path(), "three.sh", "exit 3\n");
    let out = run_script(&format!("sh {script}\ncd /\nstatus\nstatus\n"));
    assert_eq!(out.lines(), vec!["exit status 3", "exit status 3"]);
}

#[test]
fn cd_without_argument_goes_home() {
    let home = tempfile::tempdir().expect("tempdir");
    let home_str = home.path().to_string_lossy().to_string();
    let out = run_script_with("cd\npwd\n", Some(std::path::Path::new("/")), &[("HOME", &home_str)]);
    assert_eq!(out.stdout.trim_end(), canonical(home.path()).to_string_lossy());
}

#[test]
fn cd_with_argument() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let out = run_script_with("cd sub\npwd\n", Some(dir.path()), &[]);
    assert_eq!(out.stdout.trim_end(), canonical(&dir.path().join("sub")).to_string_lossy());
}

#[test]
fn cd_to_missing_directory_reports_and_stays() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_script_with("cd /nonexistent/smallsh-dir\npwd\nstatus\n", Some(dir.path()), &[]);
    let lines = out.lines();
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].starts_with("cd: /nonexistent/smallsh-dir"), "{}", lines[0]);
    assert_eq!(lines[1], canonical(dir.path()).to_string_lossy());
    assert_eq!(lines[2], "exit status 0");
    assert_eq!(out.code, 0);
}

#[test]
fn exit_ends_the_session() {
    let out = run_script("exit\necho unreachable\n");
    assert_eq!(out.code, 0);
    assert!(!out.stdout.contains("unreachable"));
}

#[test]
fn end_of_input_behaves_like_exit() {
    let out = run_script("");
    assert_eq!(out.code, 0);
    assert_eq!(out.stdout, "");
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let out = run_script("# echo hidden\n\n   \nstatus\n");
    assert_eq!(out.stdout, "exit status 0\n");
}

#[test]
fn pid_marker_expands_to_shell_pid() {
    let out = run_script("echo $$ x$$y $$$$\n");
    let pid = out.pid;
    assert_eq!(out.stdout, format!("{pid} x{pid}y {pid}{pid}\n"));
}

#[test]
fn lone_pid_marker_is_run_as_a_command() {
    // no built-in behind `$$`: it becomes a program name that does not exist
    let out = run_script("$$\nstatus\n");
    assert_eq!(out.stdout, "exit status 2\n");
}

#[test]
fn overlong_line_is_rejected() {
    let long = format!("echo {}\nstatus\n", "a".repeat(3000));
    let out = run_script(&long);
    assert_eq!(out.lines(), vec!["line too long", "exit status 0"]);
}

#[test]
fn single_command_mode_exits_with_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_sh(dir.path(), "five.sh", "exit 5\n");
    let status = std::process::Command::new(test_util::smallsh_path())
        .arg("-c").arg(format!("sh {script}"))
        .env_remove("SMALLSH_CONFIG")
        .status().expect("spawn");
    assert_eq!(status.code(), Some(5));
}
