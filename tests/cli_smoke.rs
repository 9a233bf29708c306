use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tloc_bin() -> &'static str {
    env!("CARGO_BIN_EXE_tloc")
}

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("failed to write test file");
}

fn run_tloc(out_dir: &Path, args: &[&str]) -> Output {
    Command::new(tloc_bin())
        .current_dir(out_dir)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .args(args)
        .output()
        .expect("failed to execute tloc")
}

#[test]
fn cli_prints_progress_and_summary() {
    let project = TempDir::new().expect("failed to create temp dir");
    let out = TempDir::new().expect("failed to create temp dir");
    write_file(&project.path().join("main.rs"), "fn main() {}\n// comment\n");

    let output = run_tloc(out.path(), &["--folder", project.path().to_str().unwrap()]);

    assert!(
        output.status.success(),
        "expected success, got status {:?}, stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    for needle in ["Scanning files...", "Loading...", "Success!", "Summary"] {
        assert!(stdout.contains(needle), "stdout missing {needle:?}: {stdout}");
    }
    assert!(
        out.path().join("result.txt").exists(),
        "text report should be written to the working directory"
    );
    assert!(
        out.path().join("result.csv").exists(),
        "table should be written to the working directory"
    );
}

#[test]
fn cli_requires_folder() {
    let out = TempDir::new().expect("failed to create temp dir");
    let output = run_tloc(out.path(), &[]);
    assert!(!output.status.success(), "missing --folder should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--folder"), "stderr should name the flag: {stderr}");
}

#[test]
fn cli_no_files_found_is_fatal() {
    let project = TempDir::new().expect("failed to create temp dir");
    let out = TempDir::new().expect("failed to create temp dir");

    let output = run_tloc(out.path(), &["-f", project.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2), "empty folder should exit with 2");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No files found."), "stdout: {stdout}");
    assert!(!stdout.contains("Loading..."), "scan must stop before loading: {stdout}");
    assert!(!out.path().join("result.txt").exists());
    assert!(!out.path().join("result.csv").exists());
}

#[test]
fn cli_missing_folder_reports_no_files() {
    let project = TempDir::new().expect("failed to create temp dir");
    let out = TempDir::new().expect("failed to create temp dir");
    let missing = project.path().join("missing");

    let output = run_tloc(out.path(), &["-f", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no files found"), "stderr: {stderr}");
}

#[test]
fn cli_exclude_is_substring_match_on_file_names() {
    let project = TempDir::new().expect("failed to create temp dir");
    let out = TempDir::new().expect("failed to create temp dir");
    write_file(&project.path().join("app.py"), "print(1)\n");
    write_file(&project.path().join("foo.gitignore"), "target/\n");
    write_file(&project.path().join(".gitattributes"), "* text=auto\n");
    write_file(&project.path().join("notes.md"), "# notes\n");

    let output = run_tloc(
        out.path(),
        &["-f", project.path().to_str().unwrap(), "-x", ".git", ".md"],
    );
    assert!(output.status.success());

    let table = fs::read_to_string(out.path().join("result.csv")).unwrap();
    assert!(table.contains("app.py"), "table: {table}");
    assert!(!table.contains("foo.gitignore"), "`.git` must match inside `.gitignore`: {table}");
    assert!(!table.contains(".gitattributes"), "table: {table}");
    assert!(!table.contains("notes.md"), "table: {table}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Files:         1"));
}

#[test]
fn cli_unreadable_file_degrades_without_aborting() {
    let project = TempDir::new().expect("failed to create temp dir");
    let out = TempDir::new().expect("failed to create temp dir");
    write_file(&project.path().join("ok.sh"), "# shebang-ish\necho hi\n");
    write_file(&project.path().join("__tloc_read_fail__"), "never read\n");

    let output = Command::new(tloc_bin())
        .current_dir(out.path())
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env("TLOC_ENABLE_FAULTS", "1")
        .args(["-f", project.path().to_str().unwrap()])
        .output()
        .expect("failed to execute tloc");

    assert!(
        output.status.success(),
        "a single unreadable file must not abort the run, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not read file"), "stderr: {stderr}");

    let table = fs::read_to_string(out.path().join("result.csv")).unwrap();
    let degraded = table
        .lines()
        .find(|line| line.contains("__tloc_read_fail__"))
        .expect("degraded row present");
    assert!(
        degraded.ends_with(",Unsupported File,,,,"),
        "numeric fields must be empty, not zero: {degraded}"
    );
    let ok_row = table.lines().find(|line| line.contains("ok.sh")).unwrap();
    assert!(ok_row.ends_with(",Shell,2,0,1,1"), "row: {ok_row}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Files:         2"), "stdout: {stdout}");
    assert!(stdout.contains("Lines:         2"), "stdout: {stdout}");
}
