use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn advisor_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_advisor"))
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let files_dir = root.join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(
        files_dir.join("a.txt"),
        "This legacy app uses Oracle DB and Tomcat 7.",
    )
    .unwrap();
    fs::write(
        files_dir.join("b.txt"),
        "Database migration steps: first backup, then run scripts.",
    )
    .unwrap();
    fs::write(files_dir.join("skip.md"), "Markdown is not uploaded.").unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/advisor.sqlite"

[store]
backend = "sqlite"

[answer]
mode = "extractive"

[server]
bind = "127.0.0.1:0"
"#,
        root.display()
    );

    let config_path = config_dir.join("advisor.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_advisor(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = advisor_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run advisor binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn files_dir(config_path: &Path) -> String {
    let root = config_path.parent().unwrap().parent().unwrap();
    root.join("files").to_str().unwrap().to_string()
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_advisor(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/advisor.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_advisor(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_advisor(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_upload_and_docs() {
    let (_tmp, config_path) = setup_test_env();
    let dir = files_dir(&config_path);

    let (stdout, stderr, success) = run_advisor(&config_path, &["upload", &dir]);
    assert!(success, "upload failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Uploaded 2 files"));

    let (stdout, _, success) = run_advisor(&config_path, &["docs"]);
    assert!(success);
    assert_eq!(stdout, "1 a.txt\n2 b.txt\n");
}

#[test]
fn test_upload_invalid_path_fails() {
    let (tmp, config_path) = setup_test_env();
    let missing = tmp.path().join("no-such-dir");

    let (_, stderr, success) = run_advisor(&config_path, &["upload", missing.to_str().unwrap()]);
    assert!(!success, "upload of a missing directory should fail");
    assert!(stderr.contains("Invalid path"));
}

#[test]
fn test_ask_without_documents() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_advisor(&config_path, &["ask", "What database?"]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("I have no context documents"));
    assert!(stdout.contains("Sources: []"));
    assert!(stdout.contains("Confidence: 0.00"));
}

#[test]
fn test_ask_ranks_matching_document() {
    let (_tmp, config_path) = setup_test_env();
    run_advisor(&config_path, &["upload", &files_dir(&config_path)]);

    let (stdout, stderr, success) =
        run_advisor(&config_path, &["ask", "How to migrate the database?"]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("---Answer---"));
    assert!(stdout.contains("From b.txt: Database migration steps"));
    assert!(stdout.contains("Sources: [\"b.txt\"]"));
    assert!(stdout.contains("Confidence: 0.40"));
}

#[test]
fn test_ask_no_relevant_match() {
    let (_tmp, config_path) = setup_test_env();
    run_advisor(&config_path, &["upload", &files_dir(&config_path)]);

    let (stdout, _, success) = run_advisor(&config_path, &["ask", "kubernetes helm"]);
    assert!(success);
    assert!(stdout.contains("Sources: []"));
    assert!(stdout.contains("Confidence: 0.20"));
}

#[test]
fn test_history_after_ask() {
    let (_tmp, config_path) = setup_test_env();
    run_advisor(&config_path, &["upload", &files_dir(&config_path)]);
    run_advisor(&config_path, &["ask", "Which tomcat version?"]);

    let (stdout, _, success) = run_advisor(&config_path, &["history"]);
    assert!(success);
    assert!(stdout.contains("user: Which tomcat version?"));
    assert!(stdout.contains("assistant: From a.txt: This legacy app uses Oracle DB and Tomcat 7"));
}

#[test]
fn test_feedback_rating_bounds() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_advisor(&config_path, &["feedback", "--rating", "7"]);
    assert!(!success, "out-of-range rating should fail");
    assert!(stderr.contains("rating must be between 1 and 5"));

    let (stdout, stderr, success) = run_advisor(
        &config_path,
        &["feedback", "--rating", "5", "--comment", "spot on"],
    );
    assert!(success, "feedback failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Feedback recorded"));
}

#[test]
fn test_shell_session() {
    let (_tmp, config_path) = setup_test_env();
    let dir = files_dir(&config_path);

    let mut child = Command::new(advisor_binary())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, "upload {}", dir).unwrap();
        writeln!(stdin, "docs").unwrap();
        writeln!(stdin, "ask oracle").unwrap();
        writeln!(stdin, "exit").unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Uploaded 2 files"));
    assert!(stdout.contains("2 b.txt"));
    assert!(stdout.contains("From a.txt: This legacy app uses Oracle DB and Tomcat 7"));
}

#[test]
fn test_invalid_config_rejected() {
    let (_tmp, config_path) = setup_test_env();
    fs::write(&config_path, "[answer]\nmode = \"telepathic\"\n").unwrap();

    let (_, stderr, success) = run_advisor(&config_path, &["docs"]);
    assert!(!success);
    assert!(stderr.contains("Unknown answer mode"));
}
