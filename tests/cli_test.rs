use std::io::Write;
use std::process::{Command, Output, Stdio};

use anyhow::Result;

fn python_available() -> bool {
    Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn run_headless(source: &str, log_dir: &tempfile::TempDir) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pyscratch"))
        .arg("--run")
        .arg("--python")
        .arg("python3")
        .arg("--log-file")
        .arg(log_dir.path().join("pyscratch.log"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(source.as_bytes())?;
    Ok(child.wait_with_output()?)
}

#[test]
fn headless_run_prints_output() -> Result<()> {
    if !python_available() {
        println!("python3 not found, skipping");
        return Ok(());
    }
    let logs = tempfile::tempdir()?;
    let output = run_headless("print(1+1)", &logs)?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "2\n");
    assert!(logs.path().join("pyscratch.log").exists());
    Ok(())
}

#[test]
fn headless_run_without_output_prints_placeholder() -> Result<()> {
    if !python_available() {
        return Ok(());
    }
    let logs = tempfile::tempdir()?;
    let output = run_headless("x = 1", &logs)?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "(no output)\n");
    Ok(())
}

#[test]
fn headless_run_reports_program_errors() -> Result<()> {
    if !python_available() {
        return Ok(());
    }
    let logs = tempfile::tempdir()?;
    let output = run_headless("print('start')\n1/0\n", &logs)?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("start\n\nTraceback"));
    assert!(stdout.contains("ZeroDivisionError"));
    Ok(())
}

#[test]
fn missing_source_file_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = Command::new(env!("CARGO_BIN_EXE_pyscratch"))
        .arg("--run")
        .arg("--log-file")
        .arg(dir.path().join("pyscratch.log"))
        .arg(dir.path().join("missing.py"))
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("does not exist"));
    Ok(())
}
