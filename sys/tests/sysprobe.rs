use std::process::Command;

#[test]
fn completed_steps_are_printed_before_a_failure() {
    let out = Command::new(env!("CARGO_BIN_EXE_sysprobe"))
        .arg("/nonexistent/sysprobe-dir")
        .env_remove("SYSBASE_LOG")
        .output()
        .expect("run sysprobe");
    assert_eq!(out.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("memfd: pid "), "stdout: {stdout:?}");
    assert!(stdout.contains("says hello"), "stdout: {stdout:?}");

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("error: open /nonexistent/sysprobe-dir/"), "stderr: {stderr:?}");
}

#[test]
fn full_run_reports_every_step() {
    let dir = std::env::temp_dir();
    let out = Command::new(env!("CARGO_BIN_EXE_sysprobe"))
        .arg(&dir)
        .env_remove("SYSBASE_LOG")
        .output()
        .expect("run sysprobe");
    assert!(out.status.success(), "{out:?}");

    let stdout = String::from_utf8_lossy(&out.stdout);
    for prefix in ["memfd: ", "file: 4096 bytes", "mask: ", "child "] {
        assert!(stdout.contains(prefix), "missing {prefix:?} in {stdout:?}");
    }
}
