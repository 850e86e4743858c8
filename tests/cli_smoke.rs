use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

fn bin() -> String {
    // Cargo sets this for bin targets in integration tests
    env!("CARGO_BIN_EXE_qportal").to_string()
}

fn no_user_config(cmd: &mut Command) -> &mut Command {
    // Keep ~/.qportal/config.toml out of the picture.
    let dir = std::env::temp_dir().join("qportal-cli-home");
    cmd.env("HOME", &dir).env("USERPROFILE", &dir).env_remove("QPORTAL_LOG")
}

#[test]
fn single_json_reports_full_fidelity() {
    let output = no_user_config(&mut Command::new(bin()))
        .args(["--json", "single", "0.6", "0.8"])
        .output()
        .expect("run");
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["mode"], "single");
    assert_eq!(v["perfect"], true);
    assert_eq!(v["syndromes"], serde_json::json!(["00"]));
    assert!((v["output"][1][0].as_f64().unwrap() - 0.8).abs() < 1e-9);
}

#[test]
fn bell_mode_prints_warnings() {
    let output = no_user_config(&mut Command::new(bin()))
        .args(["--no-color", "bell", "1", "0", "0", "1"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fidelity: 0.500000"), "{stdout}");
    assert!(stdout.contains("warning: Entanglement Loss"));
    assert!(stdout.contains("|00⟩ : 1.0000+0.0000i"));
}

#[test]
fn cli_rejects_bad_amplitude() {
    let output = no_user_config(&mut Command::new(bin()))
        .args(["single", "0.6", "nope"])
        .output()
        .expect("run");
    assert!(!output.status.success(), "unexpected success");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid State"), "{stderr}");
}

#[test]
fn config_file_sets_precision() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("portal.toml");
    fs::write(&cfg, "[display]\nprecision = 2\ncolor = false\n").unwrap();

    let output = Command::new(bin())
        .arg("--config")
        .arg(&cfg)
        .args(["tensor", "1", "0", "0", "0"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("|00⟩ : 1.00+0.00i"), "{stdout}");
}

#[test]
fn batch_accepts_seed_and_count() {
    let output = no_user_config(&mut Command::new(bin()))
        .args(["--json", "batch", "--mode", "single", "--count", "8", "--seed", "11"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["count"], 8);
    assert_eq!(v["perfect"], 8);
}

#[test]
fn interactive_reads_stdin() {
    let mut child = no_user_config(&mut Command::new(bin()))
        .arg("--no-color")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"single\n0.6+0j\n0.8+0j\n")
        .unwrap();
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Enter beta"));
    assert!(stdout.contains("fidelity: 1.000000"));
}
