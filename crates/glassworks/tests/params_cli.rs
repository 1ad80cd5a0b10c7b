use std::fs;
use std::process::Command;

use tempfile::TempDir;

#[test]
fn params_subcommand_lists_every_control() {
    let output = Command::new(env!("CARGO_BIN_EXE_glassworks"))
        .arg("params")
        .output()
        .expect("running the glassworks binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for desc in optics::DESCRIPTORS {
        assert!(stdout.contains(desc.name), "missing {}", desc.name);
    }
}

#[test]
fn unknown_scene_fails_before_any_window_opens() {
    let output = Command::new(env!("CARGO_BIN_EXE_glassworks"))
        .arg("prism")
        .output()
        .expect("running the glassworks binary");
    assert!(!output.status.success());
}

#[test]
fn malformed_preset_fails_before_any_window_opens() {
    let dir = TempDir::new().unwrap();
    let preset = dir.path().join("scene.toml");
    fs::write(&preset, "[params]\nior-rd = 1.3\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_glassworks"))
        .arg("torus")
        .arg("--preset")
        .arg(&preset)
        .output()
        .expect("running the glassworks binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ior-rd"), "stderr: {stderr}");
}
