use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn vibepitch(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vibepitch").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("GEMINI_API_KEY");
    cmd
}

#[test]
fn styles_lists_every_voice() {
    let dir = TempDir::new().unwrap();
    vibepitch(&dir)
        .arg("styles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Startup pitch"))
        .stdout(predicate::str::contains("Fenrir"))
        .stdout(predicate::str::contains("Crazy hype"));
}

#[test]
fn styles_json_has_four_entries() {
    let dir = TempDir::new().unwrap();
    let output = vibepitch(&dir).args(["styles", "--json"]).output().unwrap();
    assert!(output.status.success());
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1]["style"], "game-trailer");
    assert_eq!(rows[1]["voice"], "Fenrir");
}

#[test]
fn config_show_redacts_key() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("vibepitch.json"),
        r#"{"api_key":"super-secret","volume":0.4}"#,
    )
    .unwrap();

    vibepitch(&dir)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("super-secret").not())
        .stdout(predicate::str::contains("gemini-2.0-flash-exp"));
}

#[test]
fn config_validate_rejects_bad_volume() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("vibepitch.json"), r#"{"volume":2.0}"#).unwrap();

    vibepitch(&dir)
        .args(["config", "--validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("volume"));
}

#[test]
fn blank_idea_fails_before_any_request() {
    let dir = TempDir::new().unwrap();
    vibepitch(&dir)
        .args(["pitch", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("idea must not be empty"));
}

#[test]
fn intensity_above_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    vibepitch(&dir)
        .args(["script", "smart mug", "--intensity", "150"])
        .assert()
        .failure();
}
