use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lodestar(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lodestar").unwrap();
    cmd.arg("--home").arg(home.path());
    cmd
}

fn create_profile(home: &TempDir) -> String {
    let output = lodestar(home)
        .args(["profile", "create", "--name", "Ada", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["id"].as_str().unwrap().to_string()
}

#[test]
fn init_creates_config_and_database() {
    let home = TempDir::new().unwrap();
    lodestar(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: config.yaml"));

    assert!(home.path().join("config.yaml").exists());
    assert!(home.path().join("lodestar.redb").exists());

    // Second init leaves the existing config alone.
    lodestar(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  config.yaml"));
}

#[test]
fn commands_without_init_fail_cleanly() {
    let home = TempDir::new().unwrap();
    lodestar(&home)
        .args(["profile", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn checkin_flow_builds_a_streak() {
    let home = TempDir::new().unwrap();
    lodestar(&home).arg("init").assert().success();
    let user = create_profile(&home);

    lodestar(&home)
        .args([
            "checkin",
            "morning",
            "--user",
            &user,
            "--date",
            "2024-01-10",
            "--priority",
            "deep work",
            "--intention",
            "stay present",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 day streak"));

    lodestar(&home)
        .args([
            "checkin",
            "evening",
            "--user",
            &user,
            "--date",
            "2024-01-10",
            "--wins",
            "shipped",
            "--struggles",
            "late start",
            "--gratitude",
            "coffee",
            "--rating",
            "8",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("already counted today"));

    lodestar(&home)
        .args(["streak", "--user", &user])
        .assert()
        .success()
        .stdout(predicate::str::contains("current streak:  1 days"))
        .stdout(predicate::str::contains("total check-ins: 1"));
}

#[test]
fn checkin_show_round_trips() {
    let home = TempDir::new().unwrap();
    lodestar(&home).arg("init").assert().success();
    let user = create_profile(&home);

    lodestar(&home)
        .args([
            "checkin",
            "morning",
            "--user",
            &user,
            "--date",
            "2024-01-10",
            "--intention",
            "focus",
        ])
        .assert()
        .success();

    lodestar(&home)
        .args(["checkin", "show", "--user", &user, "--date", "2024-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"intention\": \"focus\""));
}

#[test]
fn invalid_rating_is_rejected() {
    let home = TempDir::new().unwrap();
    lodestar(&home).arg("init").assert().success();
    let user = create_profile(&home);

    lodestar(&home)
        .args([
            "checkin",
            "evening",
            "--user",
            &user,
            "--date",
            "2024-01-10",
            "--wins",
            "w",
            "--struggles",
            "s",
            "--gratitude",
            "g",
            "--rating",
            "11",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("day rating"));
}

#[test]
fn streak_for_unknown_profile_fails() {
    let home = TempDir::new().unwrap();
    lodestar(&home).arg("init").assert().success();

    lodestar(&home)
        .args(["streak", "--user", &uuid::Uuid::new_v4().to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile not found"));
}
