//! allegro-node 命令行测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn node() -> Command {
    Command::cargo_bin("allegro-node").unwrap()
}

#[test]
fn test_help_lists_commands() {
    node()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_run_until_max_ticks() {
    node()
        .args(["run", "--max-ticks", "20", "--frequency", "2000", "--no-spin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20 ticks"))
        .stdout(predicate::str::contains("MaxTicks"));
}

#[test]
fn test_run_with_pd_controller() {
    node()
        .args(["run", "--max-ticks", "10", "--controller", "pd", "--no-spin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 ticks"));
}

#[test]
fn test_emergency_stop_exits_with_failure() {
    node()
        .args(["run", "--power-off-after", "5", "--no-spin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Emergency stop"));
}

#[test]
fn test_run_rejects_invalid_frequency() {
    node()
        .args(["run", "--frequency", "0", "--max-ticks", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frequency_hz"));
}

#[test]
fn test_run_rejects_unrepresentable_frequency() {
    node()
        .args(["run", "--frequency", "1e-30", "--max-ticks", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frequency_hz"));
}

#[test]
fn test_config_show_prints_defaults() {
    node()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[loop]"))
        .stdout(predicate::str::contains("allegroHand/joint_states"));
}

#[test]
fn test_config_check_reads_hand_info() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[loop]
frequency_hz = 333.0

[hand_info]
robot_name = "allegro_left"
which_hand = "left"
serial = "SAH030C033L"
"#
    )
    .unwrap();

    node()
        .args(["config", "check"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("333"))
        .stdout(predicate::str::contains("allegro_left (left)"));
}

#[test]
fn test_run_with_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[loop]
frequency_hz = 2000.0
max_ticks = 15
spin = false

[controller]
kind = "pd"
kp = 0.5
"#
    )
    .unwrap();

    node()
        .arg("run")
        .arg("--config")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("15 ticks"));
}

#[test]
fn test_config_check_rejects_invalid_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[sink]\nqueue_depth = 0").unwrap();

    node()
        .args(["config", "check"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("queue_depth"));
}
