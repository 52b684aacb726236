use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn sample_with_puzzle_threshold_finds_no_cheat() {
    let mut cmd = Command::cargo_bin("day20").unwrap();
    cmd.arg("sample.txt");

    cmd.assert()
        .success()
        .stdout(str::contains("Part 1: 0\n"))
        .stdout(str::contains("Part 2: 0\n"));
}

#[test]
fn sample_with_lower_threshold() {
    let mut cmd = Command::cargo_bin("day20").unwrap();
    cmd.arg("sample.txt").arg("--save-threshold").arg("50");

    cmd.assert()
        .success()
        .stdout(str::contains("Part 1: 1\n"))
        .stdout(str::contains("Part 2: 285\n"));
}

#[test]
fn sample_with_custom_durations() {
    let mut cmd = Command::cargo_bin("day20").unwrap();
    cmd.arg("sample.txt")
        .arg("--save-threshold")
        .arg("20")
        .arg("--long-cheat")
        .arg("2");

    cmd.assert()
        .success()
        .stdout(str::contains("Part 1: 5\n"))
        .stdout(str::contains("Part 2: 5\n"));
}

#[test]
fn unbounded_cheat_duration_does_not_overflow() {
    let mut cmd = Command::cargo_bin("day20").unwrap();
    cmd.arg("sample.txt")
        .arg("--save-threshold")
        .arg("50")
        .arg("--long-cheat")
        .arg(usize::MAX.to_string());

    cmd.assert()
        .success()
        .stdout(str::contains("Part 1: 1\n"))
        .stdout(str::contains("Part 2: 285\n"));
}

#[test]
fn missing_input_path_prints_usage() {
    let mut cmd = Command::cargo_bin("day20").unwrap();

    cmd.assert().failure().stderr(str::contains("Usage"));
}

#[test]
fn nonexistent_input_file_fails() {
    let mut cmd = Command::cargo_bin("day20").unwrap();
    cmd.arg("no_such_inputs.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("no_such_inputs.txt"));
}
