use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn sample_output_right_answers() {
    let mut cmd = Command::cargo_bin("day14").unwrap();
    cmd.arg("sample.txt");

    cmd.assert()
        .success()
        .stdout(str::contains("Part 1: 136\n"))
        .stdout(str::contains("Part 2: 64\n"));
}

#[test]
fn sample_after_one_cycle() {
    let mut cmd = Command::cargo_bin("day14").unwrap();
    cmd.arg("sample.txt").arg("--cycles").arg("1");

    cmd.assert()
        .success()
        .stdout(str::contains("Part 2: 87\n"));
}

#[test]
fn invalid_platform_reports_line() {
    let path = std::env::temp_dir().join(format!("day14_invalid_{}.txt", std::process::id()));
    std::fs::write(&path, "O.#\n.x.\n").unwrap();

    let mut cmd = Command::cargo_bin("day14").unwrap();
    cmd.arg(&path);
    let assert = cmd.assert();
    std::fs::remove_file(&path).unwrap();

    assert
        .failure()
        .stderr(str::contains("line 2"))
        .stderr(str::contains("Invalid character(x)"));
}

#[test]
fn missing_input_path_prints_usage() {
    let mut cmd = Command::cargo_bin("day14").unwrap();

    cmd.assert().failure().stderr(str::contains("Usage"));
}
