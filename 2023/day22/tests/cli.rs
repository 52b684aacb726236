use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn sample_output_right_answers() {
    let mut cmd = Command::cargo_bin("day22").unwrap();
    cmd.arg("sample.txt");

    cmd.assert()
        .success()
        .stdout(str::contains("Part 1: 5\n"))
        .stdout(str::contains("Part 2: 7\n"));
}

#[test]
fn reversed_brick_is_rejected() {
    let path = std::env::temp_dir().join(format!("day22_reversed_{}.txt", std::process::id()));
    std::fs::write(&path, "1,0,1~1,2,1\n2,0,2~0,0,2\n").unwrap();

    let mut cmd = Command::cargo_bin("day22").unwrap();
    cmd.arg(&path);
    let assert = cmd.assert();
    std::fs::remove_file(&path).unwrap();

    assert
        .failure()
        .stderr(str::contains("line 2"))
        .stderr(str::contains("not beyond its end"));
}

#[test]
fn overflowing_stack_is_rejected() {
    let path = std::env::temp_dir().join(format!("day22_too_high_{}.txt", std::process::id()));
    std::fs::write(&path, "0,0,1~0,0,1\n0,0,0~0,0,18446744073709551615\n").unwrap();

    let mut cmd = Command::cargo_bin("day22").unwrap();
    cmd.arg(&path);
    let assert = cmd.assert();
    std::fs::remove_file(&path).unwrap();

    assert
        .failure()
        .stderr(str::contains("Failed to settle bricks"))
        .stderr(str::contains("Brick(B) settles beyond the highest level."));
}

#[test]
fn missing_input_path_prints_usage() {
    let mut cmd = Command::cargo_bin("day22").unwrap();

    cmd.assert().failure().stderr(str::contains("Usage"));
}
