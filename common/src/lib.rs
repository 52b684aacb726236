use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    time::Instant,
};

use anyhow::{Context, Result};

/// Read all lines of given file, trailing blank lines are dropped.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(ind, line)| {
            line.with_context(|| {
                format!(
                    "Failed to read line {} in given file({}).",
                    ind + 1,
                    path.as_ref().display()
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    Ok(lines)
}

pub fn timed<T, F>(label: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let t0 = Instant::now();
    let res = f();
    eprintln!("  {} took {:?}", label, t0.elapsed());
    res
}

pub fn report<T: Display>(part: usize, answer: T) {
    println!("Part {}: {}", part, answer);
}

#[test]
fn test_read_lines_drops_trailing_blank_lines() {
    let path = std::env::temp_dir().join(format!("common_read_lines_{}.txt", std::process::id()));
    std::fs::write(&path, "ab\n\ncd\n\n\n").unwrap();
    let lines = read_lines(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(lines, vec!["ab", "", "cd"]);
}

#[test]
fn test_read_lines_missing_file() {
    let err = read_lines("no/such/file.txt").unwrap_err();
    assert!(err.to_string().contains("no/such/file.txt"));
}
