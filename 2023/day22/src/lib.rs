use std::{
    collections::{HashMap, VecDeque},
    error,
    fmt::Display,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidBrickText(String),
    ReversedBrick(Cube, Cube),
    TooHighStack(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidBrickText(s) => write!(f, "Invalid text({}) for brick.", s),
            Error::ReversedBrick(start, end) => write!(
                f,
                "Expect brick start({}) not beyond its end({}) on any axis.",
                start, end
            ),
            Error::TooHighStack(label) => {
                write!(f, "Brick({}) settles beyond the highest level.", label)
            }
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cube {
    x: usize,
    y: usize,
    z: usize,
}

impl Display for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl Cube {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brick {
    start: Cube,
    end: Cube,
    label: String,
}

impl Display for Brick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}~{}", self.label, self.start, self.end)
    }
}

impl Brick {
    pub fn new(start: Cube, end: Cube, label: &str) -> Result<Self, Error> {
        if start.x > end.x || start.y > end.y || start.z > end.z {
            return Err(Error::ReversedBrick(start, end));
        }

        Ok(Self {
            start,
            end,
            label: label.to_string(),
        })
    }

    /// Parse `x,y,z~x,y,z`, labelling the brick by its order in the snapshot.
    pub fn parse(text: &str, ind: usize) -> Result<Self, Error> {
        static BRICK_PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(\d+),(\d+),(\d+)~(\d+),(\d+),(\d+)$").unwrap()
        });

        let text = text.trim();
        let caps = BRICK_PATTERN
            .captures(text)
            .ok_or_else(|| Error::InvalidBrickText(text.to_string()))?;
        let mut coords = [0usize; 6];
        for (coord, cap) in coords.iter_mut().zip(caps.iter().skip(1)) {
            *coord = cap
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .ok_or_else(|| Error::InvalidBrickText(text.to_string()))?;
        }

        Self::new(
            Cube::new(coords[0], coords[1], coords[2]),
            Cube::new(coords[3], coords[4], coords[5]),
            &brick_label(ind),
        )
    }

    pub fn start(&self) -> &Cube {
        &self.start
    }

    pub fn end(&self) -> &Cube {
        &self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn overlaps_xy(&self, other: &Brick) -> bool {
        self.start.x <= other.end.x
            && other.start.x <= self.end.x
            && self.start.y <= other.end.y
            && other.start.y <= self.end.y
    }

    fn footprint(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.start.x..=self.end.x)
            .flat_map(move |x| (self.start.y..=self.end.y).map(move |y| (x, y)))
    }
}

/// Label in spreadsheet-column order: A..Z, AA, AB...
pub fn brick_label(ind: usize) -> String {
    let mut n = ind + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    letters.iter().rev().collect()
}

/// Drop every brick as far as it goes, the ground being at z = 0. Bricks end
/// up ordered by their lowest z.
pub fn settle(bricks: &mut [Brick]) -> Result<(), Error> {
    bricks.sort_by_key(|brick| brick.start.z);

    // Only covered columns are kept, coordinates may be sparse.
    let mut height_map: HashMap<(usize, usize), usize> = HashMap::new();
    for brick in bricks.iter_mut() {
        let height = brick.end.z - brick.start.z;
        let floor = brick
            .footprint()
            .filter_map(|xy| height_map.get(&xy).copied())
            .max()
            .unwrap_or(0);
        let Some(top) = floor
            .checked_add(1)
            .and_then(|bottom| bottom.checked_add(height))
        else {
            return Err(Error::TooHighStack(brick.label.clone()));
        };
        brick.start.z = floor + 1;
        brick.end.z = top;
        for xy in brick.footprint() {
            height_map.insert(xy, top);
        }
    }

    Ok(())
}

#[derive(Debug)]
pub struct SupportGraph {
    supported_by: Vec<Vec<usize>>,
    supports: Vec<Vec<usize>>,
}

impl SupportGraph {
    pub fn new(bricks: &[Brick]) -> Self {
        let mut supported_by = vec![Vec::new(); bricks.len()];
        let mut supports = vec![Vec::new(); bricks.len()];
        for (lower_ind, lower) in bricks.iter().enumerate() {
            for (upper_ind, upper) in bricks.iter().enumerate() {
                if lower_ind != upper_ind
                    && lower.end.z.checked_add(1) == Some(upper.start.z)
                    && lower.overlaps_xy(upper)
                {
                    supports[lower_ind].push(upper_ind);
                    supported_by[upper_ind].push(lower_ind);
                }
            }
        }

        Self {
            supported_by,
            supports,
        }
    }

    pub fn supported_by(&self, ind: usize) -> &[usize] {
        &self.supported_by[ind]
    }

    pub fn supports(&self, ind: usize) -> &[usize] {
        &self.supports[ind]
    }

    /// Count bricks whose disintegration lets nothing fall.
    pub fn removable_count(&self) -> usize {
        self.supports
            .iter()
            .filter(|uppers| {
                uppers
                    .iter()
                    .all(|upper| self.supported_by[*upper].len() > 1)
            })
            .count()
    }

    /// Count other bricks that fall if brick `ind` is disintegrated.
    pub fn chain_reaction(&self, ind: usize) -> usize {
        let mut fallen = vec![false; self.supports.len()];
        fallen[ind] = true;
        let mut fallen_n = 0;
        let mut to_check = VecDeque::from([ind]);
        while let Some(cur_ind) = to_check.pop_front() {
            for &upper in &self.supports[cur_ind] {
                if !fallen[upper] && self.supported_by[upper].iter().all(|lower| fallen[*lower]) {
                    fallen[upper] = true;
                    fallen_n += 1;
                    to_check.push_back(upper);
                }
            }
        }

        fallen_n
    }

    pub fn total_chain_reaction(&self) -> usize {
        (0..self.supports.len())
            .map(|ind| self.chain_reaction(ind))
            .sum()
    }
}

pub fn parse_bricks(text: &str) -> Result<Vec<Brick>, Error> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(ind, line)| Brick::parse(line, ind))
        .collect()
}

pub fn read_bricks<P: AsRef<Path>>(path: P) -> Result<Vec<Brick>> {
    common::read_lines(&path)?
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .enumerate()
        .map(|(ind, (line_ind, line))| {
            Brick::parse(line, ind).with_context(|| {
                format!(
                    "Failed to read brick from line {} in given file({}).",
                    line_ind + 1,
                    path.as_ref().display()
                )
            })
        })
        .collect()
}

#[cfg(test)]
const SAMPLE: &str = include_str!("../sample.txt");

#[cfg(test)]
fn settled_sample() -> Vec<Brick> {
    let mut bricks = parse_bricks(SAMPLE).unwrap();
    settle(&mut bricks).unwrap();
    bricks
}

#[test]
fn test_parse_brick() {
    let brick = Brick::parse("0,1,6~2,1,6", 5).unwrap();
    assert_eq!(*brick.start(), Cube::new(0, 1, 6));
    assert_eq!(*brick.end(), Cube::new(2, 1, 6));
    assert_eq!(brick.label(), "F");
    assert_eq!(brick.to_string(), "F: 0,1,6~2,1,6");
}

#[test]
fn test_invalid_bricks() {
    assert_eq!(
        Brick::parse("0,1~2,1,6", 0).unwrap_err(),
        Error::InvalidBrickText("0,1~2,1,6".to_string())
    );
    assert_eq!(
        Brick::parse("2,1,6~0,1,6", 0).unwrap_err(),
        Error::ReversedBrick(Cube::new(2, 1, 6), Cube::new(0, 1, 6))
    );
}

#[test]
fn test_brick_label() {
    assert_eq!(brick_label(0), "A");
    assert_eq!(brick_label(25), "Z");
    assert_eq!(brick_label(26), "AA");
    assert_eq!(brick_label(27), "AB");
    assert_eq!(brick_label(701), "ZZ");
    assert_eq!(brick_label(702), "AAA");
}

#[test]
fn test_settle() {
    let bricks = settled_sample();
    let levels = bricks
        .iter()
        .map(|b| (b.label().to_string(), b.start().z, b.end().z))
        .collect::<Vec<_>>();
    let expect = [
        ("A", 1, 1),
        ("B", 2, 2),
        ("C", 2, 2),
        ("D", 3, 3),
        ("E", 3, 3),
        ("F", 4, 4),
        ("G", 5, 6),
    ]
    .map(|(label, z0, z1)| (label.to_string(), z0, z1));
    assert_eq!(levels, expect);
}

#[test]
fn test_settled_bricks_rest_on_something() {
    let bricks = settled_sample();
    let graph = SupportGraph::new(&bricks);
    for (ind, brick) in bricks.iter().enumerate() {
        assert!(brick.start().z == 1 || !graph.supported_by(ind).is_empty());
    }

    let mut resettled = bricks.clone();
    settle(&mut resettled).unwrap();
    assert_eq!(resettled, bricks);
}

#[test]
fn test_support_graph() {
    let graph = SupportGraph::new(&settled_sample());
    assert_eq!(graph.supports(0), &[1, 2]);
    assert_eq!(graph.supported_by(3), &[1, 2]);
    assert_eq!(graph.supported_by(5), &[3, 4]);
    assert_eq!(graph.supports(5), &[6]);
    assert!(graph.supports(6).is_empty());
}

#[test]
fn test_removable_count() {
    let graph = SupportGraph::new(&settled_sample());
    assert_eq!(graph.removable_count(), 5);
}

#[test]
fn test_chain_reaction() {
    let graph = SupportGraph::new(&settled_sample());
    assert_eq!(graph.chain_reaction(0), 6);
    assert_eq!(graph.chain_reaction(5), 1);
    assert_eq!(graph.chain_reaction(1), 0);
    assert_eq!(graph.total_chain_reaction(), 7);
}

#[test]
fn test_read_bricks_skips_blank_lines() {
    let path = std::env::temp_dir().join(format!("day22_blank_{}.txt", std::process::id()));
    std::fs::write(&path, "1,0,1~1,2,1\n\n0,0,2~2,0,2\n").unwrap();
    let read = read_bricks(&path);
    std::fs::remove_file(&path).unwrap();

    let parsed = parse_bricks("1,0,1~1,2,1\n\n0,0,2~2,0,2\n").unwrap();
    assert_eq!(read.unwrap(), parsed);
    assert_eq!(parsed[1].label(), "B");
}

#[test]
fn test_settle_sparse_coordinates() {
    let mut bricks = parse_bricks(
        "
5000000000,5000000000,7~5000000000,5000000001,7
5000000000,5000000001,3~5000000000,5000000001,4
0,0,9~0,0,9
",
    )
    .unwrap();
    settle(&mut bricks).unwrap();
    let levels = bricks
        .iter()
        .map(|b| (b.label().to_string(), b.start().z, b.end().z))
        .collect::<Vec<_>>();
    let expect = [("B", 1, 2), ("A", 3, 3), ("C", 1, 1)]
        .map(|(label, z0, z1)| (label.to_string(), z0, z1));
    assert_eq!(levels, expect);
}

#[test]
fn test_settle_too_high_stack() {
    let mut bricks = parse_bricks("0,0,1~0,0,1\n0,0,0~0,0,18446744073709551615").unwrap();
    assert_eq!(
        settle(&mut bricks).unwrap_err(),
        Error::TooHighStack("B".to_string())
    );
}
