use std::{
    collections::HashMap,
    error,
    fmt::Display,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InconsistentRow(usize, usize),
    InvalidCharForPlatform(char),
    EmptyPlatform,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InconsistentRow(expect_col_n, this_col_n) => write!(
                f,
                "Expect {} column(s) in each row, given {}.",
                expect_col_n, this_col_n
            ),
            Error::InvalidCharForPlatform(c) => {
                write!(f, "Invalid character({}) for platform.", c)
            }
            Error::EmptyPlatform => write!(f, "Given platform has no tile."),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Spin cycles to run before weighing the north support beams.
    #[arg(long, default_value_t = 1_000_000_000)]
    pub cycles: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    RoundRock,
    CubeRock,
    Empty,
}

impl TryFrom<char> for Tile {
    type Error = Error;

    fn try_from(value: char) -> std::result::Result<Self, Self::Error> {
        match value {
            'O' => Ok(Tile::RoundRock),
            '#' => Ok(Tile::CubeRock),
            '.' => Ok(Tile::Empty),
            other => Err(Error::InvalidCharForPlatform(other)),
        }
    }
}

impl From<Tile> for char {
    fn from(value: Tile) -> Self {
        match value {
            Tile::RoundRock => 'O',
            Tile::CubeRock => '#',
            Tile::Empty => '.',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Tilt order of one spin cycle.
    pub fn spin_dirs() -> &'static [Direction] {
        static SPIN_DIRECTIONS: [Direction; 4] = [
            Direction::North,
            Direction::West,
            Direction::South,
            Direction::East,
        ];

        &SPIN_DIRECTIONS
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
}

impl TryFrom<&str> for Platform {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let mut builder = PlatformBuilder::new();
        for line in value.lines().filter(|line| !line.trim().is_empty()) {
            builder.add_row(line.trim())?;
        }

        builder.build()
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.tiles.chunks(self.col_n) {
            for tile in row {
                write!(f, "{}", char::from(*tile))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Platform {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn round_rocks_n(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| **tile == Tile::RoundRock)
            .count()
    }

    /// Roll every round rock in `dir` until it hits the edge, a cube rock or
    /// a rock settled before it.
    pub fn tilt(&mut self, dir: Direction) {
        for lane in self.lanes(dir) {
            let mut free_ord = 0;
            for (ord, &ind) in lane.iter().enumerate() {
                match self.tiles[ind] {
                    Tile::CubeRock => free_ord = ord + 1,
                    Tile::RoundRock => {
                        if free_ord != ord {
                            self.tiles[lane[free_ord]] = Tile::RoundRock;
                            self.tiles[ind] = Tile::Empty;
                        }
                        free_ord += 1;
                    }
                    Tile::Empty => (),
                }
            }
        }
    }

    pub fn spin_cycle(&mut self) {
        for dir in Direction::spin_dirs() {
            self.tilt(*dir);
        }
    }

    pub fn north_load(&self) -> usize {
        self.tiles
            .chunks(self.col_n)
            .enumerate()
            .map(|(r, row)| {
                (self.row_n - r) * row.iter().filter(|tile| **tile == Tile::RoundRock).count()
            })
            .sum()
    }

    /// Spin `cycles_n` times, skipping whole periods once a state repeats,
    /// then weigh the north beams.
    pub fn load_after_cycles(&mut self, cycles_n: usize) -> usize {
        let mut seen_states = HashMap::new();
        let mut done_n = 0;
        while done_n < cycles_n {
            self.spin_cycle();
            done_n += 1;

            if let Some(last_done_n) = seen_states.insert(self.tiles.clone(), done_n) {
                let period = done_n - last_done_n;
                for _ in 0..((cycles_n - done_n) % period) {
                    self.spin_cycle();
                }
                break;
            }
        }

        self.north_load()
    }

    // Tile indices of each line along `dir`, first index being the one rocks
    // roll toward.
    fn lanes(&self, dir: Direction) -> Vec<Vec<usize>> {
        let (row_n, col_n) = (self.row_n, self.col_n);
        match dir {
            Direction::North => (0..col_n)
                .map(|c| (0..row_n).map(|r| r * col_n + c).collect())
                .collect(),
            Direction::South => (0..col_n)
                .map(|c| (0..row_n).rev().map(|r| r * col_n + c).collect())
                .collect(),
            Direction::West => (0..row_n)
                .map(|r| (0..col_n).map(|c| r * col_n + c).collect())
                .collect(),
            Direction::East => (0..row_n)
                .map(|r| (0..col_n).rev().map(|c| r * col_n + c).collect())
                .collect(),
        }
    }
}

#[derive(Debug)]
struct PlatformBuilder {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: Option<usize>,
}

impl PlatformBuilder {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            row_n: 0,
            col_n: None,
        }
    }

    pub fn add_row(&mut self, text: &str) -> Result<(), Error> {
        let this_col_n = text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(expect_col_n, this_col_n));
        }

        for c in text.chars() {
            self.tiles.push(Tile::try_from(c)?);
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<Platform, Error> {
        match self.col_n {
            Some(col_n) if col_n > 0 => Ok(Platform {
                tiles: self.tiles,
                row_n: self.row_n,
                col_n,
            }),
            _ => Err(Error::EmptyPlatform),
        }
    }
}

pub fn read_platform<P: AsRef<Path>>(path: P) -> Result<Platform> {
    let mut builder = PlatformBuilder::new();
    for (ind, line) in common::read_lines(&path)?.iter().enumerate() {
        builder.add_row(line.as_str()).with_context(|| {
            format!(
                "Failed to read platform row from line {} in given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
    }

    Ok(builder.build()?)
}

#[cfg(test)]
const SAMPLE: &str = include_str!("../sample.txt");

#[test]
fn test_north_tilt_load() {
    let mut platform = Platform::try_from(SAMPLE).unwrap();
    assert_eq!(platform.row_n(), 10);
    assert_eq!(platform.col_n(), 10);
    platform.tilt(Direction::North);
    assert_eq!(platform.north_load(), 136);
}

#[test]
fn test_spin_cycle() {
    let mut platform = Platform::try_from(SAMPLE).unwrap();
    platform.spin_cycle();
    let expect = "\
.....#....
....#...O#
...OO##...
.OO#......
.....OOO#.
.O#...O#.#
....O#....
......OOOO
#...O###..
#..OO#....
";
    assert_eq!(platform.to_string(), expect);
}

#[test]
fn test_load_after_cycles() {
    let mut platform = Platform::try_from(SAMPLE).unwrap();
    assert_eq!(platform.load_after_cycles(1_000_000_000), 64);
}

#[test]
fn test_zero_cycles_keeps_load() {
    let mut platform = Platform::try_from(SAMPLE).unwrap();
    let load = platform.north_load();
    assert_eq!(platform.load_after_cycles(0), load);
}

#[test]
fn test_tilt_keeps_rocks() {
    let mut platform = Platform::try_from(SAMPLE).unwrap();
    let rocks_n = platform.round_rocks_n();
    for dir in [
        Direction::East,
        Direction::North,
        Direction::South,
        Direction::West,
    ] {
        platform.tilt(dir);
        assert_eq!(platform.round_rocks_n(), rocks_n);
        let tilted = platform.clone();
        platform.tilt(dir);
        assert_eq!(platform, tilted);
    }
}

#[test]
fn test_spin_cycle_is_periodic() {
    let mut platform = Platform::try_from(SAMPLE).unwrap();
    for _ in 0..3 {
        platform.spin_cycle();
    }
    let entered = platform.clone();
    for _ in 0..7 {
        platform.spin_cycle();
    }
    assert_eq!(platform, entered);
}

#[test]
fn test_malformed_platforms() {
    assert_eq!(
        Platform::try_from("O..\n.#").unwrap_err(),
        Error::InconsistentRow(3, 2)
    );
    assert_eq!(
        Platform::try_from("O.x").unwrap_err(),
        Error::InvalidCharForPlatform('x')
    );
    assert_eq!(Platform::try_from("").unwrap_err(), Error::EmptyPlatform);
}
