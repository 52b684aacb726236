use std::{
    collections::{BTreeMap, VecDeque},
    error,
    fmt::Display,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InconsistentRow(usize, usize),
    MultipleStartPosition(Position, Position),
    MultipleEndPosition(Position, Position),
    InvalidCharForMap(char),
    NoStartPosition,
    NoEndPosition,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InconsistentRow(expect_col_n, this_col_n) => write!(
                f,
                "Expect {} column(s) in each row, given {}.",
                expect_col_n, this_col_n
            ),
            Error::MultipleStartPosition(last_pos, pos) => write!(
                f,
                "Expect only one start position, given two({}, {}).",
                last_pos, pos
            ),
            Error::MultipleEndPosition(last_pos, pos) => write!(
                f,
                "Expect only one end position, given two({}, {}).",
                last_pos, pos
            ),
            Error::InvalidCharForMap(c) => write!(f, "Invalid character({}) for map.", c),
            Error::NoStartPosition => write!(f, "No start position in map."),
            Error::NoEndPosition => write!(f, "No end position in map."),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Least picoseconds a cheat must save to be counted.
    #[arg(long, default_value_t = 100)]
    pub save_threshold: usize,
    /// Cheat duration(picoseconds) for part 1.
    #[arg(long, default_value_t = 2)]
    pub short_cheat: usize,
    /// Cheat duration(picoseconds) for part 2.
    #[arg(long, default_value_t = 20)]
    pub long_cheat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn neighbor(&self, dir: Direction) -> Option<Self> {
        match dir {
            Direction::North if self.r > 0 => Some(Self::new(self.r - 1, self.c)),
            Direction::East => Some(Self::new(self.r, self.c + 1)),
            Direction::South => Some(Self::new(self.r + 1, self.c)),
            Direction::West if self.c > 0 => Some(Self::new(self.r, self.c - 1)),
            _ => None,
        }
    }

    pub fn manhattan(&self, other: &Position) -> usize {
        self.r.abs_diff(other.r) + self.c.abs_diff(other.c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Track,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn all_dirs() -> &'static [Direction] {
        static ALL_DIRCTIONS: [Direction; 4] = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];

        &ALL_DIRCTIONS
    }
}

/// Shortest step counts from one position to every reachable track tile.
#[derive(Debug)]
pub struct DistanceMap {
    steps: Vec<Option<usize>>,
    col_n: usize,
}

impl DistanceMap {
    pub fn get(&self, pos: &Position) -> Option<usize> {
        if pos.c < self.col_n {
            self.steps.get(pos.r * self.col_n + pos.c).copied().flatten()
        } else {
            None
        }
    }

    pub fn reached(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        self.steps.iter().enumerate().filter_map(|(ind, steps)| {
            steps.map(|steps_n| (Position::new(ind / self.col_n, ind % self.col_n), steps_n))
        })
    }
}

#[derive(Debug)]
pub struct Map {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
    start_pos: Position,
    end_pos: Position,
}

impl TryFrom<&str> for Map {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let mut builder = MapBuilder::new();
        for line in value.lines().filter(|line| !line.trim().is_empty()) {
            builder.add_row(line.trim())?;
        }

        builder.build()
    }
}

impl Map {
    pub fn start_pos(&self) -> &Position {
        &self.start_pos
    }

    pub fn end_pos(&self) -> &Position {
        &self.end_pos
    }

    pub fn fastest_steps_n(&self) -> Option<usize> {
        self.distances_from(&self.start_pos).get(&self.end_pos)
    }

    pub fn distances_from(&self, from_pos: &Position) -> DistanceMap {
        let mut steps = vec![None; self.tiles.len()];
        if let Some(ind) = self.track_ind(from_pos) {
            steps[ind] = Some(0);
            let mut search_states = VecDeque::from([(*from_pos, 0)]);
            while let Some((cur_pos, cur_steps_n)) = search_states.pop_front() {
                for dir in Direction::all_dirs() {
                    let Some((next_pos, next_ind)) = cur_pos
                        .neighbor(*dir)
                        .and_then(|pos| self.track_ind(&pos).map(|ind| (pos, ind)))
                    else {
                        continue;
                    };

                    if steps[next_ind].is_none() {
                        steps[next_ind] = Some(cur_steps_n + 1);
                        search_states.push_back((next_pos, cur_steps_n + 1));
                    }
                }
            }
        }

        DistanceMap {
            steps,
            col_n: self.col_n,
        }
    }

    /// Count cheats lasting at most `max_duration` picoseconds, grouped by the
    /// picoseconds they save. A cheat is keyed by its start and end positions.
    pub fn saving_cheats_n(&self, max_duration: usize) -> BTreeMap<usize, usize> {
        let mut saving_map = BTreeMap::new();
        let from_start = self.distances_from(&self.start_pos);
        let Some(fastest_steps_n) = from_start.get(&self.end_pos) else {
            return saving_map;
        };
        let to_end = self.distances_from(&self.end_pos);

        for (cheat_start, start_steps_n) in from_start.reached() {
            let r_max = cheat_start
                .r
                .saturating_add(max_duration)
                .min(self.row_n.saturating_sub(1));
            for r in cheat_start.r.saturating_sub(max_duration)..=r_max {
                let rest_duration = max_duration - r.abs_diff(cheat_start.r);
                let c_max = cheat_start
                    .c
                    .saturating_add(rest_duration)
                    .min(self.col_n.saturating_sub(1));
                for c in cheat_start.c.saturating_sub(rest_duration)..=c_max {
                    let cheat_end = Position::new(r, c);
                    let cheat_steps_n = cheat_start.manhattan(&cheat_end);
                    if cheat_steps_n == 0 {
                        continue;
                    }

                    let Some(end_steps_n) = to_end.get(&cheat_end) else {
                        continue;
                    };
                    let cheated_steps_n = start_steps_n + cheat_steps_n + end_steps_n;
                    if cheated_steps_n < fastest_steps_n {
                        *saving_map
                            .entry(fastest_steps_n - cheated_steps_n)
                            .or_insert(0) += 1;
                    }
                }
            }
        }

        saving_map
    }

    pub fn cheats_saving_at_least(&self, max_duration: usize, threshold: usize) -> usize {
        self.saving_cheats_n(max_duration)
            .range(threshold.max(1)..)
            .map(|(_, count)| count)
            .sum()
    }

    pub fn tile(&self, pos: &Position) -> Option<&Tile> {
        if pos.r < self.row_n && pos.c < self.col_n {
            self.tiles.get(pos.r * self.col_n + pos.c)
        } else {
            None
        }
    }

    fn track_ind(&self, pos: &Position) -> Option<usize> {
        self.tile(pos)
            .filter(|tile| **tile == Tile::Track)
            .map(|_| pos.r * self.col_n + pos.c)
    }
}

#[derive(Debug)]
struct MapBuilder {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: Option<usize>,
    start_pos: Option<Position>,
    end_pos: Option<Position>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            row_n: 0,
            col_n: None,
            start_pos: None,
            end_pos: None,
        }
    }

    pub fn add_row(&mut self, text: &str) -> Result<(), Error> {
        let this_col_n = text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(expect_col_n, this_col_n));
        }

        for (ind, c) in text.chars().enumerate() {
            let pos = Position::new(self.row_n, ind);
            self.tiles.push(match c {
                'S' => {
                    if let Some(last_pos) = self.start_pos {
                        return Err(Error::MultipleStartPosition(last_pos, pos));
                    }

                    self.start_pos = Some(pos);
                    Tile::Track
                }
                'E' => {
                    if let Some(last_pos) = self.end_pos {
                        return Err(Error::MultipleEndPosition(last_pos, pos));
                    }

                    self.end_pos = Some(pos);
                    Tile::Track
                }
                '#' => Tile::Wall,
                '.' => Tile::Track,
                other => return Err(Error::InvalidCharForMap(other)),
            });
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<Map, Error> {
        let Some(start_pos) = self.start_pos else {
            return Err(Error::NoStartPosition);
        };
        let Some(end_pos) = self.end_pos else {
            return Err(Error::NoEndPosition);
        };

        Ok(Map {
            tiles: self.tiles,
            row_n: self.row_n,
            col_n: self.col_n.unwrap_or(0),
            start_pos,
            end_pos,
        })
    }
}

pub fn read_map<P: AsRef<Path>>(path: P) -> Result<Map> {
    let mut builder = MapBuilder::new();
    for (ind, line) in common::read_lines(&path)?.iter().enumerate() {
        builder.add_row(line.as_str()).with_context(|| {
            format!(
                "Failed to read map row from line {} in given file({}).",
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
fn test_fastest_steps_n() {
    let map = Map::try_from(SAMPLE).unwrap();
    assert_eq!(*map.start_pos(), Position::new(3, 1));
    assert_eq!(*map.end_pos(), Position::new(7, 5));
    assert_eq!(map.fastest_steps_n(), Some(84));
}

#[test]
fn test_short_cheat_savings() {
    let map = Map::try_from(SAMPLE).unwrap();
    let saving_map = map.saving_cheats_n(2);
    let expect = BTreeMap::from([
        (2, 14),
        (4, 14),
        (6, 2),
        (8, 4),
        (10, 2),
        (12, 3),
        (20, 1),
        (36, 1),
        (38, 1),
        (40, 1),
        (64, 1),
    ]);
    assert_eq!(saving_map, expect);
    assert_eq!(map.cheats_saving_at_least(2, 20), 5);
}

#[test]
fn test_long_cheat_savings() {
    let map = Map::try_from(SAMPLE).unwrap();
    let saving_map = map.saving_cheats_n(20);
    assert_eq!(saving_map.get(&76), Some(&3));
    assert_eq!(saving_map.get(&74), Some(&4));
    assert_eq!(saving_map.get(&72), Some(&22));
    assert_eq!(map.cheats_saving_at_least(20, 50), 285);
}

#[test]
fn test_unbounded_cheat_duration() {
    let map = Map::try_from(SAMPLE).unwrap();
    let whole_map_duration = 15 + 15;
    assert_eq!(
        map.saving_cheats_n(usize::MAX),
        map.saving_cheats_n(whole_map_duration)
    );
}

#[test]
fn test_open_track_has_no_saving() {
    let map = Map::try_from("S...\n...E").unwrap();
    assert_eq!(map.fastest_steps_n(), Some(4));
    assert!(map.saving_cheats_n(20).is_empty());
}

#[test]
fn test_unreachable_end() {
    let map = Map::try_from("S#E").unwrap();
    assert_eq!(map.fastest_steps_n(), None);
    assert!(map.saving_cheats_n(2).is_empty());
}

#[test]
fn test_malformed_maps() {
    assert_eq!(
        Map::try_from("S.\n.E.").unwrap_err(),
        Error::InconsistentRow(2, 3)
    );
    assert_eq!(
        Map::try_from("S.S\n..E").unwrap_err(),
        Error::MultipleStartPosition(Position::new(0, 0), Position::new(0, 2))
    );
    assert_eq!(
        Map::try_from("S.E\n..E").unwrap_err(),
        Error::MultipleEndPosition(Position::new(0, 2), Position::new(1, 2))
    );
    assert_eq!(Map::try_from("S.x.E").unwrap_err(), Error::InvalidCharForMap('x'));
    assert_eq!(Map::try_from("..E").unwrap_err(), Error::NoStartPosition);
    assert_eq!(Map::try_from("S..").unwrap_err(), Error::NoEndPosition);
}
