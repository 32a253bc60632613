use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    ops::{Index, IndexMut},
};

use anyhow::{ensure, Result};
use smallvec::SmallVec;

pub type Pos = (usize, usize);
pub type BlockId = u8;

pub const EMPTY: u8 = 0;
pub const WALL: u8 = 99;

/// Cells of a single block, in row-major order.
pub type BlockCells = SmallVec<[Pos; 4]>;

/// A full snapshot of the grid. This is also the search state: two boards are
/// equal iff every cell matches.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Box<[u8]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used by move generation.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// A one-cell rigid translation of every cell of `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub block: BlockId,
    pub dir: Direction,
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.block, self.dir)
    }
}

pub fn is_block(value: u8) -> bool {
    value != EMPTY && value != WALL
}

impl Board {
    pub fn new(from: Vec<Vec<u8>>) -> Result<Board> {
        let rows = from.len();
        ensure!(rows > 0, "Board has no rows");
        let cols = from[0].len();
        ensure!(cols > 0, "Board has no columns");

        for (i, row) in from.iter().enumerate() {
            ensure!(
                row.len() == cols,
                "Width mismatch on row {i}, expecting width {cols}, got {}",
                row.len(),
            );
            for (j, &value) in row.iter().enumerate() {
                ensure!(
                    value <= WALL,
                    "Invalid cell value {value} at ({i}, {j}), block ids must be below {WALL}",
                );
            }
        }

        Ok(Board {
            rows,
            cols,
            cells: from.into_iter().flatten().collect(),
        })
    }

    /// Editor-style input where `-1` marks a wall.
    pub fn from_signed(from: Vec<Vec<i32>>) -> Result<Board> {
        let rows = from
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, value)| match value {
                        -1 => Ok(WALL),
                        0..=99 => Ok(value as u8),
                        _ => anyhow::bail!("Invalid cell value {value} at ({i}, {j})"),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Board::new(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 < self.rows && pos.1 < self.cols
    }

    pub fn get(&self, pos: Pos) -> Option<u8> {
        self.contains(pos).then(|| self[pos])
    }

    pub fn flat_index(&self, pos: Pos) -> usize {
        pos.0 * self.cols + pos.1
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, u8)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(ix, &value)| ((ix / cols, ix % cols), value))
    }

    pub fn neighbour(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let (di, dj) = dir.delta();
        let next = (pos.0.checked_add_signed(di)?, pos.1.checked_add_signed(dj)?);
        self.contains(next).then_some(next)
    }

    pub fn neighbours(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbour(pos, dir))
    }

    /// Partitions every block cell by identifier. Walls and empty cells are
    /// never included.
    pub fn blocks(&self) -> BTreeMap<BlockId, BlockCells> {
        let mut result = BTreeMap::<BlockId, BlockCells>::new();
        for (pos, value) in self.cells() {
            if is_block(value) {
                result.entry(value).or_default().push(pos);
            }
        }
        result
    }

    pub fn block_cells(&self, block: BlockId) -> BlockCells {
        self.cells()
            .filter(|&(_, value)| value == block)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Whether every cell of a block can shift one step in `dir`: the
    /// destination must be on the board and either empty or part of the same
    /// block.
    pub fn can_move(&self, block_cells: &[Pos], dir: Direction) -> bool {
        block_cells.iter().all(|&pos| {
            self.neighbour(pos, dir)
                .map_or(false, |target| self[target] == EMPTY || self[target] == self[pos])
        })
    }

    /// Checked move: `None` if the block does not exist or cannot move.
    pub fn try_move(&self, block: BlockId, dir: Direction) -> Option<Board> {
        if !is_block(block) {
            return None;
        }
        let cells = self.block_cells(block);
        if cells.is_empty() || !self.can_move(&cells, dir) {
            return None;
        }
        Some(self.slide(block, dir))
    }

    /// Every legal move from this board together with the resulting board,
    /// by ascending block id, then up, down, left, right.
    pub fn moves(&self) -> SmallVec<[(Move, Board); 16]> {
        let mut out = SmallVec::new();
        for (block, cells) in self.blocks() {
            for dir in Direction::ALL {
                if self.can_move(&cells, dir) {
                    out.push((Move { block, dir }, self.slide(block, dir)));
                }
            }
        }
        out
    }

    /// Replays `moves` one after another, stopping at the first illegal one.
    pub fn apply_moves(&self, moves: &[Move]) -> Option<Board> {
        moves.iter().try_fold(self.clone(), |board, mv| {
            board.try_move(mv.block, mv.dir)
        })
    }

    // Callers must have checked `can_move` first.
    fn slide(&self, block: BlockId, dir: Direction) -> Board {
        let (di, dj) = dir.delta();
        let mut result = self.clone();
        // walk from the leading edge so cleared cells are never overwritten
        for i in from_to_delta(0, self.rows, di) {
            for j in from_to_delta(0, self.cols, dj) {
                if self[(i, j)] == block {
                    let target = (
                        (i as isize + di) as usize,
                        (j as isize + dj) as usize,
                    );
                    result[target] = block;
                    result[(i, j)] = EMPTY;
                }
            }
        }
        result
    }
}

#[auto_enums::auto_enum(Iterator)]
fn from_to_delta(from: usize, to: usize, delta: isize) -> impl Iterator<Item = usize> {
    match delta {
        0 | 1 => (from..to).rev(),
        -1 => from..to,
        _ => unreachable!(),
    }
}

impl Index<Pos> for Board {
    type Output = u8;
    fn index(&self, index: Pos) -> &Self::Output {
        &self.cells[index.0 * self.cols + index.1]
    }
}

impl IndexMut<Pos> for Board {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        &mut self.cells[index.0 * self.cols + index.1]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.cells.chunks(self.cols).enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            for (j, &c) in line.iter().enumerate() {
                if j != 0 {
                    f.write_str(" ")?;
                }
                match c {
                    EMPTY => write!(f, "{:>2}", ".")?,
                    WALL => write!(f, "{:>2}", "#")?,
                    id => write!(f, "{id:>2}")?,
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{self}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn board(rows: &[&[i32]]) -> Board {
        Board::from_signed(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn rejects_ragged_and_invalid_rows() {
        assert!(Board::new(vec![vec![0, 0], vec![0]]).is_err());
        assert!(Board::new(vec![]).is_err());
        assert!(Board::new(vec![vec![100]]).is_err());
        assert!(Board::from_signed(vec![vec![-2]]).is_err());
    }

    #[test]
    fn signed_walls_are_translated() {
        let b = board(&[&[-1, 0], &[1, 99]]);
        assert_eq!(b[(0, 0)], WALL);
        assert_eq!(b[(1, 1)], WALL);
        assert_eq!(b[(1, 0)], 1);
    }

    #[test]
    fn blocks_exclude_walls_and_empties() {
        let b = board(&[&[2, 2, -1], &[0, 1, 0], &[-1, 1, 0]]);
        let blocks = b.blocks();
        assert_eq!(blocks.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(blocks[&1].as_slice(), &[(1, 1), (2, 1)]);
        assert_eq!(blocks[&2].as_slice(), &[(0, 0), (0, 1)]);
    }

    #[test]
    fn can_move_ignores_own_cells() {
        let b = board(&[&[1, 1, 0], &[0, 0, 0]]);
        let cells = b.block_cells(1);
        assert!(b.can_move(&cells, Direction::Right));
        assert!(b.can_move(&cells, Direction::Down));
        assert!(!b.can_move(&cells, Direction::Left));
        assert!(!b.can_move(&cells, Direction::Up));
    }

    #[test]
    fn can_move_is_blocked_by_walls_and_other_blocks() {
        let b = board(&[&[1, 2], &[-1, 0]]);
        assert!(!b.can_move(&b.block_cells(1), Direction::Right));
        assert!(!b.can_move(&b.block_cells(1), Direction::Down));
        assert!(b.can_move(&b.block_cells(2), Direction::Down));
    }

    #[test]
    fn try_move_translates_only_the_moved_block() {
        let b = board(&[&[1, 1, 0, 0], &[0, 1, 0, 2], &[3, 0, 0, 2]]);
        let moved = b.try_move(1, Direction::Right).unwrap();
        assert_eq!(moved, board(&[&[0, 1, 1, 0], &[0, 0, 1, 2], &[3, 0, 0, 2]]));

        let before = b.blocks();
        let after = moved.blocks();
        assert_eq!(before[&2], after[&2]);
        assert_eq!(before[&3], after[&3]);
        let shifted: BlockCells = before[&1].iter().map(|&(i, j)| (i, j + 1)).collect();
        assert_eq!(after[&1], shifted);
        // the input is left untouched
        assert_eq!(b[(0, 0)], 1);
    }

    #[test]
    fn try_move_rejects_missing_blocks_and_walls() {
        let b = board(&[&[1, 0], &[-1, 0]]);
        assert!(b.try_move(5, Direction::Right).is_none());
        assert!(b.try_move(WALL, Direction::Right).is_none());
        assert!(b.try_move(EMPTY, Direction::Right).is_none());
        assert!(b.try_move(1, Direction::Up).is_none());
    }

    #[test]
    fn moves_follow_block_then_direction_order() {
        let b = board(&[&[0, 2, 0], &[0, 1, 0]]);
        let moves: Vec<_> = b.moves().into_iter().map(|(mv, _)| mv.to_string()).collect();
        assert_eq!(moves, vec!["1 left", "1 right", "2 left", "2 right"]);
    }

    #[test]
    fn every_generated_move_is_replayable() {
        let b = board(&[&[1, 1, 0], &[0, 3, 3], &[2, 0, 0]]);
        for (mv, next) in b.moves() {
            assert_eq!(b.apply_moves(&[mv]), Some(next));
        }
    }

    #[test]
    fn apply_moves_stops_on_illegal_move() {
        let b = board(&[&[1, 0]]);
        let right = Move { block: 1, dir: Direction::Right };
        assert_eq!(b.apply_moves(&[right]), Some(board(&[&[0, 1]])));
        assert_eq!(b.apply_moves(&[right, right]), None);
        assert_eq!(b.apply_moves(&[]), Some(b.clone()));
    }

    #[test]
    fn neighbour_stays_in_bounds() {
        let b = board(&[&[0, 0], &[0, 0]]);
        assert_eq!(b.neighbour((0, 0), Direction::Up), None);
        assert_eq!(b.neighbour((0, 0), Direction::Left), None);
        assert_eq!(b.neighbour((1, 1), Direction::Down), None);
        assert_eq!(b.neighbour((0, 1), Direction::Down), Some((1, 1)));
        assert_eq!(b.neighbours((0, 0)).collect::<Vec<_>>(), vec![(1, 0), (0, 1)]);
    }
}
