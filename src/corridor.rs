//! Simple start-to-end paths over the static wall layout, used to estimate how
//! many blocks still stand in the way.

use fxhash::FxHashSet;
use itertools::Itertools;

use crate::board::{Board, Direction, Pos, WALL};

/// A 4-connected walk from start to end that never touches a wall and never
/// repeats a cell. Block occupancy is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corridor(Vec<Pos>);

impl Corridor {
    pub fn cells(&self) -> &[Pos] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn cell_set(&self) -> FxHashSet<Pos> {
        self.0.iter().copied().collect()
    }
}

/// Every simple path from `start` to `end` through non-wall cells.
///
/// Exponential in the number of open cells; meant to run once per puzzle on
/// small boards. Paths come out in depth-first order, exploring neighbours up,
/// down, left, right.
pub fn enumerate(board: &Board, start: Pos, end: Pos) -> Vec<Corridor> {
    let paths = walk(board, start, end, false);
    log::debug!(
        "Enumerated {} corridors from {start:?} to {end:?}",
        paths.len()
    );
    paths
}

/// Same result as `prune(enumerate(..))`, computed without listing the
/// dominated paths first.
///
/// A path whose cells are a strict superset of another path's cells always
/// has a chord: two cells adjacent on the board but not along the path.
/// Cutting the walk at a chord gives a shorter path inside the same cells, and
/// a chordless path admits no other route through its cells. So the pruned set
/// is exactly the chordless paths, which the walk can reject as soon as the
/// chord appears.
pub fn minimal(board: &Board, start: Pos, end: Pos) -> Vec<Corridor> {
    let paths = walk(board, start, end, true);
    log::debug!(
        "Found {} minimal corridors from {start:?} to {end:?}",
        paths.len()
    );
    paths
}

fn walk(board: &Board, start: Pos, end: Pos, chordless: bool) -> Vec<Corridor> {
    let mut paths = Vec::new();
    let passable = |pos: Pos| board.get(pos).map_or(false, |v| v != WALL);
    if !passable(start) || !passable(end) {
        return paths;
    }

    let mut on_path = vec![false; board.area()];
    let mut path = vec![start];
    // next direction to try for each cell on `path`
    let mut next_dir = vec![0usize];
    on_path[board.flat_index(start)] = true;

    while let (Some(&pos), Some(tried)) = (path.last(), next_dir.last_mut()) {
        if pos == end || *tried == Direction::ALL.len() {
            if pos == end {
                paths.push(Corridor(path.clone()));
            }
            on_path[board.flat_index(pos)] = false;
            path.pop();
            next_dir.pop();
            continue;
        }

        let dir = Direction::ALL[*tried];
        *tried += 1;
        let Some(next) = board.neighbour(pos, dir) else {
            continue;
        };
        let ix = board.flat_index(next);
        if board[next] == WALL || on_path[ix] {
            continue;
        }
        if chordless
            && board
                .neighbours(next)
                .any(|n| n != pos && on_path[board.flat_index(n)])
        {
            continue;
        }
        on_path[ix] = true;
        path.push(next);
        next_dir.push(0);
    }

    paths
}

/// Drops every path whose cells are a superset of another path's cells. When
/// two paths cover the same cells the one enumerated first is kept.
///
/// The result keeps the input order and no two retained paths are in a subset
/// relation, so pruning twice changes nothing.
pub fn prune(paths: Vec<Corridor>) -> Vec<Corridor> {
    let sets = paths.iter().map(Corridor::cell_set).collect::<Vec<_>>();

    // A subset is never longer than its superset, so checking shorter paths
    // first means every candidate only has to be compared with kept paths.
    let by_len = (0..paths.len())
        .sorted_by_key(|&ix| paths[ix].len())
        .collect::<Vec<_>>();
    let mut keep = vec![false; paths.len()];
    let mut kept: Vec<usize> = Vec::new();
    for ix in by_len {
        if kept.iter().all(|&k| !sets[k].is_subset(&sets[ix])) {
            keep[ix] = true;
            kept.push(ix);
        }
    }

    let before = paths.len();
    let result = paths
        .into_iter()
        .zip(keep)
        .filter_map(|(path, keep)| keep.then_some(path))
        .collect::<Vec<_>>();
    log::debug!("Pruned corridors from {before} to {}", result.len());
    result
}
