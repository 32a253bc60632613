use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    fmt,
};

use crate::{
    board::{Board, Move, Pos},
    corridor, goal, heuristic, Puzzle,
};

type IndexMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

/// Which search produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Breadth-first search. Always returns a solution with the fewest moves.
    Shortest,
    /// A* over the corridor heuristic. Usually faster, but the heuristic may
    /// overestimate so the solution is not guaranteed to be minimal.
    Guided,
}

impl Method {
    pub const ALL: [Self; 2] = [Self::Shortest, Self::Guided];
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Shortest => "shortest",
            Method::Guided => "guided",
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// States taken off the frontier.
    pub expanded: usize,
    /// Successor states produced by legal moves.
    pub generated: usize,
    /// Corridors left after pruning (guided search only).
    pub corridors: usize,
    /// Heuristic evaluations, one per frontier push (guided search only).
    pub evaluated: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded {} states, generated {}",
            self.expanded, self.generated
        )?;
        if self.corridors != 0 {
            write!(
                f,
                ", {} corridors, {} estimates",
                self.corridors, self.evaluated
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    /// `None` if no sequence of moves opens the puzzle. An empty list means the
    /// puzzle was open to begin with.
    pub moves: Option<Vec<Move>>,
    pub stats: Stats,
    pub method: Method,
}

pub fn solve(puzzle: &Puzzle, method: Method) -> Solution {
    let mut stats = Stats::default();
    let moves = match method {
        Method::Shortest => bfs(&puzzle.board, puzzle.start, puzzle.end, &mut stats),
        Method::Guided => astar(&puzzle.board, puzzle.start, puzzle.end, &mut stats),
    };
    match &moves {
        Some(moves) => log::debug!("{method}: {} moves, {stats}", moves.len()),
        None => log::debug!("{method}: no solution, {stats}"),
    }
    Solution {
        moves,
        stats,
        method,
    }
}

/// Fewest-moves solution, or `None` if the puzzle cannot be opened.
pub fn solve_shortest(board: &Board, start: Pos, end: Pos) -> Option<Vec<Move>> {
    bfs(board, start, end, &mut Stats::default())
}

/// Heuristic solution, or `None` if the puzzle cannot be opened. Not
/// necessarily minimal; use [`solve_shortest`] when that matters.
pub fn solve_guided(board: &Board, start: Pos, end: Pos) -> Option<Vec<Move>> {
    astar(board, start, end, &mut Stats::default())
}

const PROGRESS_INTERVAL: usize = 100_000;

// Each state maps to the state it was reached from and the move taken.
type Link = Option<(usize, Move)>;

fn backtrack(last: usize, link: impl Fn(usize) -> Link) -> Vec<Move> {
    let mut steps = std::iter::successors(link(last), |&(parent, _)| link(parent))
        .map(|(_, mv)| mv)
        .collect::<Vec<_>>();
    steps.reverse();
    steps
}

fn bfs(board: &Board, start: Pos, end: Pos, stats: &mut Stats) -> Option<Vec<Move>> {
    if goal::is_open(board, start, end) {
        return Some(Vec::new());
    }

    let mut states: IndexMap<Board, Link> = IndexMap::default();
    states.insert(board.clone(), None);

    let mut cursor = 0;
    while let Some((state, _)) = states.get_index(cursor) {
        stats.expanded += 1;
        if stats.expanded % PROGRESS_INTERVAL == 0 {
            log::trace!("bfs: {stats}, {} states seen", states.len());
        }

        for (mv, next) in state.moves() {
            stats.generated += 1;
            if states.contains_key(&next) {
                continue;
            }
            let solved = goal::is_open(&next, start, end);
            let (index, _) = states.insert_full(next, Some((cursor, mv)));
            if solved {
                return Some(backtrack(index, |i| states[i]));
            }
        }
        cursor += 1;
    }

    None
}

struct Node {
    link: Link,
    g: usize,
    closed: bool,
}

/// Frontier entry, ordered by `f`, then `g`, then insertion order, so that
/// equal-priority entries always pop in the same sequence.
#[derive(PartialEq, Eq)]
struct Entry {
    f: usize,
    g: usize,
    seq: usize,
    index: usize,
}

impl Entry {
    fn key(&self) -> (usize, usize, usize) {
        (self.f, self.g, self.seq)
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn astar(board: &Board, start: Pos, end: Pos, stats: &mut Stats) -> Option<Vec<Move>> {
    let corridors = corridor::minimal(board, start, end);
    stats.corridors = corridors.len();
    // without a wall-free route the puzzle can never open
    let h = heuristic::estimate(board, &corridors)?;
    stats.evaluated += 1;

    let mut nodes: IndexMap<Board, Node> = IndexMap::default();
    nodes.insert(
        board.clone(),
        Node {
            link: None,
            g: 0,
            closed: false,
        },
    );

    let mut seq = 0;
    let mut open = BinaryHeap::new();
    open.push(Reverse(Entry {
        f: h,
        g: 0,
        seq,
        index: 0,
    }));

    while let Some(Reverse(Entry { g, index, .. })) = open.pop() {
        let (state, node) = nodes.get_index_mut(index)?;
        if node.closed {
            continue;
        }
        node.closed = true;
        stats.expanded += 1;
        if stats.expanded % PROGRESS_INTERVAL == 0 {
            log::trace!("astar: {stats}, {} in frontier", open.len());
        }

        if goal::is_open(state, start, end) {
            return Some(backtrack(index, |i| nodes[i].link));
        }

        let g = g + 1;
        for (mv, next) in state.moves() {
            stats.generated += 1;
            let link = Some((index, mv));
            let next_index = match nodes.get_full_mut(&next) {
                Some((_, _, node)) if node.g <= g => continue,
                Some((i, _, node)) => {
                    node.g = g;
                    node.link = link;
                    i
                }
                None => {
                    let (i, _) = nodes.insert_full(
                        next,
                        Node {
                            link,
                            g,
                            closed: false,
                        },
                    );
                    i
                }
            };
            let (pushed, _) = nodes.get_index(next_index)?;
            let h = heuristic::estimate(pushed, &corridors)?;
            stats.evaluated += 1;
            seq += 1;
            open.push(Reverse(Entry {
                f: g + h,
                g,
                seq,
                index: next_index,
            }));
        }
    }

    None
}
