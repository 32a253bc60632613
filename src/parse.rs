use std::{fmt, str::FromStr};

use anyhow::{bail, ensure, Context, Result};

use crate::{board::WALL, Board, Pos, Puzzle};

// Format:
// `start R C` and `end R C` give the two cells to join (0-based),
// every other non-blank line is a grid row of whitespace-separated cells:
// `.` or `0` is empty, `#`, `-1` or `99` is a wall, 1..=98 is a block id.
// Lines starting with `//` are ignored.

fn parse_cell(token: &str) -> Result<u8> {
    Ok(match token {
        "." => 0,
        "#" | "-1" => WALL,
        _ => {
            let value = token
                .parse::<u8>()
                .with_context(|| format!("Invalid cell: {token:?}"))?;
            ensure!(value <= WALL, "Invalid cell: {token:?}");
            value
        }
    })
}

fn parse_pos(rest: &str) -> Result<Pos> {
    let mut nums = rest.split_whitespace().map(|n| n.parse::<usize>());
    match (nums.next(), nums.next(), nums.next()) {
        (Some(i), Some(j), None) => Ok((i?, j?)),
        _ => bail!("Expecting two coordinates, got {rest:?}"),
    }
}

fn lines(s: &str) -> impl Iterator<Item = &str> {
    s.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
}

fn parse_row(line: &str) -> Result<Vec<u8>> {
    line.split_whitespace().map(parse_cell).collect()
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = lines(s)
            .enumerate()
            .map(|(i, line)| parse_row(line).with_context(|| format!("On row {i}")))
            .collect::<Result<Vec<_>>>()?;
        Board::new(rows)
    }
}

impl FromStr for Puzzle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut start = None;
        let mut end = None;
        let mut rows = Vec::new();

        for line in lines(s) {
            if let Some(rest) = line.strip_prefix("start") {
                ensure!(start.is_none(), "Multiple starts");
                start = Some(parse_pos(rest).context("Invalid start")?);
            } else if let Some(rest) = line.strip_prefix("end") {
                ensure!(end.is_none(), "Multiple ends");
                end = Some(parse_pos(rest).context("Invalid end")?);
            } else {
                let row = rows.len();
                rows.push(parse_row(line).with_context(|| format!("On row {row}"))?);
            }
        }

        let board = Board::new(rows)?;
        let start = start.context("Missing start")?;
        let end = end.context("Missing end")?;
        for (name, pos) in [("Start", start), ("End", end)] {
            ensure!(
                board.contains(pos),
                "{name} {pos:?} is outside the {}x{} board",
                board.rows(),
                board.cols(),
            );
        }

        Ok(Puzzle { board, start, end })
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start {} {}", self.start.0, self.start.1)?;
        writeln!(f, "end {} {}", self.end.0, self.end.1)?;
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const LEVEL: &str = "
// blocks in both corners
start 0 0
end 2 2

 3  .  .
 3  1  .
-1  #  2
";

    #[test]
    fn parses_level() {
        let puzzle = LEVEL.parse::<Puzzle>().unwrap();
        assert_eq!(puzzle.start, (0, 0));
        assert_eq!(puzzle.end, (2, 2));
        assert_eq!(
            puzzle.board,
            Board::new(vec![vec![3, 0, 0], vec![3, 1, 0], vec![WALL, WALL, 2]]).unwrap()
        );
        assert!(!puzzle.is_open());
    }

    #[test]
    fn display_round_trips() {
        let puzzle = LEVEL.parse::<Puzzle>().unwrap();
        let printed = puzzle.to_string();
        assert_eq!(printed.parse::<Puzzle>().unwrap(), puzzle);
        assert!(printed.starts_with("start 0 0\nend 2 2\n 3  .  .\n"));
    }

    #[test]
    fn bare_grid() {
        let board = "0 1\n# 0".parse::<Board>().unwrap();
        assert_eq!(board[(0, 1)], 1);
        assert_eq!(board[(1, 0)], WALL);
    }

    #[test]
    fn rejects_malformed_levels() {
        for bad in [
            "end 0 0\n0 0",
            "start 0 0\n0 0",
            "start 0 0\nstart 0 1\nend 0 0\n0 0",
            "start 0 0\nend 0 5\n0 0",
            "start 0\nend 0 0\n0 0",
            "start 0 0\nend 0 0\n0 0\n0",
            "start 0 0\nend 0 0\n0 x",
            "start 0 0\nend 0 0\n0 100",
            "start 0 0\nend 0 0",
        ] {
            assert!(bad.parse::<Puzzle>().is_err(), "{bad:?}");
        }
    }
}
