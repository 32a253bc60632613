use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use klotski_solver::{solve, Method, Puzzle};

// Format:
// `start R C` and `end R C` mark the two cells to join,
// grid rows are whitespace-separated cells,
// `.` is empty, `#` is a wall, numbers are blocks (cells sharing a number move together).
const EXAMPLES: &[&str] = &[
    "
start 0 2
end 2 2
1 1 .
. . .
. . .
",
    "
start 0 0
end 3 3
1 1 1 .
. . . .
# # # 2
. . . .
",
    "
start 0 0
end 2 2
3 . .
3 1 .
. . 2
",
    "
start 4 0
end 2 5
1 1 1 1 3 4
1 2 . 1 5 .
1 1 . 1 5 .
6 7 . 6 . .
6 6 6 6 . .
",
];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Shortest,
    Guided,
    Both,
}

impl MethodArg {
    fn methods(self) -> &'static [Method] {
        match self {
            MethodArg::Shortest => &[Method::Shortest],
            MethodArg::Guided => &[Method::Guided],
            MethodArg::Both => &Method::ALL,
        }
    }
}

#[derive(Parser)]
#[command(name = "klotski-solver")]
#[command(about = "Slide blocks until an empty path joins two cells")]
struct Cli {
    /// Level files to solve; the built-in examples are used when none are given.
    levels: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = MethodArg::Both)]
    method: MethodArg,

    /// Print the board after every move of the solution.
    #[arg(long)]
    replay: bool,
}

fn run(puzzle: &Puzzle, cli: &Cli) -> Result<()> {
    println!("----");
    println!("{puzzle}");
    println!("----");

    for &method in cli.method.methods() {
        let started = Instant::now();
        let solution = solve(puzzle, method);
        let elapsed = started.elapsed();

        match &solution.moves {
            Some(moves) if moves.is_empty() => {
                println!("{method}: already open ({:.3?})", elapsed);
            }
            Some(moves) => {
                println!(
                    "{method}: found a solution in {} moves ({:.3?}):",
                    moves.len(),
                    elapsed
                );
                println!("{}", moves.iter().join(", "));
                if cli.replay {
                    let mut board = puzzle.board.clone();
                    for mv in moves {
                        board = board
                            .try_move(mv.block, mv.dir)
                            .with_context(|| {
                                format!("Solver produced an illegal move: {mv}")
                            })?;
                        println!("{mv}\n{board}\n");
                    }
                }
            }
            None => println!("{method}: no solution found ({:.3?})", elapsed),
        }
        println!("{}", solution.stats);
    }
    println!();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.levels.is_empty() {
        for example in EXAMPLES {
            let puzzle = example.parse::<Puzzle>().context("Invalid built-in level")?;
            run(&puzzle, &cli)?;
        }
        return Ok(());
    }

    for path in &cli.levels {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let puzzle = data
            .parse::<Puzzle>()
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::info!("Solving {}", path.display());
        run(&puzzle, &cli)?;
    }

    Ok(())
}
