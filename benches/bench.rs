use criterion::{black_box, criterion_group, criterion_main, Criterion};

use klotski_solver::{corridor, solve, Method, Puzzle};

const SIMPLE_INPUT: &str = "
start 0 0
end 2 2
3 . .
3 1 .
. . 2
";

const MEDIUM_INPUT: &str = "
start 0 0
end 3 4
. . 1 . .
2 2 1 # .
. 3 . 4 4
. 3 . . 5
";

const HARDER_INPUT: &str = "
start 4 0
end 2 5
1 1 1 1 3 4
1 2 . 1 5 .
1 1 . 1 5 .
6 7 . 6 . .
6 6 6 6 . .
";

fn criterion_bench(c: &mut Criterion) {
    for (name, input) in [
        ("simple", SIMPLE_INPUT),
        ("medium", MEDIUM_INPUT),
        ("harder", HARDER_INPUT),
    ] {
        let puzzle = input.parse::<Puzzle>().unwrap();
        let mut group = c.benchmark_group(name);
        if name == "harder" {
            group.sample_size(10);
        }
        for method in Method::ALL {
            group.bench_function(method.to_string(), |b| {
                b.iter(|| solve(black_box(&puzzle), method))
            });
        }
        group.finish();
    }

    c.bench_function("corridors", |b| {
        let puzzle = HARDER_INPUT.parse::<Puzzle>().unwrap();
        b.iter(|| corridor::minimal(black_box(&puzzle.board), puzzle.start, puzzle.end))
    });
}

criterion_group!(benches, criterion_bench);
criterion_main!(benches);
