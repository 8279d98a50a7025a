use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ivory_chess::board::board_state::BoardState;
use ivory_chess::move_generation::perft::perft;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_nodes: &'static [u64],
}

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: STARTPOS_FEN,
        expected_nodes: &[20, 400, 8_902, 197_281],
    },
    BenchCase {
        name: "castling_pins",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_nodes: &[48, 2_039, 97_862],
    },
    BenchCase {
        name: "endgame_ep",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_nodes: &[14, 191, 2_812, 43_238],
    },
    BenchCase {
        name: "promotions",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        expected_nodes: &[44, 1_486, 62_379],
    },
];

fn perft_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.measurement_time(Duration::from_secs(10));

    for case in CASES {
        for (depth_index, expected) in case.expected_nodes.iter().enumerate() {
            let depth = depth_index + 1;
            group.throughput(Throughput::Elements(*expected));
            group.bench_with_input(
                BenchmarkId::new(case.name, depth),
                &depth,
                |bencher, &depth| {
                    let mut board = BoardState::from_fen(case.fen).expect("FEN should parse");
                    bencher.iter(|| {
                        let nodes = perft(black_box(&mut board), black_box(depth));
                        assert_eq!(nodes, *expected);
                        nodes
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, perft_benchmarks);
criterion_main!(benches);
