/// astraqsim Criterion Benchmark Suite
///
/// Covers:
///   - Single-qubit gate throughput (H, X, Rz over an n-qubit register)
///   - Two-qubit gate throughput (CNOT chain)
///   - Entangled state preparation (Bell, GHZ at various sizes)
///   - Full measurement + collapse
///   - GF(2) elimination
///   - Algorithm drivers (Bernstein-Vazirani, Simon, Draper adder)
use astraqsim::algorithms::{bernstein_vazirani, qft, simon};
use astraqsim::core::Simulator;
use astraqsim::gf2;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Single-qubit gate throughput ──────────────────────────────────────────

fn bench_hadamard_10qubits(c: &mut Criterion) {
    c.bench_function("h_gate_10qubits_x10", |b| {
        b.iter(|| {
            let mut sim = Simulator::with_seed(black_box(10), 0).unwrap();
            for _ in 0..10 {
                sim.h(black_box(0)).unwrap();
            }
        })
    });
}

fn bench_single_qubit_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit_gates");
    for n in [4usize, 8, 12, 16] {
        group.bench_with_input(BenchmarkId::new("H", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(n, 0).unwrap();
                for q in 0..n {
                    sim.h(black_box(q)).unwrap();
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("X", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(n, 0).unwrap();
                for q in 0..n {
                    sim.x(black_box(q)).unwrap();
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("Rz", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(n, 0).unwrap();
                for q in 0..n {
                    sim.rz(black_box(q), black_box(22.5)).unwrap();
                }
            });
        });
    }
    group.finish();
}

// ── Two-qubit gate throughput ─────────────────────────────────────────────

fn bench_cnot_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("cnot_chain");
    for n in [4usize, 8, 12, 16] {
        group.bench_with_input(BenchmarkId::new("CNOT", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(n, 0).unwrap();
                sim.h(0).unwrap();
                for q in 1..n {
                    sim.cnot(black_box(0), black_box(q)).unwrap();
                }
            });
        });
    }
    group.finish();
}

// ── Entangled state preparation ───────────────────────────────────────────

fn bench_bell_state(c: &mut Criterion) {
    c.bench_function("bell_state_2qubits", |b| {
        b.iter(|| {
            let mut sim = Simulator::with_seed(black_box(2), 0).unwrap();
            sim.h(0).unwrap().cnot(0, 1).unwrap();
        })
    });
}

fn bench_ghz_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_state");
    for n in [4usize, 8, 12, 16, 20] {
        group.bench_with_input(BenchmarkId::new("GHZ", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(black_box(n), 0).unwrap();
                sim.h(0).unwrap();
                for q in 1..n {
                    sim.cnot(0, q).unwrap();
                }
            });
        });
    }
    group.finish();
}

// ── Measurement + collapse ────────────────────────────────────────────────

fn bench_measure_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure_all");
    for n in [4usize, 8, 12, 16] {
        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(n, 0).unwrap();
                sim.h(0).unwrap();
                for q in 1..n {
                    sim.cnot(0, q).unwrap();
                }
                sim.measure_all().unwrap()
            });
        });
    }
    group.finish();
}

// ── GF(2) elimination ─────────────────────────────────────────────────────

fn bench_gf2_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("gf2_solve");
    for n in [8usize, 16, 32] {
        // Independent rows e_0 ^ e_{i+1}: kernel is the all-ones vector.
        let rows: Vec<Vec<u8>> = (0..n - 1)
            .map(|i| {
                let mut row = vec![0u8; n];
                row[0] = 1;
                row[i + 1] = 1;
                row
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("n", n), &rows, |b, rows| {
            b.iter(|| gf2::solve(black_box(rows)).unwrap());
        });
    }
    group.finish();
}

// ── Algorithm drivers ─────────────────────────────────────────────────────

fn bench_bernstein_vazirani(c: &mut Criterion) {
    let secret = [1u8, 0, 1, 1, 0, 1, 0, 1];
    c.bench_function("bernstein_vazirani_8bits", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| bernstein_vazirani::run(black_box(&secret), &mut rng).unwrap())
    });
}

fn bench_simon(c: &mut Criterion) {
    let secret = [1u8, 0, 1, 1, 0];
    c.bench_function("simon_5bits", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter(|| simon::run(black_box(&secret), &mut rng, 64).unwrap())
    });
}

fn bench_draper_adder(c: &mut Criterion) {
    let mut group = c.benchmark_group("draper_adder");
    for width in [3usize, 5, 7] {
        group.bench_with_input(BenchmarkId::new("width", width), &width, |b, &width| {
            let mut rng = StdRng::seed_from_u64(3);
            b.iter(|| qft::add(black_box(3), black_box(4), width, &mut rng).unwrap());
        });
    }
    group.finish();
}

// ── Groups ────────────────────────────────────────────────────────────────

criterion_group!(
    gate_benches,
    bench_hadamard_10qubits,
    bench_single_qubit_gates,
    bench_cnot_chain,
);
criterion_group!(
    circuit_benches,
    bench_bell_state,
    bench_ghz_state,
    bench_measure_all,
);
criterion_group!(
    algorithm_benches,
    bench_gf2_solve,
    bench_bernstein_vazirani,
    bench_simon,
    bench_draper_adder,
);

criterion_main!(gate_benches, circuit_benches, algorithm_benches);
