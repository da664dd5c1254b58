use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use runsummary::{
    records::{results::read_results, Sample},
    stats::AggregateStat,
    BestRunSelector, RunHistory, TerminalPolicy,
};

fn synthetic_histories(runs: u32, steps: u64, per_step: usize) -> Vec<RunHistory> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..runs)
        .map(|run| {
            let samples = (0..steps)
                .flat_map(|step| {
                    let floor = 1000.0 / (step + 1) as f64;
                    (0..per_step)
                        .map(|_| Sample::new(step, floor + rng.gen_range(0.0..10.0)))
                        .collect::<Vec<_>>()
                })
                .collect();
            RunHistory::from_samples(run, samples)
        })
        .collect()
}

fn synthetic_table(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(7);
    let mut table = String::from("Run,BestFitness,Time(s)\n");
    for run in 0..rows {
        table.push_str(&format!(
            "{},{:.6},{:.3}\n",
            run,
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.1..5.0)
        ));
    }
    table
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_run_selection");

    for runs in [10u32, 100, 1000] {
        let distance = synthetic_histories(runs, 200, 1);
        group.bench_with_input(BenchmarkId::new("require_unique", runs), &distance, |b, histories| {
            let selector = BestRunSelector::new(TerminalPolicy::RequireUnique);
            b.iter(|| selector.select(black_box(histories.clone())).unwrap())
        });

        let population = synthetic_histories(runs, 50, 20);
        group.bench_with_input(BenchmarkId::new("best_of_last", runs), &population, |b, histories| {
            let selector = BestRunSelector::new(TerminalPolicy::BestOfLast);
            b.iter(|| selector.select(black_box(histories.clone())).unwrap())
        });
    }
    group.finish();
}

fn bench_results_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("results_table");

    for rows in [30usize, 1000, 10000] {
        let table = synthetic_table(rows);
        group.bench_with_input(BenchmarkId::new("read_and_aggregate", rows), &table, |b, table| {
            b.iter(|| {
                let parsed = read_results(black_box(table.as_bytes()), "bench").unwrap();
                let objectives: Vec<f64> = parsed.records.iter().map(|r| r.objective).collect();
                AggregateStat::from_samples(&objectives).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select, bench_results_table);
criterion_main!(benches);
