use criterion::{criterion_group, criterion_main, Criterion};
use latticefit::{
    bands,
    solver::{LmOptions, Solver},
    Polynomial, TrendFit,
};
use std::hint::black_box;

/// Dispersion-like data: frequency rising and flattening towards 180 degrees.
fn gen_sample_data(n: usize) -> Vec<(f64, f64)> {
    let y = Polynomial::borrowed(&[2.0, 0.45, -1.2e-3]);
    y.sample(0.0..=180.0, n)
}

fn fit<'a>(data: &'a [(f64, f64)], degree: usize, solver: &Solver) -> TrendFit<'a> {
    TrendFit::with_solver(data, degree, solver).expect("Failed to fit data")
}

fn criterion_benchmark(c: &mut Criterion) {
    let lm = Solver::LevenbergMarquardt(LmOptions::default());

    //
    // How each solver scales with data size
    println!("Benchmarking fit vs n (Degree=3)...");
    for (name, solver) in [("lm", lm), ("svd", Solver::Svd)] {
        test_linear_criterion_group(
            c,
            &format!("fit_vs_n_{name}"),
            &[
                CriterionTestEntry::new("n=10", 10, gen_sample_data(10)),
                CriterionTestEntry::new("n=100", 100, gen_sample_data(100)),
                CriterionTestEntry::new("n=1_000", 1_000, gen_sample_data(1_000)),
                CriterionTestEntry::new("n=10_000", 10_000, gen_sample_data(10_000)),
            ],
            |b, data| b.iter(|| fit(black_box(data), 3, &solver)),
        );
    }

    //
    // Same data, growing degree
    println!("Benchmarking fit vs degree (n=100)...");
    let samples = gen_sample_data(100);
    let mut group = c.benchmark_group("fit_vs_degree");
    for degree in [1, 2, 3, 5, 8] {
        group.bench_function(format!("lm/Degree={degree}"), |b| {
            b.iter(|| fit(black_box(&samples), degree, &lm))
        });
        group.bench_function(format!("svd/Degree={degree}"), |b| {
            b.iter(|| fit(black_box(&samples), degree, &Solver::Svd))
        });
    }
    group.finish();

    //
    // The full diatomic band analysis
    println!("Benchmarking band analysis...");
    let mut group = c.benchmark_group("band_analysis");
    for (name, solver) in [("lm", lm), ("svd", Solver::Svd)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                bands::analyze(
                    black_box(&bands::PHASE_DEG),
                    black_box(&bands::FREQUENCY_KHZ),
                    bands::ACOUSTIC_POINTS,
                    bands::ACOUSTIC_DEGREE,
                    bands::OPTICAL_DEGREE,
                    &solver,
                )
                .expect("Failed to analyze bands")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn get_data_for_run<V>(group_id: &str, tests: &[CriterionTestEntry<V>]) -> Vec<(f64, f64)> {
    tests
        .iter()
        .map(|test| (test.x, get_sample_for_run(group_id, &test.id)))
        .collect()
}

fn get_sample_for_run(group_id: &str, test_id: &str) -> f64 {
    #[derive(serde::Deserialize)]
    struct CriterionSamples {
        iters: Vec<f64>,
        times: Vec<f64>,
    }

    let raw = std::fs::read_to_string(format!(
        "target/criterion/{group_id}/{test_id}/new/sample.json"
    ))
    .expect("Failed to read sample data");
    let samples: CriterionSamples =
        serde_json::from_str(&raw).expect("Failed to parse sample data");

    samples
        .iters
        .iter()
        .zip(samples.times.iter())
        .map(|(i, t)| t / i)
        .sum::<f64>()
        / (samples.iters.len() as f64)
}

struct CriterionTestEntry<V> {
    id: String,
    x: f64,
    values: V,
}
impl<V> CriterionTestEntry<V> {
    pub fn new(id: &str, x: u32, values: V) -> Self {
        Self {
            id: id.to_string(),
            x: f64::from(x),
            values,
        }
    }
}

/// Runs the group, then checks that time per run grows roughly linearly with `x`.
fn test_linear_criterion_group<F, V>(
    c: &mut Criterion,
    id: &str,
    samples: &[CriterionTestEntry<V>],
    runner: F,
) where
    for<'a, 'b, 'c> F: Fn(&'a mut criterion::Bencher<'b>, &'c V),
{
    let mut group = c.benchmark_group(id);
    for sample in samples {
        group.bench_with_input(&sample.id, &sample.values, &runner);
    }
    group.finish();

    let data = get_data_for_run(id, samples);
    let linear_fit = TrendFit::with_solver(&data, 1, &Solver::Svd).expect("Failed to fit timings");
    println!(
        "{id}: {} (R² = {:.4})",
        linear_fit.equation(),
        linear_fit.r_squared()
    );
}
