use criterion::{BatchSize, Criterion};
use neatling::{
    network::InputMode, population::Population, random::default_rng, Config,
};

const XOR_DATA: [[f64; 2]; 4] = [[1., 0.], [0., 1.], [1., 1.], [0., 0.]];
const XOR_EXPECTED: [[f64; 1]; 4] = [[1.], [1.], [0.], [0.]];

fn bench_speciate(bench: &mut Criterion) {
    bench.bench_function("generation-150", |b| {
        b.iter_batched(
            || Population::new(2, 1, Config::default(), default_rng()).unwrap(),
            |mut population| {
                for _ in 0..5 {
                    population
                        .test(&XOR_DATA, &XOR_EXPECTED, InputMode::Points)
                        .unwrap();
                    population.sort();
                    population.next_generation();
                }
                population
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(100)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let mut criterion: criterion::Criterion<_> = {
        use core::time::Duration;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    bench_speciate(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
