use criterion::Criterion;
use neatling::{
    random::{default_rng, WyRng},
    Config, Genome, PerGenome, Population,
};

fn enabled(genome: &Genome) -> f64 {
    genome.connections().iter().filter(|c| c.enabled()).count() as f64
}

fn bench_reproduce(bench: &mut Criterion) {
    let mut scenario = PerGenome(enabled);
    let mut population = Population::new(Config::new(4, 2).with_population(100)).unwrap();
    let mut warmup = WyRng::seeded(0xFEED);
    for _ in 0..50 {
        population.step(&mut scenario, &mut warmup).unwrap();
    }
    population.evaluate(&mut scenario).unwrap();

    let mut rng = default_rng();
    bench.bench_function("reproduce", |b| {
        b.iter(|| population.clone().reproduce(&mut rng).unwrap())
    });

    bench.bench_function("step", |b| {
        b.iter(|| population.step(&mut scenario, &mut rng).unwrap())
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(1000)
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
    bench_reproduce(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
