use criterion::Criterion;
use neatling::{
    crossover::crossover,
    genome::{Genome, InnoGen},
    random::{default_rng, ProbBinding, ProbStatic, WyRng},
};

fn bench_crossover(bench: &mut Criterion) {
    let mut inno = InnoGen::new(0);
    let mut grow = ProbBinding::new(ProbStatic::default(), WyRng::seeded(0xC405));
    let mut l = Genome::new(4, 2);
    for _ in 0..60 {
        l.mutate_connection(&mut grow, &mut inno);
        l.mutate_node(&mut grow, &mut inno);
    }
    let mut r = l.clone();
    for _ in 0..20 {
        l.mutate_connection(&mut grow, &mut inno);
        r.mutate_node(&mut grow, &mut inno);
        r.mutate_weights(&mut grow);
    }

    let mut rng = ProbBinding::new(ProbStatic::default(), default_rng());
    l.fitness = 1.;
    bench.bench_function("crossover-ne", |b| b.iter(|| crossover(&l, &r, &mut rng)));

    r.fitness = 1.;
    bench.bench_function("crossover-eq", |b| b.iter(|| crossover(&l, &r, &mut rng)));
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
    bench_crossover(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
