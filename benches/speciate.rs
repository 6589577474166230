use criterion::Criterion;
use neatling::{
    crossover::{avg_param_diff, disjoint_excess_count},
    genome::{Genome, InnoGen},
    random::{ProbBinding, ProbStatic, WyRng},
    specie::speciate,
    Config,
};

fn genomes(count: usize) -> Vec<Genome> {
    let mut inno = InnoGen::new(0);
    let mut rng = ProbBinding::new(ProbStatic::default(), WyRng::seeded(0xD1CE));
    (0..count)
        .map(|i| {
            let mut genome = Genome::new(2, 1);
            for _ in 0..(i % 40) {
                genome.mutate_connection(&mut rng, &mut inno);
                genome.mutate_node(&mut rng, &mut inno);
                genome.mutate_weights(&mut rng);
            }
            genome
        })
        .collect()
}

fn bench_distance(bench: &mut Criterion) {
    let pool = genomes(80);
    let (l_conn, r_conn) = (pool[39].connections(), pool[79].connections());

    bench.bench_function("disjoint-excess-count", |b| {
        b.iter(|| disjoint_excess_count(l_conn, r_conn))
    });

    bench.bench_function("avg-weight-diff", |b| {
        b.iter(|| avg_param_diff(l_conn, r_conn))
    });
}

fn bench_speciate(bench: &mut Criterion) {
    let config = Config::new(2, 1);
    let genomes = genomes(100);
    bench.bench_function("speciate", |b| {
        b.iter(|| speciate(genomes.iter().cloned(), vec![], &config))
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
    bench_distance(&mut criterion);
    bench_speciate(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
