use approx::relative_eq;
use core::ops::ControlFlow;
use neatling::{
    random::default_rng, Config, EvolutionTarget, Genome, PerGenome, Persist, Population, Stats,
};

const POPULATION: usize = 150;
const GENERATIONS: usize = 2_000;

const CASES: [([f64; 2], f64); 4] = [
    ([0., 0.], 0.),
    ([1., 1.], 0.),
    ([1., 0.], 1.),
    ([0., 1.], 1.),
];

/// 100 for every exact answer, and a penalty by distance for the rest
fn xor(genome: &Genome) -> f64 {
    let network = genome.network();
    let mut fit = 0.;
    for (input, want) in CASES {
        let Ok(out) = network.evaluate(&input) else {
            return f64::MIN;
        };
        let v = out[0];
        if relative_eq!(v, want, epsilon = 0.05) {
            fit += 100.;
        } else {
            fit -= (want - v).abs();
        }
    }
    fit
}

fn hook(stats: &Stats) -> ControlFlow<()> {
    if stats.generation % 100 == 0 {
        println!(
            "fittest of gen {}: {:.4} (of {} species)",
            stats.generation, stats.fittest, stats.species
        );
    }

    let solved = EvolutionTarget::Fitness(400.);
    let exhausted = EvolutionTarget::Generation(GENERATIONS);
    if solved.satisfied(stats) || exhausted.satisfied(stats) {
        return ControlFlow::Break(());
    }

    ControlFlow::Continue(())
}

fn main() -> neatling::Result<()> {
    let config = Config::new(2, 1).with_population(POPULATION);
    let mut population = Population::new(config)?;
    let stats = population.evolve(&mut PerGenome(xor), &mut default_rng(), hook)?;

    println!(
        "stopped in gen {} at {:.4} with {} gene(s)",
        stats.generation,
        stats.fittest,
        stats.champion.connections().len()
    );
    for (input, want) in CASES {
        let out = stats.champion.network().evaluate(&input)?;
        println!("{input:?} -> {:.4} (want {want})", out[0]);
    }

    std::fs::create_dir_all("output")?;
    stats
        .champion
        .to_file(format!("output/xor-{}.json", stats.generation))
}
