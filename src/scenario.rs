use crate::{genome::Genome, population::Stats};
use core::ops::ControlFlow;

/// Something that can score a generation of genomes. Every genome's `fitness` is expected to be
/// written before `evaluate` returns; a genome left alone keeps a fitness of 0.
pub trait Scenario {
    fn evaluate(&mut self, genomes: &mut [&mut Genome]);
}

/// A [Scenario] that scores every genome on its own
pub struct PerGenome<F: FnMut(&Genome) -> f64>(pub F);

impl<F: FnMut(&Genome) -> f64> Scenario for PerGenome<F> {
    fn evaluate(&mut self, genomes: &mut [&mut Genome]) {
        for genome in genomes.iter_mut() {
            let fitness = (self.0)(&**genome);
            genome.fitness = fitness;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvolutionTarget {
    Fitness(f64),
    Generation(usize),
}

impl EvolutionTarget {
    pub fn satisfied(&self, stats: &Stats) -> bool {
        match self {
            Self::Fitness(t) => stats.fittest >= *t,
            Self::Generation(t) => stats.generation >= *t,
        }
    }

    /// Break once satisfied, for use as an evolution hook
    pub fn control(&self, stats: &Stats) -> ControlFlow<()> {
        if self.satisfied(stats) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stats(generation: usize, fittest: f64) -> Stats {
        Stats {
            generation,
            species: 1,
            population: 1,
            fittest,
            champion: Genome::new(1, 1),
        }
    }

    #[test]
    fn test_per_genome() {
        let mut genomes = vec![Genome::new(2, 1), Genome::new(3, 1)];
        let mut calls = 0;
        let mut scenario = PerGenome(|g: &Genome| {
            calls += 1;
            g.sensory() as f64 * 1.5
        });
        scenario.evaluate(&mut genomes.iter_mut().collect::<Vec<_>>());
        assert_eq!(calls, 2);
        assert_eq!(genomes[0].fitness, 3.);
        assert_eq!(genomes[1].fitness, 4.5);
    }

    #[test]
    fn test_target() {
        let target = EvolutionTarget::Fitness(10.);
        assert!(!target.satisfied(&stats(100, 9.9)));
        assert!(target.satisfied(&stats(0, 10.)));
        assert_eq!(target.control(&stats(0, 11.)), ControlFlow::Break(()));

        let target = EvolutionTarget::Generation(5);
        assert!(!target.satisfied(&stats(4, 1e9)));
        assert!(target.satisfied(&stats(5, 0.)));
        assert_eq!(target.control(&stats(1, 0.)), ControlFlow::Continue(()));
    }
}
