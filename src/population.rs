//! The generational loop: evaluate every genome, prune stagnant species, reproduce in proportion
//! to specie fitness, and partition the children back into species.

use crate::{
    config::Config,
    constants::NEATLING_STAGNATION_MIN_IMPROVEMENT,
    error::{Error, Result},
    genome::{Genome, InnoGen},
    random::{EvolutionEvent, Happens, ProbBinding, ProbStatic},
    reproduce::{offspring, parents, population_alloc},
    scenario::Scenario,
    specie::{speciate, Specie, SpecieRepr},
};
use core::{mem, ops::ControlFlow};
use log::{debug, info};
use rand::{seq::IndexedRandom, RngCore};

/// A summary of one evaluated generation
#[derive(Debug, Clone)]
pub struct Stats {
    pub generation: usize,
    pub species: usize,
    pub population: usize,
    pub fittest: f64,
    pub champion: Genome,
}

#[derive(Debug, Clone)]
pub struct Population {
    config: Config,
    probabilities: ProbStatic,
    species: Vec<Specie>,
    innogen: InnoGen,
    generation: usize,
}

impl Population {
    /// A population of genomes with no connections, all in a single specie
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let genomes = vec![Genome::new(config.sensory, config.action); config.population];
        Ok(Self {
            probabilities: ProbStatic::from(&config),
            species: speciate(genomes, vec![], &config),
            innogen: InnoGen::new(0),
            generation: 0,
            config,
        })
    }

    /// A population seeded from existing genomes, like a saved champion or a previous run. The
    /// innovation registry learns every gene they carry.
    pub fn from_genomes(config: Config, genomes: Vec<Genome>) -> Result<Self> {
        config.validate()?;
        if genomes.is_empty() {
            return Err(Error::Config("cannot seed a population from 0 genomes".into()));
        }
        if let Some(g) = genomes
            .iter()
            .find(|g| g.sensory() != config.sensory || g.action() != config.action)
        {
            return Err(Error::Config(format!(
                "genome shape ({}, {}) does not match the configured ({}, {})",
                g.sensory(),
                g.action(),
                config.sensory,
                config.action
            )));
        }

        let mut innogen = InnoGen::new(0);
        for c in genomes.iter().flat_map(|g| g.connections()) {
            innogen.observe(c);
        }

        Ok(Self {
            probabilities: ProbStatic::from(&config),
            species: speciate(genomes, vec![], &config),
            innogen,
            generation: 0,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn species(&self) -> &[Specie] {
        &self.species
    }

    pub fn innogen(&self) -> &InnoGen {
        &self.innogen
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn genomes(&self) -> impl Iterator<Item = &Genome> {
        self.species.iter().flat_map(|s| s.members.iter())
    }

    pub fn len(&self) -> usize {
        self.species.iter().map(Specie::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fittest genome as of the last evaluation
    pub fn champion(&self) -> Option<&Genome> {
        self.genomes()
            .max_by(|l, r| l.fitness.total_cmp(&r.fitness))
    }

    /// Score every genome with `scenario`
    pub fn evaluate(&mut self, scenario: &mut impl Scenario) -> Result<Stats> {
        {
            let mut genomes = self
                .species
                .iter_mut()
                .flat_map(|s| s.members.iter_mut())
                .collect::<Vec<_>>();
            scenario.evaluate(&mut genomes);
        }

        let champion = self.champion().ok_or(Error::Extinct)?.clone();
        let stats = Stats {
            generation: self.generation,
            species: self.species.len(),
            population: self.len(),
            fittest: champion.fitness,
            champion,
        };
        debug!(
            "generation {}: {} specie(s), fittest {:.3}",
            stats.generation, stats.species, stats.fittest
        );
        Ok(stats)
    }

    /// Replace every genome with a child, using the fitness of the last evaluation
    pub fn reproduce(&mut self, rng: &mut impl RngCore) -> Result<()> {
        let mut rng = ProbBinding::new(self.probabilities, rng);
        let population = self.config.population;

        let (species, pools, averages) = self.prune()?;
        let alloc = population_alloc(&averages, population);

        let mut children = Vec::with_capacity(population);
        for (pool, size) in pools.iter().zip(alloc) {
            for _ in 0..size.min(population - children.len()) {
                let (l, r) = parents(pool, &mut rng).ok_or(Error::Extinct)?;
                children.push(offspring(l, r, &mut rng, &mut self.innogen));
            }
        }

        let leftover = population - children.len();
        if leftover > 0 {
            debug!("filling {leftover} leftover slot(s)");
        }

        let everyone = pools.iter().flatten().collect::<Vec<_>>();
        let breeders = pools.iter().filter(|p| p.len() >= 2).collect::<Vec<_>>();
        while children.len() < population {
            let picked = if rng.happens(EvolutionEvent::CrossSpecie) {
                parents(&everyone, &mut rng).map(|(l, r)| (*l, *r))
            } else {
                breeders
                    .choose(&mut rng)
                    .copied()
                    .or_else(|| pools.choose(&mut rng))
                    .and_then(|pool| parents(pool, &mut rng))
            };
            let (l, r) = picked.ok_or(Error::Extinct)?;
            children.push(offspring(l, r, &mut rng, &mut self.innogen));
        }

        self.species = speciate(children, species, &self.config);
        self.generation += 1;
        debug!(
            "generation {} bred into {} specie(s), {} innovation(s) so far",
            self.generation,
            self.species.len(),
            self.innogen.head
        );
        Ok(())
    }

    /// Record every specie's average fitness and drop those that have stagnated. Survivors take
    /// their fittest member as the next repr, and hand their members over as a parent pool.
    fn prune(&mut self) -> Result<(Vec<Specie>, Vec<Vec<Genome>>, Vec<f64>)> {
        let mut recorded = Vec::with_capacity(self.species.len());
        for mut specie in mem::take(&mut self.species) {
            let average = specie.record_average_fitness()?;
            recorded.push((specie, average));
        }

        let (mut survivors, stagnant): (Vec<_>, Vec<_>) = recorded
            .into_iter()
            .partition(|(s, _)| s.improvement() >= NEATLING_STAGNATION_MIN_IMPROVEMENT);

        if survivors.is_empty() {
            let best = stagnant
                .into_iter()
                .max_by(|(_, l), (_, r)| l.total_cmp(r))
                .ok_or(Error::Extinct)?;
            info!(
                "every specie stagnated, keeping the best with average {}",
                best.1
            );
            survivors.push(best);
        } else if !stagnant.is_empty() {
            info!("dropping {} stagnant specie(s)", stagnant.len());
        }

        let mut species = Vec::with_capacity(survivors.len());
        let mut pools = Vec::with_capacity(survivors.len());
        let mut averages = Vec::with_capacity(survivors.len());
        for (mut specie, average) in survivors {
            if let Some(repr) = specie.fittest().map(SpecieRepr::from) {
                specie.repr = repr;
            }
            pools.push(mem::take(&mut specie.members));
            species.push(specie);
            averages.push(average);
        }

        Ok((species, pools, averages))
    }

    /// Evaluate then reproduce a single generation, returning how that generation scored
    pub fn step(&mut self, scenario: &mut impl Scenario, rng: &mut impl RngCore) -> Result<Stats> {
        let stats = self.evaluate(scenario)?;
        self.reproduce(rng)?;
        Ok(stats)
    }

    /// Evolve until `hook` breaks. The population is left evaluated, and the stats of that last
    /// evaluation are returned
    pub fn evolve(
        &mut self,
        scenario: &mut impl Scenario,
        rng: &mut impl RngCore,
        mut hook: impl FnMut(&Stats) -> ControlFlow<()>,
    ) -> Result<Stats> {
        loop {
            let stats = self.evaluate(scenario)?;
            if hook(&stats).is_break() {
                info!(
                    "evolution stopped at generation {} with fitness {:.3}",
                    stats.generation, stats.fittest
                );
                break Ok(stats);
            }
            self.reproduce(rng)?;
        }
    }
}
