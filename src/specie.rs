//! Species: groups of genomes close to the same representative, and the fitness history used to
//! decide when a specie has stopped improving.

use crate::{
    config::Config,
    crossover::delta,
    error::{Error, Result},
    genome::{Connection, Genome},
};
use log::info;
use std::collections::VecDeque;

/// The representative genes of a particular specie. Is retained inter-generationally to better
/// track when a specie deviates
#[derive(Debug, Clone, Default)]
pub struct SpecieRepr(Vec<Connection>);

impl SpecieRepr {
    pub fn new(v: Vec<Connection>) -> Self {
        Self(v)
    }

    pub fn delta(&self, other: &[Connection], config: &Config) -> f64 {
        delta(
            &self.0,
            other,
            config.disjoint_coefficient,
            config.param_coefficient,
        )
    }
}

impl AsRef<[Connection]> for SpecieRepr {
    fn as_ref(&self) -> &[Connection] {
        &self.0
    }
}

impl From<&Genome> for SpecieRepr {
    fn from(genome: &Genome) -> Self {
        Self(genome.connections().to_vec())
    }
}

/// A collection of [Genome]s who are closely related to the same [SpecieRepr], along with the
/// average fitness it recorded over its last few generations
#[derive(Debug, Clone)]
pub struct Specie {
    pub repr: SpecieRepr,
    pub members: Vec<Genome>,
    history: VecDeque<f64>,
    window: usize,
}

impl Specie {
    pub fn new(repr: SpecieRepr, window: usize) -> Self {
        Self {
            repr,
            members: Vec::new(),
            history: VecDeque::with_capacity(window + 1),
            window,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn fittest(&self) -> Option<&Genome> {
        self.members
            .iter()
            .max_by(|l, r| l.fitness.total_cmp(&r.fitness))
    }

    /// Mean fitness of every member, or `None` for an empty specie
    pub fn average_fitness(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }

        Some(self.members.iter().map(|g| g.fitness).sum::<f64>() / self.len() as f64)
    }

    /// Record the floored average fitness of this generation, forgetting the oldest record once
    /// the window is full
    pub fn record_average_fitness(&mut self) -> Result<f64> {
        let average = self.average_fitness().ok_or(Error::EmptySpecie)?.floor();
        self.history.push_back(average);
        while self.history.len() > self.window {
            self.history.pop_front();
        }
        Ok(average)
    }

    /// Net change in average fitness across the window. A specie without a full window of
    /// history has not had the chance to stagnate, so it improves infinitely
    pub fn improvement(&self) -> f64 {
        match (self.history.front(), self.history.back()) {
            (Some(oldest), Some(newest)) if self.history.len() >= self.window => newest - oldest,
            _ => f64::INFINITY,
        }
    }

    pub fn history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }
}

/// Partition genomes into species. Every genome joins the first of `species` whose repr is close
/// enough, or founds a new specie with itself as the repr. Species left without members are
/// dropped.
pub fn speciate(
    genomes: impl IntoIterator<Item = Genome>,
    mut species: Vec<Specie>,
    config: &Config,
) -> Vec<Specie> {
    for genome in genomes {
        match species
            .iter_mut()
            .find(|s| s.repr.delta(genome.connections(), config) < config.specie_threshold)
        {
            Some(Specie { members, .. }) => members.push(genome),
            None => {
                info!(
                    "founding specie {} with {} gene(s)",
                    species.len(),
                    genome.connections().len()
                );
                let mut specie = Specie::new(SpecieRepr::from(&genome), config.stagnation_window);
                specie.members.push(genome);
                species.push(specie);
            }
        }
    }

    species.retain(|s| !s.is_empty());
    species
}
