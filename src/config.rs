//! Run configuration. Every field defaults to its counterpart in [crate::constants], and the
//! whole struct round-trips through JSON with [crate::persist::Persist].

use crate::{
    constants::*,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of input nodes
    pub sensory: usize,
    /// Number of output nodes
    pub action: usize,
    pub population: usize,
    pub specie_threshold: f64,
    pub disjoint_coefficient: f64,
    pub param_coefficient: f64,
    pub stagnation_window: usize,
    pub add_node: f64,
    pub add_connection: f64,
    pub mutate_weight: f64,
    pub mutate_bias: f64,
    pub perturb: f64,
    pub keep_exclusive: f64,
    pub pick_left: f64,
    pub cross_specie: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensory: 1,
            action: 1,
            population: NEATLING_POPULATION,
            specie_threshold: NEATLING_SPECIE_THRESHOLD,
            disjoint_coefficient: NEATLING_DISJOINT_COEFFICIENT,
            param_coefficient: NEATLING_PARAM_COEFFICIENT,
            stagnation_window: NEATLING_STAGNATION_WINDOW,
            add_node: NEATLING_ADD_NODE_PROB,
            add_connection: NEATLING_ADD_CONNECTION_PROB,
            mutate_weight: NEATLING_MUTATE_WEIGHT_PROB,
            mutate_bias: NEATLING_MUTATE_BIAS_PROB,
            perturb: NEATLING_PERTURB_PROB,
            keep_exclusive: NEATLING_KEEP_EXCLUSIVE_PROB,
            pick_left: NEATLING_PICK_LEFT_PROB,
            cross_specie: NEATLING_CROSS_SPECIE_PROB,
        }
    }
}

impl Config {
    pub fn new(sensory: usize, action: usize) -> Self {
        Self {
            sensory,
            action,
            ..Self::default()
        }
    }

    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.action == 0 {
            return Err(Error::Config("at least one output node is required".into()));
        }
        if self.population < 2 {
            return Err(Error::Config(format!(
                "population must hold at least 2 genomes, got {}",
                self.population
            )));
        }
        if self.stagnation_window == 0 {
            return Err(Error::Config("stagnation window must be positive".into()));
        }
        if !(self.specie_threshold > 0.) {
            return Err(Error::Config(format!(
                "specie threshold must be positive, got {}",
                self.specie_threshold
            )));
        }

        for (name, p) in [
            ("add_node", self.add_node),
            ("add_connection", self.add_connection),
            ("mutate_weight", self.mutate_weight),
            ("mutate_bias", self.mutate_bias),
            ("perturb", self.perturb),
            ("keep_exclusive", self.keep_exclusive),
            ("pick_left", self.pick_left),
            ("cross_specie", self.cross_specie),
        ] {
            if !(0. ..=1.).contains(&p) {
                return Err(Error::Config(format!(
                    "{name} must be a probability, got {p}"
                )));
            }
        }

        Ok(())
    }
}
