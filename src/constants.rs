//! Centralized defaults for Neatling evolution parameters.
//!
//! Every default is defined here with the `NEATLING_` prefix, and [crate::config::Config]
//! starts from these values.

// ============================================================================
// Population Parameters
// ============================================================================

/// Number of genomes alive in every generation
pub const NEATLING_POPULATION: usize = 20;

/// Genetic distance under which two genomes belong to the same specie
pub const NEATLING_SPECIE_THRESHOLD: f64 = 3.0;

/// Number of generations of average fitness history a specie keeps to judge stagnation
pub const NEATLING_STAGNATION_WINDOW: usize = 10;

/// Minimum net improvement across the stagnation window for a specie to survive
pub const NEATLING_STAGNATION_MIN_IMPROVEMENT: f64 = 1.0;

/// Probability that a leftover reproduction slot draws parents from the whole population
pub const NEATLING_CROSS_SPECIE_PROB: f64 = 0.001;

// ============================================================================
// Genome Mutation Parameters
// ============================================================================

/// Probability of splitting a connection with a new hidden node
pub const NEATLING_ADD_NODE_PROB: f64 = 0.03;

/// Probability of adding a new connection
pub const NEATLING_ADD_CONNECTION_PROB: f64 = 0.05;

/// Probability of mutating every connection weight
pub const NEATLING_MUTATE_WEIGHT_PROB: f64 = 0.8;

/// Probability of mutating every output and hidden bias
pub const NEATLING_MUTATE_BIAS_PROB: f64 = 0.8;

/// Probability that a mutated parameter is perturbed, instead of replaced
pub const NEATLING_PERTURB_PROB: f64 = 0.9;

// ============================================================================
// Crossover Parameters
// ============================================================================

/// Probability of inheriting a disjoint or excess gene when both parents are equally fit
pub const NEATLING_KEEP_EXCLUSIVE_PROB: f64 = 0.8;

/// Probability of copying a matching gene from the left parent
pub const NEATLING_PICK_LEFT_PROB: f64 = 0.5;

/// Coefficient for disjoint and excess genes in compatibility distance
pub const NEATLING_DISJOINT_COEFFICIENT: f64 = 1.0;

/// Coefficient for average weight difference in compatibility distance
pub const NEATLING_PARAM_COEFFICIENT: f64 = 0.4;
