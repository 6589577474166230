pub mod config;
pub mod constants;
pub mod crossover;
pub mod error;
pub mod genome;
pub mod macros;
pub mod network;
pub mod persist;
pub mod population;
pub mod random;
pub mod reproduce;
pub mod scenario;
pub mod specie;

pub use config::Config;
pub use error::{Error, Result};
pub use genome::{Connection, Genome, InnoGen};
pub use network::{activate, Network};
pub use persist::Persist;
pub use population::{Population, Stats};
pub use random::{Happens, Probabilities};
pub use scenario::{EvolutionTarget, PerGenome, Scenario};
pub use specie::Specie;
