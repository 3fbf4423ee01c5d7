#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod crossover;
pub mod error;
pub mod genome;
pub mod individual;
pub mod network;
pub mod population;
pub mod random;
pub mod reproduce;
pub mod scenario;
pub mod specie;

pub use config::{CarryOver, Coefficients, Config, MutationRates, SplitPolicy};
pub use error::{Error, Result};
pub use genome::{Gene, GeneState, Genotype, InnoGen};
pub use individual::Individual;
pub use network::{activate, InputMode, Network, OutputMode};
pub use population::Population;
pub use random::{Happens, Probabilities};
pub use scenario::{evolve, EvolutionHooks, EvolutionTarget, Hook, Stats, Summary};
pub use specie::Specie;
