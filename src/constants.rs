//! Centralized constants for neatling evolution parameters.
//!
//! Every default is defined here with the `NEATLING_` prefix, and [crate::config::Config]
//! starts from these values.

// ============================================================================
// Population Parameters
// ============================================================================

/// Target number of individuals per generation
pub const NEATLING_POPULATION: usize = 150;

/// Genetic distance under which an individual joins a specie
pub const NEATLING_SPECIE_THRESHOLD: f64 = 3.0;

/// Amount the acceptance threshold moves per generation when adapting
pub const NEATLING_THRESHOLD_STEP: f64 = 0.1;

/// Species count is compared against `population / NEATLING_THRESHOLD_SPECIE_RATIO`
pub const NEATLING_THRESHOLD_SPECIE_RATIO: usize = 4;

// ============================================================================
// Genome Mutation Parameters
// ============================================================================

/// Probability of mutating the weights of a genome
pub const NEATLING_MUTATE_WEIGHT_PROB: f64 = 0.8;

/// Probability of adding a new connection
pub const NEATLING_MUTATE_CONNECTION_PROB: f64 = 0.05;

/// Probability of splitting a connection with a new node
pub const NEATLING_MUTATE_BISECTION_PROB: f64 = 0.03;

/// Probability of perturbing a weight vs replacing it
pub const NEATLING_PERTURB_WEIGHT_PROB: f64 = 0.9;

/// New genes draw their weight from `[-range, range]`
pub const NEATLING_WEIGHT_INIT_RANGE: f64 = 0.5;

/// Replaced weights are drawn from `[-range, range]`
pub const NEATLING_WEIGHT_REPLACE_RANGE: f64 = 2.0;

/// Perturbed weights are shifted by a value in `[-range, range]`
pub const NEATLING_WEIGHT_PERTURB_RANGE: f64 = 2.0;

/// Weight of the `from -> center` connection created by a split
pub const NEATLING_BISECT_WEIGHT: f64 = 1.0;

// ============================================================================
// Crossover Parameters
// ============================================================================

/// Probability of a matching gene taking its weight from the less fit parent
pub const NEATLING_PICK_RECESSIVE_PROB: f64 = 0.5;

/// Probability of a matching gene staying disabled if either parent disabled it
pub const NEATLING_KEEP_DISABLED_PROB: f64 = 0.75;

// ============================================================================
// Distance Coefficients
// ============================================================================

/// Coefficient for excess genes in compatibility distance calculation
pub const NEATLING_EXCESS_COEFFICIENT: f64 = 1.0;

/// Coefficient for disjoint genes in compatibility distance calculation
pub const NEATLING_DISJOINT_COEFFICIENT: f64 = 1.0;

/// Coefficient for weight differences in compatibility distance calculation
pub const NEATLING_WEIGHT_COEFFICIENT: f64 = 0.4;

/// Genomes with fewer genes than this are compared unnormalized
pub const NEATLING_NORMALIZATION_THRESHOLD: usize = 20;

// ============================================================================
// Network Parameters
// ============================================================================

/// Steepness of the hidden node sigmoid
pub const NEATLING_SIGMOID_STEEPNESS: f64 = 4.9;

/// Single-output probabilities clamp their input to `[-clamp, clamp]`
pub const NEATLING_SIGMOID_CLAMP: f64 = 500.0;
