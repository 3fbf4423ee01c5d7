use crate::constants::{NEATLING_WEIGHT_PERTURB_RANGE, NEATLING_WEIGHT_REPLACE_RANGE};
use rand::{Rng, RngCore};

/// Whether a gene is expressed by the network it encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneState {
    #[default]
    Active,
    Inactive,
}

/// A single weighted connection `from -> to`, identified by its innovation id
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    pub inno: usize,
    pub from: usize,
    pub to: usize,
    pub weight: f64,
    pub state: GeneState,
}

impl Gene {
    pub fn new(inno: usize, (from, to): (usize, usize), weight: f64) -> Self {
        Self {
            inno,
            from,
            to,
            weight,
            state: GeneState::Active,
        }
    }

    /// gene innovation id
    #[inline]
    pub fn inno(&self) -> usize {
        self.inno
    }

    #[inline]
    pub fn path(&self) -> (usize, usize) {
        (self.from, self.to)
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// whether or not this gene is active, and therefore affects its genome's network
    #[inline]
    pub fn enabled(&self) -> bool {
        matches!(self.state, GeneState::Active)
    }

    pub fn enable(&mut self) {
        self.state = GeneState::Active;
    }

    pub fn disable(&mut self) {
        self.state = GeneState::Inactive;
    }

    /// Shift the weight by some bounded random amount
    pub fn perturb(&mut self, rng: &mut impl RngCore) {
        self.weight +=
            rng.random_range(-NEATLING_WEIGHT_PERTURB_RANGE..=NEATLING_WEIGHT_PERTURB_RANGE);
    }

    /// Replace the weight with a fresh random value
    pub fn randomize(&mut self, rng: &mut impl RngCore) {
        self.weight =
            rng.random_range(-NEATLING_WEIGHT_REPLACE_RANGE..=NEATLING_WEIGHT_REPLACE_RANGE);
    }

    /// difference of weight between this and another gene with the same innovation id
    #[inline]
    pub fn param_diff(&self, other: &Self) -> f64 {
        (self.weight - other.weight).abs()
    }
}
