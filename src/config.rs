//! Run configuration. Every field defaults to its value in [crate::constants], and a config may
//! be read from JSON where only the overridden fields are present.

use crate::{
    constants::*,
    error::{Error, Result},
    network::OutputMode,
};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Weights of the three terms of the genetic distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    pub excess: f64,
    pub disjoint: f64,
    pub weight: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            excess: NEATLING_EXCESS_COEFFICIENT,
            disjoint: NEATLING_DISJOINT_COEFFICIENT,
            weight: NEATLING_WEIGHT_COEFFICIENT,
        }
    }
}

impl From<(f64, f64, f64)> for Coefficients {
    fn from((excess, disjoint, weight): (f64, f64, f64)) -> Self {
        Self {
            excess,
            disjoint,
            weight,
        }
    }
}

/// Per-genome probabilities of each mutation being applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationRates {
    pub weight: f64,
    pub connection: f64,
    pub node: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            weight: NEATLING_MUTATE_WEIGHT_PROB,
            connection: NEATLING_MUTATE_CONNECTION_PROB,
            node: NEATLING_MUTATE_BISECTION_PROB,
        }
    }
}

/// What becomes of a connection when a node is inserted into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// The connection is deleted, its route becomes available again, and its innovation id
    /// becomes the id of the new node
    #[default]
    Reuse,
    /// The connection is kept but disabled. The new node still takes its innovation id
    Disable,
}

/// Which individuals survive unchanged into the next generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarryOver {
    /// Only the fittest individual, re-speciated like any other child
    #[default]
    Champion,
    /// The fittest member of every specie allotted offspring, seeding an aged copy of that specie
    Representatives,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub population: usize,
    pub threshold: f64,
    pub threshold_step: f64,
    pub adapt_threshold: bool,
    pub coefficients: Coefficients,
    pub mutation: MutationRates,
    pub split: SplitPolicy,
    pub carry_over: CarryOver,
    pub output: OutputMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population: NEATLING_POPULATION,
            threshold: NEATLING_SPECIE_THRESHOLD,
            threshold_step: NEATLING_THRESHOLD_STEP,
            adapt_threshold: true,
            coefficients: Coefficients::default(),
            mutation: MutationRates::default(),
            split: SplitPolicy::default(),
            carry_over: CarryOver::default(),
            output: OutputMode::default(),
        }
    }
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidConfig {
        reason: reason.into(),
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(invalid("population must be at least 1"));
        }

        if !self.threshold.is_finite() || self.threshold <= 0. {
            return Err(invalid(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }

        if !self.threshold_step.is_finite() || self.threshold_step < 0. {
            return Err(invalid(format!(
                "threshold_step must be non-negative, got {}",
                self.threshold_step
            )));
        }

        let Coefficients {
            excess,
            disjoint,
            weight,
        } = self.coefficients;
        for (name, c) in [("excess", excess), ("disjoint", disjoint), ("weight", weight)] {
            if !c.is_finite() || c < 0. {
                return Err(invalid(format!(
                    "{name} coefficient must be non-negative, got {c}"
                )));
            }
        }

        let MutationRates {
            weight,
            connection,
            node,
        } = self.mutation;
        for (name, p) in [("weight", weight), ("connection", connection), ("node", node)] {
            if !(0. ..=1.).contains(&p) {
                return Err(invalid(format!(
                    "{name} mutation rate must be within [0, 1], got {p}"
                )));
            }
        }

        Ok(())
    }

    pub fn to_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
