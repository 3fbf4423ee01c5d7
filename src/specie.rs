//! Species: groups of [Individual]s close to some representative genome.

use crate::{
    config::Coefficients,
    crossover::delta,
    error::Result,
    genome::Genotype,
    individual::Individual,
    network::{InputMode, OutputMode},
};
use core::cmp::Ordering;

/// Descending order of fitness, with unevaluated individuals last
pub(crate) fn by_fitness_desc(l: Option<f64>, r: Option<f64>) -> Ordering {
    match (l, r) {
        (Some(l), Some(r)) => r.total_cmp(&l),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A collection of [Individual]s closely related to its first member, the representative
#[derive(Debug, Clone)]
pub struct Specie {
    pub members: Vec<Individual>,
    /// mean fitness of every member, as of the last evaluation
    pub shared_fitness: f64,
    /// generations this specie has been carried through
    pub age: usize,
}

impl Specie {
    pub fn new(founder: Individual) -> Self {
        Self {
            members: vec![founder],
            shared_fitness: 0.,
            age: 0,
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

    #[inline]
    pub fn repr(&self) -> Option<&Individual> {
        self.members.first()
    }

    /// Genetic distance from the representative to `candidate`. An empty specie is infinitely
    /// distant from everything.
    pub fn delta(&self, candidate: &Genotype, coefficients: &Coefficients) -> f64 {
        self.repr().map_or(f64::INFINITY, |repr| {
            delta(&repr.genotype, candidate, coefficients)
        })
    }

    pub fn accepts(&self, candidate: &Genotype, coefficients: &Coefficients, threshold: f64) -> bool {
        self.delta(candidate, coefficients) < threshold
    }

    /// Evaluate every member that hasn't been yet, and update the shared fitness
    pub fn evaluate<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &mut self,
        data: &[T],
        expected: &[U],
        input: InputMode,
        output: OutputMode,
    ) -> Result<f64> {
        for member in self.members.iter_mut().filter(|m| m.fitness.is_none()) {
            member.evaluate(data, expected, input, output)?;
        }

        self.shared_fitness = if self.is_empty() {
            0.
        } else {
            self.members.iter().filter_map(Individual::fitness).sum::<f64>() / self.len() as f64
        };
        Ok(self.shared_fitness)
    }

    /// Sort members fittest first. Equally fit members keep their order.
    pub fn sort(&mut self) {
        self.members
            .sort_by(|l, r| by_fitness_desc(l.fitness, r.fitness));
    }

    /// Fittest member, assuming the specie is sorted
    #[inline]
    pub fn fittest(&self) -> Option<&Individual> {
        self.members.first()
    }

    #[inline]
    pub fn best_fitness(&self) -> Option<f64> {
        self.fittest().and_then(Individual::fitness)
    }

    /// This specie for the next generation, aged and seeded with only its fittest member
    pub fn persist(&self) -> Option<Self> {
        self.fittest().map(|fittest| Self {
            members: vec![fittest.clone()],
            shared_fitness: 0.,
            age: self.age + 1,
        })
    }
}
