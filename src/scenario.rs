use crate::{
    error::Result,
    individual::Individual,
    network::InputMode,
    population::Population,
    specie::{by_fitness_desc, Specie},
};
use core::ops::ControlFlow;
use rand::RngCore;
use serde::Serialize;
use tracing::info;

pub enum EvolutionTarget {
    /// any individual at least this fit
    Fitness(f64),
    /// this many generations reproduced
    Generation(usize),
}

impl EvolutionTarget {
    fn satisfied(&self, stats: &Stats) -> bool {
        match self {
            Self::Fitness(t) => stats.any_fitter_than(*t),
            Self::Generation(t) => *t <= stats.generation,
        }
    }
}

/// Read-only view of a tested and sorted population
#[derive(Debug, Clone, Copy)]
pub struct Stats<'a> {
    pub generation: usize,
    pub species: &'a [Specie],
    pub errors: &'a [f64],
    pub threshold: f64,
}

impl<'a, R: RngCore> From<&'a Population<R>> for Stats<'a> {
    fn from(population: &'a Population<R>) -> Self {
        Self {
            generation: population.generation(),
            species: population.species(),
            errors: population.errors(),
            threshold: population.threshold(),
        }
    }
}

impl Stats<'_> {
    pub fn population(&self) -> usize {
        self.species.iter().map(Specie::len).sum()
    }

    pub fn fittest(&self) -> Option<&Individual> {
        self.species
            .iter()
            .flat_map(|s| s.members.iter())
            .filter(|i| i.fitness.is_some())
            .min_by(|l, r| by_fitness_desc(l.fitness, r.fitness))
    }

    pub fn any_fitter_than(&self, target: f64) -> bool {
        self.species
            .iter()
            .any(|s| s.members.iter().any(|m| m.fitness.is_some_and(|f| f >= target)))
    }

    pub fn summary(&self) -> Summary {
        let fittest = self.fittest();
        Summary {
            generation: self.generation,
            species: self.species.len(),
            population: self.population(),
            threshold: self.threshold,
            best_fitness: fittest.and_then(Individual::fitness),
            hidden: fittest.map(Individual::hidden_count),
        }
    }
}

/// Figures of one generation, for printing or plotting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub generation: usize,
    pub species: usize,
    pub population: usize,
    pub threshold: f64,
    pub best_fitness: Option<f64>,
    pub hidden: Option<usize>,
}

impl Summary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub type Hook = Box<dyn FnMut(&Stats) -> ControlFlow<()>>;

/// Callbacks run once every generation, after sorting and before reproduction
#[derive(Default)]
pub struct EvolutionHooks {
    hooks: Vec<Hook>,
}

impl EvolutionHooks {
    pub fn new(hooks: Vec<Hook>) -> Self {
        Self { hooks }
    }

    pub fn push(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    /// Run every hook, breaking if any of them did
    fn fire(&mut self, stats: &Stats) -> ControlFlow<()> {
        let mut flow = ControlFlow::Continue(());
        for hook in self.hooks.iter_mut() {
            if hook(stats).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        flow
    }
}

/// Run generations of `population` against `data` until `target` is met or a hook breaks.
/// Yields the generation that was reached.
pub fn evolve<R: RngCore, T: AsRef<[f64]>, U: AsRef<[f64]>>(
    population: &mut Population<R>,
    data: &[T],
    expected: &[U],
    input: InputMode,
    target: EvolutionTarget,
    hooks: &mut EvolutionHooks,
) -> Result<usize> {
    loop {
        population.test(data, expected, input)?;
        population.sort();

        let stats = Stats::from(&*population);
        let flow = hooks.fire(&stats);
        if target.satisfied(&stats) {
            info!(
                generation = stats.generation,
                fitness = ?stats.fittest().and_then(Individual::fitness),
                "evolution target met"
            );
            break Ok(stats.generation);
        }
        if flow.is_break() {
            break Ok(stats.generation);
        }

        population.next_generation();
    }
}
