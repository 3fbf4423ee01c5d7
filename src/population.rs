//! The population controller, which runs generations of test, sort and reproduce over every
//! specie.

use crate::{
    config::{CarryOver, Config},
    constants::NEATLING_THRESHOLD_SPECIE_RATIO,
    error::Result,
    genome::InnoGen,
    individual::Individual,
    network::InputMode,
    random::{default_rng, ProbBinding, ProbStatic, WyRng},
    reproduce::{population_alloc, reproduce},
    specie::{by_fitness_desc, Specie},
};
use core::mem;
use rand::RngCore;
use tracing::{debug, warn};

pub struct Population<R: RngCore> {
    config: Config,
    inno: InnoGen,
    rng: ProbBinding<ProbStatic, R>,
    species: Vec<Specie>,
    errors: Vec<f64>,
    generation: usize,
    threshold: f64,
}

impl Population<WyRng> {
    /// A population rolling against a [WyRng] seeded from the system
    pub fn with_default_rng(sensory: usize, action: usize, config: Config) -> Result<Self> {
        Self::new(sensory, action, config, default_rng())
    }
}

impl<R: RngCore> Population<R> {
    /// A population of two founders without connections, whose innovation registry starts
    /// right after the input and output node ids
    pub fn new(sensory: usize, action: usize, config: Config, rng: R) -> Result<Self> {
        config.validate()?;
        let (founder, head) = Individual::new(sensory, action, config.split);
        let mut population = Self {
            rng: ProbBinding::new(ProbStatic::with_rates(&config.mutation), rng),
            inno: InnoGen::new(head),
            species: Vec::new(),
            errors: Vec::new(),
            generation: 0,
            threshold: config.threshold,
            config,
        };

        population.insert(founder.clone(), None);
        population.insert(founder, None);
        Ok(population)
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn species(&self) -> &[Specie] {
        &self.species
    }

    /// Negated best fitness of every sorted generation so far
    #[inline]
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn inno_head(&self) -> usize {
        self.inno.head
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.species.iter().flat_map(|s| s.members.iter())
    }

    pub fn len(&self) -> usize {
        self.species.iter().map(Specie::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fittest evaluated individual, the first one found on ties
    pub fn fittest(&self) -> Option<&Individual> {
        self.individuals()
            .filter(|i| i.fitness.is_some())
            .min_by(|l, r| by_fitness_desc(l.fitness, r.fitness))
    }

    /// Evaluate every individual that hasn't been yet
    pub fn test<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &mut self,
        data: &[T],
        expected: &[U],
        input: InputMode,
    ) -> Result<()> {
        for specie in self.species.iter_mut() {
            specie.evaluate(data, expected, input, self.config.output)?;
        }
        Ok(())
    }

    /// Sort every specie, then species by their fittest member, and record the leading
    /// specie's error
    pub fn sort(&mut self) {
        for specie in self.species.iter_mut() {
            specie.sort();
        }
        self.species
            .sort_by(|l, r| by_fitness_desc(l.best_fitness(), r.best_fitness()));

        match self.species.first().and_then(Specie::best_fitness) {
            Some(best) => self.errors.push(-best),
            None => warn!(generation = self.generation, "sorted an untested population"),
        }
    }

    /// Whether the fittest individual's outputs round to `expected` on every sample
    pub fn test_best<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &self,
        data: &[T],
        expected: &[U],
        input: InputMode,
    ) -> Result<bool> {
        match self.fittest() {
            Some(fittest) => fittest.solves(data, expected, input, self.config.output),
            None => Ok(false),
        }
    }

    /// Place `individual` in the first specie that accepts it, trying `hint` before any other,
    /// or else in a new specie. Yields the index of that specie.
    fn insert(&mut self, individual: Individual, hint: Option<usize>) -> usize {
        let coefficients = &self.config.coefficients;
        let threshold = self.threshold;

        if let Some(idx) = hint {
            if let Some(specie) = self.species.get_mut(idx) {
                if specie.accepts(&individual.genotype, coefficients, threshold) {
                    specie.members.push(individual);
                    return idx;
                }
            }
        }

        match self
            .species
            .iter()
            .position(|s| s.accepts(&individual.genotype, coefficients, threshold))
        {
            Some(idx) => {
                self.species[idx].members.push(individual);
                idx
            }
            None => {
                self.species.push(Specie::new(individual));
                self.species.len() - 1
            }
        }
    }

    /// Replace every specie with the offspring of its members. Expects a tested and sorted
    /// population.
    pub fn next_generation(&mut self) {
        let shared = self
            .species
            .iter()
            .map(|s| s.shared_fitness)
            .collect::<Vec<_>>();
        let mut quotas = population_alloc(&shared, self.config.population);
        let previous = mem::take(&mut self.species);

        let mut hints = vec![None; previous.len()];
        match self.config.carry_over {
            CarryOver::Champion => {
                if let Some(quota) = quotas.first_mut() {
                    *quota = quota.saturating_sub(1);
                }
                if let Some(champion) = previous.first().and_then(Specie::fittest) {
                    self.insert(champion.clone(), None);
                }
            }
            CarryOver::Representatives => {
                for ((specie, quota), hint) in
                    previous.iter().zip(quotas.iter_mut()).zip(hints.iter_mut())
                {
                    if *quota == 0 {
                        continue;
                    }
                    if let Some(persisted) = specie.persist() {
                        *quota -= 1;
                        self.species.push(persisted);
                        *hint = Some(self.species.len() - 1);
                    }
                }
            }
        }

        debug!(
            generation = self.generation,
            species = previous.len(),
            quotas = ?quotas,
            threshold = self.threshold,
            "reproducing"
        );
        if quotas.iter().all(|q| *q == 0) {
            warn!(generation = self.generation, "no specie was allotted offspring");
        }

        for ((specie, quota), hint) in previous.iter().zip(quotas).zip(hints) {
            let mut hint = hint;
            for child in reproduce(&specie.members, quota, &mut self.rng, &mut self.inno) {
                hint = Some(self.insert(child, hint));
            }
        }

        if self.config.adapt_threshold {
            let step = self.config.threshold_step;
            let target = self.config.population / NEATLING_THRESHOLD_SPECIE_RATIO;
            if self.species.len() < target {
                self.threshold -= step;
            } else {
                self.threshold += step;
            }
            self.threshold = self.threshold.max(step);
        }

        self.generation += 1;
        debug!(
            generation = self.generation,
            species = self.species.len(),
            population = self.len(),
            threshold = self.threshold,
            "next generation"
        );
    }
}
