use crate::{
    config::SplitPolicy,
    crossover::crossover,
    error::{Error, Result},
    genome::{Genotype, InnoGen},
    network::{InputMode, Network, OutputMode},
    random::Happens,
};

/// A [Genotype] and its fitness, unset until it's been evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub genotype: Genotype,
    pub fitness: Option<f64>,
}

impl Individual {
    /// A founder with no connections. Also yields the first innovation id free for genes.
    pub fn new(sensory: usize, action: usize, split: SplitPolicy) -> (Self, usize) {
        let (genotype, head) = Genotype::with_policy(sensory, action, split);
        (Self::from_genotype(genotype), head)
    }

    pub fn from_genotype(genotype: Genotype) -> Self {
        Self {
            genotype,
            fitness: None,
        }
    }

    #[inline]
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    #[inline]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    #[inline]
    pub fn hidden_count(&self) -> usize {
        self.genotype.hidden_count()
    }

    pub fn network(&self) -> Network {
        self.genotype.network()
    }

    /// Whether `other` is strictly fitter. Unevaluated individuals are the least fit.
    fn outranked_by(&self, other: &Self) -> bool {
        other.fitness.unwrap_or(f64::NEG_INFINITY) > self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    /// Cross this individual with `other` and mutate the result. The fitter parent is dominant,
    /// and on equal fitness `self` is.
    pub fn mate(&self, other: &Self, rng: &mut impl Happens, inno: &mut InnoGen) -> Self {
        let (dominant, recessive) = if self.outranked_by(other) {
            (other, self)
        } else {
            (self, other)
        };
        let mut genotype = crossover(&dominant.genotype, &recessive.genotype, rng);
        genotype.mutate(rng, inno);
        Self::from_genotype(genotype)
    }

    /// Outputs of this individual's network for every vector of `data`
    pub fn predict<T: AsRef<[f64]>>(
        &self,
        data: &[T],
        input: InputMode,
        output: OutputMode,
    ) -> Result<Vec<Vec<f64>>> {
        self.network().evaluate(data, input, output)
    }

    /// Score this individual by its mean squared error over `data`, negated so that a perfect
    /// match has the greatest fitness of 0. The score is also stored as this individual's
    /// fitness.
    pub fn evaluate<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &mut self,
        data: &[T],
        expected: &[U],
        input: InputMode,
        output: OutputMode,
    ) -> Result<f64> {
        if data.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if data.len() != expected.len() {
            return Err(Error::DatasetMismatch {
                inputs: data.len(),
                expected: expected.len(),
            });
        }

        let mut error = 0.;
        for (out, want) in self.predict(data, input, output)?.iter().zip(expected) {
            let want = want.as_ref();
            if out.len() != want.len() {
                return Err(Error::OutputWidth {
                    want: out.len(),
                    found: want.len(),
                });
            }
            error += out
                .iter()
                .zip(want)
                .map(|(o, w)| (o - w).powi(2))
                .sum::<f64>();
        }

        let fitness = -error / data.len() as f64;
        self.fitness = Some(fitness);
        Ok(fitness)
    }

    /// Whether every output, rounded to the nearest integer, equals its expected value
    pub fn solves<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &self,
        data: &[T],
        expected: &[U],
        input: InputMode,
        output: OutputMode,
    ) -> Result<bool> {
        if data.len() != expected.len() {
            return Err(Error::DatasetMismatch {
                inputs: data.len(),
                expected: expected.len(),
            });
        }

        Ok(self
            .predict(data, input, output)?
            .iter()
            .zip(expected)
            .all(|(out, want)| {
                let want = want.as_ref();
                out.len() == want.len() && out.iter().zip(want).all(|(o, w)| o.round() == *w)
            }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::random::{EvolutionEvent, ProbBinding, ProbStatic};
    use rand::{rngs::StdRng, SeedableRng};

    const XOR_DATA: [[f64; 2]; 4] = [[1., 0.], [0., 1.], [1., 1.], [0., 0.]];
    const XOR_EXPECTED: [[f64; 1]; 4] = [[1.], [1.], [0.], [0.]];

    /// A network computing xor exactly, with 4 hidden nodes saturated by large weights
    fn xor() -> Individual {
        let (mut genotype, head) = Genotype::new(2, 1);
        let mut inno = InnoGen::new(head);
        let mut rng = StdRng::seed_from_u64(0);

        genotype.insert_gene((0, 2), None, &mut inno, &mut rng);
        let p = genotype.bisect((0, 2), &mut inno).unwrap();
        genotype.insert_gene((0, 2), None, &mut inno, &mut rng);
        let q = genotype.bisect((0, 2), &mut inno).unwrap();
        let u = genotype.bisect((p, 2), &mut inno).unwrap();
        let v = genotype.bisect((q, 2), &mut inno).unwrap();
        for path in [(1, p), (1, q), (q, u), (p, v)] {
            genotype.insert_gene(path, None, &mut inno, &mut rng);
        }

        for (path, w) in [
            ((0, p), 1000.),
            ((1, p), -1000.),
            ((0, q), -1000.),
            ((1, q), 1000.),
            ((p, u), 250.),
            ((q, u), -750.),
            ((q, v), 250.),
            ((p, v), -750.),
            ((u, 2), 1.),
            ((v, 2), 1.),
        ] {
            genotype.gene_mut(&path).unwrap().weight = w;
        }
        assert_eq!(genotype.genes().len(), 10);
        Individual::from_genotype(genotype)
    }

    #[test]
    fn test_xor_exact() {
        let mut xor = xor();
        assert_eq!(xor.hidden_count(), 4);
        assert_eq!(
            xor.predict(&XOR_DATA, InputMode::Points, OutputMode::Raw)
                .unwrap(),
            vec![vec![1.], vec![1.], vec![0.], vec![0.]]
        );
        let fitness = xor
            .evaluate(&XOR_DATA, &XOR_EXPECTED, InputMode::Points, OutputMode::Raw)
            .unwrap();
        assert_eq!(fitness, 0.);
        assert_eq!(xor.fitness(), Some(0.));
        assert!(xor
            .solves(&XOR_DATA, &XOR_EXPECTED, InputMode::Points, OutputMode::Raw)
            .unwrap());
    }

    #[test]
    fn test_fitness_is_negative_mse() {
        let (mut individual, _) = Individual::new(2, 1, SplitPolicy::Reuse);
        // no connections, every output is 0
        let fitness = individual
            .evaluate(
                &XOR_DATA,
                &[[1.], [1.], [0.], [2.]],
                InputMode::Points,
                OutputMode::Raw,
            )
            .unwrap();
        assert_eq!(fitness, -(1. + 1. + 0. + 4.) / 4.);
        assert!(!individual
            .solves(&XOR_DATA, &XOR_EXPECTED, InputMode::Points, OutputMode::Raw)
            .unwrap());
    }

    #[test]
    fn test_evaluate_rejects() {
        let (mut individual, _) = Individual::new(2, 1, SplitPolicy::Reuse);
        let empty: [[f64; 2]; 0] = [];
        assert!(matches!(
            individual.evaluate(&empty, &empty, InputMode::Points, OutputMode::Raw),
            Err(Error::EmptyDataset)
        ));
        assert!(matches!(
            individual.evaluate(&XOR_DATA, &[[1.]], InputMode::Points, OutputMode::Raw),
            Err(Error::DatasetMismatch {
                inputs: 4,
                expected: 1
            })
        ));
        assert!(matches!(
            individual.evaluate(&[[1., 1.]], &[[1., 0.]], InputMode::Points, OutputMode::Raw),
            Err(Error::OutputWidth { want: 1, found: 2 })
        ));
        assert!(matches!(
            individual.evaluate(&[[1.]], &[[1.]], InputMode::Points, OutputMode::Raw),
            Err(Error::InputWidth { want: 2, found: 1 })
        ));
        assert_eq!(individual.fitness(), None);
    }

    fn still(pick_recessive: bool) -> ProbBinding<ProbStatic, StdRng> {
        ProbBinding::new(
            ProbStatic::default().with_overrides(&[
                (EvolutionEvent::MutateWeight, 0),
                (EvolutionEvent::MutateConnection, 0),
                (EvolutionEvent::MutateBisection, 0),
                (
                    EvolutionEvent::PickRecessive,
                    if pick_recessive { u64::MAX } else { 0 },
                ),
            ]),
            StdRng::seed_from_u64(4),
        )
    }

    #[test]
    fn test_mate_dominance() {
        let mut inno = InnoGen::new(3);
        let mut rng = StdRng::seed_from_u64(0);
        let (mut l, _) = Individual::new(2, 1, SplitPolicy::Reuse);
        let (mut r, _) = Individual::new(2, 1, SplitPolicy::Reuse);
        l.genotype
            .insert_gene((0, 2), Some(1.), &mut inno, &mut rng);
        r.genotype
            .insert_gene((0, 2), Some(2.), &mut inno, &mut rng);
        r.genotype
            .insert_gene((1, 2), Some(3.), &mut inno, &mut rng);

        // fitter parent is dominant regardless of order
        l.fitness = Some(-1.);
        r.fitness = Some(-0.5);
        for child in [
            l.mate(&r, &mut still(false), &mut inno),
            r.mate(&l, &mut still(false), &mut inno),
        ] {
            assert_eq!(child.genotype, r.genotype);
            assert_eq!(child.fitness(), None);
        }

        // ties favour the receiver
        r.fitness = Some(-1.);
        assert_eq!(l.mate(&r, &mut still(false), &mut inno).genotype, l.genotype);
        assert_eq!(r.mate(&l, &mut still(false), &mut inno).genotype, r.genotype);

        let child = l.mate(&r, &mut still(true), &mut inno);
        assert_eq!(child.genotype.gene(&(0, 2)).unwrap().weight(), 2.);
        assert!(child.genotype.gene(&(1, 2)).is_none());
    }

    #[test]
    fn test_mate_unevaluated() {
        let mut inno = InnoGen::new(3);
        let (mut l, _) = Individual::new(2, 1, SplitPolicy::Reuse);
        let (r, _) = Individual::new(2, 1, SplitPolicy::Reuse);
        l.genotype
            .insert_gene((1, 2), Some(1.), &mut inno, &mut StdRng::seed_from_u64(0));
        l.fitness = Some(-100.);
        assert_eq!(r.mate(&l, &mut still(false), &mut inno).genotype, l.genotype);
    }
}
