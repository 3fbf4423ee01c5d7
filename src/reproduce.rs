//! Functions related to reproducing on the specie and global population scale.

use crate::{genome::InnoGen, individual::Individual, random::Happens};
use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    Rng,
};

/// Selection weights of `n` members sorted fittest first: the fittest weighs `n`, the least fit
/// weighs 1
pub fn rank_weights(n: usize) -> impl Iterator<Item = usize> {
    (1..=n).rev()
}

/// Draw two parents from `members` by rank. Both draws are independent, so the same member may
/// be drawn twice.
pub fn select_parents<'a>(
    members: &'a [Individual],
    rng: &mut impl Rng,
) -> Option<(&'a Individual, &'a Individual)> {
    let dist = WeightedIndex::new(rank_weights(members.len())).ok()?;
    Some((&members[dist.sample(rng)], &members[dist.sample(rng)]))
}

/// `size` children of `members`, which should be sorted fittest first
pub fn reproduce(
    members: &[Individual],
    size: usize,
    rng: &mut impl Happens,
    inno: &mut InnoGen,
) -> Vec<Individual> {
    (0..size)
        .map_while(|_| {
            let (l, r) = select_parents(members, rng)?;
            Some(l.mate(r, rng, inno))
        })
        .collect()
}

/// Positive weight of a shared fitness, growing with it. Fitness at or below 0 maps onto
/// `(0, 1]` so near-equal values keep near-equal weights.
#[inline]
pub fn alloc_weight(shared: f64) -> f64 {
    match shared {
        f if f.is_nan() || f == f64::INFINITY => 0.,
        f if f <= 0. => 1. / (1. - f),
        f => 1. + f,
    }
}

/// allocate a target population for every specie in proportion to the weight of its shared
/// fitness. Quotas are rounded, so their sum may drift from `population`.
pub fn population_alloc(shared: &[f64], population: usize) -> Vec<usize> {
    let weights = shared.iter().copied().map(alloc_weight).collect::<Vec<_>>();
    let total = weights.iter().sum::<f64>();
    let population_f = population as f64;

    if total <= 0. {
        // nothing to go by, split evenly
        let n = shared.len().max(1) as f64;
        return shared
            .iter()
            .map(|_| f64::round(population_f / n) as usize)
            .collect();
    }

    weights
        .into_iter()
        .map(|w| f64::round(population_f * w / total) as usize)
        .collect()
}
