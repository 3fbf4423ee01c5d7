//! Recombination of two genomes, and the genetic distance between them. Both align genomes by
//! their genes' innovation ids.

use crate::{
    config::Coefficients,
    constants::NEATLING_NORMALIZATION_THRESHOLD,
    genome::Genotype,
    random::{EvolutionEvent, Happens},
};
use core::cmp::max;
use fxhash::FxHashMap;

/// A child of `dominant` and `recessive`. The child carries every gene of `dominant`; a gene
/// found in both parents may take the recessive parent's weight instead, and if either parent
/// has it disabled it's likely to stay disabled.
pub fn crossover(dominant: &Genotype, recessive: &Genotype, rng: &mut impl Happens) -> Genotype {
    let mut child = dominant.clone();
    for (path, r_gene) in recessive.genes() {
        let Some(gene) = child.gene_mut(path) else {
            continue;
        };

        if !gene.enabled() || !r_gene.enabled() {
            if rng.happens(EvolutionEvent::KeepDisabled) {
                gene.disable();
            } else {
                gene.enable();
            }
        }

        if gene.enabled() && rng.happens(EvolutionEvent::PickRecessive) {
            gene.weight = r_gene.weight;
        }
    }

    child
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Alignment {
    excess: usize,
    disjoint: usize,
    matching: usize,
    weight_diff: f64,
}

fn align(repr: &Genotype, candidate: &Genotype) -> Alignment {
    let markers = repr
        .genes()
        .values()
        .map(|g| (g.inno(), g.weight()))
        .collect::<FxHashMap<_, _>>();
    let max_marker = markers.keys().copied().max().unwrap_or(0);

    let mut alignment = Alignment::default();
    for gene in candidate.genes().values() {
        match markers.get(&gene.inno()) {
            Some(w) => {
                alignment.matching += 1;
                alignment.weight_diff += (w - gene.weight()).abs();
            }
            None if gene.inno() > max_marker => alignment.excess += 1,
            None => alignment.disjoint += 1,
        }
    }
    alignment.disjoint += markers.len() - alignment.matching;
    alignment
}

/// `(excess, disjoint)` genes of `candidate` relative to `repr`. Only the candidate's genes newer
/// than all of `repr`'s count as excess; unmatched genes of `repr` are always disjoint.
pub fn disjoint_excess_count(repr: &Genotype, candidate: &Genotype) -> (usize, usize) {
    let Alignment {
        excess, disjoint, ..
    } = align(repr, candidate);
    (excess, disjoint)
}

/// if genomes share no overlapping weights, their average diff should be 0
pub fn avg_weight_diff(l: &Genotype, r: &Genotype) -> f64 {
    let Alignment {
        matching,
        weight_diff,
        ..
    } = align(l, r);
    if matching == 0 {
        0.
    } else {
        weight_diff / matching as f64
    }
}

/// Genetic distance of `candidate` from the representative `repr`
pub fn delta(repr: &Genotype, candidate: &Genotype, coefficients: &Coefficients) -> f64 {
    let alignment = align(repr, candidate);
    let n = max(repr.genes().len(), candidate.genes().len());
    let n = if n < NEATLING_NORMALIZATION_THRESHOLD {
        1.
    } else {
        n as f64
    };
    let weight = if alignment.matching == 0 {
        0.
    } else {
        alignment.weight_diff / alignment.matching as f64
    };

    coefficients.excess * alignment.excess as f64 / n
        + coefficients.disjoint * alignment.disjoint as f64 / n
        + coefficients.weight * weight
}
