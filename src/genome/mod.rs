//! The genetic encoding of a single network: its nodes, its connection genes, and the routes it
//! may still grow along.

pub mod gene;
pub mod inno;

pub use gene::{Gene, GeneState};
pub use inno::InnoGen;

use crate::{
    config::SplitPolicy,
    constants::{NEATLING_BISECT_WEIGHT, NEATLING_WEIGHT_INIT_RANGE},
    network::Network,
    random::{EvolutionEvent, Happens},
};
use core::ops::Range;
use fxhash::FxHashMap;
use rand::{seq::IteratorRandom, Rng, RngCore};
use std::collections::BTreeSet;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Sensory,
    Action,
    Internal,
}

/// A genome that allows recurrent connections between hidden nodes. Node ids `0..sensory` are
/// inputs and `sensory..sensory + action` are outputs; hidden node ids are innovation ids of the
/// genes they were split from.
#[derive(Debug, Clone, PartialEq)]
pub struct Genotype {
    sensory: usize,
    action: usize,
    hidden: BTreeSet<usize>,
    genes: FxHashMap<(usize, usize), Gene>,
    /// For every node that may still connect somewhere, the nodes it may connect to. A path
    /// that's present in genes is never present here.
    routes: FxHashMap<usize, BTreeSet<usize>>,
    split: SplitPolicy,
}

impl Genotype {
    /// A new genome with no connections, where every input may connect to every output. Also
    /// yields the first innovation id free for genes.
    pub fn new(sensory: usize, action: usize) -> (Self, usize) {
        Self::with_policy(sensory, action, SplitPolicy::default())
    }

    pub fn with_policy(sensory: usize, action: usize, split: SplitPolicy) -> (Self, usize) {
        let routes = (0..sensory)
            .map(|from| (from, (sensory..sensory + action).collect()))
            .collect();
        (
            Self {
                sensory,
                action,
                hidden: BTreeSet::new(),
                genes: FxHashMap::default(),
                routes,
                split,
            },
            sensory + action,
        )
    }

    #[inline]
    pub fn sensory(&self) -> Range<usize> {
        0..self.sensory
    }

    #[inline]
    pub fn action(&self) -> Range<usize> {
        self.sensory..self.sensory + self.action
    }

    #[inline]
    pub fn hidden(&self) -> &BTreeSet<usize> {
        &self.hidden
    }

    #[inline]
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    #[inline]
    pub fn split_policy(&self) -> SplitPolicy {
        self.split
    }

    pub fn kind(&self, node: usize) -> Option<NodeKind> {
        if self.sensory().contains(&node) {
            Some(NodeKind::Sensory)
        } else if self.action().contains(&node) {
            Some(NodeKind::Action)
        } else if self.hidden.contains(&node) {
            Some(NodeKind::Internal)
        } else {
            None
        }
    }

    /// Every node id, inputs then outputs then hidden nodes ascending
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.sensory()
            .chain(self.action())
            .chain(self.hidden.iter().copied())
    }

    #[inline]
    pub fn genes(&self) -> &FxHashMap<(usize, usize), Gene> {
        &self.genes
    }

    #[inline]
    pub fn gene(&self, path: &(usize, usize)) -> Option<&Gene> {
        self.genes.get(path)
    }

    #[inline]
    pub fn gene_mut(&mut self, path: &(usize, usize)) -> Option<&mut Gene> {
        self.genes.get_mut(path)
    }

    /// Nodes that `from` may still connect to
    pub fn routes(&self, from: usize) -> Option<&BTreeSet<usize>> {
        self.routes.get(&from)
    }

    /// Whether no new connection may be added anywhere
    pub fn saturated(&self) -> bool {
        self.routes.values().all(BTreeSet::is_empty)
    }

    /// Insert a gene along `path`, taking its innovation id from `inno`. Without a weight, one
    /// is drawn at random.
    pub fn insert_gene(
        &mut self,
        path: (usize, usize),
        weight: Option<f64>,
        inno: &mut InnoGen,
        rng: &mut impl RngCore,
    ) -> usize {
        let weight = weight.unwrap_or_else(|| {
            rng.random_range(-NEATLING_WEIGHT_INIT_RANGE..NEATLING_WEIGHT_INIT_RANGE)
        });
        self.place_gene(path, weight, inno)
    }

    fn place_gene(&mut self, path: (usize, usize), weight: f64, inno: &mut InnoGen) -> usize {
        let id = inno.resolve(path, &self.hidden);
        if let Some(targets) = self.routes.get_mut(&path.0) {
            targets.remove(&path.1);
        }
        self.genes.insert(path, Gene::new(id, path, weight));
        id
    }

    /// A random path along which no gene exists yet, if there are any
    pub fn open_path(&self, rng: &mut impl RngCore) -> Option<(usize, usize)> {
        let (from, targets) = self
            .routes
            .iter()
            .filter(|(_, targets)| !targets.is_empty())
            .choose(rng)?;
        let to = targets.iter().choose(rng)?;
        Some((*from, *to))
    }

    /// Generate a new connection along an open path. Does nothing if the genome is fully
    /// connected.
    pub fn mutate_connection(&mut self, rng: &mut impl RngCore, inno: &mut InnoGen) {
        if let Some(path) = self.open_path(rng) {
            let id = self.insert_gene(path, None, inno, rng);
            trace!(inno = id, from = path.0, to = path.1, "new connection");
        }
    }

    /// Insert a node into the connection along `path`, which becomes `from -{1}> center -{w}>
    /// to`. The new node's id is the innovation id of the split gene. Yields that id, or `None`
    /// if there's no gene along `path` that may be split.
    pub fn bisect(&mut self, path: (usize, usize), inno: &mut InnoGen) -> Option<usize> {
        let gene = self.genes.get(&path)?;
        if !gene.enabled() || self.hidden.contains(&gene.inno) {
            return None;
        }

        let (center, weight) = (gene.inno, gene.weight);
        let (from, to) = path;
        match self.split {
            SplitPolicy::Reuse => {
                self.genes.remove(&path);
                self.routes.entry(from).or_default().insert(to);
            }
            SplitPolicy::Disable => {
                if let Some(gene) = self.genes.get_mut(&path) {
                    gene.disable();
                }
            }
        }

        for targets in self.routes.values_mut() {
            targets.insert(center);
        }
        let own = self
            .hidden
            .iter()
            .copied()
            .chain(self.action())
            .collect();
        self.routes.insert(center, own);

        self.place_gene((from, center), NEATLING_BISECT_WEIGHT, inno);
        self.place_gene((center, to), weight, inno);
        self.hidden.insert(center);

        trace!(center, from, to, "bisected connection");
        Some(center)
    }

    /// Bisect a random connection. Does nothing if there's no connection to bisect.
    pub fn mutate_bisection(&mut self, rng: &mut impl RngCore, inno: &mut InnoGen) {
        let path = self
            .genes
            .values()
            .filter(|g| g.enabled() && !self.hidden.contains(&g.inno))
            .map(Gene::path)
            .choose(rng);
        if let Some(path) = path {
            self.bisect(path, inno);
        }
    }

    /// Perturb or replace every weight
    pub fn mutate_params(&mut self, rng: &mut impl Happens) {
        for gene in self.genes.values_mut() {
            if rng.happens(EvolutionEvent::PerturbWeight) {
                gene.perturb(rng);
            } else {
                gene.randomize(rng);
            }
        }
    }

    /// Perform 0 or more mutations on this genome, each rolled once
    pub fn mutate(&mut self, rng: &mut impl Happens, inno: &mut InnoGen) {
        if rng.happens(EvolutionEvent::MutateWeight) {
            self.mutate_params(rng);
        }
        if rng.happens(EvolutionEvent::MutateConnection) {
            self.mutate_connection(rng, inno);
        }
        if self.genes.is_empty() {
            return;
        }
        if rng.happens(EvolutionEvent::MutateBisection) {
            self.mutate_bisection(rng, inno);
        }
    }

    /// Decode this genome into a network that may be evaluated
    pub fn network(&self) -> Network {
        Network::decode(self)
    }
}
