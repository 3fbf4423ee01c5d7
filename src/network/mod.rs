//! Networks decoded from [Genotype]s in order to express their behaviour. Connections may be
//! recurrent: a node reached again while it's still being resolved yields its value from the
//! previous sample.

pub mod node;

pub use activate::Activation;
pub use node::{Mark, Node};

use crate::{
    error::{Error, Result},
    genome::Genotype,
};
use core::ops::Range;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

pub mod activate {
    use crate::constants::{NEATLING_SIGMOID_CLAMP, NEATLING_SIGMOID_STEEPNESS};

    pub fn steep_sigmoid(x: f64) -> f64 {
        1. / (1. + (-NEATLING_SIGMOID_STEEPNESS * x).exp())
    }

    pub fn sigmoid(x: f64) -> f64 {
        let x = x.clamp(-NEATLING_SIGMOID_CLAMP, NEATLING_SIGMOID_CLAMP);
        1. / (1. + (-x).exp())
    }

    pub fn softmax(xs: &[f64]) -> Vec<f64> {
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp = xs.iter().map(|x| (x - max).exp()).collect::<Vec<_>>();
        let sum = exp.iter().sum::<f64>();
        exp.into_iter().map(|e| e / sum).collect()
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Activation {
        Identity,
        SteepSigmoid,
    }

    impl Activation {
        #[inline]
        pub fn apply(self, x: f64) -> f64 {
            match self {
                Self::Identity => x,
                Self::SteepSigmoid => steep_sigmoid(x),
            }
        }
    }
}

/// How consecutive input vectors relate to one another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Every vector is independent, recurrent paths always read zero
    #[default]
    Points,
    /// Vectors are consecutive time steps, recurrent paths read the previous step
    Sequence,
}

/// Post-processing of output node values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Raw,
    /// Softmax across several outputs, or a sigmoid over a single output
    #[default]
    Probability,
}

impl OutputMode {
    pub fn apply(self, raw: Vec<f64>) -> Vec<f64> {
        match self {
            Self::Raw => raw,
            Self::Probability if raw.len() > 1 => activate::softmax(&raw),
            Self::Probability => raw.into_iter().map(activate::sigmoid).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    slot: usize,
    next: usize,
    acc: f64,
}

/// A decoded network. Nodes live in slots: inputs first, then outputs, then hidden nodes in
/// ascending id order.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    sensory: Range<usize>,
    action: Range<usize>,
    stack: Vec<Frame>,
}

impl Network {
    pub fn decode(genotype: &Genotype) -> Self {
        let mut slots = FxHashMap::default();
        let mut nodes = Vec::new();
        for id in genotype.nodes() {
            let activation = if genotype.hidden().contains(&id) {
                Activation::SteepSigmoid
            } else {
                Activation::Identity
            };
            slots.insert(id, nodes.len());
            nodes.push(Node::new(id, activation));
        }

        let mut genes = genotype
            .genes()
            .values()
            .filter(|g| g.enabled())
            .collect::<Vec<_>>();
        genes.sort_by_key(|g| g.inno());
        for gene in genes {
            if let (Some(&from), Some(&to)) = (slots.get(&gene.from), slots.get(&gene.to)) {
                nodes[to].predecessors.push((from, gene.weight()));
            }
        }

        Self {
            stack: Vec::with_capacity(nodes.len()),
            nodes,
            sensory: genotype.sensory(),
            action: genotype.action(),
        }
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn sensory(&self) -> usize {
        self.sensory.len()
    }

    #[inline]
    pub fn action(&self) -> usize {
        self.action.len()
    }

    /// Value of the node in `root` for the current sample, resolving whatever it depends on.
    /// Each node settles at most once per sample, so the stack never outgrows the network.
    fn resolve(&mut self, root: usize) -> f64 {
        if let Some(v) = self.nodes[root].visible() {
            return v;
        }

        let mut stack = core::mem::take(&mut self.stack);
        self.nodes[root].mark = Mark::Visited;
        stack.push(Frame {
            slot: root,
            next: 0,
            acc: self.nodes[root].value,
        });

        while let Some(mut frame) = stack.pop() {
            match self.nodes[frame.slot].predecessors.get(frame.next).copied() {
                Some((pred, weight)) => match self.nodes[pred].visible() {
                    Some(v) => {
                        frame.acc += v * weight;
                        frame.next += 1;
                        stack.push(frame);
                    }
                    None => {
                        debug_assert!(stack.len() < self.nodes.len());
                        self.nodes[pred].mark = Mark::Visited;
                        stack.push(frame);
                        stack.push(Frame {
                            slot: pred,
                            next: 0,
                            acc: self.nodes[pred].value,
                        });
                    }
                },
                None => {
                    let node = &mut self.nodes[frame.slot];
                    node.value = node.activation.apply(frame.acc);
                    node.mark = Mark::Settled;
                }
            }
        }

        self.stack = stack;
        self.nodes[root].value
    }

    /// Feed one input vector through the network, yielding raw output values. With
    /// [InputMode::Sequence], the values of this step are visible to the next step's recurrent
    /// paths.
    pub fn step(&mut self, input: &[f64], mode: InputMode) -> Result<Vec<f64>> {
        if input.len() != self.sensory.len() {
            return Err(Error::InputWidth {
                want: self.sensory.len(),
                found: input.len(),
            });
        }

        for (slot, v) in self.sensory.clone().zip(input) {
            self.nodes[slot].value = *v;
        }
        let output = self
            .action
            .clone()
            .map(|slot| self.resolve(slot))
            .collect();

        let carry = matches!(mode, InputMode::Sequence);
        for node in self.nodes.iter_mut() {
            node.reset(carry);
        }

        Ok(output)
    }

    /// Forget any state carried between steps
    pub fn flush(&mut self) {
        for node in self.nodes.iter_mut() {
            node.reset(false);
        }
    }

    /// Feed every vector of `data` through the network in order
    pub fn evaluate<T: AsRef<[f64]>>(
        &mut self,
        data: &[T],
        input: InputMode,
        output: OutputMode,
    ) -> Result<Vec<Vec<f64>>> {
        data.iter()
            .map(|v| self.step(v.as_ref(), input).map(|raw| output.apply(raw)))
            .collect()
    }
}

impl From<&Genotype> for Network {
    fn from(genotype: &Genotype) -> Self {
        Self::decode(genotype)
    }
}
