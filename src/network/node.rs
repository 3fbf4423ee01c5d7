use super::activate::Activation;

/// How far a node has been resolved within the current sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    #[default]
    Unvisited,
    /// resolution has started but not finished, so anything reaching this node again is a
    /// recurrent path and reads the previous sample's value
    Visited,
    Settled,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: usize,
    pub activation: Activation,
    /// `(slot, weight)` of every node feeding into this one
    pub predecessors: Vec<(usize, f64)>,
    pub value: f64,
    pub past: f64,
    pub mark: Mark,
}

impl Node {
    pub fn new(id: usize, activation: Activation) -> Self {
        Self {
            id,
            activation,
            predecessors: Vec::new(),
            value: 0.,
            past: 0.,
            mark: Mark::Unvisited,
        }
    }

    /// The value seen by a successor that's currently resolving
    #[inline]
    pub fn visible(&self) -> Option<f64> {
        match self.mark {
            Mark::Unvisited => None,
            Mark::Visited => Some(self.past),
            Mark::Settled => Some(self.value),
        }
    }

    /// Move on to the next sample, remembering this sample's value unless `carry` is false
    pub fn reset(&mut self, carry: bool) {
        self.mark = Mark::Unvisited;
        self.past = if carry { self.value } else { 0. };
        self.value = 0.;
    }
}
