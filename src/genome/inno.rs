use fxhash::FxHashMap;
use std::collections::BTreeSet;
use tracing::trace;

/// Innovation registry shared by every genome of a run. Hands out the same id to the same
/// `(from, to)` path across genomes, so that genomes may be aligned by id.
///
/// A path may own more than one id: once a genome splits a path, that path's id lives on as a
/// hidden node in that genome, and the path re-appearing there needs a fresh id.
#[derive(Debug, Clone)]
pub struct InnoGen {
    pub head: usize,
    seen: FxHashMap<(usize, usize), Vec<usize>>,
    paths: FxHashMap<usize, (usize, usize)>,
}

impl InnoGen {
    /// A registry whose first minted id will be `head`. Ids below `head` are reserved for the
    /// input and output nodes.
    pub fn new(head: usize) -> Self {
        Self {
            head,
            seen: FxHashMap::default(),
            paths: FxHashMap::default(),
        }
    }

    fn mint(&mut self, v: (usize, usize)) -> usize {
        let n = self.head;
        self.head += 1;
        self.seen.entry(v).or_default().push(n);
        self.paths.insert(n, v);
        trace!(inno = n, from = v.0, to = v.1, "minted innovation");
        n
    }

    /// The id of path `v`, ignoring whether any genome has split it
    pub fn path(&mut self, v: (usize, usize)) -> usize {
        match self.seen.get(&v).and_then(|ids| ids.first()) {
            Some(n) => *n,
            None => self.mint(v),
        }
    }

    /// The oldest id of path `v` that isn't a hidden node in `consumed`, minting a new id if
    /// every known id is
    pub fn resolve(&mut self, v: (usize, usize), consumed: &BTreeSet<usize>) -> usize {
        match self
            .seen
            .get(&v)
            .and_then(|ids| ids.iter().find(|n| !consumed.contains(n)))
        {
            Some(n) => *n,
            None => self.mint(v),
        }
    }

    /// Every id ever handed out for path `v`, oldest first
    pub fn ids(&self, v: (usize, usize)) -> &[usize] {
        self.seen.get(&v).map_or(&[], Vec::as_slice)
    }

    /// The path that some id was minted for
    pub fn pair(&self, inno: usize) -> Option<(usize, usize)> {
        self.paths.get(&inno).copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_inno_gen() {
        let mut inno = InnoGen::new(0);
        assert_eq!(inno.head, 0);
        assert_eq!(inno.path((0, 1)), 0);
        assert_eq!(inno.path((1, 2)), 1);
        assert_eq!(inno.path((0, 1)), 0);
        assert_eq!(inno.head, 2);

        let mut inno2 = InnoGen::new(inno.head);
        assert_eq!(inno2.path((1, 0)), 2);
        assert_eq!(inno2.path((0, 1)), 3);
    }

    #[test]
    fn test_resolve_consumed() {
        let mut inno = InnoGen::new(3);
        let none = BTreeSet::new();
        assert_eq!(inno.resolve((0, 2), &none), 3);
        assert_eq!(inno.resolve((0, 2), &none), 3);

        // a genome whose hidden node 3 came from splitting (0, 2)
        let split = BTreeSet::from([3]);
        assert_eq!(inno.resolve((0, 2), &split), 4);
        assert_eq!(inno.resolve((0, 2), &split), 4);
        assert_eq!(inno.ids((0, 2)), &[3, 4]);

        // genomes that never split it keep the oldest id
        assert_eq!(inno.resolve((0, 2), &none), 3);

        let both = BTreeSet::from([3, 4]);
        assert_eq!(inno.resolve((0, 2), &both), 5);
        assert_eq!(inno.head, 6);
    }

    #[test]
    fn test_pair_inverse() {
        let mut inno = InnoGen::new(10);
        let a = inno.path((0, 1));
        let b = inno.resolve((4, 1), &BTreeSet::new());
        assert_eq!(inno.pair(a), Some((0, 1)));
        assert_eq!(inno.pair(b), Some((4, 1)));
        assert_eq!(inno.pair(0), None);
        assert!(inno.ids((9, 9)).is_empty());
    }
}
