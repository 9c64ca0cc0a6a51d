use itertools::Itertools;
use tracing::{debug, trace};

use super::Machine;
use crate::{
    math::{Map, OrderedMap, OrderedSet},
    partition::Rgs,
    AlgebraError, Element, Partition, Result,
};

/// Remembers the minimal partition with substitution property that contains a given block.
/// It is filled by [`Machine::minimal_sp_containing`] and consulted whenever the same block
/// (or the image of some block) shows up again.
///
/// Cached partitions are only valid for the transition table they were computed from. The
/// cache records a fingerprint of that table, handing it to a machine with a different
/// transition table discards everything cached so far.
#[derive(Debug, Clone)]
pub struct SpCache<S: Element> {
    minimal: Map<OrderedSet<S>, Partition<S>>,
    hits: usize,
    fingerprint: Option<u64>,
}

impl<S: Element> Default for SpCache<S> {
    fn default() -> Self {
        Self {
            minimal: Map::default(),
            hits: 0,
            fingerprint: None,
        }
    }
}

impl<S: Element> SpCache<S> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of blocks for which a minimal partition is known.
    pub fn len(&self) -> usize {
        self.minimal.len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.minimal.is_empty()
    }

    /// Looks up the minimal partition with substitution property containing `block`.
    pub fn get(&self, block: &OrderedSet<S>) -> Option<&Partition<S>> {
        self.minimal.get(block)
    }

    /// How often a cached partition was reused.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Ties `self` to the transition table with the given fingerprint, clearing it if it
    /// was filled for a different one.
    fn bind(&mut self, fingerprint: u64) {
        if self.fingerprint != Some(fingerprint) {
            if self.fingerprint.is_some() {
                debug!("cache was filled for another transition table, clearing it");
            }
            self.minimal.clear();
            self.hits = 0;
            self.fingerprint = Some(fingerprint);
        }
    }

    fn lookup(&mut self, block: &OrderedSet<S>) -> Option<Partition<S>> {
        let found = self.minimal.get(block).cloned();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }
}

impl<S: Element, I: Element, O: Element> Machine<S, I, O> {
    /// Computes the smallest partition with substitution property in which all states of
    /// `block` lie in the same block. Starting from [`Machine::min_containing`], we join in
    /// the partitions forcing the images of the current blocks together until the result has
    /// the substitution property. Intermediate results are stored in and taken from `cache`.
    ///
    /// Fails if `block` contains something that is not a state.
    pub fn minimal_sp_containing(
        &self,
        block: &OrderedSet<S>,
        cache: &mut SpCache<S>,
    ) -> Result<Partition<S>> {
        if let Some(unknown) = block.iter().find(|s| !self.delta.contains_key(*s)) {
            return Err(AlgebraError::UnknownState(format!("{unknown:?}")));
        }
        cache.bind(self.fingerprint());
        Ok(self.minimal_sp(block, cache))
    }

    fn fingerprint(&self) -> u64 {
        fxhash::hash64(&self.delta)
    }

    fn minimal_sp(&self, block: &OrderedSet<S>, cache: &mut SpCache<S>) -> Partition<S> {
        if let Some(known) = cache.lookup(block) {
            return known;
        }

        let mut pi = self.min_containing(block);
        let mut rounds = 0;
        while !self.is_sp_unchecked(&pi) {
            rounds += 1;
            let mut next = pi.clone();
            for image in self.images(&pi) {
                let Some(first) = image.first() else {
                    continue;
                };
                if image.len() < 2
                    || next
                        .block_containing(first)
                        .is_some_and(|b| image.is_subset(b))
                {
                    continue;
                }
                let forced = cache
                    .lookup(&image)
                    .unwrap_or_else(|| self.min_containing(&image));
                next = next.join_unchecked(&forced);
            }
            pi = next;
        }

        trace!("minimal sp partition for {block:?} after {rounds} rounds is {pi:?}");
        cache.minimal.insert(block.clone(), pi.clone());
        pi
    }

    /// Enumerates all partitions of the states that have the substitution property, ordered
    /// by their encoding relative to [`Machine::states`].
    ///
    /// This is the algorithm of Hartmanis and Stearns. First, the minimal partition with
    /// substitution property is computed for every pair of distinct states. Every partition
    /// with substitution property is the join of some of these, and the join of partitions
    /// with substitution property has the property again. Thus it suffices to close the
    /// minimal partitions under joins, which we do frontier by frontier: only the partitions
    /// found in the last round are joined with everything found so far. Finally the partition
    /// into singletons is added, as it is not the join of any pair partition.
    ///
    /// In contrast to [`Machine::enumerate_sp_naive`], this never touches partitions that do
    /// not have the substitution property.
    pub fn enumerate_sp(&self) -> Vec<Partition<S>> {
        self.enumerate_sp_with(&mut SpCache::new())
    }

    /// Same as [`Machine::enumerate_sp`] but uses and fills the given `cache`. If `cache` was
    /// filled for a machine with a different transition table, it is cleared first.
    pub fn enumerate_sp_with(&self, cache: &mut SpCache<S>) -> Vec<Partition<S>> {
        cache.bind(self.fingerprint());
        let positions = self.state_positions();

        let mut lattice: OrderedMap<Rgs, Partition<S>> = OrderedMap::new();
        for (i, s) in self.states.iter().enumerate() {
            for t in &self.states[i + 1..] {
                let pair = OrderedSet::from([s.clone(), t.clone()]);
                let minimal = self.minimal_sp(&pair, cache);
                lattice.entry(minimal.encode_with(&positions)).or_insert(minimal);
            }
        }
        debug!(
            "found {} distinct minimal sp partitions, cache holds {} blocks with {} hits",
            lattice.len(),
            cache.len(),
            cache.hits()
        );

        let mut frontier: Vec<Partition<S>> = lattice.values().cloned().collect();
        let mut round = 0;
        while !frontier.is_empty() {
            round += 1;
            let mut discovered: OrderedMap<Rgs, Partition<S>> = OrderedMap::new();
            for new in &frontier {
                for known in lattice.values() {
                    let joined = new.join_unchecked(known);
                    let code = joined.encode_with(&positions);
                    if !lattice.contains_key(&code) {
                        discovered.entry(code).or_insert(joined);
                    }
                }
            }
            trace!("round {round} of join closure discovered {}", discovered.len());
            frontier = discovered.values().cloned().collect();
            lattice.extend(discovered);
        }

        let zero = self.zero_partition();
        lattice.entry(zero.encode_with(&positions)).or_insert(zero);
        debug!(
            "sp lattice of machine with {} states has {} elements",
            self.size(),
            lattice.len()
        );
        lattice.into_values().collect()
    }

    /// Enumerates the partitions with substitution property by going through all partitions
    /// of the states and testing each of them. The result is ordered like the one of
    /// [`Machine::enumerate_sp`], but this takes time proportional to the Bell number of the
    /// number of states.
    pub fn enumerate_sp_naive(&self) -> Vec<Partition<S>> {
        let positions = self.state_positions();
        Partition::list(self.states.iter().cloned())
            .filter(|p| self.is_sp_unchecked(p))
            .sorted_by_cached_key(|p| p.encode_with(&positions))
            .collect()
    }
}
