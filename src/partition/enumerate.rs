use std::iter::FusedIterator;

use tracing::warn;

use super::Partition;
use crate::{math::OrderedSet, Element};

/// Above this many elements, enumerating all partitions is almost certainly a mistake.
const LARGE_UNIVERSE: usize = 10;

/// Lazy iterator over all set partitions of a finite universe, obtained through
/// [`Partition::list`] or [`Partition::list_with_blocks`]. Partitions are produced in
/// lexicographic order of their restricted growth strings relative to the sorted order of
/// the elements. The iterator can be cloned to restart the enumeration from the current
/// position.
///
/// The number of partitions is the Bell number of the size of the universe, so this should
/// only ever be used for small universes.
#[derive(Debug, Clone)]
pub struct Partitions<E> {
    elements: Vec<E>,
    blocks: Option<usize>,
    current: Option<Vec<usize>>,
}

impl<E: Element> Partitions<E> {
    fn new(elements: Vec<E>, blocks: Option<usize>) -> Self {
        if elements.len() > LARGE_UNIVERSE {
            warn!(
                "enumerating all partitions of {} elements, this will take a while",
                elements.len()
            );
        }
        Self {
            current: Some(vec![0; elements.len()]),
            elements,
            blocks,
        }
    }

    /// Advances `labels` to the lexicographically next restricted growth string, returns
    /// `false` if there is none. When a block count is requested, no label may reach it.
    fn advance(&self, labels: &mut [usize]) -> bool {
        let mut prefix_max = Vec::with_capacity(labels.len());
        let mut max = 0;
        for &label in labels.iter() {
            prefix_max.push(max);
            max = max.max(label);
        }

        for i in (1..labels.len()).rev() {
            let next = labels[i] + 1;
            let within_bound = self.blocks.map(|k| next < k).unwrap_or(true);
            if next <= prefix_max[i] + 1 && within_bound {
                labels[i] = next;
                labels[i + 1..].iter_mut().for_each(|l| *l = 0);
                return true;
            }
        }
        false
    }
}

impl<E: Element> Iterator for Partitions<E> {
    type Item = Partition<E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let labels = self.current.take()?;
            let mut successor = labels.clone();
            if self.advance(&mut successor) {
                self.current = Some(successor);
            }

            let block_count = labels.iter().max().map(|m| m + 1).unwrap_or(0);
            if self.blocks.map(|k| k == block_count).unwrap_or(true) {
                return Some(Partition::from_labelled(
                    labels.into_iter().zip(self.elements.iter().cloned()),
                ));
            }
        }
    }
}

impl<E: Element> FusedIterator for Partitions<E> {}

impl<E: Element> Partition<E> {
    /// Lazily enumerates every partition of `elements`. Duplicate elements are ignored.
    ///
    /// # Example
    /// ```
    /// use automata_algebra::prelude::*;
    ///
    /// assert_eq!(Partition::list(0..4).count(), 15);
    /// ```
    pub fn list<X: IntoIterator<Item = E>>(elements: X) -> Partitions<E> {
        let elements: OrderedSet<E> = elements.into_iter().collect();
        Partitions::new(elements.into_iter().collect(), None)
    }

    /// Lazily enumerates every partition of `elements` into exactly `blocks` blocks.
    pub fn list_with_blocks<X: IntoIterator<Item = E>>(elements: X, blocks: usize) -> Partitions<E> {
        let elements: OrderedSet<E> = elements.into_iter().collect();
        Partitions::new(elements.into_iter().collect(), Some(blocks))
    }
}
