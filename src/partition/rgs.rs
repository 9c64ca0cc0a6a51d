use std::{fmt::Display, str::FromStr};

use itertools::Itertools;

use super::Partition;
use crate::{
    math::{Map, OrderedSet},
    AlgebraError, Element, Result,
};

/// A restricted growth string, the canonical encoding of a [`Partition`] relative to a fixed
/// order of its elements. Position `i` holds the index of the block containing the `i`-th
/// element, where blocks are numbered by the position of their first element in the order.
/// Consequently the first entry is always `0` and every entry exceeds the maximum of the
/// entries before it by at most one.
///
/// The textual representation consists of the indices separated by single spaces, e.g.
/// `"0 1 0 2"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgs(Vec<usize>);

impl Rgs {
    /// Wraps the given block indices.
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Returns the block indices as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns the number of encoded elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no element is encoded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of distinct block indices.
    pub fn block_count(&self) -> usize {
        self.0.iter().unique().count()
    }

    /// Checks whether `self` satisfies the restricted growth condition.
    pub fn is_restricted_growth(&self) -> bool {
        let mut bound = 0;
        for &index in &self.0 {
            if index > bound {
                return false;
            }
            if index == bound {
                bound += 1;
            }
        }
        true
    }
}

impl From<Vec<usize>> for Rgs {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

impl Display for Rgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

impl FromStr for Rgs {
    type Err = AlgebraError;

    fn from_str(s: &str) -> Result<Self> {
        s.split_whitespace()
            .map(|n| {
                n.parse::<usize>()
                    .map_err(|_| AlgebraError::MalformedEncoding(s.to_string()))
            })
            .collect::<Result<Vec<_>>>()
            .map(Rgs)
    }
}

/// Computes the position of each element in `order`, failing if an element repeats.
pub(crate) fn positions<E: Element>(order: &[E]) -> Result<Map<&E, usize>> {
    let mut positions = Map::default();
    for (i, e) in order.iter().enumerate() {
        if positions.insert(e, i).is_some() {
            return Err(AlgebraError::EncodingMismatch(format!(
                "{e:?} occurs more than once"
            )));
        }
    }
    Ok(positions)
}

impl<E: Element> Partition<E> {
    /// Returns the blocks of `self` ordered by the smallest position that one of their
    /// elements has in `order`. Fails if `order` does not consist of precisely the elements
    /// of `self`.
    pub fn ordered_blocks(&self, order: &[E]) -> Result<Vec<&OrderedSet<E>>> {
        let positions = positions(order)?;
        if let Some(missing) = self.elements.iter().find(|e| !positions.contains_key(e)) {
            return Err(AlgebraError::EncodingMismatch(format!(
                "{missing:?} does not occur in the order"
            )));
        }
        if let Some(extra) = order.iter().find(|e| !self.elements.contains(*e)) {
            return Err(AlgebraError::EncodingMismatch(format!(
                "{extra:?} is not partitioned"
            )));
        }

        Ok(self
            .blocks
            .iter()
            .sorted_by_key(|block| block.iter().map(|e| positions[e]).min())
            .collect())
    }

    /// Encodes `self` as a restricted growth string relative to `order`, which has to list
    /// every element of `self` exactly once. Otherwise [`AlgebraError::EncodingMismatch`] is
    /// returned.
    ///
    /// # Example
    /// ```
    /// use automata_algebra::prelude::*;
    ///
    /// let p = Partition::new([vec!['b', 'd'], vec!['a'], vec!['c']]).unwrap();
    /// let rgs = p.to_rgs(&['a', 'b', 'c', 'd']).unwrap();
    /// assert_eq!(rgs.to_string(), "0 1 2 1");
    /// assert_eq!(Partition::from_rgs(&rgs, &['a', 'b', 'c', 'd']).unwrap(), p);
    /// ```
    pub fn to_rgs(&self, order: &[E]) -> Result<Rgs> {
        let blocks = self.ordered_blocks(order)?;
        let index: Map<&E, usize> = blocks
            .iter()
            .enumerate()
            .flat_map(|(i, block)| block.iter().map(move |e| (e, i)))
            .collect();
        Ok(Rgs(order.iter().map(|e| index[e]).collect()))
    }

    /// Encodes `self` relative to an order given by element positions, which must cover
    /// precisely the elements of `self` with positions `0..n`.
    pub(crate) fn encode_with(&self, positions: &Map<&E, usize>) -> Rgs {
        let mut indices = vec![0; positions.len()];
        let blocks = self
            .blocks
            .iter()
            .map(|block| block.iter().map(|e| positions[e]).collect::<Vec<_>>())
            .sorted_by_key(|members| members.iter().min().copied());
        for (i, members) in blocks.enumerate() {
            for position in members {
                indices[position] = i;
            }
        }
        Rgs(indices)
    }

    /// Decodes a partition from the given block indices relative to `order`. The indices do not
    /// have to satisfy the restricted growth condition, elements with equal indices are simply
    /// put into the same block. Fails with [`AlgebraError::EncodingMismatch`] if the lengths
    /// differ or `order` contains duplicates.
    pub fn from_rgs(rgs: &Rgs, order: &[E]) -> Result<Self> {
        if rgs.len() != order.len() {
            return Err(AlgebraError::EncodingMismatch(format!(
                "encoding has length {} but order has length {}",
                rgs.len(),
                order.len()
            )));
        }
        positions(order)?;
        Ok(Self::from_labelled(
            rgs.as_slice().iter().copied().zip(order.iter().cloned()),
        ))
    }

    /// Parses the textual form of a restricted growth string and decodes it relative to
    /// `order`, see [`Partition::from_rgs`].
    pub fn from_rgs_str(rgs: &str, order: &[E]) -> Result<Self> {
        Self::from_rgs(&rgs.parse()?, order)
    }
}
