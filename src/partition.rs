use std::fmt::{Debug, Display};

use itertools::Itertools;

use crate::{
    math::{Map, OrderedSet},
    AlgebraError, Element, Result,
};

mod enumerate;
pub use enumerate::Partitions;

mod rgs;
pub use rgs::Rgs;

#[cfg(feature = "random")]
mod random;

/// A partition of a finite universe of elements of type `E` into non-empty, pairwise disjoint
/// blocks. Partitions are values: all operations leave `self` untouched and produce a new
/// partition.
///
/// Both the universe and the blocks are stored as ordered sets, which means equality and
/// hashing only depend on the block structure and not on the order in which blocks or their
/// elements were supplied.
///
/// Partitions of a fixed universe form a lattice. Its least element is the [`Partition::zero`]
/// partition consisting only of singleton blocks, its greatest element is the
/// [`Partition::identity`] partition with a single block. Binary operations between partitions
/// of different universes are undefined and return [`AlgebraError::DomainMismatch`].
///
/// # Example
/// ```
/// use automata_algebra::prelude::*;
///
/// let p = Partition::new([vec!['a', 'b'], vec!['c'], vec!['d']]).unwrap();
/// let q = Partition::new([vec!['a'], vec!['b', 'c'], vec!['d']]).unwrap();
///
/// let join = p.join(&q).unwrap();
/// assert_eq!(join, Partition::new([vec!['a', 'b', 'c'], vec!['d']]).unwrap());
/// assert!(p.refines(&join).unwrap());
/// assert_eq!(p.meet(&q).unwrap(), Partition::zero("abcd".chars()));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Partition<E: Element> {
    elements: OrderedSet<E>,
    blocks: OrderedSet<OrderedSet<E>>,
}

impl<E: Element> Partition<E> {
    /// Builds a partition from the given blocks. Empty blocks are ignored. If some element
    /// appears in more than one block, an [`AlgebraError::OverlappingBlocks`] is returned.
    pub fn new<X, Y>(blocks: Y) -> Result<Self>
    where
        X: IntoIterator<Item = E>,
        Y: IntoIterator<Item = X>,
    {
        let mut elements = OrderedSet::new();
        let mut collected = OrderedSet::new();
        for block in blocks {
            let block: OrderedSet<E> = block.into_iter().collect();
            for e in &block {
                if !elements.insert(e.clone()) {
                    return Err(AlgebraError::OverlappingBlocks(format!("{e:?}")));
                }
            }
            if !block.is_empty() {
                collected.insert(block);
            }
        }
        Ok(Self {
            elements,
            blocks: collected,
        })
    }

    /// Builds a partition from blocks that are known to be disjoint and non-empty.
    fn from_disjoint_blocks(blocks: OrderedSet<OrderedSet<E>>) -> Self {
        debug_assert!(blocks.iter().all(|b| !b.is_empty()));
        let elements: OrderedSet<E> = blocks.iter().flatten().cloned().collect();
        debug_assert_eq!(elements.len(), blocks.iter().map(|b| b.len()).sum::<usize>());
        Self { elements, blocks }
    }

    /// Groups elements by their label, elements with the same label end up in the same block.
    pub(crate) fn from_labelled<L, I>(labelled: I) -> Self
    where
        L: Eq + std::hash::Hash,
        I: IntoIterator<Item = (L, E)>,
    {
        let mut groups: Map<L, OrderedSet<E>> = Map::default();
        for (label, e) in labelled {
            groups.entry(label).or_default().insert(e);
        }
        Self::from_disjoint_blocks(groups.into_values().collect())
    }

    /// Returns a reference to the set of elements that is partitioned.
    pub fn elements(&self) -> &OrderedSet<E> {
        &self.elements
    }

    /// Returns an iterator over the blocks of the partition. Blocks are yielded in the order
    /// that is given by [`Ord`] on the sets, which is deterministic but not necessarily
    /// meaningful. For an order relative to a given sequence of elements, use
    /// [`Partition::ordered_blocks`].
    pub fn blocks(&self) -> impl Iterator<Item = &OrderedSet<E>> + '_ {
        self.blocks.iter()
    }

    /// Returns the number of blocks.
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if every block is a singleton, i.e. if `self` is the least element of
    /// the lattice.
    pub fn is_zero(&self) -> bool {
        self.blocks.len() == self.elements.len()
    }

    /// Returns `true` if there is at most one block, i.e. if `self` is the greatest element of
    /// the lattice.
    pub fn is_identity(&self) -> bool {
        self.blocks.len() <= 1
    }

    /// Returns the unique block containing `element`, or `None` if `element` is not
    /// partitioned by `self`.
    pub fn block_containing(&self, element: &E) -> Option<&OrderedSet<E>> {
        self.blocks.iter().find(|block| block.contains(element))
    }

    /// Returns `true` if both elements lie in the same block.
    pub fn same_block(&self, left: &E, right: &E) -> bool {
        self.block_containing(left)
            .map(|block| block.contains(right))
            .unwrap_or(false)
    }

    fn check_domain(&self, other: &Self) -> Result<()> {
        domain_mismatch(&self.elements, &other.elements)
    }

    /// Computes the join (least upper bound) of `self` and `other`. Two elements are in the
    /// same block of the join if they are connected by a chain of elements, where each step
    /// stays inside a block of `self` or inside a block of `other`.
    ///
    /// Every block of the result is obtained as a fixed point. Starting from a block of `self`,
    /// we keep absorbing all blocks of either operand that intersect the candidate until it no
    /// longer grows.
    pub fn join(&self, other: &Self) -> Result<Self> {
        self.check_domain(other)?;
        Ok(self.join_unchecked(other))
    }

    /// Join for operands that are known to share their universe.
    pub(crate) fn join_unchecked(&self, other: &Self) -> Self {
        let mut covered = OrderedSet::new();
        let mut blocks = OrderedSet::new();
        for block in &self.blocks {
            if block.iter().any(|e| covered.contains(e)) {
                continue;
            }
            let mut candidate = block.clone();
            loop {
                let before = candidate.len();
                for absorbed in self.blocks.iter().chain(other.blocks.iter()) {
                    if !absorbed.is_disjoint(&candidate) {
                        candidate.extend(absorbed.iter().cloned());
                    }
                }
                if candidate.len() == before {
                    break;
                }
            }
            covered.extend(candidate.iter().cloned());
            blocks.insert(candidate);
        }
        Self::from_disjoint_blocks(blocks)
    }

    /// Computes the meet (greatest lower bound) of `self` and `other`. Each element is put
    /// into the intersection of its block in `self` and its block in `other`.
    pub fn meet(&self, other: &Self) -> Result<Self> {
        self.check_domain(other)?;
        Ok(self.meet_unchecked(other))
    }

    /// Meet for operands that are known to share their universe.
    pub(crate) fn meet_unchecked(&self, other: &Self) -> Self {
        let blocks = self
            .blocks
            .iter()
            .cartesian_product(other.blocks.iter())
            .map(|(left, right)| left.intersection(right).cloned().collect::<OrderedSet<_>>())
            .filter(|block| !block.is_empty())
            .collect();
        Self::from_disjoint_blocks(blocks)
    }

    /// Returns `true` if `self` refines `other`, meaning each block of `self` is contained in
    /// some block of `other`. This is the lattice order `self <= other`, which holds precisely
    /// if the meet of both is `self`.
    pub fn refines(&self, other: &Self) -> Result<bool> {
        self.check_domain(other)?;
        Ok(self.refines_unchecked(other))
    }

    pub(crate) fn refines_unchecked(&self, other: &Self) -> bool {
        self.meet_unchecked(other) == *self
    }

    /// Returns `true` if `self` is coarser than or equal to `other`, i.e. `other <= self`.
    pub fn coarsens(&self, other: &Self) -> Result<bool> {
        other.refines(self)
    }

    /// Returns `true` if `self` refines `other` and the two are not equal.
    pub fn strictly_refines(&self, other: &Self) -> Result<bool> {
        Ok(self != other && self.refines(other)?)
    }

    /// Returns `true` if `self` coarsens `other` and the two are not equal.
    pub fn strictly_coarsens(&self, other: &Self) -> Result<bool> {
        other.strictly_refines(self)
    }

    /// Swaps the two extremes of the lattice. The zero partition is mapped to the identity
    /// partition over the same elements, every other partition is mapped to the zero partition.
    /// This is not a lattice complement, it is only an involution on the two extremes.
    pub fn complement(&self) -> Self {
        if self.is_zero() {
            Self::identity(self.elements.iter().cloned())
        } else {
            Self::zero(self.elements.iter().cloned())
        }
    }

    /// Computing the quotient of two partitions is not supported.
    pub fn quotient(&self, _other: &Self) -> Result<Self> {
        Err(AlgebraError::Unsupported("partition quotient"))
    }

    /// The smallest partition that contains `block` as a block: every element of `elements`
    /// that is not in `block` is put into a singleton. Members of `block` that are not in
    /// `elements` still become part of the universe of the result.
    pub fn min_join<B, X>(block: B, elements: X) -> Self
    where
        B: IntoIterator<Item = E>,
        X: IntoIterator<Item = E>,
    {
        let block: OrderedSet<E> = block.into_iter().collect();
        let mut blocks: OrderedSet<OrderedSet<E>> = elements
            .into_iter()
            .filter(|e| !block.contains(e))
            .map(|e| OrderedSet::from([e]))
            .collect();
        if !block.is_empty() {
            blocks.insert(block);
        }
        Self::from_disjoint_blocks(blocks)
    }

    /// The largest partition in which `block` is a block, it consists of `block` and its
    /// complement in `elements` (if that is non-empty).
    pub fn max_split<B, X>(block: B, elements: X) -> Self
    where
        B: IntoIterator<Item = E>,
        X: IntoIterator<Item = E>,
    {
        let block: OrderedSet<E> = block.into_iter().collect();
        let rest: OrderedSet<E> = elements
            .into_iter()
            .filter(|e| !block.contains(e))
            .collect();
        Self::from_disjoint_blocks(
            [block, rest]
                .into_iter()
                .filter(|b| !b.is_empty())
                .collect(),
        )
    }

    /// The greatest element of the lattice of partitions of `elements`, which has a single
    /// block (or no block at all if `elements` is empty).
    pub fn identity<X: IntoIterator<Item = E>>(elements: X) -> Self {
        let block: OrderedSet<E> = elements.into_iter().collect();
        if block.is_empty() {
            return Self::from_disjoint_blocks(OrderedSet::new());
        }
        Self::from_disjoint_blocks(OrderedSet::from([block]))
    }

    /// The least element of the lattice of partitions of `elements`, in which every element
    /// forms its own block.
    pub fn zero<X: IntoIterator<Item = E>>(elements: X) -> Self {
        Self::from_disjoint_blocks(
            elements
                .into_iter()
                .map(|e| OrderedSet::from([e]))
                .collect(),
        )
    }

    /// Joins all given partitions, returns `None` if there are none.
    pub fn sum<'a, I>(partitions: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = &'a Self>,
        E: 'a,
    {
        let mut it = partitions.into_iter();
        let Some(first) = it.next() else {
            return Ok(None);
        };
        it.try_fold(first.clone(), |acc, p| acc.join(p)).map(Some)
    }

    /// Takes the meet of all given partitions, returns `None` if there are none.
    pub fn product<'a, I>(partitions: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = &'a Self>,
        E: 'a,
    {
        let mut it = partitions.into_iter();
        let Some(first) = it.next() else {
            return Ok(None);
        };
        it.try_fold(first.clone(), |acc, p| acc.meet(p)).map(Some)
    }
}

/// Fails with [`AlgebraError::DomainMismatch`], naming an element that is contained in only
/// one of the two sets, if they differ.
pub(crate) fn domain_mismatch<E: Element>(
    left: &OrderedSet<E>,
    right: &OrderedSet<E>,
) -> Result<()> {
    match left.symmetric_difference(right).next() {
        Some(element) => Err(AlgebraError::DomainMismatch {
            element: format!("{element:?}"),
        }),
        None => Ok(()),
    }
}

impl<E: Element> std::ops::Not for &Partition<E> {
    type Output = Partition<E>;
    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl<E: Element> std::ops::Not for Partition<E> {
    type Output = Partition<E>;
    fn not(self) -> Self::Output {
        self.complement()
    }
}

/// The lattice order. Partitions over different universes, as well as partitions that are
/// not comparable, give `None`.
impl<E: Element> PartialOrd for Partition<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self.refines(other).ok()?, other.refines(self).ok()?) {
            (true, _) => Some(Ordering::Less),
            (_, true) => Some(Ordering::Greater),
            _ => None,
        }
    }
}

impl<E: Element> Debug for Partition<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ {} }}",
            self.blocks
                .iter()
                .map(|b| format!("{{{}}}", b.iter().map(|e| format!("{e:?}")).join(", ")))
                .join(", ")
        )
    }
}

impl<E: Element + Display> Display for Partition<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ {} }}",
            self.blocks
                .iter()
                .map(|b| format!("{{{}}}", b.iter().join(", ")))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;
    use crate::AlgebraError;

    fn p(blocks: &[&str]) -> Partition<char> {
        Partition::new(blocks.iter().map(|b| b.chars())).unwrap()
    }

    #[test]
    fn construction() {
        let partition = p(&["ab", "c", ""]);
        assert_eq!(partition.size(), 2);
        assert_eq!(partition.elements().len(), 3);
        assert_eq!(
            Partition::new([vec![1, 2], vec![2, 3]]),
            Err(AlgebraError::OverlappingBlocks("2".to_string()))
        );
        assert_eq!(p(&["ba", "c"]), p(&["c", "ab"]));
    }

    #[test]
    fn blocks_and_membership() {
        let partition = p(&["ab", "cd", "e"]);
        assert_eq!(
            partition.block_containing(&'d').map(|b| b.iter().collect::<String>()),
            Some("cd".to_string())
        );
        assert_eq!(partition.block_containing(&'z'), None);
        assert!(partition.same_block(&'a', &'b'));
        assert!(!partition.same_block(&'a', &'e'));
    }

    #[test]
    fn join_chains_blocks() {
        let left = p(&["ab", "cd", "ef", "g"]);
        let right = p(&["a", "bc", "d", "eg", "f"]);
        assert_eq!(left.join(&right).unwrap(), p(&["abcd", "efg"]));
        assert_eq!(right.join(&left).unwrap(), p(&["abcd", "efg"]));
    }

    #[test]
    fn meet_intersects_per_element() {
        let left = p(&["abc", "def"]);
        let right = p(&["ad", "be", "cf"]);
        assert_eq!(left.meet(&right).unwrap(), Partition::zero("abcdef".chars()));

        let left = p(&["abcd", "ef"]);
        let right = p(&["ab", "cdef"]);
        assert_eq!(left.meet(&right).unwrap(), p(&["ab", "cd", "ef"]));
    }

    #[test]
    fn domain_mismatch() {
        let left = p(&["ab", "c"]);
        let right = p(&["ab", "d"]);
        // same number of elements, the error names the first one that is not shared
        assert_eq!(
            left.join(&right),
            Err(AlgebraError::DomainMismatch {
                element: "'c'".to_string()
            })
        );
        assert_eq!(
            left.join(&right).unwrap_err().to_string(),
            "partitions are defined over different universes, 'c' occurs in only one of them"
        );
        assert!(matches!(
            left.meet(&right),
            Err(AlgebraError::DomainMismatch { .. })
        ));
        assert!(left.refines(&right).is_err());
        assert_eq!(left.partial_cmp(&right), None);
    }

    #[test]
    fn ordering() {
        let fine = p(&["ab", "c", "d"]);
        let coarse = p(&["abc", "d"]);
        let other = p(&["a", "bd", "c"]);
        assert!(fine.refines(&coarse).unwrap());
        assert!(fine.strictly_refines(&coarse).unwrap());
        assert!(coarse.coarsens(&fine).unwrap());
        assert!(coarse.strictly_coarsens(&fine).unwrap());
        assert!(!fine.strictly_refines(&fine).unwrap());
        assert!(fine < coarse);
        assert!(coarse > fine);
        assert!(fine <= fine.clone());
        assert_eq!(fine.partial_cmp(&other), None);
        assert!(!(fine <= other) && !(other <= fine));
    }

    #[test]
    fn extremes() {
        let zero = Partition::zero("abc".chars());
        let identity = Partition::identity("abc".chars());
        assert!(zero.is_zero());
        assert!(identity.is_identity());
        assert_eq!(!&zero, identity);
        assert_eq!(!identity.clone(), zero);
        assert_eq!(!p(&["ab", "c"]), zero);

        let empty = Partition::<char>::identity([]);
        assert_eq!(empty.size(), 0);
        assert_eq!(empty, Partition::zero([]));
    }

    #[test]
    fn min_join_and_max_split() {
        assert_eq!(
            Partition::min_join("bd".chars(), "abcde".chars()),
            p(&["a", "bd", "c", "e"])
        );
        assert_eq!(
            Partition::max_split("bd".chars(), "abcde".chars()),
            p(&["ace", "bd"])
        );
        assert_eq!(
            Partition::max_split("abc".chars(), "abc".chars()),
            p(&["abc"])
        );
        assert_eq!(
            Partition::min_join([], "ab".chars()),
            Partition::zero("ab".chars())
        );
    }

    #[test]
    fn sum_and_product() {
        let parts = [p(&["ab", "c", "d"]), p(&["a", "b", "cd"]), p(&["a", "bc", "d"])];
        assert_eq!(Partition::sum(&parts).unwrap(), Some(p(&["abcd"])));
        assert_eq!(
            Partition::product(&parts).unwrap(),
            Some(Partition::zero("abcd".chars()))
        );
        assert_eq!(Partition::<char>::sum(&[]).unwrap(), None);
    }

    #[test]
    fn quotient_is_unsupported() {
        let partition = p(&["ab"]);
        assert_eq!(
            partition.quotient(&partition),
            Err(AlgebraError::Unsupported("partition quotient"))
        );
    }

    #[test]
    fn lattice_laws() {
        let universe: Vec<char> = "abcd".chars().collect();
        let all: Vec<_> = Partition::list(universe.iter().cloned()).collect();
        let identity = Partition::identity(universe.iter().cloned());
        let zero = Partition::zero(universe.iter().cloned());
        for x in &all {
            assert_eq!(&x.join(x).unwrap(), x);
            assert_eq!(&x.meet(x).unwrap(), x);
            assert_eq!(&x.meet(&identity).unwrap(), x);
            assert_eq!(&x.join(&zero).unwrap(), x);
            for y in &all {
                let join = x.join(y).unwrap();
                let meet = x.meet(y).unwrap();
                assert_eq!(join, y.join(x).unwrap());
                assert_eq!(meet, y.meet(x).unwrap());
                assert!(x.refines(&join).unwrap() && y.refines(&join).unwrap());
                assert!(meet.refines(x).unwrap() && meet.refines(y).unwrap());
                assert_eq!(x.refines(y).unwrap(), &meet == x);
                assert_eq!(x.refines(y).unwrap(), join == *y);
                if x.refines(y).unwrap() && y.refines(x).unwrap() {
                    assert_eq!(x, y);
                }
            }
        }
    }

    #[test]
    fn associativity() {
        let universe = "abcde".chars();
        let all: Vec<_> = Partition::list(universe).step_by(3).collect();
        for x in all.iter().step_by(2) {
            for y in all.iter().step_by(3) {
                for z in all.iter().step_by(5) {
                    assert_eq!(
                        x.join(y).unwrap().join(z).unwrap(),
                        x.join(&y.join(z).unwrap()).unwrap()
                    );
                    assert_eq!(
                        x.meet(y).unwrap().meet(z).unwrap(),
                        x.meet(&y.meet(z).unwrap()).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn formatting() {
        let partition = p(&["ba", "c"]);
        assert_eq!(partition.to_string(), "{ {a, b}, {c} }");
        assert_eq!(format!("{partition:?}"), "{ {'a', 'b'}, {'c'} }");
    }
}
