use tracing::trace;

use super::Machine;
use crate::{math::OrderedSet, partition::domain_mismatch, Element, Partition, Result};

impl<S: Element, I: Element, O: Element> Machine<S, I, O> {
    /// Ensures that `p` is a partition of the states of `self`.
    fn check_states(&self, p: &Partition<S>) -> Result<()> {
        let states: OrderedSet<S> = self.delta.keys().cloned().collect();
        domain_mismatch(p.elements(), &states)
    }

    /// The image of `block` under `input`, i.e. the set of all successors of states in
    /// `block` on `input`. Unknown states are ignored.
    pub fn delta_block(&self, block: &OrderedSet<S>, input: &I) -> OrderedSet<S> {
        block
            .iter()
            .filter_map(|s| self.successor(s, input))
            .cloned()
            .collect()
    }

    /// Collects the images of all blocks of `p` under all inputs.
    pub fn delta_blocks(&self, p: &Partition<S>) -> Result<OrderedSet<OrderedSet<S>>> {
        self.check_states(p)?;
        Ok(self.images(p))
    }

    pub(super) fn images(&self, p: &Partition<S>) -> OrderedSet<OrderedSet<S>> {
        p.blocks()
            .flat_map(|block| self.inputs.iter().map(|x| self.delta_block(block, x)))
            .collect()
    }

    /// The smallest partition of the states in which all of `block` lies in one block, all
    /// other states are singletons.
    pub fn min_containing(&self, block: &OrderedSet<S>) -> Partition<S> {
        Partition::min_join(
            block.iter().filter(|s| self.delta.contains_key(*s)).cloned(),
            self.states.iter().cloned(),
        )
    }

    /// The `m` operator of the partition pair algebra. It maps `p` to the smallest partition
    /// `m(p)` such that `(p, m(p))` is a partition pair, meaning states in one block of `p`
    /// move to states in one block of `m(p)` under every input. The blocks of `m(p)` arise by
    /// merging overlapping images of blocks of `p`.
    pub fn m(&self, p: &Partition<S>) -> Result<Partition<S>> {
        self.check_states(p)?;
        Ok(self.m_unchecked(p))
    }

    pub(super) fn m_unchecked(&self, p: &Partition<S>) -> Partition<S> {
        self.images(p)
            .iter()
            .filter(|image| image.len() > 1)
            .fold(self.zero_partition(), |acc, image| {
                acc.join_unchecked(&self.min_containing(image))
            })
    }

    /// Checks whether `p` has the substitution property, that is whether `m(p) <= p`. For
    /// such partitions, the block that is reached from a block on some input only depends on
    /// the block and the input.
    pub fn is_sp(&self, p: &Partition<S>) -> Result<bool> {
        self.check_states(p)?;
        Ok(self.is_sp_unchecked(p))
    }

    pub(super) fn is_sp_unchecked(&self, p: &Partition<S>) -> bool {
        self.m_unchecked(p).refines_unchecked(p)
    }

    /// Iterates [`Machine::m`] starting from `p` and returns all visited partitions. The
    /// iteration stops as soon as a partition is produced that has been visited before, this
    /// repeated partition is the last element of the returned sequence.
    pub fn m_trajectory(&self, p: &Partition<S>) -> Result<Vec<Partition<S>>> {
        self.check_states(p)?;
        let mut trajectory = vec![p.clone()];
        loop {
            let next = self.m_unchecked(trajectory.last().unwrap_or(p));
            let repeated = trajectory.contains(&next);
            trajectory.push(next);
            if repeated {
                trace!("m trajectory closed after {} steps", trajectory.len() - 1);
                return Ok(trajectory);
            }
        }
    }

    /// Computes `p * m(p)`, the meet of `p` with its image under the `m` operator.
    pub fn a(&self, p: &Partition<S>) -> Result<Partition<S>> {
        self.check_states(p)?;
        Ok(p.meet_unchecked(&self.m_unchecked(p)))
    }

    /// Applies [`Machine::a`] `n` times, starting from `p`.
    pub fn a_trajectory(&self, p: &Partition<S>, n: usize) -> Result<Partition<S>> {
        self.check_states(p)?;
        Ok((0..n).fold(p.clone(), |acc, _| {
            acc.meet_unchecked(&self.m_unchecked(&acc))
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        machine::{tests::toggle, Machine},
        math::OrderedSet,
        AlgebraError, Partition,
    };

    /// A shift register remembering the last two bits: state `xy` moves to `yb` on input `b`.
    fn shift_register() -> Machine<&'static str, char> {
        Machine::builder()
            .with_transitions([
                ("00", '0', "00"),
                ("00", '1', "01"),
                ("01", '0', "10"),
                ("01", '1', "11"),
                ("10", '0', "00"),
                ("10", '1', "01"),
                ("11", '0', "10"),
                ("11", '1', "11"),
            ])
            .build()
            .unwrap()
    }

    fn p(blocks: &[&[&'static str]]) -> Partition<&'static str> {
        Partition::new(blocks.iter().map(|b| b.iter().copied())).unwrap()
    }

    #[test]
    fn images_of_blocks() {
        let m = shift_register();
        let block = OrderedSet::from(["00", "10"]);
        assert_eq!(m.delta_block(&block, &'1'), OrderedSet::from(["01"]));
        assert_eq!(m.delta_block(&block, &'0'), OrderedSet::from(["00"]));

        let images = m.delta_blocks(&p(&[&["00", "01"], &["10", "11"]])).unwrap();
        assert!(images.contains(&OrderedSet::from(["00", "10"])));
        assert!(images.contains(&OrderedSet::from(["01", "11"])));
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn m_merges_overlapping_images() {
        let m = shift_register();
        // remembering the last bit is a partition with substitution property
        let last_bit = p(&[&["00", "10"], &["01", "11"]]);
        assert_eq!(m.m(&last_bit).unwrap(), m.zero_partition());
        assert!(m.is_sp(&last_bit).unwrap());

        // the first bit is of no use for predicting anything
        let first_bit = p(&[&["00", "01"], &["10", "11"]]);
        assert_eq!(m.m(&first_bit).unwrap(), p(&[&["00", "10"], &["01", "11"]]));
        assert!(!m.is_sp(&first_bit).unwrap());

        assert_eq!(m.m(&m.identity_partition()).unwrap(), last_bit);
        assert_eq!(m.m(&m.zero_partition()).unwrap(), m.zero_partition());
    }

    #[test]
    fn extremes_have_substitution_property() {
        let m = shift_register();
        assert!(m.is_sp(&m.zero_partition()).unwrap());
        assert!(m.is_sp(&m.identity_partition()).unwrap());
    }

    #[test]
    fn trajectory_ends_with_repetition() {
        let m = shift_register();
        let first_bit = p(&[&["00", "01"], &["10", "11"]]);
        let trajectory = m.m_trajectory(&first_bit).unwrap();
        let last = trajectory.last().unwrap();
        assert!(trajectory[..trajectory.len() - 1].contains(last));
        assert_eq!(
            trajectory,
            vec![
                first_bit,
                p(&[&["00", "10"], &["01", "11"]]),
                m.zero_partition(),
                m.zero_partition()
            ]
        );
    }

    #[test]
    fn a_operator() {
        let m = shift_register();
        let first_bit = p(&[&["00", "01"], &["10", "11"]]);
        assert_eq!(m.a(&first_bit).unwrap(), m.zero_partition());
        assert_eq!(m.a_trajectory(&first_bit, 0).unwrap(), first_bit);
        assert_eq!(m.a_trajectory(&first_bit, 3).unwrap(), m.zero_partition());
    }

    #[test]
    fn min_containing_forces_block() {
        let m = shift_register();
        assert_eq!(
            m.min_containing(&OrderedSet::from(["01", "11"])),
            p(&[&["00"], &["01", "11"], &["10"]])
        );
    }

    #[test]
    fn foreign_partitions_are_rejected() {
        let m = toggle();
        let foreign = Partition::identity(['A', 'C']);
        assert_eq!(
            m.m(&foreign),
            Err(AlgebraError::DomainMismatch {
                element: "'B'".to_string()
            })
        );
        assert!(m.is_sp(&foreign).is_err());
        assert!(m.m_trajectory(&foreign).is_err());
        assert!(m.delta_blocks(&Partition::identity(['A'])).is_err());
    }
}
