use super::Partition;
use crate::{
    math::{self, OrderedSet},
    Element,
};

impl<E: Element> Partition<E> {
    /// Draws a partition of `elements` uniformly at random, see [`Partition::random_with`].
    pub fn random<X: IntoIterator<Item = E>>(elements: X) -> Self {
        Self::random_with(&mut fastrand::Rng::new(), elements)
    }

    /// Draws a partition of `elements` uniformly at random using the given source of
    /// randomness. Every set partition is equally likely. The sampling works in two steps:
    /// 1. Repeatedly pick the size `k` of the block containing the last of the `m` remaining
    ///    elements. In a uniformly random partition of `m` elements, this block has size `k`
    ///    with probability `binomial(m - 1, k - 1) * B(m - k) / B(m)`, where `B` denotes the
    ///    Bell numbers. The probabilities are evaluated in log space, as `B(m)` overflows `f64`
    ///    for a few hundred elements. This yields a sequence of block labels.
    /// 2. Shuffle the labels uniformly and hand them out to the elements.
    pub fn random_with<X: IntoIterator<Item = E>>(rng: &mut fastrand::Rng, elements: X) -> Self {
        let elements: Vec<E> = elements
            .into_iter()
            .collect::<OrderedSet<_>>()
            .into_iter()
            .collect();
        let n = elements.len();
        let ln_fact = math::ln_factorials(n);
        let ln_bell = math::ln_bell_numbers(n);

        let mut labels = vec![0usize; n];
        let mut remaining = n;
        let mut label = 0;
        while remaining > 0 {
            let rho = rng.f64();
            let mut total = 0.0;
            let mut k = 1;
            while k < remaining {
                let m = remaining - 1;
                let ln_binomial = ln_fact[m] - ln_fact[k - 1] - ln_fact[m - (k - 1)];
                total += (ln_binomial + ln_bell[remaining - k] - ln_bell[remaining]).exp();
                if total >= rho {
                    break;
                }
                k += 1;
            }
            labels[remaining - k..remaining]
                .iter_mut()
                .for_each(|l| *l = label);
            label += 1;
            remaining -= k;
        }

        rng.shuffle(&mut labels);
        Self::from_labelled(labels.into_iter().zip(elements))
    }
}

#[cfg(test)]
mod tests {
    use crate::{math::Map, Partition};

    #[test]
    fn covers_all_elements() {
        let mut rng = fastrand::Rng::with_seed(3);
        for n in 0..12u32 {
            let p = Partition::random_with(&mut rng, 0..n);
            assert_eq!(p.elements().len(), n as usize);
            assert_eq!(p.blocks().map(|b| b.len()).sum::<usize>(), n as usize);
        }
        assert_eq!(Partition::random("ab".chars()).elements().len(), 2);
    }

    #[test]
    fn uniform_over_small_universe() {
        let mut rng = fastrand::Rng::with_seed(42);
        let samples = 20_000;
        let mut counts: Map<Partition<char>, usize> = Map::default();
        for _ in 0..samples {
            *counts
                .entry(Partition::random_with(&mut rng, "abc".chars()))
                .or_default() += 1;
        }

        // five partitions, each expected 4000 times with a standard deviation of about 57
        assert_eq!(counts.len(), 5);
        for (p, count) in counts {
            assert!((3600..4400).contains(&count), "{p:?} drawn {count} times");
        }
    }

    #[test]
    fn uniform_block_counts() {
        let mut rng = fastrand::Rng::with_seed(7);
        let samples = 15_000;
        let mut by_size = [0usize; 5];
        for _ in 0..samples {
            by_size[Partition::random_with(&mut rng, 0..4u8).size()] += 1;
        }
        // Stirling numbers S(4, k) = 1, 7, 6, 1 out of 15
        for (k, expected) in [(1, 1000), (2, 7000), (3, 6000), (4, 1000)] {
            let deviation = by_size[k].abs_diff(expected);
            assert!(deviation < 400, "{k} blocks drawn {} times", by_size[k]);
        }
    }

    #[test]
    fn large_universes_have_many_blocks() {
        let mut rng = fastrand::Rng::with_seed(9);
        for _ in 0..20 {
            let p = Partition::random_with(&mut rng, 0..250u32);
            assert_eq!(p.elements().len(), 250);
            // a uniform partition of 250 elements has about 60 blocks
            assert!(p.size() > 20, "only {} blocks", p.size());
        }
    }
}
