use itertools::Itertools;
use tracing::trace;

use super::Machine;
use crate::{math::OrderedMap, Element};

impl<S: Element, I: Element, O: Element> Machine<S, I, O> {
    /// Computes the transformations of the state set that are induced by input words. Each
    /// word `w` of length between `1` and `|S| - 1` gives the column that lists for every state
    /// (in the order of [`Machine::states`]) the state reached by reading `w`. Words inducing
    /// the same column are grouped together, so the keys of the returned map are the elements
    /// of the transformation semigroup that are reachable by such words.
    ///
    /// The number of words grows exponentially in the number of states, so this is only
    /// useful for small machines.
    pub fn transformation_semigroup(&self) -> OrderedMap<Vec<S>, Vec<Vec<I>>> {
        let mut columns: OrderedMap<Vec<S>, Vec<Vec<I>>> = OrderedMap::new();
        for length in 1..self.size() {
            let words = (0..length)
                .map(|_| self.inputs.iter().cloned())
                .multi_cartesian_product();
            for word in words {
                let column = self
                    .states
                    .iter()
                    .map(|s| {
                        word.iter()
                            .fold(s, |state, input| self.step(state, input))
                            .clone()
                    })
                    .collect();
                columns.entry(column).or_default().push(word);
            }
            trace!(
                "{} transformations after words of length {length}",
                columns.len()
            );
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use crate::machine::{tests::toggle, Machine};

    #[test_log::test]
    fn toggle_transformations() {
        let semigroup = toggle().transformation_semigroup();
        assert_eq!(semigroup.len(), 2);
        assert_eq!(semigroup[&vec!['A', 'B']], vec![vec![0]]);
        assert_eq!(semigroup[&vec!['B', 'A']], vec![vec![1]]);
    }

    #[test]
    fn reset_and_shift() {
        let m = Machine::builder()
            .with_transitions([
                (0, 's', 1),
                (1, 's', 2),
                (2, 's', 0),
                (0, 'r', 0),
                (1, 'r', 0),
                (2, 'r', 0),
            ])
            .build()
            .unwrap();
        let semigroup = m.transformation_semigroup();

        // words of length one and two
        assert_eq!(semigroup.values().map(Vec::len).sum::<usize>(), 2 + 4);
        assert_eq!(semigroup[&vec![1, 2, 0]], vec![vec!['s']]);
        assert_eq!(semigroup[&vec![2, 0, 1]], vec![vec!['s', 's']]);
        assert_eq!(
            semigroup[&vec![0, 0, 0]],
            vec![vec!['r'], vec!['r', 'r'], vec!['s', 'r']]
        );
        assert_eq!(semigroup[&vec![1, 1, 1]], vec![vec!['r', 's']]);
        assert_eq!(semigroup.len(), 4);
    }

    #[test]
    fn single_state_has_no_words() {
        let m = Machine::<u8, u8>::builder()
            .with_transitions([(0, 0, 0)])
            .build()
            .unwrap();
        assert!(m.transformation_semigroup().is_empty());
    }
}
