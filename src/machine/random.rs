use tracing::trace;

use super::{Machine, Table};
use crate::{math::OrderedMap, Element};

/// Determines how outputs are drawn for a random [`Machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Every transition gets its own output.
    #[default]
    Mealy,
    /// Every state gets an output which it emits on all inputs.
    Moore,
}

impl<S: Element, I: Element, O: Element> Machine<S, I, O> {
    /// Draws a random machine, see [`Machine::random_with`].
    pub fn random(states: &[S], inputs: &[I], outputs: &[O], kind: OutputKind) -> Self {
        Self::random_with(&mut fastrand::Rng::new(), states, inputs, outputs, kind)
    }

    /// Draws a random machine over the given states and inputs. Every successor is chosen
    /// uniformly among `states`. If `outputs` is empty, the machine has no output function,
    /// otherwise outputs are chosen uniformly per transition or per state, depending on
    /// `kind`.
    pub fn random_with(
        rng: &mut fastrand::Rng,
        states: &[S],
        inputs: &[I],
        outputs: &[O],
        kind: OutputKind,
    ) -> Self {
        let mut delta: Table<S, I, S> = Table::new();
        let mut omega: Table<S, I, O> = Table::new();
        if states.is_empty() {
            return Self::assemble(delta, None);
        }

        for s in states {
            let state_output = (!outputs.is_empty()).then(|| rng.usize(..outputs.len()));
            let mut transitions = OrderedMap::new();
            let mut produced = OrderedMap::new();
            for x in inputs {
                transitions.insert(x.clone(), states[rng.usize(..states.len())].clone());
                if outputs.is_empty() {
                    continue;
                }
                let o = match (kind, state_output) {
                    (OutputKind::Moore, Some(o)) => o,
                    _ => rng.usize(..outputs.len()),
                };
                produced.insert(x.clone(), outputs[o].clone());
            }
            delta.insert(s.clone(), transitions);
            omega.insert(s.clone(), produced);
        }

        let m = Self::assemble(delta, (!outputs.is_empty()).then_some(omega));
        trace!("drew random {kind:?} machine\n{m}");
        m
    }
}

#[cfg(test)]
mod tests {
    use super::OutputKind;
    use crate::machine::Machine;

    #[test]
    fn mealy_machines_are_total() {
        let mut rng = fastrand::Rng::with_seed(3);
        let m = Machine::random_with(&mut rng, &[1, 2, 3], &['a', 'b'], &["x", "y"], OutputKind::Mealy);
        assert_eq!(m.states(), &[1, 2, 3]);
        assert_eq!(m.inputs(), &['a', 'b']);
        assert!(m.has_outputs());
        for s in m.states() {
            for x in m.inputs() {
                assert!(m.states().contains(m.successor(s, x).unwrap()));
                assert!(m.output(s, x).is_some());
            }
        }
    }

    #[test]
    fn moore_outputs_depend_on_state_only() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..20 {
            let m = Machine::random_with(
                &mut rng,
                &['p', 'q', 'r', 's'],
                &[0, 1, 2],
                &[true, false],
                OutputKind::Moore,
            );
            for s in m.states() {
                assert_eq!(m.output(s, &0), m.output(s, &1));
                assert_eq!(m.output(s, &1), m.output(s, &2));
            }
        }
    }

    #[test]
    fn no_outputs_without_output_alphabet() {
        let m = Machine::<u8, u8, u8>::random(&[0, 1], &[0], &[], OutputKind::default());
        assert!(!m.has_outputs());
        assert_eq!(m.size(), 2);

        let empty = Machine::<u8, u8, u8>::random(&[], &[0], &[], OutputKind::Mealy);
        assert_eq!(empty.size(), 0);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let draw = |seed| {
            Machine::random_with(
                &mut fastrand::Rng::with_seed(seed),
                &[0u8, 1, 2, 3],
                &['a', 'b'],
                &[0u8, 1],
                OutputKind::Mealy,
            )
        };
        assert_eq!(draw(5), draw(5));
    }
}
