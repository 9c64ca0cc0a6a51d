use super::{Machine, Table};
use crate::{Element, Result, Void};

/// Helper struct for the construction of [`Machine`]s. It stores a list of transitions and,
/// if the machine should produce outputs, a list of outputs on transitions and/or a list of
/// outputs of states. The latter are expanded to every input when the machine is built, which
/// gives a Moore machine.
///
/// # Example
///
/// We want to create a machine with two states `'p'` and `'q'` over the inputs `0` and `1`,
/// where input `1` toggles between the two states. State `'p'` should emit `false` and state
/// `'q'` should emit `true`.
/// ```
/// use automata_algebra::prelude::*;
///
/// let m = Machine::builder()
///     .with_transitions([('p', 0, 'p'), ('p', 1, 'q'), ('q', 0, 'q'), ('q', 1, 'p')])
///     .with_state_outputs([('p', false), ('q', true)])
///     .build()
///     .unwrap();
/// assert_eq!(m.output(&'q', &0), Some(&true));
/// ```
#[derive(Debug, Clone)]
pub struct MachineBuilder<S, I, O = Void> {
    transitions: Vec<(S, I, S)>,
    outputs: Vec<(S, I, O)>,
    state_outputs: Vec<(S, O)>,
    has_outputs: bool,
}

impl<S: Element, I: Element> MachineBuilder<S, I, Void> {
    /// Creates an empty instance of `Self`, for a machine that has no output function.
    pub fn without_outputs() -> Self {
        Self {
            transitions: vec![],
            outputs: vec![],
            state_outputs: vec![],
            has_outputs: false,
        }
    }

    /// Turns `self` into a builder for a machine with output function and adds the given
    /// outputs, each of which is a triple of state, input and output.
    pub fn with_outputs<O, X>(self, outputs: X) -> MachineBuilder<S, I, O>
    where
        O: Element,
        X: IntoIterator<Item = (S, I, O)>,
    {
        MachineBuilder {
            transitions: self.transitions,
            outputs: outputs.into_iter().collect(),
            state_outputs: vec![],
            has_outputs: true,
        }
    }

    /// Turns `self` into a builder for a machine with output function, where the given states
    /// emit the given output on every input.
    pub fn with_state_outputs<O, X>(self, outputs: X) -> MachineBuilder<S, I, O>
    where
        O: Element,
        X: IntoIterator<Item = (S, O)>,
    {
        MachineBuilder {
            transitions: self.transitions,
            outputs: vec![],
            state_outputs: outputs.into_iter().collect(),
            has_outputs: true,
        }
    }
}

impl<S: Element, I: Element> Default for MachineBuilder<S, I, Void> {
    fn default() -> Self {
        Self::without_outputs()
    }
}

impl<S: Element, I: Element, O: Element> MachineBuilder<S, I, O> {
    /// Adds a list of transitions, each of which is a triple of source, input and target. If
    /// the same source and input appear more than once, the last transition wins.
    pub fn with_transitions<X: IntoIterator<Item = (S, I, S)>>(mut self, transitions: X) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Adds a single output on the transition from `state` on `input`.
    pub fn output(mut self, state: S, input: I, output: O) -> Self {
        self.has_outputs = true;
        self.outputs.push((state, input, output));
        self
    }

    /// Makes `state` emit `output` on every input.
    pub fn state_output(mut self, state: S, output: O) -> Self {
        self.has_outputs = true;
        self.state_outputs.push((state, output));
        self
    }

    /// Builds the [`Machine`], fails if the transitions or outputs do not give total functions,
    /// see [`Machine::from_tables`].
    pub fn build(self) -> Result<Machine<S, I, O>> {
        let mut delta: Table<S, I, S> = Table::new();
        for (source, input, target) in self.transitions {
            delta.entry(source).or_default().insert(input, target);
        }

        let omega = if self.has_outputs {
            let inputs: Vec<I> = delta
                .values()
                .flat_map(|row| row.keys().cloned())
                .collect();
            let mut omega: Table<S, I, O> = Table::new();
            for (state, output) in self.state_outputs {
                let row = omega.entry(state).or_default();
                for input in &inputs {
                    row.insert(input.clone(), output.clone());
                }
            }
            for (state, input, output) in self.outputs {
                omega.entry(state).or_default().insert(input, output);
            }
            Some(omega)
        } else {
            None
        };

        Machine::from_tables(delta, omega)
    }
}
