use std::fmt::Display;

use itertools::Itertools;

use crate::{
    math::{Map, OrderedMap, OrderedSet},
    AlgebraError, Element, Partition, Result, Void,
};

mod builder;
pub use builder::MachineBuilder;

mod equivalence;

mod pair_algebra;

mod semigroup;

mod sp_lattice;
pub use sp_lattice::SpCache;

#[cfg(feature = "random")]
mod random;
#[cfg(feature = "random")]
pub use random::OutputKind;

/// Type alias for a transition or output table, mapping each state to a row that maps each
/// input to a value.
pub type Table<S, I, V> = OrderedMap<S, OrderedMap<I, V>>;

/// A deterministic finite state transducer with states `S`, inputs `I` and outputs `O`. It
/// is given by a total transition function `delta: S x I -> S` and, optionally, a total
/// output function `omega: S x I -> O` (a Moore machine is simply one where the output does
/// not depend on the input). Machines without output function use [`Void`] as output type.
///
/// The states and inputs are kept in sorted order, see [`Machine::states`] and
/// [`Machine::inputs`]. The order of the states is the one relative to which all partitions
/// of the state set are encoded.
///
/// Machines are immutable once they are built, either through a [`MachineBuilder`] or from
/// explicit tables with [`Machine::from_tables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine<S: Element, I: Element, O: Element = Void> {
    delta: Table<S, I, S>,
    omega: Option<Table<S, I, O>>,
    states: Vec<S>,
    inputs: Vec<I>,
    outputs: OrderedSet<O>,
}

impl<S: Element, I: Element> Machine<S, I, Void> {
    /// Returns a [`MachineBuilder`] for a machine without outputs.
    pub fn builder() -> MachineBuilder<S, I, Void> {
        MachineBuilder::without_outputs()
    }
}

impl<S: Element, I: Element, O: Element> Machine<S, I, O> {
    /// Builds a machine from explicit tables. The states are the keys of `delta`, the inputs
    /// are all inputs that appear in some row of `delta`. Both tables have to be total, i.e.
    /// every state needs an entry for every input, and every successor has to be a state.
    /// Outputs on inputs without transitions are rejected as well.
    pub fn from_tables(delta: Table<S, I, S>, omega: Option<Table<S, I, O>>) -> Result<Self> {
        let inputs: OrderedSet<I> = delta.values().flat_map(|row| row.keys().cloned()).collect();

        for (state, row) in &delta {
            for input in &inputs {
                let Some(successor) = row.get(input) else {
                    return Err(AlgebraError::UndefinedTransition {
                        state: format!("{state:?}"),
                        input: format!("{input:?}"),
                    });
                };
                if !delta.contains_key(successor) {
                    return Err(AlgebraError::UnknownState(format!("{successor:?}")));
                }
            }
        }

        if let Some(omega) = &omega {
            if let Some(unknown) = omega.keys().find(|s| !delta.contains_key(*s)) {
                return Err(AlgebraError::UnknownState(format!("{unknown:?}")));
            }
            for (state, row) in omega {
                if let Some(extra) = row.keys().find(|x| !inputs.contains(*x)) {
                    return Err(AlgebraError::UndefinedTransition {
                        state: format!("{state:?}"),
                        input: format!("{extra:?}"),
                    });
                }
            }
            for state in delta.keys() {
                for input in &inputs {
                    if omega.get(state).and_then(|row| row.get(input)).is_none() {
                        return Err(AlgebraError::UndefinedOutput {
                            state: format!("{state:?}"),
                            input: format!("{input:?}"),
                        });
                    }
                }
            }
        }

        Ok(Self::assemble(delta, omega))
    }

    /// Puts together a machine from tables that are known to be total.
    pub(crate) fn assemble(delta: Table<S, I, S>, omega: Option<Table<S, I, O>>) -> Self {
        let states = delta.keys().cloned().collect();
        let inputs = delta
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect::<OrderedSet<_>>()
            .into_iter()
            .collect();
        let outputs = omega
            .iter()
            .flat_map(|table| table.values())
            .flat_map(|row| row.values().cloned())
            .collect();
        Self {
            delta,
            omega,
            states,
            inputs,
            outputs,
        }
    }

    /// Returns the states in their canonical (sorted) order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Returns the inputs in their canonical (sorted) order.
    pub fn inputs(&self) -> &[I] {
        &self.inputs
    }

    /// Returns the set of outputs that are actually produced, which is empty if `self` has
    /// no output function.
    pub fn outputs(&self) -> &OrderedSet<O> {
        &self.outputs
    }

    /// Returns `true` if `self` has an output function.
    pub fn has_outputs(&self) -> bool {
        self.omega.is_some()
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns the transition table.
    pub fn delta(&self) -> &Table<S, I, S> {
        &self.delta
    }

    /// Returns the output table, if there is one.
    pub fn omega(&self) -> Option<&Table<S, I, O>> {
        self.omega.as_ref()
    }

    /// Returns the successor of `state` on `input`, or `None` if either is unknown.
    pub fn successor(&self, state: &S, input: &I) -> Option<&S> {
        self.delta.get(state)?.get(input)
    }

    /// Returns the output that is produced when reading `input` in `state`. Gives `None` if
    /// there is no output function or if the state or input is unknown.
    pub fn output(&self, state: &S, input: &I) -> Option<&O> {
        self.omega.as_ref()?.get(state)?.get(input)
    }

    /// Runs `word` starting in `from` and returns the state that is reached, or `None` if
    /// some state or symbol is unknown.
    pub fn run<'a, W>(&self, from: &S, word: W) -> Option<S>
    where
        W: IntoIterator<Item = &'a I>,
        I: 'a,
    {
        word.into_iter()
            .try_fold(from, |state, input| self.successor(state, input))
            .cloned()
    }

    /// Runs `word` starting in `from` and collects the produced outputs, one for each symbol.
    /// Gives `None` if there is no output function or if some state or symbol is unknown.
    pub fn outputs_on<'a, W>(&self, from: &S, word: W) -> Option<Vec<O>>
    where
        W: IntoIterator<Item = &'a I>,
        I: 'a,
    {
        let mut state = from;
        let mut produced = vec![];
        for input in word {
            produced.push(self.output(state, input)?.clone());
            state = self.successor(state, input)?;
        }
        Some(produced)
    }

    /// The successor of a known state on a known input.
    fn step(&self, state: &S, input: &I) -> &S {
        &self.delta[state][input]
    }

    /// Positions of the states in the canonical order, used for encoding partitions.
    fn state_positions(&self) -> Map<&S, usize> {
        self.states.iter().enumerate().map(|(i, s)| (s, i)).collect()
    }

    /// The partition of the states into singletons.
    pub fn zero_partition(&self) -> Partition<S> {
        Partition::zero(self.states.iter().cloned())
    }

    /// The partition of the states with a single block.
    pub fn identity_partition(&self) -> Partition<S> {
        Partition::identity(self.states.iter().cloned())
    }

    /// The partition of the inputs into singletons.
    pub fn input_zero_partition(&self) -> Partition<I> {
        Partition::zero(self.inputs.iter().cloned())
    }

    /// The partition of the inputs with a single block.
    pub fn input_identity_partition(&self) -> Partition<I> {
        Partition::identity(self.inputs.iter().cloned())
    }

    /// Building the homomorphic image of a machine under partitions of its states, inputs and
    /// outputs is not supported.
    pub fn homomorphic_image(
        &self,
        _states: &Partition<S>,
        _inputs: Option<&Partition<I>>,
        _outputs: Option<&Partition<O>>,
    ) -> Result<Machine<OrderedSet<S>, OrderedSet<I>, OrderedSet<O>>> {
        Err(AlgebraError::Unsupported("homomorphic image"))
    }

    /// Returns a string representation of the transition (and output) table.
    fn build_transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.inputs.iter().map(|x| format!("{x:?}"))),
        );
        for state in &self.states {
            let row = self.inputs.iter().map(|x| {
                let successor = self.step(state, x);
                match self.output(state, x) {
                    Some(o) => format!("{successor:?} / {o:?}"),
                    None => format!("{successor:?}"),
                }
            });
            builder.push_record(std::iter::once(format!("{state:?}")).chain(row));
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<S: Element, I: Element, O: Element> Display for Machine<S, I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_transition_table())
    }
}

/// Formats a block of states as `{a,b,c}`, this is how the states of a reduced machine are
/// named.
pub fn block_label<S: Display>(block: &OrderedSet<S>) -> String {
    format!("{{{}}}", block.iter().join(","))
}
