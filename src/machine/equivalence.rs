use std::fmt::Display;

use tracing::{debug, trace};

use super::{block_label, Machine, Table};
use crate::{
    math::{Map, OrderedMap, Set},
    AlgebraError, Element, Partition, Result,
};

impl<S: Element, I: Element, O: Element> Machine<S, I, O> {
    /// Computes the coarsest partition of the states such that any two states in the same
    /// block produce the same output on every input and move to states in the same block on
    /// every input. These are exactly the states that can not be distinguished by feeding
    /// inputs and observing outputs.
    ///
    /// Starting from the partition that groups states with identical output rows, we
    /// repeatedly compute the partition grouping states whose successors lie in the same
    /// blocks under every input and take the meet with the current partition. This stops as
    /// soon as nothing changes, which happens after at most as many rounds as there are states.
    ///
    /// If `self` has no output function, no two states can be told apart and the identity
    /// partition is returned.
    pub fn equivalent_states(&self) -> Partition<S> {
        let Some(omega) = &self.omega else {
            return self.identity_partition();
        };

        let mut pi = Partition::from_labelled(self.states.iter().map(|s| {
            let row: Vec<&O> = self.inputs.iter().map(|x| &omega[s][x]).collect();
            (row, s.clone())
        }));
        trace!("states with equal outputs {pi:?}");

        let mut round = 0;
        loop {
            round += 1;
            let refined = pi.meet_unchecked(&self.successor_agreement(&pi));
            if refined == pi {
                debug!(
                    "state equivalence stabilized after {round} rounds with {} classes",
                    pi.size()
                );
                return pi;
            }
            trace!("round {round} refined to {refined:?}");
            pi = refined;
        }
    }

    /// Groups states whose successors under every input lie in the same block of `pi`.
    fn successor_agreement(&self, pi: &Partition<S>) -> Partition<S> {
        let block_index: Map<&S, usize> = pi
            .blocks()
            .enumerate()
            .flat_map(|(i, block)| block.iter().map(move |s| (s, i)))
            .collect();
        Partition::from_labelled(self.states.iter().map(|s| {
            let successors: Vec<usize> = self
                .inputs
                .iter()
                .map(|x| block_index[self.step(s, x)])
                .collect();
            (successors, s.clone())
        }))
    }

    /// Builds the reduced machine, which has one state for each class of
    /// [`Machine::equivalent_states`]. A class is named by its members, e.g. `{a,b}`, see
    /// [`block_label`]. Transitions and outputs are taken from an arbitrary representative,
    /// which is fine as all members of a class agree on them. The result behaves exactly like
    /// `self`, every state produces the same outputs as its class on every input word.
    ///
    /// Labels are built from the [`Display`] representation of the states, so different
    /// classes may end up with the same label (think of states `"a,b"`, `"a"` and `"b"`). In
    /// that case [`AlgebraError::DuplicateLabel`] is returned.
    pub fn reduced(&self) -> Result<Machine<String, I, O>>
    where
        S: Display,
    {
        let pi = self.equivalent_states();
        let mut names: Set<String> = Set::default();
        let mut label: Map<&S, String> = Map::default();
        for block in pi.blocks() {
            let name = block_label(block);
            if !names.insert(name.clone()) {
                return Err(AlgebraError::DuplicateLabel(name));
            }
            label.extend(block.iter().map(|s| (s, name.clone())));
        }

        let mut delta: Table<String, I, String> = Table::new();
        let mut omega: Option<Table<String, I, O>> = self.omega.as_ref().map(|_| Table::new());
        for block in pi.blocks() {
            let Some(representative) = block.first() else {
                continue;
            };
            let name = &label[representative];
            let row: OrderedMap<I, String> = self
                .inputs
                .iter()
                .map(|x| (x.clone(), label[self.step(representative, x)].clone()))
                .collect();
            delta.insert(name.clone(), row);

            if let (Some(reduced), Some(original)) = (omega.as_mut(), self.omega.as_ref()) {
                reduced.insert(name.clone(), original[representative].clone());
            }
        }

        debug!(
            "reduced machine from {} to {} states",
            self.size(),
            delta.len()
        );
        Ok(Machine::assemble(delta, omega))
    }
}
