//! Library for algebraic structure theory of finite state machines in the style of Hartmanis
//! and Stearns.
//!
//! The central object is the [`Partition`], a set partition of some finite universe, together
//! with the lattice operations on partitions: join (the least common coarsening), meet (the
//! greatest common refinement) and the induced order. Partitions can be encoded canonically as
//! restricted growth strings ([`partition::Rgs`]) relative to a fixed order of the universe,
//! which is what we use to deduplicate partitions when working with large collections of them.
//!
//! A [`Machine`] is a deterministic finite state transducer with states `S`, inputs `I`, a
//! total transition function `delta: S x I -> S` and an optional output function
//! `omega: S x I -> O`. On top of the partition algebra, it implements
//! - the computation of the coarsest output equivalence of states
//!   ([`Machine::equivalent_states`]) and the resulting [`Machine::reduced`] machine,
//! - the `m` operator of the partition pair algebra ([`Machine::m`]) and the test for the
//!   substitution property ([`Machine::is_sp`]),
//! - the enumeration of the lattice of all partitions with substitution property
//!   ([`Machine::enumerate_sp`]), which only ever looks at joins of the minimal such partitions
//!   and thereby avoids going through all (Bell number many) partitions of the state set.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_algebra::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        error::{AlgebraError, Result},
        machine::{Machine, MachineBuilder, SpCache},
        math,
        partition::{Partition, Partitions, Rgs},
        Element, Void,
    };

    #[cfg(feature = "random")]
    pub use super::machine::OutputKind;
}

/// Collection type aliases and the bits of combinatorics that are needed for counting
/// and sampling partitions.
pub mod math;

/// Defines the error type that is shared by all fallible operations of the crate.
pub mod error;
pub use error::{AlgebraError, Result};

/// Set partitions and the lattice operations on them.
pub mod partition;
pub use partition::Partition;

/// Finite state machines and their partition algebra.
pub mod machine;
pub use machine::Machine;

use std::{fmt::Debug, hash::Hash};

/// An element is anything that can be a member of a [`Partition`], a state, an input or an
/// output of a [`Machine`]. We need a total order (which gives canonical block orders and
/// canonical encodings) and hashing.
pub trait Element: Clone + Eq + Ord + Hash + Debug {}

impl<T: Clone + Eq + Ord + Hash + Debug> Element for T {}

/// Represents the absence of an output. A [`Machine`] that is built without an output
/// function uses this as its output type.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Void;

impl Debug for Void {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#")
    }
}
