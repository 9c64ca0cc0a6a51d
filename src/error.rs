use thiserror::Error;

/// Errors raised by the partition algebra and by machine construction. All of these
/// signal a misuse by the caller, none of them is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    /// The operands of a binary partition operation are not over the same set of elements.
    #[error("partitions are defined over different universes, {element} occurs in only one of them")]
    DomainMismatch {
        /// Debug representation of an element that belongs to one universe but not the other.
        element: String,
    },
    /// An order given for encoding or decoding does not cover precisely the elements
    /// of the partition.
    #[error("order does not match the elements: {0}")]
    EncodingMismatch(String),
    /// A textual restricted growth string could not be parsed.
    #[error("could not parse restricted growth string `{0}`")]
    MalformedEncoding(String),
    /// The blocks given for constructing a partition are not pairwise disjoint.
    #[error("element {0} appears in more than one block")]
    OverlappingBlocks(String),
    /// The operation is intentionally left undefined.
    #[error("operation `{0}` is not supported")]
    Unsupported(&'static str),
    /// The transition function has no entry for the given state and input.
    #[error("no transition for state {state} on input {input}")]
    UndefinedTransition {
        /// Debug representation of the state.
        state: String,
        /// Debug representation of the input.
        input: String,
    },
    /// The output function has no entry for the given state and input.
    #[error("no output for state {state} on input {input}")]
    UndefinedOutput {
        /// Debug representation of the state.
        state: String,
        /// Debug representation of the input.
        input: String,
    },
    /// Two different classes of states would be given the same name.
    #[error("the label {0} names more than one class of states")]
    DuplicateLabel(String),
    /// A transition or output refers to a state that has no row in the transition table.
    #[error("state {0} is not part of the machine")]
    UnknownState(String),
}

/// Shorthand for results whose error type is [`AlgebraError`].
pub type Result<T> = std::result::Result<T, AlgebraError>;
