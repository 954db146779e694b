//! Construction invariant violations

use crate::BlockId;

/// Misuse of the IR construction API
///
/// Lowering a checked program never produces these; each one indicates a
/// defect in an earlier phase or in the lowering itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// `start_body` called on a function that already has blocks
    #[error("function `{function}` already has a body")]
    BodyAlreadyStarted {
        /// Function name
        function: String,
    },

    /// Emission while no block is selected
    #[error("no block is selected for emission in `{function}`")]
    NoCurrentBlock {
        /// Function name
        function: String,
    },

    /// A second terminator for the same block
    #[error("block `{label}` of `{function}` already has a terminator")]
    TerminatorAlreadySet {
        /// Function name
        function: String,
        /// Block label
        label: String,
    },

    /// Block handle from another function
    #[error("function `{function}` has no block {block}")]
    UnknownBlock {
        /// Function name
        function: String,
        /// The handle
        block: BlockId,
    },

    /// The selected block falls off the end of a non-void function
    #[error("block `{label}` of `{function}` falls through in a function returning `{result}`")]
    MissingTerminator {
        /// Function name
        function: String,
        /// Block label
        label: String,
        /// Declared result type
        result: String,
    },

    /// A block other than the selected one was left without a terminator
    #[error("block `{label}` of `{function}` has no terminator")]
    UnterminatedBlock {
        /// Function name
        function: String,
        /// Block label
        label: String,
    },
}
