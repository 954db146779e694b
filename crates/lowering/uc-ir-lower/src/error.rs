//! Lowering errors

use uc_ast::BinaryOp;
use uc_const_eval::ConstError;
use uc_ir::IrError;
use uc_span::Span;

/// Failure while lowering a checked file
///
/// Only [`LowerError::Const`] and [`LowerError::Unsupported`] describe
/// problems with the source program. The other variants mean an earlier
/// phase handed over inconsistent results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// A global initializer could not be evaluated at compile time
    #[error(transparent)]
    Const(#[from] ConstError),

    /// The construct has no lowering
    #[error("{construct} is not supported")]
    Unsupported {
        /// What was found
        construct: &'static str,
        /// Location of the construct
        span: Span,
    },

    /// An identifier use without a resolved declaration
    #[error("internal compiler error: identifier at {span} was not resolved")]
    Unresolved {
        /// Location of the identifier
        span: Span,
    },

    /// A declaration or expression without a computed type
    #[error("internal compiler error: no type was computed for the {node} at {span}")]
    MissingType {
        /// `"declaration"` or `"expression"`
        node: &'static str,
        /// Location of the node
        span: Span,
    },

    /// A declaration used where its kind makes no sense
    #[error("internal compiler error: `{name}` cannot be used as a {expected}")]
    UnexpectedDecl {
        /// Declared name
        name: String,
        /// What the use needed
        expected: &'static str,
        /// Location of the use
        span: Span,
    },

    /// Assignment to an expression without storage
    #[error("internal compiler error: expression at {span} is not assignable")]
    NotAnLvalue {
        /// Location of the expression
        span: Span,
    },

    /// An operator that has no direct instruction
    #[error("internal compiler error: unexpected operator `{op}`")]
    UnexpectedOperator {
        /// The operator
        op: BinaryOp,
        /// Location of the operator
        span: Span,
    },

    /// The IR builder rejected an operation
    #[error("internal compiler error: {0}")]
    Ir(#[from] IrError),
}

impl LowerError {
    /// Whether the error is a compiler defect rather than a user error
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        !matches!(self, Self::Const(_) | Self::Unsupported { .. })
    }

    /// Source location of the error, if it has one
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::Const(err) => Some(err.span()),
            Self::Unsupported { span, .. }
            | Self::Unresolved { span }
            | Self::MissingType { span, .. }
            | Self::UnexpectedDecl { span, .. }
            | Self::NotAnLvalue { span }
            | Self::UnexpectedOperator { span, .. } => Some(*span),
            Self::Ir(_) => None,
        }
    }
}
