//! Const evaluation errors

use uc_span::Span;

/// Errors during const evaluation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstError {
    /// Expression cannot be evaluated at compile time
    #[error("initializer is not a constant expression")]
    NotConstant {
        /// Offending sub-expression
        span: Span,
    },

    /// Division by zero
    #[error("division by zero in constant expression")]
    DivisionByZero {
        /// The `/` operator
        span: Span,
    },

    /// Result does not fit the operand type
    #[error("constant expression overflows `{ty}`")]
    Overflow {
        /// Type that overflowed
        ty: &'static str,
        /// Offending literal or operator
        span: Span,
    },

    /// Operands of different types; the program was not type checked
    #[error("operands of constant expression have different types")]
    MixedOperands {
        /// The operator
        span: Span,
    },
}

impl ConstError {
    /// Get the span of this error
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::NotConstant { span }
            | Self::DivisionByZero { span }
            | Self::Overflow { span, .. }
            | Self::MixedOperands { span } => *span,
        }
    }
}
