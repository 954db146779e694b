//! Type checking errors

use uc_span::Span;

/// Errors that abort type checking
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// Operand, argument, initializer or returned value of the wrong type
    #[error("mismatched types: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        /// Expected type or type class
        expected: String,
        /// Actual type
        found: String,
        /// Operator or offending expression
        span: Span,
    },

    /// Left-hand side of `=` does not denote storage
    #[error("cannot assign to expression of type `{ty}`")]
    NotAssignable {
        /// Type of the left-hand side
        ty: String,
        /// The `=` operator
        span: Span,
    },

    /// Call of something that is not a function
    #[error("cannot call `{name}` of type `{ty}`")]
    NotCallable {
        /// Called name
        name: String,
        /// Its type
        ty: String,
        /// Opening parenthesis of the call
        span: Span,
    },

    /// Indexing of something that is not an array
    #[error("cannot index `{name}` of type `{ty}`")]
    NotIndexable {
        /// Indexed name
        name: String,
        /// Its type
        ty: String,
        /// Opening bracket of the index expression
        span: Span,
    },

    /// Call with the wrong number of arguments
    #[error("`{name}` takes {expected} argument(s) but {found} were supplied")]
    ArgumentCount {
        /// Called function
        name: String,
        /// Number of parameters
        expected: usize,
        /// Number of arguments
        found: usize,
        /// Opening parenthesis of the call
        span: Span,
    },

    /// Integer literal that does not fit in `int`
    #[error("integer literal `{value}` does not fit in `int`")]
    LiteralOutOfRange {
        /// Literal value
        value: i64,
        /// Location of the literal
        span: Span,
    },

    /// A non-void function can finish without returning a value
    #[error("function `{name}` does not return a value on every path")]
    MissingReturn {
        /// Function name
        name: String,
        /// Location of the function name
        span: Span,
    },

    /// A name used as a type does not denote one
    #[error("`{name}` is not a type")]
    NotAType {
        /// The name
        name: String,
        /// Location of the use
        span: Span,
    },

    /// A type name used as a value
    #[error("expected a value, found type `{name}`")]
    NotAValue {
        /// The name
        name: String,
        /// Location of the use
        span: Span,
    },

    /// A declaration whose type cannot hold a value
    #[error("`{name}` cannot have type `{ty}`")]
    InvalidObjectType {
        /// Declared name
        name: String,
        /// Rejected type
        ty: String,
        /// Location of the name
        span: Span,
    },

    /// Identifier without a binding; resolution did not run or failed
    #[error("identifier was not resolved")]
    Unresolved {
        /// Location of the identifier
        span: Span,
    },

    /// Construct the compiler does not handle
    #[error("unsupported construct: {construct}")]
    Unsupported {
        /// Description of the construct
        construct: &'static str,
        /// Its location
        span: Span,
    },
}

impl TypeError {
    /// Primary location of the error
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::TypeMismatch { span, .. }
            | Self::NotAssignable { span, .. }
            | Self::NotCallable { span, .. }
            | Self::NotIndexable { span, .. }
            | Self::ArgumentCount { span, .. }
            | Self::LiteralOutOfRange { span, .. }
            | Self::MissingReturn { span, .. }
            | Self::NotAType { span, .. }
            | Self::NotAValue { span, .. }
            | Self::InvalidObjectType { span, .. }
            | Self::Unresolved { span }
            | Self::Unsupported { span, .. } => *span,
        }
    }

    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString, span: Span) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }
}
