//! Compile-time evaluation of constant expressions
//!
//! Global initializers must be constant: literals combined with parentheses,
//! unary operators and non-assigning binary operators. Evaluation follows the
//! checked typing rules, so `char` arithmetic stays in 8 bits and `int`
//! arithmetic in 32 bits, with overflow reported rather than wrapped.

mod error;
mod evaluator;
mod value;

pub use error::ConstError;
pub use evaluator::ConstEvaluator;
pub use value::ConstValue;
