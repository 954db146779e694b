//! Type deduction and checking for µC
//!
//! Computes a [`Type`] for every declaration and expression of a resolved
//! file and rejects ill-typed programs. The rules are exact: there is no
//! implicit conversion between `char` and `int`, and the result of a binary
//! operator has the type of its left operand.
//!
//! Besides operator typing the checker validates calls (arity and argument
//! types), `return` statements against the enclosing function, conditions and
//! initializers, and that every non-void function returns on all paths.

mod checker;
mod error;
mod returns;
mod ty;

pub use checker::check;
pub use error::TypeError;
pub use returns::always_returns;
pub use ty::Type;

use rustc_hash::FxHashMap;
use uc_ast::{DeclId, ExprId};

/// Types computed by a successful check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    /// Type of every checked expression
    pub exprs: FxHashMap<ExprId, Type>,
    /// Type of every declaration reached by the check
    pub decls: FxHashMap<DeclId, Type>,
}

impl TypeTable {
    /// Type of an expression
    #[must_use]
    pub fn expr(&self, expr: ExprId) -> Option<&Type> {
        self.exprs.get(&expr)
    }

    /// Type of a declaration
    #[must_use]
    pub fn decl(&self, decl: DeclId) -> Option<&Type> {
        self.decls.get(&decl)
    }
}
