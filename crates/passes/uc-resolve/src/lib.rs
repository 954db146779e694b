//! Identifier resolution for µC
//!
//! Binds every identifier use in a file to the declaration it refers to.
//!
//! # Architecture
//!
//! - [`ScopeTree`]: nested name-to-declaration environments with parent links
//! - [`resolve`]: a single walk over the file that opens and closes scopes as
//!   it enters and leaves functions and blocks, and looks up every identifier
//!
//! Scopes are created for the universe (built-in type names), the file, each
//! function (parameters and outermost locals share one scope) and each nested
//! block. All of them are kept in the returned [`Resolution`], keyed by the
//! node that owns them.
//!
//! Resolution is fail-fast: the first undeclared identifier or conflicting
//! declaration aborts the walk.

mod error;
mod resolver;
mod scope;

pub use error::ResolveError;
pub use resolver::resolve;
pub use scope::{Inserted, Scope, ScopeId, ScopeKind, ScopeTree};

use rustc_hash::FxHashMap;
use uc_ast::{DeclId, IdentId, StmtId};
use uc_intern::Symbol;

/// AST node that owns a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeOwner {
    /// The source file
    File,
    /// A function declaration (prototypes get a parameter scope too)
    Function(DeclId),
    /// A block statement other than a function body
    Block(StmtId),
}

/// Result of a successful resolution run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Every scope created during the walk
    pub scopes: ScopeTree,
    /// Scope owned by each file, function and block node
    pub owners: FxHashMap<ScopeOwner, ScopeId>,
    /// Declaration referenced by each identifier use
    pub idents: FxHashMap<IdentId, DeclId>,
    /// The universe scope
    pub universe: ScopeId,
    /// The file scope
    pub file: ScopeId,
}

impl Resolution {
    /// Declaration an identifier use resolved to
    #[must_use]
    pub fn decl_of(&self, ident: IdentId) -> Option<DeclId> {
        self.idents.get(&ident).copied()
    }

    /// Scope owned by `owner`
    #[must_use]
    pub fn scope_of(&self, owner: ScopeOwner) -> Option<ScopeId> {
        self.owners.get(&owner).copied()
    }

    /// Declaration `name` is bound to at file scope
    ///
    /// For names declared several times this is the defining declaration if
    /// there is one, the first declaration otherwise.
    #[must_use]
    pub fn file_binding(&self, name: Symbol) -> Option<DeclId> {
        self.scopes.get_scope(self.file).defs.get(&name).copied()
    }
}
