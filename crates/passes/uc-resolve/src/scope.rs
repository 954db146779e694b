//! Lexical scopes

use crate::ResolveError;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::iter;
use uc_ast::{Ast, Decl, DeclId};
use uc_intern::Symbol;

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

/// What introduced a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Built-in type names
    Universe,
    /// Top-level declarations of the file
    File,
    /// Parameters and outermost locals of a function
    Function,
    /// Nested block statement
    Block,
}

/// A single name-binding environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Enclosing scope; `None` only for the universe
    pub parent: Option<ScopeId>,
    /// Kind of scope
    pub kind: ScopeKind,
    /// Bindings in insertion order
    pub defs: IndexMap<Symbol, DeclId, FxBuildHasher>,
}

/// Outcome of inserting a declaration into a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    /// The name was unbound and now refers to the declaration
    Bound,
    /// A tentative declaration was replaced by a definition
    Rebound,
    /// The declaration merged into an existing binding, which is unchanged
    Merged,
}

/// All scopes of one resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Creates an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope nested in `parent` (or a root when `None`)
    pub fn create_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            parent,
            kind,
            defs: IndexMap::default(),
        });
        id
    }

    /// Binds the name of `decl` in `scope`
    ///
    /// Inside the file scope a function or variable may be declared any number
    /// of times as long as at most one of the declarations is a definition; a
    /// definition following tentative declarations takes over the binding.
    /// Every other scope admits a single declaration per name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Redeclaration`] if the name is already bound in
    /// this exact scope and the declarations cannot be merged.
    pub fn insert(
        &mut self,
        scope: ScopeId,
        ast: &Ast,
        decl: DeclId,
    ) -> Result<Inserted, ResolveError> {
        let new = &ast.decls[decl];
        let name = new.name();
        let data = &mut self.scopes[scope.0 as usize];

        let Some(&existing) = data.defs.get(&name) else {
            data.defs.insert(name, decl);
            return Ok(Inserted::Bound);
        };
        if existing == decl {
            return Ok(Inserted::Merged);
        }

        let old = &ast.decls[existing];
        let redeclaration = || ResolveError::Redeclaration {
            name: ast.name(name),
            first: old.span(),
            second: new.span(),
        };

        if data.kind != ScopeKind::File || !same_kind(old, new) {
            return Err(redeclaration());
        }
        match (old.is_definition(), new.is_definition()) {
            (true, true) => Err(redeclaration()),
            (false, true) => {
                data.defs.insert(name, decl);
                Ok(Inserted::Rebound)
            }
            (_, false) => Ok(Inserted::Merged),
        }
    }

    /// Finds the nearest binding of `name`, walking outwards from `scope`
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: Symbol) -> Option<DeclId> {
        self.ancestors(scope)
            .find_map(|id| self.scopes[id.0 as usize].defs.get(&name).copied())
    }

    /// `scope` followed by each of its enclosing scopes
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), |id| self.scopes[id.0 as usize].parent)
    }

    /// Every name visible from `scope`, innermost first
    #[must_use]
    pub fn visible_names(&self, scope: ScopeId) -> Vec<Symbol> {
        self.ancestors(scope)
            .flat_map(|id| self.scopes[id.0 as usize].defs.keys().copied())
            .collect()
    }

    /// Get a scope by ID
    #[must_use]
    pub fn get_scope(&self, scope: ScopeId) -> &Scope {
        &self.scopes[scope.0 as usize]
    }

    /// Number of scopes created
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no scope exists yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

const fn same_kind(lhs: &Decl, rhs: &Decl) -> bool {
    matches!(
        (lhs, rhs),
        (Decl::Function(_), Decl::Function(_)) | (Decl::Variable(_), Decl::Variable(_))
    )
}
