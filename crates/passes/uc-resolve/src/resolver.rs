//! The resolution walk

use crate::error::suggest;
use crate::{Resolution, ResolveError, ScopeId, ScopeKind, ScopeOwner, ScopeTree};
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use uc_ast::visit::{self, Node, Visitor};
use uc_ast::{Ast, Decl, DeclId, IdentId, Stmt};

/// Resolves every identifier of `ast`
///
/// The tree itself is left untouched; bindings are returned out of band.
///
/// # Errors
///
/// Returns the first [`ResolveError`] encountered, in source order.
#[tracing::instrument(level = "debug", skip_all, fields(decls = ast.file.decls.len()))]
pub fn resolve(ast: &Ast) -> Result<Resolution, ResolveError> {
    let mut scopes = ScopeTree::new();
    let universe = scopes.create_scope(None, ScopeKind::Universe);
    for builtin in ast.builtins.all() {
        scopes.insert(universe, ast, builtin)?;
    }

    let file = scopes.create_scope(Some(universe), ScopeKind::File);
    for decl in &ast.file.decls {
        scopes.insert(file, ast, *decl)?;
    }

    let mut resolver = Resolver {
        scopes,
        owners: FxHashMap::default(),
        idents: FxHashMap::default(),
        file,
        current: file,
        skip_block_scope: false,
    };
    resolver.owners.insert(ScopeOwner::File, file);
    visit::walk_file(ast, &mut resolver)?;

    tracing::debug!(
        scopes = resolver.scopes.len(),
        idents = resolver.idents.len(),
        "resolution finished"
    );
    Ok(Resolution {
        scopes: resolver.scopes,
        owners: resolver.owners,
        idents: resolver.idents,
        universe,
        file,
    })
}

/// Traversal state for one file
struct Resolver {
    scopes: ScopeTree,
    owners: FxHashMap<ScopeOwner, ScopeId>,
    idents: FxHashMap<IdentId, DeclId>,
    file: ScopeId,
    /// Innermost open scope
    current: ScopeId,
    /// Set between entering a function definition and entering its body, whose
    /// block shares the function scope
    skip_block_scope: bool,
}

impl Resolver {
    fn push(&mut self, kind: ScopeKind, owner: ScopeOwner) {
        let scope = self.scopes.create_scope(Some(self.current), kind);
        self.owners.insert(owner, scope);
        self.current = scope;
    }

    fn pop(&mut self) {
        if let Some(parent) = self.scopes.get_scope(self.current).parent {
            self.current = parent;
        }
    }

    fn undeclared(&self, ast: &Ast, ident: IdentId) -> ResolveError {
        let use_site = ast.idents[ident];
        let target = ast.name(use_site.name);
        let visible: IndexSet<String, FxBuildHasher> = self
            .scopes
            .visible_names(self.current)
            .into_iter()
            .map(|sym| ast.name(sym))
            .collect();

        ResolveError::Undeclared {
            suggestions: suggest(&target, visible.iter().map(String::as_str)),
            name: target,
            span: use_site.span,
        }
    }
}

impl Visitor for Resolver {
    type Error = ResolveError;

    fn enter(&mut self, ast: &Ast, node: Node) -> Result<(), ResolveError> {
        match node {
            Node::Decl(decl) => {
                if self.current != self.file {
                    self.scopes.insert(self.current, ast, decl)?;
                }
                if let Decl::Function(func) = &ast.decls[decl] {
                    self.skip_block_scope = func.body.is_some();
                    self.push(ScopeKind::Function, ScopeOwner::Function(decl));
                }
            }
            Node::Stmt(stmt) => {
                if matches!(ast.stmts[stmt], Stmt::Block { .. }) {
                    if !self.skip_block_scope {
                        self.push(ScopeKind::Block, ScopeOwner::Block(stmt));
                    }
                    self.skip_block_scope = false;
                }
            }
            Node::Ident(ident) => {
                let name = ast.idents[ident].name;
                let Some(decl) = self.scopes.lookup(self.current, name) else {
                    return Err(self.undeclared(ast, ident));
                };
                tracing::trace!(name = %ast.name(name), ?decl, "resolved identifier");
                self.idents.insert(ident, decl);
            }
            Node::Expr(_) | Node::Type(_) => {}
        }
        Ok(())
    }

    fn leave(&mut self, ast: &Ast, node: Node) -> Result<(), ResolveError> {
        match node {
            Node::Stmt(stmt) if matches!(ast.stmts[stmt], Stmt::Block { .. }) => self.pop(),
            Node::Decl(decl) => {
                if let Decl::Function(func) = &ast.decls[decl]
                    && func.body.is_none()
                {
                    self.pop();
                }
            }
            _ => {}
        }
        Ok(())
    }
}
