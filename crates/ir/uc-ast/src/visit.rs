//! Pre/post-order traversal with enter and leave hooks

use crate::{
    AliasTarget, Ast, BlockItem, Decl, DeclId, Expr, ExprId, IdentId, Stmt, StmtId, TypeExpr,
    TypeExprId,
};
use std::iter;

/// A node reached by the walker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Declaration
    Decl(DeclId),
    /// Statement
    Stmt(StmtId),
    /// Expression
    Expr(ExprId),
    /// Type expression
    Type(TypeExprId),
    /// Identifier use
    Ident(IdentId),
}

/// Hooks invoked around every node of a walk
///
/// `enter` runs before a node's children are visited and `leave` after. The
/// first error returned by either hook aborts the walk.
pub trait Visitor {
    /// Error that aborts the traversal
    type Error;

    /// Called before the children of `node`
    ///
    /// # Errors
    ///
    /// Returning an error stops the walk immediately.
    fn enter(&mut self, ast: &Ast, node: Node) -> Result<(), Self::Error> {
        let _ = (ast, node);
        Ok(())
    }

    /// Called after the children of `node`
    ///
    /// # Errors
    ///
    /// Returning an error stops the walk immediately.
    fn leave(&mut self, ast: &Ast, node: Node) -> Result<(), Self::Error> {
        let _ = (ast, node);
        Ok(())
    }
}

/// Walks every top-level declaration of the file in source order
///
/// # Errors
///
/// Propagates the first error raised by a hook.
pub fn walk_file<V: Visitor>(ast: &Ast, visitor: &mut V) -> Result<(), V::Error> {
    for decl in &ast.file.decls {
        walk(ast, Node::Decl(*decl), visitor)?;
    }
    Ok(())
}

/// Walks the subtree rooted at `node`
///
/// Children are visited in source order: a function's result type, then its
/// parameters, then its body; a variable's type before its initializer.
///
/// # Errors
///
/// Propagates the first error raised by a hook.
pub fn walk<V: Visitor>(ast: &Ast, node: Node, visitor: &mut V) -> Result<(), V::Error> {
    visitor.enter(ast, node)?;
    for child in children(ast, node) {
        walk(ast, child, visitor)?;
    }
    visitor.leave(ast, node)
}

/// Direct children of a node, in visiting order
#[must_use]
pub fn children(ast: &Ast, node: Node) -> Vec<Node> {
    match node {
        Node::Decl(decl) => match &ast.decls[decl] {
            Decl::Function(func) => {
                let mut out = vec![Node::Type(func.sig)];
                out.extend(func.body.map(Node::Stmt));
                out
            }
            Decl::Variable(var) => {
                let mut out = vec![Node::Type(var.ty)];
                out.extend(var.init.map(Node::Expr));
                out
            }
            Decl::TypeAlias(alias) => match alias.target {
                AliasTarget::Builtin(_) => Vec::new(),
                AliasTarget::Type(ty) => vec![Node::Type(ty)],
            },
        },
        Node::Stmt(stmt) => match &ast.stmts[stmt] {
            Stmt::Block { items, .. } => items
                .iter()
                .map(|item| match item {
                    BlockItem::Decl(decl) => Node::Decl(*decl),
                    BlockItem::Stmt(stmt) => Node::Stmt(*stmt),
                })
                .collect(),
            Stmt::Empty { .. } => Vec::new(),
            Stmt::Expr { expr } => vec![Node::Expr(*expr)],
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                let mut out = vec![Node::Expr(*cond), Node::Stmt(*then_branch)];
                out.extend(else_branch.map(Node::Stmt));
                out
            }
            Stmt::Return { value, .. } => value.iter().map(|expr| Node::Expr(*expr)).collect(),
            Stmt::While { cond, body, .. } => vec![Node::Expr(*cond), Node::Stmt(*body)],
        },
        Node::Expr(expr) => match &ast.exprs[expr] {
            Expr::Literal { .. } => Vec::new(),
            Expr::Binary { lhs, rhs, .. } => vec![Node::Expr(*lhs), Node::Expr(*rhs)],
            Expr::Call { callee, args, .. } => iter::once(Node::Ident(*callee))
                .chain(args.iter().map(|arg| Node::Expr(*arg)))
                .collect(),
            Expr::Ident(ident) => vec![Node::Ident(*ident)],
            Expr::Index { array, index, .. } => vec![Node::Ident(*array), Node::Expr(*index)],
            Expr::Paren { inner, .. } => vec![Node::Expr(*inner)],
            Expr::Unary { operand, .. } => vec![Node::Expr(*operand)],
        },
        Node::Type(ty) => match &ast.types[ty] {
            TypeExpr::Named(ident) => vec![Node::Ident(*ident)],
            TypeExpr::Array { elem, .. } => vec![Node::Type(*elem)],
            TypeExpr::Func { result, params, .. } => iter::once(Node::Type(*result))
                .chain(params.iter().map(|param| Node::Decl(*param)))
                .collect(),
        },
        Node::Ident(_) => Vec::new(),
    }
}
