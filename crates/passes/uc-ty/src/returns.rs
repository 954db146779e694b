//! Return-path analysis

use uc_ast::{Ast, BlockItem, Stmt, StmtId};

/// Whether every path through `stmt` ends in a `return`
///
/// Loops are never assumed to run, so a `while` does not count even when its
/// body returns.
#[must_use]
pub fn always_returns(ast: &Ast, stmt: StmtId) -> bool {
    match &ast.stmts[stmt] {
        Stmt::Return { .. } => true,
        Stmt::Block { items, .. } => items.iter().any(|item| match item {
            BlockItem::Stmt(inner) => always_returns(ast, *inner),
            BlockItem::Decl(_) => false,
        }),
        Stmt::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => always_returns(ast, *then_branch) && always_returns(ast, *else_branch),
        Stmt::If {
            else_branch: None, ..
        }
        | Stmt::While { .. }
        | Stmt::Expr { .. }
        | Stmt::Empty { .. } => false,
    }
}
