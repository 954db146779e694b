//! Programmatic tree construction

use crate::{
    AliasTarget, Ast, BinaryOp, BlockItem, Decl, DeclId, Expr, ExprId, FuncDecl, Ident, IdentId,
    LiteralKind, Stmt, StmtId, TypeAlias, TypeExpr, TypeExprId, UnaryOp, VarDecl,
};
use uc_intern::{Interner, Symbol};
use uc_span::{FileId, Span};

/// Builds an [`Ast`] without source text
///
/// Every token gets a fresh span so that positions reported by the semantic
/// passes can be compared against the node that produced them. Spans grow in
/// call order, which for nested expressions is operands-first.
#[derive(Debug)]
pub struct AstBuilder {
    ast: Ast,
    offset: u32,
}

impl AstBuilder {
    /// Creates a builder for file 0 with a fresh interner
    #[must_use]
    pub fn new() -> Self {
        Self::with_interner(FileId(0), Interner::new())
    }

    /// Creates a builder sharing an existing interner
    #[must_use]
    pub fn with_interner(file_id: FileId, interner: Interner) -> Self {
        Self {
            ast: Ast::new(file_id, interner),
            offset: 0,
        }
    }

    /// Interns a name
    pub fn sym(&self, text: &str) -> Symbol {
        self.ast.interner.intern(text)
    }

    fn token(&mut self, len: usize) -> Span {
        let len = u32::try_from(len.max(1)).unwrap_or(u32::MAX / 2);
        let span = Span::at(self.offset, len);
        self.offset = span.end + 1;
        span
    }

    /// Identifier use of `name`
    pub fn ident(&mut self, name: &str) -> IdentId {
        let span = self.token(name.len());
        let name = self.sym(name);
        self.ast.alloc_ident(Ident { name, span })
    }

    // Types

    /// Named type such as `int`
    pub fn ty(&mut self, name: &str) -> TypeExprId {
        let ident = self.ident(name);
        self.ast.alloc_type(TypeExpr::Named(ident))
    }

    /// Array of `elem`; `len` is `None` for unsized parameters
    pub fn array_ty(&mut self, elem: TypeExprId, len: Option<u32>) -> TypeExprId {
        let lbracket = self.token(1);
        let rbracket = self.token(1);
        self.ast.alloc_type(TypeExpr::Array {
            elem,
            lbracket,
            len,
            rbracket,
        })
    }

    /// Function signature
    pub fn func_ty(&mut self, result: TypeExprId, params: Vec<DeclId>) -> TypeExprId {
        let lparen = self.token(1);
        let rparen = self.token(1);
        self.ast.alloc_type(TypeExpr::Func {
            result,
            lparen,
            params,
            rparen,
        })
    }

    // Expressions

    /// Integer literal
    pub fn int(&mut self, value: i64) -> ExprId {
        let span = self.token(value.to_string().len());
        self.ast.alloc_expr(Expr::Literal {
            kind: LiteralKind::Int(value),
            span,
        })
    }

    /// Character literal
    pub fn char(&mut self, value: u8) -> ExprId {
        let span = self.token(3);
        self.ast.alloc_expr(Expr::Literal {
            kind: LiteralKind::Char(value),
            span,
        })
    }

    /// Identifier expression
    pub fn name(&mut self, name: &str) -> ExprId {
        let ident = self.ident(name);
        self.ast.alloc_expr(Expr::Ident(ident))
    }

    /// Binary expression
    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let op_span = self.token(op.to_string().len());
        self.ast.alloc_expr(Expr::Binary {
            op,
            op_span,
            lhs,
            rhs,
        })
    }

    /// `lhs = rhs`
    pub fn assign(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Assign, lhs, rhs)
    }

    /// Call of the function named `callee`
    pub fn call(&mut self, callee: &str, args: Vec<ExprId>) -> ExprId {
        let callee = self.ident(callee);
        let lparen = self.token(1);
        let rparen = self.token(1);
        self.ast.alloc_expr(Expr::Call {
            callee,
            lparen,
            args,
            rparen,
        })
    }

    /// `array[index]`
    pub fn index(&mut self, array: &str, index: ExprId) -> ExprId {
        let array = self.ident(array);
        let lbracket = self.token(1);
        let rbracket = self.token(1);
        self.ast.alloc_expr(Expr::Index {
            array,
            lbracket,
            index,
            rbracket,
        })
    }

    /// `(inner)`
    pub fn paren(&mut self, inner: ExprId) -> ExprId {
        let lparen = self.token(1);
        let rparen = self.token(1);
        self.ast.alloc_expr(Expr::Paren {
            lparen,
            inner,
            rparen,
        })
    }

    /// Unary expression
    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        let op_span = self.token(1);
        self.ast.alloc_expr(Expr::Unary {
            op,
            op_span,
            operand,
        })
    }

    // Declarations

    /// Variable declaration
    pub fn var_decl(&mut self, ty: TypeExprId, name: &str, init: Option<ExprId>) -> DeclId {
        let name_span = self.token(name.len());
        let name = self.sym(name);
        self.ast.alloc_decl(Decl::Variable(VarDecl {
            name,
            name_span,
            ty,
            init,
        }))
    }

    /// Function parameter
    pub fn param(&mut self, ty: TypeExprId, name: &str) -> DeclId {
        self.var_decl(ty, name, None)
    }

    /// Function prototype (`body = None`) or definition
    pub fn func(
        &mut self,
        name: &str,
        result: TypeExprId,
        params: Vec<DeclId>,
        body: Option<StmtId>,
    ) -> DeclId {
        let name_span = self.token(name.len());
        let name = self.sym(name);
        let sig = self.func_ty(result, params);
        self.ast.alloc_decl(Decl::Function(FuncDecl {
            name,
            name_span,
            sig,
            body,
        }))
    }

    /// `typedef target name;`
    pub fn typedef(&mut self, target: TypeExprId, name: &str) -> DeclId {
        let span = self.token(name.len());
        let name = self.sym(name);
        self.ast.alloc_decl(Decl::TypeAlias(TypeAlias {
            name,
            span,
            target: AliasTarget::Type(target),
        }))
    }

    // Statements

    /// `{ items }`
    pub fn block(&mut self, items: Vec<BlockItem>) -> StmtId {
        let lbrace = self.token(1);
        let rbrace = self.token(1);
        self.ast.alloc_stmt(Stmt::Block {
            lbrace,
            items,
            rbrace,
        })
    }

    /// `;`
    pub fn empty(&mut self) -> StmtId {
        let span = self.token(1);
        self.ast.alloc_stmt(Stmt::Empty { span })
    }

    /// `expr;`
    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.ast.alloc_stmt(Stmt::Expr { expr })
    }

    /// `return value;`
    pub fn ret(&mut self, value: Option<ExprId>) -> StmtId {
        let span = self.token("return".len());
        self.ast.alloc_stmt(Stmt::Return { span, value })
    }

    /// `if (cond) then_branch else else_branch`
    pub fn if_(
        &mut self,
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    ) -> StmtId {
        let if_span = self.token("if".len());
        self.ast.alloc_stmt(Stmt::If {
            if_span,
            cond,
            then_branch,
            else_branch,
        })
    }

    /// `while (cond) body`
    pub fn while_(&mut self, cond: ExprId, body: StmtId) -> StmtId {
        let span = self.token("while".len());
        self.ast.alloc_stmt(Stmt::While { span, cond, body })
    }

    /// Appends a top-level declaration
    pub fn push(&mut self, decl: DeclId) -> DeclId {
        self.ast.push_decl(decl);
        decl
    }

    /// Read access to the tree built so far
    #[must_use]
    pub const fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Finishes construction
    #[must_use]
    pub fn finish(self) -> Ast {
        self.ast
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
