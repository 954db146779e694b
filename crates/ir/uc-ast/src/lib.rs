//! Syntax tree for µC source files
//!
//! The tree is produced by an external parser and is never mutated by the
//! semantic passes: identifier resolution, types and IR values all live in
//! side tables keyed by the arena indices defined here.
//!
//! # Architecture
//!
//! Every node family lives in its own [`Arena`] inside [`Ast`]:
//!
//! - [`Decl`]: function, variable and type-alias declarations
//! - [`Stmt`]: block, empty, expression, if, return and while statements
//! - [`Expr`]: literal, binary, call, identifier, index, paren and unary expressions
//! - [`TypeExpr`]: named, array and function-signature types
//! - [`Ident`]: identifier *uses* (declaration names are stored inline)
//!
//! Nodes refer to each other through [`Idx`] handles, so a use site has a
//! stable identity that later passes can key their results on.
//!
//! # Usage
//!
//! Parsers allocate nodes directly through the `alloc_*` methods; tests and
//! fixtures use [`AstBuilder`], which assigns a distinct span to every token.

mod builder;
pub mod visit;

pub use builder::AstBuilder;

use derive_more::Display;
use la_arena::{Arena, Idx};
use serde::{Deserialize, Serialize};
use uc_intern::{Interner, Symbol};
use uc_span::{FileId, Span};

/// Declaration handle
pub type DeclId = Idx<Decl>;
/// Statement handle
pub type StmtId = Idx<Stmt>;
/// Expression handle
pub type ExprId = Idx<Expr>;
/// Type expression handle
pub type TypeExprId = Idx<TypeExpr>;
/// Identifier use handle
pub type IdentId = Idx<Ident>;

/// A complete source file together with the node arenas it refers to
#[derive(Debug, Clone)]
pub struct Ast {
    /// Declarations, including the three built-in type aliases
    pub decls: Arena<Decl>,
    /// Statements
    pub stmts: Arena<Stmt>,
    /// Expressions
    pub exprs: Arena<Expr>,
    /// Type expressions
    pub types: Arena<TypeExpr>,
    /// Identifier uses
    pub idents: Arena<Ident>,
    /// Top-level declarations of the file
    pub file: SourceFile,
    /// Built-in type alias declarations of the universe scope
    pub builtins: Builtins,
    /// Interner owning every [`Symbol`] in the tree
    pub interner: Interner,
}

/// The root node: top-level declarations in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File the tree was parsed from
    pub file_id: FileId,
    /// Top-level declarations in source order
    pub decls: Vec<DeclId>,
}

/// Declarations backing the universe scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtins {
    /// `char`
    pub char: DeclId,
    /// `int`
    pub int: DeclId,
    /// `void`
    pub void: DeclId,
}

impl Builtins {
    /// All built-in declarations, in universe insertion order
    #[must_use]
    pub const fn all(&self) -> [DeclId; 3] {
        [self.char, self.int, self.void]
    }
}

/// An identifier use site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    /// Referenced name
    pub name: Symbol,
    /// Source location
    pub span: Span,
}

/// The three basic types of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum BasicKind {
    /// 8-bit character
    #[display("char")]
    Char,
    /// 32-bit signed integer
    #[display("int")]
    Int,
    /// Absence of a value
    #[display("void")]
    Void,
}

/// Declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// Function prototype or definition
    Function(FuncDecl),
    /// Variable, parameter or tentative definition
    Variable(VarDecl),
    /// Type alias (the built-in type names are aliases too)
    TypeAlias(TypeAlias),
}

/// Function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Function name
    pub name: Symbol,
    /// Location of the name
    pub name_span: Span,
    /// Signature, always a [`TypeExpr::Func`]
    pub sig: TypeExprId,
    /// Body block; `None` for a prototype
    pub body: Option<StmtId>,
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    /// Variable name
    pub name: Symbol,
    /// Location of the name
    pub name_span: Span,
    /// Declared type
    pub ty: TypeExprId,
    /// Initializer; `None` makes a file-scope variable a tentative definition
    pub init: Option<ExprId>,
}

/// Type alias declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAlias {
    /// Alias name
    pub name: Symbol,
    /// Location of the name ([`Span::BUILTIN`] for built-ins)
    pub span: Span,
    /// Aliased type
    pub target: AliasTarget,
}

/// What a type alias stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    /// One of the built-in basic types
    Builtin(BasicKind),
    /// A user-written type expression
    Type(TypeExprId),
}

/// The defining value of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclValue {
    /// Function body
    Body(StmtId),
    /// Variable initializer
    Init(ExprId),
}

impl Decl {
    /// Declared name
    #[must_use]
    pub const fn name(&self) -> Symbol {
        match self {
            Self::Function(func) => func.name,
            Self::Variable(var) => var.name,
            Self::TypeAlias(alias) => alias.name,
        }
    }

    /// Location of the declared name
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Function(func) => func.name_span,
            Self::Variable(var) => var.name_span,
            Self::TypeAlias(alias) => alias.span,
        }
    }

    /// Defining value, if any
    #[must_use]
    pub const fn value(&self) -> Option<DeclValue> {
        match self {
            Self::Function(func) => match func.body {
                Some(body) => Some(DeclValue::Body(body)),
                None => None,
            },
            Self::Variable(var) => match var.init {
                Some(init) => Some(DeclValue::Init(init)),
                None => None,
            },
            Self::TypeAlias(_) => None,
        }
    }

    /// Whether this declaration defines rather than merely declares its name
    ///
    /// Type aliases always define; functions and variables define only when
    /// they carry a body or an initializer.
    #[must_use]
    pub const fn is_definition(&self) -> bool {
        match self {
            Self::TypeAlias(_) => true,
            Self::Function(_) | Self::Variable(_) => self.value().is_some(),
        }
    }

    /// Human-readable kind, used in diagnostics
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Variable(_) => "variable",
            Self::TypeAlias(_) => "type",
        }
    }
}

/// Type expressions as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Reference to a type alias, e.g. `int`
    Named(IdentId),
    /// `elem[len]`; `len` is absent for parameters such as `int a[]`
    Array {
        /// Element type
        elem: TypeExprId,
        /// Location of `[`
        lbracket: Span,
        /// Declared length
        len: Option<u32>,
        /// Location of `]`
        rbracket: Span,
    },
    /// Function signature
    Func {
        /// Result type
        result: TypeExprId,
        /// Location of `(`
        lparen: Span,
        /// Parameters, each a [`Decl::Variable`]; empty for `(void)`
        params: Vec<DeclId>,
        /// Location of `)`
        rparen: Span,
    },
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `{ items }`
    Block {
        /// Location of `{`
        lbrace: Span,
        /// Declarations and statements in source order
        items: Vec<BlockItem>,
        /// Location of `}`
        rbrace: Span,
    },
    /// `;`
    Empty {
        /// Location of `;`
        span: Span,
    },
    /// `expr;`
    Expr {
        /// The evaluated expression
        expr: ExprId,
    },
    /// `if (cond) then else`
    If {
        /// Location of the `if` keyword
        if_span: Span,
        /// Condition
        cond: ExprId,
        /// Taken branch
        then_branch: StmtId,
        /// Optional `else` branch
        else_branch: Option<StmtId>,
    },
    /// `return value;`
    Return {
        /// Location of the `return` keyword
        span: Span,
        /// Returned expression
        value: Option<ExprId>,
    },
    /// `while (cond) body`
    While {
        /// Location of the `while` keyword
        span: Span,
        /// Loop condition
        cond: ExprId,
        /// Loop body
        body: StmtId,
    },
}

/// One item of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockItem {
    /// Local declaration
    Decl(DeclId),
    /// Statement
    Stmt(StmtId),
}

impl From<DeclId> for BlockItem {
    fn from(decl: DeclId) -> Self {
        Self::Decl(decl)
    }
}

impl From<StmtId> for BlockItem {
    fn from(stmt: StmtId) -> Self {
        Self::Stmt(stmt)
    }
}

/// Literal values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Integer literal
    Int(i64),
    /// Character literal
    Char(u8),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BinaryOp {
    /// Addition
    #[display("+")]
    Add,
    /// Subtraction
    #[display("-")]
    Sub,
    /// Multiplication
    #[display("*")]
    Mul,
    /// Division
    #[display("/")]
    Div,
    /// Less than
    #[display("<")]
    Lt,
    /// Greater than
    #[display(">")]
    Gt,
    /// Less than or equal
    #[display("<=")]
    Le,
    /// Greater than or equal
    #[display(">=")]
    Ge,
    /// Equal
    #[display("==")]
    Eq,
    /// Not equal
    #[display("!=")]
    Ne,
    /// Short-circuit logical and
    #[display("&&")]
    LogicalAnd,
    /// Assignment
    #[display("=")]
    Assign,
}

impl BinaryOp {
    /// Whether the operator produces a 0/1 truth value
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Gt | Self::Le | Self::Ge | Self::Eq | Self::Ne
        )
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnaryOp {
    /// Arithmetic negation
    #[display("-")]
    Neg,
    /// Logical not
    #[display("!")]
    Not,
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal constant
    Literal {
        /// Literal value
        kind: LiteralKind,
        /// Source location
        span: Span,
    },
    /// Binary operation, including assignment
    Binary {
        /// Operator
        op: BinaryOp,
        /// Location of the operator token
        op_span: Span,
        /// Left operand
        lhs: ExprId,
        /// Right operand
        rhs: ExprId,
    },
    /// `callee(args)`
    Call {
        /// Called name
        callee: IdentId,
        /// Location of `(`
        lparen: Span,
        /// Arguments
        args: Vec<ExprId>,
        /// Location of `)`
        rparen: Span,
    },
    /// Identifier use
    Ident(IdentId),
    /// `array[index]`
    Index {
        /// Indexed name
        array: IdentId,
        /// Location of `[`
        lbracket: Span,
        /// Index expression
        index: ExprId,
        /// Location of `]`
        rbracket: Span,
    },
    /// `(inner)`
    Paren {
        /// Location of `(`
        lparen: Span,
        /// Wrapped expression
        inner: ExprId,
        /// Location of `)`
        rparen: Span,
    },
    /// Unary operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Location of the operator token
        op_span: Span,
        /// Operand
        operand: ExprId,
    },
}

impl Ast {
    /// Creates an empty tree for `file_id` with the built-in type aliases allocated
    #[must_use]
    pub fn new(file_id: FileId, interner: Interner) -> Self {
        let mut decls = Arena::new();
        let mut builtin = |kind: BasicKind| {
            decls.alloc(Decl::TypeAlias(TypeAlias {
                name: interner.intern(&kind.to_string()),
                span: Span::BUILTIN,
                target: AliasTarget::Builtin(kind),
            }))
        };
        let builtins = Builtins {
            char: builtin(BasicKind::Char),
            int: builtin(BasicKind::Int),
            void: builtin(BasicKind::Void),
        };

        Self {
            decls,
            stmts: Arena::new(),
            exprs: Arena::new(),
            types: Arena::new(),
            idents: Arena::new(),
            file: SourceFile {
                file_id,
                decls: Vec::new(),
            },
            builtins,
            interner,
        }
    }

    /// Allocates a declaration
    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.alloc(decl)
    }

    /// Allocates a statement
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    /// Allocates an expression
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    /// Allocates a type expression
    pub fn alloc_type(&mut self, ty: TypeExpr) -> TypeExprId {
        self.types.alloc(ty)
    }

    /// Allocates an identifier use
    pub fn alloc_ident(&mut self, ident: Ident) -> IdentId {
        self.idents.alloc(ident)
    }

    /// Appends a top-level declaration
    pub fn push_decl(&mut self, decl: DeclId) {
        self.file.decls.push(decl);
    }

    /// Text of a symbol
    #[must_use]
    pub fn name(&self, sym: Symbol) -> String {
        self.interner.resolve(&sym)
    }

    /// Source location covered by an expression
    #[must_use]
    pub fn expr_span(&self, expr: ExprId) -> Span {
        match &self.exprs[expr] {
            Expr::Literal { span, .. } => *span,
            Expr::Binary { lhs, rhs, .. } => self.expr_span(*lhs).to(self.expr_span(*rhs)),
            Expr::Call { callee, rparen, .. } => self.idents[*callee].span.to(*rparen),
            Expr::Ident(ident) => self.idents[*ident].span,
            Expr::Index {
                array, rbracket, ..
            } => self.idents[*array].span.to(*rbracket),
            Expr::Paren { lparen, rparen, .. } => lparen.to(*rparen),
            Expr::Unary {
                op_span, operand, ..
            } => op_span.to(self.expr_span(*operand)),
        }
    }

    /// Whether `decl` is one of the built-in type aliases
    #[must_use]
    pub fn is_builtin(&self, decl: DeclId) -> bool {
        self.builtins.all().contains(&decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_are_preallocated() {
        let ast = Ast::new(FileId(0), Interner::new());
        let names: Vec<String> = ast
            .builtins
            .all()
            .iter()
            .map(|decl| ast.name(ast.decls[*decl].name()))
            .collect();
        assert_eq!(names, vec!["char", "int", "void"]);
        assert!(ast.builtins.all().iter().all(|decl| ast.is_builtin(*decl)));
        assert!(ast.file.decls.is_empty());
    }

    #[test]
    fn test_definition_classification() {
        let mut builder = AstBuilder::new();
        let int_ty = builder.ty("int");
        let tentative = builder.var_decl(int_ty, "x", None);
        let one = builder.int(1);
        let int_ty = builder.ty("int");
        let defined = builder.var_decl(int_ty, "x", Some(one));
        let ast = builder.finish();

        assert!(!ast.decls[tentative].is_definition());
        assert!(ast.decls[defined].is_definition());
        assert_eq!(ast.decls[defined].value(), Some(DeclValue::Init(one)));
        assert!(ast.decls[ast.builtins.int].is_definition());
    }

    #[test]
    fn test_expr_span_covers_operands() {
        let mut builder = AstBuilder::new();
        let lhs = builder.int(1);
        let rhs = builder.int(2);
        let sum = builder.binary(BinaryOp::Add, lhs, rhs);
        let ast = builder.finish();

        let span = ast.expr_span(sum);
        assert_eq!(span.start, ast.expr_span(lhs).start);
        assert_eq!(span.end, ast.expr_span(rhs).end);
    }
}
