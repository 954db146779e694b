//! The checking walk

use crate::{Type, TypeError, TypeTable, always_returns};
use rustc_hash::FxHashSet;
use uc_ast::{
    AliasTarget, Ast, BinaryOp, BlockItem, Decl, DeclId, Expr, ExprId, IdentId, LiteralKind,
    Stmt, StmtId, TypeExpr, TypeExprId, UnaryOp,
};
use uc_resolve::Resolution;
use uc_span::Span;

/// Checks a resolved file and returns the type of every expression
///
/// # Errors
///
/// Returns the first [`TypeError`] in source order.
#[tracing::instrument(level = "debug", skip_all, fields(decls = ast.file.decls.len()))]
pub fn check(ast: &Ast, resolution: &Resolution) -> Result<TypeTable, TypeError> {
    let mut checker = TypeChecker {
        ast,
        resolution,
        table: TypeTable::default(),
        in_progress: FxHashSet::default(),
        result: None,
    };
    for decl in &ast.file.decls {
        checker.check_global(*decl)?;
    }
    tracing::debug!(exprs = checker.table.exprs.len(), "type check finished");
    Ok(checker.table)
}

struct TypeChecker<'ctx> {
    ast: &'ctx Ast,
    resolution: &'ctx Resolution,
    table: TypeTable,
    /// Type aliases whose target is being computed, to reject cycles
    in_progress: FxHashSet<DeclId>,
    /// Result type of the function whose body is being checked
    result: Option<Type>,
}

impl TypeChecker<'_> {
    fn name(&self, decl: DeclId) -> String {
        self.ast.name(self.ast.decls[decl].name())
    }

    fn resolved(&self, ident: IdentId) -> Result<DeclId, TypeError> {
        self.resolution
            .decl_of(ident)
            .ok_or(TypeError::Unresolved {
                span: self.ast.idents[ident].span,
            })
    }

    // Declarations

    fn check_global(&mut self, decl: DeclId) -> Result<(), TypeError> {
        let ast = self.ast;
        let ty = self.decl_type(decl)?;

        // Every declaration of a name must agree with the one it is bound to.
        let name = self.ast.decls[decl].name();
        if let Some(binding) = self.resolution.file_binding(name)
            && binding != decl
        {
            let bound = self.decl_type(binding)?;
            if !bound.is_same_decl(&ty) {
                return Err(TypeError::mismatch(bound, ty, self.ast.decls[decl].span()));
            }
        }

        match &ast.decls[decl] {
            Decl::Function(func) => {
                if let Some(body) = func.body {
                    self.check_function_body(decl, &ty, body)?;
                }
                Ok(())
            }
            Decl::Variable(var) => self.check_variable(decl, &ty, var.init),
            Decl::TypeAlias(_) => Ok(()),
        }
    }

    fn check_function_body(
        &mut self,
        decl: DeclId,
        ty: &Type,
        body: StmtId,
    ) -> Result<(), TypeError> {
        let Type::Func { result, .. } = ty else {
            return Err(TypeError::Unsupported {
                construct: "function body with a non-function signature",
                span: self.ast.decls[decl].span(),
            });
        };
        tracing::debug!(function = %self.name(decl), "checking function body");

        self.result = Some((**result).clone());
        self.check_stmt(body)?;
        self.result = None;

        if !result.is_void() && !always_returns(self.ast, body) {
            return Err(TypeError::MissingReturn {
                name: self.name(decl),
                span: self.ast.decls[decl].span(),
            });
        }
        Ok(())
    }

    fn check_variable(
        &mut self,
        decl: DeclId,
        ty: &Type,
        init: Option<ExprId>,
    ) -> Result<(), TypeError> {
        let complete = match ty {
            Type::Array { elem, len } => len.is_some() && elem.is_scalar(),
            Type::Basic(_) => ty.is_scalar(),
            Type::Func { .. } => false,
        };
        if !complete {
            return Err(self.invalid_object(decl, ty));
        }

        if let Some(init) = init {
            let found = self.expr_type(init)?;
            if !ty.is_scalar() || !ty.is_compatible(&found) {
                return Err(TypeError::mismatch(ty, found, self.ast.expr_span(init)));
            }
        }
        Ok(())
    }

    fn check_local(&mut self, decl: DeclId) -> Result<(), TypeError> {
        let ast = self.ast;
        match &ast.decls[decl] {
            Decl::Variable(var) => {
                let init = var.init;
                let ty = self.decl_type(decl)?;
                self.check_variable(decl, &ty, init)
            }
            Decl::Function(func) => Err(TypeError::Unsupported {
                construct: "function declaration inside a function body",
                span: func.name_span,
            }),
            Decl::TypeAlias(alias) => Err(TypeError::Unsupported {
                construct: "type alias inside a function body",
                span: alias.span,
            }),
        }
    }

    fn invalid_object(&self, decl: DeclId, ty: &Type) -> TypeError {
        TypeError::InvalidObjectType {
            name: self.name(decl),
            ty: ty.to_string(),
            span: self.ast.decls[decl].span(),
        }
    }

    /// Declared type of `decl`, computed once
    fn decl_type(&mut self, decl: DeclId) -> Result<Type, TypeError> {
        if let Some(ty) = self.table.decls.get(&decl) {
            return Ok(ty.clone());
        }

        let ast = self.ast;
        let ty = match &ast.decls[decl] {
            Decl::Function(func) => {
                let ty = self.type_expr(func.sig)?;
                if let Type::Func { result, .. } = &ty
                    && !result.is_scalar()
                    && !result.is_void()
                {
                    return Err(self.invalid_object(decl, &ty));
                }
                ty
            }
            Decl::Variable(var) => self.type_expr(var.ty)?,
            Decl::TypeAlias(alias) => match alias.target {
                AliasTarget::Builtin(kind) => Type::Basic(kind),
                AliasTarget::Type(target) => {
                    if !self.in_progress.insert(decl) {
                        return Err(TypeError::NotAType {
                            name: self.name(decl),
                            span: alias.span,
                        });
                    }
                    let ty = self.type_expr(target);
                    self.in_progress.remove(&decl);
                    ty?
                }
            },
        };

        self.table.decls.insert(decl, ty.clone());
        Ok(ty)
    }

    /// Type denoted by a type expression
    fn type_expr(&mut self, ty: TypeExprId) -> Result<Type, TypeError> {
        let ast = self.ast;
        match &ast.types[ty] {
            TypeExpr::Named(ident) => {
                let decl = self.resolved(*ident)?;
                if !matches!(self.ast.decls[decl], Decl::TypeAlias(_)) {
                    let ident = self.ast.idents[*ident];
                    return Err(TypeError::NotAType {
                        name: self.ast.name(ident.name),
                        span: ident.span,
                    });
                }
                self.decl_type(decl)
            }
            TypeExpr::Array {
                elem,
                len,
                lbracket,
                ..
            } => {
                let elem_ty = self.type_expr(*elem)?;
                if !elem_ty.is_scalar() {
                    return Err(TypeError::mismatch("char or int", elem_ty, *lbracket));
                }
                Ok(Type::Array {
                    elem: Box::new(elem_ty),
                    len: *len,
                })
            }
            TypeExpr::Func { result, params, .. } => {
                let result = self.type_expr(*result)?;
                let mut param_tys = Vec::with_capacity(params.len());
                for param in params {
                    let param_ty = self.decl_type(*param)?;
                    let valid = match &param_ty {
                        Type::Array { elem, .. } => elem.is_scalar(),
                        other => other.is_scalar(),
                    };
                    if !valid {
                        return Err(self.invalid_object(*param, &param_ty));
                    }
                    param_tys.push(param_ty);
                }
                Ok(Type::Func {
                    result: Box::new(result),
                    params: param_tys,
                })
            }
        }
    }

    // Statements

    fn check_stmt(&mut self, stmt: StmtId) -> Result<(), TypeError> {
        let ast = self.ast;
        match &ast.stmts[stmt] {
            Stmt::Block { items, .. } => {
                for item in items {
                    match item {
                        BlockItem::Decl(decl) => self.check_local(*decl)?,
                        BlockItem::Stmt(inner) => self.check_stmt(*inner)?,
                    }
                }
                Ok(())
            }
            Stmt::Empty { .. } => Ok(()),
            Stmt::Expr { expr } => self.expr_type(*expr).map(drop),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_condition(*cond)?;
                self.check_stmt(*then_branch)?;
                match else_branch {
                    Some(else_branch) => self.check_stmt(*else_branch),
                    None => Ok(()),
                }
            }
            Stmt::While { cond, body, .. } => {
                self.check_condition(*cond)?;
                self.check_stmt(*body)
            }
            Stmt::Return { span, value } => self.check_return(*span, *value),
        }
    }

    fn check_condition(&mut self, cond: ExprId) -> Result<(), TypeError> {
        let ty = self.expr_type(cond)?;
        if ty.is_scalar() {
            Ok(())
        } else {
            Err(TypeError::mismatch("char or int", ty, self.ast.expr_span(cond)))
        }
    }

    fn check_return(&mut self, span: Span, value: Option<ExprId>) -> Result<(), TypeError> {
        let Some(expected) = self.result.clone() else {
            return Err(TypeError::Unsupported {
                construct: "return outside of a function body",
                span,
            });
        };
        let found = match value {
            Some(value) => self.expr_type(value)?,
            None => Type::VOID,
        };

        let matches = if expected.is_void() {
            value.is_none()
        } else {
            value.is_some() && expected.is_compatible(&found)
        };
        if matches {
            Ok(())
        } else {
            Err(TypeError::mismatch(expected, found, span))
        }
    }

    // Expressions

    /// Type of `expr`, computed once
    fn expr_type(&mut self, expr: ExprId) -> Result<Type, TypeError> {
        if let Some(ty) = self.table.exprs.get(&expr) {
            return Ok(ty.clone());
        }
        let ty = self.deduce(expr)?;
        self.table.exprs.insert(expr, ty.clone());
        Ok(ty)
    }

    fn deduce(&mut self, expr: ExprId) -> Result<Type, TypeError> {
        let ast = self.ast;
        match &ast.exprs[expr] {
            Expr::Literal { kind, span } => match kind {
                LiteralKind::Int(value) => {
                    if i32::try_from(*value).is_err() {
                        return Err(TypeError::LiteralOutOfRange {
                            value: *value,
                            span: *span,
                        });
                    }
                    Ok(Type::INT)
                }
                LiteralKind::Char(_) => Ok(Type::CHAR),
            },
            Expr::Ident(ident) => self.ident_type(*ident),
            Expr::Paren { inner, .. } => self.expr_type(*inner),
            Expr::Unary {
                op,
                op_span,
                operand,
            } => {
                let ty = self.expr_type(*operand)?;
                if !ty.is_scalar() {
                    return Err(TypeError::mismatch("char or int", ty, *op_span));
                }
                Ok(match op {
                    UnaryOp::Neg => ty,
                    UnaryOp::Not => Type::INT,
                })
            }
            Expr::Binary {
                op,
                op_span,
                lhs,
                rhs,
            } => self.binary_type(*op, *op_span, *lhs, *rhs),
            Expr::Call {
                callee,
                lparen,
                args,
                ..
            } => self.call_type(*callee, *lparen, args),
            Expr::Index {
                array,
                lbracket,
                index,
                ..
            } => {
                let ty = self.ident_type(*array)?;
                let Some(elem) = ty.element().cloned() else {
                    return Err(TypeError::NotIndexable {
                        name: self.ast.name(self.ast.idents[*array].name),
                        ty: ty.to_string(),
                        span: *lbracket,
                    });
                };
                let index_ty = self.expr_type(*index)?;
                if !index_ty.is_scalar() {
                    return Err(TypeError::mismatch(
                        "char or int",
                        index_ty,
                        self.ast.expr_span(*index),
                    ));
                }
                Ok(elem)
            }
        }
    }

    fn ident_type(&mut self, ident: IdentId) -> Result<Type, TypeError> {
        let decl = self.resolved(ident)?;
        if matches!(self.ast.decls[decl], Decl::TypeAlias(_)) {
            let ident = self.ast.idents[ident];
            return Err(TypeError::NotAValue {
                name: self.ast.name(ident.name),
                span: ident.span,
            });
        }
        self.decl_type(decl)
    }

    fn binary_type(
        &mut self,
        op: BinaryOp,
        op_span: Span,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<Type, TypeError> {
        let lhs_ty = self.expr_type(lhs)?;
        let rhs_ty = self.expr_type(rhs)?;

        if op == BinaryOp::Assign && !is_assignable(self.ast, lhs) {
            return Err(TypeError::NotAssignable {
                ty: lhs_ty.to_string(),
                span: op_span,
            });
        }
        if !lhs_ty.is_compatible(&rhs_ty) {
            return Err(TypeError::mismatch(lhs_ty, rhs_ty, op_span));
        }
        if !lhs_ty.is_scalar() {
            return Err(TypeError::mismatch("char or int", lhs_ty, op_span));
        }
        Ok(lhs_ty)
    }

    fn call_type(
        &mut self,
        callee: IdentId,
        lparen: Span,
        args: &[ExprId],
    ) -> Result<Type, TypeError> {
        let ty = self.ident_type(callee)?;
        let Type::Func { result, params } = ty else {
            return Err(TypeError::NotCallable {
                name: self.ast.name(self.ast.idents[callee].name),
                ty: ty.to_string(),
                span: lparen,
            });
        };

        if params.len() != args.len() {
            return Err(TypeError::ArgumentCount {
                name: self.ast.name(self.ast.idents[callee].name),
                expected: params.len(),
                found: args.len(),
                span: lparen,
            });
        }
        for (param, arg) in params.iter().zip(args) {
            let arg_ty = self.expr_type(*arg)?;
            if !param.is_compatible(&arg_ty) {
                return Err(TypeError::mismatch(param, arg_ty, self.ast.expr_span(*arg)));
            }
        }
        Ok(*result)
    }
}

/// Whether `expr` denotes storage that `=` may write to
fn is_assignable(ast: &Ast, expr: ExprId) -> bool {
    match &ast.exprs[expr] {
        Expr::Ident(_) | Expr::Index { .. } => true,
        Expr::Paren { inner, .. } => is_assignable(ast, *inner),
        Expr::Literal { .. } | Expr::Binary { .. } | Expr::Call { .. } | Expr::Unary { .. } => {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uc_ast::{AstBuilder, FuncDecl};

    fn run(builder: AstBuilder) -> (Ast, Result<TypeTable, TypeError>) {
        let ast = builder.finish();
        let resolution = uc_resolve::resolve(&ast).unwrap();
        let result = check(&ast, &resolution);
        (ast, result)
    }

    /// Wraps `items` in `int main(void) { items }`, appending `return 0;`
    fn in_main(builder: &mut AstBuilder, mut items: Vec<BlockItem>) {
        let zero = builder.int(0);
        let ret = builder.ret(Some(zero));
        items.push(ret.into());
        let body = builder.block(items);
        let result = builder.ty("int");
        let main = builder.func("main", result, Vec::new(), Some(body));
        builder.push(main);
    }

    fn global(builder: &mut AstBuilder, ty: &str, name: &str, len: Option<u32>) -> DeclId {
        let mut ty = builder.ty(ty);
        if len.is_some() {
            ty = builder.array_ty(ty, len);
        }
        let decl = builder.var_decl(ty, name, None);
        builder.push(decl)
    }

    #[test]
    fn test_literal_types() {
        let mut builder = AstBuilder::new();
        let int_lit = builder.int(7);
        let char_lit = builder.char(b'a');
        let first = builder.expr_stmt(int_lit);
        let second = builder.expr_stmt(char_lit);
        in_main(&mut builder, vec![first.into(), second.into()]);

        let (_, table) = run(builder);
        let table = table.unwrap();
        assert_eq!(table.expr(int_lit), Some(&Type::INT));
        assert_eq!(table.expr(char_lit), Some(&Type::CHAR));
    }

    #[test]
    fn test_global_assignment_types() {
        let mut builder = AstBuilder::new();
        global(&mut builder, "int", "x", None);
        let target = builder.name("x");
        let value = builder.int(42);
        let assign = builder.assign(target, value);
        let stmt = builder.expr_stmt(assign);
        in_main(&mut builder, vec![stmt.into()]);

        let (_, table) = run(builder);
        let table = table.unwrap();
        assert_eq!(table.expr(target), Some(&Type::INT));
        assert_eq!(table.expr(assign), Some(&Type::INT));
    }

    #[test]
    fn test_char_int_mismatch_at_operator() {
        let mut builder = AstBuilder::new();
        global(&mut builder, "char", "c", None);
        let lhs = builder.name("c");
        let rhs = builder.int(1);
        let sum = builder.binary(BinaryOp::Add, lhs, rhs);
        let stmt = builder.expr_stmt(sum);
        in_main(&mut builder, vec![stmt.into()]);

        let (ast, result) = run(builder);
        let Expr::Binary { op_span, .. } = ast.exprs[sum] else {
            panic!("expected binary expression");
        };
        assert_eq!(
            result.unwrap_err(),
            TypeError::TypeMismatch {
                expected: "char".to_string(),
                found: "int".to_string(),
                span: op_span,
            }
        );
    }

    #[test]
    fn test_index_of_scalar_is_not_indexable() {
        // int x; ... x[0];
        let mut builder = AstBuilder::new();
        global(&mut builder, "int", "x", None);
        let zero = builder.int(0);
        let index = builder.index("x", zero);
        let stmt = builder.expr_stmt(index);
        in_main(&mut builder, vec![stmt.into()]);

        let (ast, result) = run(builder);
        let Expr::Index { lbracket, .. } = ast.exprs[index] else {
            panic!("expected index expression");
        };
        let err = result.unwrap_err();
        assert!(matches!(err, TypeError::NotIndexable { .. }));
        assert_eq!(err.span(), lbracket);
    }

    #[test]
    fn test_call_of_variable_is_not_callable() {
        let mut builder = AstBuilder::new();
        global(&mut builder, "int", "x", None);
        let call = builder.call("x", Vec::new());
        let stmt = builder.expr_stmt(call);
        in_main(&mut builder, vec![stmt.into()]);

        let (ast, result) = run(builder);
        let Expr::Call { lparen, .. } = ast.exprs[call] else {
            panic!("expected call expression");
        };
        assert_eq!(
            result.unwrap_err(),
            TypeError::NotCallable {
                name: "x".to_string(),
                ty: "int".to_string(),
                span: lparen,
            }
        );
    }

    #[test]
    fn test_array_element_and_argument_decay() {
        // int sum(int v[], int n); int data[4]; ... sum(data, data[1]);
        let mut builder = AstBuilder::new();
        let elem = builder.ty("int");
        let param_ty = builder.array_ty(elem, None);
        let vec_param = builder.param(param_ty, "v");
        let count_ty = builder.ty("int");
        let count = builder.param(count_ty, "n");
        let result = builder.ty("int");
        let sum = builder.func("sum", result, vec![vec_param, count], None);
        builder.push(sum);
        global(&mut builder, "int", "data", Some(4));

        let whole = builder.name("data");
        let one = builder.int(1);
        let element = builder.index("data", one);
        let call = builder.call("sum", vec![whole, element]);
        let stmt = builder.expr_stmt(call);
        in_main(&mut builder, vec![stmt.into()]);

        let (_, table) = run(builder);
        let table = table.unwrap();
        assert_eq!(table.expr(element), Some(&Type::INT));
        assert_eq!(table.expr(call), Some(&Type::INT));
        assert_eq!(table.expr(whole).map(ToString::to_string), Some("int[4]".to_string()));
    }

    #[test]
    fn test_argument_count() {
        let mut builder = AstBuilder::new();
        let result = builder.ty("void");
        let func = builder.func("f", result, Vec::new(), None);
        builder.push(func);
        let one = builder.int(1);
        let call = builder.call("f", vec![one]);
        let stmt = builder.expr_stmt(call);
        in_main(&mut builder, vec![stmt.into()]);

        let (_, result) = run(builder);
        assert!(matches!(
            result,
            Err(TypeError::ArgumentCount {
                expected: 0,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_paren_assignable_binary_not() {
        let mut builder = AstBuilder::new();
        global(&mut builder, "int", "a", None);
        global(&mut builder, "int", "b", None);

        // (a) = 1;
        let target = builder.name("a");
        let wrapped = builder.paren(target);
        let one = builder.int(1);
        let ok = builder.assign(wrapped, one);
        let ok = builder.expr_stmt(ok);

        // a = b = 2;
        let inner_target = builder.name("b");
        let two = builder.int(2);
        let inner = builder.assign(inner_target, two);
        let outer_target = builder.name("a");
        let chained = builder.assign(outer_target, inner);
        let chained = builder.expr_stmt(chained);

        // (a = b) = 3;
        let lhs_a = builder.name("a");
        let lhs_b = builder.name("b");
        let lhs = builder.assign(lhs_a, lhs_b);
        let lhs = builder.paren(lhs);
        let three = builder.int(3);
        let bad = builder.assign(lhs, three);
        let bad_stmt = builder.expr_stmt(bad);
        in_main(&mut builder, vec![ok.into(), chained.into(), bad_stmt.into()]);

        let (ast, result) = run(builder);
        let Expr::Binary { op_span, .. } = ast.exprs[bad] else {
            panic!("expected assignment");
        };
        assert_eq!(
            result.unwrap_err(),
            TypeError::NotAssignable {
                ty: "int".to_string(),
                span: op_span,
            }
        );
    }

    #[test]
    fn test_logical_not_yields_int() {
        let mut builder = AstBuilder::new();
        let letter = builder.char(b'x');
        let negated = builder.unary(UnaryOp::Not, letter);
        let minus = builder.char(b'y');
        let neg = builder.unary(UnaryOp::Neg, minus);
        let first = builder.expr_stmt(negated);
        let second = builder.expr_stmt(neg);
        in_main(&mut builder, vec![first.into(), second.into()]);

        let (_, table) = run(builder);
        let table = table.unwrap();
        assert_eq!(table.expr(negated), Some(&Type::INT));
        assert_eq!(table.expr(neg), Some(&Type::CHAR));
    }

    #[test]
    fn test_negating_an_array_is_a_mismatch() {
        // int arr[2]; ... -arr;
        let mut builder = AstBuilder::new();
        global(&mut builder, "int", "arr", Some(2));
        let whole = builder.name("arr");
        let neg = builder.unary(UnaryOp::Neg, whole);
        let stmt = builder.expr_stmt(neg);
        in_main(&mut builder, vec![stmt.into()]);

        let (ast, result) = run(builder);
        let Expr::Unary { op_span, .. } = ast.exprs[neg] else {
            panic!("expected unary expression");
        };
        assert_eq!(
            result.unwrap_err(),
            TypeError::mismatch("char or int", "int[2]", op_span)
        );
    }

    #[test]
    fn test_logical_not_of_void_call_is_a_mismatch() {
        // void nothing(void); ... !nothing();
        let mut builder = AstBuilder::new();
        let result = builder.ty("void");
        let nothing = builder.func("nothing", result, Vec::new(), None);
        builder.push(nothing);
        let call = builder.call("nothing", Vec::new());
        let not = builder.unary(UnaryOp::Not, call);
        let stmt = builder.expr_stmt(not);
        in_main(&mut builder, vec![stmt.into()]);

        let (ast, result) = run(builder);
        let Expr::Unary { op_span, .. } = ast.exprs[not] else {
            panic!("expected unary expression");
        };
        assert_eq!(
            result.unwrap_err(),
            TypeError::mismatch("char or int", "void", op_span)
        );
    }

    #[test]
    fn test_int_literal_out_of_range_in_body() {
        // int main(void) { return 3000000000; }
        let mut builder = AstBuilder::new();
        let big = builder.int(3_000_000_000);
        let ret = builder.ret(Some(big));
        let body = builder.block(vec![ret.into()]);
        let result = builder.ty("int");
        let main = builder.func("main", result, Vec::new(), Some(body));
        builder.push(main);

        let (ast, result) = run(builder);
        assert_eq!(
            result.unwrap_err(),
            TypeError::LiteralOutOfRange {
                value: 3_000_000_000,
                span: ast.expr_span(big),
            }
        );
    }

    #[test]
    fn test_int_literal_at_range_limit() {
        let mut builder = AstBuilder::new();
        let max = builder.int(i64::from(i32::MAX));
        let stmt = builder.expr_stmt(max);
        in_main(&mut builder, vec![stmt.into()]);

        let (_, table) = run(builder);
        assert_eq!(table.unwrap().expr(max), Some(&Type::INT));
    }

    #[test]
    fn test_prototype_and_definition_differ_in_array_length() {
        // int f(int a[10]); int f(int a[]) { return 0; }
        let mut builder = AstBuilder::new();
        let elem = builder.ty("int");
        let sized = builder.array_ty(elem, Some(10));
        let param = builder.param(sized, "a");
        let result = builder.ty("int");
        let proto = builder.func("f", result, vec![param], None);
        builder.push(proto);

        let elem = builder.ty("int");
        let open = builder.array_ty(elem, None);
        let param = builder.param(open, "a");
        let zero = builder.int(0);
        let ret = builder.ret(Some(zero));
        let body = builder.block(vec![ret.into()]);
        let result = builder.ty("int");
        let def = builder.func("f", result, vec![param], Some(body));
        builder.push(def);

        let (_, table) = run(builder);
        let table = table.unwrap();
        assert_eq!(
            table.decl(proto).map(ToString::to_string),
            Some("int(int[10])".to_string())
        );
        assert_eq!(
            table.decl(def).map(ToString::to_string),
            Some("int(int[])".to_string())
        );
    }

    #[test]
    fn test_prototype_and_definition_differ_in_parameter_type() {
        // int f(int a); int f(char a) { return 0; }
        let mut builder = AstBuilder::new();
        let param_ty = builder.ty("int");
        let param = builder.param(param_ty, "a");
        let result = builder.ty("int");
        let proto = builder.func("f", result, vec![param], None);
        builder.push(proto);

        let param_ty = builder.ty("char");
        let param = builder.param(param_ty, "a");
        let zero = builder.int(0);
        let ret = builder.ret(Some(zero));
        let body = builder.block(vec![ret.into()]);
        let result = builder.ty("int");
        let def = builder.func("f", result, vec![param], Some(body));
        builder.push(def);

        let (ast, result) = run(builder);
        let err = result.unwrap_err();
        assert!(matches!(err, TypeError::TypeMismatch { .. }));
        assert_eq!(err.span(), ast.decls[proto].span());
    }

    #[test]
    fn test_body_with_non_function_signature_is_unsupported() {
        // A definition whose signature names `int` rather than a function type
        let mut builder = AstBuilder::new();
        let sig = builder.ty("int");
        let body = builder.block(Vec::new());
        let name = builder.sym("f");
        let mut ast = builder.finish();
        let name_span = Span::at(1000, 1);
        let func = ast.alloc_decl(Decl::Function(FuncDecl {
            name,
            name_span,
            sig,
            body: Some(body),
        }));
        ast.push_decl(func);

        let resolution = uc_resolve::resolve(&ast).unwrap();
        assert_eq!(
            check(&ast, &resolution).unwrap_err(),
            TypeError::Unsupported {
                construct: "function body with a non-function signature",
                span: name_span,
            }
        );
    }

    #[test]
    fn test_missing_return() {
        // int f(int a) { if (a) return 1; }
        let mut builder = AstBuilder::new();
        let param_ty = builder.ty("int");
        let param = builder.param(param_ty, "a");
        let cond = builder.name("a");
        let one = builder.int(1);
        let ret = builder.ret(Some(one));
        let branch = builder.if_(cond, ret, None);
        let body = builder.block(vec![branch.into()]);
        let result = builder.ty("int");
        let func = builder.func("f", result, vec![param], Some(body));
        builder.push(func);

        let (ast, result) = run(builder);
        assert_eq!(
            result.unwrap_err(),
            TypeError::MissingReturn {
                name: "f".to_string(),
                span: ast.decls[func].span(),
            }
        );
    }

    #[test]
    fn test_return_value_in_void_function() {
        let mut builder = AstBuilder::new();
        let one = builder.int(1);
        let ret = builder.ret(Some(one));
        let body = builder.block(vec![ret.into()]);
        let result = builder.ty("void");
        let func = builder.func("f", result, Vec::new(), Some(body));
        builder.push(func);

        let (ast, result) = run(builder);
        let Stmt::Return { span, .. } = ast.stmts[ret] else {
            panic!("expected return");
        };
        assert_eq!(result.unwrap_err(), TypeError::mismatch("void", "int", span));
    }

    #[test]
    fn test_conflicting_global_redeclaration() {
        let mut builder = AstBuilder::new();
        global(&mut builder, "int", "g", None);
        let second = global(&mut builder, "char", "g", None);

        let (ast, result) = run(builder);
        assert_eq!(
            result.unwrap_err(),
            TypeError::mismatch("int", "char", ast.decls[second].span())
        );
    }

    #[test]
    fn test_void_variable_rejected() {
        let mut builder = AstBuilder::new();
        let decl = global(&mut builder, "void", "nothing", None);

        let (ast, result) = run(builder);
        assert_eq!(result.unwrap_err().span(), ast.decls[decl].span());
    }

    #[test]
    fn test_typedef_target() {
        // typedef char byte; byte b; ... b = 'a';
        let mut builder = AstBuilder::new();
        let target = builder.ty("char");
        let alias = builder.typedef(target, "byte");
        builder.push(alias);
        let decl = global(&mut builder, "byte", "b", None);
        let lhs = builder.name("b");
        let rhs = builder.char(b'a');
        let assign = builder.assign(lhs, rhs);
        let stmt = builder.expr_stmt(assign);
        in_main(&mut builder, vec![stmt.into()]);

        let (_, table) = run(builder);
        assert_eq!(table.unwrap().decl(decl), Some(&Type::CHAR));
    }

    #[test]
    fn test_local_function_declaration_is_unsupported() {
        let mut builder = AstBuilder::new();
        let result = builder.ty("int");
        let inner = builder.func("g", result, Vec::new(), None);
        in_main(&mut builder, vec![inner.into()]);

        let (_, result) = run(builder);
        assert!(matches!(result, Err(TypeError::Unsupported { .. })));
    }

    #[test]
    fn test_check_is_deterministic() {
        let build = || {
            let mut builder = AstBuilder::new();
            global(&mut builder, "int", "x", None);
            let target = builder.name("x");
            let value = builder.int(42);
            let assign = builder.assign(target, value);
            let stmt = builder.expr_stmt(assign);
            in_main(&mut builder, vec![stmt.into()]);
            builder
        };
        let (_, first) = run(build());
        let (_, second) = run(build());
        assert_eq!(first.unwrap(), second.unwrap());
    }
}
