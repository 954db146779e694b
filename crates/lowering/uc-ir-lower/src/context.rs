//! Function body lowering

use crate::{LowerError, decl_type, lower_type, param_type};
use uc_ast::{
    Ast, BinaryOp, BlockItem, Decl, DeclId, Expr, ExprId, IdentId, LiteralKind, Stmt, StmtId,
    TypeExpr, UnaryOp,
};
use uc_ir::{
    BinaryOp as IrBinaryOp, BlockId, CmpPred, Function, InstKind, IrType, Param, Terminator, Value,
};
use uc_resolve::Resolution;
use uc_span::Span;
use uc_ty::{Type, TypeTable};

/// State for lowering one function
pub(crate) struct LoweringContext<'ctx> {
    ast: &'ctx Ast,
    resolution: &'ctx Resolution,
    types: &'ctx TypeTable,
    /// Function under construction
    func: Function,
}

impl<'ctx> LoweringContext<'ctx> {
    /// Lowers a function declaration to a definition, or to an external
    /// declaration when it has no body
    pub(crate) fn lower_function(
        ast: &'ctx Ast,
        resolution: &'ctx Resolution,
        types: &'ctx TypeTable,
        decl: DeclId,
    ) -> Result<Function, LowerError> {
        let Decl::Function(func_decl) = &ast.decls[decl] else {
            return Err(unexpected(ast, decl, "function", ast.decls[decl].span()));
        };
        let Type::Func {
            result,
            params: param_tys,
        } = decl_type(ast, types, decl)?
        else {
            return Err(unexpected(ast, decl, "function", func_decl.name_span));
        };
        let TypeExpr::Func {
            params: param_decls,
            ..
        } = &ast.types[func_decl.sig]
        else {
            return Err(unexpected(ast, decl, "function", func_decl.name_span));
        };

        let params = param_decls
            .iter()
            .zip(param_tys)
            .map(|(&param, ty)| Param {
                name: ast.name(ast.decls[param].name()),
                ty: param_type(ty),
            })
            .collect();
        let mut ctx = Self {
            ast,
            resolution,
            types,
            func: Function::new(ast.name(func_decl.name), lower_type(result), params),
        };

        let Some(body) = func_decl.body else {
            tracing::debug!(function = %ctx.func.name, "declaring external function");
            return Ok(ctx.func);
        };
        tracing::debug!(function = %ctx.func.name, "lowering function body");

        ctx.func.start_body()?;
        ctx.spill_params(param_decls, param_tys)?;
        ctx.lower_stmt(body)?;
        ctx.func.end_body()?;
        Ok(ctx.func)
    }

    /// Copies scalar parameters into stack slots; array parameters stay
    /// bound to the incoming pointer
    fn spill_params(&mut self, decls: &[DeclId], tys: &[Type]) -> Result<(), LowerError> {
        for (index, (&decl, ty)) in decls.iter().zip(tys).enumerate() {
            let Some(value) = self.func.param(index) else {
                break;
            };
            if let Type::Array { .. } = ty {
                self.func.bind(decl, value);
                continue;
            }
            let name = self.ast.name(self.ast.decls[decl].name());
            let slot = self.func.emit_alloca(Some((decl, &name)), lower_type(ty))?;
            self.store(value, slot)?;
        }
        Ok(())
    }

    // Statements

    fn lower_stmt(&mut self, stmt: StmtId) -> Result<(), LowerError> {
        let ast = self.ast;
        match &ast.stmts[stmt] {
            Stmt::Block { items, .. } => {
                for item in items {
                    // Everything after a return is unreachable.
                    if self.func.current_block().is_none() {
                        break;
                    }
                    match *item {
                        BlockItem::Decl(decl) => self.lower_local(decl)?,
                        BlockItem::Stmt(stmt) => self.lower_stmt(stmt)?,
                    }
                }
            }
            Stmt::Empty { .. } => {}
            Stmt::Expr { expr } => {
                self.lower_expr(*expr)?;
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => self.lower_if(*cond, *then_branch, *else_branch)?,
            Stmt::While { cond, body, .. } => self.lower_while(*cond, *body)?,
            Stmt::Return { value, .. } => {
                let value = value.map(|value| self.lower_expr(value)).transpose()?;
                self.func.terminate(Terminator::Ret(value))?;
            }
        }
        Ok(())
    }

    fn lower_local(&mut self, decl: DeclId) -> Result<(), LowerError> {
        let ast = self.ast;
        match &ast.decls[decl] {
            Decl::Variable(var) => {
                let ty = lower_type(self.decl_type(decl)?);
                let name = ast.name(var.name);
                let slot = self.func.emit_alloca(Some((decl, &name)), ty)?;
                if let Some(init) = var.init {
                    let value = self.lower_expr(init)?;
                    self.store(value, slot)?;
                }
                Ok(())
            }
            Decl::Function(func) => Err(LowerError::Unsupported {
                construct: "function declaration inside a function body",
                span: func.name_span,
            }),
            Decl::TypeAlias(alias) => Err(LowerError::Unsupported {
                construct: "type alias inside a function body",
                span: alias.span,
            }),
        }
    }

    fn lower_if(
        &mut self,
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    ) -> Result<(), LowerError> {
        let cond = self.lower_expr(cond)?;
        let then_block = self.func.new_basic_block("if.then");
        // Without an else branch the false edge needs the merge block right
        // away; otherwise it only exists if some branch falls through.
        let mut merge = None;
        let else_block = match else_branch {
            Some(_) => self.func.new_basic_block("if.else"),
            None => *merge.insert(self.func.new_basic_block("if.end")),
        };
        self.func.terminate(Terminator::CondBr {
            cond,
            then_block,
            else_block,
        })?;

        self.func.select_block(then_block)?;
        self.lower_stmt(then_branch)?;
        self.branch_to_merge(&mut merge)?;

        if let Some(else_branch) = else_branch {
            self.func.select_block(else_block)?;
            self.lower_stmt(else_branch)?;
            self.branch_to_merge(&mut merge)?;
        }

        if let Some(merge) = merge {
            self.func.select_block(merge)?;
        }
        Ok(())
    }

    fn branch_to_merge(&mut self, merge: &mut Option<BlockId>) -> Result<(), LowerError> {
        if self.func.current_block().is_none() {
            return Ok(());
        }
        let target = *merge.get_or_insert_with(|| self.func.new_basic_block("if.end"));
        self.func.terminate(Terminator::Br(target))?;
        Ok(())
    }

    fn lower_while(&mut self, cond: ExprId, body: StmtId) -> Result<(), LowerError> {
        let header = self.func.new_basic_block("while.cond");
        self.func.terminate(Terminator::Br(header))?;
        self.func.select_block(header)?;

        let cond = self.lower_expr(cond)?;
        let body_block = self.func.new_basic_block("while.body");
        let exit = self.func.new_basic_block("while.end");
        self.func.terminate(Terminator::CondBr {
            cond,
            then_block: body_block,
            else_block: exit,
        })?;

        self.func.select_block(body_block)?;
        self.lower_stmt(body)?;
        if self.func.current_block().is_some() {
            self.func.terminate(Terminator::Br(header))?;
        }

        self.func.select_block(exit)?;
        Ok(())
    }

    // Expressions

    fn lower_expr(&mut self, expr: ExprId) -> Result<Value, LowerError> {
        let ast = self.ast;
        match &ast.exprs[expr] {
            Expr::Literal { kind, .. } => Ok(match *kind {
                LiteralKind::Int(value) => Value::int(IrType::I32, value),
                LiteralKind::Char(byte) => {
                    Value::int(IrType::I8, i64::from(i8::from_ne_bytes([byte])))
                }
            }),
            Expr::Paren { inner, .. } => self.lower_expr(*inner),
            Expr::Ident(ident) => self.read_ident(*ident),
            Expr::Index { array, index, .. } => {
                let (addr, elem) = self.element_addr(*array, *index)?;
                self.load(addr, elem)
            }
            Expr::Call { callee, args, .. } => self.lower_call(*callee, args),
            Expr::Unary { op, operand, .. } => {
                let operand = self.lower_expr(*operand)?;
                let ty = match op {
                    UnaryOp::Neg => operand.ty().clone(),
                    UnaryOp::Not => IrType::I32,
                };
                let kind = InstKind::Unary {
                    op: (*op).into(),
                    operand,
                };
                Ok(self.func.emit_inst(kind, ty)?)
            }
            Expr::Binary {
                op: BinaryOp::Assign,
                lhs,
                rhs,
                ..
            } => self.lower_assign(*lhs, *rhs),
            Expr::Binary {
                op: BinaryOp::LogicalAnd,
                lhs,
                rhs,
                ..
            } => self.lower_and(*lhs, *rhs),
            Expr::Binary {
                op,
                op_span,
                lhs,
                rhs,
            } => {
                let lhs = self.lower_expr(*lhs)?;
                let rhs = self.lower_expr(*rhs)?;
                let ty = lhs.ty().clone();
                let kind = match CmpPred::try_from(*op) {
                    Ok(pred) => InstKind::Cmp { pred, lhs, rhs },
                    Err(op) => match IrBinaryOp::try_from(op) {
                        Ok(op) => InstKind::Binary { op, lhs, rhs },
                        Err(op) => {
                            return Err(LowerError::UnexpectedOperator { op, span: *op_span });
                        }
                    },
                };
                Ok(self.func.emit_inst(kind, ty)?)
            }
        }
    }

    /// Value of a name used as an operand
    fn read_ident(&mut self, ident: IdentId) -> Result<Value, LowerError> {
        let decl = self.resolved(ident)?;
        let span = self.ast.idents[ident].span;
        match self.decl_type(decl)? {
            Type::Func { .. } => Ok(self.function_value(decl, span)?.0),
            // Arrays decay to the address of their first element.
            Type::Array {
                elem,
                len: Some(_),
            } => {
                let base = self.address_of(decl, span)?;
                let kind = InstKind::ElementAddr {
                    base,
                    index: Value::int(IrType::I32, 0),
                };
                Ok(self.func.emit_inst(kind, lower_type(elem).ptr_to())?)
            }
            Type::Array { len: None, .. } => self.address_of(decl, span),
            scalar => {
                let addr = self.address_of(decl, span)?;
                self.load(addr, lower_type(scalar))
            }
        }
    }

    /// Storage of a variable: its stack slot, the incoming pointer of an
    /// array parameter, or the address of a global
    fn address_of(&self, decl: DeclId, span: Span) -> Result<Value, LowerError> {
        if let Some(value) = self.func.binding(decl) {
            return Ok(value.clone());
        }
        match &self.ast.decls[decl] {
            Decl::Variable(var) => Ok(Value::Global {
                name: self.ast.name(var.name),
                ty: lower_type(self.decl_type(decl)?).ptr_to(),
            }),
            Decl::Function(_) | Decl::TypeAlias(_) => {
                Err(unexpected(self.ast, decl, "variable", span))
            }
        }
    }

    /// Address of `array[index]` and the element type
    fn element_addr(
        &mut self,
        array: IdentId,
        index: ExprId,
    ) -> Result<(Value, IrType), LowerError> {
        let decl = self.resolved(array)?;
        let span = self.ast.idents[array].span;
        let Type::Array { elem, .. } = self.decl_type(decl)? else {
            return Err(unexpected(self.ast, decl, "array", span));
        };

        let base = self.address_of(decl, span)?;
        let index = self.lower_expr(index)?;
        let elem = lower_type(elem);
        let addr = self
            .func
            .emit_inst(InstKind::ElementAddr { base, index }, elem.clone().ptr_to())?;
        Ok((addr, elem))
    }

    /// Storage designated by an assignable expression
    fn lvalue(&mut self, expr: ExprId) -> Result<Value, LowerError> {
        let ast = self.ast;
        match &ast.exprs[expr] {
            Expr::Ident(ident) => {
                let decl = self.resolved(*ident)?;
                self.address_of(decl, ast.idents[*ident].span)
            }
            Expr::Index { array, index, .. } => Ok(self.element_addr(*array, *index)?.0),
            Expr::Paren { inner, .. } => self.lvalue(*inner),
            Expr::Literal { .. } | Expr::Binary { .. } | Expr::Call { .. } | Expr::Unary { .. } => {
                Err(LowerError::NotAnLvalue {
                    span: ast.expr_span(expr),
                })
            }
        }
    }

    /// Evaluates the right-hand side, stores it, and yields the stored value
    fn lower_assign(&mut self, lhs: ExprId, rhs: ExprId) -> Result<Value, LowerError> {
        let value = self.lower_expr(rhs)?;
        let ptr = self.lvalue(lhs)?;
        self.store(value.clone(), ptr)?;
        Ok(value)
    }

    /// Short-circuit `&&` through a stack slot holding the 0/1 result
    fn lower_and(&mut self, lhs: ExprId, rhs: ExprId) -> Result<Value, LowerError> {
        let lhs = self.lower_expr(lhs)?;
        let ty = lhs.ty().clone();
        let slot = self.func.emit_alloca(None, ty.clone())?;
        let lhs = self.is_nonzero(lhs)?;
        self.store(lhs.clone(), slot.clone())?;

        let rhs_block = self.func.new_basic_block("and.rhs");
        let end = self.func.new_basic_block("and.end");
        self.func.terminate(Terminator::CondBr {
            cond: lhs,
            then_block: rhs_block,
            else_block: end,
        })?;

        self.func.select_block(rhs_block)?;
        let rhs = self.lower_expr(rhs)?;
        let rhs = self.is_nonzero(rhs)?;
        self.store(rhs, slot.clone())?;
        self.func.terminate(Terminator::Br(end))?;

        self.func.select_block(end)?;
        self.load(slot, ty)
    }

    fn lower_call(&mut self, callee: IdentId, args: &[ExprId]) -> Result<Value, LowerError> {
        let decl = self.resolved(callee)?;
        let (callee, result) = self.function_value(decl, self.ast.idents[callee].span)?;
        let args = args
            .iter()
            .map(|&arg| self.lower_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.func.emit_inst(InstKind::Call { callee, args }, result)?)
    }

    /// A function as a call target, with its result type
    fn function_value(
        &self,
        decl: DeclId,
        span: Span,
    ) -> Result<(Value, IrType), LowerError> {
        match (&self.ast.decls[decl], self.decl_type(decl)?) {
            (Decl::Function(func), ty @ Type::Func { result, .. }) => Ok((
                Value::Function {
                    name: self.ast.name(func.name),
                    ty: lower_type(ty),
                },
                lower_type(result),
            )),
            _ => Err(unexpected(self.ast, decl, "function", span)),
        }
    }

    // Helpers

    fn is_nonzero(&mut self, value: Value) -> Result<Value, LowerError> {
        let ty = value.ty().clone();
        let kind = InstKind::Cmp {
            pred: CmpPred::Ne,
            lhs: value,
            rhs: Value::int(ty.clone(), 0),
        };
        Ok(self.func.emit_inst(kind, ty)?)
    }

    fn load(&mut self, ptr: Value, ty: IrType) -> Result<Value, LowerError> {
        Ok(self.func.emit_inst(InstKind::Load(ptr), ty)?)
    }

    fn store(&mut self, value: Value, ptr: Value) -> Result<(), LowerError> {
        self.func
            .emit_inst(InstKind::Store { value, ptr }, IrType::Void)?;
        Ok(())
    }

    fn resolved(&self, ident: IdentId) -> Result<DeclId, LowerError> {
        self.resolution
            .decl_of(ident)
            .ok_or(LowerError::Unresolved {
                span: self.ast.idents[ident].span,
            })
    }

    fn decl_type(&self, decl: DeclId) -> Result<&'ctx Type, LowerError> {
        decl_type(self.ast, self.types, decl)
    }
}

fn unexpected(ast: &Ast, decl: DeclId, expected: &'static str, span: Span) -> LowerError {
    LowerError::UnexpectedDecl {
        name: ast.name(ast.decls[decl].name()),
        expected,
        span,
    }
}
