//! Const expression evaluator

use crate::{ConstError, ConstValue};
use uc_ast::{Ast, BinaryOp, Expr, ExprId, LiteralKind, UnaryOp};
use uc_span::Span;

/// Const expression evaluator
///
/// Folds initializer expressions of global variables into values.
#[derive(Debug, Clone, Copy)]
pub struct ConstEvaluator<'ast> {
    ast: &'ast Ast,
}

impl<'ast> ConstEvaluator<'ast> {
    /// Creates an evaluator over `ast`
    #[must_use]
    pub const fn new(ast: &'ast Ast) -> Self {
        Self { ast }
    }

    /// Evaluates an expression to a const value
    ///
    /// # Errors
    ///
    /// Returns `ConstError` if:
    /// - The expression refers to a name, calls a function, indexes or assigns
    /// - Division by zero occurs
    /// - The result does not fit its type
    pub fn eval_expr(&self, expr: ExprId) -> Result<ConstValue, ConstError> {
        match &self.ast.exprs[expr] {
            Expr::Literal { kind, span } => Self::eval_literal(*kind, *span),
            Expr::Paren { inner, .. } => self.eval_expr(*inner),
            Expr::Unary {
                op,
                op_span,
                operand,
            } => {
                let value = self.eval_expr(*operand)?;
                Self::eval_unary_op(*op, value, *op_span)
            }
            Expr::Binary {
                op: BinaryOp::Assign,
                ..
            }
            | Expr::Call { .. }
            | Expr::Ident(_)
            | Expr::Index { .. } => Err(ConstError::NotConstant {
                span: self.ast.expr_span(expr),
            }),
            Expr::Binary {
                op,
                op_span,
                lhs,
                rhs,
            } => {
                let left = self.eval_expr(*lhs)?;
                if *op == BinaryOp::LogicalAnd && !left.is_truthy() {
                    return Ok(left.truth(false));
                }
                let right = self.eval_expr(*rhs)?;
                Self::eval_binary_op(*op, left, right, *op_span)
            }
        }
    }

    fn eval_literal(kind: LiteralKind, span: Span) -> Result<ConstValue, ConstError> {
        match kind {
            LiteralKind::Int(value) => i32::try_from(value)
                .map(ConstValue::Int)
                .map_err(|_| ConstError::Overflow { ty: "int", span }),
            LiteralKind::Char(value) => Ok(ConstValue::Char(value as i8)),
        }
    }

    fn eval_unary_op(op: UnaryOp, value: ConstValue, span: Span) -> Result<ConstValue, ConstError> {
        match (op, value) {
            (UnaryOp::Neg, ConstValue::Int(value)) => value
                .checked_neg()
                .map(ConstValue::Int)
                .ok_or(ConstError::Overflow { ty: "int", span }),
            (UnaryOp::Neg, ConstValue::Char(value)) => value
                .checked_neg()
                .map(ConstValue::Char)
                .ok_or(ConstError::Overflow { ty: "char", span }),
            (UnaryOp::Not, value) => Ok(ConstValue::Int(i32::from(!value.is_truthy()))),
        }
    }

    fn eval_binary_op(
        op: BinaryOp,
        left: ConstValue,
        right: ConstValue,
        span: Span,
    ) -> Result<ConstValue, ConstError> {
        if left.kind() != right.kind() {
            return Err(ConstError::MixedOperands { span });
        }

        let (lhs, rhs) = (left.as_i64(), right.as_i64());
        let truth = |value: bool| Ok(left.truth(value));
        let result = match op {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => {
                if rhs == 0 {
                    return Err(ConstError::DivisionByZero { span });
                }
                lhs / rhs
            }
            BinaryOp::Lt => return truth(lhs < rhs),
            BinaryOp::Gt => return truth(lhs > rhs),
            BinaryOp::Le => return truth(lhs <= rhs),
            BinaryOp::Ge => return truth(lhs >= rhs),
            BinaryOp::Eq => return truth(lhs == rhs),
            BinaryOp::Ne => return truth(lhs != rhs),
            BinaryOp::LogicalAnd => return truth(lhs != 0 && rhs != 0),
            BinaryOp::Assign => return Err(ConstError::NotConstant { span }),
        };

        // Operands fit in 32 bits, so the i64 arithmetic above cannot overflow.
        match left {
            ConstValue::Int(_) => i32::try_from(result)
                .map(ConstValue::Int)
                .map_err(|_| ConstError::Overflow { ty: "int", span }),
            ConstValue::Char(_) => i8::try_from(result)
                .map(ConstValue::Char)
                .map_err(|_| ConstError::Overflow { ty: "char", span }),
        }
    }
}
