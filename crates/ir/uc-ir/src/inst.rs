//! Instructions and terminators

use crate::{BlockId, InstId, IrType, Value};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uc_ast::{BinaryOp as AstBinaryOp, UnaryOp as AstUnaryOp};

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition
    #[display("add")]
    Add,
    /// Subtraction
    #[display("sub")]
    Sub,
    /// Multiplication
    #[display("mul")]
    Mul,
    /// Signed division
    #[display("sdiv")]
    SDiv,
}

/// Comparison predicates; results are 0 or 1 of the operand type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum CmpPred {
    /// Equal
    #[display("eq")]
    Eq,
    /// Not equal
    #[display("ne")]
    Ne,
    /// Signed less than
    #[display("slt")]
    Slt,
    /// Signed greater than
    #[display("sgt")]
    Sgt,
    /// Signed less than or equal
    #[display("sle")]
    Sle,
    /// Signed greater than or equal
    #[display("sge")]
    Sge,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Two's complement negation
    #[display("neg")]
    Neg,
    /// 1 if the operand is zero, 0 otherwise, as `i32`
    #[display("not")]
    Not,
}

impl TryFrom<AstBinaryOp> for BinaryOp {
    type Error = AstBinaryOp;

    fn try_from(op: AstBinaryOp) -> Result<Self, AstBinaryOp> {
        match op {
            AstBinaryOp::Add => Ok(Self::Add),
            AstBinaryOp::Sub => Ok(Self::Sub),
            AstBinaryOp::Mul => Ok(Self::Mul),
            AstBinaryOp::Div => Ok(Self::SDiv),
            other => Err(other),
        }
    }
}

impl TryFrom<AstBinaryOp> for CmpPred {
    type Error = AstBinaryOp;

    fn try_from(op: AstBinaryOp) -> Result<Self, AstBinaryOp> {
        match op {
            AstBinaryOp::Eq => Ok(Self::Eq),
            AstBinaryOp::Ne => Ok(Self::Ne),
            AstBinaryOp::Lt => Ok(Self::Slt),
            AstBinaryOp::Gt => Ok(Self::Sgt),
            AstBinaryOp::Le => Ok(Self::Sle),
            AstBinaryOp::Ge => Ok(Self::Sge),
            other => Err(other),
        }
    }
}

impl From<AstUnaryOp> for UnaryOp {
    fn from(op: AstUnaryOp) -> Self {
        match op {
            AstUnaryOp::Neg => Self::Neg,
            AstUnaryOp::Not => Self::Not,
        }
    }
}

/// Operation performed by an instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstKind {
    /// Stack slot for a value of the given type; yields its address
    Alloca(IrType),
    /// Read through a pointer
    Load(Value),
    /// Write `value` through `ptr`; yields nothing
    Store {
        /// Stored value
        value: Value,
        /// Destination address
        ptr: Value,
    },
    /// Arithmetic
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Value,
        /// Right operand
        rhs: Value,
    },
    /// Comparison
    Cmp {
        /// Predicate
        pred: CmpPred,
        /// Left operand
        lhs: Value,
        /// Right operand
        rhs: Value,
    },
    /// Negation or logical not
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Value,
    },
    /// Function call
    Call {
        /// Called function
        callee: Value,
        /// Arguments
        args: Vec<Value>,
    },
    /// Address of element `index` of the array at `base`
    ElementAddr {
        /// Pointer to an array or to its first element
        base: Value,
        /// Element index
        index: Value,
    },
}

/// A value-producing instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Handle of the produced value
    pub id: InstId,
    /// Operation
    pub kind: InstKind,
    /// Type of the produced value (`void` for stores and void calls)
    pub ty: IrType,
    /// Source-level name, unique within the function
    pub name: Option<String>,
}

/// Control transfer ending a basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminator {
    /// Unconditional branch
    Br(BlockId),
    /// Branch on a non-zero integer
    CondBr {
        /// Condition
        cond: Value,
        /// Target when non-zero
        then_block: BlockId,
        /// Target when zero
        else_block: BlockId,
    },
    /// Return, with a value unless the function returns void
    Ret(Option<Value>),
}

impl Terminator {
    /// Blocks this terminator may transfer control to
    #[must_use]
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Self::Br(target) => vec![*target],
            Self::CondBr {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            Self::Ret(_) => Vec::new(),
        }
    }
}
