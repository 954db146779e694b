//! Operands

use crate::IrType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basic block handle, unique within a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Instruction handle, unique within a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// Constant operand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    /// Integer of the given type
    Int {
        /// `i8` or `i32`
        ty: IrType,
        /// Value, already within the range of `ty`
        value: i64,
    },
    /// All-zero aggregate
    ZeroInit(IrType),
}

impl Constant {
    /// Integer zero or zero-initialized aggregate of `ty`
    #[must_use]
    pub fn zero(ty: IrType) -> Self {
        if ty.is_integer() {
            Self::Int { ty, value: 0 }
        } else {
            Self::ZeroInit(ty)
        }
    }

    /// Type of the constant
    #[must_use]
    pub const fn ty(&self) -> &IrType {
        match self {
            Self::Int { ty, .. } | Self::ZeroInit(ty) => ty,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int { value, .. } => write!(f, "{value}"),
            Self::ZeroInit(_) => f.write_str("zeroinitializer"),
        }
    }
}

/// An operand: the result of an instruction or an immediate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Constant
    Const(Constant),
    /// Result of an instruction of the current function
    Inst {
        /// Producing instruction
        id: InstId,
        /// Result type
        ty: IrType,
    },
    /// Incoming parameter of the current function
    Param {
        /// Position in the parameter list
        index: u32,
        /// Parameter type
        ty: IrType,
    },
    /// Address of a global variable
    Global {
        /// Global name
        name: String,
        /// Pointer to the global's type
        ty: IrType,
    },
    /// A function of the module
    Function {
        /// Function name
        name: String,
        /// Function signature
        ty: IrType,
    },
}

impl Value {
    /// Integer constant of type `ty`
    #[must_use]
    pub const fn int(ty: IrType, value: i64) -> Self {
        Self::Const(Constant::Int { ty, value })
    }

    /// Type of the operand
    #[must_use]
    pub const fn ty(&self) -> &IrType {
        match self {
            Self::Const(constant) => constant.ty(),
            Self::Inst { ty, .. }
            | Self::Param { ty, .. }
            | Self::Global { ty, .. }
            | Self::Function { ty, .. } => ty,
        }
    }
}
