//! IR types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-level type of an IR value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrType {
    /// No value
    Void,
    /// 8-bit integer (`char`)
    I8,
    /// 32-bit integer (`int`)
    I32,
    /// Fixed-size array
    Array {
        /// Element type
        elem: Box<IrType>,
        /// Number of elements
        len: u32,
    },
    /// Pointer to a value of the inner type
    Ptr(Box<IrType>),
    /// Function signature
    Func {
        /// Result type
        result: Box<IrType>,
        /// Parameter types
        params: Vec<IrType>,
    },
}

impl IrType {
    /// Pointer to `self`
    #[must_use]
    pub fn ptr_to(self) -> Self {
        Self::Ptr(Box::new(self))
    }

    /// Type a pointer points to
    #[must_use]
    pub fn pointee(&self) -> Option<&Self> {
        match self {
            Self::Ptr(inner) => Some(inner),
            _ => None,
        }
    }

    /// Whether the type is an integer
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::I8 | Self::I32)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::I8 => f.write_str("i8"),
            Self::I32 => f.write_str("i32"),
            Self::Array { elem, len } => write!(f, "[{len} x {elem}]"),
            Self::Ptr(inner) => write!(f, "{inner}*"),
            Self::Func { result, params } => {
                write!(f, "{result} (")?;
                for (idx, param) in params.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                f.write_str(")")
            }
        }
    }
}
