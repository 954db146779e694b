//! Const value representation

use uc_ast::BasicKind;

/// A compile-time constant of a scalar type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstValue {
    /// 32-bit `int`
    Int(i32),
    /// 8-bit signed `char`
    Char(i8),
}

impl ConstValue {
    /// Type of the value
    #[must_use]
    pub const fn kind(self) -> BasicKind {
        match self {
            Self::Int(_) => BasicKind::Int,
            Self::Char(_) => BasicKind::Char,
        }
    }

    /// Value widened to 64 bits
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Int(value) => i64::from(value),
            Self::Char(value) => i64::from(value),
        }
    }

    /// Whether the value counts as true in a condition
    #[must_use]
    pub const fn is_truthy(self) -> bool {
        match self {
            Self::Int(value) => value != 0,
            Self::Char(value) => value != 0,
        }
    }

    /// A truth value with the same type as `self`
    #[must_use]
    pub fn truth(self, value: bool) -> Self {
        match self {
            Self::Int(_) => Self::Int(i32::from(value)),
            Self::Char(_) => Self::Char(i8::from(value)),
        }
    }
}
