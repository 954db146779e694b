//! Semantic types

use std::fmt;
use uc_ast::BasicKind;

/// The type of a declaration or expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `char`, `int` or `void`
    Basic(BasicKind),
    /// Array of `elem`; `len` is absent for unsized array parameters
    Array {
        /// Element type
        elem: Box<Type>,
        /// Number of elements
        len: Option<u32>,
    },
    /// Function signature
    Func {
        /// Result type
        result: Box<Type>,
        /// Parameter types in order
        params: Vec<Type>,
    },
}

impl Type {
    /// `char`
    pub const CHAR: Self = Self::Basic(BasicKind::Char);
    /// `int`
    pub const INT: Self = Self::Basic(BasicKind::Int);
    /// `void`
    pub const VOID: Self = Self::Basic(BasicKind::Void);

    /// Whether the type is `char` or `int`
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Basic(BasicKind::Char | BasicKind::Int))
    }

    /// Whether the type is `void`
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Basic(BasicKind::Void))
    }

    /// Element type of an array
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Array { elem, .. } => Some(elem),
            Self::Basic(_) | Self::Func { .. } => None,
        }
    }

    /// Whether values of the two types may meet in an operation or assignment
    ///
    /// Basic types must be of the same kind and arrays must have compatible
    /// elements; array lengths are not compared. Function types are never
    /// compatible with anything.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Basic(lhs), Self::Basic(rhs)) => lhs == rhs,
            (Self::Array { elem: lhs, .. }, Self::Array { elem: rhs, .. }) => {
                lhs.is_compatible(rhs)
            }
            _ => false,
        }
    }

    /// Whether two declarations of one name agree
    ///
    /// Function signatures are compared result and parameter-wise, ignoring
    /// parameter array lengths. Array variables only have to agree on the
    /// length when both declarations give one.
    #[must_use]
    pub fn is_same_decl(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Func { result, params },
                Self::Func {
                    result: other_result,
                    params: other_params,
                },
            ) => {
                result.is_same_decl(other_result)
                    && params.len() == other_params.len()
                    && params
                        .iter()
                        .zip(other_params)
                        .all(|(lhs, rhs)| lhs.is_compatible(rhs))
            }
            (
                Self::Array { elem, len },
                Self::Array {
                    elem: other_elem,
                    len: other_len,
                },
            ) => {
                elem.is_same_decl(other_elem)
                    && (len.is_none() || other_len.is_none() || len == other_len)
            }
            _ => self.is_compatible(other),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(kind) => write!(f, "{kind}"),
            Self::Array {
                elem,
                len: Some(len),
            } => write!(f, "{elem}[{len}]"),
            Self::Array { elem, len: None } => write!(f, "{elem}[]"),
            Self::Func { result, params } => {
                write!(f, "{result}(")?;
                if params.is_empty() {
                    f.write_str("void")?;
                }
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
