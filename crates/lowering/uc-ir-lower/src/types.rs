//! Semantic type → IR type mapping

use uc_ast::BasicKind;
use uc_ir::IrType;
use uc_ty::Type;

/// IR type of a variable or function of type `ty`
///
/// Sized arrays keep their shape. An unsized array can only be a parameter
/// and maps to a pointer to its element.
pub fn lower_type(ty: &Type) -> IrType {
    match ty {
        Type::Basic(kind) => basic(*kind),
        Type::Array {
            elem,
            len: Some(len),
        } => IrType::Array {
            elem: Box::new(lower_type(elem)),
            len: *len,
        },
        Type::Array { elem, len: None } => lower_type(elem).ptr_to(),
        Type::Func { result, params } => IrType::Func {
            result: Box::new(lower_type(result)),
            params: params.iter().map(param_type).collect(),
        },
    }
}

/// IR type of a parameter: every array parameter is passed as a pointer
pub fn param_type(ty: &Type) -> IrType {
    match ty {
        Type::Array { elem, .. } => lower_type(elem).ptr_to(),
        _ => lower_type(ty),
    }
}

const fn basic(kind: BasicKind) -> IrType {
    match kind {
        BasicKind::Char => IrType::I8,
        BasicKind::Int => IrType::I32,
        BasicKind::Void => IrType::Void,
    }
}
