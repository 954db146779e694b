//! Lowering of checked µC files to the block-structured IR
//!
//! # Architecture
//!
//! - [`lower`]: walks the file-scope declarations in source order and emits
//!   one global per variable name and one function per function name
//! - `LoweringContext`: lowers a single function body statement by statement
//!
//! Scalar locals and scalar parameters live in stack slots allocated in the
//! entry block; every read is a load and every assignment a store. Array
//! parameters are passed as pointers to their first element, and naming a
//! sized array in an expression yields the address of its first element.
//!
//! Global initializers are folded at compile time. A variable declared several
//! times at file scope becomes a single global, placed at its first
//! declaration and initialized from the declaration that defines it.
//!
//! # Usage
//!
//! ```ignore
//! let resolution = uc_resolve::resolve(&ast)?;
//! let types = uc_ty::check(&ast, &resolution)?;
//! let module = uc_ir_lower::lower(&ast, &resolution, &types, "main")?;
//! println!("{module}");
//! ```

mod context;
mod error;
mod types;

pub use error::LowerError;
pub use types::{lower_type, param_type};

use context::LoweringContext;
use rustc_hash::FxHashSet;
use uc_ast::{Ast, Decl, DeclId, DeclValue};
use uc_const_eval::ConstEvaluator;
use uc_ir::{Constant, Global, Module};
use uc_resolve::Resolution;
use uc_ty::{Type, TypeTable};

/// Lowers a resolved and type-checked file into a module named `module_name`
///
/// # Errors
///
/// Fails on global initializers that are not compile-time constants and on
/// constructs without a lowering. Any other error points at inconsistent
/// resolution or typing results.
#[tracing::instrument(skip_all, fields(module = module_name))]
pub fn lower(
    ast: &Ast,
    resolution: &Resolution,
    types: &TypeTable,
    module_name: &str,
) -> Result<Module, LowerError> {
    let mut module = Module::new(module_name);
    let mut globals = FxHashSet::default();

    for &decl in &ast.file.decls {
        let name = ast.decls[decl].name();
        let binding = resolution.file_binding(name).unwrap_or(decl);
        match &ast.decls[decl] {
            Decl::Variable(_) => {
                if globals.insert(name) {
                    module.emit_global(lower_global(ast, types, binding)?);
                }
            }
            Decl::Function(_) => {
                if decl == binding {
                    let function = LoweringContext::lower_function(ast, resolution, types, decl)?;
                    module.emit_function(function);
                }
            }
            Decl::TypeAlias(_) => {}
        }
    }

    tracing::trace!(ir = %module, "lowered module");
    Ok(module)
}

fn lower_global(ast: &Ast, types: &TypeTable, decl: DeclId) -> Result<Global, LowerError> {
    let ty = lower_type(decl_type(ast, types, decl)?);
    let init = match ast.decls[decl].value() {
        Some(DeclValue::Init(init)) => {
            let value = ConstEvaluator::new(ast).eval_expr(init)?;
            Constant::Int {
                ty: ty.clone(),
                value: value.as_i64(),
            }
        }
        Some(DeclValue::Body(_)) | None => Constant::zero(ty.clone()),
    };

    let name = ast.name(ast.decls[decl].name());
    tracing::debug!(global = %name, %ty, "lowering global");
    Ok(Global { name, ty, init })
}

/// Checked type of a declaration
pub(crate) fn decl_type<'types>(
    ast: &Ast,
    types: &'types TypeTable,
    decl: DeclId,
) -> Result<&'types Type, LowerError> {
    types.decl(decl).ok_or(LowerError::MissingType {
        node: "declaration",
        span: ast.decls[decl].span(),
    })
}
