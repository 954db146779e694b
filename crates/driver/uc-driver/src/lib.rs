//! Compilation driver for µC
//!
//! Runs the semantic phases over a parsed file and hands back everything they
//! computed:
//!
//! 1. [`uc_resolve::resolve`] binds identifier uses to declarations
//! 2. [`uc_ty::check`] types every declaration and expression
//! 3. [`uc_ir_lower::lower`] builds the IR module
//!
//! Each phase stops at its first error. The driver wraps that error in a
//! [`CompileError`], which knows whether the program or the compiler is at
//! fault and renders itself as a `codespan-reporting` diagnostic.
//!
//! # Usage
//!
//! ```ignore
//! uc_driver::init_tracing();
//! let config = uc_driver::Config::from_toml_str(&settings)?;
//! match uc_driver::compile(&ast, &config) {
//!     Ok(compilation) => println!("{}", compilation.module),
//!     Err(err) => {
//!         eprint!("{}", err.render("input.uc", &source, &config.diagnostics)?);
//!         std::process::exit(err.exit_code());
//!     }
//! }
//! ```

mod config;
mod error;
mod logging;

pub use config::{Config, ConfigError, DiagnosticStyle, DiagnosticsConfig};
pub use error::{CompileError, EXIT_INTERNAL_ERROR, EXIT_USER_ERROR};
pub use logging::{init_tracing, init_tracing_with};

use uc_ast::Ast;
use uc_ir::Module;
use uc_resolve::Resolution;
use uc_ty::TypeTable;

/// Results of a successful compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Identifier bindings and scopes
    pub resolution: Resolution,
    /// Types of declarations and expressions
    pub types: TypeTable,
    /// The lowered module
    pub module: Module,
}

/// Resolves, checks and lowers `ast`
///
/// A configured `log_filter` installs the tracing subscriber on first use.
///
/// # Errors
///
/// Returns the first error reported by any phase.
#[tracing::instrument(skip_all, fields(module = %config.module_name))]
pub fn compile(ast: &Ast, config: &Config) -> Result<Compilation, CompileError> {
    if config.log_filter.is_some() {
        init_tracing_with(config.log_filter.as_deref());
    }
    let resolution = uc_resolve::resolve(ast)?;
    let types = uc_ty::check(ast, &resolution)?;
    let module = uc_ir_lower::lower(ast, &resolution, &types, &config.module_name)?;
    tracing::debug!(
        functions = module.functions.len(),
        globals = module.globals.len(),
        "compilation finished"
    );
    Ok(Compilation {
        resolution,
        types,
        module,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uc_ast::{AstBuilder, BinaryOp};
    use uc_const_eval::ConstError;
    use uc_ir_lower::LowerError;
    use uc_ty::TypeError;

    #[test]
    fn test_compile_uses_configured_module_name() {
        let mut b = AstBuilder::new();
        let int = b.ty("int");
        let x = b.var_decl(int, "x", None);
        b.push(x);
        let ast = b.finish();

        let config = Config::from_toml_str("module_name = \"unit\"").unwrap();
        let compilation = compile(&ast, &config).unwrap();
        assert_eq!(compilation.module.name, "unit");
        assert_eq!(compilation.module.globals.len(), 1);
    }

    #[test]
    fn test_type_error_is_a_user_error() {
        // int f(void) { return 'a' + 1; }
        let mut b = AstBuilder::new();
        let letter = b.char(b'a');
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, letter, one);
        let ret = b.ret(Some(sum));
        let body = b.block(vec![ret.into()]);
        let int = b.ty("int");
        let f = b.func("f", int, Vec::new(), Some(body));
        b.push(f);
        let ast = b.finish();

        let err = compile(&ast, &Config::default()).unwrap_err();
        assert!(matches!(err, CompileError::Type(TypeError::TypeMismatch { .. })));
        assert_eq!(err.exit_code(), EXIT_USER_ERROR);
    }

    #[test]
    fn test_const_error_is_a_user_error() {
        // int z = 1 / 0;
        let mut b = AstBuilder::new();
        let one = b.int(1);
        let zero = b.int(0);
        let quotient = b.binary(BinaryOp::Div, one, zero);
        let int = b.ty("int");
        let z = b.var_decl(int, "z", Some(quotient));
        b.push(z);
        let ast = b.finish();

        let err = compile(&ast, &Config::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Lower(LowerError::Const(ConstError::DivisionByZero { .. }))
        ));
        assert!(!err.is_internal());
    }
}
