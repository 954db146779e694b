//! Modules and global variables

use crate::{Constant, Function, IrType, Value};

/// A global variable definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    /// Symbol name
    pub name: String,
    /// Type of the stored value
    pub ty: IrType,
    /// Initial contents
    pub init: Constant,
}

impl Global {
    /// Address of the global, as an operand
    #[must_use]
    pub fn address(&self) -> Value {
        Value::Global {
            name: self.name.clone(),
            ty: self.ty.clone().ptr_to(),
        }
    }
}

/// A translation unit: functions and globals in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    /// Module name
    pub name: String,
    /// Function definitions and declarations
    pub functions: Vec<Function>,
    /// Global variable definitions
    pub globals: Vec<Global>,
}

impl Module {
    /// Creates an empty module
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            globals: Vec::new(),
        }
    }

    /// Appends a function
    pub fn emit_function(&mut self, function: Function) {
        tracing::debug!(
            function = %function.name,
            blocks = function.blocks.len(),
            "emitted function"
        );
        self.functions.push(function);
    }

    /// Appends a global variable
    pub fn emit_global(&mut self, global: Global) {
        tracing::debug!(global = %global.name, ty = %global.ty, "emitted global");
        self.globals.push(global);
    }

    /// First function with the given name
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }

    /// First global with the given name
    #[must_use]
    pub fn global(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|global| global.name == name)
    }
}
