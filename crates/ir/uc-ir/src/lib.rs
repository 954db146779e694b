//! Block-structured three-address IR
//!
//! A [`Module`] owns functions and global variables in emission order. A
//! [`Function`] owns basic blocks; each [`BasicBlock`] holds value-producing
//! [`Instruction`]s followed by exactly one [`Terminator`] once the function
//! is finalized.
//!
//! # Architecture
//!
//! Construction is append-only and goes through a cursor on the function:
//!
//! - [`Function::start_body`] creates and selects the entry block
//! - [`Function::new_basic_block`] appends a block without selecting it
//! - [`Function::emit_inst`] appends to the selected block and returns a
//!   [`Value`] usable as an operand anywhere later in the function
//! - [`Function::terminate`] ends the selected block and closes the cursor
//! - [`Function::end_body`] synthesizes `ret void` where allowed and checks
//!   that every block is terminated
//!
//! Violating these rules yields an [`IrError`]; such errors are compiler
//! defects, never user errors.
//!
//! The [`Display`](std::fmt::Display) implementation of [`Module`] renders a
//! deterministic text form used for debugging and snapshot tests.

mod error;
mod function;
mod inst;
mod module;
mod printer;
mod types;
mod value;

pub use error::IrError;
pub use function::{BasicBlock, Function, Param};
pub use inst::{BinaryOp, CmpPred, InstKind, Instruction, Terminator, UnaryOp};
pub use module::{Global, Module};
pub use types::IrType;
pub use value::{BlockId, Constant, InstId, Value};
