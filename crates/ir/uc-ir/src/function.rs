//! Functions and basic blocks

use crate::{BlockId, InstId, InstKind, Instruction, IrError, IrType, Terminator, Value};
use rustc_hash::FxHashMap;
use uc_ast::DeclId;

/// A straight-line sequence of instructions ending in one terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    /// Handle of the block
    pub id: BlockId,
    /// Label, unique within the function
    pub label: String,
    /// Instructions in execution order
    pub insts: Vec<Instruction>,
    /// Terminator; only `None` while the function is under construction
    pub terminator: Option<Terminator>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Name, for printing
    pub name: String,
    /// Type
    pub ty: IrType,
}

/// A function definition, or a declaration when it has no blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Symbol name
    pub name: String,
    /// Result type
    pub result: IrType,
    /// Parameters
    pub params: Vec<Param>,
    /// Blocks; the first one is the entry
    pub blocks: Vec<BasicBlock>,
    /// Value currently bound to each source declaration
    bindings: FxHashMap<DeclId, Value>,
    /// Block receiving emitted instructions
    current: Option<BlockId>,
    next_inst: u32,
    /// Number of stack slots at the head of the entry block
    entry_slots: usize,
    /// Per-prefix counters for unique labels and value names
    names: FxHashMap<String, u32>,
}

impl Function {
    /// Creates a function without body
    #[must_use]
    pub fn new(name: impl Into<String>, result: IrType, params: Vec<Param>) -> Self {
        let mut names = FxHashMap::default();
        for param in &params {
            names.insert(param.name.clone(), 1);
        }
        Self {
            name: name.into(),
            result,
            params,
            blocks: Vec::new(),
            bindings: FxHashMap::default(),
            current: None,
            next_inst: 0,
            entry_slots: 0,
            names,
        }
    }

    /// Signature as a function type
    #[must_use]
    pub fn ty(&self) -> IrType {
        IrType::Func {
            result: Box::new(self.result.clone()),
            params: self.params.iter().map(|param| param.ty.clone()).collect(),
        }
    }

    /// Whether this is a declaration of an external function
    #[must_use]
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Value of the parameter at `index`
    #[must_use]
    pub fn param(&self, index: usize) -> Option<Value> {
        self.params.get(index).map(|param| Value::Param {
            index: u32::try_from(index).unwrap_or(u32::MAX),
            ty: param.ty.clone(),
        })
    }

    /// Creates and selects the entry block
    ///
    /// # Errors
    ///
    /// Fails if the function already has blocks.
    pub fn start_body(&mut self) -> Result<BlockId, IrError> {
        if !self.blocks.is_empty() {
            return Err(IrError::BodyAlreadyStarted {
                function: self.name.clone(),
            });
        }
        let entry = self.new_basic_block("entry");
        self.current = Some(entry);
        Ok(entry)
    }

    /// Appends a new block without selecting it
    ///
    /// The label is made unique by appending a counter when needed.
    pub fn new_basic_block(&mut self, label: &str) -> BlockId {
        let id = BlockId(u32::try_from(self.blocks.len()).unwrap_or(u32::MAX));
        let label = self.unique_name(label);
        self.blocks.push(BasicBlock {
            id,
            label,
            insts: Vec::new(),
            terminator: None,
        });
        id
    }

    /// Block currently receiving instructions, `None` once it was terminated
    #[must_use]
    pub const fn current_block(&self) -> Option<BlockId> {
        self.current
    }

    /// Directs emission into `block`
    ///
    /// # Errors
    ///
    /// Fails if the block does not exist or is already terminated.
    pub fn select_block(&mut self, block: BlockId) -> Result<(), IrError> {
        let data = self.block(block)?;
        if data.terminator.is_some() {
            return Err(IrError::TerminatorAlreadySet {
                function: self.name.clone(),
                label: data.label.clone(),
            });
        }
        self.current = Some(block);
        Ok(())
    }

    /// Looks up a block
    ///
    /// # Errors
    ///
    /// Fails if the handle does not belong to this function.
    pub fn block(&self, block: BlockId) -> Result<&BasicBlock, IrError> {
        self.blocks
            .get(block.0 as usize)
            .ok_or_else(|| IrError::UnknownBlock {
                function: self.name.clone(),
                block,
            })
    }

    /// Appends an instruction to the selected block
    ///
    /// # Errors
    ///
    /// Fails if no block is selected.
    pub fn emit_inst(&mut self, kind: InstKind, ty: IrType) -> Result<Value, IrError> {
        self.push_inst(kind, ty, None)
    }

    /// Appends an instruction and binds `decl` to its result
    ///
    /// Later reads of the declaration observe this value until it is rebound.
    ///
    /// # Errors
    ///
    /// Fails if no block is selected.
    pub fn emit_named_inst(
        &mut self,
        decl: DeclId,
        name: &str,
        kind: InstKind,
        ty: IrType,
    ) -> Result<Value, IrError> {
        let name = self.unique_name(name);
        let value = self.push_inst(kind, ty, Some(name))?;
        self.bind(decl, value.clone());
        Ok(value)
    }

    /// Allocates a stack slot of type `ty` at the head of the entry block
    ///
    /// Slots are placed before any other entry instruction regardless of the
    /// selected block, so a slot declared inside a loop is allocated once.
    /// With a declaration the slot is also bound to it.
    ///
    /// # Errors
    ///
    /// Fails if the body has not been started.
    pub fn emit_alloca(
        &mut self,
        binding: Option<(DeclId, &str)>,
        ty: IrType,
    ) -> Result<Value, IrError> {
        if self.blocks.is_empty() {
            return Err(IrError::NoCurrentBlock {
                function: self.name.clone(),
            });
        }
        let name = binding.map(|(_, name)| self.unique_name(name));
        let id = InstId(self.next_inst);
        let ptr_ty = ty.clone().ptr_to();
        let slot = self.entry_slots;
        self.blocks[0].insts.insert(
            slot,
            Instruction {
                id,
                kind: InstKind::Alloca(ty),
                ty: ptr_ty.clone(),
                name,
            },
        );
        self.entry_slots += 1;
        self.next_inst += 1;

        let value = Value::Inst { id, ty: ptr_ty };
        if let Some((decl, _)) = binding {
            self.bind(decl, value.clone());
        }
        Ok(value)
    }

    fn push_inst(
        &mut self,
        kind: InstKind,
        ty: IrType,
        name: Option<String>,
    ) -> Result<Value, IrError> {
        let id = InstId(self.next_inst);
        self.current_mut()?.insts.push(Instruction {
            id,
            kind,
            ty: ty.clone(),
            name,
        });
        self.next_inst += 1;
        Ok(Value::Inst { id, ty })
    }

    /// Binds `decl` to `value`, replacing any earlier binding
    pub fn bind(&mut self, decl: DeclId, value: Value) {
        self.bindings.insert(decl, value);
    }

    /// Value currently bound to `decl`
    #[must_use]
    pub fn binding(&self, decl: DeclId) -> Option<&Value> {
        self.bindings.get(&decl)
    }

    /// Ends the selected block with `term` and closes the cursor
    ///
    /// # Errors
    ///
    /// Fails if no block is selected.
    pub fn terminate(&mut self, term: Terminator) -> Result<(), IrError> {
        let block = self.current.ok_or_else(|| IrError::NoCurrentBlock {
            function: self.name.clone(),
        })?;
        self.set_terminator(block, term)?;
        self.current = None;
        Ok(())
    }

    /// Sets the terminator of `block`
    ///
    /// # Errors
    ///
    /// Fails if the block is unknown or already terminated.
    pub fn set_terminator(&mut self, block: BlockId, term: Terminator) -> Result<(), IrError> {
        let function = self.name.clone();
        let data = self
            .blocks
            .get_mut(block.0 as usize)
            .ok_or_else(|| IrError::UnknownBlock {
                function: function.clone(),
                block,
            })?;
        if data.terminator.is_some() {
            return Err(IrError::TerminatorAlreadySet {
                function,
                label: data.label.clone(),
            });
        }
        data.terminator = Some(term);
        Ok(())
    }

    /// Finalizes the body
    ///
    /// A selected, unterminated block receives an implicit `ret void`, which
    /// is only valid in a void function.
    ///
    /// # Errors
    ///
    /// Fails if the implicit return would be ill-typed or if any block is
    /// left without a terminator.
    pub fn end_body(&mut self) -> Result<(), IrError> {
        if let Some(block) = self.current.take() {
            if self.result != IrType::Void {
                return Err(IrError::MissingTerminator {
                    function: self.name.clone(),
                    label: self.block(block)?.label.clone(),
                    result: self.result.to_string(),
                });
            }
            self.set_terminator(block, Terminator::Ret(None))?;
        }

        if let Some(open) = self.blocks.iter().find(|block| block.terminator.is_none()) {
            return Err(IrError::UnterminatedBlock {
                function: self.name.clone(),
                label: open.label.clone(),
            });
        }
        tracing::trace!(function = %self.name, blocks = self.blocks.len(), "function finalized");
        Ok(())
    }

    fn current_mut(&mut self) -> Result<&mut BasicBlock, IrError> {
        let function = &self.name;
        self.current
            .and_then(|block| self.blocks.get_mut(block.0 as usize))
            .ok_or_else(|| IrError::NoCurrentBlock {
                function: function.clone(),
            })
    }

    fn unique_name(&mut self, base: &str) -> String {
        let count = self.names.entry(base.to_string()).or_insert(0);
        let name = if *count == 0 {
            base.to_string()
        } else {
            format!("{base}.{count}")
        };
        *count += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uc_ast::AstBuilder;

    fn void_fn() -> Function {
        Function::new("f", IrType::Void, Vec::new())
    }

    #[test]
    fn test_end_body_synthesizes_void_return() {
        let mut func = void_fn();
        let entry = func.start_body().unwrap();
        func.end_body().unwrap();

        assert_eq!(func.blocks[entry.0 as usize].terminator, Some(Terminator::Ret(None)));
        assert_eq!(func.current_block(), None);
    }

    #[test]
    fn test_end_body_rejects_fallthrough_in_int_function() {
        let mut func = Function::new("g", IrType::I32, Vec::new());
        func.start_body().unwrap();
        assert!(matches!(
            func.end_body(),
            Err(IrError::MissingTerminator { .. })
        ));
    }

    #[test]
    fn test_terminator_is_set_once() {
        let mut func = void_fn();
        let entry = func.start_body().unwrap();
        func.terminate(Terminator::Ret(None)).unwrap();

        assert!(matches!(
            func.set_terminator(entry, Terminator::Ret(None)),
            Err(IrError::TerminatorAlreadySet { .. })
        ));
        assert!(matches!(
            func.emit_inst(InstKind::Alloca(IrType::I32), IrType::I32.ptr_to()),
            Err(IrError::NoCurrentBlock { .. })
        ));
    }

    #[test]
    fn test_unreached_block_is_reported() {
        let mut func = void_fn();
        func.start_body().unwrap();
        func.new_basic_block("dead");
        assert_eq!(
            func.end_body(),
            Err(IrError::UnterminatedBlock {
                function: "f".to_string(),
                label: "dead".to_string(),
            })
        );
    }

    #[test]
    fn test_named_values_rebind() {
        let mut ast = AstBuilder::new();
        let ty = ast.ty("int");
        let decl = ast.var_decl(ty, "x", None);

        let mut func = void_fn();
        func.start_body().unwrap();
        let first = func
            .emit_named_inst(decl, "x", InstKind::Alloca(IrType::I32), IrType::I32.ptr_to())
            .unwrap();
        assert_eq!(func.binding(decl), Some(&first));

        let second = func
            .emit_named_inst(decl, "x", InstKind::Alloca(IrType::I32), IrType::I32.ptr_to())
            .unwrap();
        assert_ne!(first, second);
        assert_eq!(func.binding(decl), Some(&second));

        let names: Vec<_> = func.blocks[0]
            .insts
            .iter()
            .map(|inst| inst.name.clone())
            .collect();
        assert_eq!(names, vec![Some("x".to_string()), Some("x.1".to_string())]);
    }

    #[test]
    fn test_slots_are_hoisted_to_entry() {
        let mut func = void_fn();
        func.start_body().unwrap();
        let body = func.new_basic_block("while.body");
        func.terminate(Terminator::Br(body)).unwrap();
        func.select_block(body).unwrap();

        let slot = func.emit_alloca(None, IrType::I32).unwrap();
        func.emit_inst(
            InstKind::Store {
                value: Value::int(IrType::I32, 1),
                ptr: slot.clone(),
            },
            IrType::Void,
        )
        .unwrap();

        assert_eq!(func.blocks[0].insts.len(), 1);
        assert_eq!(func.blocks[0].insts[0].kind, InstKind::Alloca(IrType::I32));
        assert_eq!(slot.ty(), &IrType::I32.ptr_to());
        assert_eq!(func.blocks[1].insts.len(), 1);
        assert_eq!(func.current_block(), Some(body));
    }

    #[test]
    fn test_labels_are_unique() {
        let mut func = void_fn();
        let first = func.new_basic_block("if.then");
        let second = func.new_basic_block("if.then");
        assert_eq!(func.blocks[first.0 as usize].label, "if.then");
        assert_eq!(func.blocks[second.0 as usize].label, "if.then.1");
    }
}
