//! Text rendering of the IR

use crate::{Function, InstId, InstKind, Instruction, IrType, Module, Terminator, Value};
use rustc_hash::FxHashMap;
use std::fmt::{self, Display, Formatter};

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for global in &self.globals {
            writeln!(f, "@{} = global {} {}", global.name, global.ty, global.init)?;
        }
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }
        Ok(())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_declaration() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|param| param.ty.to_string())
                .collect();
            return writeln!(f, "declare {} @{}({})", self.result, self.name, params.join(", "));
        }

        let printer = FunctionPrinter::new(self);
        let params: Vec<String> = self
            .params
            .iter()
            .map(|param| format!("{} %{}", param.ty, param.name))
            .collect();
        writeln!(f, "define {} @{}({}) {{", self.result, self.name, params.join(", "))?;
        for (idx, block) in self.blocks.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", block.label)?;
            for inst in &block.insts {
                writeln!(f, "  {}", printer.inst(inst))?;
            }
            match &block.terminator {
                Some(term) => writeln!(f, "  {}", printer.terminator(term))?,
                None => writeln!(f, "  ; no terminator")?,
            }
        }
        writeln!(f, "}}")
    }
}

/// Names values of one function for printing
struct FunctionPrinter<'func> {
    func: &'func Function,
    names: FxHashMap<InstId, String>,
}

impl<'func> FunctionPrinter<'func> {
    fn new(func: &'func Function) -> Self {
        let mut names = FxHashMap::default();
        let mut next = 0;
        for inst in func.blocks.iter().flat_map(|block| &block.insts) {
            if let Some(name) = &inst.name {
                names.insert(inst.id, name.clone());
            } else if inst.ty != IrType::Void {
                names.insert(inst.id, next.to_string());
                next += 1;
            }
        }
        Self { func, names }
    }

    fn bare(&self, value: &Value) -> String {
        match value {
            Value::Const(constant) => constant.to_string(),
            Value::Inst { id, .. } => match self.names.get(id) {
                Some(name) => format!("%{name}"),
                None => format!("%<inst {}>", id.0),
            },
            Value::Param { index, .. } => match self.func.params.get(*index as usize) {
                Some(param) => format!("%{}", param.name),
                None => format!("%<param {index}>"),
            },
            Value::Global { name, .. } | Value::Function { name, .. } => format!("@{name}"),
        }
    }

    fn typed(&self, value: &Value) -> String {
        format!("{} {}", value.ty(), self.bare(value))
    }

    fn label(&self, block: crate::BlockId) -> String {
        self.func
            .blocks
            .get(block.0 as usize)
            .map_or_else(|| block.to_string(), |data| data.label.clone())
    }

    fn inst(&self, inst: &Instruction) -> String {
        let body = match &inst.kind {
            InstKind::Alloca(ty) => format!("alloca {ty}"),
            InstKind::Load(ptr) => format!("load {}, {}", inst.ty, self.typed(ptr)),
            InstKind::Store { value, ptr } => {
                format!("store {}, {}", self.typed(value), self.typed(ptr))
            }
            InstKind::Binary { op, lhs, rhs } => {
                format!("{op} {} {}, {}", lhs.ty(), self.bare(lhs), self.bare(rhs))
            }
            InstKind::Cmp { pred, lhs, rhs } => {
                format!("cmp {pred} {} {}, {}", lhs.ty(), self.bare(lhs), self.bare(rhs))
            }
            InstKind::Unary { op, operand } => format!("{op} {}", self.typed(operand)),
            InstKind::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|arg| self.typed(arg)).collect();
                format!("call {} {}({})", inst.ty, self.bare(callee), args.join(", "))
            }
            InstKind::ElementAddr { base, index } => {
                format!("elementaddr {}, {}", self.typed(base), self.typed(index))
            }
        };
        match self.names.get(&inst.id) {
            Some(name) => format!("%{name} = {body}"),
            None => body,
        }
    }

    fn terminator(&self, term: &Terminator) -> String {
        match term {
            Terminator::Br(target) => format!("br label %{}", self.label(*target)),
            Terminator::CondBr {
                cond,
                then_block,
                else_block,
            } => format!(
                "br {}, label %{}, label %{}",
                self.typed(cond),
                self.label(*then_block),
                self.label(*else_block)
            ),
            Terminator::Ret(None) => "ret void".to_string(),
            Terminator::Ret(Some(value)) => format!("ret {}", self.typed(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        CmpPred, Constant, Function, Global, InstKind, IrType, Module, Param, Terminator, Value,
    };
    use expect_test::expect;

    #[test]
    fn test_module_dump() {
        let mut module = Module::new("demo");
        let counter = Global {
            name: "counter".to_string(),
            ty: IrType::I32,
            init: Constant::zero(IrType::I32),
        };
        let counter_addr = counter.address();
        module.emit_global(counter);
        module.emit_global(Global {
            name: "buf".to_string(),
            ty: IrType::Array {
                elem: Box::new(IrType::I8),
                len: 4,
            },
            init: Constant::zero(IrType::Array {
                elem: Box::new(IrType::I8),
                len: 4,
            }),
        });
        module.emit_function(Function::new(
            "putint",
            IrType::Void,
            vec![Param {
                name: "n".to_string(),
                ty: IrType::I32,
            }],
        ));

        let mut func = Function::new(
            "pos",
            IrType::I32,
            vec![Param {
                name: "n".to_string(),
                ty: IrType::I32,
            }],
        );
        func.start_body().unwrap();
        let arg = func.param(0).unwrap();
        let test = func
            .emit_inst(
                InstKind::Cmp {
                    pred: CmpPred::Sgt,
                    lhs: arg.clone(),
                    rhs: Value::int(IrType::I32, 0),
                },
                IrType::I32,
            )
            .unwrap();
        let then_block = func.new_basic_block("if.then");
        let else_block = func.new_basic_block("if.else");
        func.terminate(Terminator::CondBr {
            cond: test,
            then_block,
            else_block,
        })
        .unwrap();

        func.select_block(then_block).unwrap();
        func.emit_inst(
            InstKind::Store {
                value: arg,
                ptr: counter_addr.clone(),
            },
            IrType::Void,
        )
        .unwrap();
        func.terminate(Terminator::Ret(Some(Value::int(IrType::I32, 1))))
            .unwrap();

        func.select_block(else_block).unwrap();
        let loaded = func
            .emit_inst(InstKind::Load(counter_addr), IrType::I32)
            .unwrap();
        func.terminate(Terminator::Ret(Some(loaded))).unwrap();
        func.end_body().unwrap();
        module.emit_function(func);

        expect![[r#"
            ; module demo
            @counter = global i32 0
            @buf = global [4 x i8] zeroinitializer

            declare void @putint(i32)

            define i32 @pos(i32 %n) {
            entry:
              %0 = cmp sgt i32 %n, 0
              br i32 %0, label %if.then, label %if.else

            if.then:
              store i32 %n, i32* @counter
              ret i32 1

            if.else:
              %1 = load i32, i32* @counter
              ret i32 %1
            }
        "#]]
        .assert_eq(&module.to_string());
    }
}
