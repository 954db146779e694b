//! Program fixtures and helpers for end-to-end tests of the µC middle-end
//!
//! Fixtures are built with [`AstBuilder`], standing in for the parser. Each
//! one documents the source program it corresponds to.

use std::convert::Infallible;
use uc_ast::visit::{self, Node, Visitor};
use uc_ast::{Ast, AstBuilder, BinaryOp, BlockItem, IdentId};
use uc_driver::{CompileError, Compilation, Config};

/// Runs the whole pipeline with the default configuration
///
/// # Errors
///
/// Returns the first error of any phase.
pub fn compile(ast: &Ast) -> Result<Compilation, CompileError> {
    uc_driver::compile(ast, &Config::default())
}

/// ```c
/// int x;
/// int main(void) { x = 42; return x; }
/// ```
#[must_use]
pub fn global_store() -> Ast {
    let mut b = AstBuilder::new();
    let int = b.ty("int");
    let x = b.var_decl(int, "x", None);
    b.push(x);

    let target = b.name("x");
    let value = b.int(42);
    let assign = b.assign(target, value);
    let store = b.expr_stmt(assign);
    let read = b.name("x");
    let ret = b.ret(Some(read));
    let body = b.block(vec![store.into(), ret.into()]);
    let int = b.ty("int");
    let main = b.func("main", int, Vec::new(), Some(body));
    b.push(main);
    b.finish()
}

/// ```c
/// int fact(int n) { if (n < 2) return 1; return n * fact(n - 1); }
/// ```
#[must_use]
pub fn factorial() -> Ast {
    let mut b = AstBuilder::new();
    let int = b.ty("int");
    let n = b.param(int, "n");

    let n_read = b.name("n");
    let two = b.int(2);
    let cond = b.binary(BinaryOp::Lt, n_read, two);
    let one = b.int(1);
    let base = b.ret(Some(one));
    let if_ = b.if_(cond, base, None);

    let n_read = b.name("n");
    let n_arg = b.name("n");
    let one = b.int(1);
    let pred = b.binary(BinaryOp::Sub, n_arg, one);
    let call = b.call("fact", vec![pred]);
    let product = b.binary(BinaryOp::Mul, n_read, call);
    let ret = b.ret(Some(product));

    let body = b.block(vec![if_.into(), ret.into()]);
    let int = b.ty("int");
    let fact = b.func("fact", int, vec![n], Some(body));
    b.push(fact);
    b.finish()
}

/// ```c
/// int sum(int a[], int n) {
///     int i; int s;
///     i = 0; s = 0;
///     while (i < n) { s = s + a[i]; i = i + 1; }
///     return s;
/// }
/// int data[3];
/// int main(void) { data[0] = 4; data[1] = 5; data[2] = 6; return sum(data, 3); }
/// ```
#[must_use]
pub fn array_sum() -> Ast {
    let mut b = AstBuilder::new();

    let int = b.ty("int");
    let a_ty = b.array_ty(int, None);
    let a = b.param(a_ty, "a");
    let int = b.ty("int");
    let n = b.param(int, "n");

    let int = b.ty("int");
    let i = b.var_decl(int, "i", None);
    let int = b.ty("int");
    let s = b.var_decl(int, "s", None);
    let i_init = assign_int(&mut b, "i", 0);
    let s_init = assign_int(&mut b, "s", 0);

    let i_read = b.name("i");
    let n_read = b.name("n");
    let cond = b.binary(BinaryOp::Lt, i_read, n_read);
    let s_read = b.name("s");
    let i_read = b.name("i");
    let element = b.index("a", i_read);
    let total = b.binary(BinaryOp::Add, s_read, element);
    let s_target = b.name("s");
    let accumulate = b.assign(s_target, total);
    let accumulate = b.expr_stmt(accumulate);
    let i_read = b.name("i");
    let one = b.int(1);
    let next = b.binary(BinaryOp::Add, i_read, one);
    let i_target = b.name("i");
    let step = b.assign(i_target, next);
    let step = b.expr_stmt(step);
    let loop_body = b.block(vec![accumulate.into(), step.into()]);
    let while_ = b.while_(cond, loop_body);

    let s_read = b.name("s");
    let ret = b.ret(Some(s_read));
    let body = b.block(vec![
        BlockItem::Decl(i),
        BlockItem::Decl(s),
        i_init.into(),
        s_init.into(),
        while_.into(),
        ret.into(),
    ]);
    let int = b.ty("int");
    let sum = b.func("sum", int, vec![a, n], Some(body));
    b.push(sum);

    let int = b.ty("int");
    let data_ty = b.array_ty(int, Some(3));
    let data = b.var_decl(data_ty, "data", None);
    b.push(data);

    let mut items = Vec::new();
    for (index, value) in [(0, 4), (1, 5), (2, 6)] {
        let index = b.int(index);
        let element = b.index("data", index);
        let value = b.int(value);
        let store = b.assign(element, value);
        items.push(BlockItem::from(b.expr_stmt(store)));
    }
    let data_arg = b.name("data");
    let len = b.int(3);
    let call = b.call("sum", vec![data_arg, len]);
    items.push(b.ret(Some(call)).into());
    let body = b.block(items);
    let int = b.ty("int");
    let main = b.func("main", int, Vec::new(), Some(body));
    b.push(main);
    b.finish()
}

/// `name = value;`
fn assign_int(b: &mut AstBuilder, name: &str, value: i64) -> uc_ast::StmtId {
    let target = b.name(name);
    let value = b.int(value);
    let assign = b.assign(target, value);
    b.expr_stmt(assign)
}

/// Every identifier use reachable from the file's declarations, in walk order
#[must_use]
pub fn ident_uses(ast: &Ast) -> Vec<IdentId> {
    struct Collector(Vec<IdentId>);

    impl Visitor for Collector {
        type Error = Infallible;

        fn enter(&mut self, _ast: &Ast, node: Node) -> Result<(), Self::Error> {
            if let Node::Ident(ident) = node {
                self.0.push(ident);
            }
            Ok(())
        }
    }

    let mut collector = Collector(Vec::new());
    match visit::walk_file(ast, &mut collector) {
        Ok(()) => collector.0,
        Err(never) => match never {},
    }
}
