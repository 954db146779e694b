//! End-to-end runs of resolve → check → lower over complete programs

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use integration_tests::{array_sum, compile, factorial, global_store, ident_uses};
    use pretty_assertions::assert_eq;
    use uc_ast::{AstBuilder, BinaryOp, BlockItem, Decl, Expr, ExprId};
    use uc_ty::Type;

    #[test]
    fn test_global_store_then_return() {
        let compilation = compile(&global_store()).unwrap();
        expect![[r#"
            ; module main
            @x = global i32 0

            define i32 @main() {
            entry:
              store i32 42, i32* @x
              %0 = load i32, i32* @x
              ret i32 %0
            }
        "#]]
        .assert_eq(&compilation.module.to_string());
    }

    #[test]
    fn test_recursive_factorial() {
        let compilation = compile(&factorial()).unwrap();
        expect![[r#"
            ; module main

            define i32 @fact(i32 %n) {
            entry:
              %n.1 = alloca i32
              store i32 %n, i32* %n.1
              %0 = load i32, i32* %n.1
              %1 = cmp slt i32 %0, 2
              br i32 %1, label %if.then, label %if.end

            if.then:
              ret i32 1

            if.end:
              %2 = load i32, i32* %n.1
              %3 = load i32, i32* %n.1
              %4 = sub i32 %3, 1
              %5 = call i32 @fact(i32 %4)
              %6 = mul i32 %2, %5
              ret i32 %6
            }
        "#]]
        .assert_eq(&compilation.module.to_string());
    }

    #[test]
    fn test_array_parameter_and_global_array() {
        let compilation = compile(&array_sum()).unwrap();
        expect![[r#"
            ; module main
            @data = global [3 x i32] zeroinitializer

            define i32 @sum(i32* %a, i32 %n) {
            entry:
              %n.1 = alloca i32
              %i = alloca i32
              %s = alloca i32
              store i32 %n, i32* %n.1
              store i32 0, i32* %i
              store i32 0, i32* %s
              br label %while.cond

            while.cond:
              %0 = load i32, i32* %i
              %1 = load i32, i32* %n.1
              %2 = cmp slt i32 %0, %1
              br i32 %2, label %while.body, label %while.end

            while.body:
              %3 = load i32, i32* %s
              %4 = load i32, i32* %i
              %5 = elementaddr i32* %a, i32 %4
              %6 = load i32, i32* %5
              %7 = add i32 %3, %6
              store i32 %7, i32* %s
              %8 = load i32, i32* %i
              %9 = add i32 %8, 1
              store i32 %9, i32* %i
              br label %while.cond

            while.end:
              %10 = load i32, i32* %s
              ret i32 %10
            }

            define i32 @main() {
            entry:
              %0 = elementaddr [3 x i32]* @data, i32 0
              store i32 4, i32* %0
              %1 = elementaddr [3 x i32]* @data, i32 1
              store i32 5, i32* %1
              %2 = elementaddr [3 x i32]* @data, i32 2
              store i32 6, i32* %2
              %3 = elementaddr [3 x i32]* @data, i32 0
              %4 = call i32 @sum(i32* %3, i32 3)
              ret i32 %4
            }
        "#]]
        .assert_eq(&compilation.module.to_string());
    }

    #[test]
    fn test_every_identifier_is_resolved() {
        for ast in [global_store(), factorial(), array_sum()] {
            let compilation = compile(&ast).unwrap();
            let uses = ident_uses(&ast);
            assert!(!uses.is_empty());
            for ident in uses {
                assert!(
                    compilation.resolution.decl_of(ident).is_some(),
                    "`{}` was not resolved",
                    ast.name(ast.idents[ident].name)
                );
            }
        }
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let ast = array_sum();
        let first = compile(&ast).unwrap();
        let second = compile(&ast).unwrap();

        assert_eq!(first.resolution, second.resolution);
        assert_eq!(first.types, second.types);
        assert_eq!(first.module, second.module);
        assert_eq!(first.module.to_string(), second.module.to_string());
    }

    #[test]
    fn test_literal_types() {
        // char c; int n; void f(void) { c = 'a'; n = 42; }
        let mut b = AstBuilder::new();
        let char_ = b.ty("char");
        let c = b.var_decl(char_, "c", None);
        b.push(c);
        let int = b.ty("int");
        let n = b.var_decl(int, "n", None);
        b.push(n);

        let letter = b.char(b'a');
        let target = b.name("c");
        let store_c = b.assign(target, letter);
        let store_c = b.expr_stmt(store_c);
        let number = b.int(42);
        let target = b.name("n");
        let store_n = b.assign(target, number);
        let store_n = b.expr_stmt(store_n);
        let body = b.block(vec![store_c.into(), store_n.into()]);
        let void = b.ty("void");
        let f = b.func("f", void, Vec::new(), Some(body));
        b.push(f);
        let ast = b.finish();

        let compilation = compile(&ast).unwrap();
        assert_eq!(compilation.types.expr(letter), Some(&Type::CHAR));
        assert_eq!(compilation.types.expr(number), Some(&Type::INT));
        expect![[r#"
            ; module main
            @c = global i8 0
            @n = global i32 0

            define void @f() {
            entry:
              store i8 97, i8* @c
              store i32 42, i32* @n
              ret void
            }
        "#]]
        .assert_eq(&compilation.module.to_string());
    }

    #[test]
    fn test_inner_declarations_shadow_outer_ones() {
        // int x;
        // int f(int x) { { char x; x = 'c'; } return x; }
        let mut b = AstBuilder::new();
        let int = b.ty("int");
        let global = b.var_decl(int, "x", None);
        b.push(global);

        let int = b.ty("int");
        let param = b.param(int, "x");
        let char_ = b.ty("char");
        let local = b.var_decl(char_, "x", None);
        let target = b.name("x");
        let letter = b.char(b'c');
        let store = b.assign(target, letter);
        let store = b.expr_stmt(store);
        let inner = b.block(vec![BlockItem::Decl(local), store.into()]);
        let read = b.name("x");
        let ret = b.ret(Some(read));
        let body = b.block(vec![inner.into(), ret.into()]);
        let int = b.ty("int");
        let f = b.func("f", int, vec![param], Some(body));
        b.push(f);
        let ast = b.finish();

        let compilation = compile(&ast).unwrap();
        let binding = |expr: ExprId| match ast.exprs[expr] {
            Expr::Ident(ident) => compilation.resolution.decl_of(ident),
            _ => None,
        };
        assert_eq!(binding(target), Some(local));
        assert_eq!(binding(read), Some(param));
        assert!(matches!(ast.decls[global], Decl::Variable(_)));

        let function = compilation.module.function("f").unwrap();
        let slots: Vec<_> = function.blocks[0]
            .insts
            .iter()
            .filter_map(|inst| inst.name.clone())
            .collect();
        assert_eq!(slots, vec!["x.1".to_string(), "x.2".to_string()]);
    }

    #[test]
    fn test_tentative_definitions_and_prototypes() {
        // int g; int g = 7; int g;
        // int h(int v); int h(int v) { return v + g; }
        let mut b = AstBuilder::new();
        for init in [None, Some(7), None] {
            let init = init.map(|value| b.int(value));
            let int = b.ty("int");
            let g = b.var_decl(int, "g", init);
            b.push(g);
        }
        let int = b.ty("int");
        let v = b.param(int, "v");
        let int = b.ty("int");
        let proto = b.func("h", int, vec![v], None);
        b.push(proto);

        let int = b.ty("int");
        let v = b.param(int, "v");
        let v_read = b.name("v");
        let g_read = b.name("g");
        let sum = b.binary(BinaryOp::Add, v_read, g_read);
        let ret = b.ret(Some(sum));
        let body = b.block(vec![ret.into()]);
        let int = b.ty("int");
        let def = b.func("h", int, vec![v], Some(body));
        b.push(def);
        let ast = b.finish();

        let compilation = compile(&ast).unwrap();
        expect![[r#"
            ; module main
            @g = global i32 7

            define i32 @h(i32 %v) {
            entry:
              %v.1 = alloca i32
              store i32 %v, i32* %v.1
              %0 = load i32, i32* %v.1
              %1 = load i32, i32* @g
              %2 = add i32 %0, %1
              ret i32 %2
            }
        "#]]
        .assert_eq(&compilation.module.to_string());
    }
}
