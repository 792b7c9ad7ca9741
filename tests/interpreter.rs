mod common;

#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use rox::error::LoxError;
    use rox::value::Value;

    use crate::common::{messages, run, run_ok, session};

    #[test]
    fn arithmetic_follows_ieee() {
        assert_eq!(
            run_ok("print 1 + 1; print 7 / 2; print 0.1 + 0.2; print -3 * 2;"),
            "2\n3.5\n0.30000000000000004\n-6\n"
        );
        assert_eq!(run_ok("print 1 / 0; print -1 / 0;"), "Infinity\n-Infinity\n");
        assert_eq!(run_ok("print 0 / 0;"), "NaN\n");
        assert_eq!(run_ok("var n = 0 / 0; print n == n;"), "false\n");
    }

    #[test]
    fn strings_concatenate() {
        assert_eq!(run_ok("print \"a\" + \"b\";"), "ab\n");
    }

    #[test]
    fn mixed_addition_is_a_runtime_error() {
        let (output, report) = run("print \"1\" + 1;");

        assert_eq!(output, "");
        assert!(report.executed);
        assert!(report.had_runtime_error());
        assert_eq!(
            report.diagnostics[0].to_string(),
            "Operands must be two numbers or two strings.\n[line 1]"
        );
    }

    #[test]
    fn operand_type_errors() {
        let (_, report) = run("print -\"x\";");
        assert_eq!(messages(&report), vec!["Operand must be a number."]);

        let (_, report) = run("print 1 < \"2\";");
        assert_eq!(messages(&report), vec!["Operands must be numbers."]);
    }

    #[test]
    fn truthiness_and_equality() {
        assert_eq!(
            run_ok(
                "print !nil; print !0; print !\"\"; print nil == nil;
                 print 1 == \"1\"; print \"a\" == \"a\"; print nil == false;"
            ),
            "true\nfalse\nfalse\ntrue\nfalse\ntrue\nfalse\n"
        );
    }

    #[test]
    fn logical_operators_short_circuit_and_return_operands() {
        assert_eq!(
            run_ok(
                "print nil or \"yes\"; print 0 and 2; print false and undefinedName;
                 print true or undefinedName;"
            ),
            "yes\n2\nfalse\ntrue\n"
        );
    }

    #[test]
    fn runtime_error_stops_remaining_statements() {
        let (output, report) = run("print 1;\nprint undefinedName;\nprint 3;");

        assert_eq!(output, "1\n");
        assert_eq!(
            report.diagnostics[0].to_string(),
            "Undefined variable 'undefinedName'.\n[line 2]"
        );
    }

    #[test]
    fn assignment_to_undeclared_global_fails() {
        let (_, report) = run("ghost = 1;");
        assert_eq!(messages(&report), vec!["Undefined variable 'ghost'."]);
    }

    #[test]
    fn static_errors_prevent_execution() {
        let (output, report) = run("print 1;\n{ var a = a; }");

        assert_eq!(output, "");
        assert!(!report.executed);
        assert!(report.had_static_error());

        let (output, report) = run("print 1;\n{ var a = 1; var a = 2; }");
        assert_eq!(output, "");
        assert!(!report.executed);

        let (_, report) = run("print 1 $ 2;");
        assert!(matches!(report.diagnostics[0], LoxError::Lex { .. }));
        assert!(!report.executed);
    }

    #[test]
    fn block_scoping_and_shadowing() {
        assert_eq!(
            run_ok(
                "var a = \"global\";
                 {
                   var a = \"outer\";
                   {
                     var a = \"inner\";
                     print a;
                   }
                   print a;
                 }
                 print a;"
            ),
            "inner\nouter\nglobal\n"
        );
    }

    #[test]
    fn closures_bind_lexically() {
        assert_eq!(
            run_ok(
                "var a = \"global\";
                 {
                   fun show() { print a; }
                   show();
                   var a = \"block\";
                   show();
                 }"
            ),
            "global\nglobal\n"
        );
    }

    #[test]
    fn counter_closure() {
        assert_eq!(
            run_ok(
                "fun makeCounter() {
                   var i = 0;
                   fun count() { i = i + 1; print i; }
                   return count;
                 }
                 var counter = makeCounter();
                 counter();
                 counter();"
            ),
            "1\n2\n"
        );
    }

    #[test]
    fn recursion() {
        assert_eq!(
            run_ok(
                "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }
                 print fib(15);"
            ),
            "610\n"
        );
    }

    #[test]
    fn return_unwinds_through_loops() {
        assert_eq!(
            run_ok(
                "fun first() {
                   for (var i = 0; i < 10; i = i + 1) {
                     while (true) { if (i == 3) return i; i = i + 1; }
                   }
                 }
                 print first();
                 fun nothing() {}
                 print nothing();"
            ),
            "3\nnil\n"
        );
    }

    #[test]
    fn for_matches_while() {
        let for_output = run_ok("for (var i = 0; i < 3; i = i + 1) print i;");
        let while_output = run_ok("{ var i = 0; while (i < 3) { print i; i = i + 1; } }");

        assert_eq!(for_output, "0\n1\n2\n");
        assert_eq!(for_output, while_output);
    }

    #[test]
    fn huge_integral_numbers_use_exponent_form() {
        assert_eq!(
            run_ok("print 100000000000000000000000.0; print -100000000000000000000000; print 123456789012345678;"),
            "1e23\n-1e23\n123456789012345680\n"
        );
    }

    #[test]
    fn deep_recursion_completes() {
        assert_eq!(
            run_ok(
                "fun depth(n) { if (n == 0) return 0; return 1 + depth(n - 1); }
                 print depth(1500);"
            ),
            "1500\n"
        );
    }

    #[test]
    fn unbounded_recursion_is_a_runtime_error() {
        let (mut lox, out) = session();

        let report = lox.run("fun f() { f(); }\nf();");
        assert!(report.executed);
        assert_eq!(
            report.diagnostics[0].to_string(),
            "Stack overflow.\n[line 1]"
        );

        // The call depth unwinds with the error, so the session stays usable.
        assert!(lox.run("fun g(n) { if (n > 0) g(n - 1); } g(100); print \"ok\";").diagnostics.is_empty());
        assert_eq!(out.contents(), "ok\n");
    }

    #[test]
    fn arity_is_checked() {
        let (_, report) = run("fun f(a, b) {}\nf(1);");

        assert_eq!(
            report.diagnostics[0].to_string(),
            "Expected 2 arguments but got 1.\n[line 2]"
        );
    }

    #[test]
    fn only_functions_and_classes_are_callable() {
        let (_, report) = run("\"text\"();");
        assert_eq!(messages(&report), vec!["Can only call functions and classes."]);
    }

    #[test]
    fn values_print_by_kind() {
        assert_eq!(
            run_ok(
                "fun f() {} class C {} print f; print C; print C(); print clock; print 2.50;"
            ),
            "<fn f>\nC\nC instance\n<native fn>\n2.5\n"
        );
    }

    #[test]
    fn clock_returns_seconds() {
        assert_eq!(run_ok("print clock() > 1000000000;"), "true\n");
    }

    #[test]
    fn fields_and_methods() {
        assert_eq!(
            run_ok(
                "class Box {
                   describe() { return \"box of \" + this.item; }
                 }
                 var b = Box();
                 b.item = \"tea\";
                 print b.describe();
                 var m = b.describe;
                 b.item = \"rice\";
                 print m();"
            ),
            "box of tea\nbox of rice\n"
        );
    }

    #[test]
    fn fields_shadow_methods() {
        assert_eq!(
            run_ok(
                "class A { m() { return \"method\"; } }
                 var a = A();
                 a.m = \"field\";
                 print a.m;"
            ),
            "field\n"
        );
    }

    #[test]
    fn undefined_property() {
        let (_, report) = run("class A {}\nA().missing;");
        assert_eq!(
            report.diagnostics[0].to_string(),
            "Undefined property 'missing'.\n[line 2]"
        );
    }

    #[test]
    fn properties_need_instances() {
        let (_, report) = run("var x = 1; print x.y;");
        assert_eq!(messages(&report), vec!["Only instances have properties."]);

        let (_, report) = run("var x = 1; x.y = 2;");
        assert_eq!(messages(&report), vec!["Only instances have fields."]);
    }

    #[test]
    fn initializer_runs_and_returns_this() {
        assert_eq!(
            run_ok(
                "class P {
                   init(x) { this.x = x; if (x > 1) return; this.small = true; }
                 }
                 var p = P(5);
                 print p.x;
                 print p.init(0) == p;
                 print p.small;"
            ),
            "5\ntrue\ntrue\n"
        );
    }

    #[test]
    fn class_arity_comes_from_init() {
        let (_, report) = run("class P { init(a, b) {} }\nP(1);");
        assert_eq!(messages(&report), vec!["Expected 2 arguments but got 1."]);
    }

    #[test]
    fn super_calls_the_superclass_method() {
        assert_eq!(
            run_ok(
                "class A { name() { return \"A\"; } }
                 class B < A { name() { return super.name() + \"B\"; } }
                 print B().name();"
            ),
            "AB\n"
        );
    }

    #[test]
    fn methods_are_inherited_and_super_is_static() {
        assert_eq!(
            run_ok(
                "class A { m() { return \"A.m\"; } }
                 class B < A { m() { return \"B.m\"; } test() { return super.m(); } }
                 class C < B {}
                 print C().test();
                 print C().m();"
            ),
            "A.m\nB.m\n"
        );
    }

    #[test]
    fn superclass_must_be_a_class() {
        let (_, report) = run("var NotAClass = 1;\nclass B < NotAClass {}");
        assert_eq!(
            report.diagnostics[0].to_string(),
            "Superclass must be a class.\n[line 2]"
        );
    }

    #[test]
    fn session_keeps_globals_between_runs() {
        let (mut lox, out) = session();

        assert!(lox.run("var a = 1; fun inc() { a = a + 1; }").diagnostics.is_empty());
        assert!(lox.run("inc(); inc();").diagnostics.is_empty());
        assert!(lox.run("print a;").diagnostics.is_empty());

        assert_eq!(out.contents(), "3\n");
    }

    #[test]
    fn session_survives_errors() {
        let (mut lox, out) = session();

        assert!(lox.run("print nope;").had_runtime_error());
        assert!(lox.run("print (;").had_static_error());
        lox.run("print \"still here\";");

        assert_eq!(out.contents(), "still here\n");
    }

    fn shout(args: &[Value]) -> Result<Value, String> {
        match &args[0] {
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            other => Err(format!("Can't shout {}.", other)),
        }
    }

    #[test]
    fn natives_can_be_injected() {
        let (mut lox, out) = session();
        lox.interpreter_mut().define_native("shout", 1, shout);

        assert!(lox.run("print shout(\"hi\");").diagnostics.is_empty());
        assert_eq!(out.contents(), "HI\n");

        let report = lox.run("\n\nshout(1);");
        assert_eq!(
            report.diagnostics[0].to_string(),
            "Can't shout 1.\n[line 3]"
        );
    }
}
