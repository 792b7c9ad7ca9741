#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;

    use rox::ast::{Expr, Stmt};
    use rox::parser::Parser;
    use rox::resolver::Resolver;
    use rox::scanner::scan_tokens;

    fn parse_ok(source: &str) -> Vec<Stmt> {
        let (tokens, lex_errors) = scan_tokens(source);
        assert!(lex_errors.is_empty());

        let (statements, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty(), "parse errors: {:?}", errors);
        statements
    }

    fn resolve_errors(source: &str) -> Vec<String> {
        let statements = parse_ok(source);
        Resolver::new()
            .resolve(&statements)
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn valid_program_has_no_errors() {
        let errors = resolve_errors(
            "var a = 1;
             fun f(x) { var y = x; return y + a; }
             class A { init() { this.v = 1; return; } get() { return this.v; } }
             class B < A { get() { return super.get(); } }",
        );
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn self_referential_initializer() {
        assert_eq!(
            resolve_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn global_self_reference_is_allowed() {
        assert!(resolve_errors("var a = a;").is_empty());
    }

    #[test]
    fn duplicate_local() {
        assert_eq!(
            resolve_errors("{ var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
        assert_eq!(
            resolve_errors("fun f(a, a) {}"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn misplaced_return() {
        assert_eq!(
            resolve_errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
        assert_eq!(
            resolve_errors("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
    }

    #[test]
    fn misplaced_this_and_super() {
        assert_eq!(
            resolve_errors("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
        assert_eq!(
            resolve_errors("fun f() { super.m(); }"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
        assert_eq!(
            resolve_errors("class A { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn class_cannot_inherit_from_itself() {
        assert_eq!(
            resolve_errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn reports_every_error_in_one_pass() {
        let errors = resolve_errors("return;\n{ var b = b; }\nprint this;");
        assert_eq!(errors.len(), 3);
        assert!(errors[1].starts_with("[line 2]"));
    }

    #[test]
    fn records_depths_on_the_tree() {
        let statements = parse_ok("var g; { var a; { a; g; } }");
        assert!(Resolver::new().resolve(&statements).is_empty());

        let Stmt::Block(outer) = &statements[1] else {
            panic!("expected a block");
        };
        let Stmt::Block(inner) = &outer[1] else {
            panic!("expected a nested block");
        };

        let depth_of = |stmt: &Stmt| match stmt {
            Stmt::Expression(Expr::Variable { depth, .. }) => depth.get(),
            other => panic!("expected a variable expression, got {:?}", other),
        };

        assert_eq!(depth_of(&inner[0]), Some(1));
        assert_eq!(depth_of(&inner[1]), None);
    }
}
