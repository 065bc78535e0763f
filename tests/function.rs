#[macro_use]
mod common;

#[cfg(test)]
mod function {
    tests! {
        empty_body,
        "fun f() {} print f();",
        OK, "nil"
    }

    tests! {
        extra_arguments,
        "fun f(a, b) {}\nf(1, 2, 3, 4);",
        ERR, "[line 2:13] Error at ')': Expected 2 arguments but got 4"
    }

    tests! {
        missing_arguments,
        "fun f(a, b) {}\nf(1);",
        ERR, "[line 2:4] Error at ')': Expected 2 arguments but got 1"
    }

    tests! {
        mutual_recursion,
        r#"
        fun isEven(n) { if (n == 0) return true; return isOdd(n - 1); }
        fun isOdd(n) { if (n == 0) return false; return isEven(n - 1); }
        print isEven(10);
        print isOdd(7);
        "#,
        OK, "true", "true"
    }

    tests! {
        parameters,
        "fun sum(a, b) { return a + b; } print sum(1, 2); print sum(10, 20);",
        OK, "3", "30"
    }

    tests! {
        print,
        "fun foo() {} print foo; print clock;",
        OK, "<fn foo>", "<native fn clock>"
    }

    tests! {
        recursion,
        "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(8);",
        OK, "21"
    }

    // 257 identifiers is infeasible to hand-count, so the source and the expected
    // column are both computed here rather than spelled out as literal strings.
    #[test]
    fn too_many_arguments() {
        use assert_cmd::Command;
        use std::io::Write as _;

        let args: Vec<String> = (0..257).map(|i| format!("a{i}")).collect();
        let source = format!("fun f() {{}}\nf({});", args.join(", "));
        let culprit = &args[256];
        let prefix = format!("f({}, ", args[..256].join(", "));
        let column = prefix.len() + 1;

        let mut file = tempfile::Builder::new().suffix(".rocks").tempfile().unwrap();
        write!(file, "{source}").unwrap();

        Command::cargo_bin("rocks")
            .unwrap()
            .arg(file.path())
            .assert()
            .stderr(format!(
                "[line 2:{column}] Error at '{culprit}': Cannot have more than 256 arguments\n"
            ))
            .failure();
    }

    #[test]
    fn too_many_parameters() {
        use assert_cmd::Command;
        use std::io::Write as _;

        let params: Vec<String> = (0..257).map(|i| format!("a{i}")).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));
        let culprit = &params[256];
        let prefix = format!("fun f({}, ", params[..256].join(", "));
        let column = prefix.len() + 1;

        let mut file = tempfile::Builder::new().suffix(".rocks").tempfile().unwrap();
        write!(file, "{source}").unwrap();

        Command::cargo_bin("rocks")
            .unwrap()
            .arg(file.path())
            .assert()
            .stderr(format!(
                "[line 1:{column}] Error at '{culprit}': Cannot have more than 256 parameters\n"
            ))
            .failure();
    }
}
