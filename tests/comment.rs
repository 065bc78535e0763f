#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    tests! {
        line_at_eof,
        "print \"ok\"; // comment",
        OK, "ok"
    }

    tests! {
        only_line_comment,
        "// comment",
        OK
    }

    tests! {
        unicode,
        r#"
        // Unicode comment: © ± ∞ µ
        print "ok";
        "#,
        OK, "ok"
    }
}
