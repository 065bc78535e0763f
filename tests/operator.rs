#[macro_use]
mod common;

#[cfg(test)]
mod operator {
    tests! {
        add,
        "print 1 + 2; print \"foo\" + \"bar\";",
        OK, "3", "foobar"
    }

    tests! {
        add_mismatched,
        "true + 1;",
        ERR, "[line 1:6] Error at '+': Operands must be two numbers or two strings"
    }

    tests! {
        comparison,
        "print 1 < 2; print 2 < 1; print 1 <= 1; print 2 > 1; print 1 >= 2;",
        OK, "true", "false", "true", "true", "false"
    }

    tests! {
        comparison_mismatched,
        "true < 1;",
        ERR, "[line 1:6] Error at '<': Operands must be numbers"
    }

    tests! {
        divide,
        "print 8 / 2; print 1 / 2;",
        OK, "4", "0.5"
    }

    tests! {
        multiply,
        "print 5 * 3; print 2 * 0;",
        OK, "15", "0"
    }

    tests! {
        negate,
        "print -3; print -(-3);",
        OK, "-3", "3"
    }

    tests! {
        negate_mismatched,
        "-\"str\";",
        ERR, "[line 1:1] Error at '-': Operand must be a number"
    }

    tests! {
        not,
        "print !true; print !false; print !nil; print !0;",
        OK, "false", "true", "true", "false"
    }

    tests! {
        not_equals,
        "print 1 != 2; print 1 != 1;",
        OK, "true", "false"
    }

    tests! {
        subtract,
        "print 4 - 1; print 1 - 4;",
        OK, "3", "-3"
    }
}
