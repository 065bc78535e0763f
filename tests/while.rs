#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    tests! {
        closure_in_body,
        "var i = 1;\nwhile (i <= 3) {\n  var j = i;\n  print j;\n  i = i + 1;\n}",
        OK, "1", "2", "3"
    }

    tests! {
        return_inside,
        "fun f() {\n  while (true) {\n    return \"done\";\n  }\n}\nprint f();",
        OK, "done"
    }

    tests! {
        syntax,
        "var i = 0;\nwhile (i < 3) {\n  print i;\n  i = i + 1;\n}",
        OK, "0", "1", "2"
    }
}
