#[macro_use]
mod common;

#[cfg(test)]
mod misc {
    tests! {
        empty_file,
        "",
        OK
    }

    tests! {
        precedence,
        "print 2 + 3 * 4; print (2 + 3) * 4; print 2 * 3 - 4; print -2 + 2;",
        OK, "14", "20", "2", "0"
    }

    tests! {
        unexpected_character,
        "print 1 | 2;",
        ERR, "[line 1:9] Error: Unexpected character '|'"
    }
}
