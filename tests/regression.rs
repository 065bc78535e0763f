#[macro_use]
mod common;

#[cfg(test)]
mod regression {
    tests! {
        b40,
        "fun f() {} print f;",
        OK, "<fn f>"
    }

    tests! {
        b394,
        "class B {} print B;",
        OK, "<class B>"
    }
}
