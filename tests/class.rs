#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests! {
        empty,
        "class Foo {} print Foo;",
        OK, "<class Foo>"
    }

    tests! {
        inherit_self,
        "class Foo < Foo {}",
        ERR, "[line 1:13] Error at 'Foo': A class cannot inherit from itself"
    }

    tests! {
        inherited_method,
        r#"
        class Foo { foo() { print "in foo"; } }
        class Bar < Foo { bar() { print "in bar"; } }
        class Baz < Bar { baz() { print "in baz"; } }
        var baz = Baz();
        baz.foo();
        baz.bar();
        baz.baz();
        "#,
        OK, "in foo", "in bar", "in baz"
    }

    tests! {
        reference_self,
        r#"
        class Foo {
            getClassName() { print Foo; }
        }
        Foo().getClassName();
        "#,
        OK, "<class Foo>"
    }
}
