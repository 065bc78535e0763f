#[macro_use]
mod common;

#[cfg(test)]
mod field {
    tests! {
        call_function_field,
        r#"
        class Foo {}
        fun bar(a, b) { print "bar"; print a; print b; }
        var foo = Foo();
        foo.bar = bar;
        foo.bar(1, 2);
        "#,
        OK, "bar", "1", "2"
    }

    tests! {
        call_nonfunction_field,
        "class Foo {}\nvar foo = Foo();\nfoo.bar = \"not fn\";\nfoo.bar();",
        ERR, "[line 4:9] Error at ')': Can only call functions and classes"
    }

    tests! {
        get_on_bool,
        "true.foo;",
        ERR, "[line 1:6] Error at 'foo': Only instances have properties"
    }

    tests! {
        get_on_class,
        "class Foo {}\nFoo.bar;",
        ERR, "[line 2:5] Error at 'bar': Only instances have properties"
    }

    tests! {
        many,
        r#"
        class Box {}
        var box = Box();
        box.a = "apple";
        box.b = "banana";
        print box.a;
        print box.b;
        "#,
        OK, "apple", "banana"
    }

    tests! {
        method,
        r#"
        class Foo {
            bar(arg) { print "got method"; print arg; }
        }
        Foo().bar("arg");
        "#,
        OK, "got method", "arg"
    }

    tests! {
        on_instance,
        r#"
        class Foo {}
        var foo = Foo();
        foo.bar = "bar value";
        foo.baz = "baz value";
        print foo.bar;
        print foo.baz;
        "#,
        OK, "bar value", "baz value"
    }

    tests! {
        set_on_bool,
        "true.foo = \"value\";",
        ERR, "[line 1:6] Error at 'foo': Only instances have fields"
    }

    tests! {
        undefined,
        "class Foo {}\nvar foo = Foo();\nprint foo.bar;",
        ERR, "[line 3:11] Error at 'bar': Undefined property 'bar'"
    }
}
