use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Diagnostic, ErrorReporter, RuntimeError};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{NodeId, Token, Type};

/// The non-local control-flow signals a statement can produce: an ordinary
/// runtime error, or the two ways execution can jump out of its lexical
/// position (`return` out of a function, `break` out of a loop). Keeping
/// these distinct from [`RuntimeError`] means a loop can catch `Break`
/// without having to pattern-match every possible error.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Break,
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

pub type ExprResult = Result<Object, Unwind>;
pub type StmtResult = Result<(), Unwind>;

/// Walks the resolved AST, evaluating expressions and executing statements
/// against a chain of [`Environment`] frames. `globals` is the outermost
/// frame and never goes away; `environment` is whichever frame is currently
/// active (swapped out for the duration of a block, function call, or
/// method dispatch).
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Builds an interpreter that writes `print` output to `output` instead
    /// of stdout, so a caller (e.g. a test harness) can capture it.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::get_globals() {
            globals.borrow_mut().define(&native.name.lexeme.clone(), Object::from(native));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output }
    }

    /// Records that the reference identified by `id` resolves `depth`
    /// scopes out from wherever it is evaluated. Called by the resolver,
    /// never by the interpreter itself.
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Executes a program top to bottom. Stops at the first runtime error
    /// and reports it; a top-level `return`/`break` cannot occur (the
    /// resolver rejects it), so any other `Unwind` variant reaching here
    /// would be a bug in the resolver.
    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut ErrorReporter) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Unwind::Error(error)) => {
                    error.throw(reporter);
                    return;
                }
                Err(other) => unreachable!("resolver should prevent top-level {other:?}"),
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> StmtResult {
        stmt.accept(self)
    }

    /// Executes `statements` with `environment` as the active frame,
    /// restoring the previous frame on every exit path (including errors
    /// and non-local control flow).
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> StmtResult {
        let previous = mem::replace(&mut self.environment, environment);

        let result = statements.iter().try_for_each(|statement| self.execute(statement));

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> ExprResult {
        expr.accept(self)
    }

    fn look_up_variable(&mut self, id: NodeId, name: &Token) -> ExprResult {
        match self.locals.get(&id) {
            Some(&distance) => Ok(self.environment.borrow().get_at(distance, name)?),
            None => Ok(self.globals.borrow().get(name)?),
        }
    }

    fn call(&mut self, callee: Object, paren: &Token, arguments: Vec<Object>) -> ExprResult {
        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(native) => {
                // Native functions accept any argument count; clock/input
                // ignore their arguments entirely.
                arguments.len()
            }
            Object::Class(class) => class.borrow().arity(),
            _ => {
                return Err(RuntimeError {
                    token: paren.clone(),
                    message: "Can only call functions and classes".to_string(),
                }
                .into());
            }
        };

        if arity != arguments.len() && !matches!(callee, Object::NativeFunction(_)) {
            return Err(RuntimeError {
                token: paren.clone(),
                message: format!("Expected {arity} arguments but got {}", arguments.len()),
            }
            .into());
        }

        let result = match &callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(native) => native.call(self, arguments),
            Object::Class(class) => {
                let class = Rc::clone(class);
                class.borrow().call(self, arguments)
            }
            _ => unreachable!(),
        };

        Ok(result?)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Lox truthiness: everything is truthy except `nil` and `false`.
fn is_truthy(value: &Object) -> bool {
    match value {
        Object::Literal(Literal::Nil) => false,
        Object::Literal(Literal::Bool(b)) => *b,
        _ => true,
    }
}

impl ExprVisitor<ExprResult> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> ExprResult {
        Ok(Object::from(literal.clone()))
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) -> ExprResult {
        self.evaluate(&grouping.expr)
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) -> ExprResult {
        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Minus => (-right).ok_or_else(|| RuntimeError {
                token: unary.operator.clone(),
                message: "Operand must be a number".to_string(),
            }),
            Type::Bang => Ok(Object::from(!is_truthy(&right))),
            _ => unreachable!(),
        }
        .map_err(Unwind::from)
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) -> ExprResult {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        let number_error = || RuntimeError {
            token: binary.operator.clone(),
            message: "Operands must be numbers".to_string(),
        };

        match binary.operator.r#type {
            Type::Plus => (left + right).ok_or_else(|| RuntimeError {
                token: binary.operator.clone(),
                message: "Operands must be two numbers or two strings".to_string(),
            }),
            Type::Minus => (left - right).ok_or_else(number_error),
            Type::Slash => (left / right).ok_or_else(number_error),
            Type::Star => (left * right).ok_or_else(number_error),
            Type::Greater => left
                .partial_cmp(&right)
                .map(|ordering| Object::from(ordering.is_gt()))
                .ok_or_else(number_error),
            Type::GreaterEqual => left
                .partial_cmp(&right)
                .map(|ordering| Object::from(ordering.is_ge()))
                .ok_or_else(number_error),
            Type::Less => left
                .partial_cmp(&right)
                .map(|ordering| Object::from(ordering.is_lt()))
                .ok_or_else(number_error),
            Type::LessEqual => left
                .partial_cmp(&right)
                .map(|ordering| Object::from(ordering.is_le()))
                .ok_or_else(number_error),
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!(),
        }
        .map_err(Unwind::from)
    }

    fn visit_logical_expr(&mut self, logical: &LogicalData) -> ExprResult {
        let left = self.evaluate(&logical.left)?;

        // Short-circuit: the result is whichever operand decided it, not a
        // coerced boolean.
        if logical.operator.r#type == Type::Or {
            if is_truthy(&left) {
                return Ok(left);
            }
        } else if !is_truthy(&left) {
            return Ok(left);
        }

        self.evaluate(&logical.right)
    }

    fn visit_variable_expr(&mut self, variable: &VariableData) -> ExprResult {
        self.look_up_variable(variable.id, &variable.name)
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) -> ExprResult {
        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.id) {
            Some(&distance) => {
                self.environment.borrow_mut().assign_at(distance, &assign.name, value.clone());
            }
            None => {
                self.globals.borrow_mut().assign(&assign.name, value.clone())?;
            }
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, call: &CallData) -> ExprResult {
        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        self.call(callee, &call.paren, arguments)
    }

    fn visit_get_expr(&mut self, get: &GetData) -> ExprResult {
        let object = self.evaluate(&get.object)?;

        if let Object::Instance(instance) = &object {
            Ok(instance.borrow().get(&get.name, &object)?)
        } else {
            Err(RuntimeError {
                token: get.name.clone(),
                message: "Only instances have properties".to_string(),
            }
            .into())
        }
    }

    fn visit_set_expr(&mut self, set: &SetData) -> ExprResult {
        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError {
                token: set.name.clone(),
                message: "Only instances have fields".to_string(),
            }
            .into());
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, this: &ThisData) -> ExprResult {
        self.look_up_variable(this.id, &this.keyword)
    }

    fn visit_super_expr(&mut self, super_expr: &SuperData) -> ExprResult {
        let distance = *self.locals.get(&super_expr.id).expect("resolver always resolves 'super'");

        let superclass_obj = self.environment.borrow().get_at(distance, &Token::from("super"))?;
        let Object::Class(superclass) = superclass_obj else {
            unreachable!("'super' never binds to anything but a class");
        };

        let instance = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let method = superclass.borrow().find_method(&super_expr.method.lexeme).ok_or_else(|| RuntimeError {
            token: super_expr.method.clone(),
            message: format!("Undefined property '{}'", super_expr.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl StmtVisitor<StmtResult> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expr)?;

        writeln!(self.output, "{value}").expect("write to print output");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Block(data) = stmt else { unreachable!() };

        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if is_truthy(&self.evaluate(&data.condition)?) {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while is_truthy(&self.evaluate(&data.condition)?) {
            match self.execute(&data.body) {
                Ok(()) => {}
                Err(Unwind::Break) => break,
                err => return err,
            }
        }

        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Function(data) = stmt else { unreachable!() };

        let function = Function {
            name: data.name.clone(),
            params: data.params.clone(),
            body: Rc::new(data.body.clone()),
            closure: Rc::clone(&self.environment),
            is_initializer: false,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_break_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Break(_) = stmt else { unreachable!() };
        Err(Unwind::Break)
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> StmtResult {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let superclass = match &data.superclass {
            Some(superclass_expr) => {
                let value = self.evaluate(superclass_expr)?;
                let Object::Class(class) = value else {
                    let Expr::Variable(variable) = superclass_expr else { unreachable!() };
                    return Err(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class".to_string(),
                    }
                    .into());
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let previous = if let Some(superclass) = &superclass {
            let enclosing = Rc::clone(&self.environment);
            let mut environment = Environment::new(Some(enclosing));
            environment.define("super", Object::from(Rc::clone(superclass)));
            Some(mem::replace(&mut self.environment, Rc::new(RefCell::new(environment))))
        } else {
            None
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(function_data) = method else { unreachable!() };

            let function = Function {
                name: function_data.name.clone(),
                params: function_data.params.clone(),
                body: Rc::new(function_data.body.clone()),
                closure: Rc::clone(&self.environment),
                is_initializer: function_data.name.lexeme == "init",
            };
            methods.insert(function_data.name.lexeme.clone(), function);
        }

        let class = Class::new(data.name.lexeme.clone(), superclass, methods);

        if let Some(previous) = previous {
            self.environment = previous;
        }

        self.environment
            .borrow_mut()
            .assign(&data.name, Object::from(Rc::new(RefCell::new(class))))
            .map_err(Unwind::from)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorReporter;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> ErrorReporter {
        let mut scan_reporter = ErrorReporter::new();
        let tokens = Scanner::new(source, &mut scan_reporter).scan_tokens();

        let mut parse_reporter = ErrorReporter::new();
        let statements = Parser::new(tokens, &mut parse_reporter).parse();

        let mut interpreter = Interpreter::with_output(Box::new(Vec::<u8>::new()));
        let mut resolve_reporter = ErrorReporter::new();
        Resolver::new(&mut interpreter, &mut resolve_reporter).resolve(&statements);

        let mut reporter = ErrorReporter::new();
        interpreter.interpret(&statements, &mut reporter);
        reporter
    }

    fn run_capturing(source: &str) -> String {
        let mut scan_reporter = ErrorReporter::new();
        let tokens = Scanner::new(source, &mut scan_reporter).scan_tokens();

        let mut parse_reporter = ErrorReporter::new();
        let statements = Parser::new(tokens, &mut parse_reporter).parse();

        let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        struct SharedWriter(Rc<RefCell<Vec<u8>>>);
        impl Write for SharedWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().write(buf)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut interpreter = Interpreter::with_output(Box::new(SharedWriter(Rc::clone(&buffer))));
        let mut resolve_reporter = ErrorReporter::new();
        Resolver::new(&mut interpreter, &mut resolve_reporter).resolve(&statements);

        let mut reporter = ErrorReporter::new();
        interpreter.interpret(&statements, &mut reporter);

        let bytes = buffer.borrow().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn arithmetic_and_print() {
        assert_eq!(run_capturing("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run_capturing("print \"a\" + \"b\";"), "ab\n");
    }

    #[test]
    fn adding_string_and_number_is_a_runtime_error() {
        let reporter = run("\"a\" + 1;");
        assert!(reporter.did_runtime_error());
    }

    #[test]
    fn closures_capture_by_reference() {
        let source = r#"
            fun makeCounter() {
                var count = 0;
                fun counter() {
                    count = count + 1;
                    print count;
                }
                return counter;
            }
            var counter = makeCounter();
            counter();
            counter();
        "#;
        assert_eq!(run_capturing(source), "1\n2\n");
    }

    #[test]
    fn classes_and_inheritance() {
        let source = r#"
            class Animal {
                speak() {
                    print "...";
                }
            }
            class Dog < Animal {
                speak() {
                    super.speak();
                    print "Woof";
                }
            }
            Dog().speak();
        "#;
        assert_eq!(run_capturing(source), "...\nWoof\n");
    }

    #[test]
    fn initializer_runs_on_construction() {
        let source = r#"
            class Point {
                init(x, y) {
                    this.x = x;
                    this.y = y;
                }
            }
            var p = Point(1, 2);
            print p.x;
            print p.y;
        "#;
        assert_eq!(run_capturing(source), "1\n2\n");
    }

    #[test]
    fn break_exits_nearest_loop() {
        let source = r#"
            var i = 0;
            while (true) {
                if (i >= 3) break;
                print i;
                i = i + 1;
            }
        "#;
        assert_eq!(run_capturing(source), "0\n1\n2\n");
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        let reporter = run("print missing;");
        assert!(reporter.did_runtime_error());
    }
}
