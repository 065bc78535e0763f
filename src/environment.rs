use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// One frame of the lexical scope chain: a name-to-value mapping plus an
/// optional link to the enclosing frame. A frame is created on block entry,
/// function call, and (when a class has a superclass) on method binding.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            variables: HashMap::new(),
        }
    }

    /// Binds `name` in this frame unconditionally, overwriting any existing
    /// binding of the same name in this frame.
    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    /// Follows `enclosing` links `distance` times. `distance` must be a
    /// value the resolver actually computed for a reference resolvable from
    /// this frame; the resolver's invariant guarantees the chain is at
    /// least that long.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let parent = self.enclosing.clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth {}", 1));
        let mut environment = Rc::clone(&parent);

        for i in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {}", i));
            environment = Rc::clone(&parent);
        }

        environment
    }

    /// Assigns to an existing binding, walking outward through enclosing
    /// frames. Never creates a new binding -- assigning to an undefined name
    /// anywhere in the chain is a runtime error.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &mut self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'", name.lexeme),
        })
    }

    /// Assigns directly into the `distance`-th ancestor's slot, without
    /// walking further. Assumes the resolver already established that the
    /// name exists there.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'", name.lexeme),
        })
    }

    /// Reads directly from the `distance`-th ancestor's slot, without
    /// walking further. Assumes the resolver already established that the
    /// name exists there.
    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        if distance > 0 {
            match self.ancestor(distance).borrow().variables.get(&name.lexeme) {
                Some(variable) => Ok(variable.clone()),
                None => Err(RuntimeError {
                    token: name.clone(),
                    message: format!("Undefined variable '{}'", name.lexeme),
                }),
            }
        } else {
            match self.variables.get(&name.lexeme) {
                Some(variable) => Ok(variable.clone()),
                None => Err(RuntimeError {
                    token: name.clone(),
                    message: format!("Undefined variable '{}'", name.lexeme),
                }),
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::{Location, Type};

    fn token(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, Location::new(1, 1))
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::default();
        env.define("a", Object::from(1.0));
        assert_eq!(env.get(&token("a")).unwrap(), Object::from(1.0));
    }

    #[test]
    fn get_undefined_is_runtime_error() {
        let env = Environment::default();
        assert!(env.get(&token("missing")).is_err());
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut env = Environment::default();
        assert!(env.assign(&token("ghost"), Object::from(1.0)).is_err());
    }

    #[test]
    fn get_at_reads_through_ancestor_chain() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from("global"));

        let inner = Environment::new(Some(Rc::clone(&globals)));
        assert_eq!(inner.get_at(1, &token("a")).unwrap(), Object::from("global"));
    }
}
