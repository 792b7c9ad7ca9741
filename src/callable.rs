//! The call protocol and the two function kinds that implement it besides
//! classes: host‑provided natives and user‑declared functions.

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::class::Instance;
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::interpreter::{Completion, Interpreter};
use crate::token::Token;
use crate::value::Value;

/// Anything that can appear to the left of `(...)`.
///
/// The interpreter checks `arity` against the argument count before calling
/// `call`, so implementations may assume the count is right.
pub trait Callable {
    fn arity(&self) -> usize;

    fn name(&self) -> &str;

    /// `paren` is the call's closing parenthesis, used to locate errors.
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>, paren: &Token)
        -> Result<Value>;
}

/// Signature of a host function. An `Err` becomes a runtime error at the
/// call site.
pub type NativeFn = fn(&[Value]) -> std::result::Result<Value, String>;

#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    arity: usize,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: &str, arity: usize, func: NativeFn) -> Self {
        Self {
            name: Rc::from(name),
            arity,
            func,
        }
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, _interpreter: &mut Interpreter, arguments: Vec<Value>, paren: &Token) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);

        (self.func)(&arguments).map_err(|msg| LoxError::runtime(paren, msg))
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.name, &other.name)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// A user‑declared function or method together with the environment it
/// closed over.
#[derive(Clone)]
pub struct Function(Rc<FunctionImpl>);

pub struct FunctionImpl {
    pub decl: Rc<FunctionDecl>,
    pub closure: EnvRef,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(decl: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Function(Rc::new(FunctionImpl {
            decl,
            closure,
            is_initializer,
        }))
    }

    /// A copy of this method whose closure has `this` bound to `instance`.
    /// Called on every property access, so each access yields a fresh
    /// function object.
    pub fn bind(&self, instance: Instance) -> Function {
        let mut env = Environment::with_enclosing(self.0.closure.clone());
        env.define("this", Value::Instance(instance));

        Function::new(self.0.decl.clone(), env.into_ref(), self.0.is_initializer)
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        self.0.decl.params.len()
    }

    fn name(&self) -> &str {
        &self.0.decl.name.lexeme
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>, _paren: &Token) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        let mut env = Environment::with_enclosing(self.0.closure.clone());
        for (param, arg) in self.0.decl.params.iter().zip(arguments) {
            env.define(&param.lexeme, arg);
        }

        let completion: Completion = interpreter.execute_block(&self.0.decl.body, env.into_ref())?;

        // An initializer hands back `this` no matter how it finished.
        if self.0.is_initializer {
            return Ok(self.0.closure.borrow().get_at(0, "this").unwrap_or(Value::Nil));
        }

        Ok(match completion {
            Completion::Return(value) => value,
            Completion::Normal => Value::Nil,
        })
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}
