use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::callable::{Callable, Function};
use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

const INITIALIZER: &str = "init";

#[derive(Clone)]
pub struct Class(Rc<ClassImpl>);

pub struct ClassImpl {
    name: String,
    superclass: Option<Class>,
    methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Class>, methods: HashMap<String, Function>) -> Self {
        Class(Rc::new(ClassImpl {
            name,
            superclass,
            methods,
        }))
    }

    /// Look `name` up here, then up the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        match self.0.methods.get(name) {
            Some(method) => Some(method.clone()),
            None => self.0.superclass.as_ref()?.find_method(name),
        }
    }
}

impl Callable for Class {
    fn arity(&self) -> usize {
        self.find_method(INITIALIZER)
            .map(|init| init.arity())
            .unwrap_or(0)
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>, paren: &Token) -> Result<Value> {
        let instance = Instance::new(self.clone());

        if let Some(init) = self.find_method(INITIALIZER) {
            init.bind(instance.clone())
                .call(interpreter, arguments, paren)?;
        }

        Ok(Value::Instance(instance))
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.0.name)
    }
}

/// An object created by calling a class. Fields are created on first
/// assignment; they need not correspond to any method.
#[derive(Clone)]
pub struct Instance(Rc<RefCell<InstanceImpl>>);

pub struct InstanceImpl {
    class: Class,
    fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Class) -> Self {
        Instance(Rc::new(RefCell::new(InstanceImpl {
            class,
            fields: HashMap::new(),
        })))
    }

    pub fn class(&self) -> Class {
        self.0.borrow().class.clone()
    }

    /// Fields shadow methods; methods come back bound to this instance.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.0.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match self.class().find_method(&name.lexeme) {
            Some(method) => Ok(Value::Function(method.bind(self.clone()))),
            None => Err(LoxError::runtime(
                name,
                format!("Undefined property '{}'.", name.lexeme),
            )),
        }
    }

    pub fn set(&self, name: &Token, value: Value) {
        self.0
            .borrow_mut()
            .fields
            .insert(name.lexeme.clone(), value);
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance>", self.class().name())
    }
}
