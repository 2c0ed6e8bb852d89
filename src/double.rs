//! Test doubles — targets that generated methods attach to
//!
//! A `Double` is an instance with its own method table. Its `DoubleType` is
//! shared by every double created from it, so type-level methods defined
//! through one instance are visible through all of them.
//!
//! Dispatch is a table lookup: the method's captured value is cloned out on
//! every call. Arguments are checked against the signature and never read.

use crate::error::{Error, Result};
use crate::signature::ParameterSignature;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::warn;

/// Method visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// Where a method is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Instance,
    Type,
}

/// Call-time arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    keywords: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }
}

/// A synthesized method with a value captured at definition time
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMethod {
    name: String,
    visibility: Visibility,
    signature: Option<ParameterSignature>,
    value: Value,
}

impl GeneratedMethod {
    pub fn new(
        name: impl Into<String>,
        visibility: Visibility,
        signature: Option<ParameterSignature>,
        value: Value,
    ) -> Self {
        Self {
            name: name.into(),
            visibility,
            signature,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The value every call returns
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Rendered definition line, e.g. `find(id, limit=10)`
    pub fn definition(&self) -> String {
        let params = self
            .signature
            .as_ref()
            .map(ParameterSignature::render)
            .unwrap_or_default();
        format!("{}({})", self.name, params)
    }

    /// Return the captured value. Without a signature any arguments are
    /// accepted; with one they must fit it.
    pub fn invoke(&self, args: &CallArgs) -> Result<Value> {
        if let Some(signature) = &self.signature {
            signature
                .accepts(args)
                .map_err(|reason| Error::ArgumentMismatch {
                    name: self.name.clone(),
                    signature: signature.render(),
                    reason,
                })?;
        }
        Ok(self.value.clone())
    }
}

/// Name → method dispatch table
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: BTreeMap<String, GeneratedMethod>,
}

impl MethodTable {
    /// Insert a method, returning the one it replaced
    pub fn define(&mut self, method: GeneratedMethod) -> Option<GeneratedMethod> {
        self.methods.insert(method.name.clone(), method)
    }

    pub fn get(&self, name: &str) -> Option<&GeneratedMethod> {
        self.methods.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    fn dispatch(
        &self,
        receiver: &str,
        name: &str,
        args: &CallArgs,
        honor_visibility: bool,
    ) -> Result<Value> {
        let method = self.get(name).ok_or_else(|| Error::UndefinedMethod {
            name: name.to_string(),
            receiver: receiver.to_string(),
        })?;
        if honor_visibility && method.visibility == Visibility::Private {
            return Err(Error::PrivateMethodCalled {
                name: name.to_string(),
                receiver: receiver.to_string(),
            });
        }
        method.invoke(args)
    }

    fn responds_to(&self, name: &str) -> bool {
        self.get(name).is_some_and(|m| m.visibility == Visibility::Public)
    }
}

/// Anything generated methods can be attached to
pub trait StubTarget {
    fn define_method(&mut self, scope: Scope, method: GeneratedMethod);
}

/// The type of a double; holds type-level methods
#[derive(Debug)]
pub struct DoubleType {
    name: String,
    methods: RefCell<MethodTable>,
}

impl DoubleType {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            methods: RefCell::new(MethodTable::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn define(&self, method: GeneratedMethod) -> Option<GeneratedMethod> {
        let replaced = self.methods.borrow_mut().define(method);
        if let Some(old) = &replaced {
            warn!(receiver = %self.name, method = old.name(), "type method redefined");
        }
        replaced
    }

    /// Public dispatch
    pub fn call(&self, name: &str, args: &CallArgs) -> Result<Value> {
        self.methods.borrow().dispatch(&self.receiver(), name, args, true)
    }

    /// Dispatch ignoring visibility
    pub fn send(&self, name: &str, args: &CallArgs) -> Result<Value> {
        self.methods.borrow().dispatch(&self.receiver(), name, args, false)
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.methods.borrow().responds_to(name)
    }

    pub fn method(&self, name: &str) -> Option<GeneratedMethod> {
        self.methods.borrow().get(name).cloned()
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.borrow().names()
    }

    fn receiver(&self) -> String {
        format!("type {}", self.name)
    }
}

/// A test double instance
#[derive(Debug)]
pub struct Double {
    double_type: Rc<DoubleType>,
    methods: MethodTable,
}

impl Double {
    /// A double with a fresh type of its own
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::of_type(DoubleType::new(type_name))
    }

    /// A double sharing an existing type
    pub fn of_type(double_type: Rc<DoubleType>) -> Self {
        Self {
            double_type,
            methods: MethodTable::default(),
        }
    }

    pub fn double_type(&self) -> &Rc<DoubleType> {
        &self.double_type
    }

    pub fn define(&mut self, method: GeneratedMethod) -> Option<GeneratedMethod> {
        let replaced = self.methods.define(method);
        if let Some(old) = &replaced {
            warn!(
                receiver = %self.double_type.name,
                method = old.name(),
                "instance method redefined"
            );
        }
        replaced
    }

    /// Public dispatch
    pub fn call(&self, name: &str, args: &CallArgs) -> Result<Value> {
        self.methods.dispatch(&self.receiver(), name, args, true)
    }

    /// Dispatch ignoring visibility
    pub fn send(&self, name: &str, args: &CallArgs) -> Result<Value> {
        self.methods.dispatch(&self.receiver(), name, args, false)
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.methods.responds_to(name)
    }

    pub fn method(&self, name: &str) -> Option<&GeneratedMethod> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.names()
    }

    fn receiver(&self) -> String {
        format!("instance of {}", self.double_type.name)
    }
}

impl StubTarget for Double {
    fn define_method(&mut self, scope: Scope, method: GeneratedMethod) {
        match scope {
            Scope::Instance => {
                self.define(method);
            }
            Scope::Type => {
                self.double_type.define(method);
            }
        }
    }
}
