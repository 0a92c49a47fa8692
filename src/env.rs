//! The lexical environment chain: name-to-value bindings with parent lookup.
//! An [`Env`] is a cheap, shared handle - closures keep one for their
//! defining scope, the evaluator threads one through every call, and all
//! holders observe the same bindings.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::Error;
use crate::value::Value;

/// Environment for variable bindings. Cloning shares the underlying scope.
#[derive(Clone)]
pub struct Env {
    inner: Rc<EnvInner>,
}

struct EnvInner {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Env>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            inner: Rc::new(EnvInner {
                bindings: RefCell::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    pub fn with_parent(parent: &Env) -> Self {
        Env {
            inner: Rc::new(EnvInner {
                bindings: RefCell::new(HashMap::new()),
                parent: Some(parent.clone()),
            }),
        }
    }

    /// Define (or redefine) a binding in this scope.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.inner.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Look a name up in this scope, then along the parent chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.inner.bindings.borrow().get(name) {
            Some(value.clone())
        } else if let Some(parent) = &self.inner.parent {
            parent.get(name)
        } else {
            None
        }
    }

    /// The topmost scope of the chain. The `eval` native evaluates there, so
    /// definitions made inside functions land in the global scope.
    pub fn root(&self) -> Env {
        match &self.inner.parent {
            Some(parent) => parent.root(),
            None => self.clone(),
        }
    }

    /// Create a call scope under `parent`, binding parameter names to
    /// argument values. With a variadic marker at index `i`, the first `i`
    /// parameters bind one-to-one and the parameter at `i` collects the
    /// remaining arguments as a list; otherwise the counts must match
    /// exactly.
    pub fn bind(
        parent: &Env,
        params: &[String],
        variadic: Option<usize>,
        args: &[Value],
    ) -> Result<Env, Error> {
        let scope = Env::with_parent(parent);
        match variadic {
            Some(index) => {
                if args.len() < index {
                    return Err(Error::arity_at_least("function", index, args.len()));
                }
                for (param, arg) in params[..index].iter().zip(args) {
                    scope.set(param.clone(), arg.clone());
                }
                scope.set(params[index].clone(), Value::list(args[index..].to_vec()));
            }
            None => {
                if params.len() != args.len() {
                    return Err(Error::arity("function", params.len(), args.len()));
                }
                for (param, arg) in params.iter().zip(args) {
                    scope.set(param.clone(), arg.clone());
                }
            }
        }
        Ok(scope)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bindings can reach closures that reach this scope again, so the
        // debug form stays shallow
        write!(
            f,
            "Env({} bindings{})",
            self.inner.bindings.borrow().len(),
            if self.inner.parent.is_some() {
                ", with parent"
            } else {
                ""
            }
        )
    }
}
