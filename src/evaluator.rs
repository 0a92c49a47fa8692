//! The tree-walking reduction loop. Evaluation is tail-call optimized: the
//! special forms with a tail position (`do`, `if`, `let*`) and closure
//! application swap the current ast/environment pair and loop instead of
//! recursing, so iterative recursion runs in constant stack space. Non-tail
//! recursion (argument evaluation, nested calls) is bounded by
//! [`crate::MAX_EVAL_DEPTH`].

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::env::Env;
use crate::value::Value;
use crate::{Error, MAX_EVAL_DEPTH};

/// Evaluate a form in the given environment (public API)
pub fn eval(ast: &Value, env: &Env) -> Result<Value, Error> {
    eval_at_depth(ast, env, 0)
}

/// Apply a callable to already-evaluated arguments. This is the non-tail
/// entry used by natives such as `swap!`; the evaluator's own application
/// path inlines closure calls to keep them in tail position.
pub fn apply(func: &Value, args: &[Value], env: &Env) -> Result<Value, Error> {
    match func {
        Value::Native(native) => (native.func)(args, env),
        Value::Closure(closure) => {
            let scope = Env::bind(&closure.env, &closure.params, closure.variadic, args)?;
            let (last, init) = closure
                .body
                .split_last()
                .ok_or_else(|| Error::Eval("function has an empty body".to_string()))?;
            for form in init {
                eval_at_depth(form, &scope, 0)?;
            }
            eval_at_depth(last, &scope, 0)
        }
        other => Err(Error::Type {
            expected: "function",
            actual: other.type_name(),
        }),
    }
}

fn eval_at_depth(ast: &Value, env: &Env, depth: usize) -> Result<Value, Error> {
    if depth >= MAX_EVAL_DEPTH {
        return Err(Error::Eval(format!(
            "evaluation depth limit exceeded (max: {MAX_EVAL_DEPTH})"
        )));
    }

    let mut ast = ast.clone();
    let mut env = env.clone();

    loop {
        let list = match &ast {
            // Variable lookup
            Value::Symbol(name) => {
                return env
                    .get(name)
                    .ok_or_else(|| Error::Unbound(name.to_string()));
            }
            // Vectors evaluate their elements, maps their values (keys are
            // literal data)
            Value::Vector(elements) => {
                return eval_all(elements, &env, depth).map(Value::vector);
            }
            Value::Map(entries) => {
                let mut evaluated = BTreeMap::new();
                for (key, value) in entries.iter() {
                    evaluated.insert(key.clone(), eval_at_depth(value, &env, depth + 1)?);
                }
                return Ok(Value::map(evaluated));
            }
            // The empty list evaluates to itself
            Value::List(elements) if elements.is_empty() => return Ok(ast.clone()),
            Value::List(elements) => Rc::clone(elements),
            // Everything else is self-evaluating
            _ => return Ok(ast.clone()),
        };

        // Special forms dispatch on the head symbol and receive unevaluated
        // arguments
        if let Value::Symbol(name) = &list[0] {
            match &**name {
                "def!" => return eval_def(&list[1..], &env, depth),
                "let*" => {
                    (ast, env) = eval_let(&list[1..], &env, depth)?;
                    continue;
                }
                "do" => {
                    let forms = &list[1..];
                    let Some((last, init)) = forms.split_last() else {
                        return Ok(Value::Nil);
                    };
                    for form in init {
                        eval_at_depth(form, &env, depth + 1)?;
                    }
                    ast = last.clone();
                    continue;
                }
                "if" => {
                    ast = eval_if(&list[1..], &env, depth)?;
                    continue;
                }
                "fn*" => return make_closure(&list[1..], &env),
                "quote" => {
                    return match &list[1..] {
                        [form] => Ok(form.clone()),
                        args => Err(Error::arity("quote", 1, args.len())),
                    };
                }
                _ => {}
            }
        }

        // Function application: evaluate head and arguments
        let func = eval_at_depth(&list[0], &env, depth + 1)?;
        let args = eval_all(&list[1..], &env, depth)?;
        match &func {
            Value::Native(native) => return (native.func)(&args, &env),
            Value::Closure(closure) => {
                let scope = Env::bind(&closure.env, &closure.params, closure.variadic, &args)?;
                let (last, init) = closure
                    .body
                    .split_last()
                    .ok_or_else(|| Error::Eval("function has an empty body".to_string()))?;
                for form in init {
                    eval_at_depth(form, &scope, depth + 1)?;
                }
                // The last body form continues the loop in tail position
                ast = last.clone();
                env = scope;
                continue;
            }
            other => {
                return Err(Error::Type {
                    expected: "function",
                    actual: other.type_name(),
                });
            }
        }
    }
}

fn eval_all(forms: &[Value], env: &Env, depth: usize) -> Result<Vec<Value>, Error> {
    forms
        .iter()
        .map(|form| eval_at_depth(form, env, depth + 1))
        .collect()
}

/// `(def! name form)` - evaluate and bind in the current scope, yielding
/// the bound value
fn eval_def(args: &[Value], env: &Env, depth: usize) -> Result<Value, Error> {
    match args {
        [Value::Symbol(name), form] => {
            let value = eval_at_depth(form, env, depth + 1)?;
            env.set(name.to_string(), value.clone());
            Ok(value)
        }
        [other, _] => Err(Error::Type {
            expected: "symbol",
            actual: other.type_name(),
        }),
        _ => Err(Error::arity("def!", 2, args.len())),
    }
}

/// `(let* (name form ...) body)` - new scope with pairwise bindings; the
/// body is returned for tail-position evaluation
fn eval_let(args: &[Value], env: &Env, depth: usize) -> Result<(Value, Env), Error> {
    match args {
        [bindings, body] => {
            let forms = bindings.as_seq()?;
            if forms.len() % 2 != 0 {
                return Err(Error::Eval(
                    "let* bindings must come in name/value pairs".to_string(),
                ));
            }
            let scope = Env::with_parent(env);
            let mut pairs = forms.iter();
            while let (Some(name), Some(form)) = (pairs.next(), pairs.next()) {
                let Value::Symbol(name) = name else {
                    return Err(Error::Type {
                        expected: "symbol",
                        actual: name.type_name(),
                    });
                };
                // Later bindings see earlier ones
                let value = eval_at_depth(form, &scope, depth + 1)?;
                scope.set(name.to_string(), value);
            }
            Ok((body.clone(), scope))
        }
        _ => Err(Error::arity("let*", 2, args.len())),
    }
}

/// `(if condition then else?)` - only nil and false are falsy; the chosen
/// branch is returned for tail-position evaluation
fn eval_if(args: &[Value], env: &Env, depth: usize) -> Result<Value, Error> {
    match args {
        [condition, then_form] => {
            if eval_at_depth(condition, env, depth + 1)?.is_truthy() {
                Ok(then_form.clone())
            } else {
                Ok(Value::Nil)
            }
        }
        [condition, then_form, else_form] => {
            if eval_at_depth(condition, env, depth + 1)?.is_truthy() {
                Ok(then_form.clone())
            } else {
                Ok(else_form.clone())
            }
        }
        _ => Err(Error::Arity {
            name: "if".to_string(),
            expected: "2 or 3".to_string(),
            got: args.len(),
        }),
    }
}

/// `(fn* (params...) body...)` - parameters are symbols, `&` marks the
/// variadic collector, the body may span multiple forms
fn make_closure(args: &[Value], env: &Env) -> Result<Value, Error> {
    match args {
        [params_form, body @ ..] if !body.is_empty() => {
            let forms = params_form.as_seq()?;
            let mut params = Vec::with_capacity(forms.len());
            for form in forms {
                let Value::Symbol(name) = form else {
                    return Err(Error::Type {
                        expected: "symbol",
                        actual: form.type_name(),
                    });
                };
                if params.iter().any(|p| p == &**name) {
                    return Err(Error::Eval(format!("duplicate parameter name: {name}")));
                }
                params.push(name.to_string());
            }

            let variadic = match params.iter().position(|p| p == "&") {
                Some(index) => {
                    // Exactly one collector parameter may follow the marker
                    if index + 2 != params.len() {
                        return Err(Error::Eval(
                            "exactly one parameter must follow '&'".to_string(),
                        ));
                    }
                    params.remove(index);
                    Some(index)
                }
                None => None,
            };

            Ok(Value::closure(params, variadic, body.to_vec(), env.clone()))
        }
        _ => Err(Error::arity_at_least("fn*", 2, args.len())),
    }
}
