//! Built-in native functions and the default environment.
//!
//! Every native shares one signature: a view of the evaluated arguments plus
//! the environment of the call. The registry below is iterated into the root
//! scope by [`default_env`], which also evaluates a small prelude written in
//! the language itself (`not`, `load-file`).
//!
//! ## Error handling
//!
//! Natives are strict: wrong argument counts raise arity errors, wrong kinds
//! raise type errors naming both the expected and the actual kind, and
//! out-of-bounds indexing raises an index error. No truthiness coercion
//! happens here - `=` is structural equality and the comparison operators
//! accept numbers only.

use std::fs;

use crate::Error;
use crate::env::Env;
use crate::evaluator;
use crate::printer::pr_str;
use crate::reader::read_str;
use crate::value::{NativeFn, Value, numeric_op, numeric_pred};

fn expect_args(name: &str, args: &[Value], count: usize) -> Result<(), Error> {
    if args.len() == count {
        Ok(())
    } else {
        Err(Error::arity(name, count, args.len()))
    }
}

fn expect_at_least(name: &str, args: &[Value], min: usize) -> Result<(), Error> {
    if args.len() >= min {
        Ok(())
    } else {
        Err(Error::arity_at_least(name, min, args.len()))
    }
}

//
// Arithmetic
//

fn native_add(args: &[Value], _env: &Env) -> Result<Value, Error> {
    let mut acc = Value::Int(0);
    for arg in args {
        acc = numeric_op(|a, b| a + b, &acc, arg)?;
    }
    Ok(acc)
}

fn native_sub(args: &[Value], _env: &Env) -> Result<Value, Error> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| Error::arity_at_least("-", 1, 0))?;
    if rest.is_empty() {
        // Unary minus is negation
        return numeric_op(|a, b| a - b, &Value::Int(0), first);
    }
    let mut acc = first.clone();
    for arg in rest {
        acc = numeric_op(|a, b| a - b, &acc, arg)?;
    }
    Ok(acc)
}

fn native_mul(args: &[Value], _env: &Env) -> Result<Value, Error> {
    let mut acc = Value::Int(1);
    for arg in args {
        acc = numeric_op(|a, b| a * b, &acc, arg)?;
    }
    Ok(acc)
}

fn native_div(args: &[Value], _env: &Env) -> Result<Value, Error> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| Error::arity_at_least("/", 1, 0))?;
    if rest.is_empty() {
        // Unary division is the reciprocal
        return numeric_op(|a, b| a / b, &Value::Int(1), first);
    }
    let mut acc = first.clone();
    for arg in rest {
        acc = numeric_op(|a, b| a / b, &acc, arg)?;
    }
    Ok(acc)
}

// Comparison operators chain: every adjacent pair must satisfy the
// comparison, so (< 1 2 3) tests a strictly increasing sequence.
macro_rules! numeric_comparison {
    ($func:ident, $name:literal, $op:tt) => {
        fn $func(args: &[Value], _env: &Env) -> Result<Value, Error> {
            expect_at_least($name, args, 2)?;
            for pair in args.windows(2) {
                if numeric_pred(|a, b| a $op b, &pair[0], &pair[1])? == Value::Bool(false) {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
    };
}

numeric_comparison!(native_lt, "<", <);
numeric_comparison!(native_le, "<=", <=);
numeric_comparison!(native_gt, ">", >);
numeric_comparison!(native_ge, ">=", >=);

fn native_eq(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("=", args, 2)?;
    // Structural equality for every kind; atoms compare by identity
    Ok(Value::Bool(args[0] == args[1]))
}

//
// Sequences
//

fn native_list(args: &[Value], _env: &Env) -> Result<Value, Error> {
    Ok(Value::list(args.to_vec()))
}

fn native_is_list(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("list?", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::List(_))))
}

fn native_is_empty(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("empty?", args, 1)?;
    args[0].is_empty_seq().map(Value::Bool)
}

fn native_count(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("count", args, 1)?;
    match &args[0] {
        Value::Nil => Ok(Value::Int(0)),
        other => Ok(Value::Int(other.as_seq()?.len() as i64)),
    }
}

fn native_cons(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("cons", args, 2)?;
    let rest = args[1].as_seq()?;
    let mut elements = Vec::with_capacity(rest.len() + 1);
    elements.push(args[0].clone());
    elements.extend_from_slice(rest);
    Ok(Value::list(elements))
}

fn native_first(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("first", args, 1)?;
    args[0].first()
}

fn native_rest(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("rest", args, 1)?;
    let elements = args[0].as_seq()?;
    Ok(Value::list(elements.get(1..).unwrap_or(&[]).to_vec()))
}

fn native_nth(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("nth", args, 2)?;
    let index = usize::try_from(args[0].as_int()?)
        .map_err(|_| Error::Eval("nth index must be non-negative".to_string()))?;
    args[1].nth(index)
}

//
// Printing
//

fn join_rendered(args: &[Value], readably: bool, separator: &str) -> String {
    args.iter()
        .map(|arg| pr_str(arg, readably))
        .collect::<Vec<_>>()
        .join(separator)
}

fn native_pr_str(args: &[Value], _env: &Env) -> Result<Value, Error> {
    Ok(Value::string(join_rendered(args, true, " ")))
}

fn native_str(args: &[Value], _env: &Env) -> Result<Value, Error> {
    Ok(Value::string(join_rendered(args, false, "")))
}

fn native_prn(args: &[Value], _env: &Env) -> Result<Value, Error> {
    println!("{}", join_rendered(args, true, " "));
    Ok(Value::Nil)
}

fn native_println(args: &[Value], _env: &Env) -> Result<Value, Error> {
    println!("{}", join_rendered(args, false, " "));
    Ok(Value::Nil)
}

//
// Reading and evaluation
//

fn native_read_string(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("read-string", args, 1)?;
    read_str(args[0].as_str()?)
}

fn native_slurp(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("slurp", args, 1)?;
    let path = args[0].as_str()?;
    fs::read_to_string(path)
        .map(Value::string)
        .map_err(|e| Error::Io(format!("{path}: {e}")))
}

/// Evaluates in the root scope, so definitions made through `eval` are
/// global - this is what `load-file` relies on.
fn native_eval(args: &[Value], env: &Env) -> Result<Value, Error> {
    expect_args("eval", args, 1)?;
    evaluator::eval(&args[0], &env.root())
}

//
// Atoms
//

fn native_atom(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("atom", args, 1)?;
    Ok(Value::atom(args[0].clone(), None))
}

fn native_is_atom(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("atom?", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Atom(_))))
}

fn native_deref(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("deref", args, 1)?;
    Ok(args[0].as_atom()?.load())
}

fn native_reset(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("reset!", args, 2)?;
    args[0].as_atom()?.store(args[1].clone());
    Ok(args[1].clone())
}

/// `(swap! cell f extra...)` - replace the contents with
/// `(f current extra...)` and yield the new value
fn native_swap(args: &[Value], env: &Env) -> Result<Value, Error> {
    expect_at_least("swap!", args, 2)?;
    let cell = args[0].as_atom()?;
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(cell.load());
    call_args.extend_from_slice(&args[2..]);
    let new_value = evaluator::apply(&args[1], &call_args, env)?;
    cell.store(new_value.clone());
    Ok(new_value)
}

//
// JSON interop (feature `json`)
//

#[cfg(feature = "json")]
fn native_json_encode(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("json-encode", args, 1)?;
    crate::json::encode(&args[0]).map(Value::string)
}

#[cfg(feature = "json")]
fn native_json_decode(args: &[Value], _env: &Env) -> Result<Value, Error> {
    expect_args("json-decode", args, 1)?;
    crate::json::decode(args[0].as_str()?)
}

/// The built-in namespace: every native registered into the root scope.
const NAMESPACE: &[(&'static str, NativeFn)] = &[
    ("+", native_add),
    ("-", native_sub),
    ("*", native_mul),
    ("/", native_div),
    ("<", native_lt),
    ("<=", native_le),
    (">", native_gt),
    (">=", native_ge),
    ("=", native_eq),
    ("list", native_list),
    ("list?", native_is_list),
    ("empty?", native_is_empty),
    ("count", native_count),
    ("cons", native_cons),
    ("first", native_first),
    ("rest", native_rest),
    ("nth", native_nth),
    ("pr-str", native_pr_str),
    ("str", native_str),
    ("prn", native_prn),
    ("println", native_println),
    ("read-string", native_read_string),
    ("slurp", native_slurp),
    ("eval", native_eval),
    ("atom", native_atom),
    ("atom?", native_is_atom),
    ("deref", native_deref),
    ("reset!", native_reset),
    ("swap!", native_swap),
];

/// Bootstrap definitions written in the language itself
const PRELUDE: &[&str] = &[
    "(def! not (fn* (a) (if a false true)))",
    r#"(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) "\nnil)")))))"#,
];

/// Build the root environment: all natives, `*ARGV*`, and the prelude.
pub fn default_env() -> Result<Env, Error> {
    let env = Env::new();
    for (name, func) in NAMESPACE.iter().copied() {
        env.set(name, Value::native(name, func));
    }

    #[cfg(feature = "json")]
    {
        env.set("json-encode", Value::native("json-encode", native_json_encode));
        env.set("json-decode", Value::native("json-decode", native_json_decode));
    }

    env.set("*ARGV*", Value::list(vec![]));

    for form in PRELUDE {
        evaluator::eval(&read_str(form)?, &env)?;
    }

    Ok(env)
}
