//! lispet - a small dynamically-typed Lisp interpreter
//!
//! This crate provides a minimalistic Lisp with a single tagged value type,
//! an S-expression reader, a tail-call-optimizing tree-walking evaluator, and
//! a two-mode printer. Everything the interpreter manipulates is a
//! [`value::Value`]: numbers, booleans, strings, symbols, keywords, lists,
//! vectors, maps, functions, and mutable atoms.
//!
//! ```lisp
//! (def! square (fn* (x) (* x x)))
//! (square 7)                        ; 49
//! (let* (a 6 b 4) (/ a b))         ; 1.5
//! {:name "lispet" :answer 42}      ; maps iterate in key order
//! (def! counter (atom 0))
//! (swap! counter + 1)              ; 1
//! ```
//!
//! ## Numbers
//!
//! There is one numeric representation: double-precision floats. Whether a
//! number prints as an integer is decided by its value, not its history -
//! `(/ 6 2)` is `3` and `(/ 6 4)` is `1.5`. See [`value::Value::number`].
//!
//! ## Strictness
//!
//! The interpreter favors predictable behavior over permissiveness:
//! type-mismatched accesses report both the expected and the actual kind,
//! out-of-bounds indexing is an error rather than nil, and the reader rejects
//! syntax it does not implement instead of guessing.
//!
//! ## Modules
//!
//! - `value`: the tagged value type, constructors, accessors, ordering
//! - `reader`: S-expression parsing from text
//! - `printer`: readable and display rendering
//! - `env`: the lexical environment chain
//! - `evaluator`: the reduction loop and special forms
//! - `core`: built-in native functions and the default environment
//! - `json`: JSON interop (feature `json`)

use std::fmt;

/// Maximum parsing depth to prevent stack overflow from deeply nested input.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Maximum evaluation depth for non-tail recursion. Tail calls do not consume
/// depth (the evaluator loops instead of recursing), so this only bounds
/// nested argument evaluation and non-tail calls.
pub const MAX_EVAL_DEPTH: usize = 256;

/// Categorizes the different kinds of parsing errors.
#[derive(Debug, PartialEq, Clone)]
pub enum ParseErrorKind {
    /// Invalid or unexpected syntax (bad tokens, malformed forms)
    InvalidSyntax,
    /// Input ended before the form was complete (EOF, unterminated string, unclosed brackets)
    Incomplete,
    /// Form nesting exceeded the maximum parse depth
    TooDeeplyNested,
    /// Extra input found after a complete, valid form
    TrailingContent,
    /// Valid Lisp syntax that is intentionally not supported in this implementation
    Unsupported,
}

/// A structured error providing detailed information about a parsing failure.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Context snippet from the input showing where the error occurred (max 80 chars)
    pub context: Option<String>,
    /// The problematic token or character encountered, if identifiable
    pub found: Option<String>,
}

impl ParseError {
    /// Create a simple ParseError with a kind and message but no context
    pub fn from_message(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        ParseError {
            kind,
            message: message.into(),
            context: None,
            found: None,
        }
    }

    /// Create a ParseError with context extracted from input at a given offset
    pub fn with_context(
        kind: ParseErrorKind,
        message: impl Into<String>,
        input: &str,
        error_offset: usize,
    ) -> Self {
        const MAX_CONTEXT: usize = 80;

        let context_start = error_offset.saturating_sub(20);
        let context_str: String = input
            .chars()
            .skip(context_start)
            .take(MAX_CONTEXT)
            .collect();

        let mut display_context = String::new();
        if context_start > 0 {
            display_context.push_str("[...]");
        }
        display_context.push_str(&context_str);
        if context_start + context_str.len() < input.len() {
            display_context.push_str("[...]");
        }
        let display_context = display_context.replace('\n', "\\n").replace('\r', "");

        ParseError {
            kind,
            message: message.into(),
            context: Some(display_context),
            found: None,
        }
    }
}

/// Error types for the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Parse(ParseError),
    /// A value had the wrong kind for the requested operation
    Type {
        expected: &'static str,
        actual: &'static str,
    },
    /// Sequence access out of bounds
    Index { index: usize, len: usize },
    /// Symbol lookup failed along the whole environment chain
    Unbound(String),
    /// Wrong number of arguments for a function or special form
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
    Eval(String),
    Io(String),
}

impl Error {
    /// Create an arity error for a callable expecting an exact count
    pub fn arity(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::Arity {
            name: name.into(),
            expected: expected.to_string(),
            got,
        }
    }

    /// Create an arity error for a callable expecting at least `min` arguments
    pub fn arity_at_least(name: impl Into<String>, min: usize, got: usize) -> Self {
        Error::Arity {
            name: name.into(),
            expected: format!("at least {min}"),
            got,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(e) => {
                write!(f, "ParseError: {}", e.message)?;
                if let Some(found) = &e.found {
                    write!(f, "\nFound: {found}")?;
                }
                if let Some(context) = &e.context {
                    write!(f, "\nContext: {context}")?;
                }
                Ok(())
            }
            Error::Type { expected, actual } => {
                write!(f, "Type error: expected {expected}, got {actual}")
            }
            Error::Index { index, len } => {
                write!(
                    f,
                    "Index error: index {index} out of bounds for sequence of length {len}"
                )
            }
            Error::Unbound(name) => write!(f, "Symbol '{name}' not found"),
            Error::Arity {
                name,
                expected,
                got,
            } => write!(
                f,
                "ArityError: {name} expected {expected} arguments, got {got}"
            ),
            Error::Eval(msg) => write!(f, "EvaluationError: {msg}"),
            Error::Io(msg) => write!(f, "IoError: {msg}"),
        }
    }
}

pub mod core;
pub mod env;
pub mod evaluator;
pub mod printer;
pub mod reader;
pub mod value;

#[cfg(feature = "json")]
pub mod json;
