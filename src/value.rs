//! This module defines the single runtime value type of the interpreter and
//! the operations every other stage is built on. The main enum, [`Value`],
//! covers all data the language can express: numbers, booleans, text kinds
//! (strings, symbols, keywords), sequences (lists and vectors), ordered maps,
//! callables (native functions and closures), mutable atoms, and nil.
//! Structural data is shared through reference counting, so binding, passing,
//! and keying by a value never copies its payload. Equality and ordering are
//! total so that any value can serve as a map key; atoms alone compare by
//! cell identity, because their contents change over time.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::Error;
use crate::env::Env;
use crate::printer;

/// Signature shared by every native (host-implemented) function: a view of
/// the evaluated arguments plus the environment the call happens in.
pub type NativeFn = fn(&[Value], &Env) -> Result<Value, Error>;

/// A host-implemented callable. Uses the name for equality comparison
/// instead of the function pointer.
#[derive(Clone)]
pub struct Native {
    pub name: &'static str,
    pub func: NativeFn,
}

/// A user-defined function: parameter names, an optional variadic marker
/// (the index from which remaining arguments collect into one list), the
/// body forms (evaluated in order, last result returned), and a shared
/// handle to the environment that was active at definition time.
#[derive(Debug, Clone)]
pub struct Closure {
    pub params: Vec<String>,
    pub variadic: Option<usize>,
    pub body: Vec<Value>,
    pub env: Env,
}

/// The shared single-slot mutable cell behind `Value::Atom` - the sole
/// mutation primitive in the value system. The optional name is a debug tag
/// only; it takes no part in equality.
#[derive(Debug)]
pub struct AtomCell {
    value: RefCell<Value>,
    pub name: Option<String>,
}

impl AtomCell {
    /// Clone the current contents out of the cell.
    pub fn load(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Replace the contents of the cell. Single-step assignment, so it is
    /// atomic with respect to the single-threaded interpreter.
    pub fn store(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }
}

/// Core runtime value type.
///
/// There is one numeric representation (double precision); the `Int`/`Float`
/// split is a display distinction decided by [`Value::number`], never a
/// separate payload. Sequences, maps, closures, and atoms are reference
/// counted, so cloning a `Value` is always cheap.
///
/// To build values, use the variant constructors directly for scalars
/// (`Value::Int(3)`, `Value::Bool(true)`, `Value::Nil`) and the helper
/// constructors for shared payloads (`Value::list`, `Value::string`,
/// `Value::keyword`, ...).
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    /// A number whose value has an exact integral form
    Int(i64),
    /// A number with a fractional part (or outside integral range)
    Float(f64),
    String(Rc<str>),
    Symbol(Rc<str>),
    /// Keywords carry their `:` sigil in the stored text, added at
    /// construction time
    Keyword(Rc<str>),
    List(Rc<Vec<Value>>),
    Vector(Rc<Vec<Value>>),
    /// Ordered mapping, keyed by the total order over values
    Map(Rc<BTreeMap<Value, Value>>),
    Native(Native),
    Closure(Rc<Closure>),
    Atom(Rc<AtomCell>),
}

/// 2^63, the first double no longer representable as an i64
const INT_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    /// Classify a double into its display tag: a finite value with no
    /// fractional part inside integral range becomes `Int`, everything else
    /// `Float`. This is the only place the Int/Float decision is made, so
    /// `(/ 6 2)` prints as `3` while `(/ 6 4)` prints as `1.5`.
    pub fn number(n: f64) -> Value {
        if n.is_finite() && n.fract() == 0.0 && n >= -INT_BOUND && n < INT_BOUND {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
    }

    pub fn string(text: impl Into<Rc<str>>) -> Value {
        Value::String(text.into())
    }

    pub fn symbol(name: impl Into<Rc<str>>) -> Value {
        Value::Symbol(name.into())
    }

    /// Build a keyword, adding the `:` sigil if the name does not already
    /// carry it. The sigil is part of the stored text and is never added at
    /// render time.
    pub fn keyword(name: impl AsRef<str>) -> Value {
        let name = name.as_ref();
        if name.starts_with(':') {
            Value::Keyword(Rc::from(name))
        } else {
            Value::Keyword(Rc::from(format!(":{name}").as_str()))
        }
    }

    pub fn list(elements: Vec<Value>) -> Value {
        Value::List(Rc::new(elements))
    }

    pub fn vector(elements: Vec<Value>) -> Value {
        Value::Vector(Rc::new(elements))
    }

    pub fn map(entries: BTreeMap<Value, Value>) -> Value {
        Value::Map(Rc::new(entries))
    }

    pub fn native(name: &'static str, func: NativeFn) -> Value {
        Value::Native(Native { name, func })
    }

    pub fn closure(
        params: Vec<String>,
        variadic: Option<usize>,
        body: Vec<Value>,
        env: Env,
    ) -> Value {
        Value::Closure(Rc::new(Closure {
            params,
            variadic,
            body,
            env,
        }))
    }

    pub fn atom(value: Value, name: Option<String>) -> Value {
        Value::Atom(Rc::new(AtomCell {
            value: RefCell::new(value),
            name,
        }))
    }

    /// The kind name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Native(_) | Value::Closure(_) => "function",
            Value::Atom(_) => "atom",
        }
    }

    fn type_error(&self, expected: &'static str) -> Error {
        Error::Type {
            expected,
            actual: self.type_name(),
        }
    }

    /// Only `nil` and `false` are falsy; everything else (including 0 and
    /// the empty list) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_int(&self) -> Result<i64, Error> {
        match self {
            Value::Int(n) => Ok(*n),
            _ => Err(self.type_error("integer")),
        }
    }

    /// Unwrap the numeric payload. Both numeric tags share it, so this
    /// accepts `Int` as well as `Float`.
    pub fn as_float(&self) -> Result<f64, Error> {
        match self {
            Value::Int(n) => Ok(*n as f64),
            Value::Float(n) => Ok(*n),
            _ => Err(self.type_error("number")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.type_error("bool")),
        }
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.type_error("string")),
        }
    }

    /// The text payload, shared by strings, symbols, and keywords. A
    /// keyword's text includes its sigil.
    pub fn as_text(&self) -> Result<&str, Error> {
        match self {
            Value::String(s) | Value::Symbol(s) | Value::Keyword(s) => Ok(s),
            _ => Err(self.type_error("string, symbol, or keyword")),
        }
    }

    /// Read-only view of a sequence. Valid for lists and vectors only.
    pub fn as_seq(&self) -> Result<&[Value], Error> {
        match self {
            Value::List(elements) | Value::Vector(elements) => Ok(elements),
            _ => Err(self.type_error("list or vector")),
        }
    }

    /// Mutable access to a sequence. Copy-on-write: if the payload is
    /// shared, it is cloned first so other holders are unaffected.
    pub fn as_seq_mut(&mut self) -> Result<&mut Vec<Value>, Error> {
        match self {
            Value::List(elements) | Value::Vector(elements) => Ok(Rc::make_mut(elements)),
            other => Err(other.type_error("list or vector")),
        }
    }

    pub fn as_map(&self) -> Result<&BTreeMap<Value, Value>, Error> {
        match self {
            Value::Map(entries) => Ok(entries),
            _ => Err(self.type_error("map")),
        }
    }

    pub fn as_atom(&self) -> Result<&Rc<AtomCell>, Error> {
        match self {
            Value::Atom(cell) => Ok(cell),
            _ => Err(self.type_error("atom")),
        }
    }

    /// True iff the value is a sequence with zero elements.
    pub fn is_empty_seq(&self) -> Result<bool, Error> {
        Ok(self.as_seq()?.is_empty())
    }

    /// First element of a sequence, or nil if the sequence is empty.
    /// Unlike [`Value::nth`], this never fails on valid sequences.
    pub fn first(&self) -> Result<Value, Error> {
        Ok(self.as_seq()?.first().cloned().unwrap_or(Value::Nil))
    }

    /// Element at `index`, failing with an index error when out of bounds.
    pub fn nth(&self, index: usize) -> Result<Value, Error> {
        let elements = self.as_seq()?;
        elements.get(index).cloned().ok_or(Error::Index {
            index,
            len: elements.len(),
        })
    }
}

// Fallible conversions from `&Value` into primitive Rust types. These feed
// the checked binary-apply helpers below.

impl TryFrom<&Value> for f64 {
    type Error = Error;

    fn try_from(value: &Value) -> Result<f64, Error> {
        value.as_float()
    }
}

impl TryFrom<&Value> for i64 {
    type Error = Error;

    fn try_from(value: &Value) -> Result<i64, Error> {
        value.as_int()
    }
}

impl TryFrom<&Value> for bool {
    type Error = Error;

    fn try_from(value: &Value) -> Result<bool, Error> {
        value.as_bool()
    }
}

impl<'v> TryFrom<&'v Value> for &'v str {
    type Error = Error;

    fn try_from(value: &'v Value) -> Result<&'v str, Error> {
        value.as_str()
    }
}

/// Apply a two-operand operation whose operand kinds are known in advance.
/// Both operands are checked via [`TryFrom`]; a kind mismatch returns the
/// accessor's type error instead of undefined behavior.
pub fn apply_binary<'v, L, R, T, F>(op: F, lhs: &'v Value, rhs: &'v Value) -> Result<T, Error>
where
    L: TryFrom<&'v Value, Error = Error>,
    R: TryFrom<&'v Value, Error = Error>,
    F: FnOnce(L, R) -> T,
{
    Ok(op(L::try_from(lhs)?, R::try_from(rhs)?))
}

/// Apply a numeric operation to two numeric values and re-classify the
/// result's display tag.
pub fn numeric_op(op: fn(f64, f64) -> f64, lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    apply_binary(op, lhs, rhs).map(Value::number)
}

/// Apply a numeric predicate to two numeric values. Always yields a bool
/// regardless of the operands' display tags.
pub fn numeric_pred(op: fn(f64, f64) -> bool, lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    apply_binary(op, lhs, rhs).map(Value::Bool)
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Symbol(s) => write!(f, "Symbol({s})"),
            Value::Keyword(s) => write!(f, "Keyword({s})"),
            Value::List(elements) => write!(f, "List({elements:?})"),
            Value::Vector(elements) => write!(f, "Vector({elements:?})"),
            Value::Map(entries) => write!(f, "Map({entries:?})"),
            Value::Native(native) => write!(f, "Native({})", native.name),
            Value::Closure(closure) => write!(
                f,
                "Closure(params={:?}, variadic={:?})",
                closure.params, closure.variadic
            ),
            Value::Atom(cell) => match &cell.name {
                Some(name) => write!(f, "Atom({name}, {:?})", cell.value.borrow()),
                None => write!(f, "Atom({:?})", cell.value.borrow()),
            },
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&printer::pr_str(self, true))
    }
}

// Total order over values, required because maps are keyed by value.
//
// Comparison is by payload shape, not discriminant: the two numeric tags
// share the numeric payload, the three text kinds share the text payload,
// and lists and vectors share the sequence payload - so a list and a vector
// holding equal elements are equal. Atoms (and closures) compare by cell
// identity, arbitrary but stable, solely so they can appear as map keys.
// Values of unrelated shapes fall back to a fixed shape rank.

fn shape_rank(value: &Value) -> u8 {
    match value {
        Value::Nil => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::String(_) | Value::Symbol(_) | Value::Keyword(_) => 3,
        Value::List(_) | Value::Vector(_) => 4,
        Value::Map(_) => 5,
        Value::Atom(_) => 6,
        Value::Native(_) => 7,
        Value::Closure(_) => 8,
    }
}

fn number_payload(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        _ => None,
    }
}

fn text_payload(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) | Value::Symbol(s) | Value::Keyword(s) => Some(s),
        _ => None,
    }
}

fn seq_payload(value: &Value) -> Option<&[Value]> {
    match value {
        Value::List(elements) | Value::Vector(elements) => Some(elements),
        _ => None,
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        if let (Some(a), Some(b)) = (number_payload(self), number_payload(other)) {
            return a.total_cmp(&b);
        }
        if let (Some(a), Some(b)) = (text_payload(self), text_payload(other)) {
            return a.as_bytes().cmp(b.as_bytes());
        }
        if let (Some(a), Some(b)) = (seq_payload(self), seq_payload(other)) {
            // Element-wise, then by length
            return a.iter().cmp(b.iter());
        }
        match (self, other) {
            (Value::Nil, Value::Nil) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.iter().cmp(b.iter()),
            (Value::Atom(a), Value::Atom(b)) => Rc::as_ptr(a).cmp(&Rc::as_ptr(b)),
            (Value::Native(a), Value::Native(b)) => a.name.cmp(b.name),
            (Value::Closure(a), Value::Closure(b)) => Rc::as_ptr(a).cmp(&Rc::as_ptr(b)),
            _ => shape_rank(self).cmp(&shape_rank(other)),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    fn list(elements: Vec<Value>) -> Value {
        Value::list(elements)
    }

    #[test]
    fn test_number_classification_data_driven() {
        // (input double, expected value)
        let test_cases = vec![
            (0.0, Value::Int(0)),
            (-0.0, Value::Int(0)),
            (3.0, Value::Int(3)),
            (-17.0, Value::Int(-17)),
            (1.5, Value::Float(1.5)),
            (-0.25, Value::Float(-0.25)),
            (1e15, Value::Int(1_000_000_000_000_000)),
            // Outside integral range stays a float even without a fraction
            (1e19, Value::Float(1e19)),
            (-1e19, Value::Float(-1e19)),
            (f64::INFINITY, Value::Float(f64::INFINITY)),
            (f64::NEG_INFINITY, Value::Float(f64::NEG_INFINITY)),
        ];

        for (i, (input, expected)) in test_cases.iter().enumerate() {
            let actual = Value::number(*input);
            assert_eq!(
                actual,
                *expected,
                "case {}: number({input}) gave {actual:?}",
                i + 1
            );
            // The classification must also agree on the debug shape, since
            // Int(3) and Float(3.0) compare equal numerically
            assert_eq!(
                format!("{actual:?}"),
                format!("{expected:?}"),
                "case {}: wrong tag for {input}",
                i + 1
            );
        }

        // NaN never equals itself through ==, but classification keeps it a float
        assert!(matches!(Value::number(f64::NAN), Value::Float(n) if n.is_nan()));
    }

    #[test]
    fn test_keyword_constructor_adds_sigil() {
        assert_eq!(Value::keyword("kw"), Value::Keyword(Rc::from(":kw")));
        assert_eq!(Value::keyword(":kw"), Value::Keyword(Rc::from(":kw")));
        // The sigil distinguishes keywords from same-named strings/symbols
        assert_ne!(Value::keyword("kw"), Value::string("kw"));
        assert_ne!(Value::keyword("kw"), Value::symbol("kw"));
    }

    #[test]
    fn test_equality_is_payload_based() {
        let test_cases = vec![
            // (lhs, rhs, expected equal)
            (Value::Nil, Value::Nil, true),
            (Value::Bool(true), Value::Bool(true), true),
            (Value::Bool(true), Value::Bool(false), false),
            // Int and Float share the numeric payload
            (Value::Int(3), Value::Float(3.0), true),
            (Value::Int(3), Value::Float(3.5), false),
            (Value::string("a"), Value::string("a"), true),
            (Value::string("a"), Value::string("b"), false),
            // String and Symbol share the text payload
            (Value::string("a"), Value::symbol("a"), true),
            // A keyword's sigil keeps it apart from the bare text
            (Value::keyword("a"), Value::string("a"), false),
            (Value::keyword("a"), Value::string(":a"), true),
            // List and Vector share the sequence payload
            (
                list(vec![int(1), int(2)]),
                Value::vector(vec![int(1), int(2)]),
                true,
            ),
            (
                list(vec![int(1), int(2)]),
                list(vec![int(1), int(2), int(3)]),
                false,
            ),
            (list(vec![]), Value::Nil, false),
            (Value::Nil, Value::Bool(false), false),
            (Value::Int(0), Value::Nil, false),
        ];

        for (i, (lhs, rhs, expected)) in test_cases.iter().enumerate() {
            assert_eq!(
                lhs == rhs,
                *expected,
                "case {}: {lhs:?} vs {rhs:?}",
                i + 1
            );
            // Symmetry
            assert_eq!(
                rhs == lhs,
                *expected,
                "case {} (swapped): {rhs:?} vs {lhs:?}",
                i + 1
            );
        }
    }

    #[test]
    fn test_atom_equality_is_identity() {
        let a = Value::atom(Value::Int(1), None);
        let b = Value::atom(Value::Int(1), None);

        // The debug name tag takes no part in equality
        let named = Value::atom(Value::Int(1), Some("counter".to_string()));
        assert_ne!(a, named);
        assert_eq!(format!("{named:?}"), "Atom(counter, Int(1))");

        // Structurally equal contents, distinct cells
        assert_ne!(a, b);
        // The same cell through another binding stays equal after mutation
        let alias = a.clone();
        assert_eq!(a, alias);
        a.as_atom().unwrap().store(Value::Int(2));
        assert_eq!(a, alias);
        assert_eq!(alias.as_atom().unwrap().load(), Value::Int(2));
        // Identity-based ordering is stable
        assert_eq!(a.cmp(&b), a.cmp(&b));
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn test_ordering_for_map_keys() {
        let mut entries = BTreeMap::new();
        // Inserted out of order; the map iterates by the total order
        entries.insert(Value::symbol("b"), int(2));
        entries.insert(Value::symbol("a"), int(1));
        let keys: Vec<Value> = entries.keys().cloned().collect();
        assert_eq!(keys, vec![Value::symbol("a"), Value::symbol("b")]);

        // Numbers order numerically across tags
        assert!(Value::Int(2) < Value::Float(2.5));
        assert!(Value::Float(2.5) < Value::Int(3));
        // Sequences order element-wise then by length
        assert!(list(vec![int(1), int(2)]) < list(vec![int(1), int(3)]));
        assert!(list(vec![int(1)]) < list(vec![int(1), int(0)]));
        // Cross-shape comparisons use the fixed shape rank
        assert!(Value::Nil < Value::Bool(false));
        assert!(Value::Bool(true) < Value::Int(0));
        assert!(Value::Int(9) < Value::string(""));
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let victims = vec![
            Value::Nil,
            Value::Bool(true),
            Value::string("text"),
            Value::keyword("k"),
            list(vec![int(1)]),
            Value::map(BTreeMap::new()),
            Value::atom(Value::Nil, None),
        ];

        for value in &victims {
            if !matches!(value, Value::Int(_)) {
                let err = value.as_int().unwrap_err();
                assert_eq!(
                    err,
                    Error::Type {
                        expected: "integer",
                        actual: value.type_name()
                    }
                );
            }
            if !matches!(value, Value::Bool(_)) {
                assert!(value.as_bool().is_err(), "{value:?}");
            }
            if !matches!(value, Value::List(_) | Value::Vector(_)) {
                assert!(value.as_seq().is_err(), "{value:?}");
            }
        }

        // Matching kinds succeed
        let mut entries = BTreeMap::new();
        entries.insert(Value::keyword("k"), Value::Int(1));
        let map = Value::map(entries);
        assert_eq!(map.as_map().unwrap().len(), 1);
        assert!(Value::Nil.as_map().is_err());

        assert_eq!(Value::Int(7).as_int().unwrap(), 7);
        assert_eq!(Value::Int(7).as_float().unwrap(), 7.0);
        assert_eq!(Value::Float(1.5).as_float().unwrap(), 1.5);
        // as_int is strict: a float is not an integer
        assert!(Value::Float(1.5).as_int().is_err());
        assert_eq!(Value::string("s").as_str().unwrap(), "s");
        // as_str is strict; as_text covers the whole text payload
        assert!(Value::symbol("s").as_str().is_err());
        assert_eq!(Value::symbol("s").as_text().unwrap(), "s");
        assert_eq!(Value::keyword("k").as_text().unwrap(), ":k");
        assert!(Value::Int(1).as_text().is_err());
        assert_eq!(
            Value::vector(vec![int(1)]).as_seq().unwrap(),
            &[Value::Int(1)]
        );
    }

    #[test]
    fn test_seq_mut_is_copy_on_write() {
        let original = list(vec![int(1), int(2)]);
        let mut copy = original.clone();
        copy.as_seq_mut().unwrap().push(int(3));

        assert_eq!(original.as_seq().unwrap().len(), 2);
        assert_eq!(copy.as_seq().unwrap().len(), 3);
    }

    #[test]
    fn test_sequence_helpers() {
        let empty = list(vec![]);
        let seq = Value::vector(vec![int(10), int(20)]);

        assert_eq!(empty.first().unwrap(), Value::Nil);
        assert_eq!(seq.first().unwrap(), int(10));
        assert!(empty.is_empty_seq().unwrap());
        assert!(!seq.is_empty_seq().unwrap());

        assert_eq!(seq.nth(1).unwrap(), int(20));
        assert_eq!(
            empty.nth(0).unwrap_err(),
            Error::Index { index: 0, len: 0 }
        );
        assert_eq!(
            seq.nth(5).unwrap_err(),
            Error::Index { index: 5, len: 2 }
        );

        // Helpers are sequence-only
        assert!(Value::Int(1).first().is_err());
        assert!(Value::string("no").nth(0).is_err());
    }

    #[test]
    fn test_numeric_operators() {
        let div = |a: f64, b: f64| a / b;

        // Exact results regain the integer tag
        assert_eq!(
            numeric_op(div, &Value::Int(6), &Value::Int(2)).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            numeric_op(div, &Value::Int(6), &Value::Int(4)).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            numeric_op(|a, b| a + b, &Value::Float(0.5), &Value::Float(0.5)).unwrap(),
            Value::Int(1)
        );

        assert_eq!(
            numeric_pred(|a, b| a < b, &Value::Int(1), &Value::Float(1.5)).unwrap(),
            Value::Bool(true)
        );

        // Non-numeric operands are rejected with the accessor's type error
        let err = numeric_op(div, &Value::string("6"), &Value::Int(2)).unwrap_err();
        assert_eq!(
            err,
            Error::Type {
                expected: "number",
                actual: "string"
            }
        );
    }

    #[test]
    fn test_apply_binary_checks_operand_kinds() {
        let concat =
            apply_binary(|a: &str, b: &str| format!("{a}{b}"), &Value::string("ab"), &Value::string("cd"))
                .unwrap();
        assert_eq!(concat, "abcd");

        // The assumed kind is checked, not trusted
        let err = apply_binary(|a: bool, b: bool| a && b, &Value::Bool(true), &Value::Int(1))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Type {
                expected: "bool",
                actual: "integer"
            }
        );
    }
}
