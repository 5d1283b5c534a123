//! Runtime values for the rill virtual machine.
//!
//! # Closed Categories
//!
//! `Value` has three scalar categories plus [`Complex`], which holds every
//! heap-backed category. The set is fixed by the language: new categories
//! are added by extending the enums, and every consumer matches
//! exhaustively.
//!
//! # Immutability
//!
//! Values never change after construction. "Setting" an array item or an
//! object key builds a new value that shares nothing mutable with the old
//! one, so values can be handed to native functions and across machines
//! without copying.
//!
//! # Heap Enforcement
//!
//! Heap allocations go through factory methods (`Value::string`,
//! `Value::array`, ...). `Heap<T>` has a crate-private constructor, so
//! outside code cannot build heap categories directly.

mod heap;

use std::cmp::Ordering;
use std::fmt;

use rill_ir::Name;
use rustc_hash::FxHashMap;

use crate::native::{Builtin, NativeContext};
use crate::{EvalErrorKind, Function};

pub use heap::Heap;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// The `null` literal.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Every number is a 64-bit float.
    Number(f64),
    /// Heap-backed categories.
    Complex(Complex),
}

/// Heap-backed value categories.
#[derive(Clone)]
pub enum Complex {
    String(Heap<String>),
    Array(Array),
    Object(Object),
    /// User-defined function.
    Function(Heap<Function>),
    /// Native callback supplied by the host.
    Builtin(Builtin),
    /// Unresolved symbol. Only the reader and compiler ever see these; one
    /// reaching an instruction stream is a compiler defect.
    Variable(Name),
}

/// Ordered sequence of values.
///
/// The `arguments` flag marks an array produced by `to_argument`: when it
/// is passed to a call, its items are spread into the argument list.
#[derive(Clone)]
pub struct Array {
    items: Heap<Vec<Value>>,
    arguments: bool,
}

impl Array {
    pub fn new(items: Vec<Value>) -> Self {
        Array {
            items: Heap::new(items),
            arguments: false,
        }
    }

    /// An argument list, spread at invocation.
    pub fn arguments(items: Vec<Value>) -> Self {
        Array {
            items: Heap::new(items),
            arguments: true,
        }
    }

    /// The same items, marked for spreading.
    #[must_use]
    pub fn into_arguments(self) -> Self {
        Array {
            items: self.items,
            arguments: true,
        }
    }

    #[inline]
    pub fn is_arguments(&self) -> bool {
        self.arguments
    }

    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// A new array with `index` replaced, or appended when `index == len`.
    pub fn with(&self, index: usize, value: Value) -> Option<Array> {
        let mut items = self.items.to_vec();
        match index.cmp(&items.len()) {
            Ordering::Less => {
                if let Some(slot) = items.get_mut(index) {
                    *slot = value;
                }
            }
            Ordering::Equal => items.push(value),
            Ordering::Greater => return None,
        }
        Some(Array::new(items))
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// String-keyed, unordered mapping.
#[derive(Clone)]
pub struct Object(Heap<FxHashMap<Name, Value>>);

impl Object {
    pub fn new(entries: FxHashMap<Name, Value>) -> Self {
        Object(Heap::new(entries))
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries sorted by key, for deterministic rendering and comparison.
    pub fn sorted_entries(&self) -> Vec<(&Name, &Value)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// A new object with `key` bound to `value`.
    #[must_use]
    pub fn with(&self, key: Name, value: Value) -> Object {
        let mut entries = (*self.0).clone();
        entries.insert(key, value);
        Object::new(entries)
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::new(FxHashMap::default())
    }
}

// Factory Methods

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(text: impl Into<String>) -> Self {
        Value::Complex(Complex::String(Heap::new(text.into())))
    }

    /// Create an array value.
    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Complex(Complex::Array(Array::new(items)))
    }

    /// Create an object value.
    #[inline]
    pub fn object(entries: FxHashMap<Name, Value>) -> Self {
        Value::Complex(Complex::Object(Object::new(entries)))
    }

    /// Wrap a compiled function.
    #[inline]
    pub fn function(function: Function) -> Self {
        Value::Complex(Complex::Function(Heap::new(function)))
    }

    /// Create a native function value.
    pub fn builtin<F>(name: impl Into<Name>, func: F) -> Self
    where
        F: Fn(&mut dyn NativeContext, Array) -> Result<(), EvalErrorKind> + Send + Sync + 'static,
    {
        Value::Complex(Complex::Builtin(Builtin::new(name, func)))
    }

    /// Create a symbol reference (compile time only).
    #[inline]
    pub fn variable(name: impl Into<Name>) -> Self {
        Value::Complex(Complex::Variable(name.into()))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Complex(Complex::Array(array))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Complex(Complex::Object(object))
    }
}

// Capability checks

impl Value {
    /// `true` only for `Bool(true)`. Other categories are neither true nor false.
    #[inline]
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// `true` only for `Bool(false)`.
    #[inline]
    pub fn is_false(&self) -> bool {
        matches!(self, Value::Bool(false))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Complex(Complex::Array(_)))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Complex(Complex::Object(_)))
    }

    /// User-defined function (not a builtin).
    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Complex(Complex::Function(_)))
    }

    /// Function or builtin.
    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Complex(Complex::Function(_) | Complex::Builtin(_))
        )
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        matches!(self, Value::Complex(Complex::Variable(_)))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Complex(Complex::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Complex(Complex::Array(array)) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Complex(Complex::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Heap<Function>> {
        match self {
            Value::Complex(Complex::Function(function)) => Some(function),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Name> {
        match self {
            Value::Complex(Complex::Variable(name)) => Some(name),
            _ => None,
        }
    }

    /// Get the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Complex(complex) => match complex {
                Complex::String(_) => "string",
                Complex::Array(_) => "array",
                Complex::Object(_) => "object",
                Complex::Function(_) => "function",
                Complex::Builtin(_) => "builtin",
                Complex::Variable(_) => "variable",
            },
        }
    }
}

// Property Access

impl Value {
    /// Index into an array (by position) or an object (by key).
    pub fn property(&self, key: &str) -> Result<Value, EvalErrorKind> {
        match self {
            Value::Complex(Complex::Array(array)) => parse_index(key)
                .and_then(|index| array.get(index))
                .cloned()
                .ok_or_else(|| EvalErrorKind::MissingIndex {
                    index: key.to_string(),
                    len: array.len(),
                }),
            Value::Complex(Complex::Object(object)) => {
                object
                    .get(key)
                    .cloned()
                    .ok_or_else(|| EvalErrorKind::MissingKey {
                        key: key.to_string(),
                    })
            }
            _ => Err(EvalErrorKind::NotIndexable {
                type_name: self.type_name(),
                key: key.to_string(),
            }),
        }
    }

    /// A copy of this container with `key` set to `value`.
    pub fn with_property(&self, key: &str, value: Value) -> Result<Value, EvalErrorKind> {
        match self {
            Value::Complex(Complex::Array(array)) => parse_index(key)
                .and_then(|index| array.with(index, value))
                .map(Value::from)
                .ok_or_else(|| EvalErrorKind::MissingIndex {
                    index: key.to_string(),
                    len: array.len(),
                }),
            Value::Complex(Complex::Object(object)) => {
                Ok(Value::from(object.with(Name::new(key), value)))
            }
            _ => Err(EvalErrorKind::NotIndexable {
                type_name: self.type_name(),
                key: key.to_string(),
            }),
        }
    }
}

fn parse_index(key: &str) -> Option<usize> {
    key.parse().ok()
}

// Ordering

impl Value {
    /// Position of the category in the total order.
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Complex(complex) => complex.rank(),
        }
    }

    /// Total order over all values: category first, then contents.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => compare_numbers(*a, *b),
            (Value::Complex(a), Value::Complex(b)) => a.compare(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// IEEE comparison where it is defined, `total_cmp` for NaN.
///
/// Keeps `0 == -0` while still ordering NaN deterministically.
fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

fn compare_slices(a: &[Value], b: &[Value]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.compare(y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn compare_objects(a: &Object, b: &Object) -> Ordering {
    let a = a.sorted_entries();
    let b = b.sorted_entries();
    a.iter()
        .zip(&b)
        .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.compare(vb)))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

impl Complex {
    fn rank(&self) -> u8 {
        match self {
            Complex::String(_) => 3,
            Complex::Array(_) => 4,
            Complex::Object(_) => 5,
            Complex::Function(_) => 6,
            Complex::Builtin(_) => 7,
            Complex::Variable(_) => 8,
        }
    }

    fn compare(&self, other: &Complex) -> Ordering {
        match (self, other) {
            (Complex::String(a), Complex::String(b)) => a.as_str().cmp(b.as_str()),
            (Complex::Array(a), Complex::Array(b)) => compare_slices(a.items(), b.items()),
            (Complex::Object(a), Complex::Object(b)) => compare_objects(a, b),
            (Complex::Function(a), Complex::Function(b)) => a
                .name()
                .cmp(b.name())
                .then_with(|| Heap::as_ptr(a).cmp(&Heap::as_ptr(b))),
            (Complex::Builtin(a), Complex::Builtin(b)) => a
                .name()
                .cmp(b.name())
                .then_with(|| a.identity().cmp(&b.identity())),
            (Complex::Variable(a), Complex::Variable(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other).is_eq()
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        compare_slices(self.items(), other.items()).is_eq()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        compare_objects(self, other).is_eq()
    }
}

// Rendering

impl Value {
    /// Render for output. Strings at the top level are written raw; inside
    /// containers they are quoted.
    fn render(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Complex(complex) => match complex {
                Complex::String(s) if nested => write_quoted(f, s),
                Complex::String(s) => f.write_str(s),
                Complex::Array(array) => {
                    f.write_str("[")?;
                    for (i, item) in array.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        item.render(f, true)?;
                    }
                    f.write_str("]")
                }
                Complex::Object(object) => {
                    f.write_str("{")?;
                    for (i, (key, value)) in object.sorted_entries().into_iter().enumerate() {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        write_quoted(f, key)?;
                        f.write_str(" ")?;
                        value.render(f, true)?;
                    }
                    f.write_str("}")
                }
                Complex::Function(function) => write!(f, "<function {}>", function.name()),
                Complex::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
                Complex::Variable(name) => f.write_str(name),
            },
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// Like `Display`, but strings are always quoted.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, true)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments {
            f.write_str("...")?;
        }
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.sorted_entries()).finish()
    }
}
