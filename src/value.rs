//! Dynamic value representation for parsed documents.
//!
//! [`Value`] is a closed sum over every kind the notation can express. Composite
//! kinds hold further `Value`s, so a parsed document is a plain owned tree that
//! can be matched exhaustively.
//!
//! ## Core Types
//!
//! - [`Value`]: number, string, boolean, char, option, tuple, list, map, struct
//! - [`Struct`]: an optionally named list of [`Field`]s
//! - [`ValueMap`]: ordered key/value pairs with arbitrary value keys
//!
//! ## Examples
//!
//! ```rust
//! use ron_notation::{parse, Value};
//!
//! let value = parse(r#"Point(x: 1, y: -2.5, label: Some("origin"))"#).unwrap();
//! let point = value.as_struct().unwrap();
//!
//! assert_eq!(point.name(), Some("Point"));
//! assert_eq!(point.field("x"), Some(&Value::Number(1.0)));
//! assert_eq!(point.field("y").and_then(Value::as_f64), Some(-2.5));
//! assert!(point.field("label").unwrap().is_option());
//! ```
//!
//! ## Rendering
//!
//! `Display` writes canonical notation text that parses back to an equal value.
//! It does not preserve the original layout or comments.
//!
//! ```rust
//! use ron_notation::{parse, Value};
//!
//! let value = parse("( foo: 1.0, bar: [ 'x', \"y\" ] )").unwrap();
//! assert_eq!(value.to_string(), r#"(foo: 1, bar: ['x', "y"])"#);
//! assert_eq!(parse(&value.to_string()).unwrap(), value);
//! ```

use crate::ValueMap;
use serde::ser::{SerializeMap, SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};
use std::fmt::{self, Write};
use std::sync::Arc;

/// Any value the notation can express.
///
/// Numbers use one double-precision domain for integer and float literals.
/// Structs are reference counted so that unit structs resolved through a
/// [`UnitStructCache`](crate::UnitStructCache) can share one instance; see
/// [`Value::same_instance`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    Char(char),
    Option(Option<Box<Value>>),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Map(ValueMap),
    Struct(Arc<Struct>),
}

/// A structure with an optional type name and ordered fields.
///
/// Field order follows the source. Repeated field names are kept as written;
/// lookups by name return the first occurrence.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Struct {
    name: Option<String>,
    fields: Vec<Field>,
}

/// One `name: value` entry of a [`Struct`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Struct {
    /// Creates a struct from a type name and fields.
    #[must_use]
    pub fn new(name: Option<String>, fields: Vec<Field>) -> Self {
        Struct { name, fields }
    }

    /// Creates a unit struct: a type name with no fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ron_notation::Struct;
    ///
    /// let coin = Struct::unit("Coin");
    /// assert!(coin.is_unit());
    /// assert_eq!(coin.name(), Some("Coin"));
    /// ```
    #[must_use]
    pub fn unit(name: impl Into<String>) -> Self {
        Struct {
            name: Some(name.into()),
            fields: Vec::new(),
        }
    }

    /// The type name, if one was written.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// All fields in source order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    /// The value of the first field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Every value written under `name`, in source order.
    pub fn fields_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Value> + 's {
        self.fields
            .iter()
            .filter(move |field| field.name == name)
            .map(|field| &field.value)
    }

    /// Appends a field, keeping any earlier field of the same name.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Returns `true` for a named struct without fields.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.name.is_some() && self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Value {
    /// Short name of the value's kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Char(_) => "char",
            Value::Option(_) => "option",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_char(&self) -> bool {
        matches!(self, Value::Char(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_option(&self) -> bool {
        matches!(self, Value::Option(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self, Value::Struct(_))
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number as an `i64` when it is integral and in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ron_notation::Value;
    ///
    /// assert_eq!(Value::Number(42.0).as_i64(), Some(42));
    /// assert_eq!(Value::Number(4.2).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n)
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 =>
            {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// The option's payload: `Some(None)` for `None`, `Some(Some(v))` for `Some(v)`.
    #[must_use]
    pub fn as_option(&self) -> Option<Option<&Value>> {
        match self {
            Value::Option(inner) => Some(inner.as_deref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` when both values are structs backed by the same allocation.
    ///
    /// Equality (`==`) compares contents; this compares identity. Unit structs
    /// resolved through one cache are the same instance:
    ///
    /// ```rust
    /// use ron_notation::parse;
    ///
    /// let a = parse("Coin").unwrap();
    /// let b = parse("[Coin]").unwrap();
    /// assert!(a.same_instance(&b.as_list().unwrap()[0]));
    /// ```
    #[must_use]
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Struct(a), Value::Struct(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str, quote: char) -> fmt::Result {
    f.write_char(quote)?;
    for ch in text.chars() {
        match ch {
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            '\\' => f.write_str("\\\\")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn write_separated<T>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write_quoted(f, s, '"'),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write_quoted(f, c.encode_utf8(&mut [0; 4]), '\''),
            Value::Option(None) => f.write_str("None"),
            Value::Option(Some(inner)) => write!(f, "Some({})", inner),
            Value::Tuple(items) => {
                f.write_char('(')?;
                write_separated(f, items, |f, item| write!(f, "{}", item))?;
                f.write_char(')')
            }
            Value::List(items) => {
                f.write_char('[')?;
                write_separated(f, items, |f, item| write!(f, "{}", item))?;
                f.write_char(']')
            }
            Value::Map(map) => {
                f.write_char('{')?;
                write_separated(f, map.iter(), |f, (k, v)| write!(f, "{}: {}", k, v))?;
                f.write_char('}')
            }
            Value::Struct(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for Struct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
            if self.fields.is_empty() {
                return Ok(());
            }
        }
        f.write_char('(')?;
        write_separated(f, &self.fields, |f, field| {
            write!(f, "{}: {}", field.name, field.value)
        })?;
        f.write_char(')')
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::Option(None) => serializer.serialize_none(),
            Value::Option(Some(inner)) => serializer.serialize_some(inner.as_ref()),
            Value::Tuple(items) => {
                let mut tuple = serializer.serialize_tuple(items.len())?;
                for item in items {
                    tuple.serialize_element(item)?;
                }
                tuple.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => map.serialize(serializer),
            Value::Struct(s) => s.serialize(serializer),
        }
    }
}

/// Named unit structs serialize as their name; every other struct serializes
/// as a map from field name to value.
impl Serialize for Struct {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let (Some(name), true) = (&self.name, self.fields.is_empty()) {
            return serializer.serialize_str(name);
        }
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Value::Option(value.map(|inner| Box::new(inner.into())))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<Struct> for Value {
    fn from(value: Struct) -> Self {
        Value::Struct(Arc::new(value))
    }
}

impl From<Arc<Struct>> for Value {
    fn from(value: Arc<Struct>) -> Self {
        Value::Struct(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_predicates() {
        let v = Value::from("x");
        assert_eq!(v.kind(), "string");
        assert!(v.is_string());
        assert!(!v.is_number());
        assert_eq!(Value::from(Some(1)).kind(), "option");
        assert!(Value::Tuple(vec![]).is_tuple());
    }

    #[test]
    fn test_display_escapes() {
        assert_eq!(Value::from("a\"b\\c\n").to_string(), r#""a\"b\\c\n""#);
        assert_eq!(Value::from('\'').to_string(), r"'\''");
        assert_eq!(Value::from('"').to_string(), "'\"'");
        assert_eq!(Value::Option(None).to_string(), "None");
        assert_eq!(Value::from(Some(true)).to_string(), "Some(true)");
    }

    #[test]
    fn test_display_structs() {
        assert_eq!(Value::from(Struct::unit("Coin")).to_string(), "Coin");
        let point = Struct::new(
            Some("Point".to_string()),
            vec![Field::new("x", 1), Field::new("y", 2.5)],
        );
        assert_eq!(Value::from(point).to_string(), "Point(x: 1, y: 2.5)");
        let anonymous = Struct::new(None, vec![Field::new("a", "b")]);
        assert_eq!(Value::from(anonymous).to_string(), r#"(a: "b")"#);
    }

    #[test]
    fn test_duplicate_fields_are_kept() {
        let mut s = Struct::default();
        s.push(Field::new("a", 1));
        s.push(Field::new("a", 2));
        assert_eq!(s.len(), 2);
        assert_eq!(s.field("a"), Some(&Value::Number(1.0)));
        let all: Vec<_> = s.fields_named("a").cloned().collect();
        assert_eq!(all, vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn test_same_instance_vs_equality() {
        let shared = Arc::new(Struct::unit("Coin"));
        let a = Value::Struct(Arc::clone(&shared));
        let b = Value::Struct(shared);
        let c = Value::from(Struct::unit("Coin"));
        assert!(a.same_instance(&b));
        assert!(!a.same_instance(&c));
        assert_eq!(a, c);
        assert!(!Value::from(1).same_instance(&Value::from(1)));
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::from(-3).as_i64(), Some(-3));
        assert_eq!(Value::from(0.5).as_i64(), None);
        assert_eq!(Value::from("3").as_i64(), None);
    }
}
