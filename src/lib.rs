//! # ron_notation
//!
//! Parsers for a Rusty-Object-Notation style text format.
//!
//! ## What is in the box?
//!
//! - **Combinator parser**: backtracking recursive descent over a fully
//!   buffered document, covering the whole grammar
//! - **Stream parser**: an explicit pushdown automaton that accepts input one
//!   byte at a time, for field structures with string leaves
//! - **Value model**: a closed [`Value`] enum with numbers, strings, booleans,
//!   chars, options, tuples, lists, maps and structs
//!
//! ## Quick Start
//!
//! ```rust
//! use ron_notation::{parse, Value};
//!
//! let value = parse(r#"
//!     Config(
//!         name: "demo",      // comments are allowed
//!         retries: 0x3,
//!         ratio: 2.5e-1,
//!         tags: ["a", "b"],
//!         fallback: None,
//!         mode: Fast,
//!     )
//! "#).unwrap();
//!
//! let config = value.as_struct().unwrap();
//! assert_eq!(config.name(), Some("Config"));
//! assert_eq!(config.field("retries").and_then(Value::as_i64), Some(3));
//! assert_eq!(config.field("ratio").and_then(Value::as_f64), Some(0.25));
//! assert_eq!(config.field("fallback"), Some(&Value::Option(None)));
//! ```
//!
//! ### Streaming
//!
//! ```rust
//! use ron_notation::StreamParser;
//!
//! let mut parser = StreamParser::new();
//! parser.feed(b"(greeting: \"hel").unwrap();
//! parser.feed(b"lo\")").unwrap();
//! let value = parser.finish().unwrap();
//! assert_eq!(value.to_string(), r#"(greeting: "hello")"#);
//! ```
//!
//! ## Errors
//!
//! A grammar mismatch inside the parser is not an error: rules report it with
//! `Ok(None)` and the caller tries the next alternative. Only a failure of the
//! whole document, or a literal that is malformed after it was recognized,
//! surfaces as an [`Error`]. Error messages include the byte offset and a short
//! excerpt of the input.
//!
//! ## Format Reference
//!
//! See the [`syntax`] module.

pub mod cache;
pub mod error;
pub mod grammar;
pub mod input;
pub mod macros;
pub mod map;
pub mod options;
pub mod primitive;
pub mod stream;
pub mod syntax;
pub mod value;

pub use cache::UnitStructCache;
pub use error::{Error, Parsed, Result};
pub use grammar::Parser;
pub use input::{Checkpoint, Cursor};
pub use map::ValueMap;
pub use options::{ParserOptions, UnitStructs};
pub use stream::StreamParser;
pub use value::{Field, Struct, Value};

use std::io;

/// Parse one value from a complete document.
///
/// # Examples
///
/// ```rust
/// use ron_notation::{parse, Value};
///
/// let value = parse(r#"("abc", 1.23, true)"#).unwrap();
/// assert_eq!(
///     value,
///     Value::Tuple(vec![Value::from("abc"), Value::from(1.23), Value::from(true)])
/// );
/// ```
///
/// # Errors
///
/// Returns an error if no value matches, a literal is malformed, or anything
/// but whitespace and comments follows the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Value> {
    parse_with_options(text, &ParserOptions::default())
}

/// Parse one value with custom options.
///
/// # Examples
///
/// ```rust
/// use ron_notation::{parse_with_options, ParserOptions};
///
/// let options = ParserOptions::new().without_unit_struct_cache();
/// let a = parse_with_options("Coin", &options).unwrap();
/// let b = parse_with_options("Coin", &options).unwrap();
/// assert_eq!(a, b);
/// assert!(!a.same_instance(&b));
/// ```
///
/// # Errors
///
/// Same as [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, options: &ParserOptions) -> Result<Value> {
    Parser::new(options.clone()).parse(text)
}

/// Parse one value from bytes of notation text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or do not form a document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8]) -> Result<Value> {
    parse(std::str::from_utf8(bytes)?)
}

/// Read a whole document from an I/O stream and parse it.
///
/// This buffers the complete input first. To parse while data is still
/// arriving, use [`stream::from_reader`].
///
/// # Examples
///
/// ```rust
/// use ron_notation::from_reader;
/// use std::io::Cursor;
///
/// let value = from_reader(Cursor::new(b"[1, 2, 3]")).unwrap();
/// assert_eq!(value.as_list().map(|items| items.len()), Some(3));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the bytes are not valid UTF-8, or they
/// do not form a document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        for (text, expected) in [
            ("001", 1.0),
            ("0x1", 1.0),
            ("0xAa", 170.0),
            ("0b010", 2.0),
            ("3.14e2", 314.0),
            ("3e2", 300.0),
        ] {
            assert_eq!(parse(text).unwrap(), Value::Number(expected), "{:?}", text);
        }
    }

    #[test]
    fn test_bare_identifier_is_a_unit_struct() {
        // `e2` is not a number, but it is a valid type name
        let value = parse("e2").unwrap();
        assert!(value.as_struct().unwrap().is_unit());
    }

    #[test]
    fn test_from_slice() {
        assert_eq!(from_slice(b"true").unwrap(), Value::Bool(true));
        assert!(matches!(
            from_slice(&[b'"', 0xff, b'"']),
            Err(Error::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_from_reader_reports_invalid_utf8_like_from_slice() {
        let bytes: &[u8] = &[b'[', 0xc3, b']'];
        assert!(matches!(
            from_reader(io::Cursor::new(bytes)),
            Err(Error::InvalidUtf8(_))
        ));
        assert!(matches!(from_slice(bytes), Err(Error::InvalidUtf8(_))));
    }

    #[test]
    fn test_unit_struct_identity_across_calls() {
        let a = parse("Coin").unwrap();
        let b = parse("Some(Coin)").unwrap();
        let inner = b.as_option().flatten().unwrap();
        assert!(a.same_instance(inner));
        let c = parse("Coin(foo: 1)").unwrap();
        assert!(!a.same_instance(&c));
    }

    #[test]
    fn test_display_round_trip() {
        let text = r#"{ "k": [Some('\n'), None], 2: Point(x: -1.5, tag: r"raw\d") }"#;
        let value = parse(text).unwrap();
        assert_eq!(parse(&value.to_string()).unwrap(), value);
    }
}
