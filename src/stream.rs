//! Incremental parsing from arbitrarily chunked bytes.
//!
//! The combinator parser needs the whole document in memory because it rewinds.
//! [`StreamParser`] instead consumes one byte at a time and can stop between
//! any two bytes, including in the middle of a token or a multi-byte character.
//! It never looks back, so every byte must fit the active transition; anything
//! else is fatal.
//!
//! # Architecture
//!
//! Recursive descent is trampolined onto two explicit stacks:
//!
//! ```text
//! bytes ──▶ push_byte ──▶ task stack (what to read next)
//!                         value stack (fragments under construction)
//! ```
//!
//! A nested value is read by pushing continuation tasks and then a
//! `ReadValue` task on top. When the nested value is complete its
//! continuations run and fold the fragment into its parent.
//!
//! # Supported subset
//!
//! Field structures whose leaves are strings, e.g.
//! `(name: "node", child: (name: "leaf"))`. The same text parses to an equal
//! value through [`parse`](crate::parse).
//!
//! ```rust
//! use ron_notation::{parse, StreamParser};
//!
//! let text = br#"(name: "node", child: (name: "leaf"))"#;
//! let mut parser = StreamParser::new();
//! for chunk in text.chunks(3) {
//!     parser.feed(chunk).unwrap();
//! }
//! let value = parser.finish().unwrap();
//! assert_eq!(value, parse(std::str::from_utf8(text).unwrap()).unwrap());
//! ```

use crate::error::{Error, Result};
use crate::input::is_identifier_char;
use crate::primitive::unescape;
use crate::{Field, Struct, Value};
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{debug, trace};

/// Size of the buffer used by [`from_reader`].
const READ_CHUNK: usize = 8 * 1024;

/// Pending grammar obligations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Expect the first byte of a value
    ReadValue,
    /// Inside `( ... )`: expect a field name, a separator or `)`.
    /// `after_field` is set once a field was attached and no comma followed it yet.
    ReadFields { after_field: bool },
    /// Accumulate a field name
    ReadField,
    /// Field name read; expect `:`
    ReadColon,
    /// Accumulate string bytes until the closing quote
    ReadString,
    /// The byte after a backslash inside a string
    ReadEscape,
    /// Pop value and key, push a field
    CreateField,
    /// Pop a field and append it to the structure below
    AttachField,
}

impl Task {
    fn expected(self) -> &'static str {
        match self {
            Task::ReadValue => "a value",
            Task::ReadFields { .. } => "a field name or ')'",
            Task::ReadField | Task::ReadColon => "':'",
            Task::ReadString | Task::ReadEscape => "closing '\"'",
            Task::CreateField | Task::AttachField => "a field value",
        }
    }
}

/// Fragments on the value stack.
#[derive(Debug)]
enum Frame {
    /// Raw string bytes; decoded when the literal closes
    Bytes(Vec<u8>),
    Key(String),
    Struct(Vec<Field>),
    Field(Field),
    Value(Value),
}

impl Frame {
    fn describe(&self) -> &'static str {
        match self {
            Frame::Bytes(_) => "string fragment",
            Frame::Key(_) => "field key",
            Frame::Struct(_) => "structure",
            Frame::Field(_) => "field",
            Frame::Value(value) => value.kind(),
        }
    }
}

/// Push-based parser for the streaming subset.
///
/// Feed bytes with [`StreamParser::feed`] as they arrive, then call
/// [`StreamParser::finish`]. After the first error the parser is poisoned and
/// every later call returns that error again.
#[derive(Debug)]
pub struct StreamParser {
    tasks: Vec<Task>,
    stack: Vec<Frame>,
    root: Option<Value>,
    offset: u64,
    failed: Option<Error>,
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamParser {
    #[must_use]
    pub fn new() -> Self {
        StreamParser {
            tasks: Vec::with_capacity(16),
            stack: Vec::with_capacity(16),
            root: None,
            offset: 0,
            failed: None,
        }
    }

    /// Consumes a chunk of any length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] at the first byte that does not fit the grammar.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        for &byte in chunk {
            self.push_byte(byte)?;
        }
        Ok(())
    }

    /// Consumes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] if the byte does not fit the grammar, or the
    /// earlier error if the parser is already poisoned.
    pub fn push_byte(&mut self, byte: u8) -> Result<()> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let result = self.step(byte);
        if let Err(err) = &result {
            debug!(offset = self.offset, error = %err, "stream parser failed");
            self.failed = Some(err.clone());
        }
        self.offset += 1;
        result
    }

    /// Returns `true` once a complete top-level value has been read.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.root.is_some()
    }

    /// Number of pending tasks; zero before the first byte and after completion.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tasks.len()
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Ends the input and returns the parsed value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEnd`] if the value is incomplete, or the
    /// poisoning error.
    pub fn finish(mut self) -> Result<Value> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        match self.root.take() {
            Some(value) => Ok(value),
            None => Err(Error::UnexpectedEnd {
                offset: self.offset,
                expected: self
                    .tasks
                    .last()
                    .map_or("a value", |task| task.expected())
                    .to_string(),
            }),
        }
    }

    fn step(&mut self, byte: u8) -> Result<()> {
        if self.root.is_some() {
            return if is_whitespace(byte) {
                Ok(())
            } else {
                Err(self.error_at(byte, "trailing characters"))
            };
        }
        if self.tasks.is_empty() {
            self.tasks.push(Task::ReadValue);
        }
        let task = self.current_task()?;
        trace!(offset = self.offset, byte, ?task, "stream transition");

        match task {
            Task::ReadValue => match byte {
                b if is_whitespace(b) => {}
                b'(' => {
                    self.replace_task(Task::ReadFields { after_field: false });
                    self.stack.push(Frame::Struct(Vec::new()));
                }
                b'"' => {
                    self.replace_task(Task::ReadString);
                    self.stack.push(Frame::Bytes(Vec::new()));
                }
                _ => return Err(self.error_at(byte, "expected '(' or '\"'")),
            },
            Task::ReadFields { after_field } => match byte {
                b if is_whitespace(b) => {}
                b',' if after_field => self.replace_task(Task::ReadFields { after_field: false }),
                b')' => {
                    self.tasks.pop();
                    self.close_struct()?;
                }
                b if is_identifier_char(char::from(b)) => {
                    self.tasks.push(Task::ReadField);
                    self.stack.push(Frame::Key(char::from(b).to_string()));
                }
                _ => return Err(self.error_at(byte, "expected a field name or ')'")),
            },
            Task::ReadField => match byte {
                b if is_identifier_char(char::from(b)) => match self.stack.last_mut() {
                    Some(Frame::Key(key)) => key.push(char::from(b)),
                    _ => return Err(self.error_at(byte, "expected field key on the value stack")),
                },
                b':' => self.begin_field_value(),
                b if is_whitespace(b) => self.replace_task(Task::ReadColon),
                _ => return Err(self.error_at(byte, "expected ':' after field name")),
            },
            Task::ReadColon => match byte {
                b if is_whitespace(b) => {}
                b':' => self.begin_field_value(),
                _ => return Err(self.error_at(byte, "expected ':' after field name")),
            },
            Task::ReadString => match byte {
                b'\\' => self.tasks.push(Task::ReadEscape),
                b'"' => {
                    self.tasks.pop();
                    let bytes = match self.stack.pop() {
                        Some(Frame::Bytes(bytes)) => bytes,
                        _ => return Err(self.error_at(byte, "expected string on the value stack")),
                    };
                    let text = String::from_utf8(bytes)
                        .map_err(|_| self.error_at(byte, "string literal is not valid UTF-8"))?;
                    self.stack.push(Frame::Value(Value::String(text)));
                }
                _ => self.string_bytes(byte)?.push(byte),
            },
            Task::ReadEscape => {
                let decoded = match unescape(char::from(byte)) {
                    Some(decoded) if byte.is_ascii() => decoded,
                    _ => return Err(self.error_at(byte, "unknown escape sequence")),
                };
                self.tasks.pop();
                let mut encoded = [0; 4];
                self.string_bytes(byte)?
                    .extend_from_slice(decoded.encode_utf8(&mut encoded).as_bytes());
            }
            Task::CreateField | Task::AttachField => {
                return Err(self.error_at(byte, "materialization task left pending"));
            }
        }

        self.drain_materialization(byte)?;
        if self.tasks.is_empty() {
            match self.stack.pop() {
                Some(Frame::Value(value)) if self.stack.is_empty() => {
                    debug!(offset = self.offset, kind = value.kind(), "stream value complete");
                    self.root = Some(value);
                }
                _ => return Err(self.error_at(byte, "value stack out of balance")),
            }
        }
        Ok(())
    }

    /// Replaces the field-name task with: read the value, build the field,
    /// attach it to the enclosing structure.
    fn begin_field_value(&mut self) {
        self.tasks.pop();
        self.tasks.push(Task::AttachField);
        self.tasks.push(Task::CreateField);
        self.tasks.push(Task::ReadValue);
    }

    /// Runs tasks that need no input byte.
    fn drain_materialization(&mut self, byte: u8) -> Result<()> {
        while let Some(&task) = self.tasks.last() {
            match task {
                Task::CreateField => {
                    let value = match self.stack.pop() {
                        Some(Frame::Value(value)) => value,
                        other => return Err(self.unexpected_frame(byte, "field value", other)),
                    };
                    let name = match self.stack.pop() {
                        Some(Frame::Key(name)) => name,
                        _ => return Err(self.error_at(byte, "expected field key to be a string")),
                    };
                    self.stack.push(Frame::Field(Field { name, value }));
                    self.tasks.pop();
                }
                Task::AttachField => {
                    let field = match self.stack.pop() {
                        Some(Frame::Field(field)) => field,
                        other => return Err(self.unexpected_frame(byte, "field", other)),
                    };
                    match self.stack.last_mut() {
                        Some(Frame::Struct(fields)) => fields.push(field),
                        _ => return Err(self.error_at(byte, "structure expected")),
                    }
                    self.tasks.pop();
                    self.replace_task(Task::ReadFields { after_field: true });
                }
                _ => return Ok(()),
            }
        }
        Ok(())
    }

    fn close_struct(&mut self) -> Result<()> {
        let fields = match self.stack.pop() {
            Some(Frame::Struct(fields)) => fields,
            other => return Err(self.unexpected_frame(b')', "structure", other)),
        };
        // `()` is the empty tuple in the full grammar as well
        let value = if fields.is_empty() {
            Value::Tuple(Vec::new())
        } else {
            Value::Struct(Arc::new(Struct::new(None, fields)))
        };
        self.stack.push(Frame::Value(value));
        Ok(())
    }

    fn string_bytes(&mut self, byte: u8) -> Result<&mut Vec<u8>> {
        let offset = self.offset;
        match self.stack.last_mut() {
            Some(Frame::Bytes(bytes)) => Ok(bytes),
            _ => Err(Error::stream(
                offset,
                format!("byte 0x{:02x}: expected string on the value stack", byte),
            )),
        }
    }

    fn current_task(&self) -> Result<Task> {
        self.tasks
            .last()
            .copied()
            .ok_or_else(|| Error::stream(self.offset, "no pending task"))
    }

    fn replace_task(&mut self, task: Task) {
        self.tasks.pop();
        self.tasks.push(task);
    }

    fn error_at(&self, byte: u8, msg: &str) -> Error {
        let shown = if byte.is_ascii_graphic() || byte == b' ' {
            format!("'{}'", char::from(byte))
        } else {
            format!("0x{:02x}", byte)
        };
        Error::stream(self.offset, format!("{} (found {})", msg, shown))
    }

    fn unexpected_frame(&self, byte: u8, expected: &str, found: Option<Frame>) -> Error {
        let found = found.as_ref().map_or("nothing", Frame::describe);
        self.error_at(byte, &format!("expected {} but the value stack held {}", expected, found))
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Parses a document delivered as a sequence of chunks.
///
/// ```rust
/// use ron_notation::stream::parse_chunks;
///
/// let value = parse_chunks(["(gree", "ting: \"hi\"", ")"]).unwrap();
/// assert_eq!(value.as_struct().unwrap().field("greeting").unwrap().as_str(), Some("hi"));
/// ```
///
/// # Errors
///
/// Returns the first error raised by [`StreamParser::feed`] or
/// [`StreamParser::finish`].
pub fn parse_chunks<I, B>(chunks: I) -> Result<Value>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut parser = StreamParser::new();
    for chunk in chunks {
        parser.feed(chunk.as_ref())?;
    }
    parser.finish()
}

/// Parses a document from a reader, feeding the parser as data arrives.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise the first parse error.
pub fn from_reader<R: Read>(mut reader: R) -> Result<Value> {
    let mut parser = StreamParser::new();
    let mut buffer = vec![0; READ_CHUNK];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io(&e.to_string())),
        };
        parser.feed(&buffer[..read])?;
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(text: &str) -> Result<Value> {
        parse_chunks([text])
    }

    fn bytewise(text: &str) -> Result<Value> {
        parse_chunks(text.as_bytes().chunks(1))
    }

    #[test]
    fn test_string_root() {
        assert_eq!(stream(r#"  "hello" "#).unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_nested_fields() {
        let value = stream(r#"(a: "x", b: (c: "y"))"#).unwrap();
        let outer = value.as_struct().unwrap();
        assert_eq!(outer.name(), None);
        assert_eq!(outer.field("a"), Some(&Value::from("x")));
        let inner = outer.field("b").and_then(Value::as_struct).unwrap();
        assert_eq!(inner.field("c"), Some(&Value::from("y")));
    }

    #[test]
    fn test_bytewise_matches_single_chunk() {
        let text = "(\n  name: \"root\",\n  child: (\n    name: \"leaf\",\n  ),\n)\n";
        assert_eq!(bytewise(text).unwrap(), stream(text).unwrap());
    }

    #[test]
    fn test_matches_combinator_parser() {
        for text in [
            r#"(a: "x")"#,
            r#"(a: "x" b: "y")"#,
            r#"(a : "x",)"#,
            r#"(a: (b: (c: "deep")), d: "\"esc\"\n")"#,
            "()",
            r#"(empty: ())"#,
        ] {
            assert_eq!(bytewise(text).unwrap(), crate::parse(text).unwrap(), "{:?}", text);
        }
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let text = "(word: \"Grüße\")".as_bytes();
        let split = text.iter().position(|b| *b == 0xc3).unwrap() + 1;
        let value = parse_chunks([&text[..split], &text[split..]]).unwrap();
        assert_eq!(
            value.as_struct().unwrap().field("word"),
            Some(&Value::from("Grüße"))
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(stream(r#""a\tb\\c""#).unwrap(), Value::from("a\tb\\c"));
        let err = stream(r#""a\qb""#).unwrap_err();
        assert!(err.to_string().contains("unknown escape"));
    }

    #[test]
    fn test_unexpected_byte_is_fatal() {
        let err = stream("(a: 1)").unwrap_err();
        match err {
            Error::Stream { offset, msg } => {
                assert_eq!(offset, 4);
                assert!(msg.contains("found '1'"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_separator_rules() {
        assert!(stream(r#"(,a: "x")"#).is_err());
        assert!(stream(r#"(a: "x",, b: "y")"#).is_err());
        assert!(stream(r#"(a,b: "x")"#).is_err());
        assert!(stream("(a\n: \"x\")").is_ok());
    }

    #[test]
    fn test_trailing_content() {
        let err = stream(r#""done" x"#).unwrap_err();
        assert!(err.to_string().contains("trailing characters"));
        assert!(stream("\"done\"\n\n").is_ok());
    }

    #[test]
    fn test_poisoned_after_error() {
        let mut parser = StreamParser::new();
        assert!(parser.feed(b"x").is_err());
        assert!(parser.feed(b"\"ok\"").is_err());
        assert!(parser.finish().is_err());
    }

    #[test]
    fn test_finish_incomplete() {
        let mut parser = StreamParser::new();
        parser.feed(br#"(a: "x""#).unwrap();
        assert!(!parser.is_complete());
        assert!(parser.depth() > 0);
        match parser.finish().unwrap_err() {
            Error::UnexpectedEnd { offset, expected } => {
                assert_eq!(offset, 7);
                assert_eq!(expected, "a field name or ')'");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(
            StreamParser::new().finish(),
            Err(Error::UnexpectedEnd { offset: 0, .. })
        ));
    }

    #[test]
    fn test_from_reader() {
        let text = br#"(title: "from a reader")"#;
        let value = from_reader(&text[..]).unwrap();
        assert_eq!(
            value.as_struct().unwrap().field("title"),
            Some(&Value::from("from a reader"))
        );
    }
}
