//! Error types for parsing object notation text.
//!
//! Parsing has two channels:
//!
//! - **Backtracking**: an ordinary grammar mismatch. Parsers return `Ok(None)`
//!   (see [`Parsed`]) and the caller tries its next alternative. Nothing is
//!   allocated on this path.
//! - **Fatal errors**: the grammar committed to an interpretation and found it
//!   malformed, or the incremental parser received a byte it cannot accept.
//!   These are [`Error`] values and abort the whole parse.
//!
//! ## Examples
//!
//! ```rust
//! use ron_notation::{parse, Error};
//!
//! let err = parse("[1, 2] 3").unwrap_err();
//! assert!(matches!(err, Error::TrailingCharacters { .. }));
//! assert_eq!(err.offset(), Some(7));
//!
//! // Fatal messages carry the offset and a caret under the failing column
//! let text = err.to_string();
//! assert!(text.contains("at 7"));
//! assert!(text.contains('^'));
//! ```

use thiserror::Error;

/// Fatal parse errors.
///
/// Every variant produced while reading text carries the absolute offset of the
/// failure. Variants produced by the combinator parser also carry a short excerpt
/// of the input with a caret under the failing column.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A literal or construct was committed to and then found malformed
    #[error("Failed to parse: {msg}\n  at {offset}\nInput:\n{context}")]
    Syntax {
        offset: usize,
        msg: String,
        context: String,
    },

    /// A complete value was parsed but non-whitespace content follows it
    #[error("Failed to parse: trailing characters\n  at {offset}\nInput:\n{context}")]
    TrailingCharacters { offset: usize, context: String },

    /// The end-of-input check was invoked more often than the configured guard allows
    #[error("Failed to parse: infinite loop (more than {limit} end-of-input checks)\n  at {offset}\nInput:\n{context}")]
    RunawayLoop {
        offset: usize,
        limit: usize,
        context: String,
    },

    /// Values were nested deeper than the configured maximum depth
    #[error("Failed to parse: recursion limit exceeded (more than {limit} nested values)\n  at {offset}\nInput:\n{context}")]
    RecursionLimit {
        offset: usize,
        limit: usize,
        context: String,
    },

    /// The incremental parser received a byte it cannot accept
    #[error("Stream error at byte {offset}: {msg}")]
    Stream { offset: u64, msg: String },

    /// The incremental parser was finished before the value was complete
    #[error("Unexpected end of input at byte {offset}: expected {expected}")]
    UnexpectedEnd { offset: u64, expected: String },

    /// Byte input was not valid UTF-8
    #[error("Invalid UTF-8 in input: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// IO error while reading input
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a syntax error at `offset` with a pre-rendered context excerpt.
    pub fn syntax(offset: usize, msg: &str, context: String) -> Self {
        Error::Syntax {
            offset,
            msg: msg.to_string(),
            context,
        }
    }

    /// Creates an error for an unacceptable byte in the incremental parser.
    pub fn stream(offset: u64, msg: impl Into<String>) -> Self {
        Error::Stream {
            offset,
            msg: msg.into(),
        }
    }

    /// Creates an I/O error for reader failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the absolute offset of the failure, if the error has one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ron_notation::Error;
    ///
    /// assert_eq!(Error::stream(12, "unexpected byte").offset(), Some(12));
    /// assert_eq!(Error::io("closed").offset(), None);
    /// ```
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::Syntax { offset, .. }
            | Error::TrailingCharacters { offset, .. }
            | Error::RunawayLoop { offset, .. }
            | Error::RecursionLimit { offset, .. } => Some(*offset as u64),
            Error::Stream { offset, .. } | Error::UnexpectedEnd { offset, .. } => Some(*offset),
            Error::InvalidUtf8(e) => Some(e.valid_up_to() as u64),
            Error::Io(_) => None,
        }
    }
}

/// Result alias for operations that can fail fatally.
pub type Result<T> = std::result::Result<T, Error>;

/// Result of a single grammar rule.
///
/// `Ok(Some(value))` is a match, `Ok(None)` is an ordinary mismatch that lets the
/// caller try its next alternative, and `Err(_)` aborts the parse.
pub type Parsed<T> = Result<Option<T>>;
