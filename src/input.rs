//! Positional access into an immutable text buffer.
//!
//! [`Cursor`] is the only state the combinator parser carries. Every grammar rule
//! reads through it, saves a [`Checkpoint`] before trying something, and rewinds
//! to that checkpoint when the attempt does not match.
//!
//! ```rust
//! use ron_notation::Cursor;
//!
//! let mut input = Cursor::new("  Some(1)");
//! input.skip_whitespace();
//! let start = input.checkpoint();
//! assert!(input.consume("Some("));
//! assert_eq!(input.rest(), "1)");
//! input.rewind(start);
//! assert_eq!(input.rest(), "Some(1)");
//! ```

use crate::error::{Error, Parsed, Result};
use crate::options::{DEFAULT_LOOP_GUARD, DEFAULT_MAX_DEPTH};
use crate::Struct;
use indexmap::IndexMap;
use std::sync::Arc;

/// Characters of excerpt shown on each side of a failing position.
const CONTEXT_RADIUS: usize = 10;

/// A saved cursor position.
///
/// Only meaningful for the cursor that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Cursor over a fully buffered input string.
///
/// Positions are byte offsets into the text and always sit on a character
/// boundary. Besides the position, the cursor holds the per-parse bookkeeping:
///
/// - calls to [`Cursor::eof`], failing with [`Error::RunawayLoop`] past the
///   loop guard, so a combinator that stops consuming input cannot spin forever
/// - the nesting depth, failing with [`Error::RecursionLimit`] past the
///   maximum depth
/// - bare type names met so far, each with one local [`Struct`] instance
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    eof_checks: usize,
    loop_guard: Option<usize>,
    depth: usize,
    max_depth: Option<usize>,
    unit_structs: IndexMap<String, Arc<Struct>>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `text` with the default limits.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self::with_loop_guard(text, Some(DEFAULT_LOOP_GUARD))
    }

    /// Creates a cursor with an explicit loop guard; `None` disables the guard.
    #[must_use]
    pub fn with_loop_guard(text: &'a str, loop_guard: Option<usize>) -> Self {
        Cursor {
            text,
            pos: 0,
            eof_checks: 0,
            loop_guard,
            depth: 0,
            max_depth: Some(DEFAULT_MAX_DEPTH),
            unit_structs: IndexMap::new(),
        }
    }

    /// Sets the maximum nesting depth; `None` removes the limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Advances past spaces, tabs, newlines and carriage returns.
    pub fn skip_whitespace(&mut self) {
        let skipped = self.rest().len()
            - self
                .rest()
                .trim_start_matches(|ch| matches!(ch, ' ' | '\t' | '\n' | '\r'))
                .len();
        self.pos += skipped;
    }

    /// Returns the character at the current position, or `None` at the end.
    #[inline]
    #[must_use]
    pub fn character(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advances by `len` bytes, clamped to the end of the input.
    #[inline]
    pub fn skip(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.text.len());
        debug_assert!(self.text.is_char_boundary(self.pos));
    }

    /// Saves the current position.
    #[inline]
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    /// Restores a position previously returned by [`Cursor::checkpoint`].
    #[inline]
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.0 <= self.text.len());
        self.pos = checkpoint.0;
    }

    /// Rewinds to `checkpoint` and reports a mismatch.
    #[inline]
    pub fn backtrack<T>(&mut self, checkpoint: Checkpoint) -> Parsed<T> {
        self.rewind(checkpoint);
        Ok(None)
    }

    /// Returns `true` at or after the end of the input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunawayLoop`] once this cursor has been asked more often
    /// than its loop guard allows.
    pub fn eof(&mut self) -> Result<bool> {
        self.eof_checks += 1;
        if let Some(limit) = self.loop_guard {
            if self.eof_checks > limit {
                return Err(Error::RunawayLoop {
                    offset: self.pos,
                    limit,
                    context: self.context(),
                });
            }
        }
        Ok(self.pos >= self.text.len())
    }

    /// Enters one level of nesting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursionLimit`] when the new depth exceeds the maximum.
    pub fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        match self.max_depth {
            Some(limit) if self.depth > limit => Err(Error::RecursionLimit {
                offset: self.pos,
                limit,
                context: self.context(),
            }),
            _ => Ok(()),
        }
    }

    /// Leaves a level entered with [`Cursor::descend`].
    #[inline]
    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Current nesting depth.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns this cursor's instance for the bare type name `name`.
    ///
    /// Instances are local to the cursor. Nothing reaches a
    /// [`UnitStructCache`](crate::UnitStructCache) until the document has parsed,
    /// so names met only in abandoned alternatives are never cached.
    pub fn unit_struct(&mut self, name: &str) -> Arc<Struct> {
        let local = self
            .unit_structs
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Struct::unit(name)));
        Arc::clone(local)
    }

    /// Hands over the local unit-struct instances, leaving none behind.
    pub fn take_unit_structs(&mut self) -> IndexMap<String, Arc<Struct>> {
        std::mem::take(&mut self.unit_structs)
    }

    /// Current byte offset.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed remainder of the input.
    #[inline]
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Text consumed since `checkpoint`.
    #[must_use]
    pub fn since(&self, checkpoint: Checkpoint) -> &'a str {
        &self.text[checkpoint.0..self.pos]
    }

    /// Returns `true` if the remainder starts with `literal`.
    #[inline]
    #[must_use]
    pub fn starts_with(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    /// Skips `literal` if the remainder starts with it.
    pub fn consume(&mut self, literal: &str) -> bool {
        if self.starts_with(literal) {
            self.skip(literal.len());
            true
        } else {
            false
        }
    }

    /// Skips `keyword` only when it is not immediately followed by another
    /// identifier character, so `None` does not match the start of `Nonesuch`.
    pub fn consume_keyword(&mut self, keyword: &str) -> bool {
        if !self.starts_with(keyword) {
            return false;
        }
        let boundary = self.rest()[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |ch| !is_identifier_char(ch));
        if boundary {
            self.skip(keyword.len());
            true
        } else {
            false
        }
    }

    /// Builds a fatal error at the current position.
    ///
    /// The message carries the absolute offset and up to ten characters of input
    /// on each side, with a caret under the failing column.
    #[must_use]
    pub fn fail(&self, msg: &str) -> Error {
        Error::syntax(self.pos, msg, self.context())
    }

    /// Builds the fatal error for content left after a complete value.
    #[must_use]
    pub fn trailing(&self) -> Error {
        Error::TrailingCharacters {
            offset: self.pos,
            context: self.context(),
        }
    }

    fn context(&self) -> String {
        let before: Vec<char> = self.text[..self.pos].chars().rev().take(CONTEXT_RADIUS).collect();
        let after = self.rest().chars().take(CONTEXT_RADIUS);
        let excerpt: String = before
            .iter()
            .rev()
            .copied()
            .chain(after)
            .map(|ch| if ch.is_whitespace() { ' ' } else { ch })
            .collect();
        format!("  {}\n  {}^", excerpt, " ".repeat(before.len()))
    }
}

/// Characters allowed in type names and field names.
#[inline]
#[must_use]
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
