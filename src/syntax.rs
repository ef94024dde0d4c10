//! Notation syntax reference
//!
//! This module documents the text format accepted by [`parse`](crate::parse).
//!
//! # Overview
//!
//! The format is a self-describing object notation in the style of Rust
//! literals. Every document is exactly one value, optionally surrounded by
//! whitespace and comments.
//!
//! # Grammar
//!
//! ```text
//! value   := number | string | bool | char | option | tuple | list | struct | map
//! number  := sign? (hex | binary | float | int)
//! string  := '"' (escape | char)* '"'  |  'r' '#'* '"' rawchar* '"' '#'*
//! bool    := "true" | "false"
//! char    := "'" (escape | char) "'"
//! option  := "None" | "Some(" value ")"
//! tuple   := "(" (value ("," value)*)? ")"
//! list    := "[" (value ("," value)*)? "]"
//! struct  := ident? ( "(" (ident ":" value ("," ident ":" value)*)? ")" )?
//! map     := "{" (value ":" value ("," value ":" value)*)? "}"
//! comment := "//" to end of line
//! ```
//!
//! Alternatives are tried in the order listed for `value`. The first one that
//! matches wins, so `true` is a boolean and `(1, 2)` is a tuple even though a
//! struct could start the same way.
//!
//! ## Numbers
//!
//! | Form | Example | Value |
//! |------|---------|-------|
//! | Decimal | `42`, `-7`, `001` | 42, -7, 1 |
//! | Hex | `0xAa`, `0X1f` | 170, 31 |
//! | Binary | `0b010` | 2 |
//! | Float | `3.14`, `.5`, `3e2`, `1E-2` | 3.14, 0.5, 300, 0.01 |
//!
//! All numbers share one double-precision domain. An exponent marker must
//! directly follow a digit and must be followed by digits. A literal that runs
//! into a marker it cannot use (`1.2.3`, `0b12`, `0x1.5`) is not a number.
//!
//! ## Strings and chars
//!
//! Quoted strings and chars understand these escapes:
//!
//! | Escape | Meaning |
//! |--------|---------|
//! | `\n` `\r` `\t` | newline, carriage return, tab |
//! | `\0` | NUL |
//! | `\"` `\'` `\\` | quote, apostrophe, backslash |
//!
//! Any other escape in a string is a fatal error. Raw strings
//! (`r"..."`, `r#"..."#`, ...) have no escapes: the string ends at a quote
//! followed by exactly as many `#` as opened it.
//!
//! ## Structs
//!
//! ```text
//! Point(x: 1, y: 2)     // named struct
//! (x: 1, y: 2)          // anonymous struct
//! Coin                  // unit struct
//! ```
//!
//! Field order is kept and repeated field names are not merged. A bare name
//! resolves through a [`UnitStructCache`](crate::UnitStructCache): within one
//! cache, every `Coin` is the same instance.
//!
//! ## Separators
//!
//! Inside `()`, `[]` and `{}` one comma may follow each element, including the
//! last one. The comma may also be left out entirely: `[1 2]` is a list of two
//! numbers.
//!
//! # Streaming subset
//!
//! [`StreamParser`](crate::StreamParser) reads anonymous field structs whose
//! leaves are strings:
//!
//! ```text
//! (
//!     name: "root",
//!     child: (name: "leaf"),
//! )
//! ```
//!
//! Comments are not part of the streaming subset.
//!
//! # Limitations
//!
//! - **Tuple structs**: `Name(1, 2)` is not part of the grammar
//! - **Block comments**: only `//` line comments are recognized
//! - **Layout**: comments and formatting are not kept in parsed values

// This module contains only documentation; no implementation code
