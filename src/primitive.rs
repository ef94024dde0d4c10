//! Literal parsers: numbers, strings, booleans, chars and identifiers.
//!
//! Each parser takes a [`Cursor`] and returns a [`Parsed`] value. On a mismatch
//! the cursor is left where the parser found it, so ordered choice can try the
//! next alternative. Fatal errors are reserved for literals that are clearly
//! meant to be of this kind but are malformed, such as an unknown escape inside
//! a quoted string.
//!
//! ```rust
//! use ron_notation::{primitive, Cursor};
//!
//! let mut input = Cursor::new("0xAa rest");
//! assert_eq!(primitive::number(&mut input).unwrap(), Some(170.0));
//! assert_eq!(input.rest(), " rest");
//!
//! let mut input = Cursor::new("e2");
//! assert_eq!(primitive::number(&mut input).unwrap(), None);
//! assert_eq!(input.rest(), "e2");
//! ```

use crate::error::Parsed;
use crate::input::{is_identifier_char, Checkpoint, Cursor};

/// Parses a signed number: hex (`0x`), binary (`0b`), float or decimal integer.
///
/// Integer and float literals share one `f64` domain. A literal directly
/// followed by a marker that cannot continue it (a second `.`, a stray sign,
/// a radix letter, a hex digit after a decimal) is a mismatch, not a number.
pub fn number(input: &mut Cursor<'_>) -> Parsed<f64> {
    let start = input.checkpoint();
    input.skip_whitespace();
    let negative = match input.character() {
        Some('-') => {
            input.skip(1);
            true
        }
        Some('+') => {
            input.skip(1);
            false
        }
        _ => false,
    };
    match unsigned_number(input)? {
        Some(magnitude) if negative => Ok(Some(-magnitude)),
        Some(magnitude) => Ok(Some(magnitude)),
        None => input.backtrack(start),
    }
}

fn unsigned_number(input: &mut Cursor<'_>) -> Parsed<f64> {
    let start = input.checkpoint();
    if input.consume("0x") || input.consume("0X") {
        radix_integer(input, start, 16)
    } else if input.consume("0b") || input.consume("0B") {
        radix_integer(input, start, 2)
    } else {
        decimal(input, start)
    }
}

fn radix_integer(input: &mut Cursor<'_>, start: Checkpoint, radix: u32) -> Parsed<f64> {
    let mut value = 0.0_f64;
    let mut digits = 0usize;
    while let Some(ch) = input.character() {
        match ch.to_digit(radix) {
            Some(digit) => {
                value = value * f64::from(radix) + f64::from(digit);
                digits += 1;
                input.skip(1);
            }
            None => break,
        }
    }
    if digits == 0 || follows_incompatible_marker(input) {
        return input.backtrack(start);
    }
    Ok(Some(value))
}

fn decimal(input: &mut Cursor<'_>, start: Checkpoint) -> Parsed<f64> {
    let mut literal = String::new();
    let mut digits = collect_digits(input, &mut literal);
    let mut is_float = false;

    if input.consume(".") {
        is_float = true;
        literal.push('.');
        digits += collect_digits(input, &mut literal);
    }

    if matches!(input.character(), Some('e' | 'E')) {
        // the exponent marker needs a digit right before it: `1e3` but not `1.e3`
        if !literal.ends_with(|ch: char| ch.is_ascii_digit()) {
            return input.backtrack(start);
        }
        input.skip(1);
        is_float = true;
        literal.push('e');
        if let Some(sign @ ('+' | '-')) = input.character() {
            input.skip(1);
            literal.push(sign);
        }
        if collect_digits(input, &mut literal) == 0 {
            return input.backtrack(start);
        }
    }

    if digits == 0 || follows_incompatible_marker(input) {
        return input.backtrack(start);
    }

    let kind = if is_float { "float" } else { "decimal" };
    match literal.parse::<f64>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(input.fail(&format!("failed to decode {} number literal", kind))),
    }
}

fn collect_digits(input: &mut Cursor<'_>, literal: &mut String) -> usize {
    let mut count = 0;
    while let Some(ch) = input.character() {
        if !ch.is_ascii_digit() {
            break;
        }
        literal.push(ch);
        input.skip(1);
        count += 1;
    }
    count
}

fn follows_incompatible_marker(input: &Cursor<'_>) -> bool {
    matches!(
        input.character(),
        Some(ch) if ch.is_ascii_hexdigit() || matches!(ch, '.' | '+' | '-' | 'x' | 'X' | 'b' | 'B')
    )
}

/// Parses a quoted string (`"..."` with escapes) or a raw string (`r#"..."#`).
///
/// An unterminated string is a mismatch. An unknown escape inside a quoted
/// string is fatal.
///
/// # Examples
///
/// ```rust
/// use ron_notation::{primitive, Cursor};
///
/// let mut input = Cursor::new(r#""tab\there""#);
/// assert_eq!(primitive::string(&mut input).unwrap().as_deref(), Some("tab\there"));
///
/// let mut input = Cursor::new(r##"r#"say "hi"\n"#"##);
/// assert_eq!(primitive::string(&mut input).unwrap().as_deref(), Some(r#"say "hi"\n"#));
/// ```
pub fn string(input: &mut Cursor<'_>) -> Parsed<String> {
    let start = input.checkpoint();
    input.skip_whitespace();
    match input.character() {
        Some('"') => quoted_string(input, start),
        Some('r') => raw_string(input, start),
        _ => input.backtrack(start),
    }
}

fn quoted_string(input: &mut Cursor<'_>, start: Checkpoint) -> Parsed<String> {
    input.skip(1);
    let mut out = String::new();
    while let Some(ch) = input.character() {
        input.skip(ch.len_utf8());
        match ch {
            '"' => return Ok(Some(out)),
            '\\' => {
                let Some(escaped) = input.character() else {
                    break;
                };
                match unescape(escaped) {
                    Some(decoded) => {
                        out.push(decoded);
                        input.skip(escaped.len_utf8());
                    }
                    None => {
                        return Err(input.fail(&format!("unknown escape sequence '\\{}'", escaped)))
                    }
                }
            }
            other => out.push(other),
        }
    }
    input.backtrack(start)
}

fn raw_string(input: &mut Cursor<'_>, start: Checkpoint) -> Parsed<String> {
    input.skip(1);
    let mut hashes = 0usize;
    while input.consume("#") {
        hashes += 1;
    }
    if !input.consume("\"") {
        return input.backtrack(start);
    }
    let body = input.checkpoint();
    while let Some(ch) = input.character() {
        if ch == '"' && closes_raw_string(input.rest(), hashes) {
            let content = input.since(body).to_string();
            input.skip(1 + hashes);
            return Ok(Some(content));
        }
        input.skip(ch.len_utf8());
    }
    input.backtrack(start)
}

// `rest` starts at a quote; it closes the string when exactly `hashes` `#` follow.
fn closes_raw_string(rest: &str, hashes: usize) -> bool {
    let after_quote = &rest[1..];
    let run = after_quote.bytes().take_while(|b| *b == b'#').count();
    run == hashes
}

/// Decodes the character after a backslash.
pub(crate) fn unescape(escaped: char) -> Option<char> {
    match escaped {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '0' => Some('\0'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// Parses the keywords `true` and `false`.
pub fn boolean(input: &mut Cursor<'_>) -> Parsed<bool> {
    let start = input.checkpoint();
    input.skip_whitespace();
    if input.consume_keyword("true") {
        Ok(Some(true))
    } else if input.consume_keyword("false") {
        Ok(Some(false))
    } else {
        input.backtrack(start)
    }
}

/// Parses a character literal: `'c'` or `'\n'`.
///
/// Malformed literals, including unknown escapes, are a mismatch.
pub fn character(input: &mut Cursor<'_>) -> Parsed<char> {
    let start = input.checkpoint();
    input.skip_whitespace();
    if !input.consume("'") {
        return input.backtrack(start);
    }
    let decoded = match input.character() {
        None | Some('\'') => return input.backtrack(start),
        Some('\\') => {
            input.skip(1);
            match input.character() {
                Some(escaped) => match unescape(escaped) {
                    Some(decoded) => {
                        input.skip(escaped.len_utf8());
                        decoded
                    }
                    None => return input.backtrack(start),
                },
                None => return input.backtrack(start),
            }
        }
        Some(ch) => {
            input.skip(ch.len_utf8());
            ch
        }
    };
    if !input.consume("'") {
        return input.backtrack(start);
    }
    Ok(Some(decoded))
}

/// Parses an identifier: one or more ASCII letters, digits or underscores.
pub fn identifier(input: &mut Cursor<'_>) -> Parsed<String> {
    let start = input.checkpoint();
    input.skip_whitespace();
    let name_start = input.checkpoint();
    while let Some(ch) = input.character() {
        if !is_identifier_char(ch) {
            break;
        }
        input.skip(1);
    }
    let name = input.since(name_start);
    if name.is_empty() {
        return input.backtrack(start);
    }
    Ok(Some(name.to_string()))
}

/// Skips whitespace and `//` line comments between tokens.
pub fn skip_insignificant(input: &mut Cursor<'_>) {
    loop {
        input.skip_whitespace();
        if !input.consume("//") {
            return;
        }
        while let Some(ch) = input.character() {
            if ch == '\n' {
                break;
            }
            input.skip(ch.len_utf8());
        }
    }
}
