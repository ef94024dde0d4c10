//! Composite combinators and the top-level value parser.
//!
//! [`Parser`] assembles the literal parsers from [`primitive`](crate::primitive)
//! into the full grammar. Every composite rule recurses through
//! [`Parser::value`], which tries each kind of value in a fixed order and
//! rewinds the cursor between attempts:
//!
//! number, string, boolean, char, option, tuple, list, struct, map.
//!
//! Numbers, quoted forms and keywords are tried before structs so that they are
//! never read as a bare type name.
//!
//! ```rust
//! use ron_notation::{Parser, ParserOptions, Value};
//!
//! let parser = Parser::new(ParserOptions::default());
//! let value = parser.parse(r#"{ "a": [1, 2], (3, 4): Some('x') }"#).unwrap();
//! let map = value.as_map().unwrap();
//! assert_eq!(map.len(), 2);
//! assert_eq!(
//!     map.get(&Value::Tuple(vec![Value::from(3), Value::from(4)])),
//!     Some(&Value::from(Some('x')))
//! );
//! ```

use crate::error::{Parsed, Result};
use crate::input::Cursor;
use crate::primitive::{self, skip_insignificant};
use crate::{Field, ParserOptions, Struct, Value, ValueMap};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

type Rule<T> = fn(&Parser, &mut Cursor<'_>) -> Parsed<T>;

/// Alternatives of [`Parser::value`], in the order they are tried.
const VALUE_RULES: [Rule<Value>; 9] = [
    |_, input| Ok(primitive::number(input)?.map(Value::Number)),
    |_, input| Ok(primitive::string(input)?.map(Value::String)),
    |_, input| Ok(primitive::boolean(input)?.map(Value::Bool)),
    |_, input| Ok(primitive::character(input)?.map(Value::Char)),
    Parser::option,
    Parser::tuple,
    Parser::list,
    Parser::structure,
    Parser::map,
];

/// Backtracking recursive-descent parser for the full grammar.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Parser { options }
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses a whole document.
    ///
    /// Only whitespace and comments may follow the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`](crate::Error::Syntax) when no value matches or a
    /// literal is malformed, [`Error::TrailingCharacters`](crate::Error::TrailingCharacters)
    /// when content follows the value,
    /// [`Error::RunawayLoop`](crate::Error::RunawayLoop) when the loop guard trips, and
    /// [`Error::RecursionLimit`](crate::Error::RecursionLimit) when values nest too deeply.
    pub fn parse(&self, text: &str) -> Result<Value> {
        debug!(len = text.len(), "parsing document");
        let mut input = Cursor::with_loop_guard(text, self.options.loop_guard)
            .with_max_depth(self.options.max_depth);
        skip_insignificant(&mut input);
        let mut value = match self.value(&mut input)? {
            Some(value) => value,
            None => return Err(input.fail("failed to parse value")),
        };
        skip_insignificant(&mut input);
        if !input.eof()? {
            return Err(input.trailing());
        }
        let local = input.take_unit_structs();
        if !local.is_empty() {
            self.resolve_unit_structs(&mut value, &local);
        }
        debug!(kind = value.kind(), "parsed document");
        Ok(value)
    }

    /// Parses one value of any kind at the cursor.
    ///
    /// Unit structs in the result are the cursor's own instances (see
    /// [`Cursor::unit_struct`]). [`Parser::parse`] swaps them for cached ones
    /// once the whole document has parsed.
    pub fn value(&self, input: &mut Cursor<'_>) -> Parsed<Value> {
        let start = input.checkpoint();
        input.descend()?;
        skip_insignificant(input);
        let parsed = self.first_of(input, &VALUE_RULES);
        input.ascend();
        match parsed? {
            Some(value) => Ok(Some(value)),
            None => input.backtrack(start),
        }
    }

    /// Replaces the cursor-local unit structs in `value` with instances from
    /// the configured cache.
    fn resolve_unit_structs(&self, value: &mut Value, local: &IndexMap<String, Arc<Struct>>) {
        match value {
            Value::Struct(s) => {
                let current: &Arc<Struct> = s;
                let unit_name = current
                    .name()
                    .filter(|name| local.get(*name).is_some_and(|unit| Arc::ptr_eq(unit, current)))
                    .map(str::to_owned);
                match unit_name {
                    Some(name) => *s = self.options.unit_struct(&name),
                    None if s.is_empty() => {}
                    None => {
                        for field in Arc::make_mut(s).fields_mut() {
                            self.resolve_unit_structs(&mut field.value, local);
                        }
                    }
                }
            }
            Value::Option(Some(inner)) => self.resolve_unit_structs(inner, local),
            Value::Tuple(items) | Value::List(items) => {
                for item in items {
                    self.resolve_unit_structs(item, local);
                }
            }
            Value::Map(map) => {
                for (key, item) in map.iter_mut() {
                    self.resolve_unit_structs(key, local);
                    self.resolve_unit_structs(item, local);
                }
            }
            _ => {}
        }
    }

    /// Ordered choice: the first rule that matches wins. The cursor is rewound
    /// before each attempt.
    fn first_of<T>(&self, input: &mut Cursor<'_>, rules: &[Rule<T>]) -> Parsed<T> {
        let start = input.checkpoint();
        for rule in rules {
            if let Some(value) = rule(self, input)? {
                return Ok(Some(value));
            }
            input.rewind(start);
        }
        Ok(None)
    }

    /// `None` or `Some(value)`.
    pub fn option(&self, input: &mut Cursor<'_>) -> Parsed<Value> {
        let start = input.checkpoint();
        skip_insignificant(input);
        if input.consume_keyword("None") {
            return Ok(Some(Value::Option(None)));
        }
        if !input.consume("Some(") {
            return input.backtrack(start);
        }
        let Some(inner) = self.value(input)? else {
            return input.backtrack(start);
        };
        skip_insignificant(input);
        if !input.consume(")") {
            return input.backtrack(start);
        }
        Ok(Some(Value::Option(Some(Box::new(inner)))))
    }

    /// `(value, ...)`
    pub fn tuple(&self, input: &mut Cursor<'_>) -> Parsed<Value> {
        Ok(self
            .comma_separated(input, "(", ")", Self::value)?
            .map(Value::Tuple))
    }

    /// `[value, ...]`
    pub fn list(&self, input: &mut Cursor<'_>) -> Parsed<Value> {
        Ok(self
            .comma_separated(input, "[", "]", Self::value)?
            .map(Value::List))
    }

    /// `{key: value, ...}` where keys are full values.
    pub fn map(&self, input: &mut Cursor<'_>) -> Parsed<Value> {
        Ok(self
            .comma_separated(input, "{", "}", Self::map_entry)?
            .map(|pairs| Value::Map(ValueMap::from(pairs))))
    }

    fn map_entry(&self, input: &mut Cursor<'_>) -> Parsed<(Value, Value)> {
        let start = input.checkpoint();
        let Some(key) = self.value(input)? else {
            return input.backtrack(start);
        };
        skip_insignificant(input);
        if !input.consume(":") {
            return input.backtrack(start);
        }
        let Some(value) = self.value(input)? else {
            return input.backtrack(start);
        };
        Ok(Some((key, value)))
    }

    /// `Name(field: value, ...)`, `(field: value, ...)` or a bare `Name`.
    ///
    /// A bare name is a unit struct and resolves through the configured
    /// [`UnitStructCache`](crate::UnitStructCache).
    pub fn structure(&self, input: &mut Cursor<'_>) -> Parsed<Value> {
        let start = input.checkpoint();
        skip_insignificant(input);
        let name = primitive::identifier(input)?;
        let after_name = input.checkpoint();
        skip_insignificant(input);
        if input.character() == Some('(') {
            return match self.comma_separated(input, "(", ")", Self::field)? {
                Some(fields) => Ok(Some(Value::Struct(Arc::new(Struct::new(name, fields))))),
                None => input.backtrack(start),
            };
        }
        input.rewind(after_name);
        match name {
            Some(name) => Ok(Some(Value::Struct(input.unit_struct(&name)))),
            None => input.backtrack(start),
        }
    }

    fn field(&self, input: &mut Cursor<'_>) -> Parsed<Field> {
        let start = input.checkpoint();
        let Some(name) = primitive::identifier(input)? else {
            return input.backtrack(start);
        };
        skip_insignificant(input);
        if !input.consume(":") {
            return input.backtrack(start);
        }
        let Some(value) = self.value(input)? else {
            return input.backtrack(start);
        };
        Ok(Some(Field { name, value }))
    }

    /// `open (element ","?)* close`, shared by tuples, lists, maps and struct
    /// field lists. One comma may follow each element, including the last.
    fn comma_separated<T>(
        &self,
        input: &mut Cursor<'_>,
        open: &str,
        close: &str,
        element: Rule<T>,
    ) -> Parsed<Vec<T>> {
        let start = input.checkpoint();
        skip_insignificant(input);
        if !input.consume(open) {
            return input.backtrack(start);
        }
        skip_insignificant(input);
        let mut items = Vec::new();
        if input.consume(close) {
            return Ok(Some(items));
        }
        loop {
            let Some(item) = element(self, input)? else {
                return input.backtrack(start);
            };
            items.push(item);
            skip_insignificant(input);
            input.consume(",");
            skip_insignificant(input);
            if input.consume(close) {
                return Ok(Some(items));
            }
            if input.eof()? {
                return input.backtrack(start);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, UnitStructCache};

    fn parser() -> Parser {
        Parser::new(ParserOptions::new().with_cache(Arc::new(UnitStructCache::new())))
    }

    fn value(text: &str) -> (Option<Value>, String) {
        let mut input = Cursor::new(text);
        let parsed = parser().value(&mut input).unwrap();
        (parsed, input.rest().to_string())
    }

    #[test]
    fn test_options() {
        assert_eq!(
            value(r#"Some("string")"#),
            (Some(Value::from(Some("string"))), String::new())
        );
        assert_eq!(value("None"), (Some(Value::Option(None)), String::new()));
        assert_eq!(
            value("Some(Some(None))").0,
            Some(Value::from(Some(Value::from(Some(Value::Option(None))))))
        );
    }

    #[test]
    fn test_tuples() {
        assert_eq!(
            value(r#"("abc", 1.23, true)"#).0,
            Some(Value::Tuple(vec![
                Value::from("abc"),
                Value::from(1.23),
                Value::from(true)
            ]))
        );
        assert_eq!(value("()").0, Some(Value::Tuple(vec![])));
        assert_eq!(value("(1,)").0, Some(Value::Tuple(vec![Value::from(1)])));
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            value(r#"["abc", "def"]"#).0,
            Some(Value::List(vec![Value::from("abc"), Value::from("def")]))
        );
        assert_eq!(value("[]").0, Some(Value::List(vec![])));
        assert_eq!(
            value("[1 2]").0,
            Some(Value::List(vec![Value::from(1), Value::from(2)]))
        );
    }

    #[test]
    fn test_unclosed_list_backtracks() {
        assert_eq!(value("[1, 2"), (None, "[1, 2".to_string()));
        assert_eq!(value("[1,, 2]"), (None, "[1,, 2]".to_string()));
    }

    #[test]
    fn test_maps() {
        let (parsed, rest) = value(r#"{ "a": "b" }"#);
        assert_eq!(rest, "");
        let map = parsed.unwrap();
        let map = map.as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Value::from("a")), Some(&Value::from("b")));
        assert_eq!(value("{}").0, Some(Value::Map(ValueMap::new())));
    }

    #[test]
    fn test_structs() {
        let parsed = value(r#"( foo: 1.0, bar: ( baz: "x" ) )"#).0.unwrap();
        let outer = parsed.as_struct().unwrap();
        assert_eq!(outer.name(), None);
        assert_eq!(outer.field("foo"), Some(&Value::from(1.0)));
        let inner = outer.field("bar").and_then(Value::as_struct).unwrap();
        assert_eq!(inner.name(), None);
        assert_eq!(inner.field("baz"), Some(&Value::from("x")));

        let parsed = value("Point(x: 1, y: 2, x: 3)").0.unwrap();
        let point = parsed.as_struct().unwrap();
        assert_eq!(point.name(), Some("Point"));
        assert_eq!(point.len(), 3);
        let names: Vec<_> = point.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "x"]);
    }

    #[test]
    fn test_named_struct_with_bad_fields_backtracks() {
        assert_eq!(value("Coin(1)"), (None, "Coin(1)".to_string()));
    }

    #[test]
    fn test_unit_struct_identity() {
        let parser = parser();
        let a = parser.parse("Coin").unwrap();
        let b = parser.parse("{ 1: [Some(Coin)] }").unwrap();
        let nested = b.as_map().unwrap().get(&Value::from(1)).unwrap();
        let nested = nested.as_list().unwrap()[0].as_option().flatten().unwrap();
        assert!(a.same_instance(nested));

        let c = parser.parse("Coin(foo: 1)").unwrap();
        assert!(!a.same_instance(&c));
        assert_ne!(a, c);
    }

    #[test]
    fn test_unit_structs_within_one_cursor_are_shared() {
        let mut input = Cursor::new("[Coin, Coin]");
        let parsed = parser().value(&mut input).unwrap().unwrap();
        let items = parsed.as_list().unwrap();
        assert!(items[0].same_instance(&items[1]));
    }

    #[test]
    fn test_field_names_are_not_cached() {
        let cache = Arc::new(UnitStructCache::new());
        let parser = Parser::new(ParserOptions::new().with_cache(Arc::clone(&cache)));

        parser.parse("(alpha: 1, beta: (gamma: 2))").unwrap();
        assert!(cache.is_empty(), "{:?}", cache.names());

        assert!(parser.parse("[Coin, (delta: 1), ").is_err());
        assert!(cache.is_empty(), "{:?}", cache.names());

        parser.parse("Wallet(coins: [Coin, Coin], owner: { Key: None })").unwrap();
        assert_eq!(cache.names(), vec!["Coin".to_string(), "Key".to_string()]);
    }

    #[test]
    fn test_disabled_cache_resolves_each_occurrence() {
        let parser = Parser::new(ParserOptions::new().without_unit_struct_cache());
        let parsed = parser.parse("[Coin, Coin]").unwrap();
        let items = parsed.as_list().unwrap();
        assert_eq!(items[0], items[1]);
        assert!(!items[0].same_instance(&items[1]));
    }

    #[test]
    fn test_nesting_depth_is_limited() {
        let parser = Parser::new(ParserOptions::new().with_max_depth(Some(8)));
        let nested = |depth: usize| format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        assert!(parser.parse(&nested(8)).is_ok());
        let err = parser.parse(&nested(9)).unwrap_err();
        assert!(matches!(err, Error::RecursionLimit { offset: 8, limit: 8, .. }));
        assert!(parser.parse("Some(Some(Some(Some(Some(Some(Some(1)))))))").is_ok());
        assert!(parser
            .parse("(a: (b: (c: (d: (e: (f: (g: (h: (i: 1)))))))))")
            .is_err());
    }

    #[test]
    fn test_keywords_are_not_structs() {
        assert_eq!(value("true").0, Some(Value::Bool(true)));
        assert!(value("trueish").0.unwrap().is_struct());
        assert!(value("Nonesuch").0.unwrap().is_struct());
        assert!(value("Some").0.unwrap().is_struct());
    }

    #[test]
    fn test_comments_between_tokens() {
        let text = "[ // first\n 1, // second\n 2 // done\n ]";
        assert_eq!(
            value(text).0,
            Some(Value::List(vec![Value::from(1), Value::from(2)]))
        );
    }

    #[test]
    fn test_failed_choice_leaves_rest_unchanged() {
        for text in ["", "  ", ")", ": 1", "[1, 2", "{1}"] {
            assert_eq!(value(text), (None, text.to_string()));
        }
    }

    #[test]
    fn test_parse_rejects_trailing_characters() {
        let err = parser().parse("1 2").unwrap_err();
        assert!(matches!(err, Error::TrailingCharacters { offset: 2, .. }));
        assert!(parser().parse("1 // fine\n").is_ok());
    }

    #[test]
    fn test_parse_reports_missing_value() {
        let err = parser().parse("  )").unwrap_err();
        match err {
            Error::Syntax { offset, msg, .. } => {
                assert_eq!(offset, 2);
                assert_eq!(msg, "failed to parse value");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_fatal_errors_are_not_downgraded() {
        let err = parser().parse(r#"[1, "bad \x"]"#).unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn test_loop_guard_is_per_parse() {
        let parser = Parser::new(ParserOptions::new().with_loop_guard(Some(200)));
        for _ in 0..100 {
            assert!(parser.parse("[1, 2, 3]").is_ok());
        }
        let long = format!("[{}]", vec!["1"; 300].join(","));
        assert!(matches!(
            parser.parse(&long),
            Err(Error::RunawayLoop { limit: 200, .. })
        ));
    }
}
