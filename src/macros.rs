/// Builds a [`Value`](crate::Value) from notation-like syntax.
///
/// Lists use `[...]`, maps use `{ key => value }` and tuples use `(...)`.
/// Anything else is converted with `Value::from`.
///
/// ```rust
/// use ron_notation::{ron, parse};
///
/// let built = ron!({ "name" => "Alice", "tags" => ["a", 'b'], "pos" => (1, 2.5) });
/// assert_eq!(built, parse(r#"{ "name": "Alice", "tags": ["a", 'b'], "pos": (1, 2.5) }"#).unwrap());
/// ```
#[macro_export]
macro_rules! ron {
    // Handle None
    (None) => {
        $crate::Value::Option(None)
    };

    // Handle empty list
    ([]) => {
        $crate::Value::List(vec![])
    };

    // Handle non-empty list
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::ron!($elem)),*])
    };

    // Handle empty map
    ({}) => {
        $crate::Value::Map($crate::ValueMap::new())
    };

    // Handle non-empty map
    ({ $($key:tt => $value:tt),* $(,)? }) => {{
        let mut map = $crate::ValueMap::new();
        $(
            map.push($crate::ron!($key), $crate::ron!($value));
        )*
        $crate::Value::Map(map)
    }};

    // Handle tuples
    (( $($elem:tt),* $(,)? )) => {
        $crate::Value::Tuple(vec![$($crate::ron!($elem)),*])
    };

    // Fallback for any expression
    ($e:expr) => {
        $crate::Value::from($e)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Value, ValueMap};

    #[test]
    fn test_ron_macro_primitives() {
        assert_eq!(ron!(None), Value::Option(None));
        assert_eq!(ron!(true), Value::Bool(true));
        assert_eq!(ron!(42), Value::Number(42.0));
        assert_eq!(ron!(3.5), Value::Number(3.5));
        assert_eq!(ron!('c'), Value::Char('c'));
        assert_eq!(ron!("hello"), Value::String("hello".to_string()));
        assert_eq!(ron!(Some(1)), Value::Option(Some(Box::new(Value::Number(1.0)))));
    }

    #[test]
    fn test_ron_macro_collections() {
        assert_eq!(ron!([]), Value::List(vec![]));
        assert_eq!(ron!({}), Value::Map(ValueMap::new()));
        assert_eq!(
            ron!([1, [2]]),
            Value::List(vec![Value::from(1), Value::List(vec![Value::from(2)])])
        );
        assert_eq!(ron!(()), Value::Tuple(vec![]));
        assert_eq!(
            ron!(("a", false)),
            Value::Tuple(vec![Value::from("a"), Value::from(false)])
        );

        let map = ron!({ 1 => "one", "two" => 2 });
        let map = map.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::from(1)), Some(&Value::from("one")));
    }
}
