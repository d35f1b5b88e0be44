//! The `alike!` macro: expected structures in literal notation.

/// Builds an [`Expected`](crate::Expected) tree with JSON-like syntax.
///
/// Map keys are string literals and keep the order they are written in,
/// which is the order failures are reported in. Values are literals,
/// nested `{}`/`[]` containers, or any expression convertible to
/// `Expected` — predicate expressions, [checks](crate::Check), `Value`s.
///
/// ```
/// use alike::{actual, alike, is_alike};
/// use serde_json::json;
///
/// let expected = alike!({
///     "name": "Arthur",
///     "age": actual().ge(18),
///     "tags": ["king"],
/// });
/// let data = json!({"name": "Arthur", "age": 42, "tags": ["king"], "extra": 1});
/// assert!(is_alike(expected, data));
/// ```
#[macro_export]
macro_rules! alike {
    ({}) => {
        $crate::Expected::Map(::std::vec::Vec::new())
    };
    ({ $($entries:tt)+ }) => {{
        let mut pairs: ::std::vec::Vec<(::std::string::String, $crate::Expected)> =
            ::std::vec::Vec::new();
        $crate::alike_entries!(pairs; $($entries)+);
        $crate::Expected::Map(pairs)
    }};
    ([]) => {
        $crate::Expected::Seq(::std::vec::Vec::new())
    };
    ([ $($items:tt)+ ]) => {{
        let mut elems: ::std::vec::Vec<$crate::Expected> = ::std::vec::Vec::new();
        $crate::alike_items!(elems; $($items)+);
        $crate::Expected::Seq(elems)
    }};
    ($other:expr) => {
        $crate::Expected::from($other)
    };
}

// Munches `"key": value` entries; nested containers re-enter `alike!`.
#[doc(hidden)]
#[macro_export]
macro_rules! alike_entries {
    ($pairs:ident;) => {};
    ($pairs:ident; $key:literal : { $($map:tt)* } $(, $($rest:tt)*)?) => {
        $pairs.push(($key.into(), $crate::alike!({ $($map)* })));
        $crate::alike_entries!($pairs; $($($rest)*)?);
    };
    ($pairs:ident; $key:literal : [ $($seq:tt)* ] $(, $($rest:tt)*)?) => {
        $pairs.push(($key.into(), $crate::alike!([ $($seq)* ])));
        $crate::alike_entries!($pairs; $($($rest)*)?);
    };
    ($pairs:ident; $key:literal : $value:expr , $($rest:tt)*) => {
        $pairs.push(($key.into(), $crate::Expected::from($value)));
        $crate::alike_entries!($pairs; $($rest)*);
    };
    ($pairs:ident; $key:literal : $value:expr) => {
        $pairs.push(($key.into(), $crate::Expected::from($value)));
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! alike_items {
    ($elems:ident;) => {};
    ($elems:ident; { $($map:tt)* } $(, $($rest:tt)*)?) => {
        $elems.push($crate::alike!({ $($map)* }));
        $crate::alike_items!($elems; $($($rest)*)?);
    };
    ($elems:ident; [ $($seq:tt)* ] $(, $($rest:tt)*)?) => {
        $elems.push($crate::alike!([ $($seq)* ]));
        $crate::alike_items!($elems; $($($rest)*)?);
    };
    ($elems:ident; $value:expr , $($rest:tt)*) => {
        $elems.push($crate::Expected::from($value));
        $crate::alike_items!($elems; $($rest)*);
    };
    ($elems:ident; $value:expr) => {
        $elems.push($crate::Expected::from($value));
    };
}

#[cfg(test)]
mod tests {
    use crate::expr::actual;
    use crate::matcher::{is_alike, Expected};
    use serde_json::json;

    #[test]
    fn test_empty_containers() {
        assert!(matches!(alike!({}), Expected::Map(pairs) if pairs.is_empty()));
        assert!(matches!(alike!([]), Expected::Seq(elems) if elems.is_empty()));
    }

    #[test]
    fn test_scalar_values() {
        assert!(matches!(alike!(5), Expected::Literal(_)));
        assert!(matches!(alike!("s"), Expected::Literal(_)));
        assert!(matches!(alike!(actual().gt(1)), Expected::Expr(_)));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let Expected::Map(pairs) = alike!({"z": 1, "a": 2, "m": 3}) else {
            panic!("expected a map");
        };
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_nested_structures() {
        let expected = alike!({
            "map": {"inner": actual().is_present()},
            "seq": [1, {"deep": 2}, [3]],
            "trailing": "comma",
        });
        let data = json!({
            "map": {"inner": 0},
            "seq": [1, {"deep": 2, "extra": true}, [3, 4]],
            "trailing": "comma",
        });
        assert!(is_alike(expected, data));
    }
}
