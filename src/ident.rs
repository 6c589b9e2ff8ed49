//! Utility functions for working with F# identifiers.

use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Converts a `snake_case` or `SCREAMING_SNAKE_CASE` identifier to the
/// `PascalCase` form used for F# type and property names.
pub fn to_pascal(s: &str) -> String {
    s.to_upper_camel_case()
}

/// Converts an identifier to the `lowerCamel` form used for private storage
/// slots. Slot identifiers always gain a trailing underscore in the emitted
/// source, so they can never collide with an F# keyword.
pub fn to_camel(s: &str) -> String {
    s.to_lower_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal() {
        assert_eq!("", &to_pascal(""));
        assert_eq!("Foo", &to_pascal("foo"));
        assert_eq!("Foo", &to_pascal("FOO"));
        assert_eq!("FooBar", &to_pascal("foo_bar"));
        assert_eq!("FooBar", &to_pascal("FOO_BAR"));
        assert_eq!("FooBar", &to_pascal("_FOO_BAR_"));
        assert_eq!("FuzzBuster", &to_pascal("fuzzBuster"));
        assert_eq!("FuzzBuster", &to_pascal("FuzzBuster"));
        assert_eq!("FieldName7", &to_pascal("fieldName7"));
        assert_eq!("FieldName8", &to_pascal("field_name8"));
    }

    #[test]
    fn test_to_camel() {
        assert_eq!("", &to_camel(""));
        assert_eq!("foo", &to_camel("foo"));
        assert_eq!("fooBar", &to_camel("foo_bar"));
        assert_eq!("fooBar", &to_camel("FooBar"));
        assert_eq!("fooBar", &to_camel("FOO_BAR"));
        assert_eq!("fuzzBuster", &to_camel("fuzz_buster"));
        assert_eq!("xmlHttpRequest", &to_camel("XMLHttpRequest"));
        assert_eq!("fieldName9", &to_camel("field_Name9"));
    }
}
