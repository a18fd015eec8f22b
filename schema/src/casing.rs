//! Identifier case conversions used by the generated-code naming rules.
//!
//! These intentionally work on the first character of each `_`-separated
//! word and leave the remainder untouched, so acronym-bearing names keep
//! their spelling (`client_id` → `ClientId`, `clientID` stays `clientID`
//! inside a word).

/// Converts `foo_bar_baz` to `FooBarBaz`.
pub fn to_upper_camel(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect()
}

/// Converts `foo_bar_baz` to `fooBarBaz`.
pub fn to_lower_camel(name: &str) -> String {
    name.split('_')
        .enumerate()
        .map(|(i, word)| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    let head = if i == 0 {
                        first.to_lowercase().to_string()
                    } else {
                        first.to_uppercase().to_string()
                    };
                    head + chars.as_str()
                }
            }
        })
        .collect()
}

/// Converts `FooBarBaz` to `foo_bar_baz`. Already-lowercase input passes
/// through unchanged.
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i != 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Converts a proto path into an include-guard token: uppercase letters and
/// digits kept, lowercase letters uppercased, everything else becomes `_`.
/// `test/foo.proto` → `TEST_FOO_PROTO`.
pub fn to_preprocessor_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'A'..='Z' | '0'..='9' => c,
            'a'..='z' => c.to_ascii_uppercase(),
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_camel_splits_on_underscores() {
        assert_eq!(to_upper_camel("foo_bar"), "FooBar");
        assert_eq!(to_upper_camel("foo"), "Foo");
        assert_eq!(to_upper_camel("foo__bar"), "FooBar");
        assert_eq!(to_upper_camel("clientID"), "ClientID");
    }

    #[test]
    fn lower_camel_lowers_only_the_first_word() {
        assert_eq!(to_lower_camel("foo_bar"), "fooBar");
        assert_eq!(to_lower_camel("Foo_bar"), "fooBar");
        assert_eq!(to_lower_camel("foo"), "foo");
    }

    #[test]
    fn snake_case_keeps_acronym_letters_separate() {
        assert_eq!(to_snake_case("FooBar"), "foo_bar");
        assert_eq!(to_snake_case("fooBar"), "foo_bar");
        assert_eq!(to_snake_case("foo_bar"), "foo_bar");
        assert_eq!(to_snake_case("ABC"), "a_b_c");
    }

    #[test]
    fn preprocessor_name_replaces_punctuation() {
        assert_eq!(to_preprocessor_name("test/foo.proto"), "TEST_FOO_PROTO");
        assert_eq!(to_preprocessor_name("a-b9.proto"), "A_B9_PROTO");
    }
}
