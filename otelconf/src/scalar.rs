// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! YAML 1.2 core schema resolution for plain (unquoted) scalars.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Number, Value};

lazy_static! {
    static ref DECIMAL_INT_REGEX: Regex =
        Regex::new(r"^[-+]?[0-9]+$").expect("failed creating regex");
    static ref OCTAL_REGEX: Regex = Regex::new(r"^0o([0-7]+)$").expect("failed creating regex");
    static ref LEGACY_OCTAL_REGEX: Regex =
        Regex::new(r"^0([0-7]+)$").expect("failed creating regex");
    static ref HEX_REGEX: Regex =
        Regex::new(r"^0x([0-9a-fA-F]+)$").expect("failed creating regex");
    static ref FLOAT_REGEX: Regex =
        Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$")
            .expect("failed creating regex");
}

/// Resolves the text of a plain scalar to null, bool, integer, float or string
pub(crate) fn resolve_plain(text: &str) -> Value {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }

    if let Some(digits) = capture(&OCTAL_REGEX, text).or_else(|| capture(&LEGACY_OCTAL_REGEX, text))
    {
        return radix_int(digits, 8).unwrap_or_else(|| Value::String(text.to_owned()));
    }
    if let Some(digits) = capture(&HEX_REGEX, text) {
        return radix_int(digits, 16).unwrap_or_else(|| Value::String(text.to_owned()));
    }
    if DECIMAL_INT_REGEX.is_match(text) && !is_non_octal_leading_zero(text) {
        if let Ok(v) = text.parse::<i64>() {
            return Value::from(v);
        }
        if let Ok(v) = text.trim_start_matches('+').parse::<u64>() {
            return Value::from(v);
        }
        // too wide for the tree's integers, keep the float approximation
    }
    if FLOAT_REGEX.is_match(text) && !is_non_octal_leading_zero(text) {
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    Value::String(text.to_owned())
}

fn capture<'t>(regex: &Regex, text: &'t str) -> Option<&'t str> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn radix_int(digits: &str, radix: u32) -> Option<Value> {
    if let Ok(v) = i64::from_str_radix(digits, radix) {
        return Some(Value::from(v));
    }
    u64::from_str_radix(digits, radix).ok().map(Value::from)
}

/// `09`, `-0129`: a leading zero followed by digits that are not all octal stays a string
fn is_non_octal_leading_zero(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['-', '+']);
    let int_part = unsigned.split(['.', 'e', 'E']).next().unwrap_or_default();
    int_part.len() > 1 && int_part.starts_with('0') && !unsigned.contains(['.', 'e', 'E'])
}

#[cfg(test)]
mod tests {
    use super::resolve_plain;
    use serde_json::{json, Value};

    #[test]
    fn test_null_and_bool() {
        for text in ["", "~", "null", "Null", "NULL"] {
            assert_eq!(resolve_plain(text), Value::Null, "{text}");
        }
        assert_eq!(resolve_plain("true"), json!(true));
        assert_eq!(resolve_plain("FALSE"), json!(false));
        assert_eq!(resolve_plain("yes"), json!("yes"));
        assert_eq!(resolve_plain("tRue"), json!("tRue"));
    }

    #[test]
    fn test_integers() {
        assert_eq!(resolve_plain("0"), json!(0));
        assert_eq!(resolve_plain("42"), json!(42));
        assert_eq!(resolve_plain("-17"), json!(-17));
        assert_eq!(resolve_plain("+5"), json!(5));
        assert_eq!(resolve_plain("18446744073709551615"), json!(u64::MAX));
    }

    #[test]
    fn test_radix_integers() {
        assert_eq!(resolve_plain("0o14"), json!(12));
        assert_eq!(resolve_plain("014"), json!(12));
        assert_eq!(resolve_plain("0xff"), json!(255));
        assert_eq!(resolve_plain("0xdeadbeef"), json!(3_735_928_559_i64));
        assert_eq!(resolve_plain("0xffffffffffffffff"), json!(u64::MAX));
        assert_eq!(resolve_plain("0o19"), json!("0o19"));
        assert_eq!(resolve_plain("09"), json!("09"));
        assert_eq!(resolve_plain("0xzz"), json!("0xzz"));
    }

    #[test]
    fn test_floats() {
        assert_eq!(resolve_plain("1.5"), json!(1.5));
        assert_eq!(resolve_plain("-0.25"), json!(-0.25));
        assert_eq!(resolve_plain(".5"), json!(0.5));
        assert_eq!(resolve_plain("1e3"), json!(1000.0));
        assert_eq!(resolve_plain("0.4"), json!(0.4));
        assert_eq!(resolve_plain(".inf"), json!(".inf"));
        assert_eq!(resolve_plain("1.2.3"), json!("1.2.3"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(resolve_plain("value1"), json!("value1"));
        assert_eq!(
            resolve_plain("http://localhost:4318"),
            json!("http://localhost:4318")
        );
        assert_eq!(resolve_plain("1.0-rc.1"), json!("1.0-rc.1"));
    }
}
