//! Encoding of `args`/`globals` query param values.
//!
//! Only the difference between initial and current values is encoded, as `key:value` pairs
//! joined by `;`. Nested objects use dotted keys and arrays use `[index]` keys. Values that would
//! not survive a round trip through the URL are dropped with a one-time warning.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::{model::Args, warnings::OnceWarnings};

static VALIDATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 _-]*$").expect("valid validation regex"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid number regex"));
static HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#([a-f0-9]{3,4}|[a-f0-9]{6}|[a-f0-9]{8})$").expect("valid hex regex")
});
static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(rgba?|hsla?)\(([0-9]{1,3}),\s?([0-9]{1,3})%?,\s?([0-9]{1,3})%?,?\s?([0-9](\.[0-9]{1,2})?)?\)$",
    )
    .expect("valid color regex")
});

const UNSAFE_ARGS_WARNING: &str = "Omitted potentially unsafe URL args.\n\nURL args are only supported for serializable values. Strings may only contain letters, digits, spaces, underscores and dashes, or be a number or color literal; keys follow the same rule.";

/// Serializes the difference between two argument maps into a query param value.
pub trait ArgsCodec {
    /// Returns the encoded difference, or an empty string when nothing differs.
    fn build_args_param(&self, initial: &Args, current: &Args) -> String;
}

#[derive(Debug, Clone, Default)]
/// Default [`ArgsCodec`].
pub struct ArgsParamCodec {
    warnings: OnceWarnings,
}

impl ArgsParamCodec {
    /// Creates a codec that reports omitted args through `warnings`.
    pub fn new(warnings: OnceWarnings) -> Self {
        Self { warnings }
    }
}

impl ArgsCodec for ArgsParamCodec {
    fn build_args_param(&self, initial: &Args, current: &Args) -> String {
        let mut safe = Vec::new();
        for (key, diff) in diff_objects(initial, current) {
            if validate_diff(&key, &diff) {
                safe.push((key, diff));
            } else {
                self.warnings.warn("args-param.unsafe", UNSAFE_ARGS_WARNING);
            }
        }

        let mut pairs = Vec::new();
        flatten_diff("", &Diff::Object(safe), &mut pairs);
        pairs.join(";").replace(' ', "+")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Diff {
    /// Value removed or newly absent.
    Undefined,
    /// Replacement value.
    Value(Value),
    /// Changed keys only.
    Object(Vec<(String, Diff)>),
    /// Changed indices only; `None` marks an unchanged index.
    Array(Vec<Option<Diff>>),
}

#[derive(PartialEq, Eq)]
enum Kind {
    Missing,
    Container,
    Number,
    String,
    Boolean,
}

fn kind_of(value: Option<&Value>) -> Kind {
    match value {
        None => Kind::Missing,
        Some(Value::Null | Value::Array(_) | Value::Object(_)) => Kind::Container,
        Some(Value::Number(_)) => Kind::Number,
        Some(Value::String(_)) => Kind::String,
        Some(Value::Bool(_)) => Kind::Boolean,
    }
}

fn replacement(update: Option<&Value>) -> Diff {
    update.map_or(Diff::Undefined, |value| Diff::Value(value.clone()))
}

/// Returns `None` when `value` and `update` are deeply equal.
fn deep_diff(value: Option<&Value>, update: Option<&Value>) -> Option<Diff> {
    if kind_of(value) != kind_of(update) {
        return Some(replacement(update));
    }
    if value == update {
        return None;
    }
    match (value, update) {
        (Some(Value::Array(value)), Some(Value::Array(update))) => {
            let mut entries: Vec<Option<Diff>> = update
                .iter()
                .enumerate()
                .map(|(index, item)| deep_diff(value.get(index), Some(item)))
                .collect();
            entries.extend((update.len()..value.len()).map(|_| Some(Diff::Undefined)));
            Some(Diff::Array(entries))
        }
        (Some(Value::Object(value)), Some(Value::Object(update))) => {
            Some(Diff::Object(diff_objects(value, update)))
        }
        _ => Some(replacement(update)),
    }
}

fn diff_objects(value: &Map<String, Value>, update: &Map<String, Value>) -> Vec<(String, Diff)> {
    let keys: BTreeSet<&String> = value.keys().chain(update.keys()).collect();
    keys.into_iter()
        .filter_map(|key| deep_diff(value.get(key), update.get(key)).map(|diff| (key.clone(), diff)))
        .collect()
}

fn is_safe_key(key: &str) -> bool {
    !key.is_empty() && VALIDATION.is_match(key)
}

fn is_safe_string(value: &str) -> bool {
    VALIDATION.is_match(value)
        || NUMBER.is_match(value)
        || HEX.is_match(value)
        || COLOR.is_match(value)
}

fn validate_value(key: &str, value: &Value) -> bool {
    if !is_safe_key(key) {
        return false;
    }
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
        Value::String(value) => is_safe_string(value),
        Value::Array(items) => items.iter().all(|item| validate_value(key, item)),
        Value::Object(entries) => entries
            .iter()
            .all(|(child, value)| validate_value(child, value)),
    }
}

fn validate_diff(key: &str, diff: &Diff) -> bool {
    if !is_safe_key(key) {
        return false;
    }
    match diff {
        Diff::Undefined => true,
        Diff::Value(value) => validate_value(key, value),
        Diff::Array(items) => items.iter().flatten().all(|item| validate_diff(key, item)),
        Diff::Object(entries) => entries.iter().all(|(child, diff)| validate_diff(child, diff)),
    }
}

fn child_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn format_number(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e15 => {
            format!("{}", float as i64)
        }
        _ => number.to_string(),
    }
}

fn encode_string(value: &str) -> String {
    if HEX.is_match(value) {
        return format!("!hex({})", &value[1..]);
    }
    if COLOR.is_match(value) {
        let compact: String = value
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '%')
            .collect();
        return format!("!{compact}");
    }
    value.to_string()
}

fn flatten_value(prefix: &str, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => out.push(format!("{prefix}:!null")),
        Value::Bool(flag) => out.push(format!("{prefix}:{flag}")),
        Value::Number(number) => out.push(format!("{prefix}:{}", format_number(number))),
        Value::String(text) => out.push(format!("{prefix}:{}", encode_string(text))),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(&format!("{prefix}[{index}]"), item, out);
            }
        }
        Value::Object(entries) => {
            for (key, item) in entries {
                flatten_value(&child_key(prefix, key), item, out);
            }
        }
    }
}

fn flatten_diff(prefix: &str, diff: &Diff, out: &mut Vec<String>) {
    match diff {
        Diff::Undefined => out.push(format!("{prefix}:!undefined")),
        Diff::Value(value) => flatten_value(prefix, value, out),
        Diff::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if let Some(item) = item {
                    flatten_diff(&format!("{prefix}[{index}]"), item, out);
                }
            }
        }
        Diff::Object(entries) => {
            for (key, item) in entries {
                flatten_diff(&child_key(prefix, key), item, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn args(value: Value) -> Args {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn encode(initial: Value, current: Value) -> String {
        ArgsParamCodec::default().build_args_param(&args(initial), &args(current))
    }

    #[test]
    fn equal_args_encode_to_empty() {
        assert_eq!(encode(json!({"a": 1}), json!({"a": 1})), "");
        assert_eq!(encode(json!({}), json!({})), "");
    }

    #[test]
    fn encodes_changed_scalars_and_special_values() {
        assert_eq!(
            encode(
                json!({"a": 1, "b": "x", "color": "red", "same": true}),
                json!({"a": 2, "b": "hello world", "c": null, "color": "#ff0", "same": true}),
            ),
            "a:2;b:hello+world;c:!null;color:!hex(ff0)"
        );
        assert_eq!(
            encode(json!({}), json!({"bg": "rgba(255, 0, 0, 0.5)", "ratio": 1.5, "n": 2.0})),
            "bg:!rgba(255,0,0,0.5);n:2;ratio:1.5"
        );
    }

    #[test]
    fn removed_keys_encode_as_undefined() {
        assert_eq!(encode(json!({"a": 1, "b": 2}), json!({"b": 2})), "a:!undefined");
    }

    #[test]
    fn nested_objects_and_arrays_encode_only_changes() {
        assert_eq!(
            encode(
                json!({"obj": {"a": 1, "b": 2}, "arr": [1, 2, 3]}),
                json!({"obj": {"a": 1, "b": 3}, "arr": [1, 5]}),
            ),
            "arr[1]:5;arr[2]:!undefined;obj.b:3"
        );
    }

    #[test]
    fn type_changes_replace_whole_value() {
        assert_eq!(
            encode(json!({"v": "text"}), json!({"v": {"k": "x"}})),
            "v.k:x"
        );
    }

    #[test]
    fn unsafe_values_and_keys_are_omitted_with_one_warning() {
        let warnings = OnceWarnings::default();
        let codec = ArgsParamCodec::new(warnings.clone());
        let encoded = codec.build_args_param(
            &args(json!({})),
            &args(json!({"html": "<b>x</b>", "bad key!": "x", "ok": "fine"})),
        );
        assert_eq!(encoded, "ok:fine");
        assert!(warnings.has_warned("args-param.unsafe"));
    }
}
