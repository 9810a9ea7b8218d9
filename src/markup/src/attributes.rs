/* src/markup/src/attributes.rs */

use serde_json::Value;

use crate::escape::escape_attribute;

// Elements that never take a closing tag. A string-tag component with no
// children self-closes when its name is in this table.
const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link", "meta",
  "param", "source", "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
  VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// Plain-text form of an expression value: scalars print themselves,
/// compound values print as compact JSON.
pub fn stringify(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_string(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Turn an expression value into an attribute fragment (leading space
/// included), or nothing at all.
///
/// `null`/`false` drop the attribute. `true` on a `data-*` key renders the
/// bare key. The `class:list` convention serializes list/map class values
/// under a plain `class` attribute.
pub fn add_attribute(value: &Value, key: &str) -> String {
  if value.is_null() || *value == Value::Bool(false) {
    return String::new();
  }

  if key == "class:list" {
    let class_key = &key[..key.len() - 5];
    return format!(r#" {}="{}""#, class_key, escape_attribute(&serialize_list_value(value)));
  }

  if *value == Value::Bool(true) && key.starts_with("data-") {
    return format!(" {key}");
  }

  format!(r#" {}="{}""#, key, escape_attribute(&stringify(value)))
}

/// Render every entry of a props map as attributes, in map order.
pub fn spread_attributes(values: &serde_json::Map<String, Value>) -> String {
  let mut output = String::new();
  for (key, value) in values {
    output.push_str(&add_attribute(value, key));
  }
  output
}

/// Flatten a class-list value into a space-separated token string.
/// Strings split on whitespace, arrays recurse, objects keep keys with
/// truthy values. Tokens stay unique in first-seen order.
pub fn serialize_list_value(value: &Value) -> String {
  let mut tokens: Vec<String> = Vec::new();
  push_list_value(value, &mut tokens);
  tokens.join(" ")
}

fn push_list_value(value: &Value, tokens: &mut Vec<String>) {
  match value {
    Value::Array(items) => {
      for item in items {
        push_list_value(item, tokens);
      }
    }
    Value::String(s) => {
      for name in s.split_whitespace() {
        push_token(name, tokens);
      }
    }
    Value::Number(n) => push_token(&n.to_string(), tokens),
    Value::Object(map) => {
      for (name, enabled) in map {
        if is_truthy(enabled) {
          push_token(name, tokens);
        }
      }
    }
    _ => {}
  }
}

fn push_token(name: &str, tokens: &mut Vec<String>) {
  if !name.is_empty() && !tokens.iter().any(|t| t == name) {
    tokens.push(name.to_string());
  }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        i != 0
      } else if let Some(f) = n.as_f64() {
        f != 0.0
      } else {
        true
      }
    }
    Value::String(s) => !s.is_empty(),
    Value::Array(arr) => !arr.is_empty(),
    Value::Object(_) => true,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn false_drops_attribute() {
    assert_eq!(add_attribute(&json!(false), "checked"), "");
  }

  #[test]
  fn null_drops_attribute() {
    assert_eq!(add_attribute(&json!(null), "title"), "");
  }

  #[test]
  fn true_data_key_is_bare() {
    assert_eq!(add_attribute(&json!(true), "data-x"), " data-x");
  }

  #[test]
  fn true_plain_key_keeps_value() {
    assert_eq!(add_attribute(&json!(true), "draggable"), r#" draggable="true""#);
  }

  #[test]
  fn string_value_escapes_amp_and_quote() {
    assert_eq!(add_attribute(&json!("a&b"), "title"), r#" title="a&#38;b""#);
    assert_eq!(add_attribute(&json!(r#"x"y"#), "alt"), r#" alt="x&#34;y""#);
  }

  #[test]
  fn number_value() {
    assert_eq!(add_attribute(&json!(3), "tabindex"), r#" tabindex="3""#);
  }

  #[test]
  fn class_list_array() {
    assert_eq!(
      add_attribute(&json!(["a", "b", {"c": true, "d": false}]), "class:list"),
      r#" class="a b c""#
    );
  }

  #[test]
  fn spread_renders_in_map_order() {
    let map = serde_json::from_value(json!({"id": "x", "hidden": false, "data-on": true}))
      .expect("object");
    assert_eq!(spread_attributes(&map), r#" id="x" data-on"#);
  }

  #[test]
  fn serialize_list_string_splits_whitespace() {
    assert_eq!(serialize_list_value(&json!("a  b\tc")), "a b c");
  }

  #[test]
  fn serialize_list_dedups_first_seen() {
    assert_eq!(serialize_list_value(&json!(["a", "b a", {"b": 1}])), "a b");
  }

  #[test]
  fn serialize_list_numbers_and_nested() {
    assert_eq!(serialize_list_value(&json!([1, ["x", [2]]])), "1 x 2");
  }

  #[test]
  fn void_element_table() {
    assert!(is_void_element("br"));
    assert!(is_void_element("IMG"));
    assert!(!is_void_element("div"));
  }
}
