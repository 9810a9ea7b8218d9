/* src/markup/src/vars.rs */

use serde_json::Value;

use crate::attributes::stringify;

/// Render a `define:vars` map as CSS custom properties under a selector.
pub fn define_style_vars(selector: &str, vars: &serde_json::Map<String, Value>) -> String {
  let mut output = String::from("\n");
  for (key, value) in vars {
    output.push_str(&format!("  --{}: {};\n", key, stringify(value)));
  }
  format!("{selector} {{{output}}}")
}

/// Render a `define:vars` map as `let` declarations for an inline script.
pub fn define_script_vars(vars: &serde_json::Map<String, Value>) -> String {
  let mut output = String::new();
  for (key, value) in vars {
    // JSON is valid JS expression syntax for these values
    output.push_str(&format!("let {} = {};\n", key, serde_json::to_string(value).unwrap_or_default()));
  }
  output
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn map(v: Value) -> serde_json::Map<String, Value> {
    serde_json::from_value(v).expect("object")
  }

  #[test]
  fn style_vars_under_selector() {
    let out = define_style_vars(":root", &map(json!({"accent": "teal", "gap": "4px"})));
    assert_eq!(out, ":root {\n  --accent: teal;\n  --gap: 4px;\n}");
  }

  #[test]
  fn style_vars_numeric_value() {
    let out = define_style_vars(".atoll-xyz", &map(json!({"cols": 3})));
    assert_eq!(out, ".atoll-xyz {\n  --cols: 3;\n}");
  }

  #[test]
  fn script_vars_are_json_literals() {
    let out = define_script_vars(&map(json!({"count": 2, "label": "a\"b"})));
    assert_eq!(out, "let count = 2;\nlet label = \"a\\\"b\";\n");
  }

  #[test]
  fn empty_maps() {
    assert_eq!(define_script_vars(&map(json!({}))), "");
    assert_eq!(define_style_vars("s", &map(json!({}))), "s {\n}");
  }
}
