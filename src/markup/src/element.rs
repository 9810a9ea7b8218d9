/* src/markup/src/element.rs */

use serde_json::Value;

use crate::attributes::{is_truthy, spread_attributes, stringify};
use crate::vars::{define_script_vars, define_style_vars};

/// A `<style>`, `<script>` or `<link>` tag collected during a render and
/// injected into the document head at assembly time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SsrElement {
  pub props: serde_json::Map<String, Value>,
  pub children: String,
}

impl SsrElement {
  pub fn new(props: serde_json::Map<String, Value>, children: impl Into<String>) -> Self {
    Self { props, children: children.into() }
  }
}

/// Assembly-time equality key: serialized props plus children text.
/// Two elements with the same key collapse to one emitted tag.
pub fn dedup_key(element: &SsrElement) -> (String, String) {
  let props = serde_json::to_string(&element.props).unwrap_or_default();
  (props, element.children.clone())
}

/// Serialize an element to its HTML tag.
///
/// Internal bookkeeping props (`lang`, `data-atoll-id`, `define:vars`) are
/// stripped before attribute serialization. A `define:vars` map renders as a
/// preceding block inside the tag: CSS custom properties for styles (scoped
/// to `:root` when the `global` prop is set, else to the generated
/// `.atoll-{id}` class), plain `let` declarations for scripts.
pub fn render_element(name: &str, element: &SsrElement) -> String {
  let mut props = element.props.clone();
  let mut children = element.children.clone();

  props.remove("lang");
  let scope_id = props.remove("data-atoll-id");
  let define_vars = props.remove("define:vars");

  if let Some(Value::Object(vars)) = define_vars {
    if name == "style" {
      let global = props.remove("global").is_some_and(|v| is_truthy(&v));
      let selector = if global {
        ":root".to_string()
      } else {
        format!(".atoll-{}", scope_id.as_ref().map(stringify).unwrap_or_default())
      };
      children = format!("{}\n{}", define_style_vars(&selector, &vars), children);
    }
    if name == "script" {
      props.remove("hoist");
      children = format!("{}\n{}", define_script_vars(&vars), children);
    }
  }

  format!("<{}{}>{}</{}>", name, spread_attributes(&props), children, name)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn element(props: Value, children: &str) -> SsrElement {
    SsrElement::new(serde_json::from_value(props).expect("object"), children)
  }

  #[test]
  fn renders_plain_tag() {
    let el = element(json!({"rel": "stylesheet", "href": "/a.css"}), "");
    assert_eq!(render_element("link", &el), r#"<link rel="stylesheet" href="/a.css"></link>"#);
  }

  #[test]
  fn strips_internal_props() {
    let el = element(json!({"lang": "scss", "data-atoll-id": "Xyz", "type": "text/css"}), "p{}");
    assert_eq!(render_element("style", &el), r#"<style type="text/css">p{}</style>"#);
  }

  #[test]
  fn style_vars_scoped_to_component_class() {
    let el = element(json!({"data-atoll-id": "Ab1", "define:vars": {"c": "red"}}), "p{}");
    assert_eq!(render_element("style", &el), "<style>.atoll-Ab1 {\n  --c: red;\n}\np{}</style>");
  }

  #[test]
  fn style_vars_global_scope() {
    let el = element(json!({"global": true, "define:vars": {"c": "red"}}), "");
    let html = render_element("style", &el);
    assert!(html.starts_with("<style>:root {"));
    assert!(!html.contains("global"));
  }

  #[test]
  fn script_vars_prepended_and_hoist_stripped() {
    let el = element(json!({"hoist": true, "define:vars": {"n": 1}}), "use(n);");
    assert_eq!(render_element("script", &el), "<script>let n = 1;\n\nuse(n);</script>");
  }

  #[test]
  fn dedup_key_ignores_identity() {
    let a = element(json!({"type": "module"}), "x()");
    let b = element(json!({"type": "module"}), "x()");
    assert_eq!(dedup_key(&a), dedup_key(&b));
    let c = element(json!({"type": "module"}), "y()");
    assert_ne!(dedup_key(&a), dedup_key(&c));
  }
}
