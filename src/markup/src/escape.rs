/* src/markup/src/escape.rs */

/// Escape text for placement inside an HTML text node.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

/// Escape a value for placement inside a double-quoted attribute.
/// Only the ampersand and the double quote need replacing there; template
/// fragments arrive pre-escaped and must not be double-encoded.
pub fn escape_attribute(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&#38;"),
      '"' => out.push_str("&#34;"),
      c => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escape_html_special_chars() {
    assert_eq!(escape_html("<>&\"'"), "&lt;&gt;&amp;&quot;&#x27;");
  }

  #[test]
  fn escape_html_safe_string() {
    assert_eq!(escape_html("hello world"), "hello world");
  }

  #[test]
  fn escape_attribute_amp_and_quote_only() {
    assert_eq!(escape_attribute("a&b"), "a&#38;b");
    assert_eq!(escape_attribute("say \"hi\""), "say &#34;hi&#34;");
    assert_eq!(escape_attribute("<kept>"), "<kept>");
  }

  #[test]
  fn escape_attribute_empty() {
    assert_eq!(escape_attribute(""), "");
  }
}
