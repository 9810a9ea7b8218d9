/* src/engine/src/content.rs */

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::errors::RenderError;

/// One statically-imported content module, keyed by its import specifier.
/// Only modules declaring frontmatter are considered content.
#[derive(Debug, Clone, Default)]
pub struct ContentModule {
  pub frontmatter: Option<Value>,
  /// Module-level metadata (headings, source info) exposed as `content`.
  pub metadata: Value,
}

/// A content entry as returned by `fetch_content`: frontmatter plus
/// derived file/routing fields.
#[derive(Debug, Clone)]
pub struct ContentEntry {
  pub frontmatter: Value,
  pub content: Value,
  /// Absolute file URL of the module, resolved against the calling page.
  pub file: Url,
  /// Page route when the module lives under a `pages/` directory.
  pub url: Option<String>,
}

fn pages_prefix_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^.*/pages/").expect("static pattern"))
}

fn md_route_suffix_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(/index)?\.md$").expect("static pattern"))
}

/// Enumerate a statically-imported content-module record.
///
/// Fails when the record is empty (a glob that matches nothing is a page
/// bug, not an empty collection). Keeps only frontmatter-bearing entries
/// and annotates each with its file URL and, for modules under `pages/`,
/// the route it is served at.
pub fn fetch_content(
  modules: &BTreeMap<String, ContentModule>,
  base: &Url,
) -> Result<Vec<ContentEntry>, RenderError> {
  if modules.is_empty() {
    return Err(RenderError::ContentFetchEmpty { pathname: base.path().to_string() });
  }

  let mut entries = Vec::new();
  for (specifier, module) in modules {
    let Some(frontmatter) = &module.frontmatter else {
      continue;
    };
    let file = base
      .join(specifier)
      .map_err(|e| RenderError::Resolve(format!("content specifier {specifier}: {e}")))?;

    let path = file.path();
    let url = if path.contains("/pages/") {
      let routed = pages_prefix_re().replace(path, "/");
      Some(md_route_suffix_re().replace(&routed, "").into_owned())
    } else {
      None
    };

    entries.push(ContentEntry {
      frontmatter: frontmatter.clone(),
      content: module.metadata.clone(),
      file,
      url,
    });
  }
  Ok(entries)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn base() -> Url {
    Url::parse("https://example.com/src/pages/blog/index.atoll").expect("valid base")
  }

  fn module(frontmatter: Option<Value>) -> ContentModule {
    ContentModule { frontmatter, metadata: json!({"headings": []}) }
  }

  #[test]
  fn empty_record_fails() {
    let err = fetch_content(&BTreeMap::new(), &base()).unwrap_err();
    assert!(matches!(err, RenderError::ContentFetchEmpty { .. }));
    assert!(err.to_string().contains("/src/pages/blog/index.atoll"));
  }

  #[test]
  fn keeps_only_frontmatter_entries() {
    let mut modules = BTreeMap::new();
    modules.insert("./one.md".to_string(), module(Some(json!({"title": "One"}))));
    modules.insert("./two.md".to_string(), module(None));
    let entries = fetch_content(&modules, &base()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].frontmatter, json!({"title": "One"}));
  }

  #[test]
  fn derives_page_route() {
    let mut modules = BTreeMap::new();
    modules.insert("./post-a.md".to_string(), module(Some(json!({"title": "A"}))));
    modules.insert("./sub/index.md".to_string(), module(Some(json!({"title": "B"}))));
    let entries = fetch_content(&modules, &base()).unwrap();
    assert_eq!(entries[0].url.as_deref(), Some("/blog/post-a"));
    assert_eq!(entries[1].url.as_deref(), Some("/blog/sub"));
  }

  #[test]
  fn outside_pages_has_no_route() {
    let outside = Url::parse("https://example.com/src/data/list.atoll").expect("valid");
    let mut modules = BTreeMap::new();
    modules.insert("./item.md".to_string(), module(Some(json!({"t": 1}))));
    let entries = fetch_content(&modules, &outside).unwrap();
    assert_eq!(entries[0].url, None);
    assert_eq!(entries[0].file.path(), "/src/data/item.md");
  }
}
