/* src/engine/src/renderer.rs */

use std::rc::Rc;

use serde_json::Value;

use crate::LocalBoxFuture;
use crate::errors::RenderError;

/// Naming convention for first-party renderer packages. Hints like
/// `client:only="react"` and extension guesses match against either the
/// full package name or this prefix plus the short name.
pub const RENDERER_PREFIX: &str = "@atoll/renderer-";

/// Result of a renderer's static-markup hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMarkup {
  pub html: String,
}

/// Capability probe: does this renderer claim the component?
/// Receives the opaque component descriptor, cleaned props, and the
/// pre-resolved default-slot children.
pub type CheckFn =
  Rc<dyn Fn(Value, Value, Option<String>) -> LocalBoxFuture<Result<bool, RenderError>>>;

/// Server-render hook, invoked only after a successful check (or a
/// heuristic pick under `client:only`).
pub type RenderToStaticMarkupFn =
  Rc<dyn Fn(Value, Value, Option<String>) -> LocalBoxFuture<Result<StaticMarkup, RenderError>>>;

#[derive(Clone)]
pub struct SsrHooks {
  pub check: CheckFn,
  pub render_to_static_markup: RenderToStaticMarkupFn,
}

/// A pluggable UI-framework renderer supplied by the host configuration.
/// The engine only consumes this contract; it never registers renderers
/// globally — they travel inside `CreateResultArgs`.
#[derive(Clone)]
pub struct Renderer {
  pub name: String,
  pub ssr: SsrHooks,
  /// Module specifiers registered as `<script type="module">` imports once
  /// per renderer per page.
  pub polyfills: Vec<String>,
  /// Client entry exposing the framework's hydrate function; imported by
  /// the island bootstrap script.
  pub source: Option<String>,
}

pub(crate) fn short_renderer_name(name: &str) -> &str {
  name.strip_prefix(RENDERER_PREFIX).unwrap_or(name)
}

/// Last dot-segment of a component source URL. Mirrors the loose split
/// used upstream: a URL with no dot yields the whole string.
pub(crate) fn url_extension(component_url: &str) -> &str {
  component_url.rsplit('.').next().unwrap_or(component_url)
}

/// Prioritized guess at which renderer packages could handle a component,
/// from its source file extension. Unknown or absent extension means any
/// of the known UI renderers.
pub fn guess_renderers(component_url: Option<&str>) -> Vec<String> {
  let extension = component_url.map(url_extension);
  match extension {
    Some("svelte") => vec![format!("{RENDERER_PREFIX}svelte")],
    Some("vue") => vec![format!("{RENDERER_PREFIX}vue")],
    Some("jsx") | Some("tsx") => {
      vec![format!("{RENDERER_PREFIX}react"), format!("{RENDERER_PREFIX}preact")]
    }
    _ => vec![
      format!("{RENDERER_PREFIX}react"),
      format!("{RENDERER_PREFIX}preact"),
      format!("{RENDERER_PREFIX}vue"),
      format!("{RENDERER_PREFIX}svelte"),
    ],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn guess_by_extension() {
    assert_eq!(guess_renderers(Some("/src/Widget.svelte")), vec!["@atoll/renderer-svelte"]);
    assert_eq!(guess_renderers(Some("/src/App.vue")), vec!["@atoll/renderer-vue"]);
    assert_eq!(
      guess_renderers(Some("/src/Counter.jsx")),
      vec!["@atoll/renderer-react", "@atoll/renderer-preact"]
    );
  }

  #[test]
  fn guess_without_extension_lists_all() {
    assert_eq!(guess_renderers(None).len(), 4);
    assert_eq!(guess_renderers(Some("no-dot-url")).len(), 4);
  }

  #[test]
  fn short_name_strips_prefix_only() {
    assert_eq!(short_renderer_name("@atoll/renderer-react"), "react");
    assert_eq!(short_renderer_name("custom-renderer"), "custom-renderer");
  }
}
