/* src/engine/src/result.rs */

//! Per-render context (`SsrResult`) and the page/component globals exposed
//! to component logic. One `SsrResult` is constructed per page request,
//! passed by reference through the whole render tree, and discarded after
//! the page string is finalized — never shared across requests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;
use url::Url;

use atoll_markup::SsrElement;

use crate::LocalBoxFuture;
use crate::cache::{SpecifierCache, SpecifierStore};
use crate::canonical::{canonical_url, is_css_request};
use crate::component::Slots;
use crate::config::SsrConfig;
use crate::content::{ContentEntry, ContentModule, fetch_content};
use crate::errors::RenderError;
use crate::renderer::Renderer;

/// Host-supplied capability turning bare module/style specifiers into
/// servable URLs.
pub type ResolveFn = Rc<dyn Fn(String) -> LocalBoxFuture<Result<String, RenderError>>>;

pub struct ResultMetadata {
  pub renderers: Vec<Renderer>,
  pub pathname: String,
  pub static_build: bool,
}

/// Mutable per-render collection context. Collections are appended to from
/// the single logical render flow of one page; iteration order for
/// assembly is first-insertion order.
pub struct SsrResult {
  pub(crate) styles: RefCell<Vec<SsrElement>>,
  pub(crate) scripts: RefCell<Vec<SsrElement>>,
  pub(crate) links: RefCell<Vec<SsrElement>>,
  pub metadata: ResultMetadata,
  resolver: ResolveFn,
  cache: SpecifierCache,
  origin_url: Url,
  canonical_base: Url,
  params: BTreeMap<String, String>,
}

pub struct CreateResultArgs {
  pub config: SsrConfig,
  /// Request origin, e.g. `http://localhost:3000`.
  pub origin: String,
  /// Route params matched for this request.
  pub params: BTreeMap<String, String>,
  /// Output pathname of the page being rendered.
  pub pathname: String,
  pub renderers: Vec<Renderer>,
  pub resolver: ResolveFn,
  /// Durable store for `CacheMode::Shared`; ignored otherwise.
  pub shared_cache: Option<Rc<dyn SpecifierStore>>,
}

/// Build the result object threaded through a page render. It starts as an
/// empty shell; rendering populates the style/script/link collections.
pub fn create_result(args: CreateResultArgs) -> Result<Rc<SsrResult>, RenderError> {
  let CreateResultArgs { config, origin, params, pathname, renderers, resolver, shared_cache } =
    args;

  let origin_url =
    Url::parse(&origin).map_err(|e| RenderError::Resolve(format!("origin {origin}: {e}")))?;
  let canonical_base = match &config.site {
    Some(site) => {
      Url::parse(site).map_err(|e| RenderError::Resolve(format!("site {site}: {e}")))?
    }
    None => origin_url.clone(),
  };

  Ok(Rc::new(SsrResult {
    styles: RefCell::new(Vec::new()),
    scripts: RefCell::new(Vec::new()),
    links: RefCell::new(Vec::new()),
    metadata: ResultMetadata { renderers, pathname, static_build: config.static_build },
    resolver,
    cache: SpecifierCache::from_config(config.cache, shared_cache),
    origin_url,
    canonical_base,
    params,
  }))
}

impl SsrResult {
  pub fn push_style(&self, element: SsrElement) {
    self.styles.borrow_mut().push(element);
  }

  pub fn push_script(&self, element: SsrElement) {
    self.scripts.borrow_mut().push(element);
  }

  pub fn push_link(&self, element: SsrElement) {
    self.links.borrow_mut().push(element);
  }

  /// Resolve a module specifier through the host capability, memoized in
  /// the configured cache backend.
  pub async fn resolve(&self, specifier: &str) -> Result<String, RenderError> {
    if let Some(hit) = self.cache.get(specifier) {
      return Ok(hit);
    }
    let resolved = (self.resolver)(specifier.to_string()).await?;
    self.cache.put(specifier, resolved.clone());
    Ok(resolved)
  }

  /// Construct the per-component global for one component invocation.
  /// Slot contents never cross this boundary; only slot names do.
  pub fn create_global(
    &self,
    page: &Rc<PageGlobal>,
    props: Value,
    slots: Option<&Slots>,
  ) -> Result<ComponentGlobal, RenderError> {
    let relative = format!(".{}", self.metadata.pathname);
    let url = self
      .origin_url
      .join(&relative)
      .map_err(|e| RenderError::Resolve(format!("pathname {}: {e}", self.metadata.pathname)))?;
    let canonical = canonical_url(&relative, &self.canonical_base)?;

    let slot_names = slots
      .map(|s| s.keys().map(|name| (name.clone(), true)).collect())
      .unwrap_or_default();

    Ok(ComponentGlobal {
      page: Rc::clone(page),
      props,
      slots: slot_names,
      request: RequestInfo { url, canonical_url: canonical, params: self.params.clone() },
      static_build: self.metadata.static_build,
    })
  }
}

/// Request metadata exposed to component logic.
#[derive(Debug, Clone)]
pub struct RequestInfo {
  pub url: Url,
  pub canonical_url: Url,
  pub params: BTreeMap<String, String>,
}

/// Page-level read-only context, created once per page file and shared by
/// every component invocation on that page.
pub struct PageGlobal {
  pub site: Url,
  url: Url,
  project_root: Url,
}

impl PageGlobal {
  pub fn new(file_pathname: &str, site: &str, project_root: &str) -> Result<Self, RenderError> {
    let site =
      Url::parse(site).map_err(|e| RenderError::Resolve(format!("site {site}: {e}")))?;
    let url = site
      .join(file_pathname)
      .map_err(|e| RenderError::Resolve(format!("page {file_pathname}: {e}")))?;
    let project_root = site
      .join(project_root)
      .map_err(|e| RenderError::Resolve(format!("project root {project_root}: {e}")))?;
    Ok(Self { site, url, project_root })
  }

  /// Resolve path segments against the page file, then strip the project
  /// root so the result is a root-relative asset path.
  pub fn resolve(&self, segments: &[&str]) -> String {
    let mut resolved = self.url.clone();
    for segment in segments {
      if let Ok(next) = resolved.join(segment) {
        resolved = next;
      }
    }
    let path = resolved.path();
    let root = self.project_root.path();
    if path.starts_with(root) { format!("/{}", &path[root.len()..]) } else { path.to_string() }
  }

  /// Enumerate a statically-imported content-module record relative to
  /// this page.
  pub fn fetch_content(
    &self,
    modules: &BTreeMap<String, ContentModule>,
  ) -> Result<Vec<ContentEntry>, RenderError> {
    fetch_content(modules, &self.url)
  }
}

/// Per-component-invocation read context. Page-level fields delegate to
/// the shared `PageGlobal` by explicit composition.
pub struct ComponentGlobal {
  page: Rc<PageGlobal>,
  pub props: Value,
  /// Presence map only: slot name to `true`, never slot content.
  pub slots: BTreeMap<String, bool>,
  pub request: RequestInfo,
  static_build: bool,
}

impl ComponentGlobal {
  pub fn site(&self) -> &Url {
    &self.page.site
  }

  pub fn fetch_content(
    &self,
    modules: &BTreeMap<String, ContentModule>,
  ) -> Result<Vec<ContentEntry>, RenderError> {
    self.page.fetch_content(modules)
  }

  /// Legacy synchronous resolve. Disabled under static builds: warns and
  /// returns an empty string so callers cannot rely on it.
  pub fn resolve(&self, path: &str) -> String {
    if self.static_build {
      let extra = if is_css_request(path) {
        format!(
          "It looks like you are resolving styles. If you are adding a link tag, replace with this:\n<style global>\n@import \"{path}\";\n</style>"
        )
      } else {
        format!("This can be replaced with a dynamic import like so: await import(\"{path}\")")
      };
      tracing::warn!(
        specifier = path,
        "resolve() is deprecated under static builds and returned an empty string. {extra}"
      );
      return String::new();
    }
    self.page.resolve(&[path])
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;
  use crate::template::Expr;
  use serde_json::json;

  fn passthrough_resolver() -> ResolveFn {
    Rc::new(|specifier: String| {
      Box::pin(async move { Ok(format!("/_modules/{}", specifier.trim_start_matches('/'))) })
        as LocalBoxFuture<Result<String, RenderError>>
    })
  }

  fn counting_resolver(counter: Rc<Cell<usize>>) -> ResolveFn {
    Rc::new(move |specifier: String| {
      counter.set(counter.get() + 1);
      Box::pin(async move { Ok(format!("/r/{specifier}")) })
        as LocalBoxFuture<Result<String, RenderError>>
    })
  }

  fn result_args() -> CreateResultArgs {
    CreateResultArgs {
      config: SsrConfig::default(),
      origin: "http://localhost:3000".into(),
      params: BTreeMap::new(),
      pathname: "/about".into(),
      renderers: Vec::new(),
      resolver: passthrough_resolver(),
      shared_cache: None,
    }
  }

  #[tokio::test]
  async fn resolve_is_memoized_per_render() {
    let counter = Rc::new(Cell::new(0));
    let mut args = result_args();
    args.resolver = counting_resolver(Rc::clone(&counter));
    let result = create_result(args).unwrap();

    assert_eq!(result.resolve("widget.js").await.unwrap(), "/r/widget.js");
    assert_eq!(result.resolve("widget.js").await.unwrap(), "/r/widget.js");
    assert_eq!(counter.get(), 1);
  }

  #[test]
  fn global_exposes_slot_presence_only() {
    let result = create_result(result_args()).unwrap();
    let page = Rc::new(
      PageGlobal::new("/src/pages/about.atoll", "https://example.com", "/").unwrap(),
    );
    let mut slots = Slots::new();
    slots.insert("default".into(), Expr::from("hidden content"));
    let global = result.create_global(&page, json!({"a": 1}), Some(&slots)).unwrap();

    assert_eq!(global.slots.get("default"), Some(&true));
    assert_eq!(global.props, json!({"a": 1}));
    assert_eq!(global.request.url.as_str(), "http://localhost:3000/about");
    assert_eq!(global.request.canonical_url.path(), "/about/");
  }

  #[test]
  fn canonical_uses_configured_site() {
    let mut args = result_args();
    args.config.site = Some("https://example.com/base/".into());
    args.pathname = "/blog/index.html".into();
    let result = create_result(args).unwrap();
    let page =
      Rc::new(PageGlobal::new("/src/pages/blog.atoll", "https://example.com", "/").unwrap());
    let global = result.create_global(&page, json!({}), None).unwrap();
    assert_eq!(global.request.canonical_url.as_str(), "https://example.com/base/blog/");
  }

  #[test]
  fn page_resolve_strips_project_root() {
    let page = PageGlobal::new(
      "/home/proj/src/pages/index.atoll",
      "http://localhost:3000",
      "/home/proj/",
    )
    .unwrap();
    assert_eq!(page.resolve(&["../images/tower.png"]), "/src/images/tower.png");
  }

  #[test]
  fn static_build_resolve_is_disabled() {
    let mut args = result_args();
    args.config.static_build = true;
    let result = create_result(args).unwrap();
    let page =
      Rc::new(PageGlobal::new("/src/pages/about.atoll", "https://example.com", "/").unwrap());
    let global = result.create_global(&page, json!({}), None).unwrap();
    assert_eq!(global.resolve("./style.css"), "");
  }
}
