/* src/engine/src/config.rs */

use serde::Deserialize;

/// Which backend memoizes `resolve` lookups during a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
  /// Fresh in-memory map per render; discarded with the result.
  #[default]
  PerRender,
  /// Host-injected store shared across renders (requires a store in
  /// `CreateResultArgs`; falls back to per-render when absent).
  Shared,
}

/// Engine configuration supplied by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct SsrConfig {
  /// Deployed site origin; canonical URLs resolve against it. Falls back
  /// to the request origin when unset.
  #[serde(default)]
  pub site: Option<String>,
  /// Project root path; `resolve()` strips it so asset paths stay
  /// root-relative.
  #[serde(default = "default_project_root")]
  pub project_root: String,
  /// Static-build mode: inline style collection is suppressed and the
  /// legacy synchronous resolve path is disabled with a warning.
  #[serde(default)]
  pub static_build: bool,
  #[serde(default)]
  pub cache: CacheMode,
}

fn default_project_root() -> String {
  "/".to_string()
}

impl Default for SsrConfig {
  fn default() -> Self {
    Self {
      site: None,
      project_root: default_project_root(),
      static_build: false,
      cache: CacheMode::default(),
    }
  }
}
