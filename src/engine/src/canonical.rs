/* src/engine/src/canonical.rs */

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::errors::RenderError;

/// Stylesheet extensions understood by common CSS pre-processors.
pub const STYLE_EXTENSIONS: &[&str] =
  &[".css", ".pcss", ".postcss", ".scss", ".sass", ".styl", ".stylus", ".less"];

fn css_request_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    let alternatives: Vec<&str> = STYLE_EXTENSIONS.iter().map(|s| &s[1..]).collect();
    Regex::new(&format!(r"\.({})($|\?)", alternatives.join("|"))).expect("static pattern")
  })
}

/// True when a module specifier points at a stylesheet.
pub fn is_css_request(request: &str) -> bool {
  css_request_re().is_match(request)
}

/// File extension of the last path segment, without the dot. Dotfiles and
/// extension-less segments yield `None`.
pub fn extname(path: &str) -> Option<&str> {
  let segment = path.rsplit('/').next().unwrap_or(path);
  match segment.rfind('.') {
    Some(0) | None => None,
    Some(pos) => Some(&segment[pos + 1..]),
  }
}

/// Normalize a raw path to its canonical form before resolving against a
/// base origin: `/index.html` is not canonical, neither is a trailing
/// pagination segment `/1/`; extension-less paths gain a trailing slash;
/// duplicate slashes collapse.
pub fn canonical_url(path: &str, base: &Url) -> Result<Url, RenderError> {
  let mut pathname = path.strip_suffix("/index.html").unwrap_or(path).to_string();

  if let Some(stripped) = pathname.strip_suffix("/1/").or_else(|| pathname.strip_suffix("/1")) {
    pathname = stripped.to_string();
  }

  if extname(&pathname).is_none() {
    while pathname.ends_with('/') {
      pathname.pop();
    }
    pathname.push('/');
  }

  let mut collapsed = String::with_capacity(pathname.len());
  let mut previous_slash = false;
  for ch in pathname.chars() {
    if ch == '/' && previous_slash {
      continue;
    }
    previous_slash = ch == '/';
    collapsed.push(ch);
  }

  base.join(&collapsed).map_err(|e| RenderError::Resolve(format!("canonical URL: {e}")))
}
