/* src/engine/src/hydration.rs */

//! Hydration island packaging: directive extraction from `client:*` props,
//! stable island identifiers, and the bootstrap data-carrier script.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use atoll_markup::SsrElement;

use crate::errors::RenderError;
use crate::renderer::Renderer;
use crate::result::SsrResult;

const HYDRATION_STRATEGIES: &[&str] = &["load", "idle", "visible", "media", "only"];

/// Marker prop on the emitted bootstrap script; page assembly keys the
/// `display: contents` island style off its presence.
pub const HYDRATION_SCRIPT_PROP: &str = "data-atoll-component-hydration";

/// Hydration request extracted from a component invocation's props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationDirective {
  /// One of `load`, `idle`, `visible`, `media`, `only`.
  pub directive: String,
  /// Strategy-specific argument: a media query for `media`, a renderer
  /// name hint for `only`, `true` for bare directives.
  pub value: Value,
  pub component_url: Option<String>,
  pub component_export: Option<String>,
}

/// Per-instance metadata derived from one `render_component` call. Never
/// persisted beyond that call except inside the emitted script payload.
#[derive(Debug, Clone, Default)]
pub struct ComponentMetadata {
  pub display_name: String,
  pub hydrate: Option<String>,
  pub hydrate_args: Value,
  pub component_export: Option<String>,
  pub component_url: Option<String>,
}

#[derive(Debug)]
pub struct ExtractedDirectives {
  pub hydration: Option<HydrationDirective>,
  /// Ordinary props with every `client:*` key removed.
  pub props: Value,
}

/// Split `client:*` directives out of a props object. The
/// `client:component-path` / `client:component-export` keys are compiler
/// hints attached to whichever strategy directive is present; hints
/// without a strategy yield no hydration request.
pub fn extract_directives(props: &Value) -> Result<ExtractedDirectives, RenderError> {
  let Some(map) = props.as_object() else {
    return Ok(ExtractedDirectives { hydration: None, props: props.clone() });
  };

  let mut plain = serde_json::Map::new();
  let mut directive: Option<(String, Value)> = None;
  let mut component_url = None;
  let mut component_export = None;

  for (key, value) in map {
    match key.as_str() {
      "client:component-path" => component_url = value.as_str().map(str::to_string),
      "client:component-export" => component_export = value.as_str().map(str::to_string),
      k if k.starts_with("client:") => {
        let strategy = &k["client:".len()..];
        if !HYDRATION_STRATEGIES.contains(&strategy) {
          return Err(RenderError::MalformedDirective {
            message: format!("unknown hydration directive client:{strategy}"),
          });
        }
        if strategy == "media" && !value.is_string() {
          return Err(RenderError::MalformedDirective {
            message: "client:media requires a media query value, e.g. client:media=\"(max-width: 600px)\"".into(),
          });
        }
        directive = Some((strategy.to_string(), value.clone()));
      }
      _ => {
        plain.insert(key.clone(), value.clone());
      }
    }
  }

  let hydration = directive.map(|(directive, value)| HydrationDirective {
    directive,
    value,
    component_url,
    component_export,
  });
  Ok(ExtractedDirectives { hydration, props: Value::Object(plain) })
}

/// Content-derived island identifier over export name, source URL and the
/// rendered markup, so structurally identical islands collapse to one id.
/// FNV-1a in base36: deterministic and order-sensitive, collision
/// avoidance only.
pub fn island_id(input: &str) -> String {
  const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
  const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

  let mut hash = FNV_OFFSET;
  for byte in input.bytes() {
    hash ^= u64::from(byte);
    hash = hash.wrapping_mul(FNV_PRIME);
  }
  to_base36(hash)
}

fn to_base36(mut n: u64) -> String {
  const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
  if n == 0 {
    return "0".to_string();
  }
  let mut out = Vec::new();
  while n > 0 {
    out.push(DIGITS[(n % 36) as usize]);
    n /= 36;
  }
  out.reverse();
  String::from_utf8(out).unwrap_or_default()
}

/// Hash input for an island: export + URL frame the markup so two
/// components with identical HTML but different sources stay distinct.
pub(crate) fn island_hash_input(export: &str, url: &str, html: &str) -> String {
  format!("<!--{export}:{url}-->\n{html}")
}

fn fragment_marker_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new("</?atoll-fragment>").expect("static pattern"))
}

/// Remove leftover internal fragment-boundary markers from non-hydrated
/// output before it is returned to the parent template.
pub(crate) fn strip_fragment_markers(html: &str) -> String {
  fragment_marker_re().replace_all(html, "").into_owned()
}

/// Build the bootstrap script for one island. This is a data carrier for
/// the client loader, not inline hydration logic: it names the strategy
/// loader, the component module/export, the renderer client entry, the
/// serialized props and the island id.
pub async fn generate_hydrate_script(
  result: &SsrResult,
  renderer: &Renderer,
  island_id: &str,
  props: &Value,
  metadata: &ComponentMetadata,
) -> Result<SsrElement, RenderError> {
  let missing = |hint: &str| RenderError::MalformedDirective {
    message: format!("{} needs a {hint} hint to hydrate on the client", metadata.display_name),
  };
  let hydrate = metadata.hydrate.as_deref().ok_or_else(|| missing("client:* strategy"))?;
  let export =
    metadata.component_export.as_deref().ok_or_else(|| missing("client:component-export"))?;
  let url = metadata.component_url.as_deref().ok_or_else(|| missing("client:component-path"))?;

  let loader = result.resolve(&format!("@atoll/hydrate/{hydrate}.js")).await?;
  let component_module = result.resolve(url).await?;

  let hydration_source = if let Some(source) = &renderer.source {
    let renderer_module = result.resolve(source).await?;
    let props_json = serde_json::to_string(props).unwrap_or_default();
    format!(
      "const [{{ {export}: Component }}, {{ default: hydrate }}] = await Promise.all([import(\"{component_module}\"), import(\"{renderer_module}\")]);\n  return (el, children) => hydrate(el)(Component, {props_json}, children);\n"
    )
  } else {
    format!("await import(\"{component_module}\");\n  return () => {{}};\n")
  };

  let args = if metadata.hydrate_args.is_null() {
    "{}".to_string()
  } else {
    format!("{{\"value\":{}}}", serde_json::to_string(&metadata.hydrate_args).unwrap_or_default())
  };

  let mut script_props = serde_json::Map::new();
  script_props.insert("type".into(), Value::String("module".into()));
  script_props.insert(HYDRATION_SCRIPT_PROP.into(), Value::Bool(true));

  let children = format!(
    "import setup from '{loader}';\nsetup(\"{island_id}\", {args}, async () => {{\n  {hydration_source}}});\n"
  );
  Ok(SsrElement::new(script_props, children))
}
