/* src/engine/src/component.rs */

//! Component rendering: slot resolution, the renderer-selection state
//! machine, string-tag synthesis and island packaging entry.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use atoll_markup::{SsrElement, is_void_element, spread_attributes};

use crate::LocalBoxFuture;
use crate::errors::RenderError;
use crate::hydration::{
  ComponentMetadata, extract_directives, generate_hydrate_script, island_hash_input, island_id,
  strip_fragment_markers,
};
use crate::renderer::{RENDERER_PREFIX, Renderer, guess_renderers, url_extension};
use crate::result::SsrResult;
use crate::template::{Expr, Template, render_template, resolve_expr};

/// Named slot contents for one component invocation.
pub type Slots = BTreeMap<String, Expr>;

pub type FactoryFn =
  dyn Fn(Rc<SsrResult>, Value, Slots) -> LocalBoxFuture<Result<Template, RenderError>>;

/// A compiled component factory: `(result, props, slots) -> Template`.
/// Wrapping the callable in this type is what marks it as nested page
/// logic rather than something to hand to a renderer plugin.
#[derive(Clone)]
pub struct ComponentFactory {
  func: Rc<FactoryFn>,
}

impl ComponentFactory {
  pub fn new<F>(func: F) -> Self
  where
    F: Fn(Rc<SsrResult>, Value, Slots) -> LocalBoxFuture<Result<Template, RenderError>> + 'static,
  {
    Self { func: Rc::new(func) }
  }

  pub fn call(
    &self,
    result: Rc<SsrResult>,
    props: Value,
    slots: Slots,
  ) -> LocalBoxFuture<Result<Template, RenderError>> {
    (self.func)(result, props, slots)
  }
}

/// What a component expression resolved to at the call site.
pub enum ComponentRef {
  /// The fragment sentinel: children pass through unchanged.
  Fragment,
  /// A nested composition factory, rendered as page logic.
  Factory(ComponentFactory),
  /// A plain tag name, e.g. a custom element.
  Tag(String),
  /// An opaque UI-framework component descriptor for renderer plugins.
  Foreign(Value),
  /// An import that resolved to nothing.
  Missing,
}

/// Render slotted content, falling back to the provided default. `None`
/// means neither was present (distinct from empty output).
pub async fn render_slot(
  slotted: Option<Expr>,
  fallback: Option<Expr>,
) -> Result<Option<String>, RenderError> {
  if let Some(expr) = slotted {
    return Ok(Some(resolve_expr(expr).await?));
  }
  if let Some(expr) = fallback {
    return Ok(Some(resolve_expr(expr).await?));
  }
  Ok(None)
}

/// Invoke a component factory and drain its template to a string.
pub async fn render_to_string(
  result: &Rc<SsrResult>,
  factory: &ComponentFactory,
  props: Value,
  slots: Slots,
) -> Result<String, RenderError> {
  let template = factory.call(Rc::clone(result), props, slots).await?;
  render_template(template).await
}

/// Render one component instance: dispatch across fragment / nested
/// factory / renderer plugin / plain tag, then package as a hydration
/// island when a `client:*` directive is present.
pub async fn render_component(
  result: &Rc<SsrResult>,
  display_name: &str,
  component: ComponentRef,
  props: Value,
  mut slots: Slots,
) -> Result<String, RenderError> {
  match component {
    ComponentRef::Fragment => {
      let children = render_slot(slots.remove("default"), None).await?;
      return Ok(children.unwrap_or_default());
    }
    ComponentRef::Factory(factory) => {
      return render_to_string(result, &factory, props, slots).await;
    }
    ComponentRef::Missing if props.get("client:only").is_none() => {
      return Err(RenderError::UnresolvedComponent { display_name: display_name.to_string() });
    }
    _ => {}
  }

  let descriptor = match component {
    ComponentRef::Tag(tag) => Value::String(tag),
    ComponentRef::Foreign(value) => value,
    _ => Value::Null,
  };
  let tag = descriptor.as_str().map(str::to_string);
  let children = render_slot(slots.remove("default"), None).await?;

  let extracted = extract_directives(&props)?;
  let mut metadata =
    ComponentMetadata { display_name: display_name.to_string(), ..ComponentMetadata::default() };
  if let Some(hydration) = &extracted.hydration {
    metadata.hydrate = Some(hydration.directive.clone());
    metadata.hydrate_args = hydration.value.clone();
    metadata.component_export = hydration.component_export.clone();
    metadata.component_url = hydration.component_url.clone();
  }
  let props = extracted.props;

  let probable = guess_renderers(metadata.component_url.as_deref());
  let renderers = &result.metadata.renderers;

  if renderers.is_empty() && tag.is_none() {
    return Err(RenderError::NoRenderersConfigured {
      display_name: display_name.to_string(),
      probable,
    });
  }

  let hydrate_only = metadata.hydrate.as_deref() == Some("only");
  let renderer = if hydrate_only {
    select_renderer_for_only(renderers, &metadata)
  } else {
    // Capability probe in registration order; first match wins.
    let mut selected = None;
    for candidate in renderers {
      let claims =
        (candidate.ssr.check)(descriptor.clone(), props.clone(), children.clone()).await?;
      if claims {
        selected = Some(candidate);
        break;
      }
    }
    selected
  };

  let mut html = String::new();
  match renderer {
    None if hydrate_only => {
      return Err(RenderError::AmbiguousOnlyHydration {
        display_name: display_name.to_string(),
        probable,
      });
    }
    None if tag.is_none() => {
      let plausible = renderers.iter().any(|r| probable.contains(&r.name));
      return Err(RenderError::NoMatchingRenderer {
        display_name: display_name.to_string(),
        probable,
        renderer_count: renderers.len(),
        plausible,
      });
    }
    None => {}
    Some(renderer) => {
      if hydrate_only {
        // Server output stays empty on purpose; only the fallback slot
        // renders before the client takes over.
        html = render_slot(slots.remove("fallback"), None).await?.unwrap_or_default();
      } else {
        let markup = (renderer.ssr.render_to_static_markup)(
          descriptor.clone(),
          props.clone(),
          children.clone(),
        )
        .await?;
        html = markup.html;
      }
    }
  }

  // A custom element without a renderer renders as a plain tag; the user
  // owns the script that defines it.
  if html.is_empty() {
    if let Some(tag) = &tag {
      let empty = serde_json::Map::new();
      let attributes = spread_attributes(props.as_object().unwrap_or(&empty));
      let child_html = children.clone().unwrap_or_default();
      html = if child_html.is_empty() && is_void_element(tag) {
        format!("<{tag}{attributes}/>")
      } else {
        format!("<{tag}{attributes}>{child_html}</{tag}>")
      };
    }
  }

  if let Some(renderer) = renderer {
    register_polyfills(result, renderer).await?;
  }

  let Some(_) = extracted.hydration else {
    return Ok(strip_fragment_markers(&html));
  };

  let renderer = renderer.ok_or_else(|| RenderError::NoMatchingRenderer {
    display_name: display_name.to_string(),
    probable: probable.clone(),
    renderer_count: renderers.len(),
    plausible: false,
  })?;

  let export = metadata.component_export.clone().ok_or_else(|| {
    RenderError::MalformedDirective {
      message: format!("{display_name} needs a client:component-export hint to hydrate on the client"),
    }
  })?;
  let url = metadata.component_url.clone().ok_or_else(|| RenderError::MalformedDirective {
    message: format!("{display_name} needs a client:component-path hint to hydrate on the client"),
  })?;

  let uid = island_id(&island_hash_input(&export, &url, &html));
  let script = generate_hydrate_script(result, renderer, &uid, &props, &metadata).await?;
  result.push_script(script);

  Ok(format!("<atoll-root uid=\"{uid}\">{html}</atoll-root>"))
}

/// Renderer pick under `client:only`, where no capability probe runs:
/// explicit name hint, then the sole registered renderer, then the source
/// file extension.
fn select_renderer_for_only<'a>(
  renderers: &'a [Renderer],
  metadata: &ComponentMetadata,
) -> Option<&'a Renderer> {
  if let Some(hint) = metadata.hydrate_args.as_str() {
    let named = renderers
      .iter()
      .find(|r| r.name == format!("{RENDERER_PREFIX}{hint}") || r.name == hint);
    if named.is_some() {
      return named;
    }
  }
  if renderers.len() == 1 {
    return renderers.first();
  }
  if let Some(extension) = metadata.component_url.as_deref().map(url_extension) {
    return renderers
      .iter()
      .find(|r| r.name == format!("{RENDERER_PREFIX}{extension}") || r.name == extension);
  }
  None
}

async fn register_polyfills(result: &SsrResult, renderer: &Renderer) -> Result<(), RenderError> {
  for specifier in &renderer.polyfills {
    let resolved = result.resolve(specifier).await?;
    let mut props = serde_json::Map::new();
    props.insert("type".into(), Value::String("module".into()));
    result.push_script(SsrElement::new(props, format!("import \"{resolved}\";")));
  }
  Ok(())
}
