/* src/engine/src/page.rs */

//! Page finalization: drain the root template, deduplicate collected head
//! elements and splice them into the document.

use std::collections::HashSet;
use std::rc::Rc;

use serde_json::Value;

use atoll_markup::{SsrElement, dedup_key, render_element};

use crate::component::{ComponentFactory, Slots, render_to_string};
use crate::errors::RenderError;
use crate::hydration::HYDRATION_SCRIPT_PROP;
use crate::result::SsrResult;

/// Render a page component to a complete HTML document. The collected
/// style/script/link elements are deduplicated by content, tagged with
/// their bookkeeping props and injected before `</head>`, or prepended to
/// the document when no head closing tag exists.
pub async fn render_page(
  result: &Rc<SsrResult>,
  factory: &ComponentFactory,
  props: Value,
  slots: Slots,
) -> Result<String, RenderError> {
  let document = render_to_string(result, factory, props, slots).await?;

  // Under static builds the bundler owns component styles; the island
  // display style below is still emitted because it belongs to the
  // generated hydration scripts, not to any stylesheet module.
  let mut styles: Vec<String> = if result.metadata.static_build {
    Vec::new()
  } else {
    unique_elements(&result.styles.borrow())
      .into_iter()
      .map(|mut element| {
        element.props.insert("atoll-style".into(), Value::Bool(true));
        render_element("style", &element)
      })
      .collect()
  };

  let mut needs_island_style = false;
  let scripts: Vec<String> = unique_elements(&result.scripts.borrow())
    .into_iter()
    .enumerate()
    .map(|(index, mut element)| {
      if element.props.contains_key(HYDRATION_SCRIPT_PROP) {
        needs_island_style = true;
      }
      let id = format!("{}/script-{index}", result.metadata.pathname);
      element.props.insert("atoll-script".into(), Value::String(id));
      render_element("script", &element)
    })
    .collect();

  if needs_island_style {
    let mut props = serde_json::Map::new();
    props.insert("atoll-style".into(), Value::Bool(true));
    let island_style =
      SsrElement::new(props, "atoll-root, atoll-fragment { display: contents; }");
    styles.push(render_element("style", &island_style));
  }

  let links: Vec<String> = unique_elements(&result.links.borrow())
    .into_iter()
    .map(|element| render_element("link", &element))
    .collect();

  let mut injected = String::new();
  for rendered in links.iter().chain(styles.iter()).chain(scripts.iter()) {
    injected.push_str(rendered);
    injected.push('\n');
  }
  if injected.is_empty() {
    return Ok(document);
  }

  match document.find("</head>") {
    Some(position) => {
      let mut page = String::with_capacity(document.len() + injected.len());
      page.push_str(&document[..position]);
      page.push_str(&injected);
      page.push_str(&document[position..]);
      Ok(page)
    }
    None => Ok(format!("{injected}{document}")),
  }
}

/// Collapse content-identical elements, keeping first-insertion order.
fn unique_elements(elements: &[SsrElement]) -> Vec<SsrElement> {
  let mut seen = HashSet::new();
  elements.iter().filter(|element| seen.insert(dedup_key(element))).cloned().collect()
}
