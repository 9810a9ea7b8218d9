/* src/engine/src/errors.rs */

use thiserror::Error;

use crate::renderer::short_renderer_name;

/// Errors raised while rendering a page. All of them are fatal to the
/// current render: the caller discards the in-flight result, nothing is
/// retried internally.
#[derive(Debug, Error)]
pub enum RenderError {
  /// Component reference resolved to nothing and no client-only fallback
  /// was requested.
  #[error(
    "Unable to render {display_name} because it is missing!\nDid you forget to import the component, or is there a typo?"
  )]
  UnresolvedComponent { display_name: String },

  /// Host configured zero renderers but a non-string component was used.
  #[error(
    "Unable to render {display_name}!\n\nThere are no renderers configured.\nDid you mean to enable {}?",
    format_list_quoted(.probable)
  )]
  NoRenderersConfigured { display_name: String, probable: Vec<String> },

  /// `client:only` was requested but no renderer could be determined even
  /// with the naming heuristics.
  #[error(
    "Unable to render {display_name}!\n\nThe client:only hydration strategy needs a hint to pick the correct renderer.\nDid you mean to pass <{display_name} client:only=\"{}\" />?",
    only_hint(.probable)
  )]
  AmbiguousOnlyHydration { display_name: String, probable: Vec<String> },

  /// Renderers exist but none accepted the component. `plausible` records
  /// whether any configured renderer matched the extension guess, which
  /// changes the message from "enable one of these" to "your component
  /// failed at runtime".
  #[error("{}", no_matching_renderer_message(.display_name, .probable, *.renderer_count, *.plausible))]
  NoMatchingRenderer {
    display_name: String,
    probable: Vec<String>,
    renderer_count: usize,
    plausible: bool,
  },

  /// A content enumeration yielded no entries.
  #[error("[{pathname}] fetch_content() found no matches.")]
  ContentFetchEmpty { pathname: String },

  /// A `client:*` directive is present but unusable as written.
  #[error("{message}")]
  MalformedDirective { message: String },

  /// Failure raised inside a renderer plugin or component factory body.
  /// Propagated unchanged through the whole composition chain.
  #[error("{0}")]
  Plugin(String),

  /// The host resolve capability failed for a module specifier.
  #[error("{0}")]
  Resolve(String),
}

/// Human list formatting: "a", "a or b", "a, b or c".
pub fn format_list(values: &[String]) -> String {
  match values {
    [] => String::new(),
    [one] => one.clone(),
    _ => {
      let (last, rest) = values.split_last().expect("len >= 2");
      format!("{} or {}", rest.join(", "), last)
    }
  }
}

fn format_list_quoted(values: &[String]) -> String {
  let quoted: Vec<String> = values.iter().map(|v| format!("`{v}`")).collect();
  format_list(&quoted)
}

fn only_hint(values: &[String]) -> String {
  values.iter().map(|v| short_renderer_name(v)).collect::<Vec<_>>().join("|")
}

fn no_matching_renderer_message(
  display_name: &str,
  probable: &[String],
  renderer_count: usize,
  plausible: bool,
) -> String {
  if plausible {
    format!(
      "Unable to render {display_name}!\n\n\
       This component likely uses {},\n\
       but the engine hit an error during server-side rendering.\n\n\
       Please ensure that {display_name}:\n\
       1. Does not unconditionally access browser-specific globals like `window` or `document`.\n   \
       If this is unavoidable, use the `client:only` hydration directive.\n\
       2. Does not conditionally return `null` or `undefined` when rendered on the server.",
      format_list(probable)
    )
  } else {
    let plural = renderer_count > 1;
    format!(
      "Unable to render {display_name}!\n\n\
       There {} {renderer_count} renderer{} configured,\n\
       but {} able to server-side render {display_name}.\n\n\
       Did you mean to enable {}?",
      if plural { "are" } else { "is" },
      if plural { "s" } else { "" },
      if plural { "none were" } else { "it was not" },
      format_list_quoted(probable)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
  }

  #[test]
  fn format_list_shapes() {
    assert_eq!(format_list(&names(&["a"])), "a");
    assert_eq!(format_list(&names(&["a", "b"])), "a or b");
    assert_eq!(format_list(&names(&["a", "b", "c"])), "a, b or c");
  }

  #[test]
  fn unresolved_names_the_component() {
    let err = RenderError::UnresolvedComponent { display_name: "Counter".into() };
    assert!(err.to_string().contains("Unable to render Counter"));
  }

  #[test]
  fn no_renderers_suggests_probable() {
    let err = RenderError::NoRenderersConfigured {
      display_name: "Counter".into(),
      probable: names(&["@atoll/renderer-react", "@atoll/renderer-preact"]),
    };
    let msg = err.to_string();
    assert!(msg.contains("no renderers configured"));
    assert!(msg.contains("`@atoll/renderer-react` or `@atoll/renderer-preact`"));
  }

  #[test]
  fn only_hint_strips_prefix() {
    let err = RenderError::AmbiguousOnlyHydration {
      display_name: "Clock".into(),
      probable: names(&["@atoll/renderer-react", "@atoll/renderer-vue"]),
    };
    assert!(err.to_string().contains("client:only=\"react|vue\""));
  }

  #[test]
  fn no_match_distinguishes_declined_from_missing() {
    let missing = RenderError::NoMatchingRenderer {
      display_name: "Chart".into(),
      probable: names(&["@atoll/renderer-svelte"]),
      renderer_count: 1,
      plausible: false,
    };
    assert!(missing.to_string().contains("it was not"));
    assert!(missing.to_string().contains("Did you mean to enable"));

    let declined = RenderError::NoMatchingRenderer {
      display_name: "Chart".into(),
      probable: names(&["@atoll/renderer-svelte"]),
      renderer_count: 2,
      plausible: true,
    };
    assert!(declined.to_string().contains("browser-specific globals"));
  }
}
