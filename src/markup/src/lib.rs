/* src/markup/src/lib.rs */

pub mod attributes;
pub mod element;
pub mod escape;
pub mod vars;

// Public API re-exports
pub use attributes::{
  add_attribute, is_void_element, serialize_list_value, spread_attributes, stringify,
};
pub use element::{SsrElement, dedup_key, render_element};
pub use escape::{escape_attribute, escape_html};
pub use vars::{define_script_vars, define_style_vars};
