/* src/engine/src/lib.rs */

pub mod cache;
pub mod canonical;
pub mod component;
pub mod config;
pub mod content;
pub mod errors;
pub mod hydration;
pub mod page;
pub mod renderer;
pub mod result;
pub mod template;

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by the engine's hook types. The render flow is
/// single-threaded cooperative (one page render per task, shared state in
/// `Rc`/`RefCell`), so these futures carry no `Send` bound.
pub type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

// Public API re-exports
pub use cache::{MemoryStore, SpecifierCache, SpecifierStore};
pub use canonical::{canonical_url, extname, is_css_request};
pub use component::{
  ComponentFactory, ComponentRef, Slots, render_component, render_slot, render_to_string,
};
pub use config::{CacheMode, SsrConfig};
pub use content::{ContentEntry, ContentModule, fetch_content};
pub use errors::{RenderError, format_list};
pub use hydration::{ComponentMetadata, HydrationDirective, extract_directives, island_id};
pub use page::render_page;
pub use renderer::{Renderer, SsrHooks, StaticMarkup, guess_renderers};
pub use result::{
  ComponentGlobal, CreateResultArgs, PageGlobal, RequestInfo, ResolveFn, SsrResult, create_result,
};
pub use template::{Expr, Template, render_template, resolve_expr, template};
