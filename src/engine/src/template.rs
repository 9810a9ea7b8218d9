/* src/engine/src/template.rs */

//! Template composition: a component's render output is an interleaved
//! sequence of static HTML fragments and dynamic expressions. Construction
//! is cheap and side-effect free; all resolution is deferred to the drain.

use std::future::Future;
use std::rc::Rc;

use futures_util::future::try_join_all;
use serde_json::Value;

use crate::LocalBoxFuture;
use crate::errors::RenderError;

pub type ThunkFn = Rc<dyn Fn() -> Expr>;

/// A dynamic expression slot inside a template.
///
/// Every shape a template slot can take is an explicit variant. `Deferred`
/// owns its future, so a one-shot awaitable can only ever be consumed once.
pub enum Expr {
  /// A leaf value: strings pass through, `null`/`false` vanish, numbers
  /// (including zero) and everything else stringify.
  Value(Value),
  /// Elements resolve concurrently but concatenate in index order.
  List(Vec<Expr>),
  /// A nested composition, drained in place.
  Template(Template),
  /// A deferred callable, invoked with no arguments at resolve time.
  Thunk(ThunkFn),
  /// An awaitable expression (e.g. a child component render in flight).
  Deferred(LocalBoxFuture<Result<Expr, RenderError>>),
}

impl Expr {
  pub fn deferred<F>(future: F) -> Self
  where
    F: Future<Output = Result<Expr, RenderError>> + 'static,
  {
    Expr::Deferred(Box::pin(future))
  }

  pub fn thunk<F>(f: F) -> Self
  where
    F: Fn() -> Expr + 'static,
  {
    Expr::Thunk(Rc::new(f))
  }
}

impl From<Value> for Expr {
  fn from(value: Value) -> Self {
    Expr::Value(value)
  }
}

impl From<&str> for Expr {
  fn from(value: &str) -> Self {
    Expr::Value(Value::String(value.to_string()))
  }
}

impl From<String> for Expr {
  fn from(value: String) -> Self {
    Expr::Value(Value::String(value))
  }
}

impl From<Template> for Expr {
  fn from(value: Template) -> Self {
    Expr::Template(value)
  }
}

impl From<i64> for Expr {
  fn from(value: i64) -> Self {
    Expr::Value(Value::from(value))
  }
}

impl From<bool> for Expr {
  fn from(value: bool) -> Self {
    Expr::Value(Value::Bool(value))
  }
}

/// Render output of one component: fragments and expressions interleaved
/// in source order (fragment 0, expr 0, fragment 1, expr 1, ...).
/// Immutable once constructed; draining consumes it.
pub struct Template {
  fragments: Vec<String>,
  expressions: Vec<Expr>,
}

impl Template {
  /// Fragments are padded with empty strings until there is one more
  /// fragment than expressions, so interleaving always lines up.
  pub fn new(fragments: Vec<String>, expressions: Vec<Expr>) -> Self {
    let mut fragments = fragments;
    while fragments.len() < expressions.len() + 1 {
      fragments.push(String::new());
    }
    Self { fragments, expressions }
  }
}

/// Convenience constructor mirroring the compiler's tagged-template call.
pub fn template(fragments: &[&str], expressions: Vec<Expr>) -> Template {
  Template::new(fragments.iter().map(|f| (*f).to_string()).collect(), expressions)
}

/// Resolve one expression to its string contribution.
///
/// Resolution order: await deferred values, call thunks, drain nested
/// templates, fan out lists (concurrently, concatenated in index order),
/// then apply the leaf rule: strings pass through, `null`/`false` produce
/// nothing, numeric zero produces `"0"`, everything else stringifies.
pub fn resolve_expr(expr: Expr) -> LocalBoxFuture<Result<String, RenderError>> {
  Box::pin(async move {
    match expr {
      Expr::Deferred(future) => resolve_expr(future.await?).await,
      Expr::Thunk(f) => resolve_expr(f()).await,
      Expr::Template(t) => render_template(t).await,
      Expr::List(items) => {
        let resolved = try_join_all(items.into_iter().map(resolve_expr)).await?;
        Ok(resolved.concat())
      }
      Expr::Value(Value::Array(items)) => {
        let items = items.into_iter().map(Expr::Value).collect();
        resolve_expr(Expr::List(items)).await
      }
      Expr::Value(Value::String(s)) => Ok(s),
      Expr::Value(Value::Null) | Expr::Value(Value::Bool(false)) => Ok(String::new()),
      Expr::Value(other) => Ok(atoll_markup::attributes::stringify(&other)),
    }
  })
}

/// Drain a template into one string, strictly left to right.
pub fn render_template(template: Template) -> LocalBoxFuture<Result<String, RenderError>> {
  Box::pin(async move {
    let Template { fragments, expressions } = template;
    let mut out = String::new();
    let mut fragments = fragments.into_iter();

    for expr in expressions {
      if let Some(fragment) = fragments.next() {
        out.push_str(&fragment);
      }
      out.push_str(&resolve_expr(expr).await?);
    }
    for fragment in fragments {
      out.push_str(&fragment);
    }
    Ok(out)
  })
}
