/* src/engine/src/cache.rs */

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::CacheMode;

/// Key/value store memoizing resolved module specifiers.
/// Implement this to back the cache with something durable; the engine
/// ships only the in-memory per-render backend.
pub trait SpecifierStore {
  fn get(&self, key: &str) -> Option<String>;
  fn put(&self, key: &str, value: String);
}

/// Per-render backend: a plain map that dies with the `SsrResult`.
#[derive(Default)]
pub struct MemoryStore {
  entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SpecifierStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.borrow().get(key).cloned()
  }

  fn put(&self, key: &str, value: String) {
    self.entries.borrow_mut().insert(key.to_string(), value);
  }
}

/// Cache selected by configuration: either a fresh per-render map or a
/// host-injected shared store.
pub enum SpecifierCache {
  PerRender(MemoryStore),
  Shared(Rc<dyn SpecifierStore>),
}

impl SpecifierCache {
  /// Shared mode without an injected store falls back to per-render.
  pub fn from_config(mode: CacheMode, shared: Option<Rc<dyn SpecifierStore>>) -> Self {
    match (mode, shared) {
      (CacheMode::Shared, Some(store)) => Self::Shared(store),
      _ => Self::PerRender(MemoryStore::new()),
    }
  }

  pub fn get(&self, key: &str) -> Option<String> {
    match self {
      Self::PerRender(store) => store.get(key),
      Self::Shared(store) => store.get(key),
    }
  }

  pub fn put(&self, key: &str, value: String) {
    match self {
      Self::PerRender(store) => store.put(key, value),
      Self::Shared(store) => store.put(key, value),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_store_round_trip() {
    let store = MemoryStore::new();
    assert_eq!(store.get("a"), None);
    store.put("a", "/resolved/a.js".into());
    assert_eq!(store.get("a").as_deref(), Some("/resolved/a.js"));
  }

  #[test]
  fn shared_mode_uses_injected_store() {
    let shared: Rc<dyn SpecifierStore> = Rc::new(MemoryStore::new());
    shared.put("k", "v".into());
    let cache = SpecifierCache::from_config(CacheMode::Shared, Some(Rc::clone(&shared)));
    assert_eq!(cache.get("k").as_deref(), Some("v"));
  }

  #[test]
  fn shared_mode_without_store_falls_back() {
    let cache = SpecifierCache::from_config(CacheMode::Shared, None);
    assert!(matches!(cache, SpecifierCache::PerRender(_)));
  }
}
