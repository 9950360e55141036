//! Prop bags with deferred (lazy) props.
//!
//! Lazy props are closures evaluated on every resolution, so a bag that is
//! measured resolves them once for the merged payload and once more for the
//! component-only payload.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use propscope_core::error::Result;
use propscope_core::{PropSource, Props};

pub type LazyFn = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

#[derive(Clone)]
pub enum Prop {
    Value(Value),
    Lazy(LazyFn),
}

impl Prop {
    pub fn resolve(&self) -> Result<Value> {
        match self {
            Prop::Value(v) => Ok(v.clone()),
            Prop::Lazy(f) => f(),
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Prop::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Insertion-ordered prop set; re-inserting a key replaces it in place.
#[derive(Debug, Clone, Default)]
pub struct PropBag {
    entries: Vec<(String, Prop)>,
}

impl PropBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.put(key.into(), Prop::Value(value.into()))
    }

    pub fn insert_lazy<F>(&mut self, key: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        self.put(key.into(), Prop::Lazy(Arc::new(f)))
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_lazy<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        self.insert_lazy(key, f);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, key: String, prop: Prop) -> &mut Self {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = prop,
            None => self.entries.push((key, prop)),
        }
        self
    }
}

impl PropSource for PropBag {
    fn resolve(&self) -> Result<Props> {
        let mut out = Props::new();
        for (k, p) in &self.entries {
            out.insert(k.clone(), p.resolve()?);
        }
        Ok(out)
    }
}

impl From<Props> for PropBag {
    fn from(props: Props) -> Self {
        Self {
            entries: props.into_iter().map(|(k, v)| (k, Prop::Value(v))).collect(),
        }
    }
}
