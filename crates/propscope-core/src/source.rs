//! Prop sources.
//!
//! A source yields plain JSON props when resolved. Hosts with deferred props
//! (closures, lazy relationships) implement this so every measurement pass
//! performs its own resolution.

use serde_json::{Map, Value};

use crate::error::Result;

/// Decoded prop set (insertion ordered).
pub type Props = Map<String, Value>;

pub trait PropSource {
    /// Resolve into plain values. May run side effects; called once per pass.
    fn resolve(&self) -> Result<Props>;
}

impl PropSource for Props {
    fn resolve(&self) -> Result<Props> {
        Ok(self.clone())
    }
}

impl<T: PropSource + ?Sized> PropSource for &T {
    fn resolve(&self) -> Result<Props> {
        (**self).resolve()
    }
}

/// Keys of `shared` that `component` also defines, in shared order.
pub fn duplicate_keys(shared: &Props, component: &Props) -> Vec<String> {
    shared
        .keys()
        .filter(|k| component.contains_key(k.as_str()))
        .cloned()
        .collect()
}

/// Shared first, then component; component entries win on collision.
pub fn merge_props(mut shared: Props, component: Props) -> Props {
    for (k, v) in component {
        shared.insert(k, v);
    }
    shared
}

/// Result of the merged resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedProps {
    pub props: Props,
    pub duplicate_keys: Vec<String>,
}

impl MergedProps {
    /// Resolve shared then component props and merge them.
    pub fn resolve<S, C>(shared: &S, component: &C) -> Result<Self>
    where
        S: PropSource + ?Sized,
        C: PropSource + ?Sized,
    {
        let shared = shared.resolve()?;
        let component = component.resolve()?;
        let duplicate_keys = duplicate_keys(&shared, &component);
        Ok(Self {
            props: merge_props(shared, component),
            duplicate_keys,
        })
    }
}
