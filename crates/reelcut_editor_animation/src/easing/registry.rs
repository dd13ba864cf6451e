// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry resolving easing keys to fresh strategy instances.

use super::bezier::CUBIC_BEZIER_KEY;
use super::{CubicBezierEasing, Curve, Easing, EasingDescriptor, StandardEasing};
use crate::error::{Result, TrackError};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Builds a new easing instance
pub type EasingFactory = Arc<dyn Fn() -> Box<dyn Easing> + Send + Sync>;

/// Maps stable keys to easing factories, in registration order.
///
/// The first registered entry is the fallback used when persisted data
/// names a key this registry does not know.
#[derive(Clone, Default)]
pub struct EasingRegistry {
    factories: IndexMap<String, EasingFactory>,
}

impl EasingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in strategy
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for curve in Curve::ALL {
            registry.register(curve.name(), move || Box::new(StandardEasing::new(curve)));
        }
        registry.register(CUBIC_BEZIER_KEY, || Box::new(CubicBezierEasing::default()));
        registry
    }

    /// Register a factory under `key`, replacing any previous entry
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Easing> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.factories.insert(key.clone(), Arc::new(factory)).is_some() {
            tracing::warn!("Easing {key} registered twice; keeping the newest factory");
        }
    }

    /// Build a fresh instance for `key`
    pub fn create(&self, key: &str) -> Result<Box<dyn Easing>> {
        self.factories
            .get(key)
            .map(|factory| factory())
            .ok_or_else(|| TrackError::EasingNotFound(key.to_string()))
    }

    /// Build a shareable instance for `key`
    pub fn resolve(&self, key: &str) -> Result<Arc<dyn Easing>> {
        self.create(key).map(Arc::from)
    }

    /// Rebuild an instance from a descriptor, parameters included
    pub fn restore(&self, descriptor: &EasingDescriptor) -> Result<Arc<dyn Easing>> {
        let mut easing = self.create(&descriptor.key)?;
        easing.restore(&descriptor.parameters)?;
        Ok(Arc::from(easing))
    }

    /// Instance of the first registered strategy
    pub fn fallback(&self) -> Option<Arc<dyn Easing>> {
        self.factories
            .first()
            .map(|(_, factory)| Arc::from(factory()))
    }

    /// Whether `key` is registered
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for EasingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EasingRegistry")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
