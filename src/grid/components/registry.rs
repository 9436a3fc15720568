// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::rules::ComponentError;

/// Callback attached to an outgoing application port
pub type PortCallback = Box<dyn FnMut(Value) + Send>;

/// An embeddable mini application that cells can mount by name.
pub trait Component: Send + Sync {
    /// Name the component is registered under
    fn name(&self) -> &str;

    /// Start a new instance; `flags` are the cell params
    fn init(&self, flags: &Value) -> Result<Box<dyn Application>, ComponentError>;
}

/// A running component instance, talking through named ports
pub trait Application: Send {
    /// Send a value into an incoming port; false if the port does not exist
    fn send(&mut self, port: &str, value: Value) -> bool;

    /// Listen on an outgoing port; false if the port does not exist
    fn subscribe(&mut self, port: &str, callback: PortCallback) -> bool;
}

#[derive(Clone)]
pub struct ComponentRegistry {
    components: Arc<RwLock<HashMap<String, Arc<dyn Component>>>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            components: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn register(&self, component: Arc<dyn Component>) {
        let mut components = self
            .components
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        log::debug!("Registered component '{}'", component.name());
        components.insert(component.name().to_string(), component);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        let components = self
            .components
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        components.get(name).cloned()
    }

    /// Like [`get`](Self::get), but a missing component is an error
    pub fn require(&self, name: &str) -> Result<Arc<dyn Component>, ComponentError> {
        self.get(name).ok_or_else(|| ComponentError::NotFound {
            name: name.to_string(),
        })
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let components = self
            .components
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = components.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
