//! Cell editors

use serde_json::Value;
use std::sync::{Arc, Mutex};

use super::registry::{Application, ComponentRegistry};
use super::renderer::component_name;
use crate::rules::ComponentError;

/// Port on which a component reports its current value
pub const CURRENT_VALUE_PORT: &str = "currentValue";

/// What the grid asks of an editor once editing ends
pub trait CellEditor {
    /// Value written back to the cell
    fn get_value(&self) -> Value;

    /// Whether the editor floats above the cell
    fn is_popup(&self) -> bool {
        false
    }
}

/// Edits a cell by mounting the component named in `params.componentName`.
///
/// The value starts as `params.value` and follows whatever the component
/// publishes on its `currentValue` port.
pub struct AppEditor {
    component_name: String,
    current_value: Arc<Mutex<Value>>,
    // kept alive for the subscription
    _application: Box<dyn Application>,
}

impl AppEditor {
    pub fn init(registry: &ComponentRegistry, params: &Value) -> Result<Self, ComponentError> {
        let name = component_name(params)?;
        let component = registry.require(name)?;
        let mut application = component.init(params)?;

        let initial = params.get("value").cloned().unwrap_or(Value::Null);
        let current_value = Arc::new(Mutex::new(initial));

        let shared = current_value.clone();
        let subscribed = application.subscribe(
            CURRENT_VALUE_PORT,
            Box::new(move |value| {
                *shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
            }),
        );
        if !subscribed {
            log::debug!("'{}' has no {} port, value stays fixed", name, CURRENT_VALUE_PORT);
        }

        Ok(Self {
            component_name: name.to_string(),
            current_value,
            _application: application,
        })
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }
}

impl CellEditor for AppEditor {
    fn get_value(&self) -> Value {
        self.current_value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn is_popup(&self) -> bool {
        true
    }
}

/// Editor for boolean cells. The checkbox renderer already wrote the
/// new value, so the editor keeps it and stops immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanEditor {
    value: Value,
}

impl BooleanEditor {
    pub fn init(params: &Value) -> Self {
        Self {
            value: params.get("value").cloned().unwrap_or(Value::Null),
        }
    }

    /// Editing ends as soon as it starts
    pub fn stops_editing(&self) -> bool {
        true
    }
}

impl CellEditor for BooleanEditor {
    fn get_value(&self) -> Value {
        self.value.clone()
    }

    fn is_popup(&self) -> bool {
        true
    }
}
