//! Cell renderers: app-backed cells and the boolean checkbox

use serde::Serialize;
use serde_json::Value;

use super::registry::{Application, ComponentRegistry};
use crate::grid::column::ColumnDefinition;
use crate::rules::expression::value::is_truthy;
use crate::rules::{ComponentError, Row};

/// Port that receives updated cell params
pub const REFRESH_PORT: &str = "componentRefresh";

/// Renders a cell by mounting the component named in `params.componentName`
pub struct AppRenderer {
    component_name: String,
    application: Box<dyn Application>,
}

impl AppRenderer {
    /// Mount the component with the cell params as its flags
    pub fn init(registry: &ComponentRegistry, params: &Value) -> Result<Self, ComponentError> {
        let name = component_name(params)?;
        let component = registry.require(name)?;
        let application = component.init(params)?;

        log::debug!("Mounted renderer '{}'", name);
        Ok(Self {
            component_name: name.to_string(),
            application,
        })
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Forward new params to the component. Components without a refresh
    /// port keep their state; the refresh still counts as handled.
    pub fn refresh(&mut self, params: &Value) -> bool {
        if !self.application.send(REFRESH_PORT, params.clone()) {
            log::debug!("'{}' has no {} port, refresh skipped", self.component_name, REFRESH_PORT);
        }
        true
    }
}

/// Component name from cell params
pub(crate) fn component_name(params: &Value) -> Result<&str, ComponentError> {
    params
        .get("componentName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or(ComponentError::MissingName)
}

/// Checkbox state of a boolean cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BooleanCell {
    pub checked: bool,
    pub disabled: bool,
}

impl BooleanCell {
    /// Value written back when the checkbox is clicked
    pub fn toggled(&self) -> Value {
        Value::Bool(!self.checked)
    }
}

/// Render a boolean cell; the checkbox is disabled unless the column is
/// editable for this row.
pub fn render_boolean_cell(column: &ColumnDefinition, row: &Row) -> BooleanCell {
    BooleanCell {
        checked: column.value(row).map(is_truthy).unwrap_or(false),
        disabled: !column.is_editable(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::components::registry::{Component, PortCallback};
    use crate::rules::ConfigValue;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Records everything sent to its refresh port
    struct RecordingComponent {
        name: String,
        with_refresh: bool,
        received: Arc<Mutex<Vec<Value>>>,
    }

    struct RecordingApp {
        with_refresh: bool,
        received: Arc<Mutex<Vec<Value>>>,
    }

    impl Application for RecordingApp {
        fn send(&mut self, port: &str, value: Value) -> bool {
            if port == REFRESH_PORT && self.with_refresh {
                self.received.lock().unwrap().push(value);
                true
            } else {
                false
            }
        }

        fn subscribe(&mut self, _port: &str, _callback: PortCallback) -> bool {
            false
        }
    }

    impl Component for RecordingComponent {
        fn name(&self) -> &str {
            &self.name
        }

        fn init(&self, flags: &Value) -> Result<Box<dyn Application>, ComponentError> {
            self.received.lock().unwrap().push(flags.clone());
            Ok(Box::new(RecordingApp {
                with_refresh: self.with_refresh,
                received: self.received.clone(),
            }))
        }
    }

    fn registry(with_refresh: bool) -> (ComponentRegistry, Arc<Mutex<Vec<Value>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let registry = ComponentRegistry::new();
        registry.register(Arc::new(RecordingComponent {
            name: "status".to_string(),
            with_refresh,
            received: received.clone(),
        }));
        (registry, received)
    }

    #[test]
    fn test_mount_passes_params_as_flags() {
        let (registry, received) = registry(true);
        let params = json!({"componentName": "status", "value": 3});

        let renderer = AppRenderer::init(&registry, &params).unwrap();
        assert_eq!(renderer.component_name(), "status");
        assert_eq!(received.lock().unwrap().as_slice(), &[params]);
    }

    #[test]
    fn test_refresh_through_port() {
        let (registry, received) = registry(true);
        let mut renderer =
            AppRenderer::init(&registry, &json!({"componentName": "status", "value": 1})).unwrap();

        assert!(renderer.refresh(&json!({"componentName": "status", "value": 2})));
        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[1]["value"], 2);
    }

    #[test]
    fn test_refresh_without_port_still_succeeds() {
        let (registry, received) = registry(false);
        let mut renderer = AppRenderer::init(&registry, &json!({"componentName": "status"})).unwrap();

        assert!(renderer.refresh(&json!({"value": 2})));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_or_missing_component() {
        let (registry, _) = registry(true);

        let err = AppRenderer::init(&registry, &json!({"componentName": "chart"})).err().unwrap();
        assert_eq!(err.to_string(), "Couldn't find component 'chart'. Register it before mounting.");

        let err = AppRenderer::init(&registry, &json!({"value": 1})).err().unwrap();
        assert_eq!(err, ComponentError::MissingName);
    }

    #[test]
    fn test_boolean_cell() {
        let mut column = ColumnDefinition::new("done");
        let row = Row::from_json(json!({"done": true}));

        let cell = render_boolean_cell(&column, &row);
        assert_eq!(cell, BooleanCell { checked: true, disabled: true });
        assert_eq!(cell.toggled(), json!(false));

        column.editable = ConfigValue::Literal(true);
        let cell = render_boolean_cell(&column, &Row::empty());
        assert_eq!(cell, BooleanCell { checked: false, disabled: false });
    }
}
