// SPDX-License-Identifier: MIT

//! Attribute mirroring for the grid element
//!
//! HTML attribute names arrive lowercased (`rowdata`), while the wrapped
//! grid expects its camelCase property names (`rowData`). Values are JSON.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use super::definition::ElementSettings;
use crate::rules::expression::value::is_truthy;
use crate::rules::CellruleError;

/// Properties handled by the element itself rather than the grid
pub const ELEMENT_PROPERTIES: [&str; 2] = ["disableResizeOnScroll", "sizeToFitAfterFirstDataRendered"];

/// Grid property that is set programmatically, never as an attribute
const GRID_OPTIONS: &str = "gridOptions";

/// A property change forwarded to an initialised grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    pub property: String,
    pub current_value: Value,
}

/// What an attribute change requires of the host
#[derive(Debug, Clone, PartialEq)]
pub enum ElementChange {
    /// Stored until the grid is initialised
    Stored,
    /// Forward to the running grid
    Property(PropertyChange),
    /// An element property changed; rebuild the grid configuration
    Reprocess,
}

/// An event re-dispatched by the element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEvent {
    /// DOM event name (lowercased grid event type)
    pub name: String,
    /// Name of the `on...` handler property
    pub callback: String,
}

#[derive(Debug, Clone)]
pub struct GridElement {
    observed: Vec<String>,
    property_map: HashMap<String, String>,
    attributes: BTreeMap<String, Value>,
    initialised: bool,
}

impl GridElement {
    /// Observe the given grid properties plus the element properties
    pub fn new<I, S>(grid_properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let observed: Vec<String> = grid_properties
            .into_iter()
            .map(Into::into)
            .filter(|p| p != GRID_OPTIONS)
            .chain(ELEMENT_PROPERTIES.iter().map(|p| p.to_string()))
            .collect();

        let property_map = observed
            .iter()
            .map(|p| (p.to_lowercase(), p.clone()))
            .collect();

        Self {
            observed,
            property_map,
            attributes: BTreeMap::new(),
            initialised: false,
        }
    }

    /// Attribute names to observe, lowercased
    pub fn observed_attributes(&self) -> Vec<String> {
        self.observed.iter().map(|p| p.to_lowercase()).collect()
    }

    /// Canonical property for an attribute name, in any case
    pub fn property_name(&self, attribute: &str) -> Option<&str> {
        self.property_map
            .get(&attribute.to_lowercase())
            .map(String::as_str)
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Record an attribute change. Absent or empty values become null.
    pub fn attribute_changed(&mut self, name: &str, new_value: Option<&str>) -> Result<ElementChange, CellruleError> {
        let property = self
            .property_name(name)
            .ok_or_else(|| CellruleError::config(format!("Unknown attribute: {}", name)))?
            .to_string();

        let parsed = match new_value {
            None | Some("") => Value::Null,
            Some(raw) => serde_json::from_str(raw)?,
        };

        let is_element_property = ELEMENT_PROPERTIES.contains(&property.as_str());
        self.attributes.insert(property.clone(), parsed.clone());

        if is_element_property {
            return Ok(ElementChange::Reprocess);
        }
        if !self.initialised {
            return Ok(ElementChange::Stored);
        }

        log::debug!("Forwarding change of '{}'", property);
        Ok(ElementChange::Property(PropertyChange {
            property,
            current_value: parsed,
        }))
    }

    /// Hand the stored attributes to the grid; later changes are forwarded.
    /// Calling it again returns the current attributes.
    pub fn initialise(&mut self) -> &BTreeMap<String, Value> {
        self.initialised = true;
        &self.attributes
    }

    pub fn attribute(&self, property: &str) -> Option<&Value> {
        self.attributes.get(property)
    }

    /// Element properties as currently set
    pub fn settings(&self) -> ElementSettings {
        ElementSettings {
            size_to_fit_after_first_data_rendered: self.flag("sizeToFitAfterFirstDataRendered"),
            disable_resize_on_scroll: self.flag("disableResizeOnScroll"),
        }
    }

    /// Apply settings from a grid definition as if set by attributes
    pub fn apply_settings(&mut self, settings: &ElementSettings) {
        self.attributes.insert(
            "sizeToFitAfterFirstDataRendered".to_string(),
            Value::Bool(settings.size_to_fit_after_first_data_rendered),
        );
        self.attributes.insert(
            "disableResizeOnScroll".to_string(),
            Value::Bool(settings.disable_resize_on_scroll),
        );
    }

    /// Whether columns are sized to fit once the first data is rendered
    pub fn size_to_fit_on_first_data(&self) -> bool {
        self.settings().size_to_fit_after_first_data_rendered
    }

    /// Whether columns are sized to fit when the body scrolls
    pub fn size_to_fit_on_scroll(&self) -> bool {
        !self.settings().disable_resize_on_scroll
    }

    fn flag(&self, property: &str) -> bool {
        self.attributes.get(property).map(is_truthy).unwrap_or(false)
    }
}

/// Handler property for a grid event, e.g. `oncolumnresized`
pub fn event_callback_name(event_type: &str) -> String {
    format!("on{}", event_type.to_lowercase())
}

/// Re-dispatch a grid event as an element event
pub fn dispatch_event(event_type: &str) -> ElementEvent {
    ElementEvent {
        name: event_type.to_lowercase(),
        callback: event_callback_name(event_type),
    }
}
