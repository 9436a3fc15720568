//! Context-menu items gated per row

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::{ConfigValue, Row};

/// One entry of the configured context menu
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MenuEntry {
    /// A grid built-in, passed through by name (`copy`, `separator`, ...)
    BuiltIn(String),
    Item(MenuItem),
}

// Dispatch on shape so an item's own error (a bad `disabled` rule, say)
// reaches the caller instead of a generic untagged mismatch.
impl<'de> Deserialize<'de> for MenuEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(MenuEntry::BuiltIn(name)),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(MenuEntry::Item)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "menu entry must be a name or an item, got {}",
                other
            ))),
        }
    }
}

/// A custom context-menu item
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuItem {
    pub name: String,
    /// Action identifier handed back to the host when the item is chosen
    pub action: Option<String>,
    #[serde(default)]
    pub disabled: ConfigValue<bool>,
    #[serde(default)]
    pub css_classes: Vec<String>,
}

/// A menu entry after its rules were resolved for one row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedMenuEntry {
    BuiltIn(String),
    Item {
        name: String,
        action: Option<String>,
        disabled: bool,
        #[serde(rename = "cssClasses", skip_serializing_if = "Vec::is_empty")]
        css_classes: Vec<String>,
    },
}

impl MenuItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: None,
            disabled: ConfigValue::default(),
            css_classes: Vec::new(),
        }
    }

    /// Whether the item is greyed out for this row. Enabled unless configured.
    pub fn is_disabled(&self, row: &Row) -> bool {
        self.disabled
            .resolve_or(row, false, &format!("menu({}).disabled", self.name))
    }
}

impl MenuEntry {
    pub fn resolve(&self, row: &Row) -> ResolvedMenuEntry {
        match self {
            MenuEntry::BuiltIn(name) => ResolvedMenuEntry::BuiltIn(name.clone()),
            MenuEntry::Item(item) => ResolvedMenuEntry::Item {
                name: item.name.clone(),
                action: item.action.clone(),
                disabled: item.is_disabled(row),
                css_classes: item.css_classes.clone(),
            },
        }
    }
}

impl ResolvedMenuEntry {
    pub fn name(&self) -> &str {
        match self {
            ResolvedMenuEntry::BuiltIn(name) => name,
            ResolvedMenuEntry::Item { name, .. } => name,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, ResolvedMenuEntry::Item { disabled: true, .. })
    }
}

/// Resolve every entry of a menu for one row
pub fn build_menu(entries: &[MenuEntry], row: &Row) -> Vec<ResolvedMenuEntry> {
    entries.iter().map(|entry| entry.resolve(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn menu() -> Vec<MenuEntry> {
        let yaml = r#"
- copy
- separator
- name: Delete
  action: delete_row
  disabled:
    type: operator
    value: "=="
    body:
      left: { type: value, value: locked }
      right: { type: literal, value: true }
- name: Archive
  disabled: false
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_builtin_entries_pass_through() {
        let resolved = build_menu(&menu(), &Row::empty());
        assert_eq!(resolved[0], ResolvedMenuEntry::BuiltIn("copy".to_string()));
        assert_eq!(resolved[1].name(), "separator");
        assert!(!resolved[1].is_disabled());
    }

    #[test]
    fn test_item_gated_by_row() {
        let locked = Row::from_json(json!({"locked": true}));
        let unlocked = Row::from_json(json!({"locked": false}));

        let resolved = build_menu(&menu(), &locked);
        assert!(resolved[2].is_disabled());
        assert!(!resolved[3].is_disabled());

        let resolved = build_menu(&menu(), &unlocked);
        assert!(!resolved[2].is_disabled());
    }

    #[test]
    fn test_missing_field_leaves_item_enabled() {
        let resolved = build_menu(&menu(), &Row::empty());
        assert_eq!(
            resolved[2],
            ResolvedMenuEntry::Item {
                name: "Delete".to_string(),
                action: Some("delete_row".to_string()),
                disabled: false,
                css_classes: vec![],
            }
        );
    }

    #[test]
    fn test_default_enabled() {
        assert!(!MenuItem::new("Open").is_disabled(&Row::empty()));
    }

    #[test]
    fn test_resolved_serializes_flat() {
        let resolved = build_menu(&menu(), &Row::from_json(json!({"locked": true})));
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json[0], "copy");
        assert_eq!(json[2]["name"], "Delete");
        assert_eq!(json[2]["disabled"], true);
        assert!(json[2].get("cssClasses").is_none());
    }

    #[test]
    fn test_entry_of_wrong_shape_is_error() {
        let err = serde_yaml::from_str::<Vec<MenuEntry>>("- 42").unwrap_err();
        assert!(err.to_string().contains("menu entry must be a name or an item"));
    }
}
