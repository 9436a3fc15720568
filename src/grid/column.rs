// SPDX-License-Identifier: MIT

//! Column definitions and the per-cell predicates they drive

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::decimal::DecimalSettings;
use super::filter::comparator::date_time_comparator;
use crate::rules::expression::value::{sort_order, to_display_string};
use crate::rules::{ConfigValue, Row};

/// Class name → rule. Every rule is checked; all truthy ones apply.
pub type ClassRules = BTreeMap<String, ConfigValue<bool>>;

/// A column of the grid
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnDefinition {
    /// Row field shown in this column
    pub field: String,
    /// Header label (defaults to the field name)
    pub header_name: Option<String>,
    /// Literal or per-row expression; not editable unless configured
    #[serde(default)]
    pub editable: ConfigValue<bool>,
    /// CSS classes applied to the cell when their rule holds
    #[serde(default)]
    pub cell_class_rules: ClassRules,
    /// App component mounted as cell renderer
    pub renderer: Option<ComponentSpec>,
    /// App component mounted as cell editor
    pub editor: Option<ComponentSpec>,
    /// Column filter
    pub filter: Option<FilterSpec>,
    /// Sort comparator (value ordering when absent)
    pub comparator: Option<ComparatorKind>,
    /// Locale-aware decimal input
    pub decimal: Option<DecimalSettings>,
}

/// Reference to a registered app component plus its extra params
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ComponentSpec {
    pub component_name: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Supported column filters
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSpec {
    /// Pass rows whose date ranges contain the filter date.
    ///
    /// Ranges are read from `range_field` when set (a list of
    /// `[from, to]` pairs), otherwise from the column's own value.
    DateRange {
        #[serde(default)]
        range_field: Option<String>,
    },
}

/// Supported sort comparators
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorKind {
    /// Order by the first date of a date range string
    DateTime,
}

impl ColumnDefinition {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_name: None,
            editable: ConfigValue::default(),
            cell_class_rules: ClassRules::new(),
            renderer: None,
            editor: None,
            filter: None,
            comparator: None,
            decimal: None,
        }
    }

    /// Header label
    pub fn header(&self) -> &str {
        self.header_name.as_deref().unwrap_or(&self.field)
    }

    /// This column's value in a row
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        row.get(&self.field)
    }

    /// Whether the cell may be edited for this row
    pub fn is_editable(&self, row: &Row) -> bool {
        self.editable
            .resolve_or(row, false, &format!("editable({})", self.field))
    }

    /// CSS classes for this column's cell in a row
    pub fn cell_classes(&self, row: &Row) -> Vec<String> {
        apply_class_rules(&self.cell_class_rules, row, &self.field)
    }

    /// Sort order of two rows by this column. Total over mixed cell types,
    /// so it is safe to hand to `sort_by`.
    pub fn compare_rows(&self, a: &Row, b: &Row) -> Ordering {
        let null = Value::Null;
        let left = self.value(a).unwrap_or(&null);
        let right = self.value(b).unwrap_or(&null);

        match self.comparator {
            Some(ComparatorKind::DateTime) => {
                date_time_comparator(&to_display_string(left), &to_display_string(right))
            }
            None => sort_order(left, right),
        }
    }
}

/// Classes whose rules hold for the row, in class-name order.
/// A rule that fails to evaluate counts as false.
pub fn apply_class_rules(rules: &ClassRules, row: &Row, context: &str) -> Vec<String> {
    rules
        .iter()
        .filter(|(class, rule)| rule.resolve_or(row, false, &format!("{}.{}", context, class)))
        .map(|(class, _)| class.clone())
        .collect()
}
