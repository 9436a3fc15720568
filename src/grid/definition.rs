// SPDX-License-Identifier: MIT

//! Grid definition: columns, row rules, context menu and element settings

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::column::{apply_class_rules, ClassRules, ColumnDefinition, FilterSpec};
use super::decimal::MAX_DECIMAL_PLACES;
use super::filter::DateRangeFilter;
use super::menu::{build_menu, MenuEntry, ResolvedMenuEntry};
use crate::rules::{CellruleError, Row};

/// Declarative grid configuration as loaded from YAML or JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GridDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub columns: Vec<ColumnDefinition>,
    /// CSS classes applied to the whole row when their rule holds
    #[serde(default)]
    pub row_class_rules: ClassRules,
    #[serde(default)]
    pub context_menu: Vec<MenuEntry>,
    #[serde(default)]
    pub settings: ElementSettings,
}

/// Properties owned by the element rather than the wrapped grid
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ElementSettings {
    #[serde(default)]
    pub size_to_fit_after_first_data_rendered: bool,
    #[serde(default)]
    pub disable_resize_on_scroll: bool,
}

/// Everything the rules decide for a single row
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RowReport {
    pub editable: Vec<String>,
    pub cell_classes: BTreeMap<String, Vec<String>>,
    pub row_classes: Vec<String>,
    pub disabled_menu_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passes_filter: Option<bool>,
}

impl GridDefinition {
    /// Look up a column by field
    pub fn column(&self, field: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Row-level CSS classes
    pub fn row_classes(&self, row: &Row) -> Vec<String> {
        apply_class_rules(&self.row_class_rules, row, "row")
    }

    /// Context menu as shown for this row
    pub fn menu_for(&self, row: &Row) -> Vec<ResolvedMenuEntry> {
        build_menu(&self.context_menu, row)
    }

    /// Fields of the columns editable for this row
    pub fn editable_columns(&self, row: &Row) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_editable(row))
            .map(|c| c.field.as_str())
            .collect()
    }

    /// The first column carrying a date-range filter, as a filter instance
    pub fn date_filter(&self) -> Option<DateRangeFilter> {
        self.columns.iter().find_map(DateRangeFilter::for_column)
    }

    /// Apply every rule of the grid to one row
    pub fn report(&self, row: &Row, filter: Option<&DateRangeFilter>) -> RowReport {
        let cell_classes = self
            .columns
            .iter()
            .map(|c| (c.field.clone(), c.cell_classes(row)))
            .filter(|(_, classes)| !classes.is_empty())
            .collect();

        let disabled_menu_items = self
            .menu_for(row)
            .iter()
            .filter(|entry| entry.is_disabled())
            .map(|entry| entry.name().to_string())
            .collect();

        RowReport {
            editable: self
                .editable_columns(row)
                .into_iter()
                .map(String::from)
                .collect(),
            cell_classes,
            row_classes: self.row_classes(row),
            disabled_menu_items,
            passes_filter: filter
                .filter(|f| f.is_filter_active())
                .map(|f| f.does_filter_pass(row)),
        }
    }

    /// Sort rows in place by a column, using its comparator
    pub fn sort_rows(&self, rows: &mut [Row], field: &str, descending: bool) -> Result<(), CellruleError> {
        let column = self
            .column(field)
            .ok_or_else(|| CellruleError::config(format!("Unknown sort column: {}", field)))?;

        rows.sort_by(|a, b| {
            let ordering = column.compare_rows(a, b);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        Ok(())
    }

    /// Check the definition for problems that deserialization cannot catch.
    /// Returns one message per problem; empty when the grid is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("Grid name must not be empty".to_string());
        }
        if self.columns.is_empty() {
            problems.push("Grid has no columns".to_string());
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.field.is_empty() {
                problems.push("Column with empty field".to_string());
            }
            if !seen.insert(column.field.as_str()) {
                problems.push(format!("Duplicate column field: {}", column.field));
            }

            if let Some(decimal) = &column.decimal {
                if decimal.decimal_places > MAX_DECIMAL_PLACES {
                    problems.push(format!(
                        "Column {}: decimal_places {} exceeds {}",
                        column.field, decimal.decimal_places, MAX_DECIMAL_PLACES
                    ));
                }
            }

            for component in [&column.renderer, &column.editor].into_iter().flatten() {
                if component.component_name.trim().is_empty() {
                    problems.push(format!("Column {}: component name is empty", column.field));
                }
            }
        }

        // a range field must point at a column the grid knows
        for column in &self.columns {
            if let Some(FilterSpec::DateRange {
                range_field: Some(range_field),
            }) = &column.filter
            {
                if !seen.contains(range_field.as_str()) {
                    problems.push(format!(
                        "Column {}: filter range field {} is not a column",
                        column.field, range_field
                    ));
                }
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders_grid() -> GridDefinition {
        let yaml = r#"
name: orders
description: Open orders
columns:
  - field: id
  - field: amount
    editable:
      type: operator
      value: "!"
      body: { type: value, value: locked }
    decimal:
      country_code: de-DE
      decimal_places: 2
  - field: status
    cell_class_rules:
      warn:
        type: operator
        value: "=="
        body:
          left: { type: value, value: status }
          right: { type: literal, value: late }
row_class_rules:
  locked-row:
    type: value
    value: locked
context_menu:
  - copy
  - name: Cancel
    disabled:
      type: value
      value: locked
settings:
  size_to_fit_after_first_data_rendered: true
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_row_classes_and_menu() {
        let grid = orders_grid();
        let locked = Row::from_json(json!({"locked": true}));

        assert_eq!(grid.row_classes(&locked), vec!["locked-row"]);
        assert!(grid.row_classes(&Row::empty()).is_empty());

        let menu = grid.menu_for(&locked);
        assert_eq!(menu.len(), 2);
        assert!(menu[1].is_disabled());
    }

    #[test]
    fn test_report() {
        let grid = orders_grid();
        let row = Row::from_json(json!({"id": 1, "amount": 10, "status": "late", "locked": false}));

        let report = grid.report(&row, None);
        assert_eq!(report.editable, vec!["amount"]);
        assert_eq!(report.cell_classes.get("status"), Some(&vec!["warn".to_string()]));
        assert!(report.row_classes.is_empty());
        assert!(report.disabled_menu_items.is_empty());
        assert_eq!(report.passes_filter, None);
    }

    #[test]
    fn test_report_locked_row() {
        let grid = orders_grid();
        let row = Row::from_json(json!({"id": 2, "status": "ok", "locked": true}));

        let report = grid.report(&row, None);
        assert!(report.editable.is_empty());
        assert!(report.cell_classes.is_empty());
        assert_eq!(report.row_classes, vec!["locked-row"]);
        assert_eq!(report.disabled_menu_items, vec!["Cancel"]);
    }

    #[test]
    fn test_settings() {
        let grid = orders_grid();
        assert!(grid.settings.size_to_fit_after_first_data_rendered);
        assert!(!grid.settings.disable_resize_on_scroll);
    }

    #[test]
    fn test_valid_grid() {
        assert!(orders_grid().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut grid = orders_grid();
        grid.columns.push(ColumnDefinition::new("id"));

        let mut dated = ColumnDefinition::new("runtime");
        dated.filter = Some(FilterSpec::DateRange {
            range_field: Some("nowhere".to_string()),
        });
        grid.columns.push(dated);

        if let Some(decimal) = grid.columns[1].decimal.as_mut() {
            decimal.decimal_places = 25;
        }

        let problems = grid.validate();
        assert_eq!(problems.len(), 3, "{:?}", problems);
        assert!(problems.iter().any(|p| p.contains("Duplicate column field: id")));
        assert!(problems.iter().any(|p| p.contains("nowhere")));
        assert!(problems.iter().any(|p| p.contains("decimal_places 25")));
    }

    #[test]
    fn test_sort_rows() {
        let grid = orders_grid();
        let mut rows = vec![
            Row::from_json(json!({"id": 3})),
            Row::from_json(json!({"id": 1})),
            Row::from_json(json!({"id": 2})),
        ];

        grid.sort_rows(&mut rows, "id", false).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.get("id").cloned().unwrap()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);

        grid.sort_rows(&mut rows, "id", true).unwrap();
        assert_eq!(rows[0].get("id"), Some(&json!(3)));

        assert!(grid.sort_rows(&mut rows, "missing", false).is_err());
    }

    #[test]
    fn test_sort_rows_mixed_values() {
        let grid = orders_grid();
        let mut rows: Vec<Row> = [json!("10"), json!("b"), json!(9), json!(null), json!("a"), json!(2.5)]
            .into_iter()
            .map(|id| Row::from_json(json!({ "id": id })))
            .collect();

        grid.sort_rows(&mut rows, "id", false).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.get("id").cloned().unwrap()).collect();
        assert_eq!(ids, vec![json!(null), json!(2.5), json!(9), json!("10"), json!("a"), json!("b")]);
    }

    #[test]
    fn test_no_date_filter() {
        assert!(orders_grid().date_filter().is_none());
    }
}
