// SPDX-License-Identifier: MIT

//! Date-range column filter
//!
//! A cell holds one or more ranges, `"2024-01-01 - 2024-01-31, 2024-03-01 - 2024-03-15"`.
//! A row passes when the filter date falls inside any of them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grid::column::{ColumnDefinition, FilterSpec};
use crate::rules::{DateRangeError, Row};

/// Filter type reported in the model
pub const FILTER_TYPE: &str = "dateRange";

const ENTRY_SEPARATOR: char = ',';
const BOUND_SEPARATOR: &str = " - ";

/// An inclusive range of days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Filter state as exchanged with the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    pub filter_date: String,
    pub filter_type: String,
}

impl FilterModel {
    pub fn new(filter_date: impl Into<String>) -> Self {
        Self {
            filter_date: filter_date.into(),
            filter_type: FILTER_TYPE.to_string(),
        }
    }
}

/// Parse a single date. The time of a datetime is dropped.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateRangeError> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%d.%m.%Y") {
        return Ok(date);
    }

    Err(DateRangeError::InvalidDate(input.to_string()))
}

/// Parse a range string. Blank entries are skipped, so a blank string
/// has no ranges; a single date is a one-day range. Any other unreadable
/// entry fails the whole string.
pub fn parse_ranges(input: &str) -> Result<Vec<DateRange>, DateRangeError> {
    entries(input).map(parse_entry).collect()
}

/// Ranges held by a cell: a range string, or a list of `[from, to]` pairs.
/// Null means no ranges.
pub fn ranges_from_value(value: &Value) -> Result<Vec<DateRange>, DateRangeError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => parse_ranges(s),
        Value::Array(pairs) => pairs.iter().map(range_from_pair).collect(),
        other => Err(DateRangeError::InvalidRange(other.to_string())),
    }
}

/// Like [`ranges_from_value`], but each entry stands alone: unreadable
/// entries are logged and dropped, the rest are kept.
pub fn readable_ranges(value: &Value) -> Vec<DateRange> {
    let parsed: Vec<Result<DateRange, DateRangeError>> = match value {
        Value::Null => Vec::new(),
        Value::String(s) => entries(s).map(parse_entry).collect(),
        Value::Array(pairs) => pairs.iter().map(range_from_pair).collect(),
        other => vec![Err(DateRangeError::InvalidRange(other.to_string()))],
    };

    parsed
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|e| log::debug!("Skipping date range entry: {}", e))
                .ok()
        })
        .collect()
}

fn entries(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.trim().is_empty())
}

fn parse_entry(entry: &str) -> Result<DateRange, DateRangeError> {
    let bounds: Vec<&str> = entry.split(BOUND_SEPARATOR).collect();
    match bounds.as_slice() {
        [single] => {
            let date = parse_date(single)?;
            Ok(DateRange::new(date, date))
        }
        [from, to] => Ok(DateRange::new(parse_date(from)?, parse_date(to)?)),
        _ => Err(DateRangeError::InvalidRange(entry.trim().to_string())),
    }
}

fn range_from_pair(pair: &Value) -> Result<DateRange, DateRangeError> {
    match pair.as_array().map(Vec::as_slice) {
        Some([Value::String(from), Value::String(to)]) => {
            Ok(DateRange::new(parse_date(from)?, parse_date(to)?))
        }
        _ => Err(DateRangeError::InvalidRange(pair.to_string())),
    }
}

/// Date-range filter bound to one column
#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeFilter {
    column: String,
    range_field: Option<String>,
    filter_date: Option<NaiveDate>,
}

impl DateRangeFilter {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            range_field: None,
            filter_date: None,
        }
    }

    /// Read ranges from another row field instead of the column value
    pub fn with_range_field(mut self, field: impl Into<String>) -> Self {
        self.range_field = Some(field.into());
        self
    }

    /// Build the filter a column is configured with, if any
    pub fn for_column(column: &ColumnDefinition) -> Option<Self> {
        match &column.filter {
            Some(FilterSpec::DateRange { range_field }) => {
                let filter = Self::new(column.field.clone());
                Some(match range_field {
                    Some(field) => filter.with_range_field(field.clone()),
                    None => filter,
                })
            }
            None => None,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn filter_date(&self) -> Option<NaiveDate> {
        self.filter_date
    }

    /// Set the date from user input; blank input deactivates the filter
    pub fn set_filter_date(&mut self, input: Option<&str>) -> Result<(), DateRangeError> {
        self.filter_date = match input.map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_date(s)?),
        };
        Ok(())
    }

    pub fn clear(&mut self) {
        self.filter_date = None;
    }

    pub fn is_filter_active(&self) -> bool {
        self.filter_date.is_some()
    }

    pub fn get_model(&self) -> Option<FilterModel> {
        self.filter_date
            .map(|date| FilterModel::new(date.format("%Y-%m-%d").to_string()))
    }

    /// Restore state from a model. `None` keeps the current state.
    pub fn set_model(&mut self, model: Option<FilterModel>) -> Result<(), DateRangeError> {
        match model {
            Some(model) => self.set_filter_date(Some(&model.filter_date)),
            None => Ok(()),
        }
    }

    /// Whether a row passes. An inactive filter passes every row. Otherwise
    /// the row passes when any readable range contains the date; entries
    /// that cannot be read are skipped.
    pub fn does_filter_pass(&self, row: &Row) -> bool {
        let Some(date) = self.filter_date else {
            return true;
        };

        let field = self.range_field.as_deref().unwrap_or(&self.column);
        let Some(value) = row.get(field) else {
            log::debug!("{}: row has no '{}', filtered out", self.column, field);
            return false;
        };

        let passes = readable_ranges(value).iter().any(|range| range.contains(date));
        if !passes {
            log::debug!("{}: no range of '{}' contains {}, filtered out", self.column, field, date);
        }
        passes
    }
}
