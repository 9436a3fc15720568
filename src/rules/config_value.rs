// SPDX-License-Identifier: MIT

//! Configuration slots that hold either a literal or an expression
//!
//! A column's `editable`, a class rule, or a menu item's `disabled` may be
//! written as a plain value (`true`) or as an expression object
//! (`{"type": "operator", ...}`). The shape decides: an object carrying a
//! `type` key is an expression, anything else is a literal.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{CellruleError, ExpressionError};
use super::expression::value::{is_truthy, to_display_string};
use super::expression::{apply, evaluate, is_expression_shape, parse, Expression};
use super::row::Row;

/// Conversion from an evaluated expression result into a config type
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Self;
}

impl FromValue for bool {
    fn from_value(value: Value) -> Self {
        is_truthy(&value)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Self {
        value
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Self {
        to_display_string(&value)
    }
}

/// A literal value or an expression computed per row
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue<T> {
    Literal(T),
    Computed(Expression),
}

impl<T> ConfigValue<T> {
    pub fn is_computed(&self) -> bool {
        matches!(self, ConfigValue::Computed(_))
    }

    pub fn expression(&self) -> Option<&Expression> {
        match self {
            ConfigValue::Computed(expr) => Some(expr),
            ConfigValue::Literal(_) => None,
        }
    }
}

impl<T: FromValue + Clone> ConfigValue<T> {
    /// Resolve against a row. Literals never touch the evaluator.
    pub fn resolve(&self, row: &Row) -> Result<T, ExpressionError> {
        match self {
            ConfigValue::Literal(value) => Ok(value.clone()),
            ConfigValue::Computed(expr) => evaluate(row, expr).map(T::from_value),
        }
    }

    /// Resolve, logging and returning `fallback` if evaluation fails.
    /// `context` names the slot in the log line (e.g. `editable(price)`).
    pub fn resolve_or(&self, row: &Row, fallback: T, context: &str) -> T {
        match self.resolve(row) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{}: expression failed, using fallback: {}", context, e);
                fallback
            }
        }
    }
}

impl<T: DeserializeOwned> ConfigValue<T> {
    /// Classify a raw config value by its shape
    pub fn from_json(value: Value) -> Result<Self, CellruleError> {
        if is_expression_shape(&value) {
            Ok(ConfigValue::Computed(parse(&value)?))
        } else {
            Ok(ConfigValue::Literal(serde_json::from_value(value)?))
        }
    }
}

impl<T: Default> Default for ConfigValue<T> {
    fn default() -> Self {
        ConfigValue::Literal(T::default())
    }
}

impl<T> From<Expression> for ConfigValue<T> {
    fn from(expr: Expression) -> Self {
        ConfigValue::Computed(expr)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ConfigValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ConfigValue::from_json(value).map_err(serde::de::Error::custom)
    }
}

impl<T: Serialize> Serialize for ConfigValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Literal(value) => value.serialize(serializer),
            ConfigValue::Computed(expr) => expr.to_json().serialize(serializer),
        }
    }
}

/// Resolve a raw, unvalidated config value against a row.
///
/// Used where configuration arrives with the row data instead of through
/// the grid definition. A malformed expression is logged and `fallback`
/// is returned, so one bad rule cannot break rendering.
pub fn resolve_json<T: FromValue>(row: &Row, raw: &Value, fallback: T) -> T {
    if !is_expression_shape(raw) {
        return T::from_value(raw.clone());
    }

    match apply(row, raw) {
        Ok(value) => T::from_value(value),
        Err(e) => {
            log::warn!(
                "malformed expression (tag: {}): {}",
                e.tag().unwrap_or("-"),
                e
            );
            fallback
        }
    }
}
