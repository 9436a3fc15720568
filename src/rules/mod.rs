// SPDX-License-Identifier: MIT

pub mod config_value;
pub mod error;
pub mod expression;
pub mod row;

pub use config_value::{resolve_json, ConfigValue, FromValue};
pub use error::{CellruleError, ComponentError, DateRangeError, ExpressionError};
pub use expression::{evaluate, Expression, OperatorKind};
pub use row::Row;
