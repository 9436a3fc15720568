// SPDX-License-Identifier: MIT

//! Row expressions
//!
//! Expressions are declarative conditions stored as data. They decide,
//! per row, things like:
//! - whether a cell is editable: `status == 'open'`
//! - which CSS classes apply: `age >= 18 && status == 'vip'`
//! - whether a context menu entry is disabled: `!active`

mod ast;
mod evaluator;
mod parser;
pub mod value;

pub use ast::{Expression, OperatorBody, OperatorKind};
pub use evaluator::{apply, evaluate, evaluate_bool};
pub use parser::{is_expression_shape, parse, parse_str};
