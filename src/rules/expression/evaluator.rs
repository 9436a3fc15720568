//! Expression evaluator

use serde_json::Value;
use std::borrow::Cow;

use super::ast::{Expression, OperatorBody, OperatorKind};
use super::parser::parse;
use super::value::{greater_or_equal, includes, is_truthy, less_or_equal, loose_equals};
use crate::rules::error::ExpressionError;
use crate::rules::row::Row;

/// Intermediate result: `None` is a missing field, kept apart from an
/// explicit `null` only so that comparisons against it are always false.
type Operand<'a> = Option<Cow<'a, Value>>;

/// Evaluate an expression against a row.
///
/// Missing fields evaluate to `Value::Null`. Operand type mismatches never
/// fail; the only error is an operator applied to the wrong body shape.
pub fn evaluate(row: &Row, expr: &Expression) -> Result<Value, ExpressionError> {
    Ok(eval_node(row, expr, "$")?
        .map(Cow::into_owned)
        .unwrap_or(Value::Null))
}

/// Evaluate an expression that is still in wire form.
///
/// Unknown node kinds and operator symbols surface here as
/// [`ExpressionError`] instead of at load time.
pub fn apply(row: &Row, json: &Value) -> Result<Value, ExpressionError> {
    let expr = parse(json)?;
    evaluate(row, &expr)
}

/// Evaluate and coerce the result to a boolean
pub fn evaluate_bool(row: &Row, expr: &Expression) -> Result<bool, ExpressionError> {
    evaluate(row, expr).map(|v| is_truthy(&v))
}

fn eval_node<'a>(row: &'a Row, expr: &'a Expression, path: &str) -> Result<Operand<'a>, ExpressionError> {
    match expr {
        Expression::Literal { value } => Ok(Some(Cow::Borrowed(value))),
        Expression::FieldReference { field } => Ok(row.get(field).map(Cow::Borrowed)),
        Expression::Operator { operator, operands } => eval_operator(row, *operator, operands, path),
    }
}

fn eval_operator<'a>(
    row: &'a Row,
    operator: OperatorKind,
    operands: &'a OperatorBody,
    path: &str,
) -> Result<Operand<'a>, ExpressionError> {
    let body_path = format!("{}.body", path);

    if operator.is_unary() {
        let inner = match operands {
            OperatorBody::Unary(inner) => inner,
            OperatorBody::Binary { .. } => {
                return Err(ExpressionError::malformed(
                    format!("operator '{}' takes a single operand", operator),
                    path,
                ))
            }
        };
        let value = eval_node(row, inner, &body_path)?;
        return Ok(boolean(!truthy(&value)));
    }

    let (left, right) = match operands {
        OperatorBody::Binary { left, right } => (left, right),
        OperatorBody::Unary(_) => {
            return Err(ExpressionError::malformed(
                format!("operator '{}' takes left and right operands", operator),
                path,
            ))
        }
    };

    // both sides are always evaluated; evaluation has no side effects
    let a = eval_node(row, left, &format!("{}.left", body_path))?;
    let b = eval_node(row, right, &format!("{}.right", body_path))?;

    let result = match operator {
        OperatorKind::And => {
            if truthy(&a) {
                b
            } else {
                a
            }
        }
        OperatorKind::Or => {
            if truthy(&a) {
                a
            } else {
                b
            }
        }
        OperatorKind::Equals => boolean(loose_equals(&or_null(&a), &or_null(&b))),
        OperatorKind::Includes => boolean(includes(&or_null(&b), &or_null(&a))),
        OperatorKind::LessOrEqual => boolean(compare_present(&a, &b, less_or_equal)),
        OperatorKind::GreaterOrEqual => boolean(compare_present(&a, &b, greater_or_equal)),
        OperatorKind::Not => unreachable!("unary operators handled above"),
    };

    Ok(result)
}

fn boolean<'a>(b: bool) -> Operand<'a> {
    Some(Cow::Owned(Value::Bool(b)))
}

fn truthy(operand: &Operand<'_>) -> bool {
    operand.as_deref().map(is_truthy).unwrap_or(false)
}

fn or_null<'a>(operand: &'a Operand<'_>) -> Cow<'a, Value> {
    match operand {
        Some(value) => Cow::Borrowed(&**value),
        None => Cow::Owned(Value::Null),
    }
}

/// A missing field never orders against anything
fn compare_present<F>(a: &Operand<'_>, b: &Operand<'_>, cmp: F) -> bool
where
    F: Fn(&Value, &Value) -> bool,
{
    match (a, b) {
        (Some(a), Some(b)) => cmp(&**a, &**b),
        _ => false,
    }
}
