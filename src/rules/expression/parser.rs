//! Expression parser - converts wire JSON into a typed expression tree
//!
//! Unknown node kinds and operator symbols are rejected here, so a tree
//! that made it through `parse` can no longer fail on a bad tag.

use serde_json::{Map, Value};

use super::ast::{Expression, OperatorBody, OperatorKind};
use crate::rules::error::ExpressionError;

const ROOT: &str = "$";

/// Parse a JSON value into an expression tree
pub fn parse(json: &Value) -> Result<Expression, ExpressionError> {
    parse_node(json, ROOT)
}

/// Parse an expression from JSON text
pub fn parse_str(input: &str) -> Result<Expression, ExpressionError> {
    let json: Value = serde_json::from_str(input)
        .map_err(|e| ExpressionError::malformed(format!("invalid JSON: {}", e), ROOT))?;
    parse(&json)
}

/// True when a configuration value has the shape of an expression node
/// (an object carrying a `type` key) rather than a plain literal.
pub fn is_expression_shape(json: &Value) -> bool {
    json.as_object()
        .map(|obj| obj.contains_key("type"))
        .unwrap_or(false)
}

fn parse_node(json: &Value, path: &str) -> Result<Expression, ExpressionError> {
    let obj = json.as_object().ok_or_else(|| {
        ExpressionError::malformed(format!("expected an expression object, got {}", json), path)
    })?;

    let kind = match obj.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => return Err(ExpressionError::unknown_node_kind(other.to_string(), path)),
        None => return Err(ExpressionError::unknown_node_kind("undefined", path)),
    };

    match kind {
        "literal" => Ok(Expression::Literal {
            value: obj.get("value").cloned().unwrap_or(Value::Null),
        }),
        "value" => parse_field_reference(obj, path),
        "operator" => parse_operator(obj, path),
        other => Err(ExpressionError::unknown_node_kind(other, path)),
    }
}

fn parse_field_reference(obj: &Map<String, Value>, path: &str) -> Result<Expression, ExpressionError> {
    match obj.get("value") {
        Some(Value::String(field)) => Ok(Expression::field(field.clone())),
        // numeric keys index the row like any other property name
        Some(Value::Number(n)) => Ok(Expression::field(n.to_string())),
        Some(other) => Err(ExpressionError::malformed(
            format!("field reference must name a field, got {}", other),
            path,
        )),
        None => Err(ExpressionError::malformed("field reference without 'value'", path)),
    }
}

fn parse_operator(obj: &Map<String, Value>, path: &str) -> Result<Expression, ExpressionError> {
    let symbol = match obj.get("value") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return Err(ExpressionError::unknown_operator(other.to_string(), path)),
        None => return Err(ExpressionError::unknown_operator("undefined", path)),
    };

    let operator = OperatorKind::from_symbol(symbol)
        .ok_or_else(|| ExpressionError::unknown_operator(symbol, path))?;

    let body_path = format!("{}.body", path);
    let body = obj
        .get("body")
        .ok_or_else(|| ExpressionError::malformed(format!("operator '{}' without 'body'", symbol), path))?;

    let operands = if operator.is_unary() {
        OperatorBody::Unary(Box::new(parse_node(body, &body_path)?))
    } else {
        let body_obj = body.as_object().ok_or_else(|| {
            ExpressionError::malformed("binary operator body must be an object", &body_path)
        })?;
        let left = operand(body_obj, "left", &body_path)?;
        let right = operand(body_obj, "right", &body_path)?;
        OperatorBody::Binary {
            left: Box::new(left),
            right: Box::new(right),
        }
    };

    Ok(Expression::Operator { operator, operands })
}

fn operand(body: &Map<String, Value>, side: &str, body_path: &str) -> Result<Expression, ExpressionError> {
    let side_path = format!("{}.{}", body_path, side);
    let node = body
        .get(side)
        .ok_or_else(|| ExpressionError::malformed(format!("missing '{}' operand", side), body_path))?;
    parse_node(node, &side_path)
}
