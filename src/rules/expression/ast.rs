// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for row expressions
//!
//! Expressions are authored elsewhere and arrive as JSON:
//!
//! ```json
//! { "type": "operator", "value": ">=",
//!   "body": { "left":  { "type": "value",   "value": "age" },
//!             "right": { "type": "literal", "value": 18 } } }
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::rules::error::ExpressionError;

/// A row expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Expression {
    /// Constant value (`"type": "literal"`)
    Literal { value: Value },
    /// Row field lookup (`"type": "value"`)
    FieldReference { field: String },
    /// Operator application (`"type": "operator"`)
    Operator {
        operator: OperatorKind,
        operands: OperatorBody,
    },
}

/// Operator operands
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorBody {
    /// `{ "left": .., "right": .. }`
    Binary {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// The body is the operand itself (only `!`)
    Unary(Box<Expression>),
}

/// Supported operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// &&
    And,
    /// ||
    Or,
    /// ==
    Equals,
    /// !
    Not,
    /// includes
    Includes,
    /// <=
    LessOrEqual,
    /// >=
    GreaterOrEqual,
}

/// Symbol table for the `value` field of operator nodes.
///
/// `"|| "` (trailing space) is how rule authoring tools have historically
/// emitted OR, so it is kept alongside the plain `"||"`.
static OPERATOR_SYMBOLS: Lazy<HashMap<&'static str, OperatorKind>> = Lazy::new(|| {
    HashMap::from([
        ("&&", OperatorKind::And),
        ("||", OperatorKind::Or),
        ("|| ", OperatorKind::Or),
        ("==", OperatorKind::Equals),
        ("!", OperatorKind::Not),
        ("includes", OperatorKind::Includes),
        ("<=", OperatorKind::LessOrEqual),
        (">=", OperatorKind::GreaterOrEqual),
    ])
});

impl OperatorKind {
    /// Look up an operator by its wire symbol (exact match, no trimming)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        OPERATOR_SYMBOLS.get(symbol).copied()
    }

    /// Canonical wire symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorKind::And => "&&",
            OperatorKind::Or => "||",
            OperatorKind::Equals => "==",
            OperatorKind::Not => "!",
            OperatorKind::Includes => "includes",
            OperatorKind::LessOrEqual => "<=",
            OperatorKind::GreaterOrEqual => ">=",
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, OperatorKind::Not)
    }
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal {
            value: value.into(),
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Expression::FieldReference { field: name.into() }
    }

    fn binary(operator: OperatorKind, left: Expression, right: Expression) -> Self {
        Expression::Operator {
            operator,
            operands: OperatorBody::Binary {
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(OperatorKind::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary(OperatorKind::Or, left, right)
    }

    pub fn equals(left: Expression, right: Expression) -> Self {
        Self::binary(OperatorKind::Equals, left, right)
    }

    /// `needle` is the left operand, `haystack` the right one
    pub fn includes(needle: Expression, haystack: Expression) -> Self {
        Self::binary(OperatorKind::Includes, needle, haystack)
    }

    pub fn less_or_equal(left: Expression, right: Expression) -> Self {
        Self::binary(OperatorKind::LessOrEqual, left, right)
    }

    pub fn greater_or_equal(left: Expression, right: Expression) -> Self {
        Self::binary(OperatorKind::GreaterOrEqual, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expression) -> Self {
        Expression::Operator {
            operator: OperatorKind::Not,
            operands: OperatorBody::Unary(Box::new(inner)),
        }
    }

    /// Wire representation
    pub fn to_json(&self) -> Value {
        match self {
            Expression::Literal { value } => json!({ "type": "literal", "value": value }),
            Expression::FieldReference { field } => json!({ "type": "value", "value": field }),
            Expression::Operator { operator, operands } => {
                let body = match operands {
                    OperatorBody::Binary { left, right } => {
                        json!({ "left": left.to_json(), "right": right.to_json() })
                    }
                    OperatorBody::Unary(inner) => inner.to_json(),
                };
                json!({ "type": "operator", "value": operator.symbol(), "body": body })
            }
        }
    }

    /// Names of all fields this expression reads
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Literal { .. } => {}
            Expression::FieldReference { field } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
            Expression::Operator { operands, .. } => match operands {
                OperatorBody::Binary { left, right } => {
                    left.collect_fields(out);
                    right.collect_fields(out);
                }
                OperatorBody::Unary(inner) => inner.collect_fields(out),
            },
        }
    }
}

impl TryFrom<Value> for Expression {
    type Error = ExpressionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        super::parser::parse(&value)
    }
}

impl From<Expression> for Value {
    fn from(expr: Expression) -> Self {
        expr.to_json()
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal { value } => write!(f, "{}", value),
            Expression::FieldReference { field } => write!(f, "{}", field),
            Expression::Operator { operator, operands } => match operands {
                OperatorBody::Binary { left, right } => {
                    write!(f, "({} {} {})", left, operator, right)
                }
                OperatorBody::Unary(inner) => write!(f, "{}{}", operator, inner),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols() {
        assert_eq!(OperatorKind::from_symbol("&&"), Some(OperatorKind::And));
        assert_eq!(OperatorKind::from_symbol("||"), Some(OperatorKind::Or));
        assert_eq!(OperatorKind::from_symbol("|| "), Some(OperatorKind::Or));
        assert_eq!(OperatorKind::from_symbol("=="), Some(OperatorKind::Equals));
        assert_eq!(OperatorKind::from_symbol("!"), Some(OperatorKind::Not));
        assert_eq!(
            OperatorKind::from_symbol("includes"),
            Some(OperatorKind::Includes)
        );
        assert_eq!(
            OperatorKind::from_symbol("<="),
            Some(OperatorKind::LessOrEqual)
        );
        assert_eq!(
            OperatorKind::from_symbol(">="),
            Some(OperatorKind::GreaterOrEqual)
        );

        assert_eq!(OperatorKind::from_symbol("??"), None);
        assert_eq!(OperatorKind::from_symbol(" ||"), None);
        assert_eq!(OperatorKind::from_symbol("!="), None);
    }

    #[test]
    fn test_operator_display_is_canonical() {
        assert_eq!(format!("{}", OperatorKind::Or), "||");
        assert_eq!(format!("{}", OperatorKind::Includes), "includes");
        assert!(OperatorKind::Not.is_unary());
        assert!(!OperatorKind::Equals.is_unary());
    }

    #[test]
    fn test_to_json_wire_shape() {
        let expr = Expression::not(Expression::field("active"));
        assert_eq!(
            expr.to_json(),
            json!({
                "type": "operator",
                "value": "!",
                "body": { "type": "value", "value": "active" }
            })
        );

        let expr = Expression::greater_or_equal(Expression::field("age"), Expression::literal(18));
        assert_eq!(
            expr.to_json(),
            json!({
                "type": "operator",
                "value": ">=",
                "body": {
                    "left": { "type": "value", "value": "age" },
                    "right": { "type": "literal", "value": 18 }
                }
            })
        );
    }

    #[test]
    fn test_display() {
        let expr = Expression::and(
            Expression::greater_or_equal(Expression::field("age"), Expression::literal(18)),
            Expression::not(Expression::field("banned")),
        );
        assert_eq!(format!("{}", expr), "((age >= 18) && !banned)");
    }

    #[test]
    fn test_fields_deduplicated() {
        let expr = Expression::or(
            Expression::equals(Expression::field("status"), Expression::literal("open")),
            Expression::equals(Expression::field("status"), Expression::field("fallback")),
        );
        assert_eq!(expr.fields(), vec!["status", "fallback"]);
    }

    #[test]
    fn test_serde_round_trip_through_wire_format() {
        let wire = json!({
            "type": "operator",
            "value": "|| ",
            "body": {
                "left": { "type": "value", "value": "a" },
                "right": { "type": "literal", "value": true }
            }
        });
        let expr: Expression = serde_json::from_value(wire).unwrap();
        assert_eq!(
            expr,
            Expression::or(Expression::field("a"), Expression::literal(true))
        );
        // Serialisation emits the canonical symbol
        assert_eq!(serde_json::to_value(&expr).unwrap()["value"], "||");
    }
}
