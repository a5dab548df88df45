//! Unevaluated filter expression trees.
//!
//! An [`Expr`] is the input of the compiler: a binary tree of conjunctions,
//! disjunctions and comparisons whose leaves are [`Value`]s. Leaves are a
//! closed set of sources (literal constants, message attributes, schema
//! message types and endpoint names), so resolving a leaf never needs to
//! inspect anything beyond the enum tag.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

handle!(
    /// Handle of a typed attribute declared in the attribute catalog.
    AttributeId
);
handle!(
    /// Handle of a schema registered in the schema registry.
    SchemaId
);
handle!(
    /// Handle of a port or endpoint named by the naming convention engine.
    EndpointId
);

/// Comparison operator as written in a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::LessThan => "<",
            CompareOp::LessOrEqual => "<=",
        }
    }

    /// Operator matching exactly when `self` does not, for a present attribute.
    pub fn complement(self) -> Self {
        match self {
            CompareOp::Equal => CompareOp::NotEqual,
            CompareOp::NotEqual => CompareOp::Equal,
            CompareOp::GreaterThan => CompareOp::LessOrEqual,
            CompareOp::GreaterOrEqual => CompareOp::LessThan,
            CompareOp::LessThan => CompareOp::GreaterOrEqual,
            CompareOp::LessOrEqual => CompareOp::GreaterThan,
        }
    }
}

/// A constant operand.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Enum { type_name: String, variant: String },
}

impl Literal {
    /// Canonical token written into a statement, `None` for null.
    ///
    /// Booleans are capitalized (`True`/`False`), matching the tokens the
    /// matching engine stores for boolean message attributes.
    pub fn token(&self) -> Option<String> {
        match self {
            Literal::Null => None,
            Literal::Bool(true) => Some("True".to_string()),
            Literal::Bool(false) => Some("False".to_string()),
            Literal::Int(n) => Some(n.to_string()),
            Literal::UInt(n) => Some(n.to_string()),
            Literal::Float(n) => Some(n.to_string()),
            Literal::Text(s) => Some(s.clone()),
            Literal::Enum { variant, .. } => Some(variant.clone()),
        }
    }

    pub fn enumeration(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Literal::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::UInt(n) => write!(f, "{n}"),
            Literal::Float(n) => write!(f, "{n}"),
            Literal::Text(s) => write!(f, "{s:?}"),
            Literal::Enum { type_name, variant } => write!(f, "{type_name}::{variant}"),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value.into())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Literal::UInt(value.into())
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Literal::UInt(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

/// Leaf operand of a comparison.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    Literal(Literal),
    AttributeRef(AttributeId),
    SchemaTypeRef(SchemaId),
    NamedEndpointRef(EndpointId),
}

impl Value {
    pub fn null() -> Self {
        Value::Literal(Literal::Null)
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Value::Literal(value.into())
    }

    /// Short name of the value source, used in diagnostics.
    pub fn source_name(&self) -> &'static str {
        match self {
            Value::Literal(_) => "literal",
            Value::AttributeRef(_) => "attribute",
            Value::SchemaTypeRef(_) => "schema type",
            Value::NamedEndpointRef(_) => "endpoint name",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(literal) => write!(f, "{literal}"),
            Value::AttributeRef(id) => write!(f, "{id}"),
            Value::SchemaTypeRef(id) => write!(f, "schema({id})"),
            Value::NamedEndpointRef(id) => write!(f, "endpoint({id})"),
        }
    }
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        Value::Literal(value)
    }
}

impl From<AttributeId> for Value {
    fn from(value: AttributeId) -> Self {
        Value::AttributeRef(value)
    }
}

impl From<SchemaId> for Value {
    fn from(value: SchemaId) -> Self {
        Value::SchemaTypeRef(value)
    }
}

impl From<EndpointId> for Value {
    fn from(value: EndpointId) -> Self {
        Value::NamedEndpointRef(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::literal(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::literal(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::literal(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::literal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::literal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::literal(value)
    }
}

/// Node kind reported by compile failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    And,
    Or,
    Not,
    Compare,
    Value,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::And => "And",
            NodeKind::Or => "Or",
            NodeKind::Not => "Not",
            NodeKind::Compare => "Compare",
            NodeKind::Value => "Value",
        };
        f.write_str(name)
    }
}

/// Filter expression tree.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    /// Negation the builder could not push onto a comparison.
    Not(Box<Expr>),
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Value(Value),
}

impl Expr {
    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
        Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn attribute(id: impl Into<AttributeId>) -> Self {
        Expr::Value(Value::AttributeRef(id.into()))
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Expr::Value(Value::literal(value))
    }

    pub fn null() -> Self {
        Expr::Value(Value::null())
    }

    pub fn schema_type(id: impl Into<SchemaId>) -> Self {
        Expr::Value(Value::SchemaTypeRef(id.into()))
    }

    pub fn endpoint(id: impl Into<EndpointId>) -> Self {
        Expr::Value(Value::NamedEndpointRef(id.into()))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::And(..) => NodeKind::And,
            Expr::Or(..) => NodeKind::Or,
            Expr::Not(_) => NodeKind::Not,
            Expr::Compare { .. } => NodeKind::Compare,
            Expr::Value(_) => NodeKind::Value,
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    ///
    /// Walks with an explicit stack, so it is safe on trees too deep for the
    /// recursive passes.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1usize)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            match node {
                Expr::And(left, right)
                | Expr::Or(left, right)
                | Expr::Compare { left, right, .. } => {
                    pending.push((left.as_ref(), level + 1));
                    pending.push((right.as_ref(), level + 1));
                }
                Expr::Not(inner) => pending.push((inner.as_ref(), level + 1)),
                Expr::Value(_) => {}
            }
        }
        deepest
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(left, right) => write!(f, "({left} && {right})"),
            Expr::Or(left, right) => write!(f, "({left} || {right})"),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Compare { op, left, right } => write!(f, "{left} {} {right}", op.symbol()),
            Expr::Value(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_tokens() {
        assert_eq!(Literal::Bool(true).token().as_deref(), Some("True"));
        assert_eq!(Literal::Bool(false).token().as_deref(), Some("False"));
        assert_eq!(Literal::Int(-42).token().as_deref(), Some("-42"));
        assert_eq!(Literal::UInt(7).token().as_deref(), Some("7"));
        assert_eq!(Literal::Float(1.5).token().as_deref(), Some("1.5"));
        assert_eq!(Literal::from("abc").token().as_deref(), Some("abc"));
        assert_eq!(
            Literal::enumeration("Priority", "High").token().as_deref(),
            Some("High")
        );
        assert_eq!(Literal::Null.token(), None);
    }

    #[test]
    fn test_expr_display() {
        let expr = Expr::and(
            Expr::compare(
                CompareOp::Equal,
                Expr::attribute("MessageType"),
                Expr::literal("X"),
            ),
            Expr::or(
                Expr::compare(CompareOp::GreaterThan, Expr::attribute("Retries"), Expr::literal(3)),
                Expr::compare(CompareOp::NotEqual, Expr::attribute("Token"), Expr::null()),
            ),
        );

        assert_eq!(
            expr.to_string(),
            r#"(MessageType == "X" && (Retries > 3 || Token != null))"#
        );
    }

    #[test]
    fn test_expr_kind() {
        assert_eq!(Expr::attribute("a").kind(), NodeKind::Value);
        assert_eq!(Expr::not(Expr::attribute("a")).kind(), NodeKind::Not);
        assert_eq!(
            Expr::or(Expr::attribute("a"), Expr::attribute("b")).kind(),
            NodeKind::Or
        );
    }

    #[test]
    fn test_expr_depth() {
        assert_eq!(Expr::attribute("a").depth(), 1);
        assert_eq!(
            Expr::compare(CompareOp::Equal, Expr::attribute("a"), Expr::literal(1)).depth(),
            2
        );

        let mut chain = Expr::compare(CompareOp::Equal, Expr::attribute("a"), Expr::literal(1));
        for _ in 0..9 {
            chain = Expr::and(chain, Expr::attribute("b"));
        }
        assert_eq!(chain.depth(), 11);
        assert_eq!(Expr::not(chain).depth(), 12);
    }

    #[test]
    fn test_compare_op_complement_round_trips() {
        for op in [
            CompareOp::Equal,
            CompareOp::NotEqual,
            CompareOp::GreaterThan,
            CompareOp::GreaterOrEqual,
            CompareOp::LessThan,
            CompareOp::LessOrEqual,
        ] {
            assert_ne!(op.complement(), op);
            assert_eq!(op.complement().complement(), op);
        }
        assert_eq!(CompareOp::GreaterThan.complement(), CompareOp::LessOrEqual);
    }

    #[test]
    fn test_expr_deserializes_from_json() {
        let json = serde_json::json!({
            "or": [
                {"compare": {
                    "op": "equal",
                    "left": {"value": {"attributeRef": "Token"}},
                    "right": {"value": {"literal": {"text": "A"}}}
                }},
                {"compare": {
                    "op": "notEqual",
                    "left": {"value": {"attributeRef": "Token"}},
                    "right": {"value": {"literal": "null"}}
                }}
            ]
        });

        let expr: Expr = serde_json::from_value(json).unwrap();
        assert_eq!(
            expr,
            Expr::or(
                Expr::compare(CompareOp::Equal, Expr::attribute("Token"), Expr::literal("A")),
                Expr::compare(CompareOp::NotEqual, Expr::attribute("Token"), Expr::null()),
            )
        );
    }
}
