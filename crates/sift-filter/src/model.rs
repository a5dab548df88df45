//! Compiled predicate model: an OR of groups, each an AND of statements.

use crate::expr::CompareOp;
use serde::Serialize;

/// Statement operator understood by the matching engine.
///
/// Discriminants are the engine's wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Operator {
    Equals = 0,
    LessThan = 1,
    LessThanOrEquals = 2,
    GreaterThan = 3,
    GreaterThanOrEquals = 4,
    NotEqual = 5,
    Exists = 6,
}

impl Operator {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<CompareOp> for Operator {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Equal => Operator::Equals,
            CompareOp::NotEqual => Operator::NotEqual,
            CompareOp::GreaterThan => Operator::GreaterThan,
            CompareOp::GreaterOrEqual => Operator::GreaterThanOrEquals,
            CompareOp::LessThan => Operator::LessThan,
            CompareOp::LessOrEqual => Operator::LessThanOrEquals,
        }
    }
}

/// One `attribute operator literal` test.
///
/// A statement carries a value exactly when its operator is not
/// [`Operator::Exists`]; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    attribute: String,
    operator: Operator,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl Statement {
    pub fn comparison(attribute: impl Into<String>, op: CompareOp, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            operator: op.into(),
            value: Some(value.into()),
        }
    }

    pub fn exists(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            operator: Operator::Exists,
            value: None,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Conjunction of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    statements: Vec<Statement>,
}

impl Group {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

/// Disjunction of groups. An empty predicate expresses no filter at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Predicate {
    groups: Vec<Group>,
}

impl Predicate {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn statement_count(&self) -> usize {
        self.groups.iter().map(|g| g.statements.len()).sum()
    }
}
