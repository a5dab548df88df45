//! Fluent construction of subscription filters.
//!
//! [`Filter`] wraps an unevaluated [`Expr`] and combines with `&`, `|` and `!`
//! (or [`Filter::and`] / [`Filter::or`]) without evaluating either side.
//! The empty filter is the identity of both combinators.

use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::expr::{AttributeId, CompareOp, Expr, Literal, Value};
use crate::model::Predicate;
use crate::resolve::Resolver;
use std::ops::{BitAnd, BitOr, Not};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    expr: Option<Expr>,
}

impl Filter {
    /// Wrap an expression. Bare boolean attributes in boolean position are
    /// rewritten to `attribute == true`.
    pub fn new(expr: Expr) -> Self {
        Self {
            expr: Some(lift_flags(expr)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// `attribute == true`
    pub fn flag(attribute: impl Into<AttributeId>) -> Self {
        Self::new(Expr::attribute(attribute))
    }

    /// `attribute != null`
    pub fn exists(attribute: impl Into<AttributeId>) -> Self {
        Self::compare(CompareOp::NotEqual, attribute, Value::null())
    }

    pub fn compare(op: CompareOp, attribute: impl Into<AttributeId>, value: impl Into<Value>) -> Self {
        Self {
            expr: Some(Expr::compare(
                op,
                Expr::attribute(attribute),
                Expr::Value(value.into()),
            )),
        }
    }

    pub fn equals(attribute: impl Into<AttributeId>, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Equal, attribute, value)
    }

    pub fn not_equals(attribute: impl Into<AttributeId>, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::NotEqual, attribute, value)
    }

    pub fn greater_than(attribute: impl Into<AttributeId>, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::GreaterThan, attribute, value)
    }

    pub fn greater_or_equal(attribute: impl Into<AttributeId>, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::GreaterOrEqual, attribute, value)
    }

    pub fn less_than(attribute: impl Into<AttributeId>, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::LessThan, attribute, value)
    }

    pub fn less_or_equal(attribute: impl Into<AttributeId>, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::LessOrEqual, attribute, value)
    }

    pub fn and(self, other: Filter) -> Filter {
        match (self.expr, other.expr) {
            (Some(left), Some(right)) => Filter {
                expr: Some(Expr::and(left, right)),
            },
            (left, right) => Filter { expr: left.or(right) },
        }
    }

    pub fn or(self, other: Filter) -> Filter {
        match (self.expr, other.expr) {
            (Some(left), Some(right)) => Filter {
                expr: Some(Expr::or(left, right)),
            },
            (left, right) => Filter { expr: left.or(right) },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_none()
    }

    pub fn expression(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    /// Compile to a predicate. The empty filter compiles to an empty predicate.
    pub fn compile(
        &self,
        resolver: &dyn Resolver,
        config: &CompilerConfig,
    ) -> Result<Predicate, CompileError> {
        match &self.expr {
            Some(expr) => crate::compile(expr, resolver, config),
            None => Ok(Predicate::default()),
        }
    }

    /// Compile and render the wire form. `Ok(None)` means the filter is empty.
    pub fn to_xml(
        &self,
        resolver: &dyn Resolver,
        config: &CompilerConfig,
    ) -> Result<Option<String>, CompileError> {
        let predicate = self.compile(resolver, config)?;
        crate::xml::to_xml(&predicate, &config.xml)
    }
}

impl From<Expr> for Filter {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

impl BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Filter) -> Filter {
        self.and(rhs)
    }
}

impl BitAnd for &Filter {
    type Output = Filter;

    fn bitand(self, rhs: &Filter) -> Filter {
        self.clone().and(rhs.clone())
    }
}

impl BitOr for Filter {
    type Output = Filter;

    fn bitor(self, rhs: Filter) -> Filter {
        self.or(rhs)
    }
}

impl BitOr for &Filter {
    type Output = Filter;

    fn bitor(self, rhs: &Filter) -> Filter {
        self.clone().or(rhs.clone())
    }
}

impl Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        Filter {
            expr: self.expr.map(negate),
        }
    }
}

impl Not for &Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        !self.clone()
    }
}

fn lift_flags(expr: Expr) -> Expr {
    match expr {
        Expr::And(left, right) => Expr::and(lift_flags(*left), lift_flags(*right)),
        Expr::Or(left, right) => Expr::or(lift_flags(*left), lift_flags(*right)),
        Expr::Not(inner) => negate(lift_flags(*inner)),
        Expr::Value(Value::AttributeRef(id)) => flag_equals(id, true),
        other => other,
    }
}

fn flag_equals(id: AttributeId, value: bool) -> Expr {
    Expr::compare(
        CompareOp::Equal,
        Expr::Value(Value::AttributeRef(id)),
        Expr::literal(value),
    )
}

/// Push a negation as far down as it can go.
///
/// `And`/`Or` follow De Morgan, boolean comparisons flip their literal and
/// every other comparison takes its complementary operator. The engine never
/// matches a statement on an absent attribute, so `!(a > x)` compiles to
/// `a <= x` and `!(a == x)` to `a != x`; both still require `a` to be present.
/// Only leaves that are not comparisons stay wrapped in `Not`.
fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::And(left, right) => Expr::or(negate(*left), negate(*right)),
        Expr::Or(left, right) => Expr::and(negate(*left), negate(*right)),
        Expr::Not(inner) => *inner,
        Expr::Value(Value::AttributeRef(id)) => flag_equals(id, false),
        Expr::Compare { op, left, right } => match (op, *right) {
            (CompareOp::Equal, Expr::Value(Value::Literal(Literal::Bool(b)))) => Expr::compare(
                CompareOp::Equal,
                *left,
                Expr::literal(!b),
            ),
            (CompareOp::NotEqual, Expr::Value(Value::Literal(Literal::Bool(b)))) => {
                Expr::compare(CompareOp::Equal, *left, Expr::literal(b))
            }
            (op, right) => Expr::compare(op.complement(), *left, right),
        },
        other => Expr::not(other),
    }
}
