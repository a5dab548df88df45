//! Translation of a normalized expression into a [`Predicate`].
//!
//! The top level is read as a disjunction of groups, each group as a
//! conjunction of comparisons. Nested `Or`s and `And`s are flattened in
//! left-to-right order. Anything else is an unsupported shape.

use crate::error::CompileError;
use crate::expr::{CompareOp, Expr};
use crate::model::{Group, Predicate, Statement};
use crate::resolve::{self, Resolver};

/// Translate a tree produced by [`crate::normalize::normalize`].
pub fn translate(expr: &Expr, resolver: &dyn Resolver) -> Result<Predicate, CompileError> {
    let mut groups = Vec::new();
    collect_groups(expr, resolver, &mut groups)?;
    Ok(Predicate::new(groups))
}

fn collect_groups(
    expr: &Expr,
    resolver: &dyn Resolver,
    groups: &mut Vec<Group>,
) -> Result<(), CompileError> {
    if let Expr::Or(left, right) = expr {
        collect_groups(left, resolver, groups)?;
        return collect_groups(right, resolver, groups);
    }

    let mut statements = Vec::new();
    collect_statements(expr, resolver, &mut statements)?;
    groups.push(Group::new(statements));
    Ok(())
}

fn collect_statements(
    expr: &Expr,
    resolver: &dyn Resolver,
    statements: &mut Vec<Statement>,
) -> Result<(), CompileError> {
    if let Expr::And(left, right) = expr {
        collect_statements(left, resolver, statements)?;
        return collect_statements(right, resolver, statements);
    }

    statements.push(translate_statement(expr, resolver)?);
    Ok(())
}

fn translate_statement(expr: &Expr, resolver: &dyn Resolver) -> Result<Statement, CompileError> {
    let Expr::Compare { op, left, right } = expr else {
        return Err(CompileError::unsupported(expr));
    };

    let Expr::Value(attribute) = left.as_ref() else {
        return Err(CompileError::unsupported(left));
    };
    let Expr::Value(literal) = right.as_ref() else {
        return Err(CompileError::unsupported(right));
    };

    let attribute = resolve::attribute_token(attribute, resolver)
        .map_err(|e| CompileError::unresolvable(left, e))?;
    let literal = resolve::literal_token(literal, resolver)
        .map_err(|e| CompileError::unresolvable(right, e))?;

    match (op, literal) {
        // "attribute != null" is the engine's presence test.
        (CompareOp::NotEqual, None) => Ok(Statement::exists(attribute)),
        // Equality or ordering against null has no wire representation.
        (_, None) => Err(CompileError::unsupported(expr)),
        (op, Some(value)) => Ok(Statement::comparison(attribute, *op, value)),
    }
}
