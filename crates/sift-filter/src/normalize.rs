//! Disjunctive normal form rewriting.
//!
//! The matching engine only understands an OR of AND-groups, so conjunctions
//! are distributed over disjunctions until no `Or` sits below an `And`:
//!
//! ```text
//! And(Or(a, b), c)  ->  Or(And(a, c), And(b, c))
//! And(a, Or(b, c))  ->  Or(And(a, b), And(a, c))
//! ```
//!
//! Node kinds the rewrite does not know about are returned unchanged; the
//! translator decides whether they are acceptable.

use crate::expr::Expr;

/// Rewrite `expr` into disjunctive normal form.
///
/// The input is never modified. Normalizing an already normalized tree
/// returns an identical tree.
#[must_use]
pub fn normalize(expr: &Expr) -> Expr {
    match expr {
        Expr::And(left, right) => distribute(normalize(left), normalize(right)),
        Expr::Or(left, right) => Expr::or(normalize(left), normalize(right)),
        Expr::Compare { op, left, right } => Expr::compare(*op, normalize(left), normalize(right)),
        other => other.clone(),
    }
}

/// Number of groups [`normalize`] produces for `expr`, saturating at `usize::MAX`.
///
/// Computed without building the normalized tree, so callers can refuse a
/// pathological filter before paying for its expansion. Comparison operands
/// are normalized too, so a comparison counts as wide as its widest operand;
/// for well-formed filters, whose operands are leaves, that is 1.
pub fn dnf_width(expr: &Expr) -> usize {
    match expr {
        Expr::Or(left, right) => dnf_width(left).saturating_add(dnf_width(right)),
        Expr::And(left, right) => dnf_width(left).saturating_mul(dnf_width(right)),
        Expr::Compare { left, right, .. } => dnf_width(left).max(dnf_width(right)),
        _ => 1,
    }
}

// Both operands are already in normal form.
fn distribute(left: Expr, right: Expr) -> Expr {
    match (left, right) {
        (Expr::Or(a, b), right) => Expr::or(distribute(*a, right.clone()), distribute(*b, right)),
        (left, Expr::Or(a, b)) => Expr::or(distribute(left.clone(), *a), distribute(left, *b)),
        (left, right) => Expr::and(left, right),
    }
}
