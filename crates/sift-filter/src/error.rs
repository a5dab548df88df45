//! Error types for filter compilation.

use crate::expr::{AttributeId, EndpointId, Expr, NodeKind, SchemaId};

/// Failure to turn a leaf operand into a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("attribute '{0}' is not declared in the attribute catalog")]
    UnknownAttribute(AttributeId),
    #[error("schema '{0}' is not registered")]
    UnknownSchema(SchemaId),
    #[error("schema '{0}' has no root element")]
    MissingRootElement(SchemaId),
    #[error("endpoint '{0}' has no assigned name")]
    UnnamedEndpoint(EndpointId),
    #[error("a {0} cannot be used as the attribute side of a comparison")]
    NotAnAttribute(&'static str),
    #[error("attribute '{0}' cannot be used as a literal value")]
    AttributeAsLiteral(AttributeId),
}

/// Compile failure reported to the caller registering a subscription.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("unsupported {kind} node in filter: {expression}")]
    UnsupportedShape { kind: NodeKind, expression: String },
    #[error("cannot resolve {kind} node '{expression}': {source}")]
    UnresolvableLeaf {
        kind: NodeKind,
        expression: String,
        #[source]
        source: ResolveError,
    },
    #[error("filter expands to {groups} groups, exceeding the limit of {limit}")]
    GroupLimitExceeded { groups: usize, limit: usize },
    #[error("filter is nested {depth} levels deep, exceeding the limit of {limit}")]
    DepthLimitExceeded { depth: usize, limit: usize },
    #[error("failed to serialize predicate: {0}")]
    Serialization(String),
}

impl CompileError {
    pub(crate) fn unsupported(expr: &Expr) -> Self {
        CompileError::UnsupportedShape {
            kind: expr.kind(),
            expression: expr.to_string(),
        }
    }

    pub(crate) fn unresolvable(expr: &Expr, source: ResolveError) -> Self {
        CompileError::UnresolvableLeaf {
            kind: expr.kind(),
            expression: expr.to_string(),
            source,
        }
    }
}
