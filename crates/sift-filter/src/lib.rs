//! Subscription filter compiler.
//!
//! Turns a boolean filter over typed message attributes into the OR-of-AND
//! predicate a publish/subscribe matching engine evaluates. Compilation runs
//! in three stages:
//!
//! 1. [`normalize`] rewrites the expression into disjunctive normal form
//! 2. [`translate`] reads the normal form as groups of statements, resolving
//!    every leaf through a [`Resolver`]
//! 3. [`xml::to_xml`] renders the predicate in the engine's wire format
//!
//! # Example
//!
//! ```
//! use sift_filter::{CompilerConfig, Filter, SchemaInfo, SchemaId, StaticCatalog};
//!
//! let catalog = StaticCatalog::new()
//!     .with_attribute("MessageType", "BTS.MessageType")
//!     .with_attribute("Token", "Sift.Token")
//!     .with_schema("order", SchemaInfo::new(Some("urn:sift:orders"), "Order"));
//!
//! let filter = Filter::equals("MessageType", SchemaId::new("order"))
//!     & (Filter::equals("Token", "A") | Filter::equals("Token", "B"));
//!
//! let predicate = filter.compile(&catalog, &CompilerConfig::default()).unwrap();
//! assert_eq!(predicate.len(), 2);
//!
//! let xml = filter.to_xml(&catalog, &CompilerConfig::default()).unwrap();
//! assert!(xml.is_some());
//! ```

mod builder;
mod config;
mod error;
mod expr;
mod model;
mod normalize;
mod resolve;
mod translate;
pub mod xml;

use tracing::{debug, warn};

pub use builder::Filter;
pub use config::{CompilerConfig, XmlOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_GROUPS};
pub use error::{CompileError, ResolveError};
pub use expr::{AttributeId, CompareOp, EndpointId, Expr, Literal, NodeKind, SchemaId, Value};
pub use model::{Group, Operator, Predicate, Statement};
pub use normalize::{dnf_width, normalize};
pub use resolve::{
    attribute_token, literal_token, AttributeCatalog, EndpointNaming, Resolver, SchemaInfo,
    SchemaRegistry, StaticCatalog,
};
pub use translate::translate;

/// Compile `expr` into a predicate.
///
/// The nesting depth is checked against `config.max_depth` and the number of
/// groups against `config.max_groups` before the expression is expanded.
pub fn compile(
    expr: &Expr,
    resolver: &dyn Resolver,
    config: &CompilerConfig,
) -> Result<Predicate, CompileError> {
    let depth = expr.depth();
    if depth > config.max_depth {
        warn!(depth, limit = config.max_depth, "filter exceeds depth limit");
        return Err(CompileError::DepthLimitExceeded {
            depth,
            limit: config.max_depth,
        });
    }

    let groups = dnf_width(expr);
    if groups > config.max_groups {
        warn!(
            groups,
            limit = config.max_groups,
            "filter exceeds group limit"
        );
        return Err(CompileError::GroupLimitExceeded {
            groups,
            limit: config.max_groups,
        });
    }

    let normalized = normalize(expr);
    debug!(groups, "normalized filter: {normalized}");

    let predicate = translate(&normalized, resolver)?;
    debug!(
        groups = predicate.len(),
        statements = predicate.statement_count(),
        "compiled filter"
    );
    Ok(predicate)
}
