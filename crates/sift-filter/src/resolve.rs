//! Leaf resolution against the host's attribute catalog, schema registry
//! and endpoint naming convention.

use crate::error::ResolveError;
use crate::expr::{AttributeId, EndpointId, SchemaId, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Typed message attribute declarations.
pub trait AttributeCatalog {
    /// Globally unique token of the attribute, e.g. `BTS.MessageType`.
    fn attribute_token(&self, id: &AttributeId) -> Option<String>;
}

/// Registered message schemas.
pub trait SchemaRegistry {
    fn schema(&self, id: &SchemaId) -> Option<SchemaInfo>;
}

/// Names computed for ports and endpoints.
pub trait EndpointNaming {
    /// Assigned display name, `None` while the endpoint is still unnamed.
    fn endpoint_name(&self, id: &EndpointId) -> Option<String>;
}

/// Everything the translator needs to resolve leaves.
pub trait Resolver: AttributeCatalog + SchemaRegistry + EndpointNaming {}

impl<T> Resolver for T where T: AttributeCatalog + SchemaRegistry + EndpointNaming + ?Sized {}

/// Schema identity as published by the schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemaInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,
    pub root_element: String,
}

impl SchemaInfo {
    pub fn new(target_namespace: Option<&str>, root_element: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.map(str::to_string),
            root_element: root_element.into(),
        }
    }

    /// Message type token: `namespace#root`, or the bare root element when
    /// the schema has no target namespace.
    pub fn message_type(&self) -> String {
        match self.target_namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}#{}", self.root_element),
            _ => self.root_element.clone(),
        }
    }
}

/// Resolve the attribute side of a comparison.
pub fn attribute_token(value: &Value, resolver: &dyn Resolver) -> Result<String, ResolveError> {
    match value {
        Value::AttributeRef(id) => resolver
            .attribute_token(id)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ResolveError::UnknownAttribute(id.clone())),
        other => Err(ResolveError::NotAnAttribute(other.source_name())),
    }
}

/// Resolve the literal side of a comparison; `Ok(None)` is the null literal.
pub fn literal_token(value: &Value, resolver: &dyn Resolver) -> Result<Option<String>, ResolveError> {
    match value {
        Value::Literal(literal) => Ok(literal.token()),
        Value::AttributeRef(id) => Err(ResolveError::AttributeAsLiteral(id.clone())),
        Value::SchemaTypeRef(id) => {
            let schema = resolver
                .schema(id)
                .ok_or_else(|| ResolveError::UnknownSchema(id.clone()))?;
            if schema.root_element.is_empty() {
                return Err(ResolveError::MissingRootElement(id.clone()));
            }
            Ok(Some(schema.message_type()))
        }
        Value::NamedEndpointRef(id) => resolver
            .endpoint_name(id)
            .filter(|name| !name.is_empty())
            .map(Some)
            .ok_or_else(|| ResolveError::UnnamedEndpoint(id.clone())),
    }
}

/// In-memory catalog backing all three lookups, loadable from YAML.
///
/// ```yaml
/// attributes:
///   MessageType: BTS.MessageType
/// schemas:
///   order:
///     target_namespace: urn:sift:orders
///     root_element: Order
/// endpoints:
///   orders-out: SP.Orders.Out
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticCatalog {
    pub attributes: BTreeMap<AttributeId, String>,
    pub schemas: BTreeMap<SchemaId, SchemaInfo>,
    pub endpoints: BTreeMap<EndpointId, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: StaticCatalog = serde_yaml::from_str(&contents)?;
        Ok(catalog)
    }

    pub fn with_attribute(mut self, id: impl Into<AttributeId>, token: impl Into<String>) -> Self {
        self.attributes.insert(id.into(), token.into());
        self
    }

    pub fn with_schema(mut self, id: impl Into<SchemaId>, schema: SchemaInfo) -> Self {
        self.schemas.insert(id.into(), schema);
        self
    }

    pub fn with_endpoint(mut self, id: impl Into<EndpointId>, name: impl Into<String>) -> Self {
        self.endpoints.insert(id.into(), name.into());
        self
    }
}

impl AttributeCatalog for StaticCatalog {
    fn attribute_token(&self, id: &AttributeId) -> Option<String> {
        self.attributes.get(id).cloned()
    }
}

impl SchemaRegistry for StaticCatalog {
    fn schema(&self, id: &SchemaId) -> Option<SchemaInfo> {
        self.schemas.get(id).cloned()
    }
}

impl EndpointNaming for StaticCatalog {
    fn endpoint_name(&self, id: &EndpointId) -> Option<String> {
        self.endpoints.get(id).cloned()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::catalog;
    use super::*;
    use crate::expr::Literal;
    use std::io::Write;

    #[test]
    fn test_attribute_token_from_catalog() {
        let catalog = catalog();
        let token = attribute_token(&Value::AttributeRef("MessageType".into()), &catalog).unwrap();
        assert_eq!(token, "BTS.MessageType");
    }

    #[test]
    fn test_unknown_attribute_fails() {
        let catalog = catalog();
        let err = attribute_token(&Value::AttributeRef("Nope".into()), &catalog).unwrap_err();
        assert_eq!(err, ResolveError::UnknownAttribute("Nope".into()));
    }

    #[test]
    fn test_literal_cannot_be_attribute() {
        let catalog = catalog();
        let err = attribute_token(&Value::literal("x"), &catalog).unwrap_err();
        assert_eq!(err, ResolveError::NotAnAttribute("literal"));
    }

    #[test]
    fn test_literal_tokens() {
        let catalog = catalog();
        assert_eq!(
            literal_token(&Value::literal(true), &catalog).unwrap().as_deref(),
            Some("True")
        );
        assert_eq!(
            literal_token(&Value::Literal(Literal::enumeration("Priority", "Low")), &catalog)
                .unwrap()
                .as_deref(),
            Some("Low")
        );
        assert_eq!(literal_token(&Value::null(), &catalog).unwrap(), None);
    }

    #[test]
    fn test_schema_message_type() {
        let catalog = catalog();
        assert_eq!(
            literal_token(&Value::SchemaTypeRef("order".into()), &catalog)
                .unwrap()
                .as_deref(),
            Some("urn:sift:orders#Order")
        );
        assert_eq!(
            literal_token(&Value::SchemaTypeRef("legacy".into()), &catalog)
                .unwrap()
                .as_deref(),
            Some("Envelope")
        );
        assert_eq!(
            literal_token(&Value::SchemaTypeRef("broken".into()), &catalog).unwrap_err(),
            ResolveError::MissingRootElement("broken".into())
        );
        assert_eq!(
            literal_token(&Value::SchemaTypeRef("missing".into()), &catalog).unwrap_err(),
            ResolveError::UnknownSchema("missing".into())
        );
    }

    #[test]
    fn test_endpoint_names() {
        let catalog = catalog();
        assert_eq!(
            literal_token(&Value::NamedEndpointRef("orders-out".into()), &catalog)
                .unwrap()
                .as_deref(),
            Some("SP.Orders.Out")
        );
        assert_eq!(
            literal_token(&Value::NamedEndpointRef("pending".into()), &catalog).unwrap_err(),
            ResolveError::UnnamedEndpoint("pending".into())
        );
        assert_eq!(
            literal_token(&Value::NamedEndpointRef("unknown".into()), &catalog).unwrap_err(),
            ResolveError::UnnamedEndpoint("unknown".into())
        );
    }

    #[test]
    fn test_attribute_is_not_a_literal() {
        let catalog = catalog();
        assert_eq!(
            literal_token(&Value::AttributeRef("Token".into()), &catalog).unwrap_err(),
            ResolveError::AttributeAsLiteral("Token".into())
        );
    }

    #[test]
    fn test_catalog_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "attributes:\n  MessageType: BTS.MessageType\nschemas:\n  order:\n    target_namespace: urn:sift:orders\n    root_element: Order\nendpoints:\n  orders-out: SP.Orders.Out"
        )
        .unwrap();

        let catalog = StaticCatalog::from_file(file.path()).unwrap();
        assert_eq!(
            catalog.attribute_token(&"MessageType".into()).as_deref(),
            Some("BTS.MessageType")
        );
        assert_eq!(
            catalog.schema(&"order".into()).unwrap().message_type(),
            "urn:sift:orders#Order"
        );
        assert_eq!(
            catalog.endpoint_name(&"orders-out".into()).as_deref(),
            Some("SP.Orders.Out")
        );
    }
}
