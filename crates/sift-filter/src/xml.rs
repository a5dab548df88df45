//! Wire serialization of compiled predicates.
//!
//! ```xml
//! <Filter>
//!   <Group>
//!     <Statement Property="BTS.MessageType" Operator="0" Value="urn:sift:orders#Order"/>
//!     <Statement Property="BTS.ReceivePortName" Operator="6"/>
//!   </Group>
//! </Filter>
//! ```
//!
//! The consuming engine is not namespace aware, so no namespace is declared.

use crate::config::XmlOptions;
use crate::error::CompileError;
use crate::model::Predicate;
use sxd_document::writer::Writer;
use sxd_document::Package;
use tracing::debug;

const FILTER: &str = "Filter";
const GROUP: &str = "Group";
const STATEMENT: &str = "Statement";
const PROPERTY: &str = "Property";
const OPERATOR: &str = "Operator";
const VALUE: &str = "Value";

/// Render `predicate` to its wire form, `Ok(None)` when it has no groups.
pub fn to_xml(predicate: &Predicate, options: &XmlOptions) -> Result<Option<String>, CompileError> {
    if predicate.is_empty() {
        debug!("empty predicate, nothing to serialize");
        return Ok(None);
    }

    let package = Package::new();
    let document = package.as_document();

    let filter = document.create_element(FILTER);
    document.root().append_child(filter);

    for group in predicate.groups() {
        let group_element = document.create_element(GROUP);
        filter.append_child(group_element);

        for statement in group.statements() {
            let element = document.create_element(STATEMENT);
            element.set_attribute_value(PROPERTY, statement.attribute());
            element.set_attribute_value(OPERATOR, &statement.operator().code().to_string());
            if let Some(value) = statement.value() {
                element.set_attribute_value(VALUE, value);
            }
            group_element.append_child(element);
        }
    }

    let mut buffer = Vec::new();
    Writer::new()
        .set_single_quotes(false)
        .format_document(&document, &mut buffer)
        .map_err(|e| CompileError::Serialization(e.to_string()))?;
    let xml = String::from_utf8(buffer).map_err(|e| CompileError::Serialization(e.to_string()))?;

    Ok(Some(if options.declaration {
        xml
    } else {
        strip_declaration(&xml).to_string()
    }))
}

fn strip_declaration(xml: &str) -> &str {
    if xml.starts_with("<?xml") {
        if let Some(end) = xml.find("?>") {
            return xml[end + 2..].trim_start();
        }
    }
    xml
}
