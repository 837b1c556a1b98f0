//! XML Schema container
//!
//! [`XsdSchema`] owns the global declarations of one schema. It is built
//! either by loading XSD text (see the `from_*` constructors in
//! [`parsing`](super::parsing)) or programmatically through the `add_*`
//! builder methods, and is immutable from the point of view of the proxy.

use std::sync::Arc;

use super::attributes::XsdAttribute;
use super::builtins::XSD_NAMESPACE;
use super::complex_types::XsdComplexType;
use super::elements::XsdElement;
use super::globals::{GlobalType, SchemaMaps, XsdGlobals};
use super::simple_types::XsdSimpleType;

use crate::error::{Error, Result};
use crate::namespaces::{NamespaceContext, QName};

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XML Schema Instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// An XSD schema with its global declarations
#[derive(Debug, Clone)]
pub struct XsdSchema {
    /// Target namespace of the schema
    pub target_namespace: Option<String>,
    /// Namespace bindings declared on the schema root
    pub namespaces: NamespaceContext,
    /// Global declarations
    pub maps: XsdGlobals,
}

impl XsdSchema {
    /// Create an empty schema with no target namespace
    pub fn new() -> Self {
        let mut namespaces = NamespaceContext::new();
        namespaces.add_prefix("xs", XSD_NAMESPACE);
        namespaces.add_prefix("xml", XML_NAMESPACE);
        Self {
            target_namespace: None,
            namespaces,
            maps: XsdGlobals::new(),
        }
    }

    /// Set the target namespace
    pub fn with_target_namespace(mut self, ns: impl Into<String>) -> Self {
        self.target_namespace = Some(ns.into());
        self
    }

    /// Add a namespace prefix binding
    pub fn add_namespace(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces.add_prefix(prefix, namespace);
    }

    /// Build a QName in the target namespace
    pub fn qname(&self, local_name: impl Into<String>) -> QName {
        QName::new(self.target_namespace.clone(), local_name)
    }

    /// Get a registered built-in simple type by local name
    pub fn builtin_simple_type(&self, local_name: &str) -> Result<Arc<XsdSimpleType>> {
        self.maps
            .builtin_type(local_name)
            .and_then(GlobalType::as_simple)
            .cloned()
            .ok_or_else(|| Error::Type(format!("Unknown built-in simple type: {}", local_name)))
    }

    /// Add a named global simple type
    pub fn add_simple_type(&mut self, typ: XsdSimpleType) -> Result<Arc<XsdSimpleType>> {
        let name = typ
            .name()
            .cloned()
            .ok_or_else(|| Error::Name("a global simple type needs a name".to_string()))?;
        let typ = Arc::new(typ);
        self.maps.register_simple_type(name, Arc::clone(&typ));
        Ok(typ)
    }

    /// Add a named global complex type
    pub fn add_complex_type(&mut self, typ: XsdComplexType) -> Result<Arc<XsdComplexType>> {
        let name = typ
            .name
            .clone()
            .ok_or_else(|| Error::Name("a global complex type needs a name".to_string()))?;
        let typ = Arc::new(typ);
        self.maps.register_complex_type(name, Arc::clone(&typ));
        Ok(typ)
    }

    /// Add a global element declaration
    pub fn add_element(&mut self, element: XsdElement) -> Arc<XsdElement> {
        let element = Arc::new(element);
        self.maps
            .register_element(element.name.clone(), Arc::clone(&element));
        element
    }

    /// Add a global attribute declaration
    pub fn add_attribute(&mut self, attribute: XsdAttribute) -> Arc<XsdAttribute> {
        let attribute = Arc::new(attribute);
        self.maps
            .register_attribute(attribute.name().clone(), Arc::clone(&attribute));
        attribute
    }

    /// Iterate over the global elements in declaration order
    pub fn elements(&self) -> impl Iterator<Item = &Arc<XsdElement>> {
        self.maps.elements.values()
    }

    /// Iterate over the global attributes in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &Arc<XsdAttribute>> {
        self.maps.attributes.values()
    }

    /// Iterate over the global types, built-ins first
    pub fn types(&self) -> impl Iterator<Item = (&QName, &GlobalType)> {
        self.maps.types.iter()
    }
}

impl Default for XsdSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaMaps for XsdSchema {
    fn lookup_attribute(&self, name: &QName) -> Option<&Arc<XsdAttribute>> {
        self.maps.lookup_attribute(name)
    }

    fn lookup_element(&self, name: &QName) -> Option<&Arc<XsdElement>> {
        self.maps.lookup_element(name)
    }

    fn lookup_type(&self, name: &QName) -> Option<&GlobalType> {
        self.maps.lookup_type(name)
    }

    fn lookup_substitution_group(&self, head: &QName) -> Option<&[Arc<XsdElement>]> {
        self.maps.lookup_substitution_group(head)
    }
}
