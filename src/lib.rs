//! # xmlschema-proxy
//!
//! An XSD schema model with a schema proxy for XPath engines.
//!
//! The crate loads the global declarations of an XML Schema (types, elements,
//! attributes and substitution groups) and exposes them to an external XPath
//! engine through the [`SchemaProxy`] trait.
//!
//! ## Features
//!
//! - Built-in XSD datatypes with lexical validation
//! - Simple type restrictions, lists and unions with facets
//! - Complex types with simple, mixed, empty or element-only content
//! - Global element and attribute declarations, substitution groups
//! - Schema loading with forward type references
//! - Resource limits against oversized input
//!
//! ## Example
//!
//! ```rust,ignore
//! use xmlschema_proxy::{QName, SchemaProxy, XmlSchemaProxy, XsdSchema, XsdValue};
//!
//! let schema = XsdSchema::from_file("path/to/schema.xsd")?;
//! let proxy = XmlSchemaProxy::new(&schema);
//!
//! let foo = proxy.get_element(&"{urn:example}foo".parse()?);
//! let ok = proxy.is_instance(&XsdValue::Integer(5), &"{urn:example}intType".parse()?)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod error;
pub mod limits;

// Names and namespaces
pub mod namespaces;
pub mod names;

// Document loading
pub mod documents;

// Schema components
pub mod validators;

// XPath support
pub mod xpath;

// Re-exports for convenience
pub use error::{Error, ParseError, Result, ValidationError};
pub use limits::Limits;
pub use namespaces::{NamespaceContext, QName};
pub use validators::{
    GlobalType, SchemaMaps, XsdAttribute, XsdComplexType, XsdElement, XsdGlobals, XsdSchema,
    XsdSimpleType, XsdValue,
};
pub use xpath::{SchemaProxy, UnaryExpression, XmlSchemaProxy};

/// Version of the xmlschema-proxy library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

