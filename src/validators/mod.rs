//! XML Schema validators
//!
//! This module contains the schema component model: built-in and derived
//! simple types, complex types, element and attribute declarations, the
//! global maps that index them by QName, and the loader that builds them
//! from XSD text.

pub mod attributes;
pub mod builtins;
pub mod complex_types;
pub mod elements;
pub mod facets;
pub mod globals;
pub mod parsing;
pub mod schemas;
pub mod simple_types;

// Re-exports
pub use attributes::XsdAttribute;
pub use builtins::{BuiltinType, TypeCategory, XsdValue, XSD_NAMESPACE};
pub use complex_types::{ComplexContent, XsdComplexType};
pub use elements::XsdElement;
pub use facets::WhiteSpace;
pub use globals::{GlobalType, SchemaMaps, XsdGlobals};
pub use schemas::{XsdSchema, XML_NAMESPACE, XSI_NAMESPACE};
pub use simple_types::{FacetSet, SimpleTypeVariety, XsdSimpleType};
