//! XSD Complex Type definitions
//!
//! Only the content shape of a complex type matters to atomic instance
//! checks: a type with simple content accepts what its simple type accepts,
//! an empty type accepts the empty value, a mixed type accepts any value as
//! text and an element-only type accepts no atomic value at all.

use crate::namespaces::QName;
use crate::validators::builtins::XsdValue;
use crate::validators::simple_types::XsdSimpleType;
use std::sync::Arc;

/// Content of a complex type
#[derive(Debug, Clone)]
pub enum ComplexContent {
    /// No content
    Empty,
    /// Simple content with the given value type
    Simple(Arc<XsdSimpleType>),
    /// Mixed content (text interleaved with elements)
    Mixed,
    /// Element-only content
    ElementOnly,
}

/// XSD complex type definition
#[derive(Debug, Clone)]
pub struct XsdComplexType {
    /// Type name (None for anonymous types)
    pub name: Option<QName>,
    /// Base type name, when derived
    pub base_type: Option<QName>,
    /// Content shape
    pub content: ComplexContent,
    /// Whether this type is abstract
    pub abstract_type: bool,
}

impl XsdComplexType {
    /// Create a new complex type
    pub fn new(name: Option<QName>, content: ComplexContent) -> Self {
        Self {
            name,
            base_type: None,
            content,
            abstract_type: false,
        }
    }

    /// Set the base type name
    pub fn with_base_type(mut self, base: QName) -> Self {
        self.base_type = Some(base);
        self
    }

    /// Mark as abstract
    pub fn with_abstract(mut self, abstract_type: bool) -> Self {
        self.abstract_type = abstract_type;
        self
    }

    /// Check if the type has simple content
    pub fn has_simple_content(&self) -> bool {
        matches!(self.content, ComplexContent::Simple(_))
    }

    /// Check if the type is mixed
    pub fn is_mixed(&self) -> bool {
        matches!(self.content, ComplexContent::Mixed)
    }

    /// Check if the type is empty
    pub fn is_empty(&self) -> bool {
        matches!(self.content, ComplexContent::Empty)
    }

    /// Check whether an atomic value is valid content for this type
    pub fn is_valid(&self, value: &XsdValue) -> bool {
        match &self.content {
            ComplexContent::Simple(simple) => simple.is_valid(value),
            ComplexContent::Empty => match value {
                XsdValue::Null => true,
                XsdValue::String(s) => s.trim().is_empty(),
                _ => false,
            },
            ComplexContent::Mixed => !matches!(value, XsdValue::Null),
            ComplexContent::ElementOnly => false,
        }
    }
}
