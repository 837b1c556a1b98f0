//! XSD Element declarations

use crate::namespaces::QName;
use crate::validators::globals::GlobalType;

/// XSD Element declaration
#[derive(Debug, Clone)]
pub struct XsdElement {
    /// Element name
    pub name: QName,

    /// Name of the declared type, when given by reference
    pub type_name: Option<QName>,

    /// Resolved element type (None means xs:anyType)
    pub element_type: Option<GlobalType>,

    /// Substitution group head element name
    pub substitution_group: Option<QName>,

    /// Whether this element is abstract
    pub abstract_element: bool,

    /// Whether this element is nillable
    pub nillable: bool,

    /// Default value (for simple content)
    pub default: Option<String>,

    /// Fixed value (for simple content)
    pub fixed: Option<String>,
}

impl XsdElement {
    /// Create a new element declaration with no type
    pub fn new(name: QName) -> Self {
        Self {
            name,
            type_name: None,
            element_type: None,
            substitution_group: None,
            abstract_element: false,
            nillable: false,
            default: None,
            fixed: None,
        }
    }

    /// Set the resolved type
    pub fn with_type(mut self, element_type: GlobalType) -> Self {
        if self.type_name.is_none() {
            self.type_name = element_type.name().cloned();
        }
        self.element_type = Some(element_type);
        self
    }

    /// Set the type name reference
    pub fn with_type_name(mut self, type_name: QName) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Set substitution group head
    pub fn with_substitution_group(mut self, head: QName) -> Self {
        self.substitution_group = Some(head);
        self
    }

    /// Mark as abstract
    pub fn with_abstract(mut self, abstract_element: bool) -> Self {
        self.abstract_element = abstract_element;
        self
    }

    /// Mark as nillable
    pub fn with_nillable(mut self, nillable: bool) -> Self {
        self.nillable = nillable;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the fixed value
    pub fn with_fixed(mut self, fixed: impl Into<String>) -> Self {
        self.fixed = Some(fixed.into());
        self
    }

    /// Get the resolved type
    pub fn element_type(&self) -> Option<&GlobalType> {
        self.element_type.as_ref()
    }

    /// Check if this element heads or joins a substitution group
    pub fn is_substitute_of(&self, head: &QName) -> bool {
        self.substitution_group.as_ref() == Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::simple_types::XsdSimpleType;
    use std::sync::Arc;

    #[test]
    fn test_element_builder() {
        let int_type = GlobalType::Simple(Arc::new(XsdSimpleType::builtin("int").unwrap()));
        let head = QName::namespaced("urn:pub", "publication");
        let elem = XsdElement::new(QName::namespaced("urn:pub", "book"))
            .with_type(int_type)
            .with_substitution_group(head.clone())
            .with_nillable(true)
            .with_default("0");

        assert_eq!(
            elem.type_name,
            Some(QName::namespaced("http://www.w3.org/2001/XMLSchema", "int"))
        );
        assert!(elem.element_type().is_some());
        assert!(elem.is_substitute_of(&head));
        assert!(elem.nillable);
        assert!(!elem.abstract_element);
        assert_eq!(elem.default.as_deref(), Some("0"));
        assert!(elem.fixed.is_none());
    }

    #[test]
    fn test_explicit_type_name_is_kept() {
        let t = GlobalType::Simple(Arc::new(XsdSimpleType::builtin("string").unwrap()));
        let elem = XsdElement::new(QName::local("note"))
            .with_type_name(QName::local("noteType"))
            .with_type(t);
        assert_eq!(elem.type_name, Some(QName::local("noteType")));
    }
}
