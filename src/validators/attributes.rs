//! XSD Attribute declarations

use crate::namespaces::QName;
use crate::validators::builtins::XsdValue;
use crate::validators::simple_types::XsdSimpleType;
use std::sync::Arc;

/// XSD Attribute declaration
#[derive(Debug, Clone)]
pub struct XsdAttribute {
    /// Attribute name
    name: QName,
    /// Attribute type (must be a simple type); None means xs:anySimpleType
    attr_type: Option<Arc<XsdSimpleType>>,
    /// Type name reference
    pub type_name: Option<QName>,
    /// Default value
    default: Option<String>,
    /// Fixed value
    fixed: Option<String>,
}

impl XsdAttribute {
    /// Create a new attribute declaration
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attr_type: None,
            type_name: None,
            default: None,
            fixed: None,
        }
    }

    /// Set the attribute type
    pub fn with_type(mut self, attr_type: Arc<XsdSimpleType>) -> Self {
        if self.type_name.is_none() {
            self.type_name = attr_type.name().cloned();
        }
        self.attr_type = Some(attr_type);
        self
    }

    /// Set the type name reference
    pub fn with_type_name(mut self, type_name: QName) -> Self {
        self.type_name = Some(type_name);
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

    /// Attribute name
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Resolved simple type
    pub fn simple_type(&self) -> Option<&Arc<XsdSimpleType>> {
        self.attr_type.as_ref()
    }

    /// Default value
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Fixed value
    pub fn fixed(&self) -> Option<&str> {
        self.fixed.as_deref()
    }

    /// Check a value against the attribute's type and fixed constraint
    pub fn is_valid(&self, value: &XsdValue) -> bool {
        let type_ok = match &self.attr_type {
            Some(t) => t.is_valid(value),
            None => !matches!(value, XsdValue::Null),
        };
        type_ok && self.fixed.as_deref().map_or(true, |f| f == value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_builder() {
        let lang = Arc::new(XsdSimpleType::builtin("language").unwrap());
        let attr = XsdAttribute::new(QName::local("lang"))
            .with_type(lang)
            .with_default("en");

        assert_eq!(attr.name(), &QName::local("lang"));
        assert_eq!(attr.default(), Some("en"));
        assert!(attr.fixed().is_none());
        assert_eq!(
            attr.type_name.as_ref().map(|n| n.local_name.as_str()),
            Some("language")
        );
        assert!(attr.is_valid(&XsdValue::String("en-GB".into())));
        assert!(!attr.is_valid(&XsdValue::String("??".into())));
    }

    #[test]
    fn test_fixed_attribute() {
        let version = Arc::new(XsdSimpleType::builtin("decimal").unwrap());
        let attr = XsdAttribute::new(QName::local("version"))
            .with_type(version)
            .with_fixed("1.0");
        assert!(attr.is_valid(&XsdValue::String("1.0".into())));
        assert!(!attr.is_valid(&XsdValue::String("2.0".into())));
    }

    #[test]
    fn test_untyped_attribute() {
        let attr = XsdAttribute::new(QName::local("any"));
        assert!(attr.simple_type().is_none());
        assert!(attr.is_valid(&XsdValue::Integer(3)));
        assert!(!attr.is_valid(&XsdValue::Null));
    }
}
