//! Schema Proxy for XPath Evaluation
//!
//! This module provides the interface an XPath engine uses to query a
//! schema: declaration lookups by QName, instance checks against declared
//! types and value casting. [`XmlSchemaProxy`] is the implementation backed
//! by any [`SchemaMaps`] schema, [`XsdSchema`] by default.
//!
//! The proxy only borrows its schema. Every call reads the live maps and
//! hands back the stored components themselves, so repeated calls with the
//! same arguments return the same components.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::namespaces::QName;
use crate::validators::{GlobalType, SchemaMaps, XsdAttribute, XsdElement, XsdSchema, XsdValue};

/// An operand the XPath engine can evaluate to an optional atomic value
pub trait UnaryExpression {
    /// Evaluate the operand
    fn evaluate(&self) -> Result<Option<XsdValue>>;
}

impl UnaryExpression for XsdValue {
    fn evaluate(&self) -> Result<Option<XsdValue>> {
        Ok(Some(self.clone()))
    }
}

impl UnaryExpression for Option<XsdValue> {
    fn evaluate(&self) -> Result<Option<XsdValue>> {
        Ok(self.clone())
    }
}

/// Schema access required by an XPath engine
///
/// Lookups return `None` on a miss; only [`is_instance`](Self::is_instance)
/// treats an unknown name as an error. The trait is object safe so an
/// engine can hold a `&dyn SchemaProxy`.
pub trait SchemaProxy {
    /// Get a global attribute declaration by name
    fn get_attribute(&self, qname: &QName) -> Option<&Arc<XsdAttribute>>;

    /// Get a global element declaration by name
    fn get_element(&self, qname: &QName) -> Option<&Arc<XsdElement>>;

    /// Get a global type definition by name
    fn get_type(&self, qname: &QName) -> Option<&GlobalType>;

    /// Check whether `value` is an instance of the type named `type_qname`
    ///
    /// Returns [`Error::Key`] if no such type is declared.
    fn is_instance(&self, value: &XsdValue, type_qname: &QName) -> Result<bool>;

    /// Cast the value of `expr` to the type named `type_qname`
    ///
    /// With `required` set, an empty operand is an error rather than an
    /// empty result.
    fn cast_as(
        &self,
        expr: &dyn UnaryExpression,
        type_qname: &QName,
        required: bool,
    ) -> Result<Option<XsdValue>>;
}

/// Schema proxy over a borrowed schema
pub struct XmlSchemaProxy<'a, S: SchemaMaps + ?Sized = XsdSchema> {
    schema: &'a S,
}

impl<'a, S: SchemaMaps + ?Sized> XmlSchemaProxy<'a, S> {
    /// Create a proxy for a schema
    pub fn new(schema: &'a S) -> Self {
        Self { schema }
    }

    /// The wrapped schema
    pub fn schema(&self) -> &'a S {
        self.schema
    }

    /// Get the members of the substitution group headed by `qname`
    pub fn get_substitution_group(&self, qname: &QName) -> Option<&'a [Arc<XsdElement>]> {
        let group = self.schema.lookup_substitution_group(qname);
        if group.is_none() {
            trace!(head = %qname, "substitution group not found");
        }
        group
    }
}

impl<S: SchemaMaps + ?Sized> Clone for XmlSchemaProxy<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: SchemaMaps + ?Sized> Copy for XmlSchemaProxy<'_, S> {}

impl<S: SchemaMaps + fmt::Debug + ?Sized> fmt::Debug for XmlSchemaProxy<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlSchemaProxy")
            .field("schema", &self.schema)
            .finish()
    }
}

impl<'a, S: SchemaMaps + ?Sized> SchemaProxy for XmlSchemaProxy<'a, S> {
    fn get_attribute(&self, qname: &QName) -> Option<&Arc<XsdAttribute>> {
        let attribute = self.schema.lookup_attribute(qname);
        if attribute.is_none() {
            trace!(attribute = %qname, "attribute not found");
        }
        attribute
    }

    fn get_element(&self, qname: &QName) -> Option<&Arc<XsdElement>> {
        let element = self.schema.lookup_element(qname);
        if element.is_none() {
            trace!(element = %qname, "element not found");
        }
        element
    }

    fn get_type(&self, qname: &QName) -> Option<&GlobalType> {
        let xsd_type = self.schema.lookup_type(qname);
        if xsd_type.is_none() {
            trace!(type_name = %qname, "type not found");
        }
        xsd_type
    }

    fn is_instance(&self, value: &XsdValue, type_qname: &QName) -> Result<bool> {
        match self.schema.lookup_type(type_qname) {
            Some(xsd_type) => Ok(xsd_type.is_valid(value)),
            None => {
                trace!(type_name = %type_qname, "instance check against unknown type");
                Err(Error::Key(format!("type {} not found in schema", type_qname)))
            }
        }
    }

    fn cast_as(
        &self,
        _expr: &dyn UnaryExpression,
        type_qname: &QName,
        _required: bool,
    ) -> Result<Option<XsdValue>> {
        Err(Error::NotImplemented(format!(
            "cast to {} is not supported by the schema proxy",
            type_qname
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{FacetSet, XsdSimpleType};
    use crate::validators::facets::{BoundFacet, BoundKind};
    use proptest::prelude::*;
    use std::cell::Cell;

    const NS: &str = "urn:example:proxy";

    fn sample_schema() -> XsdSchema {
        let mut schema = XsdSchema::new().with_target_namespace(NS);
        let int = schema.builtin_simple_type("int").unwrap();
        let mut facets = FacetSet::new();
        facets.bounds.push(BoundFacet::new(BoundKind::MinInclusive, "0").unwrap());
        let int_type = schema
            .add_simple_type(XsdSimpleType::restriction(
                Some(schema.qname("intType")),
                int,
                facets,
            ))
            .unwrap();

        let head = schema.qname("foo");
        schema.add_element(XsdElement::new(head.clone()).with_type(GlobalType::Simple(int_type)));
        schema.add_element(XsdElement::new(schema.qname("baz")).with_substitution_group(head));
        schema.add_attribute(XsdAttribute::new(schema.qname("lang")));
        schema
    }

    struct Counting<'c>(&'c Cell<usize>);

    impl UnaryExpression for Counting<'_> {
        fn evaluate(&self) -> Result<Option<XsdValue>> {
            self.0.set(self.0.get() + 1);
            Ok(None)
        }
    }

    #[test]
    fn test_get_element() {
        let schema = sample_schema();
        let proxy = XmlSchemaProxy::new(&schema);
        let foo = proxy.get_element(&QName::namespaced(NS, "foo")).unwrap();
        assert_eq!(foo.name.local_name, "foo");
        assert!(proxy.get_element(&QName::namespaced(NS, "bar")).is_none());
        assert!(proxy.get_element(&QName::local("foo")).is_none());
    }

    #[test]
    fn test_get_attribute_and_type() {
        let schema = sample_schema();
        let proxy = XmlSchemaProxy::new(&schema);
        assert!(proxy.get_attribute(&QName::namespaced(NS, "lang")).is_some());
        assert!(proxy.get_attribute(&QName::namespaced(NS, "foo")).is_none());
        assert!(proxy.get_type(&QName::namespaced(NS, "intType")).is_some());
        assert!(proxy
            .get_type(&"{http://www.w3.org/2001/XMLSchema}string".parse().unwrap())
            .is_some());
        assert!(proxy.get_type(&QName::namespaced(NS, "foo")).is_none());
    }

    #[test]
    fn test_substitution_group() {
        let schema = sample_schema();
        let proxy = XmlSchemaProxy::new(&schema);
        let group = proxy.get_substitution_group(&QName::namespaced(NS, "foo")).unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group[0].name, QName::namespaced(NS, "baz"));
        assert!(proxy.get_substitution_group(&QName::namespaced(NS, "baz")).is_none());
    }

    #[test]
    fn test_is_instance() {
        let schema = sample_schema();
        let proxy = XmlSchemaProxy::new(&schema);
        let int_type = QName::namespaced(NS, "intType");

        assert!(proxy.is_instance(&XsdValue::Integer(5), &int_type).unwrap());
        assert!(!proxy.is_instance(&XsdValue::from("x"), &int_type).unwrap());
        assert!(!proxy.is_instance(&XsdValue::Integer(-1), &int_type).unwrap());

        let err = proxy
            .is_instance(&XsdValue::Integer(5), &QName::namespaced(NS, "missing"))
            .unwrap_err();
        assert!(err.is_key_error());
    }

    #[test]
    fn test_cast_as_does_not_evaluate() {
        let schema = sample_schema();
        let proxy = XmlSchemaProxy::new(&schema);
        let calls = Cell::new(0);
        let result = proxy.cast_as(&Counting(&calls), &QName::namespaced(NS, "intType"), true);
        assert!(matches!(result, Err(Error::NotImplemented(_))));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_proxy_is_copy_and_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<XmlSchemaProxy<'static>>();

        let schema = sample_schema();
        let proxy = XmlSchemaProxy::new(&schema);
        let copy = proxy;
        assert!(std::ptr::eq(proxy.schema(), copy.schema()));
    }

    #[test]
    fn test_dyn_schema_maps() {
        let schema = sample_schema();
        let maps: &dyn SchemaMaps = &schema.maps;
        let proxy = XmlSchemaProxy::new(maps);
        assert!(proxy.get_element(&QName::namespaced(NS, "foo")).is_some());
    }

    proptest! {
        #[test]
        fn prop_undeclared_names_miss(local in "[a-z][a-z0-9]{0,8}x") {
            // Declared names in the sample schema never end in 'x'
            let schema = sample_schema();
            let proxy = XmlSchemaProxy::new(&schema);
            let qname = QName::namespaced(NS, local);
            prop_assert!(proxy.get_attribute(&qname).is_none());
            prop_assert!(proxy.get_element(&qname).is_none());
            prop_assert!(proxy.get_type(&qname).is_none());
            prop_assert!(proxy.get_substitution_group(&qname).is_none());
            prop_assert!(proxy.is_instance(&XsdValue::Integer(1), &qname).unwrap_err().is_key_error());
        }

        #[test]
        fn prop_is_instance_is_repeatable(n in any::<i64>()) {
            let schema = sample_schema();
            let proxy = XmlSchemaProxy::new(&schema);
            let int_type = QName::namespaced(NS, "intType");
            let value = XsdValue::from(n);
            let first = proxy.is_instance(&value, &int_type).unwrap();
            prop_assert_eq!(first, proxy.is_instance(&value, &int_type).unwrap());
            prop_assert_eq!(first, (0..=i64::from(i32::MAX)).contains(&n));
        }
    }
}
