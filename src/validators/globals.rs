//! Global XSD declarations management
//!
//! This module provides the XsdGlobals container that holds the global
//! declarations of a schema (types, elements, attributes and substitution
//! groups) and the [`SchemaMaps`] lookup trait that schema backends implement.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::namespaces::QName;

use super::builtins::{XsdValue, BUILTIN_TYPES, XSD_ANY_TYPE, XSD_NAMESPACE};
use super::complex_types::{ComplexContent, XsdComplexType};
use super::elements::XsdElement;
use super::attributes::XsdAttribute;
use super::simple_types::XsdSimpleType;

/// Type map - maps QNames to global types
pub type TypeMap = IndexMap<QName, GlobalType>;
/// Attribute map - maps QNames to global attribute declarations
pub type AttributeMap = IndexMap<QName, Arc<XsdAttribute>>;
/// Element map - maps QNames to global element declarations
pub type ElementMap = IndexMap<QName, Arc<XsdElement>>;
/// Substitution group map - maps head element QNames to substitute elements
pub type SubstitutionGroupMap = IndexMap<QName, Vec<Arc<XsdElement>>>;

/// A global type - either simple or complex
#[derive(Debug, Clone)]
pub enum GlobalType {
    /// Simple type
    Simple(Arc<XsdSimpleType>),
    /// Complex type
    Complex(Arc<XsdComplexType>),
}

impl GlobalType {
    /// Check if this is a simple type
    pub fn is_simple(&self) -> bool {
        matches!(self, GlobalType::Simple(_))
    }

    /// Check if this is a complex type
    pub fn is_complex(&self) -> bool {
        matches!(self, GlobalType::Complex(_))
    }

    /// Get the type name
    pub fn name(&self) -> Option<&QName> {
        match self {
            GlobalType::Simple(t) => t.name(),
            GlobalType::Complex(t) => t.name.as_ref(),
        }
    }

    /// Get as simple type
    pub fn as_simple(&self) -> Option<&Arc<XsdSimpleType>> {
        match self {
            GlobalType::Simple(t) => Some(t),
            GlobalType::Complex(_) => None,
        }
    }

    /// Get as complex type
    pub fn as_complex(&self) -> Option<&Arc<XsdComplexType>> {
        match self {
            GlobalType::Simple(_) => None,
            GlobalType::Complex(t) => Some(t),
        }
    }

    /// Check whether an atomic value is an instance of this type
    pub fn is_valid(&self, value: &XsdValue) -> bool {
        match self {
            GlobalType::Simple(t) => t.is_valid(value),
            GlobalType::Complex(t) => t.is_valid(value),
        }
    }

    /// Check if both handles point at the same component
    pub fn ptr_eq(&self, other: &GlobalType) -> bool {
        match (self, other) {
            (GlobalType::Simple(a), GlobalType::Simple(b)) => Arc::ptr_eq(a, b),
            (GlobalType::Complex(a), GlobalType::Complex(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<XsdSimpleType>> for GlobalType {
    fn from(t: Arc<XsdSimpleType>) -> Self {
        GlobalType::Simple(t)
    }
}

impl From<Arc<XsdComplexType>> for GlobalType {
    fn from(t: Arc<XsdComplexType>) -> Self {
        GlobalType::Complex(t)
    }
}

/// Read access to the global declarations of a schema, keyed by QName.
///
/// Lookups hand out the stored components themselves and never copy them.
pub trait SchemaMaps {
    /// Look up a global attribute declaration
    fn lookup_attribute(&self, name: &QName) -> Option<&Arc<XsdAttribute>>;

    /// Look up a global element declaration
    fn lookup_element(&self, name: &QName) -> Option<&Arc<XsdElement>>;

    /// Look up a global type definition
    fn lookup_type(&self, name: &QName) -> Option<&GlobalType>;

    /// Look up the members of the substitution group headed by `head`
    fn lookup_substitution_group(&self, head: &QName) -> Option<&[Arc<XsdElement>]>;
}

/// Container of the global declarations of a schema
#[derive(Debug, Clone)]
pub struct XsdGlobals {
    /// Global type definitions (simple and complex)
    pub types: TypeMap,
    /// Global attribute declarations
    pub attributes: AttributeMap,
    /// Global element declarations
    pub elements: ElementMap,
    /// Substitution groups (head element -> substitutes)
    pub substitution_groups: SubstitutionGroupMap,
}

impl XsdGlobals {
    /// Create globals holding only the XSD built-in types
    pub fn new() -> Self {
        let mut types = TypeMap::new();
        for builtin in BUILTIN_TYPES.iter() {
            let name = QName::namespaced(XSD_NAMESPACE, builtin.name);
            let typ = if builtin.name == XSD_ANY_TYPE {
                GlobalType::Complex(Arc::new(XsdComplexType::new(
                    Some(name.clone()),
                    ComplexContent::Mixed,
                )))
            } else {
                match XsdSimpleType::builtin(builtin.name) {
                    Ok(t) => GlobalType::Simple(Arc::new(t)),
                    Err(_) => continue,
                }
            };
            types.insert(name, typ);
        }

        Self {
            types,
            attributes: AttributeMap::new(),
            elements: ElementMap::new(),
            substitution_groups: SubstitutionGroupMap::new(),
        }
    }

    /// Look up a built-in type by local name
    pub fn builtin_type(&self, local_name: &str) -> Option<&GlobalType> {
        self.types.get(&QName::namespaced(XSD_NAMESPACE, local_name))
    }

    /// Look up a simple type by name
    pub fn lookup_simple_type(&self, name: &QName) -> Option<&Arc<XsdSimpleType>> {
        self.types.get(name).and_then(|t| t.as_simple())
    }

    /// Look up a complex type by name
    pub fn lookup_complex_type(&self, name: &QName) -> Option<&Arc<XsdComplexType>> {
        self.types.get(name).and_then(|t| t.as_complex())
    }

    /// Check if an element is a member of the substitution group of `head`
    pub fn is_substitutable(&self, element: &QName, head: &QName) -> bool {
        self.substitution_groups
            .get(head)
            .map_or(false, |group| group.iter().any(|e| e.name == *element))
    }

    // ========== Registration ==========

    /// Register a global type
    pub fn register_type(&mut self, name: QName, typ: GlobalType) {
        debug!(type_name = %name, simple = typ.is_simple(), "registering global type");
        self.types.insert(name, typ);
    }

    /// Register a simple type
    pub fn register_simple_type(&mut self, name: QName, typ: Arc<XsdSimpleType>) {
        self.register_type(name, GlobalType::Simple(typ));
    }

    /// Register a complex type
    pub fn register_complex_type(&mut self, name: QName, typ: Arc<XsdComplexType>) {
        self.register_type(name, GlobalType::Complex(typ));
    }

    /// Register an element, adding it to its substitution group if it names a head
    pub fn register_element(&mut self, name: QName, element: Arc<XsdElement>) {
        debug!(element = %name, "registering global element");
        if let Some(head) = &element.substitution_group {
            debug!(element = %name, head = %head, "adding substitution group member");
            self.substitution_groups
                .entry(head.clone())
                .or_default()
                .push(Arc::clone(&element));
        }
        self.elements.insert(name, element);
    }

    /// Register an attribute
    pub fn register_attribute(&mut self, name: QName, attr: Arc<XsdAttribute>) {
        debug!(attribute = %name, "registering global attribute");
        self.attributes.insert(name, attr);
    }

    /// Replace an already registered element, keeping its position and
    /// substitution group membership in step.
    pub(crate) fn replace_element(&mut self, element: Arc<XsdElement>) -> Result<()> {
        let name = element.name.clone();
        if let Some(head) = &element.substitution_group {
            if let Some(group) = self.substitution_groups.get_mut(head) {
                for member in group.iter_mut().filter(|m| m.name == name) {
                    *member = Arc::clone(&element);
                }
            }
        }
        if let Some(slot) = self.elements.get_mut(&name) {
            *slot = element;
            Ok(())
        } else {
            Err(Error::Key(format!("element {} is not registered", name)))
        }
    }

    // ========== Statistics ==========

    /// Number of declarations registered beyond the built-in types
    pub fn total_globals(&self) -> usize {
        self.types.len() - BUILTIN_TYPES.len() + self.elements.len() + self.attributes.len()
    }

    /// Get number of types, built-ins included
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Get number of elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Get number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

impl Default for XsdGlobals {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaMaps for XsdGlobals {
    fn lookup_attribute(&self, name: &QName) -> Option<&Arc<XsdAttribute>> {
        self.attributes.get(name)
    }

    fn lookup_element(&self, name: &QName) -> Option<&Arc<XsdElement>> {
        self.elements.get(name)
    }

    fn lookup_type(&self, name: &QName) -> Option<&GlobalType> {
        self.types.get(name)
    }

    fn lookup_substitution_group(&self, head: &QName) -> Option<&[Arc<XsdElement>]> {
        self.substitution_groups.get(head).map(Vec::as_slice)
    }
}
