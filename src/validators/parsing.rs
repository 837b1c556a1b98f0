//! XSD Document Parsing
//!
//! This module loads the top-level declarations of an XSD document into an
//! [`XsdSchema`]. Loading runs in two passes: the first collects the global
//! declarations by name, the second builds them, resolving type references
//! on demand so that a declaration may refer to one that appears later in
//! the document.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::attributes::XsdAttribute;
use super::builtins::{get_builtin_type, XSD_ANY_TYPE, XSD_NAMESPACE};
use super::complex_types::{ComplexContent, XsdComplexType};
use super::elements::XsdElement;
use super::facets::{
    BoundFacet, BoundKind, EnumerationFacet, FractionDigitsFacet, LengthFacet, MaxLengthFacet,
    MinLengthFacet, PatternFacet, TotalDigitsFacet, WhiteSpace,
};
use super::globals::GlobalType;
use super::schemas::XsdSchema;
use super::simple_types::{FacetSet, XsdSimpleType};

use crate::documents::{Document, Element};
use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::names::validate_ncname;
use crate::namespaces::QName;

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const GROUP: &str = "group";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANNOTATION: &str = "annotation";
    pub const IMPORT: &str = "import";
    pub const INCLUDE: &str = "include";
    pub const REDEFINE: &str = "redefine";
    pub const OVERRIDE: &str = "override";
    pub const NOTATION: &str = "notation";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    // Facets
    pub const LENGTH: &str = "length";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const PATTERN: &str = "pattern";
    pub const ENUMERATION: &str = "enumeration";
    pub const WHITE_SPACE: &str = "whiteSpace";
    pub const MIN_INCLUSIVE: &str = "minInclusive";
    pub const MIN_EXCLUSIVE: &str = "minExclusive";
    pub const MAX_INCLUSIVE: &str = "maxInclusive";
    pub const MAX_EXCLUSIVE: &str = "maxExclusive";
    pub const TOTAL_DIGITS: &str = "totalDigits";
    pub const FRACTION_DIGITS: &str = "fractionDigits";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const NILLABLE: &str = "nillable";
    pub const DEFAULT: &str = "default";
    pub const FIXED: &str = "fixed";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const MIXED: &str = "mixed";
    pub const ABSTRACT: &str = "abstract";
    pub const SUBSTITUTION_GROUP: &str = "substitutionGroup";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const ITEM_TYPE: &str = "itemType";
    pub const MEMBER_TYPES: &str = "memberTypes";
}

fn parse_error(message: impl Into<String>) -> Error {
    Error::Parse(ParseError::new(message))
}

fn parse_bool(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}

fn is_xsd(elem: &Element, local_name: &str) -> bool {
    elem.is(XSD_NAMESPACE, local_name)
}

fn xsd_children<'e>(elem: &'e Element) -> impl Iterator<Item = &'e Element> {
    elem.children
        .iter()
        .filter(|c| c.namespace() == Some(XSD_NAMESPACE))
}

fn has_model_group(elem: &Element) -> bool {
    xsd_children(elem).any(|c| {
        matches!(
            c.local_name(),
            xsd_elements::SEQUENCE | xsd_elements::CHOICE | xsd_elements::ALL | xsd_elements::GROUP
        )
    })
}

impl XsdSchema {
    /// Parse an XSD schema from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::from_string_with_limits(xml, &Limits::default())
    }

    /// Parse an XSD schema from a string with custom limits
    pub fn from_string_with_limits(xml: &str, limits: &Limits) -> Result<Self> {
        let doc = Document::parse(xml.as_bytes(), limits)?;
        Self::from_document(&doc, limits)
    }

    /// Parse an XSD schema from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_limits(path, &Limits::default())
    }

    /// Parse an XSD schema from a file path with custom limits
    pub fn from_file_with_limits(path: impl AsRef<Path>, limits: &Limits) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading schema file");
        let content = std::fs::read(path)?;
        Document::parse(&content, limits)
            .and_then(|doc| Self::from_document(&doc, limits))
            .map_err(|e| match e {
                Error::Parse(pe) => Error::Parse(pe.with_location(path.display().to_string())),
                Error::Xml(msg) => Error::Xml(format!("{}: {}", path.display(), msg)),
                other => other,
            })
    }

    /// Build a schema from a parsed XSD document
    pub fn from_document(doc: &Document, limits: &Limits) -> Result<Self> {
        let root = doc.root().ok_or_else(|| parse_error("Empty document"))?;

        if !is_xsd(root, xsd_elements::SCHEMA) {
            return Err(parse_error(format!(
                "Expected xs:schema root element, got {}",
                root.qname
            )));
        }

        let mut schema = XsdSchema::new();
        schema.namespaces.extend(&root.namespaces);
        schema.target_namespace = root
            .get_attribute(xsd_attrs::TARGET_NAMESPACE)
            .map(str::to_string);
        debug!(
            target_namespace = schema.target_namespace.as_deref().unwrap_or(""),
            "loading schema declarations"
        );

        let mut loader = SchemaLoader::new(schema.target_namespace.clone());
        loader.collect(root)?;
        limits.check_schema_components(loader.component_count())?;
        loader.build(&mut schema)?;

        debug!(
            types = schema.maps.type_count(),
            elements = schema.maps.element_count(),
            attributes = schema.maps.attribute_count(),
            "schema loaded"
        );
        Ok(schema)
    }
}

/// Two-pass loader state for one schema document
struct SchemaLoader<'d> {
    target_namespace: Option<String>,
    type_decls: IndexMap<QName, &'d Element>,
    element_decls: Vec<(QName, &'d Element)>,
    attribute_decls: Vec<(QName, &'d Element)>,
    built_types: HashMap<QName, GlobalType>,
    in_progress: HashSet<QName>,
}

impl<'d> SchemaLoader<'d> {
    fn new(target_namespace: Option<String>) -> Self {
        Self {
            target_namespace,
            type_decls: IndexMap::new(),
            element_decls: Vec::new(),
            attribute_decls: Vec::new(),
            built_types: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn component_count(&self) -> usize {
        self.type_decls.len() + self.element_decls.len() + self.attribute_decls.len()
    }

    /// Declared name of a global component, qualified by the target namespace
    fn declared_name(&self, elem: &Element) -> Result<QName> {
        let name = elem.get_attribute(xsd_attrs::NAME).ok_or_else(|| {
            parse_error(format!("Global {} missing 'name' attribute", elem.local_name()))
        })?;
        validate_ncname(name)?;
        Ok(QName::new(self.target_namespace.clone(), name))
    }

    // ========== Pass 1: collect ==========

    fn collect(&mut self, root: &'d Element) -> Result<()> {
        for child in xsd_children(root) {
            match child.local_name() {
                xsd_elements::SIMPLE_TYPE | xsd_elements::COMPLEX_TYPE => {
                    let name = self.declared_name(child)?;
                    if self.type_decls.insert(name.clone(), child).is_some() {
                        return Err(parse_error(format!("Duplicate type definition: {}", name)));
                    }
                }
                xsd_elements::ELEMENT => {
                    let name = self.declared_name(child)?;
                    self.element_decls.push((name, child));
                }
                xsd_elements::ATTRIBUTE => {
                    let name = self.declared_name(child)?;
                    if self.attribute_decls.iter().any(|(seen, _)| *seen == name) {
                        return Err(parse_error(format!(
                            "Duplicate attribute declaration: {}",
                            name
                        )));
                    }
                    self.attribute_decls.push((name, child));
                }
                xsd_elements::IMPORT
                | xsd_elements::INCLUDE
                | xsd_elements::REDEFINE
                | xsd_elements::OVERRIDE => {
                    warn!(
                        construct = child.local_name(),
                        location = child.get_attribute(xsd_attrs::SCHEMA_LOCATION).unwrap_or(""),
                        "skipping unsupported schema composition"
                    );
                }
                xsd_elements::ANNOTATION => {}
                xsd_elements::GROUP | xsd_elements::ATTRIBUTE_GROUP | xsd_elements::NOTATION => {
                    debug!(construct = child.local_name(), "skipping global declaration");
                }
                other => {
                    return Err(parse_error(format!("Unknown schema child element: {}", other)));
                }
            }
        }
        Ok(())
    }

    // ========== Pass 2: build ==========

    fn build(mut self, schema: &mut XsdSchema) -> Result<()> {
        let names: Vec<QName> = self.type_decls.keys().cloned().collect();
        for name in &names {
            self.resolve_type(schema, name)?;
        }
        // Register in declaration order
        for name in names {
            if let Some(typ) = self.built_types.remove(&name) {
                schema.maps.register_type(name, typ);
            }
        }

        for (name, decl) in std::mem::take(&mut self.attribute_decls) {
            let attribute = self.build_attribute(schema, name.clone(), decl)?;
            schema.maps.register_attribute(name, Arc::new(attribute));
        }

        for (name, decl) in std::mem::take(&mut self.element_decls) {
            if schema.maps.elements.contains_key(&name) {
                return Err(parse_error(format!("Duplicate element declaration: {}", name)));
            }
            let element = self.build_element(schema, name.clone(), decl)?;
            schema.maps.register_element(name, Arc::new(element));
        }

        inherit_head_types(schema)?;
        default_untyped_elements(schema)
    }

    /// Resolve a type reference, building the referenced declaration on first use
    fn resolve_type(&mut self, schema: &XsdSchema, name: &QName) -> Result<GlobalType> {
        if let Some(typ) = schema.maps.types.get(name).or_else(|| self.built_types.get(name)) {
            return Ok(typ.clone());
        }

        let decl = match self.type_decls.get(name) {
            Some(decl) => *decl,
            None => {
                // Unqualified references to built-in names fall back to the XSD namespace
                if name.namespace.is_none() && get_builtin_type(&name.local_name).is_some() {
                    let xsd_name = QName::namespaced(XSD_NAMESPACE, name.local_name.clone());
                    if let Some(typ) = schema.maps.types.get(&xsd_name) {
                        return Ok(typ.clone());
                    }
                }
                return Err(parse_error(format!("Unresolved type reference: {}", name)));
            }
        };

        if !self.in_progress.insert(name.clone()) {
            return Err(parse_error(format!("Circular type definition: {}", name)));
        }
        debug!(type_name = %name, "building type");
        let typ = if decl.local_name() == xsd_elements::SIMPLE_TYPE {
            GlobalType::Simple(Arc::new(self.build_simple_type(schema, Some(name.clone()), decl)?))
        } else {
            GlobalType::Complex(Arc::new(self.build_complex_type(schema, Some(name.clone()), decl)?))
        };
        self.in_progress.remove(name);
        self.built_types.insert(name.clone(), typ.clone());
        Ok(typ)
    }

    fn resolve_simple_type(&mut self, schema: &XsdSchema, name: &QName) -> Result<Arc<XsdSimpleType>> {
        match self.resolve_type(schema, name)? {
            GlobalType::Simple(t) => Ok(t),
            GlobalType::Complex(_) => Err(parse_error(format!("{} is not a simple type", name))),
        }
    }

    /// Resolve a QName-valued attribute of `elem` against its in-scope namespaces
    fn attribute_qname(elem: &Element, attr: &str) -> Result<Option<QName>> {
        elem.resolve_qname_attribute(attr)
            .map_err(|e| parse_error(format!("Invalid '{}' attribute: {}", attr, e)))
    }

    /// Simple type given either by a reference attribute or an inline xs:simpleType
    fn referenced_or_inline_simple(
        &mut self,
        schema: &XsdSchema,
        elem: &Element,
        attr: &str,
    ) -> Result<Option<Arc<XsdSimpleType>>> {
        if let Some(name) = Self::attribute_qname(elem, attr)? {
            return self.resolve_simple_type(schema, &name).map(Some);
        }
        match xsd_children(elem).find(|c| c.local_name() == xsd_elements::SIMPLE_TYPE) {
            Some(inline) => Ok(Some(Arc::new(self.build_simple_type(schema, None, inline)?))),
            None => Ok(None),
        }
    }

    fn build_simple_type(
        &mut self,
        schema: &XsdSchema,
        name: Option<QName>,
        elem: &Element,
    ) -> Result<XsdSimpleType> {
        for child in xsd_children(elem) {
            match child.local_name() {
                xsd_elements::RESTRICTION => {
                    let base = match self.referenced_or_inline_simple(schema, child, xsd_attrs::BASE)? {
                        Some(base) => base,
                        None => return Err(parse_error("simpleType restriction has no base type")),
                    };
                    let facets = parse_facets(child)?;
                    return Ok(XsdSimpleType::restriction(name, base, facets));
                }
                xsd_elements::LIST => {
                    let item = match self.referenced_or_inline_simple(schema, child, xsd_attrs::ITEM_TYPE)? {
                        Some(item) => item,
                        None => return Err(parse_error("simpleType list has no item type")),
                    };
                    return Ok(XsdSimpleType::list(name, item));
                }
                xsd_elements::UNION => {
                    let mut members = Vec::new();
                    if let Some(refs) = child.get_attribute(xsd_attrs::MEMBER_TYPES) {
                        for member in refs.split_whitespace() {
                            let member_name = child.namespaces.resolve(member)?;
                            members.push(self.resolve_simple_type(schema, &member_name)?);
                        }
                    }
                    for inline in xsd_children(child).filter(|c| c.local_name() == xsd_elements::SIMPLE_TYPE) {
                        members.push(Arc::new(self.build_simple_type(schema, None, inline)?));
                    }
                    if members.is_empty() {
                        return Err(parse_error("simpleType union has no member types"));
                    }
                    return Ok(XsdSimpleType::union(name, members));
                }
                _ => {}
            }
        }
        Err(parse_error(format!(
            "simpleType {} needs a restriction, list or union",
            name.map(|n| n.to_string()).unwrap_or_default()
        )))
    }

    fn build_complex_type(
        &mut self,
        schema: &XsdSchema,
        name: Option<QName>,
        elem: &Element,
    ) -> Result<XsdComplexType> {
        let mixed = parse_bool(elem.get_attribute(xsd_attrs::MIXED));
        let abstract_type = parse_bool(elem.get_attribute(xsd_attrs::ABSTRACT));

        let mut base_type = None;
        let mut content = if has_model_group(elem) {
            if mixed { ComplexContent::Mixed } else { ComplexContent::ElementOnly }
        } else if mixed {
            ComplexContent::Mixed
        } else {
            ComplexContent::Empty
        };

        for child in xsd_children(elem) {
            match child.local_name() {
                xsd_elements::SIMPLE_CONTENT => {
                    let derivation = derivation_of(child)?;
                    let base_name = Self::attribute_qname(derivation, xsd_attrs::BASE)?
                        .ok_or_else(|| parse_error("simpleContent derivation has no base"))?;
                    let base = match self.resolve_type(schema, &base_name)? {
                        GlobalType::Simple(t) => t,
                        GlobalType::Complex(t) => match &t.content {
                            ComplexContent::Simple(s) => Arc::clone(s),
                            _ => {
                                return Err(parse_error(format!(
                                    "simpleContent base {} has no simple content",
                                    base_name
                                )))
                            }
                        },
                    };
                    let value_type = if derivation.local_name() == xsd_elements::RESTRICTION {
                        let facets = parse_facets(derivation)?;
                        if facets.is_empty() {
                            base
                        } else {
                            Arc::new(XsdSimpleType::restriction(None, base, facets))
                        }
                    } else {
                        base
                    };
                    content = ComplexContent::Simple(value_type);
                    base_type = Some(base_name);
                }
                xsd_elements::COMPLEX_CONTENT => {
                    let derivation = derivation_of(child)?;
                    let base_name = Self::attribute_qname(derivation, xsd_attrs::BASE)?
                        .ok_or_else(|| parse_error("complexContent derivation has no base"))?;
                    let mixed = mixed || parse_bool(child.get_attribute(xsd_attrs::MIXED));
                    let base = self.resolve_type(schema, &base_name)?;
                    content = if mixed {
                        ComplexContent::Mixed
                    } else if has_model_group(derivation) {
                        ComplexContent::ElementOnly
                    } else if derivation.local_name() == xsd_elements::EXTENSION {
                        match base {
                            GlobalType::Complex(t) => t.content.clone(),
                            GlobalType::Simple(_) => {
                                return Err(parse_error(format!(
                                    "complexContent base {} is a simple type",
                                    base_name
                                )))
                            }
                        }
                    } else {
                        ComplexContent::Empty
                    };
                    base_type = Some(base_name);
                }
                _ => {}
            }
        }

        let mut typ = XsdComplexType::new(name, content).with_abstract(abstract_type);
        if let Some(base) = base_type {
            typ = typ.with_base_type(base);
        }
        Ok(typ)
    }

    fn build_attribute(&mut self, schema: &XsdSchema, name: QName, elem: &Element) -> Result<XsdAttribute> {
        let mut attribute = XsdAttribute::new(name);
        if let Some(type_name) = Self::attribute_qname(elem, xsd_attrs::TYPE)? {
            attribute = attribute.with_type_name(type_name);
        }
        if let Some(t) = self.referenced_or_inline_simple(schema, elem, xsd_attrs::TYPE)? {
            attribute = attribute.with_type(t);
        }
        if let Some(default) = elem.get_attribute(xsd_attrs::DEFAULT) {
            attribute = attribute.with_default(default);
        }
        if let Some(fixed) = elem.get_attribute(xsd_attrs::FIXED) {
            attribute = attribute.with_fixed(fixed);
        }
        Ok(attribute)
    }

    fn build_element(&mut self, schema: &XsdSchema, name: QName, elem: &Element) -> Result<XsdElement> {
        let mut element = XsdElement::new(name)
            .with_abstract(parse_bool(elem.get_attribute(xsd_attrs::ABSTRACT)))
            .with_nillable(parse_bool(elem.get_attribute(xsd_attrs::NILLABLE)));

        if let Some(type_name) = Self::attribute_qname(elem, xsd_attrs::TYPE)? {
            let typ = self.resolve_type(schema, &type_name)?;
            element = element.with_type_name(type_name).with_type(typ);
        } else if let Some(inline) = xsd_children(elem).find(|c| {
            c.local_name() == xsd_elements::SIMPLE_TYPE || c.local_name() == xsd_elements::COMPLEX_TYPE
        }) {
            let typ = if inline.local_name() == xsd_elements::SIMPLE_TYPE {
                GlobalType::Simple(Arc::new(self.build_simple_type(schema, None, inline)?))
            } else {
                GlobalType::Complex(Arc::new(self.build_complex_type(schema, None, inline)?))
            };
            element = element.with_type(typ);
        }

        if let Some(head) = Self::attribute_qname(elem, xsd_attrs::SUBSTITUTION_GROUP)? {
            element = element.with_substitution_group(head);
        }
        if let Some(default) = elem.get_attribute(xsd_attrs::DEFAULT) {
            element = element.with_default(default);
        }
        if let Some(fixed) = elem.get_attribute(xsd_attrs::FIXED) {
            element = element.with_fixed(fixed);
        }
        Ok(element)
    }
}

/// The xs:restriction or xs:extension child of a content element
fn derivation_of(content: &Element) -> Result<&Element> {
    xsd_children(content)
        .find(|c| {
            c.local_name() == xsd_elements::RESTRICTION || c.local_name() == xsd_elements::EXTENSION
        })
        .ok_or_else(|| {
            parse_error(format!("{} needs a restriction or extension", content.local_name()))
        })
}

fn facet_value(facet: &Element) -> Result<&str> {
    facet.get_attribute(xsd_attrs::VALUE).ok_or_else(|| {
        parse_error(format!("Facet {} missing 'value' attribute", facet.local_name()))
    })
}

fn facet_number<T: std::str::FromStr>(facet: &Element) -> Result<T> {
    let value = facet_value(facet)?;
    value.trim().parse().map_err(|_| {
        parse_error(format!("Invalid {} facet value: {}", facet.local_name(), value))
    })
}

/// Collect the facets declared on an xs:restriction element
fn parse_facets(restriction: &Element) -> Result<FacetSet> {
    let mut facets = FacetSet::new();
    let mut enumeration = Vec::new();

    for facet in xsd_children(restriction) {
        let bound = |kind| -> Result<BoundFacet> { BoundFacet::new(kind, facet_value(facet)?) };
        match facet.local_name() {
            xsd_elements::LENGTH => facets.length = Some(LengthFacet::new(facet_number(facet)?)),
            xsd_elements::MIN_LENGTH => {
                facets.min_length = Some(MinLengthFacet::new(facet_number(facet)?))
            }
            xsd_elements::MAX_LENGTH => {
                facets.max_length = Some(MaxLengthFacet::new(facet_number(facet)?))
            }
            xsd_elements::PATTERN => facets.patterns.push(PatternFacet::new(facet_value(facet)?)?),
            xsd_elements::ENUMERATION => enumeration.push(facet_value(facet)?.to_string()),
            xsd_elements::WHITE_SPACE => {
                facets.white_space = Some(WhiteSpace::parse(facet_value(facet)?)?)
            }
            xsd_elements::MIN_INCLUSIVE => facets.bounds.push(bound(BoundKind::MinInclusive)?),
            xsd_elements::MIN_EXCLUSIVE => facets.bounds.push(bound(BoundKind::MinExclusive)?),
            xsd_elements::MAX_INCLUSIVE => facets.bounds.push(bound(BoundKind::MaxInclusive)?),
            xsd_elements::MAX_EXCLUSIVE => facets.bounds.push(bound(BoundKind::MaxExclusive)?),
            xsd_elements::TOTAL_DIGITS => {
                facets.total_digits = Some(TotalDigitsFacet::new(facet_number(facet)?))
            }
            xsd_elements::FRACTION_DIGITS => {
                facets.fraction_digits = Some(FractionDigitsFacet::new(facet_number(facet)?))
            }
            _ => {}
        }
    }

    if !enumeration.is_empty() {
        facets.enumeration = Some(EnumerationFacet::new(enumeration));
    }
    Ok(facets)
}

/// Untyped members of a substitution group take the type of their head
fn inherit_head_types(schema: &mut XsdSchema) -> Result<()> {
    loop {
        let pending: Vec<Arc<XsdElement>> = schema
            .maps
            .elements
            .values()
            .filter(|e| e.element_type.is_none())
            .filter_map(|e| {
                let head = schema.maps.elements.get(e.substitution_group.as_ref()?)?;
                let typ = head.element_type.clone()?;
                let mut typed = XsdElement::clone(e).with_type(typ);
                typed.type_name = head.type_name.clone();
                Some(Arc::new(typed))
            })
            .collect();

        if pending.is_empty() {
            return Ok(());
        }
        for element in pending {
            debug!(element = %element.name, "inheriting type from substitution group head");
            schema.maps.replace_element(element)?;
        }
    }
}

/// Elements still without a type after inheritance are typed xs:anyType
fn default_untyped_elements(schema: &mut XsdSchema) -> Result<()> {
    let any_type = schema
        .maps
        .builtin_type(XSD_ANY_TYPE)
        .cloned()
        .ok_or_else(|| parse_error("xs:anyType is not registered"))?;
    let untyped: Vec<Arc<XsdElement>> = schema
        .maps
        .elements
        .values()
        .filter(|e| e.element_type.is_none())
        .map(|e| Arc::new(XsdElement::clone(e).with_type(any_type.clone())))
        .collect();
    for element in untyped {
        debug!(element = %element.name, "defaulting element type to xs:anyType");
        schema.maps.replace_element(element)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::builtins::XsdValue;
    use crate::validators::globals::SchemaMaps;
    use crate::validators::simple_types::SimpleTypeVariety;

    const NS: &str = "urn:example:parsing";

    fn load(body: &str) -> Result<XsdSchema> {
        XsdSchema::from_string(&format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:tns="{ns}" targetNamespace="{ns}">{body}</xs:schema>"#,
            ns = NS,
            body = body
        ))
    }

    fn qn(local: &str) -> QName {
        QName::namespaced(NS, local)
    }

    #[test]
    fn test_simple_restriction() {
        let schema = load(
            r#"<xs:simpleType name="percent">
                 <xs:restriction base="xs:int">
                   <xs:minInclusive value="0"/>
                   <xs:maxInclusive value="100"/>
                 </xs:restriction>
               </xs:simpleType>"#,
        )
        .unwrap();

        let t = schema.lookup_type(&qn("percent")).unwrap();
        assert!(t.is_valid(&XsdValue::Integer(42)));
        assert!(!t.is_valid(&XsdValue::Integer(101)));
        assert!(!t.is_valid(&XsdValue::String("x".into())));
    }

    #[test]
    fn test_forward_references() {
        let schema = load(
            r#"<xs:element name="size" type="tns:small"/>
               <xs:simpleType name="small">
                 <xs:restriction base="tns:positive"><xs:maxExclusive value="10"/></xs:restriction>
               </xs:simpleType>
               <xs:simpleType name="positive">
                 <xs:restriction base="xs:integer"><xs:minInclusive value="1"/></xs:restriction>
               </xs:simpleType>"#,
        )
        .unwrap();

        let size = schema.lookup_element(&qn("size")).unwrap();
        let t = size.element_type().unwrap();
        assert!(t.ptr_eq(schema.lookup_type(&qn("small")).unwrap()));
        assert!(t.is_valid(&XsdValue::Integer(9)));
        assert!(!t.is_valid(&XsdValue::Integer(10)));
        assert!(!t.is_valid(&XsdValue::Integer(0)));

        // Declaration order is kept in the types map
        let user_types: Vec<_> = schema
            .types()
            .filter(|(n, _)| n.namespace() == Some(NS))
            .map(|(n, _)| n.local_name.clone())
            .collect();
        assert_eq!(user_types, vec!["small", "positive"]);
    }

    #[test]
    fn test_unresolved_reference_is_parse_error() {
        let err = load(r#"<xs:element name="a" type="tns:missing"/>"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_circular_definition_is_parse_error() {
        let err = load(
            r#"<xs:simpleType name="a"><xs:restriction base="tns:b"/></xs:simpleType>
               <xs:simpleType name="b"><xs:restriction base="tns:a"/></xs:simpleType>"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_list_and_union() {
        let schema = load(
            r#"<xs:simpleType name="ints"><xs:list itemType="xs:int"/></xs:simpleType>
               <xs:simpleType name="intOrBool">
                 <xs:union memberTypes="xs:int">
                   <xs:simpleType><xs:restriction base="xs:boolean"/></xs:simpleType>
                 </xs:union>
               </xs:simpleType>"#,
        )
        .unwrap();

        let ints = schema.maps.lookup_simple_type(&qn("ints")).unwrap();
        assert_eq!(ints.variety(), SimpleTypeVariety::List);
        assert!(ints.is_valid(&XsdValue::String("1 2 3".into())));

        let union = schema.maps.lookup_simple_type(&qn("intOrBool")).unwrap();
        assert_eq!(union.member_types().len(), 2);
        assert!(union.is_valid(&XsdValue::Boolean(true)));
        assert!(union.is_valid(&XsdValue::Integer(3)));
        assert!(!union.is_valid(&XsdValue::String("maybe".into())));
    }

    #[test]
    fn test_complex_content_shapes() {
        let schema = load(
            r#"<xs:complexType name="price">
                 <xs:simpleContent>
                   <xs:extension base="xs:decimal"><xs:attribute name="currency"/></xs:extension>
                 </xs:simpleContent>
               </xs:complexType>
               <xs:complexType name="note" mixed="true">
                 <xs:sequence><xs:element name="b" type="xs:string"/></xs:sequence>
               </xs:complexType>
               <xs:complexType name="marker"/>
               <xs:complexType name="order">
                 <xs:sequence><xs:element name="item" type="xs:string"/></xs:sequence>
               </xs:complexType>"#,
        )
        .unwrap();

        let price = schema.maps.lookup_complex_type(&qn("price")).unwrap();
        assert!(price.has_simple_content());
        assert_eq!(price.base_type, Some(QName::namespaced(XSD_NAMESPACE, "decimal")));
        assert!(price.is_valid(&XsdValue::String("12.50".into())));

        let note = schema.lookup_type(&qn("note")).unwrap();
        assert!(note.is_valid(&XsdValue::String("text".into())));

        let marker = schema.lookup_type(&qn("marker")).unwrap();
        assert!(marker.is_valid(&XsdValue::Null));
        assert!(!marker.is_valid(&XsdValue::String("text".into())));

        let order = schema.lookup_type(&qn("order")).unwrap();
        assert!(!order.is_valid(&XsdValue::String("text".into())));
    }

    #[test]
    fn test_simple_content_restriction_facets() {
        let schema = load(
            r#"<xs:complexType name="base">
                 <xs:simpleContent><xs:extension base="xs:string"/></xs:simpleContent>
               </xs:complexType>
               <xs:complexType name="short">
                 <xs:simpleContent>
                   <xs:restriction base="tns:base"><xs:maxLength value="3"/></xs:restriction>
                 </xs:simpleContent>
               </xs:complexType>"#,
        )
        .unwrap();

        let t = schema.lookup_type(&qn("short")).unwrap();
        assert!(t.is_valid(&XsdValue::String("abc".into())));
        assert!(!t.is_valid(&XsdValue::String("abcd".into())));
    }

    #[test]
    fn test_elements_and_substitution_groups() {
        let schema = load(
            r#"<xs:element name="shape" type="xs:string" abstract="true"/>
               <xs:element name="circle" substitutionGroup="tns:shape"/>
               <xs:element name="square" substitutionGroup="tns:shape" nillable="true">
                 <xs:simpleType><xs:restriction base="xs:token"/></xs:simpleType>
               </xs:element>
               <xs:element name="plain" default="x"/>"#,
        )
        .unwrap();

        let shape = schema.lookup_element(&qn("shape")).unwrap();
        assert!(shape.abstract_element);

        let group = schema.lookup_substitution_group(&qn("shape")).unwrap();
        let names: Vec<_> = group.iter().map(|e| e.name.local_name.as_str()).collect();
        assert_eq!(names, vec!["circle", "square"]);

        // Untyped member inherits the head's type; the map and group agree
        let circle = schema.lookup_element(&qn("circle")).unwrap();
        assert!(circle.element_type().unwrap().ptr_eq(shape.element_type().unwrap()));
        assert!(Arc::ptr_eq(circle, &group[0]));

        let square = schema.lookup_element(&qn("square")).unwrap();
        assert!(square.nillable);
        assert!(square.type_name.is_none());

        let plain = schema.lookup_element(&qn("plain")).unwrap();
        let any_type = schema.maps.builtin_type(XSD_ANY_TYPE).unwrap();
        assert!(plain.element_type().unwrap().ptr_eq(any_type));
        assert_eq!(plain.type_name, Some(QName::namespaced(XSD_NAMESPACE, "anyType")));
        assert!(plain.element_type().unwrap().is_valid(&XsdValue::Integer(3)));
        assert_eq!(plain.default.as_deref(), Some("x"));
    }

    #[test]
    fn test_global_attributes() {
        let schema = load(
            r#"<xs:attribute name="lang" type="xs:language" default="en"/>
               <xs:attribute name="level">
                 <xs:simpleType>
                   <xs:restriction base="xs:string">
                     <xs:enumeration value="low"/><xs:enumeration value="high"/>
                   </xs:restriction>
                 </xs:simpleType>
               </xs:attribute>"#,
        )
        .unwrap();

        let lang = schema.lookup_attribute(&qn("lang")).unwrap();
        assert_eq!(lang.default(), Some("en"));
        assert_eq!(lang.type_name, Some(QName::namespaced(XSD_NAMESPACE, "language")));

        let level = schema.lookup_attribute(&qn("level")).unwrap();
        assert!(level.is_valid(&XsdValue::String("low".into())));
        assert!(!level.is_valid(&XsdValue::String("medium".into())));
    }

    #[test]
    fn test_imports_are_skipped() {
        let schema = load(
            r#"<xs:import namespace="urn:other" schemaLocation="other.xsd"/>
               <xs:include schemaLocation="more.xsd"/>
               <xs:annotation><xs:documentation>docs</xs:documentation></xs:annotation>
               <xs:element name="root" type="xs:string"/>"#,
        )
        .unwrap();
        assert_eq!(schema.maps.element_count(), 1);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            XsdSchema::from_string("<root/>"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            load(r#"<xs:element name="1bad" type="xs:string"/>"#),
            Err(Error::Name(_))
        ));
        assert!(matches!(
            load(r#"<xs:element type="xs:string"/>"#),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            load(r#"<xs:simpleType name="t"><xs:restriction base="xs:int"><xs:length value="x"/></xs:restriction></xs:simpleType>"#),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_declarations() {
        let attributes = load(
            r#"<xs:attribute name="lang" type="xs:language"/>
               <xs:attribute name="lang" type="xs:string"/>"#,
        );
        assert!(matches!(attributes, Err(Error::Parse(_))));

        let elements = load(
            r#"<xs:element name="note" type="xs:string"/>
               <xs:element name="note" type="xs:int"/>"#,
        );
        assert!(matches!(elements, Err(Error::Parse(_))));

        // Same local name in different symbol spaces is fine
        let mixed = load(
            r#"<xs:attribute name="note" type="xs:string"/>
               <xs:element name="note" type="xs:string"/>"#,
        )
        .unwrap();
        assert!(mixed.lookup_attribute(&qn("note")).is_some());
        assert!(mixed.lookup_element(&qn("note")).is_some());
    }

    #[test]
    fn test_component_limit() {
        let xml = format!(
            r#"<xs:schema xmlns:xs="{}">
                 <xs:element name="a"/><xs:element name="b"/><xs:element name="c"/>
               </xs:schema>"#,
            XSD_NAMESPACE
        );
        let limits = Limits::default().with_max_schema_components(2);
        assert!(matches!(
            XsdSchema::from_string_with_limits(&xml, &limits),
            Err(Error::LimitExceeded(_))
        ));
        assert!(XsdSchema::from_string_with_limits(&xml, &Limits::permissive()).is_ok());
    }

    #[test]
    fn test_no_target_namespace() {
        let xml = format!(
            r#"<xs:schema xmlns:xs="{}">
                 <xs:simpleType name="code"><xs:restriction base="string"/></xs:simpleType>
               </xs:schema>"#,
            XSD_NAMESPACE
        );
        let schema = XsdSchema::from_string(&xml).unwrap();
        assert!(schema.target_namespace.is_none());
        let code = schema.lookup_type(&QName::local("code")).unwrap();
        assert!(code.is_valid(&XsdValue::String("anything".into())));
    }
}
