//! XSD Simple Type validators
//!
//! This module implements XSD simple types:
//! - Atomic types (built-in and restrictions of them)
//! - List types (whitespace-separated lists)
//! - Union types (value matching any member type)
//!
//! See: https://www.w3.org/TR/xmlschema-2/

use crate::error::{Error, Result, ValidationError};
use crate::namespaces::QName;
use crate::validators::builtins::{get_builtin_type, BuiltinType, XsdValue, XSD_NAMESPACE};
use crate::validators::facets::{
    BoundFacet, EnumerationFacet, FractionDigitsFacet, LengthFacet, MaxLengthFacet,
    MinLengthFacet, PatternFacet, TotalDigitsFacet, WhiteSpace,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// Simple Type Variety
// =============================================================================

/// Variety of a simple type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleTypeVariety {
    /// Atomic type (single value)
    Atomic,
    /// List type (whitespace-separated values)
    List,
    /// Union type (value matches one of several types)
    Union,
}

// =============================================================================
// Facet Container
// =============================================================================

/// Container for all facets that can constrain a simple type
#[derive(Debug, Clone, Default)]
pub struct FacetSet {
    /// Length facet
    pub length: Option<LengthFacet>,
    /// Minimum length facet
    pub min_length: Option<MinLengthFacet>,
    /// Maximum length facet
    pub max_length: Option<MaxLengthFacet>,
    /// Pattern facets (a value must match one of them)
    pub patterns: Vec<PatternFacet>,
    /// Enumeration facet
    pub enumeration: Option<EnumerationFacet>,
    /// White space handling
    pub white_space: Option<WhiteSpace>,
    /// Range facets
    pub bounds: Vec<BoundFacet>,
    /// Total digits facet
    pub total_digits: Option<TotalDigitsFacet>,
    /// Fraction digits facet
    pub fraction_digits: Option<FractionDigitsFacet>,
}

impl FacetSet {
    /// Create an empty facet set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no facet is set
    pub fn is_empty(&self) -> bool {
        self.length.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.patterns.is_empty()
            && self.enumeration.is_none()
            && self.white_space.is_none()
            && self.bounds.is_empty()
            && self.total_digits.is_none()
            && self.fraction_digits.is_none()
    }

    /// Validate a normalized lexical value.
    ///
    /// `length` is measured by the caller: characters for strings, octets for
    /// binary types, items for lists.
    pub fn validate(&self, value: &str, length: usize) -> Result<()> {
        if let Some(f) = &self.length {
            f.validate(length)?;
        }
        if let Some(f) = &self.min_length {
            f.validate(length)?;
        }
        if let Some(f) = &self.max_length {
            f.validate(length)?;
        }

        if !self.patterns.is_empty() && !self.patterns.iter().any(|p| p.is_match(value)) {
            // Report against the first pattern
            self.patterns[0].validate(value)?;
        }

        if let Some(f) = &self.enumeration {
            f.validate(value)?;
        }

        for bound in &self.bounds {
            bound.validate(value)?;
        }

        if self.total_digits.is_some() || self.fraction_digits.is_some() {
            let d = Decimal::from_str(value).map_err(|_| {
                Error::Value(format!("digits facets only apply to decimals, got '{}'", value))
            })?;
            if let Some(f) = &self.total_digits {
                f.validate(&d)?;
            }
            if let Some(f) = &self.fraction_digits {
                f.validate(&d)?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// Simple Type
// =============================================================================

#[derive(Debug, Clone)]
enum SimpleTypeKind {
    Builtin(&'static BuiltinType),
    Restriction {
        base: Arc<XsdSimpleType>,
        facets: FacetSet,
    },
    List {
        item_type: Arc<XsdSimpleType>,
    },
    Union {
        member_types: Vec<Arc<XsdSimpleType>>,
    },
}

/// An XSD simple type definition
#[derive(Debug, Clone)]
pub struct XsdSimpleType {
    /// Type name (None for anonymous types)
    name: Option<QName>,
    kind: SimpleTypeKind,
}

impl XsdSimpleType {
    /// Create a built-in type by local name
    pub fn builtin(local_name: &str) -> Result<Self> {
        let builtin = get_builtin_type(local_name)
            .ok_or_else(|| Error::Type(format!("Unknown built-in type: {}", local_name)))?;
        Ok(Self {
            name: Some(QName::namespaced(XSD_NAMESPACE, builtin.name)),
            kind: SimpleTypeKind::Builtin(builtin),
        })
    }

    /// Create a restriction of a base type
    pub fn restriction(name: Option<QName>, base: Arc<XsdSimpleType>, facets: FacetSet) -> Self {
        Self {
            name,
            kind: SimpleTypeKind::Restriction { base, facets },
        }
    }

    /// Create a list type
    pub fn list(name: Option<QName>, item_type: Arc<XsdSimpleType>) -> Self {
        Self {
            name,
            kind: SimpleTypeKind::List { item_type },
        }
    }

    /// Create a union type
    pub fn union(name: Option<QName>, member_types: Vec<Arc<XsdSimpleType>>) -> Self {
        Self {
            name,
            kind: SimpleTypeKind::Union { member_types },
        }
    }

    /// Type name
    pub fn name(&self) -> Option<&QName> {
        self.name.as_ref()
    }

    /// Type variety
    pub fn variety(&self) -> SimpleTypeVariety {
        match &self.kind {
            SimpleTypeKind::Builtin(_) => SimpleTypeVariety::Atomic,
            SimpleTypeKind::Restriction { base, .. } => base.variety(),
            SimpleTypeKind::List { .. } => SimpleTypeVariety::List,
            SimpleTypeKind::Union { .. } => SimpleTypeVariety::Union,
        }
    }

    /// Base type of a restriction
    pub fn base_type(&self) -> Option<&Arc<XsdSimpleType>> {
        match &self.kind {
            SimpleTypeKind::Restriction { base, .. } => Some(base),
            _ => None,
        }
    }

    /// Facets declared directly on this type
    pub fn facets(&self) -> Option<&FacetSet> {
        match &self.kind {
            SimpleTypeKind::Restriction { facets, .. } => Some(facets),
            _ => None,
        }
    }

    /// Built-in primitive ancestor of an atomic type
    pub fn primitive_type(&self) -> Option<&'static BuiltinType> {
        match &self.kind {
            SimpleTypeKind::Builtin(builtin) => get_builtin_type(builtin.primitive).or(Some(builtin)),
            SimpleTypeKind::Restriction { base, .. } => base.primitive_type(),
            _ => None,
        }
    }

    /// Item type of a list (looking through restrictions)
    pub fn item_type(&self) -> Option<&Arc<XsdSimpleType>> {
        match &self.kind {
            SimpleTypeKind::List { item_type } => Some(item_type),
            SimpleTypeKind::Restriction { base, .. } => base.item_type(),
            _ => None,
        }
    }

    /// Member types of a union (looking through restrictions)
    pub fn member_types(&self) -> &[Arc<XsdSimpleType>] {
        match &self.kind {
            SimpleTypeKind::Union { member_types } => member_types,
            SimpleTypeKind::Restriction { base, .. } => base.member_types(),
            _ => &[],
        }
    }

    /// Effective white space handling
    pub fn white_space(&self) -> WhiteSpace {
        match &self.kind {
            SimpleTypeKind::Builtin(builtin) => builtin.white_space,
            SimpleTypeKind::Restriction { base, facets } => {
                facets.white_space.unwrap_or_else(|| base.white_space())
            }
            SimpleTypeKind::List { .. } | SimpleTypeKind::Union { .. } => WhiteSpace::Collapse,
        }
    }

    fn describe(&self) -> String {
        self.name
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "anonymous simple type".to_string())
    }

    /// Validate a lexical value and return its typed value
    pub fn validate(&self, value: &str) -> Result<XsdValue> {
        match &self.kind {
            SimpleTypeKind::Builtin(builtin) => builtin.validate(value),
            SimpleTypeKind::Restriction { base, facets } => {
                let normalized = self.white_space().normalize(value);
                let typed = base.validate(&normalized)?;
                let length = match (&typed, self.variety()) {
                    (_, SimpleTypeVariety::List) => normalized.split_whitespace().count(),
                    (XsdValue::Binary(bytes), _) => bytes.len(),
                    _ => normalized.chars().count(),
                };
                facets.validate(&normalized, length).map_err(|e| match e {
                    Error::Validation(v) => Error::Validation(
                        v.with_schema_component(self.describe())
                            .with_instance(normalized.clone()),
                    ),
                    other => other,
                })?;
                Ok(typed)
            }
            SimpleTypeKind::List { item_type } => {
                let normalized = WhiteSpace::Collapse.normalize(value);
                for item in normalized.split_whitespace() {
                    item_type.validate(item)?;
                }
                Ok(XsdValue::String(normalized))
            }
            SimpleTypeKind::Union { member_types } => member_types
                .iter()
                .find_map(|member| member.validate(value).ok())
                .ok_or_else(|| {
                    Error::Validation(
                        ValidationError::new("value matches no member of the union")
                            .with_schema_component(self.describe())
                            .with_instance(value),
                    )
                }),
        }
    }

    /// Check whether an atomic value is valid for this type
    ///
    /// Untyped strings are checked by lexical form. Typed values must also
    /// belong to the value space of the type's primitive ancestor.
    pub fn is_valid(&self, value: &XsdValue) -> bool {
        match value {
            XsdValue::Null => false,
            XsdValue::String(s) => self.validate(s).is_ok(),
            typed => match self.variety() {
                SimpleTypeVariety::Atomic => match self.primitive_type() {
                    Some(primitive) => {
                        typed.fits_primitive(primitive.name)
                            && self.validate(&typed.lexical_form(primitive.name)).is_ok()
                    }
                    None => false,
                },
                SimpleTypeVariety::List => {
                    self.item_type().map_or(false, |item| item.is_valid(typed))
                        && self.validate(&typed.to_string()).is_ok()
                }
                SimpleTypeVariety::Union => {
                    let members = self.member_types();
                    members.iter().any(|m| m.is_valid(typed))
                        && (self.facets().map_or(true, FacetSet::is_empty)
                            || self.validate(&typed.to_string()).is_ok())
                }
            },
        }
    }
}
