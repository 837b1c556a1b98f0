//! XSD constraining facets
//!
//! This module implements XSD facets that constrain simple types.

use crate::error::{Error, Result, ValidationError};
use regex::Regex;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// White space handling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
    /// Preserve all white space
    Preserve,
    /// Replace tabs and newlines with spaces
    Replace,
    /// Replace and collapse multiple spaces
    Collapse,
}

impl WhiteSpace {
    /// Parse from the facet's `value` attribute
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "preserve" => Ok(WhiteSpace::Preserve),
            "replace" => Ok(WhiteSpace::Replace),
            "collapse" => Ok(WhiteSpace::Collapse),
            _ => Err(Error::Value(format!(
                "Invalid whiteSpace value: '{}'. Must be 'preserve', 'replace', or 'collapse'",
                s
            ))),
        }
    }

    /// Normalize a string according to this white space mode
    pub fn normalize(&self, s: &str) -> String {
        match self {
            WhiteSpace::Preserve => s.to_string(),
            WhiteSpace::Replace => s.replace(['\t', '\n', '\r'], " "),
            WhiteSpace::Collapse => s.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }
}

fn facet_error(message: String, reason: String) -> Error {
    Error::Validation(ValidationError::new(message).with_reason(reason))
}

/// Length facet constrains the exact length of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthFacet {
    /// Required length
    pub value: usize,
}

impl LengthFacet {
    /// Create a new length facet
    pub fn new(value: usize) -> Self {
        Self { value }
    }

    /// Validate a measured length against this facet
    pub fn validate(&self, len: usize) -> Result<()> {
        if len != self.value {
            Err(facet_error(
                format!("Length must be exactly {}", self.value),
                format!("Actual length: {}", len),
            ))
        } else {
            Ok(())
        }
    }
}

/// Minimum length facet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLengthFacet {
    /// Minimum length
    pub value: usize,
}

impl MinLengthFacet {
    /// Create a new minimum length facet
    pub fn new(value: usize) -> Self {
        Self { value }
    }

    /// Validate a measured length against this facet
    pub fn validate(&self, len: usize) -> Result<()> {
        if len < self.value {
            Err(facet_error(
                format!("Length must be at least {}", self.value),
                format!("Actual length: {}", len),
            ))
        } else {
            Ok(())
        }
    }
}

/// Maximum length facet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLengthFacet {
    /// Maximum length
    pub value: usize,
}

impl MaxLengthFacet {
    /// Create a new maximum length facet
    pub fn new(value: usize) -> Self {
        Self { value }
    }

    /// Validate a measured length against this facet
    pub fn validate(&self, len: usize) -> Result<()> {
        if len > self.value {
            Err(facet_error(
                format!("Length must be at most {}", self.value),
                format!("Actual length: {}", len),
            ))
        } else {
            Ok(())
        }
    }
}

/// Pattern facet using regular expressions
///
/// XSD patterns are implicitly anchored at both ends.
#[derive(Debug, Clone)]
pub struct PatternFacet {
    /// Pattern as written in the schema
    pub pattern: String,
    /// Compiled, anchored regex
    regex: Regex,
}

impl PatternFacet {
    /// Compile a new pattern facet
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| Error::Value(format!("Invalid pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Check a lexical value against the pattern
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Validate a value against this facet
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.is_match(value) {
            Ok(())
        } else {
            Err(facet_error(
                format!("Value '{}' does not match pattern", value),
                format!("Pattern: {}", self.pattern),
            ))
        }
    }
}

/// Enumeration facet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationFacet {
    /// Allowed lexical values
    pub values: Vec<String>,
}

impl EnumerationFacet {
    /// Create a new enumeration facet
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Validate a value against this facet
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.values.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(facet_error(
                format!("Value '{}' is not in enumeration", value),
                format!("Allowed values: {:?}", self.values),
            ))
        }
    }
}

/// A bound of a range facet, compared in the numeric value space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericBound {
    /// Exact decimal bound
    Decimal(Decimal),
    /// Floating point bound (INF, -INF or out of decimal range)
    Float(f64),
}

impl NumericBound {
    /// Parse a bound from its lexical form
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(d) = Decimal::from_str(s) {
            return Ok(NumericBound::Decimal(d));
        }
        match s {
            "INF" => Ok(NumericBound::Float(f64::INFINITY)),
            "-INF" => Ok(NumericBound::Float(f64::NEG_INFINITY)),
            _ => s
                .parse::<f64>()
                .ok()
                .filter(|f| !f.is_nan())
                .map(NumericBound::Float)
                .ok_or_else(|| Error::Value(format!("Invalid numeric bound: '{}'", s))),
        }
    }

    /// Compare a value against this bound; `None` when they are unordered (NaN)
    pub fn compare(&self, value: &NumericBound) -> Option<Ordering> {
        match (value, self) {
            (NumericBound::Decimal(v), NumericBound::Decimal(b)) => Some(v.cmp(b)),
            (v, b) => v.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            NumericBound::Decimal(d) => d.to_string().parse().unwrap_or(f64::NAN),
            NumericBound::Float(f) => *f,
        }
    }
}

/// Kinds of range facet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// minInclusive
    MinInclusive,
    /// minExclusive
    MinExclusive,
    /// maxInclusive
    MaxInclusive,
    /// maxExclusive
    MaxExclusive,
}

impl BoundKind {
    fn facet_name(&self) -> &'static str {
        match self {
            BoundKind::MinInclusive => "minInclusive",
            BoundKind::MinExclusive => "minExclusive",
            BoundKind::MaxInclusive => "maxInclusive",
            BoundKind::MaxExclusive => "maxExclusive",
        }
    }
}

/// minInclusive / minExclusive / maxInclusive / maxExclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundFacet {
    /// Which bound this is
    pub kind: BoundKind,
    /// The bound value
    pub bound: NumericBound,
}

impl BoundFacet {
    /// Create a range facet from its lexical bound
    pub fn new(kind: BoundKind, value: &str) -> Result<Self> {
        Ok(Self {
            kind,
            bound: NumericBound::parse(value)?,
        })
    }

    /// Validate a lexical numeric value against this bound
    pub fn validate(&self, value: &str) -> Result<()> {
        let parsed = NumericBound::parse(value).or_else(|_| match value.trim() {
            "NaN" => Ok(NumericBound::Float(f64::NAN)),
            _ => Err(Error::Value(format!(
                "{} only applies to numeric values, got '{}'",
                self.kind.facet_name(),
                value
            ))),
        })?;

        let ok = match (self.kind, self.bound.compare(&parsed)) {
            (_, None) => false,
            (BoundKind::MinInclusive, Some(ord)) => ord != Ordering::Less,
            (BoundKind::MinExclusive, Some(ord)) => ord == Ordering::Greater,
            (BoundKind::MaxInclusive, Some(ord)) => ord != Ordering::Greater,
            (BoundKind::MaxExclusive, Some(ord)) => ord == Ordering::Less,
        };

        if ok {
            Ok(())
        } else {
            Err(facet_error(
                format!("Value '{}' violates {}", value, self.kind.facet_name()),
                format!("Bound: {:?}", self.bound),
            ))
        }
    }
}

/// Total digits facet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalDigitsFacet {
    /// Maximum number of significant digits
    pub value: u32,
}

impl TotalDigitsFacet {
    /// Create a new total digits facet
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Validate a decimal value against this facet
    pub fn validate(&self, value: &Decimal) -> Result<()> {
        let digits = value
            .normalize()
            .abs()
            .to_string()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect::<String>();
        let significant = digits.trim_start_matches('0').len().max(1);
        if significant as u32 > self.value {
            Err(facet_error(
                format!("Value has more than {} total digits", self.value),
                format!("Actual digits: {}", significant),
            ))
        } else {
            Ok(())
        }
    }
}

/// Fraction digits facet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractionDigitsFacet {
    /// Maximum number of fractional digits
    pub value: u32,
}

impl FractionDigitsFacet {
    /// Create a new fraction digits facet
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Validate a decimal value against this facet
    pub fn validate(&self, value: &Decimal) -> Result<()> {
        let scale = value.normalize().scale();
        if scale > self.value {
            Err(facet_error(
                format!("Value has more than {} fraction digits", self.value),
                format!("Actual fraction digits: {}", scale),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_space_normalize() {
        assert_eq!(WhiteSpace::Preserve.normalize(" a\tb "), " a\tb ");
        assert_eq!(WhiteSpace::Replace.normalize("a\tb\nc"), "a b c");
        assert_eq!(WhiteSpace::Collapse.normalize("  a \t\n b  "), "a b");
        assert!(WhiteSpace::parse("collapse").is_ok());
        assert!(WhiteSpace::parse("squash").is_err());
    }

    #[test]
    fn test_length_facets() {
        assert!(LengthFacet::new(3).validate(3).is_ok());
        assert!(LengthFacet::new(3).validate(2).is_err());
        assert!(MinLengthFacet::new(1).validate(0).is_err());
        assert!(MaxLengthFacet::new(5).validate(5).is_ok());
        assert!(MaxLengthFacet::new(5).validate(6).is_err());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let facet = PatternFacet::new(r"[A-Z]{2}\d+").unwrap();
        assert!(facet.validate("AB12").is_ok());
        assert!(facet.validate("xAB12").is_err());
        assert!(facet.validate("AB12x").is_err());
        assert!(PatternFacet::new("(").is_err());
    }

    #[test]
    fn test_enumeration() {
        let facet = EnumerationFacet::new(vec!["red".into(), "green".into()]);
        assert!(facet.validate("red").is_ok());
        assert!(facet.validate("blue").is_err());
    }

    #[test]
    fn test_bounds() {
        let min = BoundFacet::new(BoundKind::MinInclusive, "0").unwrap();
        assert!(min.validate("0").is_ok());
        assert!(min.validate("-1").is_err());

        let max = BoundFacet::new(BoundKind::MaxExclusive, "10.5").unwrap();
        assert!(max.validate("10.4").is_ok());
        assert!(max.validate("10.5").is_err());
        assert!(max.validate("NaN").is_err());
        assert!(max.validate("-INF").is_ok());

        assert!(BoundFacet::new(BoundKind::MinInclusive, "abc").is_err());
        assert!(min.validate("2024-01-01").is_err());
    }

    #[test]
    fn test_digits() {
        let total = TotalDigitsFacet::new(3);
        assert!(total.validate(&Decimal::from_str("12.3").unwrap()).is_ok());
        assert!(total.validate(&Decimal::from_str("1234").unwrap()).is_err());

        let fraction = FractionDigitsFacet::new(2);
        assert!(fraction.validate(&Decimal::from_str("1.25").unwrap()).is_ok());
        assert!(fraction.validate(&Decimal::from_str("1.250").unwrap()).is_ok());
        assert!(fraction.validate(&Decimal::from_str("1.255").unwrap()).is_err());
    }
}
