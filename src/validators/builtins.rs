//! XSD built-in types
//!
//! This module defines the built-in primitive and derived types for XML Schema,
//! and the atomic value representation handed to instance checks.

use crate::error::{Error, Result, ValidationError};
use crate::names::{is_valid_name, is_valid_ncname};
use crate::validators::facets::WhiteSpace;
use base64::Engine;
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// XSD Namespace Constants
// =============================================================================

/// XSD 1.0 Namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

// Special types
/// XSD anyType type name
pub const XSD_ANY_TYPE: &str = "anyType";
/// XSD anySimpleType type name
pub const XSD_ANY_SIMPLE_TYPE: &str = "anySimpleType";
/// XSD anyAtomicType type name (XSD 1.1)
pub const XSD_ANY_ATOMIC_TYPE: &str = "anyAtomicType";

// String types
/// XSD string type name
pub const XSD_STRING: &str = "string";
/// XSD normalizedString type name
pub const XSD_NORMALIZED_STRING: &str = "normalizedString";
/// XSD token type name
pub const XSD_TOKEN: &str = "token";
/// XSD language type name
pub const XSD_LANGUAGE: &str = "language";
/// XSD Name type name
pub const XSD_NAME: &str = "Name";
/// XSD NCName type name
pub const XSD_NCNAME: &str = "NCName";
/// XSD ID type name
pub const XSD_ID: &str = "ID";
/// XSD IDREF type name
pub const XSD_IDREF: &str = "IDREF";
/// XSD ENTITY type name
pub const XSD_ENTITY: &str = "ENTITY";
/// XSD NMTOKEN type name
pub const XSD_NMTOKEN: &str = "NMTOKEN";

/// XSD boolean type name
pub const XSD_BOOLEAN: &str = "boolean";

// Numeric types
/// XSD decimal type name
pub const XSD_DECIMAL: &str = "decimal";
/// XSD integer type name
pub const XSD_INTEGER: &str = "integer";
/// XSD long type name
pub const XSD_LONG: &str = "long";
/// XSD int type name
pub const XSD_INT: &str = "int";
/// XSD short type name
pub const XSD_SHORT: &str = "short";
/// XSD byte type name
pub const XSD_BYTE: &str = "byte";
/// XSD nonNegativeInteger type name
pub const XSD_NON_NEGATIVE_INTEGER: &str = "nonNegativeInteger";
/// XSD positiveInteger type name
pub const XSD_POSITIVE_INTEGER: &str = "positiveInteger";
/// XSD unsignedLong type name
pub const XSD_UNSIGNED_LONG: &str = "unsignedLong";
/// XSD unsignedInt type name
pub const XSD_UNSIGNED_INT: &str = "unsignedInt";
/// XSD unsignedShort type name
pub const XSD_UNSIGNED_SHORT: &str = "unsignedShort";
/// XSD unsignedByte type name
pub const XSD_UNSIGNED_BYTE: &str = "unsignedByte";
/// XSD nonPositiveInteger type name
pub const XSD_NON_POSITIVE_INTEGER: &str = "nonPositiveInteger";
/// XSD negativeInteger type name
pub const XSD_NEGATIVE_INTEGER: &str = "negativeInteger";
/// XSD float type name
pub const XSD_FLOAT: &str = "float";
/// XSD double type name
pub const XSD_DOUBLE: &str = "double";

// Date/time types
/// XSD duration type name
pub const XSD_DURATION: &str = "duration";
/// XSD dateTime type name
pub const XSD_DATETIME: &str = "dateTime";
/// XSD time type name
pub const XSD_TIME: &str = "time";
/// XSD date type name
pub const XSD_DATE: &str = "date";
/// XSD gYearMonth type name
pub const XSD_GYEAR_MONTH: &str = "gYearMonth";
/// XSD gYear type name
pub const XSD_GYEAR: &str = "gYear";
/// XSD gMonthDay type name
pub const XSD_GMONTH_DAY: &str = "gMonthDay";
/// XSD gDay type name
pub const XSD_GDAY: &str = "gDay";
/// XSD gMonth type name
pub const XSD_GMONTH: &str = "gMonth";

// Other types
/// XSD hexBinary type name
pub const XSD_HEX_BINARY: &str = "hexBinary";
/// XSD base64Binary type name
pub const XSD_BASE64_BINARY: &str = "base64Binary";
/// XSD anyURI type name
pub const XSD_ANY_URI: &str = "anyURI";
/// XSD QName type name
pub const XSD_QNAME: &str = "QName";

// =============================================================================
// XSD Value Representation
// =============================================================================

/// Represents any XSD atomic value
#[derive(Debug, Clone, PartialEq)]
pub enum XsdValue {
    /// String value (untyped; checked by its lexical form)
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Decimal value
    Decimal(Decimal),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Double value
    Double(f64),
    /// Binary value (hex or base64 decoded)
    Binary(Vec<u8>),
    /// Duration value (ISO 8601)
    Duration(String),
    /// DateTime value
    DateTime(String),
    /// Date value
    Date(String),
    /// Time value
    Time(String),
    /// URI value
    Uri(String),
    /// QName value (namespace, local)
    QName(Option<String>, String),
    /// Null/empty value
    Null,
}

impl XsdValue {
    /// Check whether the value belongs to the value space of a primitive type
    ///
    /// Untyped strings are admitted everywhere; their lexical form decides.
    pub fn fits_primitive(&self, primitive: &str) -> bool {
        match self {
            XsdValue::Null => false,
            XsdValue::String(_) => true,
            _ if matches!(primitive, XSD_ANY_SIMPLE_TYPE | XSD_ANY_ATOMIC_TYPE) => true,
            XsdValue::Boolean(_) => primitive == XSD_BOOLEAN,
            XsdValue::Integer(_) | XsdValue::Decimal(_) => {
                matches!(primitive, XSD_DECIMAL | XSD_FLOAT | XSD_DOUBLE)
            }
            XsdValue::Float(_) | XsdValue::Double(_) => {
                matches!(primitive, XSD_FLOAT | XSD_DOUBLE)
            }
            XsdValue::Binary(_) => matches!(primitive, XSD_HEX_BINARY | XSD_BASE64_BINARY),
            XsdValue::Duration(_) => primitive == XSD_DURATION,
            XsdValue::DateTime(_) => primitive == XSD_DATETIME,
            XsdValue::Date(_) => primitive == XSD_DATE,
            XsdValue::Time(_) => primitive == XSD_TIME,
            XsdValue::Uri(_) => primitive == XSD_ANY_URI,
            XsdValue::QName(..) => primitive == XSD_QNAME,
        }
    }

    /// Lexical representation of the value for a given primitive type
    pub fn lexical_form(&self, primitive: &str) -> String {
        match self {
            XsdValue::Binary(bytes) if primitive == XSD_BASE64_BINARY => {
                base64::engine::general_purpose::STANDARD.encode(bytes)
            }
            // Resolved QNames carry no prefix; the local part is what is checked.
            XsdValue::QName(_, local) => local.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for XsdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XsdValue::String(s) => write!(f, "{}", s),
            XsdValue::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            XsdValue::Decimal(d) => write!(f, "{}", d),
            XsdValue::Integer(i) => write!(f, "{}", i),
            XsdValue::Float(v) | XsdValue::Double(v) => {
                if v.is_nan() {
                    write!(f, "NaN")
                } else if *v == f64::INFINITY {
                    write!(f, "INF")
                } else if *v == f64::NEG_INFINITY {
                    write!(f, "-INF")
                } else {
                    write!(f, "{}", v)
                }
            }
            XsdValue::Binary(b) => {
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
            XsdValue::Duration(s)
            | XsdValue::DateTime(s)
            | XsdValue::Date(s)
            | XsdValue::Time(s)
            | XsdValue::Uri(s) => write!(f, "{}", s),
            XsdValue::QName(ns, local) => match ns {
                Some(ns) => write!(f, "{{{}}}{}", ns, local),
                None => write!(f, "{}", local),
            },
            XsdValue::Null => Ok(()),
        }
    }
}

impl From<&str> for XsdValue {
    fn from(s: &str) -> Self {
        XsdValue::String(s.to_string())
    }
}

impl From<String> for XsdValue {
    fn from(s: String) -> Self {
        XsdValue::String(s)
    }
}

impl From<i64> for XsdValue {
    fn from(i: i64) -> Self {
        XsdValue::Integer(i)
    }
}

impl From<bool> for XsdValue {
    fn from(b: bool) -> Self {
        XsdValue::Boolean(b)
    }
}

impl From<f64> for XsdValue {
    fn from(f: f64) -> Self {
        XsdValue::Double(f)
    }
}

impl From<Decimal> for XsdValue {
    fn from(d: Decimal) -> Self {
        XsdValue::Decimal(d)
    }
}

// =============================================================================
// Built-in Type Definition
// =============================================================================

/// Category of XSD type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    /// Primitive type (defined directly by XML Schema Part 2)
    Primitive,
    /// Derived type (derived from another type)
    Derived,
    /// Special type (anyType, anySimpleType, etc.)
    Special,
}

/// Definition of a built-in XSD type
#[derive(Debug, Clone)]
pub struct BuiltinType {
    /// Type name (local name without namespace)
    pub name: &'static str,
    /// Type category
    pub category: TypeCategory,
    /// Base type name
    pub base_type: Option<&'static str>,
    /// Primitive ancestor, which fixes the value space
    pub primitive: &'static str,
    /// White space handling
    pub white_space: WhiteSpace,
    /// Lexical validator
    validator: fn(&str) -> Result<XsdValue>,
}

impl BuiltinType {
    /// Validate a string value against this type
    pub fn validate(&self, value: &str) -> Result<XsdValue> {
        let normalized = self.white_space.normalize(value);
        (self.validator)(&normalized).map_err(|e| match e {
            Error::Validation(v) => {
                Error::Validation(v.with_schema_component(format!("xs:{}", self.name)))
            }
            other => other,
        })
    }

    /// Check if this type is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self.primitive, XSD_DECIMAL | XSD_FLOAT | XSD_DOUBLE)
    }

    /// Check if this type is a string type
    pub fn is_string(&self) -> bool {
        self.primitive == XSD_STRING
    }

    /// Check if this type is a binary type
    pub fn is_binary(&self) -> bool {
        matches!(self.primitive, XSD_HEX_BINARY | XSD_BASE64_BINARY)
    }
}

// =============================================================================
// Validator Functions
// =============================================================================

fn invalid(message: impl Into<String>) -> Error {
    Error::Validation(ValidationError::new(message))
}

fn invalid_value(type_name: &str, value: &str) -> Error {
    Error::Validation(
        ValidationError::new(format!("value is not a valid xs:{}", type_name)).with_instance(value),
    )
}

static LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*$").expect("valid regex"));
static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("valid regex"));
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("valid regex"));
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("valid regex")
});
static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?P(\d+Y)?(\d+M)?(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?$")
        .expect("valid regex")
});
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d{4,})-(\d{2})-(\d{2})(Z|[+-]\d{2}:\d{2})?$").expect("valid regex")
});
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").expect("valid regex")
});
static GYEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{4,}(Z|[+-]\d{2}:\d{2})?$").expect("valid regex"));
static GYEAR_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{4,}-(0[1-9]|1[0-2])(Z|[+-]\d{2}:\d{2})?$").expect("valid regex")
});
static GMONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--(0[1-9]|1[0-2])(Z|[+-]\d{2}:\d{2})?$").expect("valid regex"));
static GDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^---(0[1-9]|[12]\d|3[01])(Z|[+-]\d{2}:\d{2})?$").expect("valid regex")
});
static GMONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^--(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])(Z|[+-]\d{2}:\d{2})?$")
        .expect("valid regex")
});

fn validate_any(value: &str) -> Result<XsdValue> {
    Ok(XsdValue::String(value.to_string()))
}

fn validate_string(value: &str) -> Result<XsdValue> {
    Ok(XsdValue::String(value.to_string()))
}

fn validate_normalized_string(value: &str) -> Result<XsdValue> {
    if value.contains(['\r', '\n', '\t']) {
        return Err(invalid(
            "normalizedString cannot contain CR, LF, or TAB characters",
        ));
    }
    Ok(XsdValue::String(value.to_string()))
}

fn validate_token(value: &str) -> Result<XsdValue> {
    validate_normalized_string(value)?;
    if value.starts_with(' ') || value.ends_with(' ') || value.contains("  ") {
        return Err(invalid(
            "token cannot have leading/trailing spaces or consecutive spaces",
        ));
    }
    Ok(XsdValue::String(value.to_string()))
}

fn validate_language(value: &str) -> Result<XsdValue> {
    if !LANGUAGE_RE.is_match(value) {
        return Err(invalid_value(XSD_LANGUAGE, value));
    }
    Ok(XsdValue::String(value.to_string()))
}

fn validate_name(value: &str) -> Result<XsdValue> {
    if !is_valid_name(value) {
        return Err(invalid_value(XSD_NAME, value));
    }
    Ok(XsdValue::String(value.to_string()))
}

fn validate_ncname(value: &str) -> Result<XsdValue> {
    if !is_valid_ncname(value) {
        return Err(invalid_value(XSD_NCNAME, value));
    }
    Ok(XsdValue::String(value.to_string()))
}

fn validate_nmtoken(value: &str) -> Result<XsdValue> {
    if value.is_empty() {
        return Err(invalid("NMTOKEN cannot be empty"));
    }
    if let Some(c) = value
        .chars()
        .find(|c| !c.is_alphanumeric() && !matches!(c, '-' | '_' | '.' | ':' | '\u{B7}'))
    {
        return Err(invalid(format!("NMTOKEN contains invalid character: '{}'", c)));
    }
    Ok(XsdValue::String(value.to_string()))
}

fn validate_boolean(value: &str) -> Result<XsdValue> {
    match value {
        "true" | "1" => Ok(XsdValue::Boolean(true)),
        "false" | "0" => Ok(XsdValue::Boolean(false)),
        _ => Err(invalid_value(XSD_BOOLEAN, value)),
    }
}

fn validate_decimal(value: &str) -> Result<XsdValue> {
    if !DECIMAL_RE.is_match(value) {
        return Err(invalid_value(XSD_DECIMAL, value));
    }
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.strip_prefix('+').unwrap_or(value)),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let normalized = if digits.starts_with('.') {
        format!("{}0{}", sign, digits)
    } else {
        format!("{}{}", sign, digits)
    };
    let d = Decimal::from_str(&normalized).map_err(|_| invalid_value(XSD_DECIMAL, value))?;
    Ok(XsdValue::Decimal(d))
}

/// Parse an integer lexical value and check it against an inclusive range
fn integer_in_range(value: &str, type_name: &str, min: i128, max: i128) -> Result<XsdValue> {
    if !INTEGER_RE.is_match(value) {
        return Err(invalid_value(type_name, value));
    }
    let i: i128 = value
        .parse()
        .map_err(|_| invalid_value(type_name, value))?;
    if i < min || i > max {
        return Err(Error::Validation(
            ValidationError::new(format!("value must be {} <= x <= {}", min, max))
                .with_instance(value)
                .with_reason(format!("out of range for xs:{}", type_name)),
        ));
    }
    // unsignedLong above i64::MAX has no integer variant
    match i64::try_from(i) {
        Ok(small) => Ok(XsdValue::Integer(small)),
        Err(_) => Ok(XsdValue::Decimal(Decimal::from_i128_with_scale(i, 0))),
    }
}

/// Parse an integer lexical value whose type bounds only its sign
///
/// Magnitudes past `i64` become decimals, and past `Decimal` keep their
/// lexical form.
fn integer_with_sign(
    value: &str,
    type_name: &str,
    accepts: fn(Ordering) -> bool,
) -> Result<XsdValue> {
    if !INTEGER_RE.is_match(value) {
        return Err(invalid_value(type_name, value));
    }
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let sign = match (digits.bytes().all(|b| b == b'0'), negative) {
        (true, _) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (false, false) => Ordering::Greater,
    };
    if !accepts(sign) {
        return Err(Error::Validation(
            ValidationError::new(format!("value has the wrong sign for xs:{}", type_name))
                .with_instance(value)
                .with_reason(format!("out of range for xs:{}", type_name)),
        ));
    }
    let canonical = if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    };
    if let Ok(small) = canonical.parse::<i64>() {
        return Ok(XsdValue::Integer(small));
    }
    Ok(Decimal::from_str(&canonical)
        .map(XsdValue::Decimal)
        .unwrap_or(XsdValue::String(canonical)))
}

fn validate_integer(value: &str) -> Result<XsdValue> {
    integer_with_sign(value, XSD_INTEGER, |_| true)
}

fn validate_long(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_LONG, i64::MIN as i128, i64::MAX as i128)
}

fn validate_int(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_INT, i32::MIN as i128, i32::MAX as i128)
}

fn validate_short(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_SHORT, i16::MIN as i128, i16::MAX as i128)
}

fn validate_byte(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_BYTE, i8::MIN as i128, i8::MAX as i128)
}

fn validate_non_negative_integer(value: &str) -> Result<XsdValue> {
    integer_with_sign(value, XSD_NON_NEGATIVE_INTEGER, |sign| sign != Ordering::Less)
}

fn validate_positive_integer(value: &str) -> Result<XsdValue> {
    integer_with_sign(value, XSD_POSITIVE_INTEGER, |sign| sign == Ordering::Greater)
}

fn validate_non_positive_integer(value: &str) -> Result<XsdValue> {
    integer_with_sign(value, XSD_NON_POSITIVE_INTEGER, |sign| sign != Ordering::Greater)
}

fn validate_negative_integer(value: &str) -> Result<XsdValue> {
    integer_with_sign(value, XSD_NEGATIVE_INTEGER, |sign| sign == Ordering::Less)
}

fn validate_unsigned_long(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_UNSIGNED_LONG, 0, u64::MAX as i128)
}

fn validate_unsigned_int(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_UNSIGNED_INT, 0, u32::MAX as i128)
}

fn validate_unsigned_short(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_UNSIGNED_SHORT, 0, u16::MAX as i128)
}

fn validate_unsigned_byte(value: &str) -> Result<XsdValue> {
    integer_in_range(value, XSD_UNSIGNED_BYTE, 0, u8::MAX as i128)
}

/// Convert an XSD float/double lexical value
fn float_to_rust(value: &str, type_name: &str) -> Result<f64> {
    match value {
        "INF" | "+INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        _ if FLOAT_RE.is_match(value) => value
            .parse::<f64>()
            .map_err(|_| invalid_value(type_name, value)),
        _ => Err(invalid_value(type_name, value)),
    }
}

fn validate_float(value: &str) -> Result<XsdValue> {
    let f = float_to_rust(value, XSD_FLOAT)?;
    if f.is_finite() && (f as f32).is_infinite() {
        return Err(invalid_value(XSD_FLOAT, value));
    }
    Ok(XsdValue::Float(f))
}

fn validate_double(value: &str) -> Result<XsdValue> {
    Ok(XsdValue::Double(float_to_rust(value, XSD_DOUBLE)?))
}

fn validate_hex_binary(value: &str) -> Result<XsdValue> {
    if value.len() % 2 != 0 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid_value(XSD_HEX_BINARY, value));
    }
    let bytes = (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&value[i..i + 2], 16))
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|_| invalid_value(XSD_HEX_BINARY, value))?;
    Ok(XsdValue::Binary(bytes))
}

fn validate_base64_binary(value: &str) -> Result<XsdValue> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| invalid_value(XSD_BASE64_BINARY, value))?;
    Ok(XsdValue::Binary(bytes))
}

fn validate_any_uri(value: &str) -> Result<XsdValue> {
    if value.contains(['\n', '\r', '\t']) {
        return Err(invalid("anyURI cannot contain newline or tab characters"));
    }
    Ok(XsdValue::Uri(value.to_string()))
}

fn validate_qname(value: &str) -> Result<XsdValue> {
    match value.split_once(':') {
        Some((prefix, local)) if is_valid_ncname(prefix) && is_valid_ncname(local) => {
            Ok(XsdValue::QName(None, local.to_string()))
        }
        None if is_valid_ncname(value) => Ok(XsdValue::QName(None, value.to_string())),
        _ => Err(invalid_value(XSD_QNAME, value)),
    }
}

fn validate_duration(value: &str) -> Result<XsdValue> {
    if !DURATION_RE.is_match(value) || value.ends_with('P') || value.ends_with('T') {
        return Err(invalid_value(XSD_DURATION, value));
    }
    Ok(XsdValue::Duration(value.to_string()))
}

/// Check calendar validity of a `YYYY-MM-DD` prefix
fn check_date_parts(value: &str, type_name: &str) -> Result<()> {
    let caps = DATE_RE
        .captures(value)
        .ok_or_else(|| invalid_value(type_name, value))?;
    let year: i32 = caps[1].parse().map_err(|_| invalid_value(type_name, value))?;
    let month: u32 = caps[2].parse().map_err(|_| invalid_value(type_name, value))?;
    let day: u32 = caps[3].parse().map_err(|_| invalid_value(type_name, value))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|_| ())
        .ok_or_else(|| invalid_value(type_name, value))
}

/// Check clock validity of a `hh:mm:ss[.fff]` value; 24:00:00 is allowed
fn check_time_parts(value: &str, type_name: &str) -> Result<()> {
    let caps = TIME_RE
        .captures(value)
        .ok_or_else(|| invalid_value(type_name, value))?;
    let hour: u32 = caps[1].parse().map_err(|_| invalid_value(type_name, value))?;
    let minute: u32 = caps[2].parse().map_err(|_| invalid_value(type_name, value))?;
    let second: u32 = caps[3].parse().map_err(|_| invalid_value(type_name, value))?;
    let midnight = hour == 24
        && minute == 0
        && second == 0
        && caps
            .get(4)
            .map_or(true, |f| f.as_str().trim_matches(['.', '0']).is_empty());
    if midnight || NaiveTime::from_hms_opt(hour, minute, second).is_some() {
        Ok(())
    } else {
        Err(invalid_value(type_name, value))
    }
}

fn validate_datetime(value: &str) -> Result<XsdValue> {
    let (date, time) = value
        .split_once('T')
        .ok_or_else(|| invalid_value(XSD_DATETIME, value))?;
    check_date_parts(date, XSD_DATETIME)?;
    check_time_parts(time, XSD_DATETIME)?;
    Ok(XsdValue::DateTime(value.to_string()))
}

fn validate_date(value: &str) -> Result<XsdValue> {
    check_date_parts(value, XSD_DATE)?;
    Ok(XsdValue::Date(value.to_string()))
}

fn validate_time(value: &str) -> Result<XsdValue> {
    check_time_parts(value, XSD_TIME)?;
    Ok(XsdValue::Time(value.to_string()))
}

fn regex_validator(re: &Regex, type_name: &str, value: &str) -> Result<XsdValue> {
    if !re.is_match(value) {
        return Err(invalid_value(type_name, value));
    }
    Ok(XsdValue::String(value.to_string()))
}

fn validate_gyear(value: &str) -> Result<XsdValue> {
    regex_validator(&GYEAR_RE, XSD_GYEAR, value)
}

fn validate_gyear_month(value: &str) -> Result<XsdValue> {
    regex_validator(&GYEAR_MONTH_RE, XSD_GYEAR_MONTH, value)
}

fn validate_gmonth(value: &str) -> Result<XsdValue> {
    regex_validator(&GMONTH_RE, XSD_GMONTH, value)
}

fn validate_gday(value: &str) -> Result<XsdValue> {
    regex_validator(&GDAY_RE, XSD_GDAY, value)
}

fn validate_gmonth_day(value: &str) -> Result<XsdValue> {
    regex_validator(&GMONTH_DAY_RE, XSD_GMONTH_DAY, value)
}

// =============================================================================
// Built-in Type Registry
// =============================================================================

fn builtin(
    name: &'static str,
    category: TypeCategory,
    base_type: Option<&'static str>,
    primitive: &'static str,
    white_space: WhiteSpace,
    validator: fn(&str) -> Result<XsdValue>,
) -> BuiltinType {
    BuiltinType {
        name,
        category,
        base_type,
        primitive,
        white_space,
        validator,
    }
}

/// All built-in simple types, in derivation order
pub static BUILTIN_TYPES: Lazy<Vec<BuiltinType>> = Lazy::new(|| {
    use TypeCategory::{Derived, Primitive, Special};
    use WhiteSpace::{Collapse, Preserve, Replace};

    vec![
        builtin(XSD_ANY_TYPE, Special, None, XSD_ANY_SIMPLE_TYPE, Preserve, validate_any),
        builtin(XSD_ANY_SIMPLE_TYPE, Special, Some(XSD_ANY_TYPE), XSD_ANY_SIMPLE_TYPE, Preserve, validate_any),
        builtin(XSD_ANY_ATOMIC_TYPE, Special, Some(XSD_ANY_SIMPLE_TYPE), XSD_ANY_ATOMIC_TYPE, Preserve, validate_any),
        // Strings
        builtin(XSD_STRING, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_STRING, Preserve, validate_string),
        builtin(XSD_NORMALIZED_STRING, Derived, Some(XSD_STRING), XSD_STRING, Replace, validate_normalized_string),
        builtin(XSD_TOKEN, Derived, Some(XSD_NORMALIZED_STRING), XSD_STRING, Collapse, validate_token),
        builtin(XSD_LANGUAGE, Derived, Some(XSD_TOKEN), XSD_STRING, Collapse, validate_language),
        builtin(XSD_NAME, Derived, Some(XSD_TOKEN), XSD_STRING, Collapse, validate_name),
        builtin(XSD_NCNAME, Derived, Some(XSD_NAME), XSD_STRING, Collapse, validate_ncname),
        builtin(XSD_ID, Derived, Some(XSD_NCNAME), XSD_STRING, Collapse, validate_ncname),
        builtin(XSD_IDREF, Derived, Some(XSD_NCNAME), XSD_STRING, Collapse, validate_ncname),
        builtin(XSD_ENTITY, Derived, Some(XSD_NCNAME), XSD_STRING, Collapse, validate_ncname),
        builtin(XSD_NMTOKEN, Derived, Some(XSD_TOKEN), XSD_STRING, Collapse, validate_nmtoken),
        builtin(XSD_BOOLEAN, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_BOOLEAN, Collapse, validate_boolean),
        // Numbers
        builtin(XSD_DECIMAL, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_DECIMAL, Collapse, validate_decimal),
        builtin(XSD_INTEGER, Derived, Some(XSD_DECIMAL), XSD_DECIMAL, Collapse, validate_integer),
        builtin(XSD_LONG, Derived, Some(XSD_INTEGER), XSD_DECIMAL, Collapse, validate_long),
        builtin(XSD_INT, Derived, Some(XSD_LONG), XSD_DECIMAL, Collapse, validate_int),
        builtin(XSD_SHORT, Derived, Some(XSD_INT), XSD_DECIMAL, Collapse, validate_short),
        builtin(XSD_BYTE, Derived, Some(XSD_SHORT), XSD_DECIMAL, Collapse, validate_byte),
        builtin(XSD_NON_NEGATIVE_INTEGER, Derived, Some(XSD_INTEGER), XSD_DECIMAL, Collapse, validate_non_negative_integer),
        builtin(XSD_POSITIVE_INTEGER, Derived, Some(XSD_NON_NEGATIVE_INTEGER), XSD_DECIMAL, Collapse, validate_positive_integer),
        builtin(XSD_UNSIGNED_LONG, Derived, Some(XSD_NON_NEGATIVE_INTEGER), XSD_DECIMAL, Collapse, validate_unsigned_long),
        builtin(XSD_UNSIGNED_INT, Derived, Some(XSD_UNSIGNED_LONG), XSD_DECIMAL, Collapse, validate_unsigned_int),
        builtin(XSD_UNSIGNED_SHORT, Derived, Some(XSD_UNSIGNED_INT), XSD_DECIMAL, Collapse, validate_unsigned_short),
        builtin(XSD_UNSIGNED_BYTE, Derived, Some(XSD_UNSIGNED_SHORT), XSD_DECIMAL, Collapse, validate_unsigned_byte),
        builtin(XSD_NON_POSITIVE_INTEGER, Derived, Some(XSD_INTEGER), XSD_DECIMAL, Collapse, validate_non_positive_integer),
        builtin(XSD_NEGATIVE_INTEGER, Derived, Some(XSD_NON_POSITIVE_INTEGER), XSD_DECIMAL, Collapse, validate_negative_integer),
        builtin(XSD_FLOAT, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_FLOAT, Collapse, validate_float),
        builtin(XSD_DOUBLE, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_DOUBLE, Collapse, validate_double),
        // Date and time
        builtin(XSD_DURATION, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_DURATION, Collapse, validate_duration),
        builtin(XSD_DATETIME, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_DATETIME, Collapse, validate_datetime),
        builtin(XSD_DATE, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_DATE, Collapse, validate_date),
        builtin(XSD_TIME, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_TIME, Collapse, validate_time),
        builtin(XSD_GYEAR, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_GYEAR, Collapse, validate_gyear),
        builtin(XSD_GYEAR_MONTH, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_GYEAR_MONTH, Collapse, validate_gyear_month),
        builtin(XSD_GMONTH, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_GMONTH, Collapse, validate_gmonth),
        builtin(XSD_GDAY, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_GDAY, Collapse, validate_gday),
        builtin(XSD_GMONTH_DAY, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_GMONTH_DAY, Collapse, validate_gmonth_day),
        // Binary and others
        builtin(XSD_HEX_BINARY, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_HEX_BINARY, Collapse, validate_hex_binary),
        builtin(XSD_BASE64_BINARY, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_BASE64_BINARY, Collapse, validate_base64_binary),
        builtin(XSD_ANY_URI, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_ANY_URI, Collapse, validate_any_uri),
        builtin(XSD_QNAME, Primitive, Some(XSD_ANY_SIMPLE_TYPE), XSD_QNAME, Collapse, validate_qname),
    ]
});

/// Get a built-in type by name
pub fn get_builtin_type(name: &str) -> Option<&'static BuiltinType> {
    BUILTIN_TYPES.iter().find(|t| t.name == name)
}

/// Validate a value against a built-in type by name
pub fn validate_builtin(type_name: &str, value: &str) -> Result<XsdValue> {
    match get_builtin_type(type_name) {
        Some(builtin) => builtin.validate(value),
        None => Err(Error::Type(format!("Unknown built-in type: {}", type_name))),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_types() {
        assert!(validate_builtin(XSD_STRING, "Hello World").is_ok());
        assert!(validate_builtin(XSD_TOKEN, "  Hello   World ").is_ok());
        assert!(validate_builtin(XSD_NCNAME, "validName").is_ok());
        assert!(validate_builtin(XSD_NCNAME, "invalid:name").is_err());
        assert!(validate_builtin(XSD_NMTOKEN, "a-b.c:d").is_ok());
        assert!(validate_builtin(XSD_NMTOKEN, "a b").is_err());
    }

    #[test]
    fn test_boolean_type() {
        assert_eq!(
            validate_builtin(XSD_BOOLEAN, "true").unwrap(),
            XsdValue::Boolean(true)
        );
        assert_eq!(
            validate_builtin(XSD_BOOLEAN, " 0 ").unwrap(),
            XsdValue::Boolean(false)
        );
        assert!(validate_builtin(XSD_BOOLEAN, "yes").is_err());
    }

    #[test]
    fn test_numeric_types() {
        assert_eq!(
            validate_builtin(XSD_INTEGER, "+123").unwrap(),
            XsdValue::Integer(123)
        );
        assert!(validate_builtin(XSD_INTEGER, "-456").is_ok());
        assert!(validate_builtin(XSD_INTEGER, "abc").is_err());
        assert!(validate_builtin(XSD_INTEGER, "1.0").is_err());

        assert!(validate_builtin(XSD_BYTE, "127").is_ok());
        assert!(validate_builtin(XSD_BYTE, "128").is_err());
        assert!(validate_builtin(XSD_BYTE, "-129").is_err());

        assert!(validate_builtin(XSD_UNSIGNED_BYTE, "255").is_ok());
        assert!(validate_builtin(XSD_UNSIGNED_BYTE, "-1").is_err());
        assert!(validate_builtin(XSD_UNSIGNED_LONG, "18446744073709551615").is_ok());

        assert!(validate_builtin(XSD_POSITIVE_INTEGER, "0").is_err());
        assert!(validate_builtin(XSD_NEGATIVE_INTEGER, "-1").is_ok());
        assert!(validate_builtin(XSD_NEGATIVE_INTEGER, "0").is_err());
    }

    #[test]
    fn test_unbounded_integers_contain_unsigned_long() {
        let max = "18446744073709551615";
        for name in [
            XSD_UNSIGNED_LONG,
            XSD_NON_NEGATIVE_INTEGER,
            XSD_POSITIVE_INTEGER,
            XSD_INTEGER,
            XSD_DECIMAL,
        ] {
            assert!(validate_builtin(name, max).is_ok(), "{}", name);
        }
        assert!(validate_builtin(XSD_LONG, max).is_err());

        assert!(validate_builtin(XSD_INTEGER, "99999999999999999999").is_ok());
        let huge = "-123456789012345678901234567890123456789012";
        assert!(validate_builtin(XSD_INTEGER, huge).is_ok());
        assert!(validate_builtin(XSD_NEGATIVE_INTEGER, "-99999999999999999999").is_ok());
        assert!(validate_builtin(XSD_NON_POSITIVE_INTEGER, "99999999999999999999").is_err());
        assert!(validate_builtin(XSD_POSITIVE_INTEGER, "-0").is_err());
        assert!(validate_builtin(XSD_NON_NEGATIVE_INTEGER, "-0").is_ok());
        assert_eq!(
            validate_builtin(XSD_INTEGER, "+0042").unwrap(),
            XsdValue::Integer(42)
        );
    }

    #[test]
    fn test_float_types() {
        assert!(validate_builtin(XSD_FLOAT, "123.456").is_ok());
        assert!(validate_builtin(XSD_FLOAT, "NaN").is_ok());
        assert!(validate_builtin(XSD_FLOAT, "-INF").is_ok());
        assert!(validate_builtin(XSD_FLOAT, "inf").is_err());
        assert!(validate_builtin(XSD_FLOAT, "1e39").is_err());

        assert!(validate_builtin(XSD_DOUBLE, "1.23e10").is_ok());
        assert!(validate_builtin(XSD_DOUBLE, "1e39").is_ok());
    }

    #[test]
    fn test_decimal_type() {
        assert!(validate_builtin(XSD_DECIMAL, "123.456").is_ok());
        assert!(validate_builtin(XSD_DECIMAL, "-.5").is_ok());
        assert!(validate_builtin(XSD_DECIMAL, "7.").is_ok());
        assert!(validate_builtin(XSD_DECIMAL, "1e3").is_err());
        assert!(validate_builtin(XSD_DECIMAL, "abc").is_err());
    }

    #[test]
    fn test_binary_types() {
        assert_eq!(
            validate_builtin(XSD_HEX_BINARY, "0A1B").unwrap(),
            XsdValue::Binary(vec![0x0A, 0x1B])
        );
        assert!(validate_builtin(XSD_HEX_BINARY, "GH").is_err());
        assert!(validate_builtin(XSD_HEX_BINARY, "ABC").is_err());

        assert_eq!(
            validate_builtin(XSD_BASE64_BINARY, "SGVsbG8=").unwrap(),
            XsdValue::Binary(b"Hello".to_vec())
        );
        assert!(validate_builtin(XSD_BASE64_BINARY, "!!!").is_err());
    }

    #[test]
    fn test_datetime_types() {
        assert!(validate_builtin(XSD_DATETIME, "2024-01-15T10:30:00").is_ok());
        assert!(validate_builtin(XSD_DATETIME, "2024-01-15T10:30:00+05:30").is_ok());
        assert!(validate_builtin(XSD_DATETIME, "2024-01-15T24:00:00").is_ok());
        assert!(validate_builtin(XSD_DATETIME, "2024-01-15T25:00:00").is_err());
        assert!(validate_builtin(XSD_DATETIME, "invalid").is_err());

        assert!(validate_builtin(XSD_DATE, "2024-02-29Z").is_ok());
        assert!(validate_builtin(XSD_DATE, "2023-02-29").is_err());

        assert!(validate_builtin(XSD_TIME, "10:30:00.123").is_ok());
        assert!(validate_builtin(XSD_TIME, "10:61:00").is_err());

        assert!(validate_builtin(XSD_DURATION, "P1Y2M3DT4H5M6S").is_ok());
        assert!(validate_builtin(XSD_DURATION, "PT1H").is_ok());
        assert!(validate_builtin(XSD_DURATION, "P").is_err());
        assert!(validate_builtin(XSD_DURATION, "P1DT").is_err());

        assert!(validate_builtin(XSD_GYEAR, "2024").is_ok());
        assert!(validate_builtin(XSD_GMONTH, "--13").is_err());
        assert!(validate_builtin(XSD_GMONTH_DAY, "--12-25").is_ok());
    }

    #[test]
    fn test_qname_type() {
        assert!(validate_builtin(XSD_QNAME, "localName").is_ok());
        assert!(validate_builtin(XSD_QNAME, "prefix:localName").is_ok());
        assert!(validate_builtin(XSD_QNAME, "").is_err());
        assert!(validate_builtin(XSD_QNAME, "a:b:c").is_err());
    }

    #[test]
    fn test_language_type() {
        assert!(validate_builtin(XSD_LANGUAGE, "en-US").is_ok());
        assert!(validate_builtin(XSD_LANGUAGE, "zh-Hans-CN").is_ok());
        assert!(validate_builtin(XSD_LANGUAGE, "123").is_err());
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(get_builtin_type("unknownType").is_none());
        assert!(matches!(
            validate_builtin("unknownType", "x"),
            Err(Error::Type(_))
        ));
    }

    #[test]
    fn test_builtin_metadata() {
        let int_type = get_builtin_type(XSD_INT).unwrap();
        assert_eq!(int_type.category, TypeCategory::Derived);
        assert_eq!(int_type.primitive, XSD_DECIMAL);
        assert!(int_type.is_numeric());
        assert!(!int_type.is_string());

        let token = get_builtin_type(XSD_TOKEN).unwrap();
        assert!(token.is_string());
        assert_eq!(token.white_space, WhiteSpace::Collapse);

        assert!(get_builtin_type(XSD_HEX_BINARY).unwrap().is_binary());
    }

    #[test]
    fn test_value_fits_primitive() {
        assert!(XsdValue::Integer(5).fits_primitive(XSD_DECIMAL));
        assert!(XsdValue::Integer(5).fits_primitive(XSD_DOUBLE));
        assert!(!XsdValue::Integer(5).fits_primitive(XSD_STRING));
        assert!(!XsdValue::Boolean(true).fits_primitive(XSD_DECIMAL));
        assert!(XsdValue::String("x".into()).fits_primitive(XSD_DECIMAL));
        assert!(!XsdValue::Null.fits_primitive(XSD_ANY_SIMPLE_TYPE));
        assert!(XsdValue::Boolean(false).fits_primitive(XSD_ANY_ATOMIC_TYPE));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(XsdValue::Boolean(true).to_string(), "true");
        assert_eq!(XsdValue::Integer(42).to_string(), "42");
        assert_eq!(XsdValue::Double(f64::NAN).to_string(), "NaN");
        assert_eq!(XsdValue::Float(f64::INFINITY).to_string(), "INF");
        assert_eq!(XsdValue::Binary(vec![0xAB]).to_string(), "AB");
        assert_eq!(
            XsdValue::QName(Some("urn:x".into()), "a".into()).to_string(),
            "{urn:x}a"
        );
        assert_eq!(
            XsdValue::Binary(b"Hello".to_vec()).lexical_form(XSD_BASE64_BINARY),
            "SGVsbG8="
        );
    }
}
