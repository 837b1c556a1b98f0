//! XML namespace handling
//!
//! Qualified names are the lookup keys of every schema map. Their canonical
//! string form is Clark notation, `{namespace-uri}local-name`.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Namespace URI as a string slice
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Parses Clark notation (`{uri}local`) or a bare local name.
///
/// Well-formedness of the local part is not checked here; proxy lookups
/// accept any key.
impl FromStr for QName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix('{') {
            Some(rest) => {
                let (ns, local) = rest.split_once('}').ok_or_else(|| {
                    Error::Name(format!("unterminated namespace in QName: '{}'", s))
                })?;
                if ns.is_empty() {
                    Ok(QName::local(local))
                } else {
                    Ok(QName::namespaced(ns, local))
                }
            }
            None => Ok(QName::local(s)),
        }
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: HashMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Resolve a prefixed name to a QName
    ///
    /// Unprefixed names take the default namespace, if any.
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        if let Some((prefix, local)) = prefixed_name.split_once(':') {
            let namespace = self
                .get_namespace(prefix)
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
            Ok(QName::namespaced(namespace, local))
        } else {
            Ok(QName::new(self.default_namespace.clone(), prefixed_name))
        }
    }

    /// Merge the bindings of another context, overriding existing prefixes
    pub fn extend(&mut self, other: &NamespaceContext) {
        for (prefix, uri) in &other.prefixes {
            self.prefixes.insert(prefix.clone(), uri.clone());
        }
        if other.default_namespace.is_some() {
            self.default_namespace = other.default_namespace.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_creation() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.namespace(), Some("http://example.com"));
        assert_eq!(qname.local_name, "element");
    }

    #[test]
    fn test_qname_display() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.to_string(), "{http://example.com}element");

        let qname_local = QName::local("element");
        assert_eq!(qname_local.to_string(), "element");
    }

    #[test]
    fn test_qname_from_clark_notation() {
        let qname: QName = "{http://example.com}foo".parse().unwrap();
        assert_eq!(qname, QName::namespaced("http://example.com", "foo"));

        let bare: QName = "foo".parse().unwrap();
        assert_eq!(bare, QName::local("foo"));

        let empty_ns: QName = "{}foo".parse().unwrap();
        assert_eq!(empty_ns, QName::local("foo"));

        assert!("{http://example.com".parse::<QName>().is_err());
    }

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xs", "http://www.w3.org/2001/XMLSchema");
        ctx.set_default_namespace("http://example.com");

        assert_eq!(
            ctx.get_namespace("xs"),
            Some("http://www.w3.org/2001/XMLSchema")
        );
        assert_eq!(ctx.get_default_namespace(), Some("http://example.com"));
    }

    #[test]
    fn test_resolve_prefixed_name() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xs", "http://www.w3.org/2001/XMLSchema");

        let qname = ctx.resolve("xs:element").unwrap();
        assert_eq!(qname.namespace(), Some("http://www.w3.org/2001/XMLSchema"));
        assert_eq!(qname.local_name, "element");

        assert!(matches!(ctx.resolve("nope:element"), Err(Error::Namespace(_))));
        assert_eq!(ctx.resolve("plain").unwrap(), QName::local("plain"));
    }

    #[test]
    fn test_extend_overrides() {
        let mut outer = NamespaceContext::new();
        outer.add_prefix("a", "urn:one");

        let mut inner = NamespaceContext::new();
        inner.add_prefix("a", "urn:two");
        inner.set_default_namespace("urn:default");

        outer.extend(&inner);
        assert_eq!(outer.get_namespace("a"), Some("urn:two"));
        assert_eq!(outer.get_default_namespace(), Some("urn:default"));
    }
}
