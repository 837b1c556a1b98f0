//! XPath Support for XML Schema
//!
//! This module exposes a schema to an external XPath engine through the
//! [`SchemaProxy`] trait. The engine itself, with its parser and evaluator,
//! lives outside this crate; it only needs a `&dyn SchemaProxy` to look up
//! declarations and check atomic values against schema types.

mod proxy;

pub use proxy::{SchemaProxy, UnaryExpression, XmlSchemaProxy};
