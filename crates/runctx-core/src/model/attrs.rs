//! Typed attribute values carried by capabilities and requirements

use std::collections::BTreeMap;
use std::fmt;

use crate::model::version::Version;

/// Attribute map, ordered by key so equal maps hash and print identically
pub type Attrs = BTreeMap<String, AttrValue>;

/// Directive map
pub type Directives = BTreeMap<String, String>;

/// One attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    String(String),
    Version(Version),
    Long(i64),
    List(Vec<String>),
}

impl AttrValue {
    /// Name of the representation, used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::String(_) => "String",
            AttrValue::Version(_) => "Version",
            AttrValue::Long(_) => "Long",
            AttrValue::List(_) => "List<String>",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{}", s),
            AttrValue::Version(v) => write!(f, "{}", v),
            AttrValue::Long(n) => write!(f, "{}", n),
            AttrValue::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<Version> for AttrValue {
    fn from(value: Version) -> Self {
        AttrValue::Version(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Long(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value)
    }
}
