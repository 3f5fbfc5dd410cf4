//! Parameter header parsing
//!
//! Headers such as `-runfw` use the clause syntax
//! `name;attr=value;directive:=value, other-name`. Values may be quoted with
//! `"` or `'` to protect `,` and `;`. A clause may list several names that
//! share the same attributes; each name becomes its own entry.

use std::collections::BTreeMap;

use crate::errors::{ResolveError, Result};

/// One named entry of a header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderClause {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub directives: BTreeMap<String, String>,
}

impl HeaderClause {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives.get(key).map(String::as_str)
    }
}

/// Parse a header into its entries, in declaration order
///
/// # Errors
///
/// `InvalidHeader` on unterminated quotes, empty names or a parameter
/// without a name.
pub fn parse_header(header: &str) -> Result<Vec<HeaderClause>> {
    let fail = |reason: &str| ResolveError::InvalidHeader {
        header: header.to_string(),
        reason: reason.to_string(),
    };

    let mut entries = Vec::new();
    for clause in split_unquoted(header, ',').map_err(|r| fail(&r))? {
        if clause.trim().is_empty() {
            continue;
        }

        let mut names = Vec::new();
        let mut attributes = BTreeMap::new();
        let mut directives = BTreeMap::new();

        for part in split_unquoted(&clause, ';').map_err(|r| fail(&r))? {
            let part = part.trim();
            if part.is_empty() {
                return Err(fail("empty element"));
            }

            match part.find('=') {
                None => {
                    if !attributes.is_empty() || !directives.is_empty() {
                        return Err(fail("name after parameters"));
                    }
                    names.push(part.to_string());
                }
                Some(eq) => {
                    let (key, value) = (&part[..eq], &part[eq + 1..]);
                    let (key, is_directive) = match key.strip_suffix(':') {
                        Some(k) => (k.trim(), true),
                        None => (key.trim(), false),
                    };
                    if key.is_empty() {
                        return Err(fail("parameter without a name"));
                    }
                    let value = unquote(value.trim());
                    if is_directive {
                        directives.insert(key.to_string(), value);
                    } else {
                        attributes.insert(key.to_string(), value);
                    }
                }
            }
        }

        if names.is_empty() {
            return Err(fail("clause without a name"));
        }
        for name in names {
            entries.push(HeaderClause {
                name,
                attributes: attributes.clone(),
                directives: directives.clone(),
            });
        }
    }
    Ok(entries)
}

/// Split on `separator` outside quotes; quotes are kept in the pieces
fn split_unquoted(input: &str, separator: char) -> std::result::Result<Vec<String>, String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c == separator => pieces.push(std::mem::take(&mut current)),
            None => current.push(c),
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    pieces.push(current);
    Ok(pieces)
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
