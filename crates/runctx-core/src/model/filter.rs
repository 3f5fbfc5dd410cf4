//! LDAP-style filter expressions (RFC 1960)
//!
//! Requirements carry their match condition as a `filter` directive string.
//! `Filter::parse` turns it into a tree that can be evaluated against a
//! capability's attributes, and `Display` prints the canonical string form.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::{ResolveError, Result};
use crate::model::attrs::{AttrValue, Attrs};
use crate::model::version::Version;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Equal { key: String, value: String },
    Approx { key: String, value: String },
    GreaterEq { key: String, value: String },
    LessEq { key: String, value: String },
    Present { key: String },
    /// `key=a*b*c`; an empty first/last part means a leading/trailing `*`
    Substring { key: String, parts: Vec<String> },
}

impl Filter {
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equal {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn ge(key: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::GreaterEq {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn le(key: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::LessEq {
            key: key.into(),
            value: value.into(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Filter) -> Self {
        Filter::Not(Box::new(inner))
    }

    /// # Errors
    ///
    /// `InvalidFilter` on any syntax error or trailing input.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser {
            input,
            chars: input.chars().collect(),
            pos: 0,
        };
        parser.skip_ws();
        let filter = parser.parse_filter()?;
        parser.skip_ws();
        if parser.pos != parser.chars.len() {
            return Err(parser.fail("unexpected trailing characters"));
        }
        Ok(filter)
    }

    /// Evaluate against an attribute map
    ///
    /// A missing attribute never matches a comparison, so `(!(k=v))` matches
    /// when `k` is absent.
    pub fn matches(&self, attrs: &Attrs) -> bool {
        match self {
            Filter::And(children) => children.iter().all(|c| c.matches(attrs)),
            Filter::Or(children) => children.iter().any(|c| c.matches(attrs)),
            Filter::Not(inner) => !inner.matches(attrs),
            Filter::Present { key } => lookup(attrs, key).is_some(),
            Filter::Equal { key, value } => lookup(attrs, key)
                .map(|attr| compare_attr(attr, value, |o| o == Ordering::Equal))
                .unwrap_or(false),
            Filter::GreaterEq { key, value } => lookup(attrs, key)
                .map(|attr| compare_attr(attr, value, |o| o != Ordering::Less))
                .unwrap_or(false),
            Filter::LessEq { key, value } => lookup(attrs, key)
                .map(|attr| compare_attr(attr, value, |o| o != Ordering::Greater))
                .unwrap_or(false),
            Filter::Approx { key, value } => lookup(attrs, key)
                .map(|attr| approx_attr(attr, value))
                .unwrap_or(false),
            Filter::Substring { key, parts } => lookup(attrs, key)
                .map(|attr| substring_attr(attr, parts))
                .unwrap_or(false),
        }
    }
}

fn lookup<'a>(attrs: &'a Attrs, key: &str) -> Option<&'a AttrValue> {
    attrs.get(key).or_else(|| {
        attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

/// Compare `attr` against the filter operand, typed by the attribute
fn compare_attr(attr: &AttrValue, operand: &str, accept: impl Fn(Ordering) -> bool) -> bool {
    match attr {
        AttrValue::String(s) => accept(s.as_str().cmp(operand)),
        AttrValue::Version(v) => Version::parse(operand)
            .map(|o| accept(v.cmp(&o)))
            .unwrap_or(false),
        AttrValue::Long(n) => operand
            .trim()
            .parse::<i64>()
            .map(|o| accept(n.cmp(&o)))
            .unwrap_or(false),
        AttrValue::List(items) => items.iter().any(|s| accept(s.as_str().cmp(operand))),
    }
}

fn approx_attr(attr: &AttrValue, operand: &str) -> bool {
    let normalise = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    match attr {
        AttrValue::String(s) => normalise(s) == normalise(operand),
        AttrValue::List(items) => items.iter().any(|s| normalise(s) == normalise(operand)),
        other => compare_attr(other, operand, |o| o == Ordering::Equal),
    }
}

fn substring_attr(attr: &AttrValue, parts: &[String]) -> bool {
    match attr {
        AttrValue::List(items) => items.iter().any(|s| glob_match(s, parts)),
        other => glob_match(&other.to_string(), parts),
    }
}

fn glob_match(text: &str, parts: &[String]) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return true;
    };
    let Some(mut remaining) = text.strip_prefix(first.as_str()) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return remaining.is_empty();
    };
    for part in middle {
        match remaining.find(part.as_str()) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last.as_str())
}

fn escape(value: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for c in value.chars() {
        if matches!(c, '(' | ')' | '*' | '\\') {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::And(children) | Filter::Or(children) => {
                let op = if matches!(self, Filter::And(_)) { '&' } else { '|' };
                write!(f, "({}", op)?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            Filter::Not(inner) => write!(f, "(!{})", inner),
            Filter::Present { key } => write!(f, "({}=*)", key),
            Filter::Equal { key, value } => {
                write!(f, "({}=", key)?;
                escape(value, f)?;
                write!(f, ")")
            }
            Filter::Approx { key, value } => {
                write!(f, "({}~=", key)?;
                escape(value, f)?;
                write!(f, ")")
            }
            Filter::GreaterEq { key, value } => {
                write!(f, "({}>=", key)?;
                escape(value, f)?;
                write!(f, ")")
            }
            Filter::LessEq { key, value } => {
                write!(f, "({}<=", key)?;
                escape(value, f)?;
                write!(f, ")")
            }
            Filter::Substring { key, parts } => {
                write!(f, "({}=", key)?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    escape(part, f)?;
                }
                write!(f, ")")
            }
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn fail(&self, reason: &str) -> ResolveError {
        ResolveError::InvalidFilter {
            filter: self.input.to_string(),
            reason: format!("{} at position {}", reason, self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.fail(&format!("expected '{}'", c)))
        }
    }

    fn parse_filter(&mut self) -> Result<Filter> {
        self.expect('(')?;
        self.skip_ws();
        let filter = match self.peek() {
            Some('&') => {
                self.pos += 1;
                Filter::And(self.parse_list()?)
            }
            Some('|') => {
                self.pos += 1;
                Filter::Or(self.parse_list()?)
            }
            Some('!') => {
                self.pos += 1;
                self.skip_ws();
                Filter::not(self.parse_filter()?)
            }
            Some(_) => self.parse_item()?,
            None => return Err(self.fail("unexpected end of filter")),
        };
        self.skip_ws();
        self.expect(')')?;
        Ok(filter)
    }

    fn parse_list(&mut self) -> Result<Vec<Filter>> {
        let mut children = Vec::new();
        self.skip_ws();
        while self.peek() == Some('(') {
            children.push(self.parse_filter()?);
            self.skip_ws();
        }
        if children.is_empty() {
            return Err(self.fail("empty filter list"));
        }
        Ok(children)
    }

    fn parse_item(&mut self) -> Result<Filter> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '=' | '~' | '<' | '>' | '(' | ')') {
                break;
            }
            self.pos += 1;
        }
        let key: String = self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .trim()
            .to_string();
        if key.is_empty() {
            return Err(self.fail("missing attribute name"));
        }

        let op = match self.peek() {
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(c @ ('~' | '<' | '>')) => {
                self.pos += 1;
                self.expect('=')?;
                c
            }
            _ => return Err(self.fail("expected operator")),
        };

        let (parts, wildcard) = self.parse_value()?;
        match op {
            '=' if wildcard => {
                if parts.len() == 2 && parts.iter().all(String::is_empty) {
                    Ok(Filter::Present { key })
                } else {
                    Ok(Filter::Substring { key, parts })
                }
            }
            '=' => Ok(Filter::Equal {
                key,
                value: parts.concat(),
            }),
            _ if wildcard => Err(self.fail("wildcards are only allowed with '='")),
            '~' => Ok(Filter::Approx {
                key,
                value: parts.concat(),
            }),
            '>' => Ok(Filter::GreaterEq {
                key,
                value: parts.concat(),
            }),
            _ => Ok(Filter::LessEq {
                key,
                value: parts.concat(),
            }),
        }
    }

    /// Read a value up to the closing `)`, split at unescaped `*`
    fn parse_value(&mut self) -> Result<(Vec<String>, bool)> {
        let mut parts = vec![String::new()];
        let mut wildcard = false;
        loop {
            match self.peek() {
                None => return Err(self.fail("unterminated value")),
                Some(')') => break,
                Some('(') => return Err(self.fail("unescaped '(' in value")),
                Some('\\') => {
                    self.pos += 1;
                    let escaped = self.peek().ok_or_else(|| self.fail("dangling escape"))?;
                    if let Some(last) = parts.last_mut() {
                        last.push(escaped);
                    }
                    self.pos += 1;
                }
                Some('*') => {
                    wildcard = true;
                    parts.push(String::new());
                    self.pos += 1;
                }
                Some(c) => {
                    if let Some(last) = parts.last_mut() {
                        last.push(c);
                    }
                    self.pos += 1;
                }
            }
        }
        Ok((parts, wildcard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, AttrValue)]) -> Attrs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_and_print_round_trip() {
        let text = "(&(osgi.identity=org.apache.felix.framework)(&(version>=4.0.0)(!(version>=5.0.0))))";
        let filter = Filter::parse(text).unwrap();
        assert_eq!(filter.to_string(), text);
    }

    #[test]
    fn test_version_comparison_uses_version_ordering() {
        let filter = Filter::parse("(&(version>=1.2)(!(version>=1.10)))").unwrap();
        let a = attrs(&[("version", AttrValue::Version(Version::new(1, 9, 0)))]);
        let b = attrs(&[("version", AttrValue::Version(Version::new(1, 10, 0)))]);
        assert!(filter.matches(&a));
        assert!(!filter.matches(&b));
    }

    #[test]
    fn test_missing_attribute_does_not_match() {
        let filter = Filter::parse("(version>=1.0)").unwrap();
        assert!(!filter.matches(&Attrs::new()));
        assert!(Filter::parse("(!(version>=1.0))")
            .unwrap()
            .matches(&Attrs::new()));
    }

    #[test]
    fn test_presence_and_substring() {
        let a = attrs(&[("osgi.wiring.package", "org.osgi.framework".into())]);
        assert!(Filter::parse("(osgi.wiring.package=*)").unwrap().matches(&a));
        assert!(Filter::parse("(osgi.wiring.package=org.osgi.*)")
            .unwrap()
            .matches(&a));
        assert!(Filter::parse("(osgi.wiring.package=*osgi*work)")
            .unwrap()
            .matches(&a));
        assert!(!Filter::parse("(osgi.wiring.package=org.apache.*)")
            .unwrap()
            .matches(&a));
    }

    #[test]
    fn test_long_and_list_attributes() {
        let a = attrs(&[
            ("rank", AttrValue::Long(10)),
            (
                "objectClass",
                AttrValue::List(vec!["a.Foo".to_string(), "b.Bar".to_string()]),
            ),
        ]);
        assert!(Filter::parse("(rank>=9)").unwrap().matches(&a));
        assert!(!Filter::parse("(rank<=9)").unwrap().matches(&a));
        assert!(Filter::parse("(objectClass=b.Bar)").unwrap().matches(&a));
    }

    #[test]
    fn test_approx_ignores_case_and_whitespace() {
        let a = attrs(&[("name", "Felix Framework".into())]);
        assert!(Filter::parse("(name~=felixframework)").unwrap().matches(&a));
    }

    #[test]
    fn test_or_and_key_case_insensitive() {
        let a = attrs(&[("Bundle-Name", "x".into())]);
        assert!(Filter::parse("(|(bundle-name=y)(bundle-name=x))")
            .unwrap()
            .matches(&a));
    }

    #[test]
    fn test_escapes_survive_printing() {
        let filter = Filter::eq("name", "a(b)*c");
        let printed = filter.to_string();
        assert_eq!(printed, "(name=a\\(b\\)\\*c)");
        assert_eq!(Filter::parse(&printed).unwrap(), filter);
    }

    #[test]
    fn test_syntax_errors() {
        for bad in ["", "name=x", "(name=x", "(&)", "(=x)", "(name>x)", "(a=b)(c=d)", "(a>=b*)"] {
            let err = Filter::parse(bad).unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidFilter { .. }),
                "expected InvalidFilter for {:?}",
                bad
            );
        }
    }
}
