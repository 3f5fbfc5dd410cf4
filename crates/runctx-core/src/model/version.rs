use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Artifact version: `major.minor.micro.qualifier`
///
/// Numeric segments compare numerically and the qualifier compares
/// lexically, with an empty qualifier sorting before any other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
    pub qualifier: String,
}

/// Why a version string was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    pub input: String,
    pub reason: String,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for VersionParseError {}

impl Version {
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// The lowest possible version, `0.0.0`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `1`, `1.2`, `1.2.3` or `1.2.3.qualifier`
    ///
    /// Surrounding whitespace is ignored; an empty string parses as `0.0.0`.
    /// Qualifiers may contain only ASCII letters, digits, `_` and `-`.
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        let fail = |reason: &str| VersionParseError {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = trimmed.splitn(4, '.');
        let mut numbers = [0u64; 3];
        for (i, slot) in numbers.iter_mut().enumerate() {
            match parts.next() {
                Some(segment) => {
                    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(fail(&format!("segment {} is not numeric", i + 1)));
                    }
                    *slot = segment
                        .parse()
                        .map_err(|_| fail(&format!("segment {} is out of range", i + 1)))?;
                }
                None => break,
            }
        }

        let qualifier = match parts.next() {
            Some(q) => {
                if q.is_empty() {
                    return Err(fail("empty qualifier"));
                }
                if !q
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                {
                    return Err(fail("qualifier contains invalid characters"));
                }
                q.to_string()
            }
            None => String::new(),
        };

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            micro: numbers[2],
            qualifier,
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.micro.cmp(&other.micro))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}
