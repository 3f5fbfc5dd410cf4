use std::fmt;

use crate::errors::{ResolveError, Result};
use crate::model::filter::Filter;
use crate::model::namespace::VERSION_ATTRIBUTE;
use crate::model::version::Version;

/// Interval of versions
///
/// Written as `[1.0,2.0)`, `(1.0,2.0]` and so on, or as a bare version
/// meaning "this version or anything higher".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    pub floor: Version,
    pub floor_inclusive: bool,
    /// `None` for an open-ended range
    pub ceiling: Option<Version>,
    pub ceiling_inclusive: bool,
}

impl VersionRange {
    /// Range matching `floor` and everything above it
    pub fn at_least(floor: Version) -> Self {
        Self {
            floor,
            floor_inclusive: true,
            ceiling: None,
            ceiling_inclusive: false,
        }
    }

    /// # Errors
    ///
    /// `InvalidVersionRange` when the brackets, separator or versions are
    /// malformed, or the floor lies above the ceiling.
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        let fail = |reason: &str| ResolveError::InvalidVersionRange {
            range: input.to_string(),
            reason: reason.to_string(),
        };

        let first = text.chars().next().ok_or_else(|| fail("empty range"))?;
        if first != '[' && first != '(' {
            let floor = Version::parse(text).map_err(|e| fail(&e.reason))?;
            return Ok(Self::at_least(floor));
        }

        let last = text.chars().last().ok_or_else(|| fail("empty range"))?;
        if text.len() < 2 || (last != ']' && last != ')') {
            return Err(fail("missing closing bracket"));
        }

        let body = &text[1..text.len() - 1];
        let (low, high) = body
            .split_once(',')
            .ok_or_else(|| fail("expected two versions separated by ','"))?;
        if high.contains(',') {
            return Err(fail("too many versions"));
        }

        let floor = Version::parse(low).map_err(|e| fail(&e.reason))?;
        let ceiling = Version::parse(high).map_err(|e| fail(&e.reason))?;
        if low.trim().is_empty() || high.trim().is_empty() {
            return Err(fail("both ends of an interval must be given"));
        }

        let range = Self {
            floor,
            floor_inclusive: first == '[',
            ceiling: Some(ceiling),
            ceiling_inclusive: last == ']',
        };
        if let Some(ceiling) = &range.ceiling {
            if range.floor > *ceiling {
                return Err(fail("floor is above ceiling"));
            }
        }
        Ok(range)
    }

    pub fn includes(&self, version: &Version) -> bool {
        let above_floor = if self.floor_inclusive {
            *version >= self.floor
        } else {
            *version > self.floor
        };
        let below_ceiling = match &self.ceiling {
            None => true,
            Some(c) if self.ceiling_inclusive => version <= c,
            Some(c) => version < c,
        };
        above_floor && below_ceiling
    }

    /// Filter over the `version` attribute matching exactly this range
    ///
    /// `[a,b)` becomes `(&(version>=a)(!(version>=b)))`, a bare `a` becomes
    /// `(version>=a)`.
    pub fn to_filter(&self) -> Filter {
        let low = if self.floor_inclusive {
            Filter::ge(VERSION_ATTRIBUTE, self.floor.to_string())
        } else {
            Filter::not(Filter::le(VERSION_ATTRIBUTE, self.floor.to_string()))
        };

        match &self.ceiling {
            None => low,
            Some(ceiling) => {
                let high = if self.ceiling_inclusive {
                    Filter::le(VERSION_ATTRIBUTE, ceiling.to_string())
                } else {
                    Filter::not(Filter::ge(VERSION_ATTRIBUTE, ceiling.to_string()))
                };
                Filter::And(vec![low, high])
            }
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ceiling {
            None => write!(f, "{}", self.floor),
            Some(ceiling) => write!(
                f,
                "{}{},{}{}",
                if self.floor_inclusive { '[' } else { '(' },
                self.floor,
                ceiling,
                if self.ceiling_inclusive { ']' } else { ')' },
            ),
        }
    }
}
