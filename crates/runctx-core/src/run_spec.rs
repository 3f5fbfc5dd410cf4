//! Run specification: which repositories to use and which framework to run on
//!
//! A `RunSpec` can be built in code, read from TOML
//! (`run_repos` / `run_framework`), or read from a bnd-style run descriptor
//! (`-runrepos` / `-runfw` instructions).

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ResolveError, Result};
use crate::header::parse_header;

const RUNREPOS_INSTRUCTION: &str = "-runrepos";
const RUNFW_INSTRUCTION: &str = "-runfw";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSpec {
    /// Ordered repository names; `None` means every available repository
    #[serde(default, alias = "runrepos")]
    run_repos: Option<Vec<String>>,

    /// Framework header, `identity;version=range`
    #[serde(default, alias = "runfw")]
    run_framework: Option<String>,

    /// Where the spec was read from, if it came from a file
    #[serde(skip)]
    source: Option<String>,
}

impl RunSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_repos<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_repos = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_run_framework(mut self, header: impl Into<String>) -> Self {
        self.run_framework = Some(header.into());
        self
    }

    pub fn run_repos(&self) -> Option<&[String]> {
        self.run_repos.as_deref()
    }

    pub fn run_framework(&self) -> Option<&str> {
        self.run_framework.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// # Errors
    ///
    /// `RunSpecParse` when the document is not valid TOML or has the wrong shape.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut spec: RunSpec = toml::from_str(content).map_err(|e| ResolveError::RunSpecParse {
            message: format!("TOML parse error: {}", e),
        })?;
        spec.normalise();
        Ok(spec)
    }

    /// Read a bnd-style run descriptor
    ///
    /// Only `-runrepos` and `-runfw` are read; other instructions are ignored.
    /// Lines ending in `\` continue on the next line, `#` and `!` start
    /// comments.
    ///
    /// # Errors
    ///
    /// `RunSpecParse` on a line without a key, `InvalidHeader` when
    /// `-runrepos` is not a valid header.
    pub fn from_bndrun_str(content: &str) -> Result<Self> {
        let mut spec = RunSpec::new();

        for (line_no, line) in logical_lines(content) {
            let (key, value) = split_property(&line).ok_or_else(|| ResolveError::RunSpecParse {
                message: format!("line {}: missing key", line_no),
            })?;

            match key {
                RUNREPOS_INSTRUCTION => {
                    let names = parse_header(value)?.into_iter().map(|clause| clause.name);
                    spec.run_repos = Some(names.collect());
                }
                RUNFW_INSTRUCTION => spec.run_framework = Some(value.to_string()),
                other => tracing::debug!(instruction = other, "ignoring run descriptor instruction"),
            }
        }

        spec.normalise();
        Ok(spec)
    }

    /// Load from a file; `.bndrun` files use the descriptor syntax, anything
    /// else is read as TOML
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as the chosen parser.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut spec = match path.extension().and_then(|e| e.to_str()) {
            Some("bndrun") => Self::from_bndrun_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        spec.source = Some(path.display().to_string());
        Ok(spec)
    }

    /// A blank framework header means no framework
    fn normalise(&mut self) {
        if self
            .run_framework
            .as_deref()
            .is_some_and(|fw| fw.trim().is_empty())
        {
            self.run_framework = None;
        }
    }
}

/// Join continuation lines and drop comments, keeping the first line number
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let trimmed = raw.trim();
        if pending.is_none() && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!')) {
            continue;
        }

        let (continues, text) = match trimmed.strip_suffix('\\') {
            Some(head) => (true, head),
            None => (false, trimmed),
        };

        let (line_no, mut joined) = pending.take().unwrap_or((idx + 1, String::new()));
        joined.push_str(text);
        if continues {
            pending = Some((line_no, joined));
        } else {
            lines.push((line_no, joined));
        }
    }
    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}

/// Split `key: value`, `key=value` or `key value`
fn split_property(line: &str) -> Option<(&str, &str)> {
    let end = line.find(|c: char| c == ':' || c == '=' || c.is_whitespace())?;
    let key = &line[..end];
    if key.is_empty() {
        return None;
    }
    let rest = line[end..].trim_start();
    let rest = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('='))
        .unwrap_or(rest);
    Some((key, rest.trim()))
}
