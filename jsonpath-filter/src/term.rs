use crate::{ComparisonKind, FilterError};
use indexmap::IndexSet;
use lazy_static::lazy_static;
use log::{debug, error};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key sentinel meaning "no specific field, test the whole document".
pub const WHOLE_DOCUMENT: &str = "@";

lazy_static! {
    // key, optional separator, value
    static ref COMPACT_TERM_RE: Regex =
        Regex::new(r"^([^:~]+)([:~]?)(.*)$").expect("valid compact term pattern");
}

/// One filter constraint: a comparison kind, a target key and the values it
/// accepts. Values are a disjunction, kept in insertion order without
/// duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "TermJson", try_from = "TermJson")]
pub struct Term {
    kind: ComparisonKind,
    key: String,
    values: IndexSet<String>,
    display_key: Option<String>,
}

/// Persisted shape of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermJson {
    pub kind: ComparisonKind,
    pub values: Vec<String>,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_key: Option<String>,
}

impl Term {
    /// Creates a term accepting a single value.
    ///
    /// The whole-document key `"@"` can only be used with
    /// [`ComparisonKind::Matches`]; any other combination is rejected.
    pub fn new(
        kind: ComparisonKind,
        value: impl Into<String>,
        key: impl Into<String>,
        display_key: Option<String>,
    ) -> Result<Self, FilterError> {
        let key = key.into();
        if key == WHOLE_DOCUMENT && kind != ComparisonKind::Matches {
            error!(
                "Rejected {} term on the whole-document key {:?}",
                kind, WHOLE_DOCUMENT
            );
            return Err(FilterError::InvalidArgument(format!(
                "whole-document key {:?} requires {}, got {}",
                WHOLE_DOCUMENT,
                ComparisonKind::Matches,
                kind
            )));
        }
        Ok(Self::with_single_value(kind, key, value.into(), display_key))
    }

    /// Free-text search over the entire serialized document.
    pub fn whole_document(value: impl Into<String>) -> Self {
        Self::with_single_value(
            ComparisonKind::Matches,
            WHOLE_DOCUMENT.to_string(),
            value.into(),
            None,
        )
    }

    fn with_single_value(
        kind: ComparisonKind,
        key: String,
        value: String,
        display_key: Option<String>,
    ) -> Self {
        Self {
            kind,
            key,
            values: IndexSet::from([value]),
            display_key,
        }
    }

    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_key(&self) -> Option<&str> {
        self.display_key.as_deref()
    }

    /// Human-facing key: the display key when set, the key otherwise.
    pub fn label(&self) -> &str {
        self.display_key.as_deref().unwrap_or(&self.key)
    }

    pub fn values(&self) -> &IndexSet<String> {
        &self.values
    }

    pub fn is_whole_document(&self) -> bool {
        self.key == WHOLE_DOCUMENT
    }

    /// Unions `new_values` into this term. The new values come first, in the
    /// order given, followed by the existing values not already present.
    pub fn add<I, S>(&mut self, new_values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut merged: IndexSet<String> = new_values.into_iter().map(Into::into).collect();
        merged.extend(std::mem::take(&mut self.values));
        self.values = merged;
    }

    pub(crate) fn into_values(self) -> IndexSet<String> {
        self.values
    }

    /// Compiles the term into a JSONPath boolean sub-expression, without
    /// surrounding parentheses.
    pub fn to_json_path(&self) -> String {
        match self.kind {
            ComparisonKind::Equals => self
                .values
                .iter()
                .map(|value| format!("@.{}==\"{}\"", self.key, value))
                .collect::<Vec<_>>()
                .join("||"),
            ComparisonKind::Matches if self.is_whole_document() => format!(
                "/{}/.test(JSON.stringify(@))",
                escape_slashes(self.first_value())
            ),
            ComparisonKind::Matches => self
                .values
                .iter()
                .map(|value| format!("/{}/.test(@.{})", escape_slashes(value), self.key))
                .collect::<Vec<_>>()
                .join("||"),
        }
    }

    /// Rebuilds a term from its persisted shape. Only single-value payloads
    /// are supported.
    pub fn from_json(json: TermJson) -> Result<Self, FilterError> {
        let TermJson {
            kind,
            values,
            key,
            display_key,
        } = json;
        let value = match <[String; 1]>::try_from(values) {
            Ok([value]) => value,
            Err(values) => {
                return Err(FilterError::InvalidArgument(format!(
                    "expected exactly one value for term {:?}, got {}",
                    key,
                    values.len()
                )))
            }
        };
        Self::new(kind, value, key, display_key)
    }

    pub fn from_json_str(json: &str) -> Result<Self, FilterError> {
        let payload: TermJson = serde_json::from_str(json)?;
        Self::from_json(payload)
    }

    pub fn to_json(&self) -> TermJson {
        TermJson {
            kind: self.kind,
            values: self.values.iter().cloned().collect(),
            key: self.key.clone(),
            display_key: self.display_key.clone(),
        }
    }

    fn first_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or_default()
    }

    fn joined_values(&self) -> String {
        self.values
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
            .replace('\\', "")
    }
}

fn escape_slashes(value: &str) -> String {
    value.replace('/', "\\/")
}

/// Same kind, key and value set. Value order and display key are ignored.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.key == other.key && self.values == other.values
    }
}

impl Eq for Term {}

impl FromStr for Term {
    type Err = FilterError;

    /// Parses the compact form: `key:value`, `key~value` or bare free text.
    /// All whitespace is dropped first.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let captures = COMPACT_TERM_RE.captures(&compact).ok_or_else(|| {
            FilterError::ParseError(format!(
                "Expected format: `key:value`, `key~value` or free text, found {:?}",
                input
            ))
        })?;
        let key = &captures[1];
        let value = &captures[3];

        let term = match captures[2].chars().next() {
            Some(separator) => {
                let kind = ComparisonKind::from_separator(separator).ok_or_else(|| {
                    FilterError::ParseError(format!("Unknown separator {:?}", separator))
                })?;
                Term::new(kind, value, key, None)?
            }
            None => Term::whole_document(key),
        };
        debug!("Parsed filter {:?} as {:?}", input, term);
        Ok(term)
    }
}

impl fmt::Display for Term {
    /// Renders the compact form accepted by [`Term::from_str`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ComparisonKind::Matches if self.is_whole_document() => {
                write!(f, "{}", self.first_value())
            }
            ComparisonKind::Equals | ComparisonKind::Matches => write!(
                f,
                "{}{}{}",
                self.label(),
                self.kind.separator(),
                self.joined_values()
            ),
        }
    }
}

impl From<Term> for TermJson {
    fn from(term: Term) -> Self {
        term.to_json()
    }
}

impl TryFrom<TermJson> for Term {
    type Error = FilterError;

    fn try_from(json: TermJson) -> Result<Self, Self::Error> {
        Term::from_json(json)
    }
}
