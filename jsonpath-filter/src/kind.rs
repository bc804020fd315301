use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a term compares its values against a candidate document.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonKind {
    /// Exact string equality against a named field.
    Equals,
    /// Regular expression test against a named field, or against the whole
    /// serialized document when no field is named.
    Matches,
}

impl ComparisonKind {
    /// Separator used between key and value in the compact filter string.
    pub fn separator(&self) -> char {
        match self {
            ComparisonKind::Equals => ':',
            ComparisonKind::Matches => '~',
        }
    }

    pub fn from_separator(separator: char) -> Option<Self> {
        match separator {
            ':' => Some(ComparisonKind::Equals),
            '~' => Some(ComparisonKind::Matches),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonKind::Equals => write!(f, "EQUALS"),
            ComparisonKind::Matches => write!(f, "MATCHES"),
        }
    }
}

impl FromStr for ComparisonKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equals" | "eq" | ":" => Ok(ComparisonKind::Equals),
            "matches" | "like" | "~" => Ok(ComparisonKind::Matches),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_round_trip() {
        for kind in [ComparisonKind::Equals, ComparisonKind::Matches] {
            assert_eq!(ComparisonKind::from_separator(kind.separator()), Some(kind));
        }
        assert_eq!(ComparisonKind::from_separator('='), None);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("EQUALS".parse::<ComparisonKind>(), Ok(ComparisonKind::Equals));
        assert_eq!("Matches".parse::<ComparisonKind>(), Ok(ComparisonKind::Matches));
        assert_eq!("~".parse::<ComparisonKind>(), Ok(ComparisonKind::Matches));
        assert_eq!("contains".parse::<ComparisonKind>(), Err(()));
    }

    #[test]
    fn test_serde_uses_uppercase_names() {
        assert_eq!(
            serde_json::to_string(&ComparisonKind::Matches).unwrap(),
            r#""MATCHES""#
        );
        let kind: ComparisonKind = serde_json::from_str(r#""EQUALS""#).unwrap();
        assert_eq!(kind, ComparisonKind::Equals);
    }
}
