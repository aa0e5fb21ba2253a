//! Shared value objects for node contracts

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ContractError;

pub(crate) fn default_true() -> bool {
    true
}

/// A SQL statement run before or after a node builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hook {
    pub sql: String,

    /// Whether the hook runs inside the node's transaction
    #[serde(default = "default_true")]
    pub transaction: bool,

    /// Insertion order, assigned by the consumer during hook resolution
    #[serde(default)]
    pub index: Option<usize>,
}

/// Quoting behavior for the three parts of a relation name
///
/// Unset fields defer to the surrounding configuration; see [`Quoting::merged`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quoting {
    #[serde(default)]
    pub database: Option<bool>,

    #[serde(default)]
    pub schema: Option<bool>,

    #[serde(default)]
    pub identifier: Option<bool>,
}

impl Quoting {
    /// Field-wise merge: the override's value wins when set, else ours is kept
    pub fn merged(&self, other: &Quoting) -> Quoting {
        Quoting {
            database: other.database.or(self.database),
            schema: other.schema.or(self.schema),
            identifier: other.identifier.or(self.identifier),
        }
    }
}

/// Metadata for a single column of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnInfo {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// A reference from a node or column to a documentation block
///
/// Unlike a plain ref, a docref also records what it applies to: the doc
/// package and name, plus the column name when the description being rendered
/// belongs to a column rather than the node itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Docref {
    pub documentation_name: String,
    pub documentation_package: String,

    #[serde(default)]
    pub column_name: Option<String>,
}

/// Dependency edges discovered while rendering a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependsOn {
    #[serde(default)]
    pub nodes: Vec<String>,

    #[serde(default)]
    pub macros: Vec<String>,
}

/// Dependency edges of a macro; macros can only depend on other macros
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroDependsOn {
    #[serde(default)]
    pub macros: Vec<String>,
}

/// How a failing test is reported
///
/// Input is matched case-insensitively; the encoded form is lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    #[default]
    Error,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl FromStr for Severity {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("warn") {
            Ok(Severity::Warn)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(Severity::Error)
        } else {
            Err(ContractError::InvalidValue {
                field: "severity",
                expected: "warn or error (any casing)".to_string(),
                actual: s.to_string(),
            })
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}
