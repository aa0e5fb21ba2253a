//! Pre-render node contracts
//!
//! These are the raw records handed to the renderer: identity provenance
//! plus unrendered SQL or file contents. Unknown keys are rejected here;
//! only configs carry an open extension bag.

use serde::{Deserialize, Serialize};

use crate::common::Quoting;
use crate::freshness::FreshnessThreshold;
use crate::node_types::{DocumentationType, OperationType, UnparsedNodeType};

/// A macro definition file, not yet rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedMacro {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub raw_sql: String,
}

/// A raw SQL node discovered in a project, before rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedNode {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub raw_sql: String,
    pub name: String,
    pub resource_type: UnparsedNodeType,
}

impl UnparsedNode {
    /// True when the raw SQL is blank after trimming whitespace
    pub fn empty(&self) -> bool {
        self.raw_sql.trim().is_empty()
    }
}

/// An on-run-start / on-run-end hook declared in the project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedRunHook {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub raw_sql: String,
    pub name: String,
    pub resource_type: OperationType,

    #[serde(default)]
    pub index: Option<usize>,
}

/// A documentation file, before block extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedDocumentationFile {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub file_contents: String,
    pub resource_type: DocumentationType,
}

/// A test declared on a node or column in a schema file: either a bare test
/// name or a mapping of test name to its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestDef {
    Name(String),
    WithArgs(serde_json::Map<String, serde_json::Value>),
}

/// A column entry in a schema file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedColumn {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tests: Vec<TestDef>,
}

/// A schema-file entry describing an existing node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedNodeUpdate {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tests: Vec<TestDef>,

    #[serde(default)]
    pub columns: Vec<UnparsedColumn>,
}

/// A table within a source declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedSourceTableDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tests: Vec<TestDef>,

    #[serde(default)]
    pub columns: Vec<UnparsedColumn>,

    #[serde(default)]
    pub loaded_at_field: Option<String>,

    #[serde(default)]
    pub identifier: Option<String>,

    #[serde(default)]
    pub quoting: Quoting,

    #[serde(default)]
    pub freshness: FreshnessThreshold,
}

/// A source declaration from a schema file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnparsedSourceDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub loader: String,

    #[serde(default)]
    pub quoting: Quoting,

    #[serde(default)]
    pub freshness: FreshnessThreshold,

    #[serde(default)]
    pub loaded_at_field: Option<String>,

    #[serde(default)]
    pub tables: Vec<UnparsedSourceTableDefinition>,
}
