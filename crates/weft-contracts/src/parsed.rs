//! Post-render node contracts
//!
//! Parsed nodes are built once raw SQL has been rendered and dependencies
//! resolved: identity plus unique id, fqn, dependency edges, target relation
//! location, and resolved config. Each concrete kind is a flat struct; shared
//! behavior is a small set of capability methods per variant rather than an
//! inheritance chain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{ColumnInfo, DependsOn, Docref, MacroDependsOn, Quoting};
use crate::config::{NodeConfig, SnapshotConfig, TestConfig};
use crate::error::ContractError;
use crate::freshness::FreshnessThreshold;
use crate::node_types::{
    DocumentationType, MacroType, NodeType, SnapshotType, SourceType, TestType, UnparsedNodeType,
};
use crate::serialize::{one_or_many, strip_nulls, Contract};
use serde_json::Value;

/// An external overlay from a schema file, applied to an already-parsed node
///
/// Only the documentation-bearing parts of a node: the patch never carries
/// identity or SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedNodePatch {
    pub name: String,
    pub description: String,
    pub original_file_path: String,
    pub columns: BTreeMap<String, ColumnInfo>,
    pub docrefs: Vec<Docref>,
}

/// A rendered model, analysis, seed, or similar buildable node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedNode {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub raw_sql: String,
    pub name: String,
    pub resource_type: UnparsedNodeType,
    pub unique_id: String,
    pub fqn: Vec<String>,
    pub refs: Vec<Vec<String>>,
    pub sources: Vec<Vec<String>>,

    #[serde(default)]
    pub depends_on: DependsOn,

    pub database: String,
    pub schema: String,
    pub alias: String,
    pub config: NodeConfig,

    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub docrefs: Vec<Docref>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub columns: BTreeMap<String, ColumnInfo>,

    #[serde(default)]
    pub patch_path: Option<String>,

    #[serde(default)]
    pub build_path: Option<String>,

    #[serde(default)]
    pub index: Option<usize>,
}

impl ParsedNode {
    /// Encode omitting unset declared fields, keeping config bag contents
    /// verbatim
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            map.insert("config".to_string(), self.config.to_value()?);
        }
        Ok(value)
    }

    pub fn empty(&self) -> bool {
        self.raw_sql.trim().is_empty()
    }

    pub fn is_refable(&self) -> bool {
        NodeType::from(self.resource_type).is_refable()
    }

    pub fn is_ephemeral(&self) -> bool {
        self.config.materialized == "ephemeral"
    }

    pub fn is_ephemeral_model(&self) -> bool {
        self.is_refable() && self.is_ephemeral()
    }

    pub fn depends_on_nodes(&self) -> &[String] {
        &self.depends_on.nodes
    }

    pub fn materialization(&self) -> &str {
        &self.config.materialized
    }

    /// Overlay a schema-file patch onto this node
    ///
    /// Updates `patch_path`, `description`, `columns`, and `docrefs`; never
    /// touches identity fields or SQL. The patched node is revalidated
    /// against the full contract, so invalid patched content surfaces as a
    /// validation error.
    pub fn patch(&mut self, patch: ParsedNodePatch) -> Result<(), ContractError> {
        self.patch_path = Some(patch.original_file_path);
        self.description = patch.description;
        self.columns = patch.columns;
        self.docrefs = patch.docrefs;
        Self::from_value(self.to_value()?)?;
        Ok(())
    }
}

/// A rendered test node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedTestNode {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub raw_sql: String,
    pub name: String,
    pub resource_type: TestType,
    pub unique_id: String,
    pub fqn: Vec<String>,
    pub refs: Vec<Vec<String>>,
    pub sources: Vec<Vec<String>>,

    #[serde(default)]
    pub depends_on: DependsOn,

    pub database: String,
    pub schema: String,
    pub alias: String,
    pub config: TestConfig,

    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub docrefs: Vec<Docref>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub columns: BTreeMap<String, ColumnInfo>,

    #[serde(default)]
    pub patch_path: Option<String>,

    #[serde(default)]
    pub build_path: Option<String>,

    /// Set for schema tests generated from a column declaration
    #[serde(default)]
    pub column_name: Option<String>,
}

impl ParsedTestNode {
    /// Encode omitting unset declared fields, keeping config bag contents
    /// verbatim
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            map.insert("config".to_string(), self.config.to_value()?);
        }
        Ok(value)
    }

    pub fn empty(&self) -> bool {
        self.raw_sql.trim().is_empty()
    }

    pub fn depends_on_nodes(&self) -> &[String] {
        &self.depends_on.nodes
    }

    pub fn patch(&mut self, patch: ParsedNodePatch) -> Result<(), ContractError> {
        self.patch_path = Some(patch.original_file_path);
        self.description = patch.description;
        self.columns = patch.columns;
        self.docrefs = patch.docrefs;
        Self::from_value(self.to_value()?)?;
        Ok(())
    }
}

/// A rendered snapshot node with its strategy-specific config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedSnapshotNode {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub raw_sql: String,
    pub name: String,
    pub resource_type: SnapshotType,
    pub unique_id: String,
    pub fqn: Vec<String>,
    pub refs: Vec<Vec<String>>,
    pub sources: Vec<Vec<String>>,

    #[serde(default)]
    pub depends_on: DependsOn,

    pub database: String,
    pub schema: String,
    pub alias: String,
    pub config: SnapshotConfig,

    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub docrefs: Vec<Docref>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub columns: BTreeMap<String, ColumnInfo>,

    #[serde(default)]
    pub patch_path: Option<String>,

    #[serde(default)]
    pub build_path: Option<String>,
}

impl ParsedSnapshotNode {
    /// Encode omitting unset declared fields, keeping config bag contents
    /// verbatim
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            map.insert("config".to_string(), self.config.to_value()?);
        }
        Ok(value)
    }

    pub fn empty(&self) -> bool {
        self.raw_sql.trim().is_empty()
    }

    pub fn depends_on_nodes(&self) -> &[String] {
        &self.depends_on.nodes
    }

    pub fn patch(&mut self, patch: ParsedNodePatch) -> Result<(), ContractError> {
        self.patch_path = Some(patch.original_file_path);
        self.description = patch.description;
        self.columns = patch.columns;
        self.docrefs = patch.docrefs;
        Self::from_value(self.to_value()?)?;
        Ok(())
    }
}

/// A parsed macro definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedMacro {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub raw_sql: String,
    pub name: String,
    pub resource_type: MacroType,
    pub unique_id: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub depends_on: MacroDependsOn,
}

/// A named documentation block extracted from a documentation file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedDocumentation {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub file_contents: String,
    pub resource_type: DocumentationType,
    pub name: String,
    pub unique_id: String,
    pub block_contents: String,
}

/// A fully resolved source table definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedSourceDefinition {
    pub package_name: String,
    pub root_path: String,
    pub path: String,
    pub original_file_path: String,
    pub unique_id: String,
    pub fqn: Vec<String>,
    pub database: String,
    pub schema: String,
    pub quoting: Quoting,
    pub name: String,
    pub source_name: String,
    pub source_description: String,
    pub loader: String,
    pub identifier: String,
    pub resource_type: SourceType,

    #[serde(default)]
    pub loaded_at_field: Option<String>,

    #[serde(default)]
    pub freshness: FreshnessThreshold,

    #[serde(default)]
    pub docrefs: Vec<Docref>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub columns: BTreeMap<String, ColumnInfo>,
}

impl ParsedSourceDefinition {
    /// Sources sit at the edge of the graph: nothing upstream of them
    pub fn refs(&self) -> Vec<Vec<String>> {
        Vec::new()
    }

    pub fn sources(&self) -> Vec<Vec<String>> {
        Vec::new()
    }

    pub fn depends_on_nodes(&self) -> &[String] {
        &[]
    }

    pub fn tags(&self) -> &[String] {
        &[]
    }

    pub fn is_ephemeral_model(&self) -> bool {
        false
    }

    /// A source is freshness-checkable only when it declares both a
    /// threshold and the column to measure staleness from
    pub fn has_freshness(&self) -> bool {
        self.freshness.is_set() && self.loaded_at_field.is_some()
    }
}
