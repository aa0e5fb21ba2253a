//! Resource type tags
//!
//! Each concrete contract carries a restricted tag enum so that an
//! out-of-range resource type is a decode error for that contract, not a
//! runtime check. All tags serialize as snake_case strings at the boundary.

use serde::{Deserialize, Serialize};

/// Every node kind in a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Model,
    Analysis,
    Test,
    Snapshot,
    Operation,
    Seed,
    Macro,
    Source,
    Documentation,
}

impl NodeType {
    /// Node kinds that can be the target of a ref
    pub fn refable() -> &'static [NodeType] {
        &[NodeType::Model, NodeType::Seed, NodeType::Snapshot]
    }

    pub fn is_refable(&self) -> bool {
        Self::refable().contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Model => "model",
            NodeType::Analysis => "analysis",
            NodeType::Test => "test",
            NodeType::Snapshot => "snapshot",
            NodeType::Operation => "operation",
            NodeType::Seed => "seed",
            NodeType::Macro => "macro",
            NodeType::Source => "source",
            NodeType::Documentation => "documentation",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Node kinds valid for raw SQL nodes found in project files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnparsedNodeType {
    Model,
    Analysis,
    Test,
    Snapshot,
    Seed,
}

impl From<UnparsedNodeType> for NodeType {
    fn from(value: UnparsedNodeType) -> Self {
        match value {
            UnparsedNodeType::Model => NodeType::Model,
            UnparsedNodeType::Analysis => NodeType::Analysis,
            UnparsedNodeType::Test => NodeType::Test,
            UnparsedNodeType::Snapshot => NodeType::Snapshot,
            UnparsedNodeType::Seed => NodeType::Seed,
        }
    }
}

/// The only resource type a run hook may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    #[default]
    Operation,
}

impl From<OperationType> for NodeType {
    fn from(_: OperationType) -> Self {
        NodeType::Operation
    }
}

/// The only resource type a macro may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroType {
    #[default]
    Macro,
}

impl From<MacroType> for NodeType {
    fn from(_: MacroType) -> Self {
        NodeType::Macro
    }
}

/// The only resource type a parsed test may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    #[default]
    Test,
}

impl From<TestType> for NodeType {
    fn from(_: TestType) -> Self {
        NodeType::Test
    }
}

/// The only resource type a parsed snapshot may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotType {
    #[default]
    Snapshot,
}

impl From<SnapshotType> for NodeType {
    fn from(_: SnapshotType) -> Self {
        NodeType::Snapshot
    }
}

/// The only resource type a source definition may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Source,
}

impl From<SourceType> for NodeType {
    fn from(_: SourceType) -> Self {
        NodeType::Source
    }
}

/// The only resource type a documentation file may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentationType {
    #[default]
    Documentation,
}

impl From<DocumentationType> for NodeType {
    fn from(_: DocumentationType) -> Self {
        NodeType::Documentation
    }
}
