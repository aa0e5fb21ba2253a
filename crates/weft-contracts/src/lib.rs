//! Weft contracts
//!
//! Typed data contracts for weft's internal representation: unparsed and
//! parsed nodes (models, tests, snapshots, macros, sources, documentation),
//! their configuration objects, and the validation rules at each boundary.
//! The renderer, compiler, DAG builder, and adapters live elsewhere; they
//! produce and consume the records defined here.

pub mod common;
pub mod config;
pub mod error;
pub mod freshness;
pub mod hooks;
pub mod node_types;
pub mod parsed;
pub mod serialize;
pub mod unparsed;

pub use common::{ColumnInfo, DependsOn, Docref, Hook, MacroDependsOn, Quoting, Severity};
pub use config::{
    replace_config, CheckCols, CheckSnapshotConfig, HookEntry, NodeConfig, SnapshotConfig,
    SnapshotTarget, TestConfig, TimestampSnapshotConfig,
};
pub use error::ContractError;
pub use freshness::{FreshnessStatus, FreshnessThreshold, Time, TimePeriod};
pub use hooks::{get_hook, get_hook_dict, get_hooks, ModelHookType};
pub use node_types::{
    DocumentationType, MacroType, NodeType, OperationType, SnapshotType, SourceType, TestType,
    UnparsedNodeType,
};
pub use parsed::{
    ParsedDocumentation, ParsedMacro, ParsedNode, ParsedNodePatch, ParsedSnapshotNode,
    ParsedSourceDefinition, ParsedTestNode,
};
pub use serialize::{strip_nulls, Contract};
pub use unparsed::{
    TestDef, UnparsedColumn, UnparsedDocumentationFile, UnparsedMacro, UnparsedNode,
    UnparsedNodeUpdate, UnparsedRunHook, UnparsedSourceDefinition, UnparsedSourceTableDefinition,
};
