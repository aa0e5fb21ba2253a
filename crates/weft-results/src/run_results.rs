//! Run outcome records
//!
//! One record per executed node, aggregated into an execution result for the
//! run artifact. A partial result is what exists when execution stopped
//! before a node could produce a full outcome.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use weft_contracts::{
    strip_nulls, Contract, ContractError, ParsedNode, ParsedSnapshotNode, ParsedSourceDefinition,
    ParsedTestNode,
};

use crate::artifact::{write_json, ResultsError};
use crate::timing::TimingInfo;

/// The node a result refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultNode {
    Source(Box<ParsedSourceDefinition>),
    Snapshot(Box<ParsedSnapshotNode>),
    Test(Box<ParsedTestNode>),
    Node(Box<ParsedNode>),
}

impl ResultNode {
    pub fn unique_id(&self) -> &str {
        match self {
            ResultNode::Source(source) => &source.unique_id,
            ResultNode::Snapshot(snapshot) => &snapshot.unique_id,
            ResultNode::Test(test) => &test.unique_id,
            ResultNode::Node(node) => &node.unique_id,
        }
    }

    /// Encode via the node's own bag-preserving encode
    ///
    /// The boxes are deref'd explicitly so each arm hits the node type's
    /// inherent encode, not the generic one on the box.
    pub fn to_value(&self) -> Result<Value, ContractError> {
        match self {
            ResultNode::Source(source) => source.as_ref().to_value(),
            ResultNode::Snapshot(snapshot) => snapshot.as_ref().to_value(),
            ResultNode::Test(test) => test.as_ref().to_value(),
            ResultNode::Node(node) => node.as_ref().to_value(),
        }
    }
}

/// Adapter-reported status of an execution: row count, state string, or flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultStatus {
    Bool(bool),
    Int(i64),
    String(String),
}

/// Outcome of a node whose execution stopped before producing a full result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialResult {
    pub node: ResultNode,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub status: Option<ResultStatus>,

    #[serde(default)]
    pub execution_time: f64,

    #[serde(default)]
    pub thread_id: Option<u64>,

    #[serde(default)]
    pub timing: Vec<TimingInfo>,

    #[serde(default)]
    pub fail: Option<bool>,
}

impl PartialResult {
    pub fn new(node: ResultNode) -> Self {
        PartialResult {
            node,
            error: None,
            status: None,
            execution_time: 0.0,
            thread_id: None,
            timing: Vec::new(),
            fail: None,
        }
    }

    /// A result that got far enough to be skipped is a full result, never a
    /// partial one
    pub fn skipped(&self) -> bool {
        false
    }

    /// Encode omitting unset fields, keeping config bag contents verbatim
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            map.insert("node".to_string(), self.node.to_value()?);
        }
        Ok(value)
    }

    pub fn write(&self, path: &Path) -> Result<(), ResultsError> {
        write_json(path, &self.to_value()?)
    }
}

/// Full outcome of one executed node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunModelResult {
    #[serde(flatten)]
    pub base: PartialResult,

    #[serde(default)]
    pub skip: bool,
}

impl RunModelResult {
    pub fn new(node: ResultNode) -> Self {
        RunModelResult {
            base: PartialResult::new(node),
            skip: false,
        }
    }

    pub fn skipped(&self) -> bool {
        self.skip
    }

    /// Encode omitting unset fields, keeping config bag contents verbatim
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            map.insert("node".to_string(), self.base.node.to_value()?);
        }
        Ok(value)
    }

    pub fn write(&self, path: &Path) -> Result<(), ResultsError> {
        write_json(path, &self.to_value()?)
    }
}

/// The whole run: every node outcome plus run-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub results: Vec<RunModelResult>,
    pub generated_at: DateTime<Utc>,
    pub elapsed_time: f64,
}

impl ExecutionResult {
    /// Encode omitting unset fields, keeping config bag contents verbatim
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            let results = self
                .results
                .iter()
                .map(|result| result.to_value())
                .collect::<Result<Vec<_>, _>>()?;
            map.insert("results".to_string(), Value::Array(results));
        }
        Ok(value)
    }

    pub fn write(&self, path: &Path) -> Result<(), ResultsError> {
        write_json(path, &self.to_value()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use weft_contracts::Contract;

    fn model_node() -> ResultNode {
        let node = ParsedNode::from_value(json!({
            "package_name": "analytics",
            "root_path": "/project",
            "path": "models/events.sql",
            "original_file_path": "models/events.sql",
            "raw_sql": "select 1",
            "name": "events",
            "resource_type": "model",
            "unique_id": "model.analytics.events",
            "fqn": ["analytics", "events"],
            "refs": [],
            "sources": [],
            "database": "warehouse",
            "schema": "analytics",
            "alias": "events",
            "config": {},
        }))
        .unwrap();
        ResultNode::Node(Box::new(node))
    }

    #[test]
    fn unique_id_passes_through() {
        assert_eq!(model_node().unique_id(), "model.analytics.events");
    }

    #[test]
    fn partial_result_is_never_skipped() {
        let result = PartialResult::new(model_node());
        assert!(!result.skipped());
        assert!(result.error.is_none());
    }

    #[test]
    fn run_model_result_round_trip() {
        let mut result = RunModelResult::new(model_node());
        result.base.status = Some(ResultStatus::String("CREATE TABLE".to_string()));
        result.base.execution_time = 1.25;
        result.base.timing.push(TimingInfo::new("compile"));

        let value = result.to_value().unwrap();
        assert_eq!(value["skip"], json!(false));
        assert_eq!(value["status"], json!("CREATE TABLE"));
        assert_eq!(RunModelResult::from_value(value).unwrap(), result);
    }

    #[test]
    fn null_config_keys_survive_result_encoding() {
        let node = ParsedNode::from_value(json!({
            "package_name": "analytics",
            "root_path": "/project",
            "path": "models/events.sql",
            "original_file_path": "models/events.sql",
            "raw_sql": "select 1",
            "name": "events",
            "resource_type": "model",
            "unique_id": "model.analytics.events",
            "fqn": ["analytics", "events"],
            "refs": [],
            "sources": [],
            "database": "warehouse",
            "schema": "analytics",
            "alias": "events",
            "config": {"foo": null},
        }))
        .unwrap();
        let result = RunModelResult::new(ResultNode::Node(Box::new(node)));

        let value = result.to_value().unwrap();
        assert_eq!(value["node"]["config"]["foo"], json!(null));
        assert_eq!(RunModelResult::from_value(value).unwrap(), result);

        let run = ExecutionResult {
            results: vec![result],
            generated_at: "2026-08-01T12:00:00Z".parse().unwrap(),
            elapsed_time: 4.5,
        };
        let value = run.to_value().unwrap();
        assert_eq!(value["results"][0]["node"]["config"]["foo"], json!(null));
        assert_eq!(ExecutionResult::from_value(value).unwrap(), run);
    }

    #[test]
    fn single_results_write_as_artifacts() {
        let path = std::env::temp_dir().join("weft-run-result-test.json");
        let mut result = RunModelResult::new(model_node());
        result.base.status = Some(ResultStatus::String("CREATE TABLE".to_string()));
        result.write(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["status"], json!("CREATE TABLE"));
        assert_eq!(written["skip"], json!(false));
        assert_eq!(
            written["node"]["unique_id"],
            json!("model.analytics.events")
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn status_decodes_strings_ints_and_bools() {
        let decoded: ResultStatus = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(decoded, ResultStatus::Int(3));
        let decoded: ResultStatus = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(decoded, ResultStatus::Bool(true));
        let decoded: ResultStatus = serde_json::from_value(json!("OK")).unwrap();
        assert_eq!(decoded, ResultStatus::String("OK".to_string()));
    }

    #[test]
    fn execution_result_round_trip() {
        let result = ExecutionResult {
            results: vec![RunModelResult::new(model_node())],
            generated_at: "2026-08-01T12:00:00Z".parse().unwrap(),
            elapsed_time: 4.5,
        };
        let value = result.to_value().unwrap();
        assert_eq!(value["elapsed_time"], json!(4.5));
        assert_eq!(ExecutionResult::from_value(value).unwrap(), result);
    }
}
