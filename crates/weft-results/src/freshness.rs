//! Source freshness check results and run output
//!
//! A freshness run produces one result per checked source: either a measured
//! age with its computed status, or a runtime error from the warehouse. The
//! run artifact is a compact shape keyed by source unique id.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use weft_contracts::{
    strip_nulls, Contract, ContractError, FreshnessStatus, FreshnessThreshold,
    ParsedSourceDefinition,
};

use crate::artifact::{write_json, ResultsError};
use crate::run_results::PartialResult;
use crate::timing::TimingInfo;

/// Measured freshness of one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFreshnessResult {
    pub node: ParsedSourceDefinition,
    pub max_loaded_at: DateTime<Utc>,
    pub snapshotted_at: DateTime<Utc>,

    /// Observed age in seconds: snapshotted_at minus max_loaded_at
    pub age: f64,

    pub status: FreshnessStatus,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub execution_time: f64,

    #[serde(default)]
    pub thread_id: Option<u64>,

    #[serde(default)]
    pub timing: Vec<TimingInfo>,
}

impl SourceFreshnessResult {
    pub fn failed(&self) -> bool {
        self.status == FreshnessStatus::Error
    }

    pub fn skipped(&self) -> bool {
        false
    }
}

/// Outcome for one source in a freshness run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FreshnessNodeResult {
    /// The source was measured and evaluated
    Fresh(Box<SourceFreshnessResult>),
    /// Execution failed before a measurement existed
    Errored(Box<PartialResult>),
}

impl FreshnessNodeResult {
    pub fn unique_id(&self) -> &str {
        match self {
            FreshnessNodeResult::Fresh(result) => &result.node.unique_id,
            FreshnessNodeResult::Errored(result) => result.node.unique_id(),
        }
    }

    /// Encode via the variant's own encode; boxes are deref'd explicitly so
    /// the errored arm hits the bag-preserving one
    pub fn to_value(&self) -> Result<Value, ContractError> {
        match self {
            FreshnessNodeResult::Fresh(result) => result.as_ref().to_value(),
            FreshnessNodeResult::Errored(result) => result.as_ref().to_value(),
        }
    }
}

/// Run-level metadata for the freshness artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreshnessMetadata {
    pub generated_at: DateTime<Utc>,
    pub elapsed_time: f64,
}

/// Everything a freshness run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreshnessExecutionResult {
    pub generated_at: DateTime<Utc>,
    pub elapsed_time: f64,
    pub results: Vec<FreshnessNodeResult>,
}

impl FreshnessExecutionResult {
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

    /// Reshape into the compact output schema keyed by source unique id
    pub fn output(&self) -> FreshnessRunOutput {
        let meta = FreshnessMetadata {
            generated_at: self.generated_at,
            elapsed_time: self.elapsed_time,
        };
        let mut sources = BTreeMap::new();
        for result in &self.results {
            let entry = match result {
                FreshnessNodeResult::Fresh(fresh) => match &fresh.error {
                    Some(error) => {
                        SourceFreshnessRunResult::RuntimeError(SourceFreshnessRuntimeError {
                            error: error.clone(),
                            state: FreshnessErrorState::RuntimeError,
                        })
                    }
                    None => SourceFreshnessRunResult::Output(SourceFreshnessOutput {
                        max_loaded_at: fresh.max_loaded_at,
                        snapshotted_at: fresh.snapshotted_at,
                        max_loaded_at_time_ago_in_s: fresh.age,
                        state: fresh.status,
                        criteria: fresh.node.freshness,
                    }),
                },
                FreshnessNodeResult::Errored(partial) => {
                    SourceFreshnessRunResult::RuntimeError(SourceFreshnessRuntimeError {
                        error: partial.error.clone().unwrap_or_default(),
                        state: FreshnessErrorState::RuntimeError,
                    })
                }
            };
            sources.insert(result.unique_id().to_string(), entry);
        }
        FreshnessRunOutput { meta, sources }
    }

    /// Write the compact output schema to `path`
    pub fn write(&self, path: &Path) -> Result<(), ResultsError> {
        self.output().write(path)
    }
}

/// The only state a runtime-error entry may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreshnessErrorState {
    #[default]
    #[serde(rename = "runtime error")]
    RuntimeError,
}

/// Output entry for a source whose check failed at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFreshnessRuntimeError {
    pub error: String,
    pub state: FreshnessErrorState,
}

/// Output entry for a measured source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFreshnessOutput {
    pub max_loaded_at: DateTime<Utc>,
    pub snapshotted_at: DateTime<Utc>,
    pub max_loaded_at_time_ago_in_s: f64,
    pub state: FreshnessStatus,
    pub criteria: FreshnessThreshold,
}

/// One entry per source in the freshness artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceFreshnessRunResult {
    Output(SourceFreshnessOutput),
    RuntimeError(SourceFreshnessRuntimeError),
}

/// The freshness run artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreshnessRunOutput {
    pub meta: FreshnessMetadata,
    pub sources: BTreeMap<String, SourceFreshnessRunResult>,
}

impl FreshnessRunOutput {
    pub fn write(&self, path: &Path) -> Result<(), ResultsError> {
        write_json(path, &self.to_value()?)
    }
}
