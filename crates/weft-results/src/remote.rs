//! Results served over the RPC interface
//!
//! A compile request returns the rendered SQL; a run request additionally
//! returns the fetched rows. Neither carries an error field: RPC failures
//! are reported out of band, so `error()` is always empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timing::TimingInfo;

/// Result of compiling a SQL snippet on behalf of a remote caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCompileResult {
    pub raw_sql: String,
    pub compiled_sql: String,

    #[serde(default)]
    pub timing: Vec<TimingInfo>,
}

impl RemoteCompileResult {
    pub fn error(&self) -> Option<&str> {
        None
    }
}

/// Rows fetched by a remote run: the column names and the raw row values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub column_names: Vec<String>,
    pub rows: Vec<Value>,
}

/// Result of compiling and executing a SQL snippet on behalf of a remote
/// caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRunResult {
    #[serde(flatten)]
    pub base: RemoteCompileResult,

    pub table: ResultTable,
}

impl RemoteRunResult {
    pub fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use weft_contracts::Contract;

    #[test]
    fn compile_result_round_trip() {
        let result = RemoteCompileResult {
            raw_sql: "select {{ 1 + 1 }}".to_string(),
            compiled_sql: "select 2".to_string(),
            timing: vec![TimingInfo::new("compile")],
        };
        assert!(result.error().is_none());

        let value = result.to_value().unwrap();
        assert_eq!(value["compiled_sql"], json!("select 2"));
        assert_eq!(RemoteCompileResult::from_value(value).unwrap(), result);
    }

    #[test]
    fn run_result_flattens_compile_fields() {
        let result = RemoteRunResult {
            base: RemoteCompileResult {
                raw_sql: "select {{ 1 + 1 }} as two".to_string(),
                compiled_sql: "select 2 as two".to_string(),
                timing: Vec::new(),
            },
            table: ResultTable {
                column_names: vec!["two".to_string()],
                rows: vec![json!({"two": 2})],
            },
        };
        assert!(result.error().is_none());

        let value = result.to_value().unwrap();
        assert_eq!(value["raw_sql"], json!("select {{ 1 + 1 }} as two"));
        assert_eq!(value["table"]["column_names"], json!(["two"]));
        assert_eq!(RemoteRunResult::from_value(value).unwrap(), result);
    }

    #[test]
    fn run_result_requires_table() {
        let value = json!({
            "raw_sql": "select 1",
            "compiled_sql": "select 1",
        });
        assert!(RemoteCompileResult::from_value(value.clone()).is_ok());
        assert!(RemoteRunResult::from_value(value).is_err());
    }
}
