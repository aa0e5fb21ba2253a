//! JSON artifact writing
//!
//! Result records are written as pretty-printed JSON of their omit-unset
//! encoding, for consumption by reporting and CI layers. Callers encode
//! first and hand over the mapping, so records with open config bags keep
//! their bag-preserving encode on the way to disk.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use weft_contracts::ContractError;

/// Errors from encoding or writing result artifacts
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("failed to serialize run results: {0}")]
    Serialize(String),

    #[error("failed to write {path}: {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Write an encoded record to `path` as pretty JSON
pub fn write_json(path: &Path, value: &Value) -> Result<(), ResultsError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| ResultsError::Serialize(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| ResultsError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use weft_contracts::Contract;

    #[derive(Serialize, Deserialize)]
    struct Artifact {
        name: String,
        note: Option<String>,
    }

    #[test]
    fn writes_omit_unset_json() {
        let path = std::env::temp_dir().join("weft-artifact-test.json");
        let artifact = Artifact {
            name: "run".to_string(),
            note: None,
        };
        write_json(&path, &artifact.to_value().unwrap()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"name": "run"}));
        std::fs::remove_file(&path).ok();
    }
}
