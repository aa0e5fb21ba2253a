//! Hook resolution
//!
//! Config hooks arrive as bare SQL strings, JSON-encoded mappings, or full
//! hook mappings. Resolution normalizes all of them to validated [`Hook`]
//! records with their position in the source sequence as the index.

use serde_json::{json, Value};

use crate::common::Hook;
use crate::config::{HookEntry, NodeConfig};
use crate::error::ContractError;
use crate::serialize::Contract;

/// The two hook phases around a node build; hyphenated at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ModelHookType {
    #[serde(rename = "pre-hook")]
    PreHook,
    #[serde(rename = "post-hook")]
    PostHook,
}

impl std::fmt::Display for ModelHookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHookType::PreHook => write!(f, "pre-hook"),
            ModelHookType::PostHook => write!(f, "post-hook"),
        }
    }
}

/// Interpret a hook string as its mapping form
///
/// Strings that parse as JSON are used as parsed; anything else is treated
/// as raw SQL. Total: never fails.
pub fn get_hook_dict(source: &str) -> Value {
    match serde_json::from_str(source) {
        Ok(value) => value,
        Err(_) => json!({ "sql": source }),
    }
}

/// Resolve one config hook entry, injecting `index` only when absent
pub fn get_hook(source: &HookEntry, index: usize) -> Result<Hook, ContractError> {
    let mut value = match source {
        HookEntry::Sql(sql) => get_hook_dict(sql),
        HookEntry::Hook(hook) => hook.to_value()?,
    };
    if let Value::Object(map) = &mut value {
        map.entry("index").or_insert_with(|| json!(index));
    }
    Hook::from_value(value)
}

/// Resolve all hooks of one phase, in declaration order
pub fn get_hooks(config: &NodeConfig, hook_type: ModelHookType) -> Result<Vec<Hook>, ContractError> {
    let entries = match hook_type {
        ModelHookType::PreHook => &config.pre_hook,
        ModelHookType::PostHook => &config.post_hook,
    };
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| get_hook(entry, index))
        .collect()
}
