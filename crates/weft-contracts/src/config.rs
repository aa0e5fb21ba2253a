//! Node configuration contracts
//!
//! Configs are the one place where unknown input keys are legal: anything a
//! materialization or adapter wants to read can ride along in the extension
//! bag and survives a decode/encode round trip bit-for-bit. Declared fields
//! stay strongly typed; the bag is merged back in at the serialization
//! boundary by `#[serde(flatten)]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::common::{default_true, Hook, Severity};
use crate::error::ContractError;
use crate::serialize::{one_or_many, strip_nulls, Contract};

fn default_materialized() -> String {
    "view".to_string()
}

/// A hook as it appears in config input: either a bare SQL string or a full
/// hook mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookEntry {
    Sql(String),
    Hook(Hook),
}

/// Behavior settings attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_materialized")]
    pub materialized: String,

    #[serde(default)]
    pub persist_docs: BTreeMap<String, Value>,

    #[serde(
        rename = "pre-hook",
        alias = "pre_hook",
        default,
        deserialize_with = "one_or_many"
    )]
    pub pre_hook: Vec<HookEntry>,

    #[serde(
        rename = "post-hook",
        alias = "post_hook",
        default,
        deserialize_with = "one_or_many"
    )]
    pub post_hook: Vec<HookEntry>,

    #[serde(default)]
    pub vars: BTreeMap<String, Value>,

    #[serde(default)]
    pub quoting: BTreeMap<String, Value>,

    #[serde(default)]
    pub column_types: BTreeMap<String, Value>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,

    /// Undeclared keys supplied at decode time, re-emitted verbatim on encode
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            enabled: true,
            materialized: default_materialized(),
            persist_docs: BTreeMap::new(),
            pre_hook: Vec::new(),
            post_hook: Vec::new(),
            vars: BTreeMap::new(),
            quoting: BTreeMap::new(),
            column_types: BTreeMap::new(),
            tags: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl NodeConfig {
    /// Encode omitting unset declared fields
    ///
    /// Bag contents are re-emitted verbatim, null values included; only the
    /// declared fields go through null stripping.
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            self.restore_bags(map);
        }
        Ok(value)
    }

    fn restore_bags(&self, map: &mut serde_json::Map<String, Value>) {
        for (key, bag) in [
            ("persist_docs", &self.persist_docs),
            ("vars", &self.vars),
            ("quoting", &self.quoting),
            ("column_types", &self.column_types),
        ] {
            map.insert(key.to_string(), bag_object(bag));
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
    }

    /// Apply overrides and revalidate
    ///
    /// Overrides may target declared fields or extension-bag keys alike; the
    /// config is encoded completely, overlaid, and decoded again so the
    /// result always satisfies the contract.
    pub fn replace<I>(&self, overrides: I) -> Result<NodeConfig, ContractError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        replace_config(self, overrides)
    }
}

fn bag_object(bag: &BTreeMap<String, Value>) -> Value {
    Value::Object(bag.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Encode a config completely, overlay overrides, decode with full validation
pub fn replace_config<C, I>(config: &C, overrides: I) -> Result<C, ContractError>
where
    C: Contract,
    I: IntoIterator<Item = (String, Value)>,
{
    let complete = config.to_value_complete()?;
    let Value::Object(mut map) = complete else {
        return Err(ContractError::Encode(
            "config did not encode to a mapping".to_string(),
        ));
    };
    for (key, value) in overrides {
        map.insert(key, value);
    }
    C::from_value(Value::Object(map))
}

/// Config for test nodes: node config plus a failure severity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    #[serde(default)]
    pub severity: Severity,

    #[serde(flatten)]
    pub base: NodeConfig,
}

impl TestConfig {
    /// Encode omitting unset declared fields; see [`NodeConfig::to_value`]
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            self.base.restore_bags(map);
        }
        Ok(value)
    }
}

/// Target relation settings shared by both snapshot strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTarget {
    pub unique_key: String,

    #[serde(default)]
    pub target_database: Option<String>,

    #[serde(default)]
    pub target_schema: Option<String>,

    #[serde(flatten)]
    pub base: NodeConfig,
}

/// Snapshot config for the timestamp strategy: rows are considered changed
/// when their `updated_at` column advances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampSnapshotConfig {
    pub updated_at: String,

    #[serde(flatten)]
    pub target: SnapshotTarget,
}

/// Snapshot config for the check strategy: rows are considered changed when
/// any of the checked columns differs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSnapshotConfig {
    pub check_cols: CheckCols,

    #[serde(flatten)]
    pub target: SnapshotTarget,
}

/// Which columns the check strategy compares: every column, or an explicit
/// non-empty list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckCols {
    All,
    Columns(Vec<String>),
}

impl CheckCols {
    pub fn is_all(&self) -> bool {
        matches!(self, CheckCols::All)
    }
}

impl Serialize for CheckCols {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CheckCols::All => serializer.serialize_str("all"),
            CheckCols::Columns(cols) => cols.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CheckCols {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Keyword(String),
            Columns(Vec<String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Keyword(s) if s == "all" => Ok(CheckCols::All),
            Repr::Keyword(s) => Err(serde::de::Error::custom(format!(
                "check_cols must be \"all\" or a list of column names, got {s:?}"
            ))),
            Repr::Columns(cols) if cols.is_empty() => Err(serde::de::Error::custom(
                "check_cols must name at least one column",
            )),
            Repr::Columns(cols) => Ok(CheckCols::Columns(cols)),
        }
    }
}

/// Snapshot configuration, discriminated by the `strategy` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SnapshotConfig {
    Timestamp(TimestampSnapshotConfig),
    Check(CheckSnapshotConfig),
}

impl SnapshotConfig {
    /// Encode omitting unset declared fields; see [`NodeConfig::to_value`]
    pub fn to_value(&self) -> Result<Value, ContractError> {
        let mut value = strip_nulls(self.to_value_complete()?);
        if let Value::Object(map) = &mut value {
            self.base().restore_bags(map);
        }
        Ok(value)
    }

    pub fn target(&self) -> &SnapshotTarget {
        match self {
            SnapshotConfig::Timestamp(config) => &config.target,
            SnapshotConfig::Check(config) => &config.target,
        }
    }

    pub fn base(&self) -> &NodeConfig {
        &self.target().base
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            SnapshotConfig::Timestamp(_) => "timestamp",
            SnapshotConfig::Check(_) => "check",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = NodeConfig::from_value(json!({})).unwrap();
        assert!(config.enabled);
        assert_eq!(config.materialized, "view");
        assert!(config.extra.is_empty());
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn unknown_keys_land_in_extension_bag_and_round_trip() {
        let config = NodeConfig::from_value(json!({
            "materialized": "table",
            "foo": 1,
            "partition_by": {"field": "day"},
        }))
        .unwrap();
        assert_eq!(config.extra.get("foo"), Some(&json!(1)));
        assert_eq!(config.extra.get("partition_by"), Some(&json!({"field": "day"})));

        let encoded = config.to_value().unwrap();
        assert_eq!(encoded["foo"], json!(1));
        assert_eq!(encoded["partition_by"], json!({"field": "day"}));
        assert_eq!(NodeConfig::from_value(encoded).unwrap(), config);
    }

    #[test]
    fn null_extension_values_survive_encode() {
        let config = NodeConfig::from_value(json!({
            "foo": null,
            "meta": {"owner": null, "team": "data"},
        }))
        .unwrap();
        assert_eq!(config.extra.get("foo"), Some(&json!(null)));

        let encoded = config.to_value().unwrap();
        assert_eq!(encoded["foo"], json!(null));
        assert_eq!(encoded["meta"], json!({"owner": null, "team": "data"}));
        assert_eq!(NodeConfig::from_value(encoded).unwrap(), config);
    }

    #[test]
    fn null_bag_values_survive_encode() {
        let config = NodeConfig::from_value(json!({
            "persist_docs": {"relation": null},
            "vars": {"start_date": null},
        }))
        .unwrap();
        let encoded = config.to_value().unwrap();
        assert_eq!(encoded["persist_docs"], json!({"relation": null}));
        assert_eq!(encoded["vars"], json!({"start_date": null}));
        assert_eq!(NodeConfig::from_value(encoded).unwrap(), config);
    }

    #[test]
    fn tags_accept_string_or_list() {
        let config = NodeConfig::from_value(json!({"tags": "nightly"})).unwrap();
        assert_eq!(config.tags, vec!["nightly"]);

        let config = NodeConfig::from_value(json!({"tags": ["a", "b"]})).unwrap();
        assert_eq!(config.tags, vec!["a", "b"]);
    }

    #[test]
    fn hooks_accept_string_mapping_or_list() {
        let config = NodeConfig::from_value(json!({
            "pre-hook": "grant select on x",
            "post-hook": [
                {"sql": "analyze y", "transaction": false},
                "vacuum y",
            ],
        }))
        .unwrap();
        assert_eq!(
            config.pre_hook,
            vec![HookEntry::Sql("grant select on x".to_string())]
        );
        assert_eq!(config.post_hook.len(), 2);
        assert_eq!(
            config.post_hook[0],
            HookEntry::Hook(Hook {
                sql: "analyze y".to_string(),
                transaction: false,
                index: None,
            })
        );

        // hyphenated keys at the boundary
        let encoded = config.to_value().unwrap();
        assert!(encoded.get("pre-hook").is_some());
        assert!(encoded.get("pre_hook").is_none());
    }

    #[test]
    fn underscore_hook_keys_accepted_on_decode() {
        let config = NodeConfig::from_value(json!({"pre_hook": ["grant select on x"]})).unwrap();
        assert_eq!(config.pre_hook.len(), 1);
    }

    #[test]
    fn replace_targets_declared_and_extra_keys() {
        let config = NodeConfig::from_value(json!({"materialized": "table", "foo": 1})).unwrap();
        let replaced = config
            .replace(vec![
                ("materialized".to_string(), json!("incremental")),
                ("foo".to_string(), json!(2)),
                ("bar".to_string(), json!("new")),
            ])
            .unwrap();
        assert_eq!(replaced.materialized, "incremental");
        assert_eq!(replaced.extra.get("foo"), Some(&json!(2)));
        assert_eq!(replaced.extra.get("bar"), Some(&json!("new")));
        // the original is untouched
        assert_eq!(config.materialized, "table");
    }

    #[test]
    fn replace_revalidates() {
        let config = NodeConfig::default();
        let result = config.replace(vec![("enabled".to_string(), json!("not a bool"))]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_severity() {
        let config = TestConfig::from_value(json!({})).unwrap();
        assert_eq!(config.severity, Severity::Error);

        let config = TestConfig::from_value(json!({"severity": "WARN"})).unwrap();
        assert_eq!(config.severity, Severity::Warn);
        assert_eq!(config.to_value().unwrap()["severity"], json!("warn"));

        assert!(TestConfig::from_value(json!({"severity": "fatal"})).is_err());
    }

    #[test]
    fn test_config_keeps_extension_bag() {
        let config = TestConfig::from_value(json!({"severity": "warn", "where": "x > 0"})).unwrap();
        assert_eq!(config.base.extra.get("where"), Some(&json!("x > 0")));
        let encoded = config.to_value().unwrap();
        assert_eq!(encoded["where"], json!("x > 0"));
        assert_eq!(TestConfig::from_value(encoded).unwrap(), config);
    }

    #[test]
    fn test_config_keeps_null_extension_values() {
        let config = TestConfig::from_value(json!({"where": null})).unwrap();
        let encoded = config.to_value().unwrap();
        assert_eq!(encoded["where"], json!(null));
        assert_eq!(TestConfig::from_value(encoded).unwrap(), config);
    }

    #[test]
    fn snapshot_config_keeps_null_extension_values() {
        let config = SnapshotConfig::from_value(json!({
            "strategy": "timestamp",
            "unique_key": "id",
            "updated_at": "updated_at",
            "invalidate_hard_deletes": null,
        }))
        .unwrap();
        let encoded = config.to_value().unwrap();
        assert_eq!(encoded["invalidate_hard_deletes"], json!(null));
        assert_eq!(SnapshotConfig::from_value(encoded).unwrap(), config);
    }

    #[test]
    fn timestamp_snapshot_config() {
        let value = json!({
            "strategy": "timestamp",
            "unique_key": "id",
            "updated_at": "updated_at",
            "target_schema": "snapshots",
        });
        let config = SnapshotConfig::from_value(value).unwrap();
        assert_eq!(config.strategy(), "timestamp");
        assert_eq!(config.target().unique_key, "id");
        assert_eq!(config.target().target_schema.as_deref(), Some("snapshots"));
        match &config {
            SnapshotConfig::Timestamp(ts) => assert_eq!(ts.updated_at, "updated_at"),
            SnapshotConfig::Check(_) => panic!("wrong strategy"),
        }
        let encoded = config.to_value().unwrap();
        assert_eq!(encoded["strategy"], json!("timestamp"));
        assert_eq!(SnapshotConfig::from_value(encoded).unwrap(), config);
    }

    #[test]
    fn check_snapshot_config_all_and_list() {
        let config = SnapshotConfig::from_value(json!({
            "strategy": "check",
            "unique_key": "id",
            "check_cols": "all",
        }))
        .unwrap();
        match &config {
            SnapshotConfig::Check(check) => assert!(check.check_cols.is_all()),
            SnapshotConfig::Timestamp(_) => panic!("wrong strategy"),
        }
        assert_eq!(config.to_value().unwrap()["check_cols"], json!("all"));

        let config = SnapshotConfig::from_value(json!({
            "strategy": "check",
            "unique_key": "id",
            "check_cols": ["email"],
        }))
        .unwrap();
        match &config {
            SnapshotConfig::Check(check) => {
                assert_eq!(check.check_cols, CheckCols::Columns(vec!["email".to_string()]))
            }
            SnapshotConfig::Timestamp(_) => panic!("wrong strategy"),
        }
    }

    #[test]
    fn check_snapshot_config_rejects_empty_and_bad_keywords() {
        assert!(SnapshotConfig::from_value(json!({
            "strategy": "check",
            "unique_key": "id",
            "check_cols": [],
        }))
        .is_err());

        assert!(SnapshotConfig::from_value(json!({
            "strategy": "check",
            "unique_key": "id",
            "check_cols": "some",
        }))
        .is_err());
    }

    #[test]
    fn snapshot_config_requires_known_strategy() {
        assert!(SnapshotConfig::from_value(json!({"unique_key": "id"})).is_err());
        assert!(SnapshotConfig::from_value(json!({
            "strategy": "rolling",
            "unique_key": "id",
        }))
        .is_err());
    }

    #[test]
    fn snapshot_config_replace_keeps_strategy() {
        let config = SnapshotConfig::from_value(json!({
            "strategy": "timestamp",
            "unique_key": "id",
            "updated_at": "updated_at",
        }))
        .unwrap();
        let replaced =
            replace_config(&config, vec![("target_schema".to_string(), json!("snap"))]).unwrap();
        assert_eq!(replaced.target().target_schema.as_deref(), Some("snap"));
        assert_eq!(replaced.strategy(), "timestamp");
    }
}
