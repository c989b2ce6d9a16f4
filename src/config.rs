//! Model configuration loaded from YAML or JSON
//!
//! ```yaml
//! indexes: [spo, pos]
//! graphs: true
//! store_cursors: false
//! ```

use crate::error::{TrellisError, TrellisResult};
use crate::model::{IndexOrder, ModelFlags};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_indexes() -> Vec<String> {
    vec!["spo".to_string()]
}

/// Which indexes a model builds and what it keeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Triple index orders, such as `spo` or `pos`
    #[serde(default = "default_indexes")]
    pub indexes: Vec<String>,
    /// Also build graph-first indexes
    #[serde(default)]
    pub graphs: bool,
    /// Keep statement cursors
    #[serde(default)]
    pub store_cursors: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            indexes: default_indexes(),
            graphs: false,
            store_cursors: false,
        }
    }
}

impl ModelConfig {
    pub fn from_yaml_str(yaml: &str) -> TrellisResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| TrellisError::Config(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> TrellisResult<Self> {
        serde_json::from_str(json).map_err(|e| TrellisError::Config(e.to_string()))
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML
    pub fn load(path: &Path) -> TrellisResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Model flags for this configuration.
    ///
    /// Index names must be triple orders; graph-first indexes are requested
    /// with `graphs` instead.
    pub fn to_flags(&self) -> TrellisResult<ModelFlags> {
        if self.indexes.is_empty() {
            return Err(TrellisError::Config("no indexes configured".into()));
        }
        let mut flags = ModelFlags::empty();
        for name in &self.indexes {
            let order: IndexOrder = name
                .parse()
                .map_err(|_| TrellisError::Config(format!("unknown index '{}'", name)))?;
            if order.is_graph_first() {
                return Err(TrellisError::Config(format!(
                    "'{}' is graph-first; list '{}' and set graphs: true",
                    name,
                    &order.name()[1..]
                )));
            }
            flags |= order.flag();
        }
        if self.graphs {
            flags |= ModelFlags::INDEX_GRAPHS;
        }
        if self.store_cursors {
            flags |= ModelFlags::STORE_CURSORS;
        }
        Ok(flags)
    }
}
