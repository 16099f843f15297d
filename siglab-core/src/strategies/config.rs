//! Strategy configuration: a family tag plus numeric parameters.
//!
//! `BTreeMap` keys give deterministic ordering during serialization, so the
//! JSON form is canonical and `full_hash` is a stable exact identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable record of a strategy family and its sampled parameters.
///
/// Produced by the generator, consumed by the factory, persisted for exact
/// replay: deserializing the JSON form reconstructs a functionally identical
/// strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub family: String,
    pub params: BTreeMap<String, f64>,
}

impl StrategyConfig {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Exact identity: BLAKE3 over the canonical JSON form (family + every
    /// parameter value).
    pub fn full_hash(&self) -> String {
        let json = serde_json::to_string(self).expect("StrategyConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
