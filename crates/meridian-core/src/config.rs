//! Planner configuration
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Graph search tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Skip CRSs whose area of use misses both endpoints
    pub area_filter: bool,
    /// Upper bound on candidate paths the planner asks for
    pub max_candidates: usize,
    /// Inaccuracy in metres charged for operations without a published accuracy
    pub default_operation_accuracy: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            area_filter: true,
            max_candidates: 4,
            default_operation_accuracy: 1.0,
        }
    }
}

/// Settings shared by the path finders and the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Longest projected-to-base chain walked before giving up
    pub max_base_chain_depth: usize,
    pub search: SearchConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_base_chain_depth: 16,
            search: SearchConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        if let Ok(value) = std::env::var("MERIDIAN_MAX_CANDIDATES") {
            match value.parse::<usize>() {
                Ok(count) if count > 0 => self.search.max_candidates = count,
                _ => log::warn!("Invalid MERIDIAN_MAX_CANDIDATES: {}, using default", value),
            }
        }

        if let Ok(value) = std::env::var("MERIDIAN_AREA_FILTER") {
            self.search.area_filter = value.to_lowercase() == "true" || value == "1";
        }

        if let Ok(value) = std::env::var("MERIDIAN_MAX_BASE_DEPTH") {
            match value.parse::<usize>() {
                Ok(depth) => self.max_base_chain_depth = depth,
                Err(_) => log::warn!("Invalid MERIDIAN_MAX_BASE_DEPTH: {}, using default", value),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.max_candidates == 0 {
            return Err(Error::Configuration {
                message: "search.max_candidates must be at least 1".to_string(),
            });
        }
        let accuracy = self.search.default_operation_accuracy;
        if accuracy.is_nan() || accuracy < 0.0 {
            return Err(Error::Configuration {
                message: format!(
                    "search.default_operation_accuracy must be a non-negative number, got {}",
                    accuracy
                ),
            });
        }
        Ok(())
    }
}
