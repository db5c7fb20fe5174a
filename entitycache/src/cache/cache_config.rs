// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache configuration and policies

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::entity::id_cache::DEFAULT_MAX_ENTRIES;

/// Default medium name for collector results
pub const DEFAULT_MEDIUM: &str = "memory";

/// Default prefix for collector slot keys
pub const DEFAULT_KEY_PREFIX: &str = "entitycache:collector";

/// Global cache configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Identifier cache settings
    pub id_cache: IdCacheConfig,

    /// Collector result cache settings
    pub result_cache: ResultCacheConfig,
}

/// Identifier cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdCacheConfig {
    /// Entry count past which the whole map is cleared
    pub max_entries: usize,
}

impl Default for IdCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Defaults applied to collector cache descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultCacheConfig {
    /// Enable/disable result caching for descriptors built from this config
    pub enabled: bool,

    /// Medium used when a collector does not name one
    pub default_medium: String,

    /// Time-to-live of stored results; zero keeps them until overwritten
    pub default_expiry: Duration,

    /// Prefix of every slot key written to a medium
    pub key_prefix: String,
}

impl Default for ResultCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_medium: DEFAULT_MEDIUM.to_string(),
            default_expiry: Duration::from_secs(3600), // 1 hour
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    /// Configuration for memory-constrained environments
    pub fn memory_constrained() -> Self {
        let mut config = Self::default();
        config.id_cache.max_entries = 250;
        config.result_cache.default_expiry = Duration::from_secs(600); // 10 minutes
        config
    }

    /// Configuration with result caching switched off
    pub fn disabled() -> Self {
        let mut config = Self::default();
        config.result_cache.enabled = false;
        config
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid cache config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.id_cache.max_entries == 0 {
            return Err("Identifier cache must have max_entries > 0".to_string());
        }

        if self.result_cache.default_medium.trim().is_empty() {
            return Err("Result cache default_medium must not be empty".to_string());
        }

        if self.result_cache.key_prefix.trim().is_empty() {
            return Err("Result cache key_prefix must not be empty".to_string());
        }

        Ok(())
    }
}
