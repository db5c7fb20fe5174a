// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache descriptors naming a collector's result slot

use std::time::Duration;

use super::cache_config::ResultCacheConfig;

/// Where, whether and how long a collector's results are cached
///
/// Two collectors with equal descriptors address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheDescriptor {
    pub id: String,
    pub medium: String,
    pub enabled: bool,
    /// Zero keeps the entry until it is overwritten
    pub expiry: Duration,
}

impl CacheDescriptor {
    pub fn new(
        id: impl Into<String>,
        medium: impl Into<String>,
        enabled: bool,
        expiry: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            medium: medium.into(),
            enabled,
            expiry,
        }
    }

    /// Descriptor using the configured default medium, expiry and switch
    pub fn from_config(id: impl Into<String>, config: &ResultCacheConfig) -> Self {
        Self::new(
            id,
            config.default_medium.clone(),
            config.enabled,
            config.default_expiry,
        )
    }

    pub fn with_medium(mut self, medium: impl Into<String>) -> Self {
        self.medium = medium.into();
        self
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("cache descriptor id must not be empty".to_string());
        }
        if self.medium.trim().is_empty() {
            return Err(format!(
                "cache descriptor '{}' must name a medium",
                self.id
            ));
        }
        Ok(())
    }
}
