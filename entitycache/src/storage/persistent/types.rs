// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver types and error handling

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage driver type configuration
///
/// Selects the key-value engine that backs entity rows and persistent
/// cache media.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StorageType {
    /// Sled - Pure Rust embedded database
    #[default]
    Sled,

    /// Memory - In-memory storage for testing and short-lived sessions
    Memory,
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StorageType::Sled),
            "memory" => Ok(StorageType::Memory),
            _ => Err(format!(
                "Unknown storage type: {}. Valid options: sled, memory",
                s
            )),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageType::Sled => "sled",
            StorageType::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Error type for storage driver operations
#[derive(Error, Debug)]
pub enum StorageDriverError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Storage driver error: {0}")]
    BackendSpecific(String),

    #[error("Storage backend not available: {0}")]
    Unavailable(String),
}

impl From<bincode::Error> for StorageDriverError {
    fn from(e: bincode::Error) -> Self {
        StorageDriverError::SerializationError(e.to_string())
    }
}

/// Result type for storage driver operations
pub type StorageResult<T> = Result<T, StorageDriverError>;
