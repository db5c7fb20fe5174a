// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Backing store error types

use crate::storage::StorageDriverError;
use thiserror::Error;

/// Failures reported by a backing store resolver
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageDriverError),

    #[error("Corrupted entity row for {key}: {reason}")]
    CorruptedRow { key: String, reason: String },

    #[error("Invalid entity row for {key}: {reason}")]
    InvalidRow { key: String, reason: String },

    #[error("Resolver returned {actual} rows for {expected} keys")]
    BatchMismatch { expected: usize, actual: usize },
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Storage(StorageDriverError::SerializationError(err.to_string()))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
