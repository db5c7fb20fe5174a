// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache medium error types
//!
//! None of these reach collector callers: the mapper turns them into misses
//! and dropped writes.

use crate::storage::StorageDriverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediumError {
    #[error("Cache medium unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown cache medium: {0}")]
    UnknownMedium(String),

    #[error("Corrupted cache record: {0}")]
    Corrupted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageDriverError),
}

impl From<bincode::Error> for MediumError {
    fn from(err: bincode::Error) -> Self {
        MediumError::Corrupted(err.to_string())
    }
}

pub type MediumResult<T> = Result<T, MediumError>;
