// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Collector error types

use crate::entity::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Invalid cache descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Computation failed: {0}")]
    Computation(String),
}

pub type CollectorResult<T> = Result<T, CollectorError>;
