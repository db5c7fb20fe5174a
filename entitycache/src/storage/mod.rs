// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Key-value storage used underneath the caches
//!
//! Provides the pluggable tree abstraction shared by the tree-backed
//! identifier resolver and the persistent cache medium.

pub mod persistent;

pub use persistent::memory::{MemoryStorageDriver, MemoryTree};
#[cfg(feature = "sled-backend")]
pub use persistent::sled::{SledDriver, SledTree};
pub use persistent::{
    create_storage_driver, BoxedDriver, StorageDriver, StorageDriverError, StorageResult,
    StorageTree, StorageType,
};
