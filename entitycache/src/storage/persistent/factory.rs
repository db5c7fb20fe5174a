// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver factory

use super::traits::{StorageDriver, StorageTree};
use super::types::{StorageResult, StorageType};
use std::path::Path;

/// Boxed driver handed out by [`create_storage_driver`]
pub type BoxedDriver = Box<dyn StorageDriver<Tree = Box<dyn StorageTree>>>;

/// Create a storage driver based on configuration
///
/// # Arguments
/// * `storage_type` - The type of storage driver to create
/// * `path` - The filesystem path where the database should be stored
///   (ignored by the memory driver)
pub fn create_storage_driver<P: AsRef<Path>>(
    storage_type: StorageType,
    path: P,
) -> StorageResult<BoxedDriver> {
    match storage_type {
        #[cfg(feature = "sled-backend")]
        StorageType::Sled => {
            use super::sled::SledDriver;
            let driver = SledDriver::open(path)?;
            Ok(Box::new(driver) as BoxedDriver)
        }
        #[cfg(not(feature = "sled-backend"))]
        StorageType::Sled => Err(super::types::StorageDriverError::Unavailable(
            "sled-backend feature is disabled".to_string(),
        )),
        StorageType::Memory => {
            use super::memory::MemoryStorageDriver;
            let driver = MemoryStorageDriver::open(path)?;
            Ok(Box::new(driver) as BoxedDriver)
        }
    }
}
