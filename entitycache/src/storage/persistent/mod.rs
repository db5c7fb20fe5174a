// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persistent storage backends
//!
//! Trait-based abstractions for key-value storage so entity rows and
//! persistent cache media can run on different engines interchangeably.
//!
//! # Architecture
//!
//! ```text
//! TreeIdResolver / TreeMedium
//!     ↓
//! StorageTree (key-value abstraction)
//!     ↓
//! Concrete Implementations (Sled, Memory)
//! ```

pub mod factory;
pub mod traits;
pub mod types;

#[cfg(feature = "sled-backend")]
pub mod sled;
pub mod memory;

pub use factory::{create_storage_driver, BoxedDriver};
pub use traits::{StorageDriver, StorageTree};
pub use types::{StorageDriverError, StorageResult, StorageType};
