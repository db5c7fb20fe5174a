// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Stored payload envelopes and the clock that stamps them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Results plus the time they were stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEnvelope<T> {
    pub results: T,
    pub stored_at: DateTime<Utc>,
}

/// Source of store timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant, for reproducible store times
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
