// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Composite entity keys
//!
//! An entity is addressed by its label, namespace, interwiki marker and
//! sub-object name. All four take part in equality and hashing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved interwiki value marking a redirect placeholder row
pub const REDIRECT_INTERWIKI: &str = ":redirect";

/// Composite key identifying an entity for identifier resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub label: String,
    pub namespace: i32,
    pub interwiki: String,
    pub subobject: String,
}

impl EntityKey {
    pub fn new(
        label: impl Into<String>,
        namespace: i32,
        interwiki: impl Into<String>,
        subobject: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            namespace,
            interwiki: interwiki.into(),
            subobject: subobject.into(),
        }
    }

    /// Plain local page: no interwiki, no sub-object
    pub fn page(label: impl Into<String>, namespace: i32) -> Self {
        Self::new(label, namespace, "", "")
    }

    pub fn with_interwiki(mut self, interwiki: impl Into<String>) -> Self {
        self.interwiki = interwiki.into();
        self
    }

    pub fn with_subobject(mut self, subobject: impl Into<String>) -> Self {
        self.subobject = subobject.into();
        self
    }

    /// Whether this key addresses a redirect placeholder row
    pub fn is_redirect(&self) -> bool {
        self.interwiki == REDIRECT_INTERWIKI
    }

    /// Same label, namespace and sub-object with an empty interwiki
    pub fn local_companion(&self) -> Self {
        Self {
            label: self.label.clone(),
            namespace: self.namespace,
            interwiki: String::new(),
            subobject: self.subobject.clone(),
        }
    }

    /// Stable byte encoding used as the row key in key-value trees.
    ///
    /// Layout: namespace (big-endian i32), then each string field as a
    /// little-endian u32 length followed by its UTF-8 bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(
            4 + 12 + self.label.len() + self.interwiki.len() + self.subobject.len(),
        );
        buffer.extend_from_slice(&self.namespace.to_be_bytes());
        for field in [&self.label, &self.interwiki, &self.subobject] {
            buffer.extend_from_slice(&(field.len() as u32).to_le_bytes());
            buffer.extend_from_slice(field.as_bytes());
        }
        buffer
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.label)?;
        if !self.subobject.is_empty() {
            write!(f, "#{}", self.subobject)?;
        }
        if !self.interwiki.is_empty() {
            write!(f, "@{}", self.interwiki)?;
        }
        Ok(())
    }
}
