// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Request options handed to collector computations
//!
//! Options only shape a fresh computation. They are not part of the cache
//! slot, so a cached result is served as stored whatever options are set.

use serde::{Deserialize, Serialize};

/// How a string condition is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    Prefix,
    Suffix,
    Contains,
}

/// String filter on result labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringCondition {
    pub value: String,
    pub kind: ConditionKind,
    /// OR-ed with the other disjunctive conditions instead of AND-ed
    pub disjunctive: bool,
}

impl StringCondition {
    pub fn new(value: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            value: value.into(),
            kind,
            disjunctive: false,
        }
    }

    pub fn or(mut self) -> Self {
        self.disjunctive = true;
        self
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self.kind {
            ConditionKind::Prefix => candidate.starts_with(&self.value),
            ConditionKind::Suffix => candidate.ends_with(&self.value),
            ConditionKind::Contains => candidate.contains(&self.value),
        }
    }
}

/// Filtering, ordering and pagination constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub limit: Option<usize>,
    pub offset: usize,
    pub sort: bool,
    pub ascending: bool,
    pub conditions: Vec<StringCondition>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            limit: None,
            offset: 0,
            sort: false,
            ascending: true,
            conditions: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn sorted(mut self, ascending: bool) -> Self {
        self.sort = true;
        self.ascending = ascending;
        self
    }

    pub fn with_condition(mut self, condition: StringCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Every conjunctive condition holds, and at least one disjunctive
    /// condition holds if any are present
    pub fn matches(&self, candidate: &str) -> bool {
        let mut any_disjunctive = false;
        let mut disjunctive_hit = false;

        for condition in &self.conditions {
            if condition.disjunctive {
                any_disjunctive = true;
                disjunctive_hit |= condition.matches(candidate);
            } else if !condition.matches(candidate) {
                return false;
            }
        }

        !any_disjunctive || disjunctive_hit
    }

    /// Apply offset and limit to an already ordered sequence
    pub fn window<I: IntoIterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
    }
}
