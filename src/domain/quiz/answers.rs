//! Answer and AnswerLog.
//!
//! The log keeps at most one answer per dimension. Re-answering a dimension
//! (after a failed feedback call) replaces the earlier answer, and the
//! ordered view always follows catalog order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DimensionId, LikertValue};

/// A user's 1-5 self-placement on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub dimension_id: DimensionId,
    pub value: LikertValue,
}

impl Answer {
    pub fn new(dimension_id: DimensionId, value: LikertValue) -> Self {
        Self {
            dimension_id,
            value,
        }
    }
}

/// Answers collected during one session, keyed by catalog position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLog {
    entries: BTreeMap<usize, Answer>,
}

impl AnswerLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the answer for the dimension at `catalog_index`.
    ///
    /// Returns the answer it replaced, if the dimension was answered before.
    pub fn record(&mut self, catalog_index: usize, answer: Answer) -> Option<Answer> {
        self.entries.insert(catalog_index, answer)
    }

    /// Answers in catalog order.
    pub fn ordered(&self) -> impl Iterator<Item = &Answer> {
        self.entries.values()
    }

    /// Answers paired with their catalog position, in catalog order.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &Answer)> {
        self.entries.iter().map(|(index, answer)| (*index, answer))
    }

    /// The answer recorded for a dimension.
    pub fn get(&self, dimension_id: &DimensionId) -> Option<&Answer> {
        self.entries
            .values()
            .find(|answer| &answer.dimension_id == dimension_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
