//! In-memory record of the operations run during one session.
//!
//! Bounded: once `limit` entries are stored the oldest is dropped. Nothing
//! is written to disk; the history dies with the process.

use crate::types::{Completed, OpError, Operation};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub at: DateTime<Local>,
    pub operation: Operation,
    pub source: PathBuf,
    /// New path on success, the error text on failure.
    pub outcome: Result<PathBuf, String>,
}

impl HistoryEntry {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl History {
    /// A `limit` of 0 is treated as 1.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    pub fn record(
        &mut self,
        operation: Operation,
        source: PathBuf,
        result: Result<&Completed, &OpError>,
    ) {
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            at: Local::now(),
            operation,
            source,
            outcome: result
                .map(|c| c.new_path.clone())
                .map_err(|e| e.to_string()),
        });
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| !e.succeeded()).count()
    }
}
