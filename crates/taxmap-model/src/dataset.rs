// SPDX-License-Identifier: Apache-2.0

use crate::Record;

/// The full loaded table. Built once at startup and shared read-only for the
/// lifetime of the process; nothing mutates it after load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub source: String,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<Record>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id.as_str() == id)
    }
}
