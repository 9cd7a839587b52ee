// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod dates;
mod loader;

pub use dates::parse_earliest_date_str;
pub use loader::{load_dataset, LoadSummary, REQUIRED_COLUMNS};

/// Fatal loading failure: unreadable source or missing required columns.
///
/// Malformed individual values never produce this; they degrade to `None`
/// on the affected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestError(pub String);

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for IngestError {}

#[cfg(test)]
mod loader_tests;
