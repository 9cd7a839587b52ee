// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveDateTime};
use taxmap_model::{Dataset, Record, SegmentKind};

/// The fixed 2023-11-01 cutoff the dashboard partitions on.
#[must_use]
pub fn default_cutoff() -> NaiveDateTime {
    // Statically valid calendar date.
    NaiveDate::from_ymd_opt(2023, 11, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// A non-owning view of one half of the partition: row indices into the
/// dataset, never copies of the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    indices: Vec<usize>,
}

impl Segment {
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn rows<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices
            .iter()
            .filter_map(move |&i| dataset.records.get(i))
    }
}

/// Both halves of the partition, computed once at startup and reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPair {
    pub cutoff: NaiveDateTime,
    pub before: Segment,
    pub after: Segment,
}

impl SegmentPair {
    #[must_use]
    pub fn segment(&self, kind: SegmentKind) -> &Segment {
        match kind {
            SegmentKind::Before => &self.before,
            SegmentKind::After => &self.after,
        }
    }
}

/// Split `dataset` by `earliest_known_date`.
///
/// `before` holds rows strictly earlier than the cutoff; everything else,
/// including rows with an unknown date, lands in `after`. Every row belongs
/// to exactly one segment.
#[must_use]
pub fn partition(dataset: &Dataset, cutoff: NaiveDateTime) -> SegmentPair {
    let mut before = Vec::new();
    let mut after = Vec::new();
    for (index, record) in dataset.records.iter().enumerate() {
        match record.earliest_known_date {
            Some(date) if date < cutoff => before.push(index),
            _ => after.push(index),
        }
    }
    SegmentPair {
        cutoff,
        before: Segment {
            kind: SegmentKind::Before,
            indices: before,
        },
        after: Segment {
            kind: SegmentKind::After,
            indices: after,
        },
    }
}
