// SPDX-License-Identifier: Apache-2.0

use crate::Segment;
use std::collections::BTreeMap;
use taxmap_model::{Dataset, SchemeKind};

/// Legend labels with live counts: `"<label> (<count>)"` for every code in
/// the scheme, including codes with zero matching rows in the segment.
#[must_use]
pub fn annotate_labels(
    dataset: &Dataset,
    segment: &Segment,
    scheme: SchemeKind,
) -> BTreeMap<i64, String> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for record in segment.rows(dataset) {
        *counts.entry(scheme.code_of(record)).or_insert(0) += 1;
    }
    scheme
        .entries()
        .iter()
        .map(|entry| {
            let count = counts.get(&entry.code).copied().unwrap_or(0);
            (entry.code, format!("{} ({count})", entry.label))
        })
        .collect()
}
