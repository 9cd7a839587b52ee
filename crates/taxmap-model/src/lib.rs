// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod dataset;
mod page;
mod record;
mod scheme;

pub use dataset::Dataset;
pub use page::{Page, RenderPlan, SegmentKind, PAGES};
pub use record::{ParseError, Record, RecordId};
pub use scheme::{
    marker_size_for, SchemeEntry, SchemeKind, COMPLIANCE_DATA_NA, COMPLIANCE_UNREGISTERED,
    DEFAULT_MARKER_SIZE, DE_EMPHASIZED_MARKER_SIZE, OUT_OF_SCHEME_COLOR,
};
