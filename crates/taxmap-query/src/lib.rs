// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod annotate;
mod detail;
mod figure;
mod segment;

pub use annotate::annotate_labels;
pub use detail::{resolve_details, DetailField, DetailView, DETAIL_TITLE, NO_SELECTION_PLACEHOLDER};
pub use figure::{
    build_figure, FigureSpec, MapCenter, MarkerLayer, FALLBACK_CENTER, LEGEND_TITLE, MAP_ZOOM,
};
pub use segment::{default_cutoff, partition, Segment, SegmentPair};
