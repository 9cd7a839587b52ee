// SPDX-License-Identifier: Apache-2.0

use crate::{annotate_labels, Segment};
use serde::Serialize;
use std::collections::BTreeSet;
use taxmap_model::{marker_size_for, Dataset, Record, SchemeKind, OUT_OF_SCHEME_COLOR};

/// Map center when a segment has no plottable rows (central Lahore).
pub const FALLBACK_CENTER: MapCenter = MapCenter {
    lat: 31.5204,
    lon: 74.3587,
};

pub const MAP_ZOOM: u8 = 10;
pub const LEGEND_TITLE: &str = "Compliance Levels";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// One scatter layer: all rows of a segment sharing one compliance code.
///
/// `payloads` carries the full record per plotted point so a later click can
/// be resolved without another lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub code: i64,
    pub label: String,
    pub color: String,
    pub marker_size: u32,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub hover_text: Vec<String>,
    pub payloads: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSpec {
    pub layers: Vec<MarkerLayer>,
    pub center: MapCenter,
    pub zoom: u8,
    pub legend_title: String,
}

/// Build the scatter-map specification for one segment under one scheme.
///
/// Layers follow scheme order; codes present in the data but absent from the
/// scheme table are appended with the default color and no legend label.
/// Rows lacking either coordinate are left out of every layer.
#[must_use]
pub fn build_figure(dataset: &Dataset, segment: &Segment, scheme: SchemeKind) -> FigureSpec {
    let labels = annotate_labels(dataset, segment, scheme);

    let mut layers = Vec::with_capacity(scheme.entries().len());
    for entry in scheme.entries() {
        let label = labels.get(&entry.code).cloned().unwrap_or_default();
        layers.push(layer_for_code(
            dataset,
            segment,
            scheme,
            entry.code,
            label,
            entry.color,
        ));
    }

    let unmapped: BTreeSet<i64> = segment
        .rows(dataset)
        .map(|r| scheme.code_of(r))
        .filter(|code| scheme.entry_for(*code).is_none())
        .collect();
    for code in unmapped {
        layers.push(layer_for_code(
            dataset,
            segment,
            scheme,
            code,
            String::new(),
            OUT_OF_SCHEME_COLOR,
        ));
    }

    FigureSpec {
        layers,
        center: segment_center(dataset, segment),
        zoom: MAP_ZOOM,
        legend_title: LEGEND_TITLE.to_string(),
    }
}

fn layer_for_code(
    dataset: &Dataset,
    segment: &Segment,
    scheme: SchemeKind,
    code: i64,
    label: String,
    color: &str,
) -> MarkerLayer {
    let mut layer = MarkerLayer {
        code,
        label,
        color: color.to_string(),
        marker_size: marker_size_for(code),
        lat: Vec::new(),
        lon: Vec::new(),
        hover_text: Vec::new(),
        payloads: Vec::new(),
    };
    for record in segment.rows(dataset) {
        if scheme.code_of(record) != code {
            continue;
        }
        let (Some(lat), Some(lon)) = (record.latitude, record.longitude) else {
            continue;
        };
        layer.lat.push(lat);
        layer.lon.push(lon);
        layer.hover_text.push(record.display_name.clone());
        layer.payloads.push(record.clone());
    }
    layer
}

/// Per-axis mean over the rows that carry that coordinate; the fixed
/// fallback axis value when none do. Never NaN.
fn segment_center(dataset: &Dataset, segment: &Segment) -> MapCenter {
    let mut lat_sum = 0.0_f64;
    let mut lat_count = 0_usize;
    let mut lon_sum = 0.0_f64;
    let mut lon_count = 0_usize;
    for record in segment.rows(dataset) {
        if let Some(lat) = record.latitude {
            lat_sum += lat;
            lat_count += 1;
        }
        if let Some(lon) = record.longitude {
            lon_sum += lon;
            lon_count += 1;
        }
    }
    MapCenter {
        lat: if lat_count > 0 {
            lat_sum / lat_count as f64
        } else {
            FALLBACK_CENTER.lat
        },
        lon: if lon_count > 0 {
            lon_sum / lon_count as f64
        } else {
            FALLBACK_CENTER.lon
        },
    }
}
