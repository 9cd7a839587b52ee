// SPDX-License-Identifier: Apache-2.0

use crate::Record;
use serde::{Deserialize, Serialize};

/// Sentinel code for restaurants that are registered but have no filing data.
pub const COMPLIANCE_DATA_NA: i64 = -999;
/// Code for unregistered restaurants; their markers are visually de-emphasized.
pub const COMPLIANCE_UNREGISTERED: i64 = 0;

pub const DEFAULT_MARKER_SIZE: u32 = 5;
pub const DE_EMPHASIZED_MARKER_SIZE: u32 = 3;

/// Color for codes that appear in the data but not in the active scheme table.
pub const OUT_OF_SCHEME_COLOR: &str = "gray";

/// One row of a compliance scheme table: code, legend label template, color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemeEntry {
    pub code: i64,
    pub label: &'static str,
    pub color: &'static str,
}

const DETAILED_SCHEME: &[SchemeEntry] = &[
    SchemeEntry {
        code: COMPLIANCE_DATA_NA,
        label: "Registered but data NA",
        color: "gray",
    },
    SchemeEntry {
        code: COMPLIANCE_UNREGISTERED,
        label: "Unregistered",
        color: "black",
    },
    SchemeEntry {
        code: 1,
        label: "Registered but not filed",
        color: "red",
    },
    SchemeEntry {
        code: 2,
        label: "Filed 0 at least 1 month",
        color: "blue",
    },
    SchemeEntry {
        code: 3,
        label: "Filed > 0 at least 1 month but paid 0",
        color: "yellow",
    },
    SchemeEntry {
        code: 4,
        label: "Filed & paid > 0 at least 1 month",
        color: "orange",
    },
    SchemeEntry {
        code: 5,
        label: "Filed & paid positively all months",
        color: "green",
    },
];

const SIMPLIFIED_SCHEME: &[SchemeEntry] = &[
    SchemeEntry {
        code: COMPLIANCE_DATA_NA,
        label: "Registered but data NA",
        color: "gray",
    },
    SchemeEntry {
        code: COMPLIANCE_UNREGISTERED,
        label: "Unregistered",
        color: "black",
    },
    SchemeEntry {
        code: 1,
        label: "Filed 0 at least 1 month",
        color: "red",
    },
    SchemeEntry {
        code: 2,
        label: "Paid > 0 at least 1 month",
        color: "green",
    },
];

/// Selects which fixed code -> (label, color) table is active and which
/// compliance field of a [`Record`] it classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    Detailed,
    Simplified,
}

impl SchemeKind {
    #[must_use]
    pub const fn entries(self) -> &'static [SchemeEntry] {
        match self {
            Self::Detailed => DETAILED_SCHEME,
            Self::Simplified => SIMPLIFIED_SCHEME,
        }
    }

    /// The compliance code of `record` under this scheme.
    #[must_use]
    pub fn code_of(self, record: &Record) -> i64 {
        match self {
            Self::Detailed => record.compliance_level,
            Self::Simplified => record.simplified_compliance_level,
        }
    }

    #[must_use]
    pub fn entry_for(self, code: i64) -> Option<&'static SchemeEntry> {
        self.entries().iter().find(|e| e.code == code)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Simplified => "simplified",
        }
    }
}

/// Marker size for a compliance code; unregistered rows plot smaller.
#[must_use]
pub const fn marker_size_for(code: i64) -> u32 {
    if code == COMPLIANCE_UNREGISTERED {
        DE_EMPHASIZED_MARKER_SIZE
    } else {
        DEFAULT_MARKER_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detailed_scheme_has_seven_codes_in_order() {
        let codes: Vec<i64> = SchemeKind::Detailed.entries().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![-999, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn simplified_scheme_has_four_table_rows() {
        let codes: Vec<i64> = SchemeKind::Simplified
            .entries()
            .iter()
            .map(|e| e.code)
            .collect();
        assert_eq!(codes, vec![-999, 0, 1, 2]);
    }

    #[test]
    fn sentinel_and_unregistered_are_identical_in_both_schemes() {
        for kind in [SchemeKind::Detailed, SchemeKind::Simplified] {
            let na = kind.entry_for(COMPLIANCE_DATA_NA).expect("sentinel entry");
            assert_eq!(na.label, "Registered but data NA");
            assert_eq!(na.color, "gray");
            let unreg = kind
                .entry_for(COMPLIANCE_UNREGISTERED)
                .expect("unregistered entry");
            assert_eq!(unreg.label, "Unregistered");
            assert_eq!(unreg.color, "black");
        }
    }

    #[test]
    fn unregistered_markers_are_smaller() {
        assert_eq!(marker_size_for(0), DE_EMPHASIZED_MARKER_SIZE);
        assert_eq!(marker_size_for(5), DEFAULT_MARKER_SIZE);
        assert_eq!(marker_size_for(-999), DEFAULT_MARKER_SIZE);
    }

    #[test]
    fn out_of_scheme_code_has_no_entry() {
        assert!(SchemeKind::Simplified.entry_for(4).is_none());
        assert!(SchemeKind::Detailed.entry_for(99).is_none());
    }
}
