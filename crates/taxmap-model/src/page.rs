// SPDX-License-Identifier: Apache-2.0

use crate::SchemeKind;
use serde::{Deserialize, Serialize};

/// Which half of the date partition a map page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Before,
    After,
}

impl SegmentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// The segment/scheme pair a map page feeds into the plot builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderPlan {
    pub segment: SegmentKind,
    pub scheme: SchemeKind,
}

/// Page selection. `Home` renders static content; every other page maps to a
/// fixed [`RenderPlan`] via a lookup, never by substring matching on the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Before,
    After,
    SimplifiedBefore,
    SimplifiedAfter,
}

/// All pages in display order.
pub const PAGES: &[Page] = &[
    Page::Home,
    Page::Before,
    Page::After,
    Page::SimplifiedBefore,
    Page::SimplifiedAfter,
];

impl Page {
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "home" => Some(Self::Home),
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "simplified_before" => Some(Self::SimplifiedBefore),
            "simplified_after" => Some(Self::SimplifiedAfter),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Before => "before",
            Self::After => "after",
            Self::SimplifiedBefore => "simplified_before",
            Self::SimplifiedAfter => "simplified_after",
        }
    }

    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Before => "Before 1-11-2023",
            Self::After => "After 1-11-2023",
            Self::SimplifiedBefore => "Simplified Compliance Before 1-11-2023",
            Self::SimplifiedAfter => "Simplified Compliance After 1-11-2023",
        }
    }

    /// `None` for the static home page.
    #[must_use]
    pub const fn plan(self) -> Option<RenderPlan> {
        match self {
            Self::Home => None,
            Self::Before => Some(RenderPlan {
                segment: SegmentKind::Before,
                scheme: SchemeKind::Detailed,
            }),
            Self::After => Some(RenderPlan {
                segment: SegmentKind::After,
                scheme: SchemeKind::Detailed,
            }),
            Self::SimplifiedBefore => Some(RenderPlan {
                segment: SegmentKind::Before,
                scheme: SchemeKind::Simplified,
            }),
            Self::SimplifiedAfter => Some(RenderPlan {
                segment: SegmentKind::After,
                scheme: SchemeKind::Simplified,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids_round_trip_through_parse() {
        for page in PAGES {
            assert_eq!(Page::parse(page.as_str()), Some(*page));
        }
        assert_eq!(Page::parse("simplified"), None);
        assert_eq!(Page::parse("Before"), None);
    }

    #[test]
    fn only_home_lacks_a_render_plan() {
        assert!(Page::Home.plan().is_none());
        for page in PAGES.iter().filter(|p| **p != Page::Home) {
            assert!(page.plan().is_some(), "page {} must render a map", page.as_str());
        }
    }

    #[test]
    fn simplified_pages_select_the_simplified_scheme() {
        let plan = Page::SimplifiedAfter.plan().expect("plan");
        assert_eq!(plan.segment, SegmentKind::After);
        assert_eq!(plan.scheme, SchemeKind::Simplified);
        let plan = Page::Before.plan().expect("plan");
        assert_eq!(plan.scheme, SchemeKind::Detailed);
    }
}
