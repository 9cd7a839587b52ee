// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use taxmap_model::Record;

/// Shown in the detail panel until the first marker click.
pub const NO_SELECTION_PLACEHOLDER: &str = "Click on a marker to see restaurant details here.";

pub const DETAIL_TITLE: &str = "Restaurant Details";

/// One row of the detail panel. `href` is set only for the external link
/// fields; a missing optional renders as an empty value, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailView {
    Placeholder { message: String },
    Details { title: String, fields: Vec<DetailField> },
}

fn text(label: &'static str, value: &str) -> DetailField {
    DetailField {
        label,
        value: value.to_string(),
        href: None,
    }
}

fn opt_text(label: &'static str, value: Option<&str>) -> DetailField {
    text(label, value.unwrap_or_default())
}

fn link(label: &'static str, href: Option<&str>) -> DetailField {
    DetailField {
        label,
        value: href.unwrap_or_default().to_string(),
        href: href.map(str::to_string),
    }
}

fn opt_f64(label: &'static str, value: Option<f64>) -> DetailField {
    DetailField {
        label,
        value: value.map(|v| v.to_string()).unwrap_or_default(),
        href: None,
    }
}

/// Reshape a clicked marker's payload into the ordered detail rows, or the
/// fixed placeholder when nothing has been selected yet.
#[must_use]
pub fn resolve_details(selection: Option<&Record>) -> DetailView {
    let Some(record) = selection else {
        return DetailView::Placeholder {
            message: NO_SELECTION_PLACEHOLDER.to_string(),
        };
    };
    DetailView::Details {
        title: DETAIL_TITLE.to_string(),
        fields: vec![
            text("Name", &record.display_name),
            text("ID", record.id.as_str()),
            link("Foodpanda", record.link_foodpanda.as_deref()),
            link("Google Maps", record.link_google_maps.as_deref()),
            link("Facebook", record.link_facebook.as_deref()),
            opt_text("Comp No", record.computer_no.as_deref()),
            opt_text("Restaurant Type", record.restaurant_type.as_deref()),
            opt_text("DateScrapedFP", record.date_scraped_foodpanda.as_deref()),
            opt_text("DateScrapedGM", record.date_scraped_google_maps.as_deref()),
            opt_text("DateScrapedFB", record.date_scraped_facebook.as_deref()),
            opt_text("CreationDateFB", record.creation_date_facebook.as_deref()),
            opt_text("Reg Date", record.registration_date.as_deref()),
            opt_text("Interview Date", record.interview_date.as_deref()),
            opt_f64("Lat", record.latitude),
            opt_f64("Lon", record.longitude),
            text("Compliance Level", &record.compliance_level.to_string()),
            text(
                "Simplified Compliance Level",
                &record.simplified_compliance_level.to_string(),
            ),
            opt_text(
                "Filed Months (1.11.22 - 31.10.23)",
                record.filed_months.as_deref(),
            ),
            DetailField {
                label: "Earliest Known Date",
                value: record
                    .earliest_known_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                href: None,
            },
        ],
    }
}
