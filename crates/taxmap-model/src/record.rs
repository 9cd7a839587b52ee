// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ID_MAX_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Stable restaurant identifier taken from the source `ID` column.
///
/// Deserialization funnels through [`RecordId::parse`], so an id arriving in
/// a selection payload obeys the same rules as one read from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String")]
pub struct RecordId(String);

impl TryFrom<String> for RecordId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl RecordId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("record_id"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("record_id"));
        }
        if input.len() > ID_MAX_LEN {
            return Err(ParseError::TooLong("record_id", ID_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    /// Fallback identifier for source rows whose `ID` cell is unusable.
    #[must_use]
    pub fn from_row_index(index: usize) -> Self {
        Self(format!("row-{index}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One restaurant row of the loaded dataset.
///
/// Records are immutable after load; the whole struct is carried as the
/// selection payload on every rendered marker, so every field is plain data
/// that serializes losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub display_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub link_foodpanda: Option<String>,
    pub link_google_maps: Option<String>,
    pub link_facebook: Option<String>,
    pub computer_no: Option<String>,
    pub restaurant_type: Option<String>,
    pub date_scraped_foodpanda: Option<String>,
    pub date_scraped_google_maps: Option<String>,
    pub date_scraped_facebook: Option<String>,
    pub creation_date_facebook: Option<String>,
    pub registration_date: Option<String>,
    pub interview_date: Option<String>,
    pub filed_months: Option<String>,
    pub earliest_known_date: Option<NaiveDateTime>,
    pub compliance_level: i64,
    pub simplified_compliance_level: i64,
}

impl Record {
    /// True when the row carries both coordinates and can be plotted.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
