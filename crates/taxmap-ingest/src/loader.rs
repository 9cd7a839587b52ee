// SPDX-License-Identifier: Apache-2.0

use crate::dates::parse_earliest_date_str;
use crate::IngestError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use taxmap_model::{Dataset, Record, RecordId, COMPLIANCE_DATA_NA};
use tracing::{info, warn};

/// Columns the loader refuses to start without. Everything else is optional
/// and degrades to `None` per row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "ID",
    "Display Name",
    "latitude_combined",
    "longitude_combined",
    "Compliance Level",
    "Simplified Compliance Level",
    "earliest_known_date",
];

/// Day number of 1970-01-01 in the proleptic Gregorian calendar, used to
/// convert parquet DATE values (days since epoch).
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub rows: usize,
    pub unparseable_dates: usize,
}

/// Read the whole Parquet source into an in-memory [`Dataset`].
///
/// Fails only when the file is unreadable, structurally broken, or missing a
/// required column; malformed cell values never abort the load.
pub fn load_dataset(path: &Path) -> Result<(Dataset, LoadSummary), IngestError> {
    let file = File::open(path)
        .map_err(|e| IngestError(format!("cannot open dataset {}: {e}", path.display())))?;
    let reader = SerializedFileReader::new(file)
        .map_err(|e| IngestError(format!("cannot read parquet {}: {e}", path.display())))?;

    let present: BTreeSet<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(*c))
        .collect();
    if !missing.is_empty() {
        return Err(IngestError(format!(
            "dataset {} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut summary = LoadSummary::default();
    let rows = reader
        .get_row_iter(None)
        .map_err(|e| IngestError(format!("cannot iterate rows: {e}")))?;
    for (index, row) in rows.enumerate() {
        let row = row.map_err(|e| IngestError(format!("row {index} decode failed: {e}")))?;
        records.push(decode_row(&row, index, &mut summary));
    }
    summary.rows = records.len();

    info!(
        source = %path.display(),
        rows = summary.rows,
        unparseable_dates = summary.unparseable_dates,
        "dataset loaded"
    );
    Ok((
        Dataset::new(records, path.display().to_string()),
        summary,
    ))
}

fn decode_row(row: &Row, index: usize, summary: &mut LoadSummary) -> Record {
    let cols: BTreeMap<&str, &Field> = row
        .get_column_iter()
        .map(|(name, field)| (name.as_str(), field))
        .collect();

    let id = cols
        .get("ID")
        .and_then(|f| scalar_string(f))
        .and_then(|raw| RecordId::parse(raw.trim()).ok())
        .unwrap_or_else(|| {
            warn!(row = index, "row has no usable ID; synthesizing one");
            RecordId::from_row_index(index)
        });

    Record {
        id,
        display_name: cols
            .get("Display Name")
            .and_then(|f| scalar_string(f))
            .unwrap_or_default(),
        latitude: cols.get("latitude_combined").and_then(|f| scalar_f64(f)),
        longitude: cols.get("longitude_combined").and_then(|f| scalar_f64(f)),
        link_foodpanda: opt_string(&cols, "LinkFP"),
        link_google_maps: opt_string(&cols, "LinkGM"),
        link_facebook: opt_string(&cols, "LinkFB"),
        computer_no: opt_string(&cols, "COMPUTER_NO"),
        restaurant_type: opt_string(&cols, "restaurant_type"),
        date_scraped_foodpanda: opt_string(&cols, "DateScrapedFP"),
        date_scraped_google_maps: opt_string(&cols, "DateScrapedGM"),
        date_scraped_facebook: opt_string(&cols, "DateScrapedFB"),
        creation_date_facebook: opt_string(&cols, "CreationDateFB"),
        registration_date: opt_string(&cols, "REGISTRATION_DATE"),
        interview_date: opt_string(&cols, "interview_date"),
        filed_months: opt_string(&cols, "Filed Months Count/12"),
        earliest_known_date: earliest_date(cols.get("earliest_known_date").copied(), summary),
        compliance_level: cols
            .get("Compliance Level")
            .and_then(|f| scalar_i64(f))
            .unwrap_or(COMPLIANCE_DATA_NA),
        simplified_compliance_level: cols
            .get("Simplified Compliance Level")
            .and_then(|f| scalar_i64(f))
            .unwrap_or(COMPLIANCE_DATA_NA),
    }
}

fn opt_string(cols: &BTreeMap<&str, &Field>, name: &str) -> Option<String> {
    cols.get(name).and_then(|f| scalar_string(f))
}

fn earliest_date(field: Option<&Field>, summary: &mut LoadSummary) -> Option<NaiveDateTime> {
    match field {
        None | Some(Field::Null) => None,
        Some(Field::TimestampMillis(ms)) => {
            DateTime::from_timestamp_millis(*ms).map(|dt| dt.naive_utc())
        }
        Some(Field::TimestampMicros(us)) => {
            DateTime::from_timestamp_micros(*us).map(|dt| dt.naive_utc())
        }
        Some(Field::Date(days)) => NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_CE_DAYS + days)
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        Some(Field::Str(raw)) => {
            let parsed = parse_earliest_date_str(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                summary.unparseable_dates += 1;
            }
            parsed
        }
        Some(_) => {
            summary.unparseable_dates += 1;
            None
        }
    }
}

fn scalar_string(field: &Field) -> Option<String> {
    let out = match field {
        Field::Null => return None,
        Field::Str(s) => s.trim().to_string(),
        Field::Bool(b) => b.to_string(),
        Field::Byte(v) => v.to_string(),
        Field::Short(v) => v.to_string(),
        Field::Int(v) => v.to_string(),
        Field::Long(v) => v.to_string(),
        Field::UByte(v) => v.to_string(),
        Field::UShort(v) => v.to_string(),
        Field::UInt(v) => v.to_string(),
        Field::ULong(v) => v.to_string(),
        Field::Float(v) => v.to_string(),
        Field::Double(v) => v.to_string(),
        Field::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms)
            .map(|dt| dt.naive_utc().to_string())
            .unwrap_or_default(),
        Field::TimestampMicros(us) => DateTime::from_timestamp_micros(*us)
            .map(|dt| dt.naive_utc().to_string())
            .unwrap_or_default(),
        _ => return None,
    };
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn scalar_f64(field: &Field) -> Option<f64> {
    let value = match field {
        Field::Double(v) => *v,
        Field::Float(v) => f64::from(*v),
        Field::Int(v) => f64::from(*v),
        Field::Long(v) => *v as f64,
        Field::Str(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

fn scalar_i64(field: &Field) -> Option<i64> {
    match field {
        Field::Byte(v) => Some(i64::from(*v)),
        Field::Short(v) => Some(i64::from(*v)),
        Field::Int(v) => Some(i64::from(*v)),
        Field::Long(v) => Some(*v),
        Field::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        Field::Str(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
