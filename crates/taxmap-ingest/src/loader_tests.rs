// SPDX-License-Identifier: Apache-2.0

use crate::{load_dataset, IngestError};
use chrono::NaiveDate;
use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedFileWriter, SerializedRowGroupWriter};
use parquet::schema::types::{Type as SchemaType, TypePtr};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

fn utf8_column(name: &str) -> TypePtr {
    Arc::new(
        SchemaType::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
            .with_converted_type(ConvertedType::UTF8)
            .with_repetition(Repetition::OPTIONAL)
            .build()
            .expect("utf8 column"),
    )
}

fn double_column(name: &str) -> TypePtr {
    Arc::new(
        SchemaType::primitive_type_builder(name, PhysicalType::DOUBLE)
            .with_repetition(Repetition::OPTIONAL)
            .build()
            .expect("double column"),
    )
}

fn int64_column(name: &str) -> TypePtr {
    Arc::new(
        SchemaType::primitive_type_builder(name, PhysicalType::INT64)
            .with_repetition(Repetition::OPTIONAL)
            .build()
            .expect("int64 column"),
    )
}

fn write_utf8(rg: &mut SerializedRowGroupWriter<'_, File>, cells: &[Option<&str>]) {
    let mut col = rg.next_column().expect("next column").expect("column");
    let values: Vec<ByteArray> = cells.iter().flatten().map(|s| ByteArray::from(*s)).collect();
    let def_levels: Vec<i16> = cells.iter().map(|c| i16::from(c.is_some())).collect();
    col.typed::<ByteArrayType>()
        .write_batch(&values, Some(&def_levels), None)
        .expect("write utf8 batch");
    col.close().expect("close column");
}

fn write_double(rg: &mut SerializedRowGroupWriter<'_, File>, cells: &[Option<f64>]) {
    let mut col = rg.next_column().expect("next column").expect("column");
    let values: Vec<f64> = cells.iter().flatten().copied().collect();
    let def_levels: Vec<i16> = cells.iter().map(|c| i16::from(c.is_some())).collect();
    col.typed::<DoubleType>()
        .write_batch(&values, Some(&def_levels), None)
        .expect("write double batch");
    col.close().expect("close column");
}

fn write_int64(rg: &mut SerializedRowGroupWriter<'_, File>, cells: &[Option<i64>]) {
    let mut col = rg.next_column().expect("next column").expect("column");
    let values: Vec<i64> = cells.iter().flatten().copied().collect();
    let def_levels: Vec<i16> = cells.iter().map(|c| i16::from(c.is_some())).collect();
    col.typed::<Int64Type>()
        .write_batch(&values, Some(&def_levels), None)
        .expect("write int64 batch");
    col.close().expect("close column");
}

struct FixtureRow {
    id: Option<&'static str>,
    name: Option<&'static str>,
    lat: Option<f64>,
    lon: Option<f64>,
    restaurant_type: Option<&'static str>,
    earliest: Option<&'static str>,
    compliance: Option<i64>,
    simplified: Option<i64>,
}

fn write_fixture(path: &Path, rows: &[FixtureRow]) {
    let fields = vec![
        utf8_column("ID"),
        utf8_column("Display Name"),
        double_column("latitude_combined"),
        double_column("longitude_combined"),
        utf8_column("restaurant_type"),
        utf8_column("earliest_known_date"),
        int64_column("Compliance Level"),
        int64_column("Simplified Compliance Level"),
    ];
    let schema = Arc::new(
        SchemaType::group_type_builder("restaurant")
            .with_fields(fields)
            .build()
            .expect("schema"),
    );
    let file = File::create(path).expect("create fixture");
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(file, schema, props).expect("writer");
    let mut rg = writer.next_row_group().expect("row group");
    write_utf8(&mut rg, &rows.iter().map(|r| r.id).collect::<Vec<_>>());
    write_utf8(&mut rg, &rows.iter().map(|r| r.name).collect::<Vec<_>>());
    write_double(&mut rg, &rows.iter().map(|r| r.lat).collect::<Vec<_>>());
    write_double(&mut rg, &rows.iter().map(|r| r.lon).collect::<Vec<_>>());
    write_utf8(
        &mut rg,
        &rows.iter().map(|r| r.restaurant_type).collect::<Vec<_>>(),
    );
    write_utf8(&mut rg, &rows.iter().map(|r| r.earliest).collect::<Vec<_>>());
    write_int64(&mut rg, &rows.iter().map(|r| r.compliance).collect::<Vec<_>>());
    write_int64(&mut rg, &rows.iter().map(|r| r.simplified).collect::<Vec<_>>());
    rg.close().expect("close row group");
    writer.close().expect("close writer");
}

#[test]
fn loads_rows_and_recovers_unparseable_dates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("restaurants.parquet");
    write_fixture(
        &path,
        &[
            FixtureRow {
                id: Some("r1"),
                name: Some("Cafe One"),
                lat: Some(31.52),
                lon: Some(74.35),
                restaurant_type: Some("dine_in"),
                earliest: Some("2023-10-01"),
                compliance: Some(2),
                simplified: Some(1),
            },
            FixtureRow {
                id: Some("r2"),
                name: Some("Cafe Two"),
                lat: Some(31.60),
                lon: Some(74.40),
                restaurant_type: None,
                earliest: Some("sometime last year"),
                compliance: Some(5),
                simplified: Some(2),
            },
            FixtureRow {
                id: Some("r3"),
                name: Some("Cafe Three"),
                lat: None,
                lon: Some(74.10),
                restaurant_type: None,
                earliest: None,
                compliance: Some(0),
                simplified: Some(0),
            },
        ],
    );

    let (dataset, summary) = load_dataset(&path).expect("load");
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.unparseable_dates, 1);
    assert_eq!(dataset.len(), 3);

    let r1 = dataset.find_by_id("r1").expect("r1");
    let expected = NaiveDate::from_ymd_opt(2023, 10, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("date");
    assert_eq!(r1.earliest_known_date, Some(expected));
    assert_eq!(r1.compliance_level, 2);
    assert_eq!(r1.restaurant_type.as_deref(), Some("dine_in"));
    // Columns absent from the file degrade to None, never an error.
    assert_eq!(r1.link_foodpanda, None);
    assert_eq!(r1.filed_months, None);

    let r2 = dataset.find_by_id("r2").expect("r2");
    assert_eq!(r2.earliest_known_date, None);

    let r3 = dataset.find_by_id("r3").expect("r3");
    assert_eq!(r3.earliest_known_date, None);
    assert_eq!(r3.latitude, None);
    assert!(!r3.has_coordinates());
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.parquet");
    // Same layout minus the compliance columns.
    let fields = vec![
        utf8_column("ID"),
        utf8_column("Display Name"),
        double_column("latitude_combined"),
        double_column("longitude_combined"),
        utf8_column("earliest_known_date"),
    ];
    let schema = Arc::new(
        SchemaType::group_type_builder("restaurant")
            .with_fields(fields)
            .build()
            .expect("schema"),
    );
    let file = File::create(&path).expect("create fixture");
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(file, schema, props).expect("writer");
    let mut rg = writer.next_row_group().expect("row group");
    write_utf8(&mut rg, &[Some("r1")]);
    write_utf8(&mut rg, &[Some("Cafe One")]);
    write_double(&mut rg, &[Some(31.5)]);
    write_double(&mut rg, &[Some(74.3)]);
    write_utf8(&mut rg, &[Some("2023-10-01")]);
    rg.close().expect("close row group");
    writer.close().expect("close writer");

    let err = load_dataset(&path).expect_err("missing columns must fail");
    assert!(err.0.contains("Compliance Level"), "unexpected error: {err}");
}

#[test]
fn unreadable_source_is_fatal() {
    let err = load_dataset(Path::new("/nonexistent/restaurants.parquet"))
        .expect_err("missing file must fail");
    let IngestError(message) = err;
    assert!(message.contains("cannot open dataset"));
}
