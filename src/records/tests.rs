use super::*;
use crate::config::CodecConfig;
use crate::error::Error;
use crate::types::{Column, DataType, Value};
use std::sync::Arc;

fn two_column_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Column::new("id", DataType::Int32),
        Column::new("name", DataType::String),
    ]))
}

fn write_rows(schema: &Arc<Schema>, rows: &[Vec<Value>]) -> Vec<u8> {
    let mut writer = RowWriter::new(Vec::new(), Arc::clone(schema), CodecConfig::default());
    for row in rows {
        writer.write_row(row).unwrap();
    }
    writer.flush().unwrap();
    writer.into_output()
}

#[test]
fn reads_rows_in_schema_order() {
    let schema = two_column_schema();
    let bytes = write_rows(
        &schema,
        &[
            vec![Value::Int32(1), Value::String(b"alpha".to_vec())],
            vec![Value::Int32(2), Value::String(b"beta".to_vec())],
        ],
    );

    let mut reader = RowReader::new(bytes.as_slice(), schema, CodecConfig::default());
    let row = reader.read_row().unwrap().unwrap();
    assert_eq!(row.value(0), Some(&Value::Int32(1)));
    assert_eq!(
        row.value_by_name("NAME").unwrap(),
        &Value::String(b"alpha".to_vec())
    );

    let row = reader.read_row().unwrap().unwrap();
    assert_eq!(row.value(0), Some(&Value::Int32(2)));

    assert!(reader.read_row().unwrap().is_none());
    assert!(reader.read_row().unwrap().is_none());
}

#[test]
fn clean_eof_before_a_row_is_not_an_error() {
    let schema = two_column_schema();
    let mut reader = RowReader::new(&[][..], schema, CodecConfig::default());
    assert!(!reader.has_more().unwrap());
    assert!(reader.read_row().unwrap().is_none());
}

#[test]
fn eof_mid_row_names_column_and_total() {
    let schema = two_column_schema();
    // A complete Int32 column, then nothing where the String belongs.
    let bytes = [0x07, 0x00, 0x00, 0x00];
    let mut reader = RowReader::new(&bytes[..], schema, CodecConfig::default());

    let err = reader.read_row().unwrap_err();
    assert!(matches!(err, Error::TruncatedRow { column: 2, total: 2 }));
    assert_eq!(
        err.to_string(),
        "unexpected end of input reading column #2 (total 2)"
    );
}

#[test]
fn eof_inside_first_column_is_truncation_not_exhaustion() {
    let schema = two_column_schema();
    // Two of the four Int32 bytes.
    let bytes = [0x07, 0x00];
    let mut reader = RowReader::new(&bytes[..], schema, CodecConfig::default());
    let err = reader.read_row().unwrap_err();
    assert!(matches!(err, Error::TruncatedRow { column: 1, total: 2 }));
}

#[test]
fn failed_reader_stops_yielding_rows() {
    let schema = two_column_schema();
    let bytes = [0x07, 0x00];
    let mut reader = RowReader::new(&bytes[..], schema, CodecConfig::default());
    assert!(reader.read_row().is_err());
    // The error surfaces once; iteration then ends.
    assert!(reader.read_row().unwrap().is_none());
    assert!(!reader.has_more().unwrap());
}

#[test]
fn truncated_string_payload_is_a_truncated_row() {
    let schema = two_column_schema();
    // Int32, then a string claiming 5 bytes but delivering 2.
    let bytes = [0x01, 0x00, 0x00, 0x00, 0x05, b'a', b'b'];
    let mut reader = RowReader::new(&bytes[..], schema, CodecConfig::default());
    let err = reader.read_row().unwrap_err();
    assert!(matches!(err, Error::TruncatedRow { column: 2, total: 2 }));
}

#[test]
fn fresh_records_survive_subsequent_reads() {
    let schema = two_column_schema();
    let bytes = write_rows(
        &schema,
        &[
            vec![Value::Int32(1), Value::String(b"a".to_vec())],
            vec![Value::Int32(2), Value::String(b"b".to_vec())],
        ],
    );

    let mut reader = RowReader::new(bytes.as_slice(), schema, CodecConfig::default());
    let first = reader.read_record().unwrap().unwrap();
    let second = reader.read_record().unwrap().unwrap();
    assert_eq!(first.value(0), Some(&Value::Int32(1)));
    assert_eq!(second.value(0), Some(&Value::Int32(2)));
}

#[test]
fn reused_buffer_is_overwritten_each_row() {
    let schema = two_column_schema();
    let bytes = write_rows(
        &schema,
        &[
            vec![Value::Int32(1), Value::String(b"a".to_vec())],
            vec![Value::Int32(2), Value::String(b"b".to_vec())],
        ],
    );

    let config = CodecConfig::new().with_reuse_records(true);
    let mut reader = RowReader::new(bytes.as_slice(), schema, config);

    let first = reader.read_row().unwrap().unwrap().clone();
    let second = reader.read_row().unwrap().unwrap();
    assert_eq!(second.value(0), Some(&Value::Int32(2)));
    // The clone taken before the second read is untouched.
    assert_eq!(first.value(0), Some(&Value::Int32(1)));
}

#[test]
fn reuse_mode_records_are_cloned() {
    let schema = two_column_schema();
    let bytes = write_rows(
        &schema,
        &[
            vec![Value::Int32(1), Value::String(b"a".to_vec())],
            vec![Value::Int32(2), Value::String(b"b".to_vec())],
        ],
    );

    let config = CodecConfig::new().with_reuse_records(true);
    let mut reader = RowReader::new(bytes.as_slice(), schema, config);
    let first = reader.read_record().unwrap().unwrap();
    let second = reader.read_record().unwrap().unwrap();
    assert_eq!(first.value(1), Some(&Value::String(b"a".to_vec())));
    assert_eq!(second.value(1), Some(&Value::String(b"b".to_vec())));
}

#[test]
fn header_roundtrips_through_writer_and_reader() {
    let schema = Arc::new(Schema::new(vec![
        Column::new("id", DataType::Int32).nullable().unwrap(),
        Column::decimal("price", 19, 15),
        Column::parse("m", "Map(String, Int32)").unwrap(),
    ]));

    let mut writer = RowWriter::new(Vec::new(), Arc::clone(&schema), CodecConfig::default());
    writer.write_header().unwrap();
    writer
        .write_row(&[
            Value::Null,
            Value::Decimal { digits: 5, scale: 15 },
            Value::Map(vec![(Value::String(b"k".to_vec()), Value::Int32(9))]),
        ])
        .unwrap();
    let bytes = writer.into_output();

    let mut reader = RowReader::with_header(bytes.as_slice(), CodecConfig::default()).unwrap();
    assert_eq!(reader.schema().len(), 3);
    assert_eq!(reader.schema().column(0).unwrap().type_string(), "Nullable(Int32)");
    assert_eq!(reader.schema().column(1).unwrap().name(), "price");

    let row = reader.read_row().unwrap().unwrap();
    assert!(row.value(0).unwrap().is_null());
    assert_eq!(
        row.value_by_name("m").unwrap().as_map().unwrap()[0].1,
        Value::Int32(9)
    );
    assert!(reader.read_row().unwrap().is_none());
}

#[test]
fn empty_stream_with_header_is_an_empty_result_set() {
    let reader = RowReader::with_header(&[][..], CodecConfig::default());
    let mut reader = reader.unwrap();
    assert!(reader.schema().is_empty());
    assert!(reader.read_row().unwrap().is_none());
}

#[test]
fn name_lookup_requires_exactly_one_match() {
    let schema = Schema::new(vec![
        Column::new("id", DataType::Int32),
        Column::new("ID", DataType::Int64),
    ]);
    assert!(matches!(
        schema.index_of("id").unwrap_err(),
        Error::AmbiguousColumn(_)
    ));
    assert!(matches!(
        schema.index_of("missing").unwrap_err(),
        Error::NoSuchColumn(_)
    ));

    let schema = two_column_schema();
    assert_eq!(schema.index_of("Name").unwrap(), 1);
}

#[test]
fn writer_rejects_wrong_value_counts() {
    let schema = two_column_schema();
    let mut writer = RowWriter::new(Vec::new(), schema, CodecConfig::default());
    let err = writer.write_row(&[Value::Int32(1)]).unwrap_err();
    assert!(matches!(
        err,
        Error::ColumnCountMismatch {
            expected: 2,
            actual: 1
        }
    ));
}

#[test]
fn has_more_reports_pending_bytes_not_whole_rows() {
    let schema = two_column_schema();
    let bytes = [0x07];
    let mut reader = RowReader::new(&bytes[..], schema, CodecConfig::default());
    assert!(reader.has_more().unwrap());
    assert!(reader.read_row().is_err());
}
