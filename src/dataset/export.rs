//! Byte encoders for downloads.
//!
//! Encoding never modifies the frame it is given; the writers work on a clone.

use crate::dataset::error::DatasetError;
use crate::dataset::measurement_frame::MeasurementFrame;
use polars::prelude::*;
use std::io::Cursor;

/// Encodes `frame` as comma-separated text with a header row.
///
/// Values containing a comma or quote are quoted. Missing cells are empty fields.
/// An empty frame produces the header line only.
///
/// # Errors
///
/// Returns [`DatasetError::CsvEncode`] if the writer fails.
pub fn encode_csv(frame: &DataFrame) -> Result<Vec<u8>, DatasetError> {
    let rows = frame.height();
    let mut df = frame.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)
        .map_err(|source| DatasetError::CsvEncode { rows, source })?;
    Ok(buffer)
}

/// Encodes `frame` as a Snappy-compressed Parquet file held in memory.
///
/// Column types are kept, so [`decode_parquet`] reads back an equal frame.
///
/// # Errors
///
/// Returns [`DatasetError::ParquetEncode`] if the writer fails.
pub fn encode_parquet(frame: &DataFrame) -> Result<Vec<u8>, DatasetError> {
    let rows = frame.height();
    let mut df = frame.clone();
    let mut buffer = Vec::new();
    ParquetWriter::new(&mut buffer)
        .with_compression(ParquetCompression::Snappy)
        .finish(&mut df)
        .map_err(|source| DatasetError::ParquetEncode { rows, source })?;
    Ok(buffer)
}

/// Reads Parquet bytes produced by [`encode_parquet`] back into a frame.
///
/// # Errors
///
/// Returns [`DatasetError::ParquetDecode`] for unreadable bytes and
/// [`DatasetError::SchemaMismatch`] when the columns are not the measurement layout.
pub fn decode_parquet(bytes: &[u8]) -> Result<MeasurementFrame, DatasetError> {
    let frame = ParquetReader::new(Cursor::new(bytes))
        .finish()
        .map_err(DatasetError::ParquetDecode)?;
    let frame = MeasurementFrame::new(frame);
    frame.validate_layout()?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::normalize::normalize;
    use crate::test_fixtures::{awkward_raw_table, row_with, sample_raw_table, table_of};
    use crate::types::columns::column_names;

    fn frame_of(raw: &crate::RawTable) -> Result<MeasurementFrame, DatasetError> {
        MeasurementFrame::from_records(&normalize(raw)?.records)
    }

    fn header_line() -> String {
        column_names().collect::<Vec<_>>().join(",")
    }

    #[test]
    fn test_csv_header_and_rows() -> Result<(), Box<dyn std::error::Error>> {
        let frame = frame_of(&sample_raw_table())?;
        let text = String::from_utf8(encode_csv(&frame.frame)?)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], header_line());
        assert!(lines[1].starts_with("76,"));
        // The unparsable speed is written as an empty field.
        assert!(lines[2].contains(",,"));
        Ok(())
    }

    #[test]
    fn test_csv_quotes_commas_and_leaves_missing_empty() -> Result<(), Box<dyn std::error::Error>> {
        let frame = frame_of(&awkward_raw_table())?;
        let text = String::from_utf8(encode_csv(&frame.frame)?)?;
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].ends_with("\"+01:00, CET\""));
        assert!(lines[2].ends_with(",+01:00"));
        assert!(lines[2].contains(",,"));
        Ok(())
    }

    #[test]
    fn test_csv_of_empty_frame_is_header_only() -> Result<(), Box<dyn std::error::Error>> {
        let frame = MeasurementFrame::from_records(&[])?;
        let text = String::from_utf8(encode_csv(&frame.frame)?)?;
        assert_eq!(text.trim_end(), header_line());
        Ok(())
    }

    #[test]
    fn test_encoding_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
        let frame = frame_of(&sample_raw_table())?;
        assert_eq!(encode_csv(&frame.frame)?, encode_csv(&frame.frame)?);
        assert_eq!(encode_parquet(&frame.frame)?, encode_parquet(&frame.frame)?);
        Ok(())
    }

    #[test]
    fn test_parquet_keeps_columns_types_and_nulls() -> Result<(), Box<dyn std::error::Error>> {
        let frame = frame_of(&sample_raw_table())?;
        let bytes = encode_parquet(&frame.frame)?;
        assert_eq!(&bytes[..4], b"PAR1");

        let decoded = decode_parquet(&bytes)?;
        assert_eq!(decoded.frame.schema(), frame.frame.schema());
        assert!(decoded.frame.equals_missing(&frame.frame));
        Ok(())
    }

    #[test]
    fn test_parquet_keeps_sub_millisecond_timestamps() -> Result<(), Box<dyn std::error::Error>> {
        let raw = table_of(vec![row_with("2024-01-01T06:30:00.1234567", &[])]);
        let normalized = normalize(&raw)?;
        let frame = MeasurementFrame::from_records(&normalized.records)?;

        let decoded = decode_parquet(&encode_parquet(&frame.frame)?)?;
        assert_eq!(decoded.collect_records()?, normalized.records);

        let text = String::from_utf8(encode_csv(&frame.frame)?)?;
        assert!(text.contains("06:30:00.123456700"));
        Ok(())
    }

    #[test]
    fn test_parquet_of_empty_frame_is_valid() -> Result<(), Box<dyn std::error::Error>> {
        let frame = MeasurementFrame::from_records(&[])?;
        let decoded = decode_parquet(&encode_parquet(&frame.frame)?)?;
        assert!(decoded.is_empty());
        assert_eq!(decoded.column_names(), frame.column_names());
        Ok(())
    }

    #[test]
    fn test_decode_rejects_foreign_layout() -> Result<(), Box<dyn std::error::Error>> {
        let foreign = df!("a" => [1i64, 2])?;
        let bytes = encode_parquet(&foreign)?;
        assert!(matches!(
            decode_parquet(&bytes),
            Err(DatasetError::SchemaMismatch { .. })
        ));
        assert!(matches!(
            decode_parquet(b"not parquet"),
            Err(DatasetError::ParquetDecode(_))
        ));
        Ok(())
    }
}
