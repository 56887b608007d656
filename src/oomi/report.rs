//! Parsing of the portal's consumption report export.
//!
//! The export is a human-oriented spreadsheet: a banner row, then a header
//! row whose second cell holds a multi-line delivery address, then one data
//! row per hour. Everything human about it is stripped here so downstream
//! storage only ever sees clean rows.

use crate::error::ParseError;
use crate::model::{ConsumptionRow, ConsumptionTable};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;

/// Timestamps in the export look like `17.05.2021 14.00`.
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H.%M";

/// Parses a downloaded report payload into consumption rows.
///
/// Row 1 is a title banner and is skipped. Row 2 is the header; its second
/// cell is the address label shared by every produced row. All remaining
/// rows must have a timestamp and a numeric reading in the first two
/// columns. Row order is preserved as emitted by the portal.
pub(crate) fn parse_report(payload: &[u8]) -> Result<ConsumptionTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(payload);
    let mut records = reader.records();

    records
        .next()
        .transpose()?
        .ok_or_else(|| ParseError::unexpected_shape("missing banner row"))?;
    let header = records
        .next()
        .transpose()?
        .ok_or_else(|| ParseError::unexpected_shape("missing header row"))?;
    let location_cell = header
        .get(1)
        .ok_or_else(|| ParseError::unexpected_shape("header row has no consumption column"))?;
    let location = normalize_location(location_cell);

    let mut table = ConsumptionTable::new();
    for (index, record) in records.enumerate() {
        let record = record?;
        let row_number = index + 3;
        let time_cell = record.get(0).map(str::trim).ok_or_else(|| {
            ParseError::unexpected_shape(format!("row {} has no timestamp column", row_number))
        })?;
        let consumption_cell = record.get(1).map(str::trim).ok_or_else(|| {
            ParseError::unexpected_shape(format!("row {} has no consumption column", row_number))
        })?;

        let time = NaiveDateTime::parse_from_str(time_cell, TIMESTAMP_FORMAT)
            .map_err(|e| ParseError::datetime_parse(time_cell, e))?;
        let consumption = consumption_cell
            .parse::<f64>()
            .map_err(|e| ParseError::number_parse(consumption_cell, e))?;

        table.push(ConsumptionRow {
            time,
            consumption,
            location: location.clone(),
        });
    }
    Ok(table)
}

/// Collapses the export's multi-line address header into a single label.
///
/// Splits on line breaks, trims each line, drops empty lines, and rejoins
/// with `", "`. Idempotent: an already-normalized label passes through
/// unchanged.
pub(crate) fn normalize_location(raw: &str) -> String {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::report_payload;
    use chrono::NaiveDate;

    fn hour(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    mod parse_report {
        use super::*;

        #[test]
        fn test_two_row_report() {
            let payload = report_payload(
                "Meter\nRoom A",
                &[("01.01.2021 00.00", "1.5"), ("01.01.2021 01.00", "2.0")],
            );

            let table = parse_report(payload.as_bytes()).unwrap();

            assert_eq!(table.len(), 2);
            assert_eq!(table[0].time, hour(2021, 1, 1, 0));
            assert_eq!(table[0].consumption, 1.5);
            assert_eq!(table[0].location, "Meter, Room A");
            assert_eq!(table[1].time, hour(2021, 1, 1, 1));
            assert_eq!(table[1].consumption, 2.0);
            assert_eq!(table[1].location, "Meter, Room A");
        }

        #[test]
        fn test_preserves_input_order() {
            let payload = report_payload(
                "Meter",
                &[
                    ("17.05.2021 14.00", "0.7"),
                    ("17.05.2021 13.00", "0.3"),
                    ("17.05.2021 15.00", "1.1"),
                ],
            );

            let table = parse_report(payload.as_bytes()).unwrap();

            assert_eq!(table.len(), 3);
            assert_eq!(table[0].time, hour(2021, 5, 17, 14));
            assert_eq!(table[1].time, hour(2021, 5, 17, 13));
            assert_eq!(table[2].time, hour(2021, 5, 17, 15));
        }

        #[test]
        fn test_no_data_rows_yields_empty_table() {
            let payload = report_payload("Meter\nRoom A", &[]);

            let table = parse_report(payload.as_bytes()).unwrap();

            assert!(table.is_empty());
        }

        #[test]
        fn test_timestamp_format_is_strict() {
            let payload = report_payload("Meter", &[("2021-01-01 00:00", "1.5")]);

            let result = parse_report(payload.as_bytes());

            assert!(matches!(result, Err(ParseError::DateTimeParse { .. })));
        }

        #[test]
        fn test_timestamp_cell_parses_to_local_hour() {
            let payload = report_payload("Meter", &[("17.05.2021 14.00", "0.0")]);

            let table = parse_report(payload.as_bytes()).unwrap();

            assert_eq!(table[0].time, hour(2021, 5, 17, 14));
        }

        #[test]
        fn test_non_numeric_consumption_fails() {
            let payload = report_payload("Meter", &[("01.01.2021 00.00", "n/a")]);

            let result = parse_report(payload.as_bytes());

            assert!(matches!(result, Err(ParseError::NumberParse { .. })));
        }

        #[test]
        fn test_missing_consumption_column_fails() {
            let payload = "Consumption report\ntime,\"Meter\"\n01.01.2021 00.00\n";

            let result = parse_report(payload.as_bytes());

            assert!(matches!(result, Err(ParseError::UnexpectedShape(_))));
        }

        #[test]
        fn test_empty_payload_fails() {
            let result = parse_report(b"");

            assert!(matches!(result, Err(ParseError::UnexpectedShape(_))));
        }

        #[test]
        fn test_banner_only_payload_fails() {
            let result = parse_report(b"Consumption report\n");

            assert!(matches!(result, Err(ParseError::UnexpectedShape(_))));
        }

        #[test]
        fn test_single_column_header_fails() {
            let result = parse_report(b"Consumption report\ntime\n");

            assert!(matches!(result, Err(ParseError::UnexpectedShape(_))));
        }
    }

    mod normalize_location {
        use super::*;

        #[test]
        fn test_multi_line_address() {
            assert_eq!(
                normalize_location(" 123 Main St \n  Apt 4 "),
                "123 Main St, Apt 4"
            );
        }

        #[test]
        fn test_idempotent() {
            let once = normalize_location(" 123 Main St \n  Apt 4 ");
            assert_eq!(normalize_location(&once), once);
        }

        #[test]
        fn test_windows_line_breaks() {
            assert_eq!(normalize_location("Meter\r\nRoom A"), "Meter, Room A");
        }

        #[test]
        fn test_trailing_line_break_leaves_no_separator() {
            assert_eq!(normalize_location("Meter\nRoom A\n"), "Meter, Room A");
        }

        #[test]
        fn test_single_line_passes_through() {
            assert_eq!(normalize_location("Meter"), "Meter");
        }
    }
}
