//! CSV parsing for PPK2 digital-channel exports

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

use super::{Recording, RecordingError, PROGRESS_INTERVAL_ROWS};
use crate::config::AnalyzerConfig;
use crate::trigger::event::{Level, Sample};

/// Why a single data row was skipped
#[derive(Error, Debug, PartialEq)]
enum RowError {
    #[error("expected at least {expected} fields, got {got}")]
    TooShort { expected: usize, got: usize },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("invalid level '{value}' in column '{column}'")]
    InvalidLevel { column: String, value: String },

    #[error("row is not valid UTF-8")]
    InvalidEncoding,
}

/// Positions of the three columns of interest within a row
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    timestamp: usize,
    send: usize,
    receive: usize,
}

impl ColumnLayout {
    fn from_header(header: &str, config: &AnalyzerConfig) -> Result<Self, RecordingError> {
        let names: Vec<String> = header
            .trim_start_matches('\u{feff}')
            .split(',')
            .map(|h| h.trim().to_string())
            .collect();

        let find = |column: &str| {
            names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| RecordingError::MissingColumn {
                    column: column.to_string(),
                    found: names.clone(),
                })
        };

        let layout = Self {
            timestamp: find(config.timestamp_column.as_str())?,
            send: find(config.send_column.as_str())?,
            receive: find(config.receive_column.as_str())?,
        };
        tracing::info!(columns = ?names, "Columns found");
        Ok(layout)
    }

    fn min_fields(&self) -> usize {
        self.timestamp.max(self.send).max(self.receive) + 1
    }

    fn parse_row(&self, line: &str, config: &AnalyzerConfig) -> Result<(Sample, Sample), RowError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < self.min_fields() {
            return Err(RowError::TooShort {
                expected: self.min_fields(),
                got: fields.len(),
            });
        }

        let raw_ts = fields[self.timestamp];
        let timestamp = raw_ts
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| RowError::InvalidTimestamp(raw_ts.to_string()))?;

        let send = parse_level(fields[self.send], &config.send_column)?;
        let receive = parse_level(fields[self.receive], &config.receive_column)?;

        Ok((Sample::new(timestamp, send), Sample::new(timestamp, receive)))
    }
}

fn parse_level(value: &str, column: &str) -> Result<Level, RowError> {
    value
        .parse::<i64>()
        .ok()
        .and_then(Level::from_digit)
        .ok_or_else(|| RowError::InvalidLevel {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Read a recording from a CSV file
///
/// # Errors
/// Returns `RecordingError` if the file cannot be read or lacks a required column.
pub fn read_recording(path: &Path, config: &AnalyzerConfig) -> Result<Recording, RecordingError> {
    let file = File::open(path).map_err(|source| RecordingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Parsing CSV file");
    parse_recording(BufReader::new(file), config)
}

/// Read one raw line into `buf`, returning `false` at end of input
fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<bool, RecordingError> {
    buf.clear();
    let read = reader.read_until(b'\n', buf).map_err(RecordingError::Read)?;
    Ok(read > 0)
}

/// Parse a recording from any buffered reader
///
/// The first non-empty line is the header. Data rows that are not UTF-8,
/// too short, or carry a non-finite timestamp or a level other than `0`/`1`
/// are skipped with a warning. Only I/O failures abort the read. Row order
/// is kept as timestamp order.
pub fn parse_recording<R: BufRead>(
    mut reader: R,
    config: &AnalyzerConfig,
) -> Result<Recording, RecordingError> {
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut recording = Recording::default();

    let layout = loop {
        if !next_line(&mut reader, &mut buf)? {
            return Err(RecordingError::MissingHeader);
        }
        line_no += 1;
        let header = String::from_utf8_lossy(&buf);
        let header = header.trim_end();
        if !header.trim().is_empty() {
            break ColumnLayout::from_header(header, config)?;
        }
    };

    while next_line(&mut reader, &mut buf)? {
        line_no += 1;
        let row = std::str::from_utf8(&buf)
            .map_err(|_| RowError::InvalidEncoding)
            .map(str::trim);

        let parsed = match row {
            Ok("") => continue,
            Ok(line) => layout.parse_row(line, config),
            Err(e) => Err(e),
        };

        match parsed {
            Ok((send, receive)) => {
                recording.send.push(send);
                recording.receive.push(receive);
                recording.rows_parsed += 1;
                if recording.rows_parsed % PROGRESS_INTERVAL_ROWS == 0 {
                    tracing::debug!(rows = recording.rows_parsed, "Processed rows");
                }
            }
            Err(e) => {
                recording.rows_skipped += 1;
                tracing::warn!(line = line_no, reason = %e, "Skipping invalid row");
            }
        }
    }

    tracing::info!(
        rows_parsed = recording.rows_parsed,
        rows_skipped = recording.rows_skipped,
        "Successfully parsed data points"
    );

    Ok(recording)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn parse(text: &str) -> Result<Recording, RecordingError> {
        parse_recording(Cursor::new(text), &AnalyzerConfig::default())
    }

    fn levels(samples: &[Sample]) -> Vec<bool> {
        samples.iter().map(|s| s.level.is_high()).collect()
    }

    #[test]
    fn test_parse_ppk2_export() {
        let text = "\
Timestamp(ms),D0,D1,D2,D3,D4,D5,D6,D7
0.000,0,0,0,0,0,0,0,0
0.010,1,0,0,0,0,0,0,0
0.020,1,1,0,0,0,0,0,0
";
        let recording = parse(text).unwrap();
        assert_eq!(recording.rows_parsed, 3);
        assert_eq!(recording.rows_skipped, 0);
        assert_eq!(levels(&recording.send), vec![false, true, true]);
        assert_eq!(levels(&recording.receive), vec![false, false, true]);
        assert_eq!(recording.receive[2].timestamp, 0.02);
    }

    #[test]
    fn test_columns_in_any_order() {
        let text = "D1,D0,Timestamp(ms)\n1,0,5.5\n";
        let recording = parse(text).unwrap();
        assert_eq!(recording.send[0], Sample::new(5.5, Level::Low));
        assert_eq!(recording.receive[0], Sample::new(5.5, Level::High));
    }

    #[test]
    fn test_missing_timestamp_column() {
        let err = parse("Time,D0,D1\n0,0,0\n").unwrap_err();
        match err {
            RecordingError::MissingColumn { column, found } => {
                assert_eq!(column, "Timestamp(ms)");
                assert_eq!(found, vec!["Time", "D0", "D1"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_receive_column() {
        let err = parse("Timestamp(ms),D0\n0,0\n").unwrap_err();
        assert!(matches!(err, RecordingError::MissingColumn { ref column, .. } if column == "D1"));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(parse(""), Err(RecordingError::MissingHeader)));
        assert!(matches!(parse("\n\n"), Err(RecordingError::MissingHeader)));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "\
Timestamp(ms),D0,D1
0.0,0,0
abc,1,0
1.0,2,0
2.0,1
3.0,1,1
inf,1,1
";
        let recording = parse(text).unwrap();
        assert_eq!(recording.rows_parsed, 2);
        assert_eq!(recording.rows_skipped, 4);
        assert_eq!(recording.send[1].timestamp, 3.0);
    }

    #[test]
    fn test_non_utf8_row_is_skipped() {
        let bytes: &[u8] = b"Timestamp(ms),D0,D1\n0.0,0,0\n\xff\xfe,0,0\n1.0,1,0\n";
        let recording = parse_recording(Cursor::new(bytes), &AnalyzerConfig::default()).unwrap();
        assert_eq!(recording.rows_parsed, 2);
        assert_eq!(recording.rows_skipped, 1);
        assert_eq!(recording.send[1], Sample::new(1.0, Level::High));
    }

    #[test]
    fn test_crlf_line_endings() {
        let recording = parse("Timestamp(ms),D0,D1\r\n0.0,0,0\r\n1.0,1,1\r\n").unwrap();
        assert_eq!(recording.rows_parsed, 2);
        assert!(recording.receive[1].level.is_high());
    }

    #[test]
    fn test_blank_lines_and_bom() {
        let text = "\u{feff}Timestamp(ms),D0,D1\n\n0.0,0,0\n\n1.0,1,0\n";
        let recording = parse(text).unwrap();
        assert_eq!(recording.rows_parsed, 2);
        assert_eq!(recording.rows_skipped, 0);
    }

    #[test]
    fn test_custom_columns() {
        let config = AnalyzerConfig {
            timestamp_column: "t".to_string(),
            send_column: "D4".to_string(),
            receive_column: "D7".to_string(),
            ..AnalyzerConfig::default()
        };
        let text = "t,D4,D7\n0.5,1,0\n";
        let recording = parse_recording(Cursor::new(text), &config).unwrap();
        assert!(recording.send[0].level.is_high());
        assert!(!recording.receive[0].level.is_high());
    }

    #[test]
    fn test_row_error_messages() {
        let layout = ColumnLayout {
            timestamp: 0,
            send: 1,
            receive: 2,
        };
        let config = AnalyzerConfig::default();
        assert_eq!(
            layout.parse_row("1.0,5,0", &config).unwrap_err(),
            RowError::InvalidLevel {
                column: "D0".to_string(),
                value: "5".to_string()
            }
        );
        assert_eq!(
            layout.parse_row("1.0", &config).unwrap_err(),
            RowError::TooShort {
                expected: 3,
                got: 1
            }
        );
    }

    #[test]
    fn test_read_recording_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Timestamp(ms),D0,D1").unwrap();
        writeln!(file, "0.0,0,0").unwrap();
        writeln!(file, "0.1,1,0").unwrap();
        file.flush().unwrap();

        let recording = read_recording(file.path(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(recording.rows_parsed, 2);
    }

    #[test]
    fn test_read_recording_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let err = read_recording(&path, &AnalyzerConfig::default()).unwrap_err();
        match err {
            RecordingError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
