//! Delimited text import/export of the materials table.
//!
//! Files have a header row `id,Description,alpha`; `alpha` holds the absorption
//! spectrum as a bracketed, space separated list such as `[0.1 0.2 0.3 ...]`.

use super::database::{MaterialDatabase, MaterialRecord};
use crate::error::{AcoustRayError, Result};
use crate::math::{NUM_BANDS, Spectrum};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

const FIELDNAMES: [&str; 3] = ["id", "Description", "alpha"];

/// Reads and writes material records in some on-disk shape.
pub trait MaterialSerializer {
    fn write_records(&self, records: &[MaterialRecord], out: &mut dyn Write) -> Result<()>;

    fn read_records(&self, input: &mut dyn BufRead) -> Result<Vec<MaterialRecord>>;
}

#[derive(Serialize)]
struct CsvRowOut<'a> {
    id: u32,
    #[serde(rename = "Description")]
    description: &'a str,
    alpha: String,
}

#[derive(Deserialize)]
struct CsvRowIn {
    id: u32,
    #[serde(rename = "Description")]
    description: String,
    alpha: String,
}

/// Comma separated format, one material per row, `\r\n` line ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvMaterialFormat;

impl MaterialSerializer for CsvMaterialFormat {
    fn write_records(&self, records: &[MaterialRecord], out: &mut dyn Write) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(out);
        // Header goes out even for an empty table
        writer.write_record(FIELDNAMES).map_err(format_error)?;
        for m in records {
            writer
                .serialize(CsvRowOut {
                    id: m.id(),
                    description: &m.description,
                    alpha: format_alpha(&m.alpha),
                })
                .map_err(format_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_records(&self, input: &mut dyn BufRead) -> Result<Vec<MaterialRecord>> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
        let headers = reader.headers().map_err(format_error)?.clone();

        let mut records = Vec::new();
        let mut raw = csv::StringRecord::new();
        while reader.read_record(&mut raw).map_err(format_error)? {
            let line = raw.position().map_or(0, |p| p.line() as usize);
            let row: CsvRowIn = raw
                .deserialize(Some(&headers))
                .map_err(|e| AcoustRayError::MaterialFormat {
                    line,
                    reason: e.to_string(),
                })?;
            let alpha = parse_alpha(&row.alpha)
                .map_err(|reason| AcoustRayError::MaterialFormat { line, reason })?;
            records.push(MaterialRecord::new(row.id, alpha, row.description));
        }
        Ok(records)
    }
}

fn format_error(err: csv::Error) -> AcoustRayError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => AcoustRayError::Io(e),
        _ => AcoustRayError::MaterialFormat { line, reason },
    }
}

/// Writes the whole table to `path`.
pub fn save_materials(
    db: &MaterialDatabase,
    path: impl AsRef<Path>,
    format: &dyn MaterialSerializer,
) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(std::fs::File::create(path)?);
    format.write_records(db.records(), &mut out)?;
    out.flush()?;
    log::info!("Materials file saved to: {}", path.display());
    Ok(())
}

/// Replaces the table with the records stored in `path`.
///
/// On error the table is left untouched.
pub fn load_materials(
    db: &mut MaterialDatabase,
    path: impl AsRef<Path>,
    format: &dyn MaterialSerializer,
) -> Result<usize> {
    let path = path.as_ref();
    let mut input = std::io::BufReader::new(std::fs::File::open(path)?);
    let records = format.read_records(&mut input)?;
    db.replace_all(records)?;
    log::info!("Materials list loaded from {} ({} materials)", path.display(), db.len());
    Ok(db.len())
}

fn format_alpha(alpha: &Spectrum) -> String {
    let values: Vec<String> = alpha.iter().map(|a| a.to_string()).collect();
    format!("[{}]", values.join(" "))
}

fn parse_alpha(text: &str) -> std::result::Result<Spectrum, String> {
    let inner = text.trim().trim_matches(['[', ']']);
    let values = inner
        .split_whitespace()
        .map(|v| v.parse::<f32>().map_err(|e| format!("invalid alpha value '{}': {}", v, e)))
        .collect::<std::result::Result<Vec<f32>, String>>()?;
    values
        .try_into()
        .map_err(|v: Vec<f32>| format!("expected {} alpha values, found {}", NUM_BANDS, v.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db() -> MaterialDatabase {
        MaterialDatabase::from_records(vec![
            MaterialRecord::new(0, [0.01, 0.02, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08], "concrete"),
            MaterialRecord::new(3, [0.1; NUM_BANDS], "carpet, thick \"shag\""),
            MaterialRecord::new(9, [0.123456, 0.5, 0.25, 0.0, 1.0, 0.333333, 0.9, 0.7], "--"),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_trip_through_file() {
        let db = sample_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.csv");

        save_materials(&db, &path, &CsvMaterialFormat).unwrap();

        let mut loaded = MaterialDatabase::new();
        loaded.add().unwrap();
        let count = load_materials(&mut loaded, &path, &CsvMaterialFormat).unwrap();

        assert_eq!(count, db.len());
        for (a, b) in db.iter().zip(loaded.iter()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.description, b.description);
            for (x, y) in a.alpha.iter().zip(b.alpha.iter()) {
                assert!((x - y).abs() < 1e-6);
            }
        }
        assert_eq!(loaded.max_index(), Some(9));
        assert_eq!(loaded.selected(), Some(0));
    }

    #[test]
    fn test_written_shape() {
        let db = MaterialDatabase::from_records(vec![MaterialRecord::new(
            2,
            [0.5, 0.25, 0.0, 1.0, 0.5, 0.25, 0.0, 1.0],
            "wood",
        )])
        .unwrap();
        let mut out = Vec::new();
        CsvMaterialFormat.write_records(db.records(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "id,Description,alpha\r\n2,wood,[0.5 0.25 0 1 0.5 0.25 0 1]\r\n"
        );
    }

    #[test]
    fn test_descriptions_with_delimiters_are_quoted() {
        let db = MaterialDatabase::from_records(vec![MaterialRecord::new(
            1,
            [0.0; NUM_BANDS],
            "carpet, thick \"shag\"",
        )])
        .unwrap();
        let mut out = Vec::new();
        CsvMaterialFormat.write_records(db.records(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("1,\"carpet, thick \"\"shag\"\"\",[0 0 0 0 0 0 0 0]")
        );
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let mut out = Vec::new();
        CsvMaterialFormat.write_records(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id,Description,alpha\r\n");
    }

    #[test]
    fn test_reads_reordered_columns_and_blank_lines() {
        let text = "alpha,id,Description\n\n[0.1 0.1 0.1 0.1 0.1 0.1 0.1 0.10000000149011612],4,\"multi\nline\"\n";
        let records = CsvMaterialFormat
            .read_records(&mut text.as_bytes())
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), 4);
        assert_eq!(records[0].description, "multi\nline");
        assert!((records[0].alpha[7] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_band_count_is_rejected() {
        let text = "id,Description,alpha\n1,short,[0.1 0.2]\n";
        let result = CsvMaterialFormat.read_records(&mut text.as_bytes());
        assert!(matches!(
            result,
            Err(AcoustRayError::MaterialFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_failed_load_keeps_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "id,Description\n1,no alpha\n").unwrap();

        let mut db = sample_db();
        assert!(load_materials(&mut db, &path, &CsvMaterialFormat).is_err());
        assert_eq!(db.len(), 3);
    }
}
