//! Batch report exporters
//!
//! Both exporters derive their column/key layout from the fixed record field
//! order, so the CSV header and the JSON object keys always agree. Exporting
//! an empty batch is an explicit error raised before any file is touched;
//! silently writing an empty report is the one failure mode these functions
//! are not allowed to have.

use super::result::{BatchResultSet, FIELD_NAMES};
use crate::error::{MetricsError, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Create the parent directory of an output path if it is missing
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Quote a CSV cell if it contains a delimiter, quote or newline
fn csv_escape(cell: &str) -> String {
    if cell.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Write the batch as CSV with a header row
///
/// Fails with [`MetricsError::EmptyBatch`] when there are no records; no
/// file is created in that case.
pub fn export_csv(batch: &BatchResultSet, path: &Path) -> Result<()> {
    if batch.is_empty() {
        return Err(MetricsError::EmptyBatch);
    }

    ensure_parent_dir(path)?;

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", FIELD_NAMES.join(","))?;
    for record in batch.iter() {
        let cells: Vec<String> = record.csv_row().iter().map(|c| csv_escape(c)).collect();
        writeln!(writer, "{}", cells.join(","))?;
    }

    writer.flush()?;
    log::info!("CSV report written to: {:?}", path);
    Ok(())
}

/// Write the batch as a JSON array of field-keyed records
///
/// 2-space-indented UTF-8 encoding; parsing the output reproduces the
/// records field for field. Fails with [`MetricsError::EmptyBatch`] when
/// there are no records, matching the CSV exporter.
pub fn export_json(batch: &BatchResultSet, path: &Path) -> Result<()> {
    if batch.is_empty() {
        return Err(MetricsError::EmptyBatch);
    }

    ensure_parent_dir(path)?;

    let text = serde_json::to_string_pretty(batch)?;
    fs::write(path, text)?;

    log::info!("JSON report written to: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::features::RawFeatureSet;
    use crate::report::result::AnalysisResult;
    use tempfile::TempDir;

    fn sample_batch(n: usize) -> BatchResultSet {
        let config = AnalysisConfig::new();
        let mut batch = BatchResultSet::new();
        for i in 0..n {
            let beat_times: Vec<f64> = (1..=9).map(|b| b as f64 * 0.5).collect();
            let features = RawFeatureSet {
                sample_rate: 44100,
                duration_sec: 5.0,
                onset_times: beat_times.clone(),
                beat_times,
                onset_envelope: vec![0.0; 4],
                tempogram: vec![vec![0.0; 4]],
                tempo_bin_frequencies: vec![120.0],
                rms: vec![0.2, 0.4],
                spectral_centroid: vec![800.0, 1200.0],
                global_tempo_bpm: 120.0,
            };
            let local_bpm = crate::metrics::compute_local_bpm(&features.beat_times, 8);
            batch.push(AnalysisResult::from_features(
                &format!("track_{}.wav", i),
                &features,
                &local_bpm,
                &config,
            ));
        }
        batch
    }

    #[test]
    fn empty_batch_csv_fails_without_creating_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let err = export_csv(&BatchResultSet::new(), &path).unwrap_err();
        assert!(matches!(err, MetricsError::EmptyBatch));
        assert!(!path.exists());
    }

    #[test]
    fn empty_batch_json_fails_without_creating_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        let err = export_json(&BatchResultSet::new(), &path).unwrap_err();
        assert!(matches!(err, MetricsError::EmptyBatch));
        assert!(!path.exists());
    }

    #[test]
    fn csv_has_header_plus_one_row_per_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("out.csv");

        export_csv(&sample_batch(3), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], FIELD_NAMES.join(","));
        assert!(lines[1].starts_with("track_0.wav,"));
        assert!(lines[3].starts_with("track_2.wav,"));
    }

    #[test]
    fn json_round_trips_to_identical_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        let batch = sample_batch(2);
        export_json(&batch, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let parsed: BatchResultSet = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.records(), batch.records());
    }

    #[test]
    fn json_uses_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        export_json(&sample_batch(1), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {"));
        assert!(text.contains("\n    \"file\""));
    }

    #[test]
    fn csv_and_json_expose_the_same_fields_in_the_same_order() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("out.csv");
        let json_path = dir.path().join("out.json");

        let batch = sample_batch(1);
        export_csv(&batch, &csv_path).unwrap();
        export_json(&batch, &json_path).unwrap();

        let csv_text = fs::read_to_string(&csv_path).unwrap();
        let header: Vec<&str> = csv_text.lines().next().unwrap().split(',').collect();

        let json_text = fs::read_to_string(&json_path).unwrap();
        let json_keys: Vec<String> = json_text
            .lines()
            .filter_map(|line| {
                let trimmed = line.trim_start();
                trimmed.strip_prefix('"')?.split('"').next().map(String::from)
            })
            .collect();

        assert_eq!(header, json_keys);
        assert_eq!(header, FIELD_NAMES.to_vec());
    }
}
