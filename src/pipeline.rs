//! Batch analysis pipeline orchestration
//!
//! Resolves the input path to a list of audio files, drives the per-file
//! decode/extract/measure sequence strictly one file at a time, and hands
//! the finished batch to the exporters. Per-file analysis keeps no state
//! across files, so parallelizing the loop would be safe; the pipeline stays
//! sequential on purpose.

use crate::config::{AnalysisConfig, ExportFormat, PlotFormat, SUPPORTED_INPUT_EXTENSIONS};
use crate::error::{MetricsError, Result};
use crate::features::{decode_to_mono, FeatureProvider};
use crate::metrics::{compute_local_bpm, compute_tempogram_tempo};
use crate::plot::{render_diagnostics, DiagnosticSeries};
use crate::report::{export_csv, export_json, AnalysisResult, BatchResultSet};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve an input argument to the ordered list of files to analyze
///
/// A single file is returned as-is after an extension check; naming an
/// unsupported file explicitly is an error. A directory yields every entry
/// with a supported extension, sorted by file name so batch order is
/// deterministic across platforms (directory enumeration order is not).
pub fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input)?;

    if metadata.is_file() {
        if !has_supported_extension(input) {
            return Err(MetricsError::UnsupportedFormat {
                extension: display_extension(input),
            });
        }
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_supported_extension(path))
        .collect();
    files.sort();

    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_lowercase();
            SUPPORTED_INPUT_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

fn display_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| "(none)".to_string())
}

/// Diagnostic image path for an input file: `<outdir>/<stem>_analysis.<ext>`
///
/// Uniqueness is only guaranteed when input base names (ignoring extension)
/// are unique within the batch; `a.wav` and `a.mp3` map to the same image.
pub fn plot_path(out_dir: &Path, input: &Path, format: PlotFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "track".to_string());
    out_dir.join(format!("{}_analysis.{}", stem, format.extension()))
}

/// Aggregated report path for a batch run
pub fn report_path(out_dir: &Path, format: ExportFormat) -> PathBuf {
    out_dir.join(format!("analysis_results.{}", format.extension()))
}

/// Drives the per-file analysis loop for one batch run
pub struct BatchRunner<P: FeatureProvider> {
    config: AnalysisConfig,
    provider: P,
    out_dir: PathBuf,
    plot: Option<PlotFormat>,
    export: Option<ExportFormat>,
}

impl<P: FeatureProvider> BatchRunner<P> {
    pub fn new(config: AnalysisConfig, provider: P, out_dir: PathBuf) -> Self {
        Self {
            config,
            provider,
            out_dir,
            plot: None,
            export: None,
        }
    }

    /// Enable per-file diagnostic plots in the given raster format
    pub fn with_plots(mut self, format: PlotFormat) -> Self {
        self.plot = Some(format);
        self
    }

    /// Enable the aggregated batch report in the given export format
    pub fn with_export(mut self, format: ExportFormat) -> Self {
        self.export = Some(format);
        self
    }

    /// Run the batch: analyze every file in order, then export
    ///
    /// Any per-file failure aborts the remaining batch and no aggregated
    /// report is written; isolating failures into per-file records is a
    /// possible hardening the current design does not take.
    pub fn run(&self, input: &Path) -> anyhow::Result<BatchResultSet> {
        let files = collect_files(input)?;
        log::info!("Collected {} file(s) from {:?}", files.len(), input);

        let mut batch = BatchResultSet::new();

        for (i, file) in files.iter().enumerate() {
            log::info!("[{}/{}] Analyzing: {:?}", i + 1, files.len(), file);
            let result = self
                .analyze_file(file)
                .with_context(|| format!("Failed to analyze {:?}", file))?;
            batch.push(result);
        }

        if let Some(format) = self.export {
            let path = report_path(&self.out_dir, format);
            match format {
                ExportFormat::Csv => export_csv(&batch, &path)?,
                ExportFormat::Json => export_json(&batch, &path)?,
            }
        }

        log::info!("Batch complete: {} record(s)", batch.len());
        Ok(batch)
    }

    /// Decode, extract features and compute all metrics for one file
    fn analyze_file(&self, path: &Path) -> Result<AnalysisResult> {
        let (samples, sample_rate) = decode_to_mono(path)?;

        let features = self
            .provider
            .extract_features(&samples, sample_rate, path)?;
        features.validate(path)?;
        drop(samples);

        let local_bpm = compute_local_bpm(&features.beat_times, self.config.local_tempo_window);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let result = AnalysisResult::from_features(&file_name, &features, &local_bpm, &self.config);

        if let Some(format) = self.plot {
            let tempogram_bpm = compute_tempogram_tempo(
                &features.tempogram,
                &features.tempo_bin_frequencies,
                self.config.min_tempo_bpm,
                self.config.max_tempo_bpm,
            );
            let series = DiagnosticSeries {
                local_bpm: local_bpm.clone(),
                rms: features.rms.clone(),
                spectral_centroid: features.spectral_centroid.clone(),
                tempogram_bpm,
            };
            let image_path = plot_path(&self.out_dir, path, format);
            render_diagnostics(&series, &image_path, format)?;
            log::info!("Plot written to: {:?}", image_path);
        }

        Ok(result)
    }
}
