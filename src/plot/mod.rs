//! Diagnostic plot rendering
//!
//! Thin downstream consumer of the analysis layer: four line panels (local
//! BPM, RMS, spectral centroid, tempogram dominant tempo) in a 2x2 grid,
//! rasterized at a fixed resolution and written as PNG or lossless WebP.
//! Undefined frames break the polyline instead of being interpolated over.

use crate::config::PlotFormat;
use crate::error::Result;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, Rgb, RgbImage};
use std::fs;
use std::path::Path;

/// Output raster width in pixels
pub const PLOT_WIDTH: u32 = 1200;

/// Output raster height in pixels
pub const PLOT_HEIGHT: u32 = 800;

/// Inner margin of each panel in pixels
const PANEL_MARGIN: u32 = 24;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BORDER: Rgb<u8> = Rgb([200, 200, 200]);

/// The four curves a diagnostic sheet is built from
#[derive(Debug, Clone)]
pub struct DiagnosticSeries {
    /// Sliding-window local tempo, BPM
    pub local_bpm: Vec<f64>,

    /// RMS loudness per frame
    pub rms: Vec<f64>,

    /// Spectral centroid per frame, Hz
    pub spectral_centroid: Vec<f64>,

    /// Tempogram dominant tempo per frame; `None` frames render as gaps
    pub tempogram_bpm: Vec<Option<f64>>,
}

/// Render the four diagnostic curves to a raster image
///
/// Creates missing parent directories. The format decides the encoder; both
/// supported formats are lossless.
pub fn render_diagnostics(
    series: &DiagnosticSeries,
    out_path: &Path,
    format: PlotFormat,
) -> Result<()> {
    let mut img = RgbImage::from_pixel(PLOT_WIDTH, PLOT_HEIGHT, BACKGROUND);

    let panel_w = PLOT_WIDTH / 2;
    let panel_h = PLOT_HEIGHT / 2;

    let local_bpm: Vec<Option<f64>> = series.local_bpm.iter().map(|&v| Some(v)).collect();
    let rms: Vec<Option<f64>> = series.rms.iter().map(|&v| Some(v)).collect();
    let centroid: Vec<Option<f64>> = series.spectral_centroid.iter().map(|&v| Some(v)).collect();

    let panels: [(&[Option<f64>], Rgb<u8>); 4] = [
        (&local_bpm, Rgb([31, 119, 180])),
        (&rms, Rgb([255, 127, 14])),
        (&centroid, Rgb([44, 160, 44])),
        (&series.tempogram_bpm, Rgb([214, 39, 40])),
    ];

    for (index, (points, color)) in panels.iter().enumerate() {
        let x0 = (index as u32 % 2) * panel_w;
        let y0 = (index as u32 / 2) * panel_h;
        draw_panel_border(&mut img, x0, y0, panel_w, panel_h);
        draw_series(&mut img, x0, y0, panel_w, panel_h, points, *color);
    }

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match format {
        PlotFormat::Png => img.save(out_path)?,
        PlotFormat::Webp => {
            let mut buf = Vec::new();
            let encoder = WebPEncoder::new_lossless(&mut buf);
            encoder.encode(
                img.as_raw(),
                PLOT_WIDTH,
                PLOT_HEIGHT,
                ExtendedColorType::Rgb8,
            )?;
            fs::write(out_path, buf)?;
        }
    }

    log::debug!("Diagnostics rendered to: {:?}", out_path);
    Ok(())
}

/// Rectangle outline around a panel's drawable area
fn draw_panel_border(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
    let left = x0 + PANEL_MARGIN;
    let right = x0 + w - PANEL_MARGIN - 1;
    let top = y0 + PANEL_MARGIN;
    let bottom = y0 + h - PANEL_MARGIN - 1;

    for x in left..=right {
        img.put_pixel(x, top, BORDER);
        img.put_pixel(x, bottom, BORDER);
    }
    for y in top..=bottom {
        img.put_pixel(left, y, BORDER);
        img.put_pixel(right, y, BORDER);
    }
}

/// Draw one series as a polyline inside a panel
///
/// Scaling uses the finite value range of the series; non-finite values and
/// `None` frames leave gaps. A flat series renders as a horizontal midline.
fn draw_series(
    img: &mut RgbImage,
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    points: &[Option<f64>],
    color: Rgb<u8>,
) {
    let finite: Vec<f64> = points
        .iter()
        .filter_map(|p| p.filter(|v| v.is_finite()))
        .collect();
    if finite.is_empty() || points.len() < 2 {
        return;
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let inner_w = (w - 2 * PANEL_MARGIN) as f64;
    let inner_h = (h - 2 * PANEL_MARGIN) as f64;
    let left = (x0 + PANEL_MARGIN) as f64;
    let top = (y0 + PANEL_MARGIN) as f64;

    let to_pixel = |i: usize, v: f64| -> (f64, f64) {
        let x = left + i as f64 / (points.len() - 1) as f64 * (inner_w - 1.0);
        let norm = if range > 0.0 { (v - min) / range } else { 0.5 };
        let y = top + (1.0 - norm) * (inner_h - 1.0);
        (x, y)
    };

    for i in 0..points.len() - 1 {
        let (a, b) = match (points[i], points[i + 1]) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => (a, b),
            _ => continue, // Gap in the series
        };
        let (x1, y1) = to_pixel(i, a);
        let (x2, y2) = to_pixel(i + 1, b);
        draw_line(img, x1, y1, x2, y2, color);
    }
}

/// Plot a line segment by stepping along its longer axis
fn draw_line(img: &mut RgbImage, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgb<u8>) {
    let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0) as usize;
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = (x1 + t * (x2 - x1)).round() as u32;
        let y = (y1 + t * (y2 - y1)).round() as u32;
        if x < img.width() && y < img.height() {
            img.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_series() -> DiagnosticSeries {
        DiagnosticSeries {
            local_bpm: (0..50).map(|i| 118.0 + (i % 5) as f64).collect(),
            rms: (0..200).map(|i| 0.1 + 0.05 * ((i % 20) as f64)).collect(),
            spectral_centroid: (0..200).map(|i| 800.0 + 4.0 * i as f64).collect(),
            tempogram_bpm: (0..200)
                .map(|i| if i % 7 == 0 { None } else { Some(120.0 + (i % 3) as f64) })
                .collect(),
        }
    }

    #[test]
    fn renders_png_and_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("report_analysis.png");

        render_diagnostics(&sample_series(), &path, PlotFormat::Png).unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn renders_lossless_webp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report_analysis.webp");

        render_diagnostics(&sample_series(), &path, PlotFormat::Webp).unwrap();

        // RIFF....WEBP container magic
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn empty_series_still_renders_a_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");

        let series = DiagnosticSeries {
            local_bpm: vec![],
            rms: vec![],
            spectral_centroid: vec![],
            tempogram_bpm: vec![None; 10],
        };
        render_diagnostics(&series, &path, PlotFormat::Png).unwrap();
        assert!(path.exists());
    }
}
