//! Per-pixel gain calibration (C8, supplemented from `original_source/`).
//!
//! Loads a whitespace-separated ASCII scale file of `n_on n_off` event
//! counts, one pair per pixel in row-major order, and derives a per-pixel
//! gain `scale` that the temporal filter multiplies into `dp` (see the
//! `RESCALE` semantics documented on [`crate::temporal::TemporalFilter::apply`]).
//!
//! The gain for pixel `i` is `scale_i = avg_total_events / (n_on_i + n_off_i)`:
//! pixels that saw more events than average get a gain below 1, pixels that
//! saw fewer get a gain above 1, so that after scaling every pixel's
//! polarity deviation contributes about the same average magnitude.

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::state::StateBuffer;

/// Summary diagnostics computed while loading a scale file, mirroring what
/// the reference tool prints to its console on load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationStats {
    /// Number of per-pixel scale entries read.
    pub entries: usize,
    /// Average total (on + off) event count per pixel across the file.
    pub avg_events_per_pixel: f64,
    /// Arithmetic mean of the derived per-pixel scale factors.
    pub mean: f64,
    /// Standard deviation of the derived per-pixel scale factors.
    pub stddev: f64,
    /// Harmonic mean of the derived per-pixel scale factors.
    pub harmonic_mean: f64,
}

/// Loads a scale file and writes the derived per-pixel gain into
/// `state`'s `scale` field, in row-major order.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the file cannot be read, contains
/// fewer than `width * height` `n_on n_off` pairs, contains a token that
/// is not a non-negative integer, or a pixel with zero total events
/// (a zero-division gain is not recoverable).
pub fn load_scale_file(path: impl AsRef<Path>, state: &mut StateBuffer) -> Result<CalibrationStats> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!("cannot open scale file {}: {e}", path.display()))
    })?;

    let n_pix = state.len();
    let mut tokens = contents.split_ascii_whitespace().map(|tok| {
        tok.parse::<u64>().map_err(|_| {
            Error::configuration(format!("scale file {}: non-integer token {tok:?}", path.display()))
        })
    });

    let mut first_pass = Vec::with_capacity(n_pix * 2);
    for _ in 0..(n_pix * 2) {
        match tokens.next() {
            Some(v) => first_pass.push(v?),
            None => {
                return Err(Error::configuration(format!(
                    "scale file {} has fewer than {} entries",
                    path.display(),
                    n_pix * 2
                )))
            }
        }
    }
    let total: u64 = first_pass.iter().sum();
    let avg_events_per_pixel = total as f64 / n_pix as f64;

    let mut ss = 0.0f64;
    let mut ss2 = 0.0f64;
    let mut sum_inv = 0.0f64;
    for (idx, pair) in first_pass.chunks_exact(2).enumerate() {
        let (n_on, n_off) = (pair[0], pair[1]);
        let total_events = n_on + n_off;
        if total_events == 0 {
            return Err(Error::configuration(format!(
                "scale file {}: pixel {idx} has zero total events",
                path.display()
            )));
        }
        let c_i = avg_events_per_pixel / total_events as f64;
        state.as_mut_slice()[idx].scale = c_i as f32;
        ss += c_i;
        ss2 += c_i * c_i;
        sum_inv += 1.0 / c_i;
    }

    let mean = ss / n_pix as f64;
    let variance = ss2 / n_pix as f64 - mean * mean;
    let stddev = variance.max(0.0).sqrt();
    let harmonic_mean = n_pix as f64 / sum_inv;

    let stats = CalibrationStats {
        entries: n_pix,
        avg_events_per_pixel,
        mean,
        stddev,
        harmonic_mean,
    };

    info!(
        path = %path.display(),
        entries = stats.entries,
        avg_events_per_pixel = stats.avg_events_per_pixel,
        mean = stats.mean,
        stddev = stats.stddev,
        harmonic_mean = stats.harmonic_mean,
        "loaded scale file"
    );

    Ok(stats)
}
