//! Temporal high-pass filter (C2).
//!
//! A causal two-state IIR driven by polarity transitions. Coefficients are
//! derived once from a cutoff period `T_cut` and reused for every event.
//!
//! # Derivation
//!
//! ```text
//! omega = 2*pi / T_cut
//! phi   = 2 - cos(omega)
//! alpha = (1 - sin(omega)) / cos(omega)
//! beta  = phi - sqrt(phi*phi - 1)
//! c0 = alpha      c1 = 1 - alpha      c2 = beta      c3 = (1 + beta) / 2
//! ```
//!
//! On event `(polarity)` at pixel state `s`:
//!
//! ```text
//! p   = polarity == 0 ? -1 : +1
//! dp  = scale * (p - s.pbar)
//! L'  = c2 * s.L + c3 * dp
//! pbar' = c0 * s.pbar + c1 * p
//! ```
//!
//! The filter is stable (0 < alpha, beta < 1) when `T_cut > 2*pi`. Cutoffs
//! at or below `2*pi` are accepted as a degenerate-but-not-erroneous input
//! (see `Reconstructor::new`'s documentation), except where `cos(omega)`
//! itself vanishes, which is reported as [`crate::Error::DegenerateCutoff`].

use crate::error::{Error, Result};
use crate::state::PixelState;

/// Precomputed temporal-filter coefficients for a given cutoff period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalFilter {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl TemporalFilter {
    /// Derives filter coefficients from a cutoff period `t_cut`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateCutoff`] if `cos(omega)` is so close to
    /// zero that `alpha` would be undefined (division by a near-zero
    /// value). `t_cut = 2` (used by the reference test suite) is well
    /// away from this singularity and is accepted.
    pub fn new(t_cut: f32) -> Result<Self> {
        let t_cut = t_cut as f64;
        let omega = 2.0 * std::f64::consts::PI / t_cut;
        let cos_omega = omega.cos();
        if cos_omega.abs() < 1e-6 {
            return Err(Error::degenerate_cutoff(t_cut as f32));
        }
        let phi = 2.0 - cos_omega;
        let alpha = (1.0 - omega.sin()) / cos_omega;
        let beta = phi - (phi * phi - 1.0).sqrt();
        Ok(Self {
            c0: alpha as f32,
            c1: (1.0 - alpha) as f32,
            c2: beta as f32,
            c3: (0.5 * (1.0 + beta)) as f32,
        })
    }

    /// Applies the filter to `state` in place for one event of the given
    /// `polarity` (`false` = OFF / -1, `true` = ON / +1).
    ///
    /// The per-pixel `scale` (1.0 when uncalibrated) multiplies the
    /// polarity deviation before it drives `L`, per the RESCALE semantics
    /// in the calibration model.
    #[inline]
    pub fn apply(&self, state: &mut PixelState, polarity: bool) {
        let p: f32 = if polarity { 1.0 } else { -1.0 };
        let dp = state.scale * (p - state.pbar);
        let l = self.c2 * state.l + self.c3 * dp;
        state.pbar = self.c0 * state.pbar + self.c1 * p;
        state.l = l;
    }
}
