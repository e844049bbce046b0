//! Error types for the reconstruction core.
//!
//! This module provides a unified error type covering the four failure
//! modes a [`crate::Reconstructor`] can produce: bad construction
//! parameters, out-of-range events, a hot (stuck) pixel detected during
//! queue drain, and a degenerate temporal-filter cutoff.
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive macro for `Display`/`std::error::Error`
//!
//! # Used By
//!
//! - [`crate::reconstructor::Reconstructor`] - construction and ingestion
//! - [`crate::calibration`] - scale-file loading

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the reconstruction core.
///
/// # Categories
///
/// - **Construction**: [`Configuration`](Error::Configuration)
/// - **Ingestion**: [`OutOfBounds`](Error::OutOfBounds), [`HotPixel`](Error::HotPixel)
/// - **Filter setup**: [`DegenerateCutoff`](Error::DegenerateCutoff)
#[derive(Debug, Error)]
pub enum Error {
    /// Construction parameters are invalid: non-positive dimensions,
    /// a tile area that would overflow the 8-bit activity counter, or
    /// a calibration file that could not be read/parsed.
    #[error("invalid reconstructor configuration: {reason}")]
    Configuration {
        /// Human-readable description of the invalid field.
        reason: String,
    },

    /// An ingested event named a pixel outside the configured image
    /// dimensions.
    #[error("event at ({x}, {y}) is out of bounds for a {width}x{height} image")]
    OutOfBounds {
        /// X coordinate that was out of bounds.
        x: u32,
        /// Y coordinate that was out of bounds.
        y: u32,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The queue drain found a pixel or tile whose activity counter was
    /// already zero. This indicates a pixel that is emitting events
    /// faster than the 16-bit `num_events_in_queue` counter (or the
    /// 8-bit tile counter) can track, which in practice means a stuck
    /// ("hot") upstream pixel rather than a bug in the controller.
    #[error(
        "hot pixel detected at ({x}, {y}): activity counter was already zero; \
         mask this pixel out upstream"
    )]
    HotPixel {
        /// X coordinate of the offending pixel.
        x: u32,
        /// Y coordinate of the offending pixel.
        y: u32,
    },

    /// The cutoff period makes `cos(omega)` vanish, which makes `alpha`
    /// undefined (division by zero in the filter-coefficient derivation).
    #[error("degenerate cutoff period {t_cut}: cos(omega) is ~0, filter coefficients undefined")]
    DegenerateCutoff {
        /// The offending cutoff period.
        t_cut: f32,
    },
}

impl Error {
    /// Creates an [`Error::Configuration`] error.
    #[inline]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::HotPixel`] error.
    #[inline]
    pub fn hot_pixel(x: u32, y: u32) -> Self {
        Self::HotPixel { x, y }
    }

    /// Creates an [`Error::DegenerateCutoff`] error.
    #[inline]
    pub fn degenerate_cutoff(t_cut: f32) -> Self {
        Self::DegenerateCutoff { t_cut }
    }

    /// Returns `true` if this is a construction-time configuration error.
    #[inline]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns `true` if this is an out-of-bounds ingestion error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this is a hot-pixel error.
    #[inline]
    pub fn is_hot_pixel_error(&self) -> bool {
        matches!(self, Self::HotPixel { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(700, 10, 640, 480);
        let msg = err.to_string();
        assert!(msg.contains("700"));
        assert!(msg.contains("640x480"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_hot_pixel() {
        let err = Error::hot_pixel(12, 34);
        assert!(err.to_string().contains("(12, 34)"));
        assert!(err.is_hot_pixel_error());
    }

    #[test]
    fn test_configuration() {
        let err = Error::configuration("tile area 256 exceeds max 128");
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn test_degenerate_cutoff() {
        let err = Error::degenerate_cutoff(2.0 * std::f32::consts::PI);
        assert!(!err.is_configuration_error());
        assert!(err.to_string().contains("6.28"));
    }
}
