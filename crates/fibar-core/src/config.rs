//! Reconstructor configuration surface.
//!
//! [`ReconstructorConfig`] gathers every knob [`crate::reconstructor::Reconstructor::new`]
//! needs into one validated value, in the spirit of a builder: construct it
//! with [`ReconstructorConfig::new`], adjust it with the `with_*` setters,
//! then hand it to the reconstructor, which re-validates at construction.

use crate::error::{Error, Result};
use crate::queue::MAX_DIMENSION;

/// Spatial blur kernel size used when draining a pixel out of the event
/// window. Only 3x3 and 5x5 binomial kernels are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelSize {
    /// 3x3 binomial-approximation Gaussian.
    Three,
    /// 5x5 binomial-outer-product Gaussian.
    Five,
}

/// Validated construction parameters for a [`crate::reconstructor::Reconstructor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructorConfig {
    width: u32,
    height: u32,
    cutoff_period: f32,
    spatial_enabled: bool,
    tile_size: u32,
    fill_ratio: f64,
    kernel_size: KernelSize,
}

impl ReconstructorConfig {
    /// Creates a configuration for a `width x height` image with temporal
    /// cutoff period `cutoff_period`, spatial blurring and activity-window
    /// tracking enabled, a 2x2 activity tile, 3x3 blur kernel and a
    /// fill-ratio target of `0.5`.
    pub fn new(width: u32, height: u32, cutoff_period: f32) -> Self {
        Self {
            width,
            height,
            cutoff_period,
            spatial_enabled: true,
            tile_size: 2,
            fill_ratio: 0.5,
            kernel_size: KernelSize::Three,
        }
    }

    /// Disables spatial blurring and activity-window tracking entirely:
    /// `event()` becomes a bare per-pixel temporal filter update.
    pub fn without_spatial_filtering(mut self) -> Self {
        self.spatial_enabled = false;
        self
    }

    /// Sets the activity tile edge length in pixels (default `2`).
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Sets the target fill ratio, the fraction of a tile's pixels that
    /// should be simultaneously active (default `0.5`).
    pub fn with_fill_ratio(mut self, fill_ratio: f64) -> Self {
        self.fill_ratio = fill_ratio;
        self
    }

    /// Sets the spatial blur kernel (default [`KernelSize::Three`]).
    pub fn with_kernel_size(mut self, kernel_size: KernelSize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    /// Validates the configuration, producing [`Error::Configuration`] on
    /// the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::configuration(format!(
                "image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(Error::configuration(format!(
                "dimensions {}x{} exceed the {} pixel limit per axis",
                self.width, self.height, MAX_DIMENSION
            )));
        }
        if self.spatial_enabled && self.tile_size == 0 {
            return Err(Error::configuration(
                "tile_size must be at least 1 when spatial filtering is enabled",
            ));
        }
        if !(0.0..=1.0).contains(&self.fill_ratio) {
            return Err(Error::configuration(format!(
                "fill_ratio must be within [0, 1], got {}",
                self.fill_ratio
            )));
        }
        Ok(())
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }
    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Temporal filter cutoff period.
    pub fn cutoff_period(&self) -> f32 {
        self.cutoff_period
    }
    /// Whether spatial blurring and activity tracking are enabled.
    pub fn spatial_enabled(&self) -> bool {
        self.spatial_enabled
    }
    /// Activity tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
    /// Target fill ratio.
    pub fn fill_ratio(&self) -> f64 {
        self.fill_ratio
    }
    /// Configured spatial blur kernel.
    pub fn kernel_size(&self) -> KernelSize {
        self.kernel_size
    }
}
