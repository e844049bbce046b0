//! Top-level reconstructor: ties the temporal filter, spatial filter,
//! tile occupancy and activity controller together into the single
//! public entry point for event ingestion.
//!
//! # Runtime dispatch
//!
//! The reference implementation this module is ported from used compile-time
//! template parameters (`filter_spatially: bool`, `tile_size: u8`) to
//! specialize the reconstructor. Here `spatial_enabled` is a runtime field
//! and [`Reconstructor::event`] branches on it once per call; tile size is
//! likewise a runtime value, with a bit-shift fast path when it is `2`
//! (see [`crate::tile`]). A single branch per event is not worth paying
//! monomorphization and API-surface cost to avoid.

use tracing::{debug, trace};

use std::path::Path;

use crate::calibration::{self, CalibrationStats};
use crate::config::{KernelSize, ReconstructorConfig};
use crate::controller::ActivityController;
use crate::error::{Error, Result};
use crate::queue::{Event, EventQueue};
use crate::render;
use crate::spatial::{self, Kernel};
use crate::state::StateBuffer;
use crate::temporal::TemporalFilter;
use crate::tile::{tile_index, tile_index_pow2};

/// Event-camera log-intensity image reconstructor.
///
/// Owns one contiguous [`StateBuffer`] allocated at construction and never
/// reallocated; ingesting events mutates it in place. Not thread-safe -
/// wrap in a mutex or give each thread its own reconstructor over a
/// disjoint pixel range if concurrent ingestion is needed.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    state: StateBuffer,
    filter: TemporalFilter,
    queue: EventQueue,
    controller: ActivityController,
    spatial_enabled: bool,
    tile_size: u32,
    tile_stride_y: u32,
    kernel_size: KernelSize,
}

impl Reconstructor {
    /// Builds a reconstructor from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `config` fails validation or if
    /// the activity tile area would overflow the occupancy counter, and
    /// [`Error::DegenerateCutoff`] if the cutoff period makes the temporal
    /// filter's coefficients undefined.
    pub fn new(config: ReconstructorConfig) -> Result<Self> {
        config.validate()?;

        let width = config.width();
        let height = config.height();
        let tile_size = if config.spatial_enabled() {
            config.tile_size()
        } else {
            1
        };

        let filter = TemporalFilter::new(config.cutoff_period())?;
        let controller = ActivityController::new(tile_size, config.fill_ratio(), width, height)?;

        debug!(
            width,
            height,
            cutoff_period = config.cutoff_period(),
            spatial_enabled = config.spatial_enabled(),
            tile_size,
            "constructed reconstructor"
        );

        Ok(Self {
            state: StateBuffer::new(width, height),
            filter,
            queue: EventQueue::new(),
            controller,
            spatial_enabled: config.spatial_enabled(),
            tile_size,
            tile_stride_y: width * tile_size,
            kernel_size: config.kernel_size(),
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.state.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.state.height()
    }

    /// Read-only view of the per-pixel reconstruction state.
    pub fn state(&self) -> &StateBuffer {
        &self.state
    }

    /// Number of events currently buffered in the adaptive window.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Current event-window fill ratio, or `-1.0` if no tile is occupied.
    pub fn fill_ratio(&self) -> f64 {
        self.controller.current_fill_ratio()
    }

    /// Current size of the adaptive event window.
    pub fn event_window_size(&self) -> u64 {
        self.controller.event_window_size()
    }

    /// Ingests one event at pixel `(ex, ey)` with timestamp `t` (carried
    /// for API parity with the upstream event stream; ordering, not the
    /// timestamp value, is what drives the filters).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `(ex, ey)` lies outside the
    /// configured image, and [`Error::HotPixel`] if draining the window
    /// finds a pixel or tile whose activity counter was already zero -
    /// a sign of a stuck upstream pixel, not a bug in this reconstructor.
    pub fn event(&mut self, t: u32, ex: u32, ey: u32, polarity: bool) -> Result<()> {
        let (width, height) = (self.state.width(), self.state.height());
        if !self.state.contains(ex, ey) {
            return Err(Error::out_of_bounds(ex, ey, width, height));
        }

        trace!(t, ex, ey, polarity, "event");

        let filter = self.filter;
        filter.apply(self.state.get_mut(ex, ey), polarity);

        if !self.spatial_enabled {
            return Ok(());
        }

        let was_inactive = !self.state.get(ex, ey).is_active();
        if was_inactive {
            let idx = self.tile_idx(ex, ey);
            let tile_was_empty = self.state.get_at(idx).num_pix_active == 0;
            self.controller.note_pixel_activated(tile_was_empty);
            self.state.get_mut_at(idx).num_pix_active += 1;
        }

        self.state.get_mut(ex, ey).num_events_in_queue += 1;
        self.queue.push(Event::new(ex as u16, ey as u16, polarity));

        self.drain_queue()
    }

    #[inline]
    fn tile_idx(&self, ex: u32, ey: u32) -> usize {
        if self.tile_size == 2 {
            tile_index_pow2(ex, ey, self.tile_stride_y)
        } else {
            tile_index(ex, ey, self.tile_size, self.tile_stride_y)
        }
    }

    fn drain_queue(&mut self) -> Result<()> {
        while self.queue.len() as u64 > self.controller.event_window_size() {
            let e = *self
                .queue
                .front()
                .expect("queue.len() > 0 was just checked");
            let (ex, ey) = (e.x() as u32, e.y() as u32);

            if !self.state.get(ex, ey).is_active() {
                return Err(Error::hot_pixel(ex, ey));
            }
            self.state.get_mut(ex, ey).num_events_in_queue -= 1;

            if !self.state.get(ex, ey).is_active() {
                let blurred = match self.kernel_size {
                    KernelSize::Three => {
                        spatial::convolve_3x3(&self.state, ex, ey, &Kernel::GAUSSIAN_3X3)
                    }
                    KernelSize::Five => {
                        spatial::convolve(&self.state, ex, ey, &Kernel::GAUSSIAN_5X5)
                    }
                };
                *self.state.get_mut(ex, ey) = blurred;

                let idx = self.tile_idx(ex, ey);
                if self.state.get_at(idx).num_pix_active == 0 {
                    return Err(Error::hot_pixel(ex, ey));
                }
                self.state.get_mut_at(idx).num_pix_active -= 1;
                let tile_now_empty = self.state.get_at(idx).num_pix_active == 0;
                self.controller.note_pixel_deactivated(tile_now_empty);
            }

            self.queue.pop_front();
        }
        self.controller.adjust_window();
        Ok(())
    }

    /// Renders the current `l` channel as a min/max-normalized 8-bit
    /// grayscale image with the given row stride in bytes.
    pub fn to_intensity_image(&self, stride: usize) -> Vec<u8> {
        render::intensity_image(&self.state, stride)
    }

    /// Renders a heatmap of how many buffered events touch each pixel,
    /// with the given row stride in bytes.
    pub fn to_active_pixel_image(&self, stride: usize) -> Vec<u8> {
        render::active_pixel_image(&self.state, &self.queue, stride)
    }

    /// Loads a per-pixel calibration scale file, see [`crate::calibration`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on any read or parse failure.
    pub fn load_scale_file(&mut self, path: impl AsRef<Path>) -> Result<CalibrationStats> {
        calibration::load_scale_file(path, &mut self.state)
    }
}
