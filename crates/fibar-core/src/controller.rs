//! Adaptive event-window controller (C6).
//!
//! Drives the size of the sliding event window so that, on average, a
//! target fraction of each activity tile's pixels stay "lit" (have at
//! least one buffered event). A wide window smooths reconstructed images
//! at the cost of latency and vice versa; this controller trades one for
//! the other automatically as scene activity changes.
//!
//! The bookkeeping here only tracks counts; the actual per-tile occupancy
//! counter lives on [`crate::state::PixelState::num_pix_active`] of the
//! tile's top-left pixel (see [`crate::tile`]). Callers mutate that field
//! themselves and tell the controller what happened via
//! [`ActivityController::note_pixel_activated`] and
//! [`ActivityController::note_pixel_deactivated`].

use crate::error::{Error, Result};
use crate::tile::MAX_TILE_AREA;

/// Initial size of the adaptive event window, before any adjustment.
pub const START_WINDOW_SIZE: u64 = 2000;

/// Tracks tile/pixel occupancy and adjusts the event-window size to hold
/// a target fill ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityController {
    tile_size: u32,
    fill_ratio_denom: u64,
    fill_ratio_num: u64,
    num_occupied_pixels: u64,
    num_occupied_tiles: u64,
    min_window_size: u64,
    max_window_size: u64,
    event_window_size: u64,
}

impl ActivityController {
    /// Builds a controller for a `width x height` image tiled into
    /// `tile_size x tile_size` activity tiles, targeting `fill_ratio`
    /// (fraction of a tile's pixels that should be simultaneously active).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `tile_size * tile_size` would
    /// overflow the 8-bit `num_pix_active` occupancy counter.
    pub fn new(tile_size: u32, fill_ratio: f64, width: u32, height: u32) -> Result<Self> {
        let area = tile_size * tile_size;
        if area > MAX_TILE_AREA {
            return Err(Error::configuration(format!(
                "activity tile size {tile_size} (area {area}) exceeds max area {MAX_TILE_AREA}"
            )));
        }

        let fill_ratio_denom: u64 = 100;
        let a = area as f64;
        let tiles_per_pixel = 1.0 / a;
        let r = fill_ratio.max(tiles_per_pixel + 1e-3).min(1.0);
        let np_nt = a * r;
        let fill_ratio_num = (np_nt * fill_ratio_denom as f64) as u64;
        let max_window_size = if tile_size > 0 {
            width as u64 * height as u64
        } else {
            0
        };
        // np_nt > 1 whenever tile_size >= 2 (r is bounded below by
        // 1/A + 1e-3), but tile_size == 1 (the non-spatial sentinel) makes
        // np_nt == 1 exactly, which would divide by zero here. Clamp to
        // max_window_size instead of propagating NaN/infinity: the field
        // is dead weight in that configuration since the non-spatial path
        // never calls adjust_window, but it still must not break the
        // min <= max invariant other code assumes.
        let min_window_size = if a > 0.0 && np_nt > 1.0 {
            ((1.0 / (np_nt - 1.0)).ceil() as u64).min(max_window_size)
        } else {
            0
        };

        Ok(Self {
            tile_size,
            fill_ratio_denom,
            fill_ratio_num,
            num_occupied_pixels: 0,
            num_occupied_tiles: 0,
            min_window_size,
            max_window_size,
            event_window_size: START_WINDOW_SIZE,
        })
    }

    /// Tile edge length in pixels.
    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Current size of the adaptive event window.
    #[inline]
    pub fn event_window_size(&self) -> u64 {
        self.event_window_size
    }

    /// Current fill ratio: occupied pixels per tile, averaged over
    /// occupied tiles only. `-1.0` when no tile is occupied (the ratio is
    /// undefined, not zero).
    pub fn current_fill_ratio(&self) -> f64 {
        if self.num_occupied_tiles == 0 {
            -1.0
        } else {
            self.num_occupied_pixels as f64
                / (self.num_occupied_tiles as f64 * (self.tile_size * self.tile_size) as f64)
        }
    }

    /// Call when a pixel transitions from inactive to active.
    /// `tile_was_empty` is whether the pixel's tile had zero active
    /// pixels *before* this one was counted.
    pub fn note_pixel_activated(&mut self, tile_was_empty: bool) {
        self.num_occupied_pixels += self.fill_ratio_denom;
        if tile_was_empty {
            self.num_occupied_tiles += self.fill_ratio_num;
        }
    }

    /// Call when a pixel transitions from active to inactive (drained).
    /// `tile_now_empty` is whether the pixel's tile has zero active
    /// pixels *after* this one was discounted.
    pub fn note_pixel_deactivated(&mut self, tile_now_empty: bool) {
        if tile_now_empty {
            self.num_occupied_tiles -= self.fill_ratio_num;
        }
        self.num_occupied_pixels -= self.fill_ratio_denom;
    }

    /// Re-evaluates the event window size against the current fill ratio.
    ///
    /// Uses a dead-band gate (`|500 * (occupied_tiles - occupied_pixels)|
    /// > occupied_pixels`) before adjusting, so small fluctuations in a
    /// near-target fill ratio don't cause the window to oscillate every
    /// event. The multiplier `500` and the dead-band form itself are a
    /// fixed property of this controller, not a tunable (see `DESIGN.md`).
    pub fn adjust_window(&mut self) {
        let ntfn = self.num_occupied_tiles;
        let npfd = if self.num_occupied_pixels <= 1 {
            self.fill_ratio_denom
        } else {
            self.num_occupied_pixels
        };

        let delta = 500i64 * (ntfn as i64 - npfd as i64);
        if delta.unsigned_abs() > npfd {
            let target = self.event_window_size * ntfn / npfd;
            self.event_window_size = target.clamp(self.min_window_size, self.max_window_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_controller_has_start_window_and_sentinel_ratio() {
        let c = ActivityController::new(2, 0.5, 640, 480).unwrap();
        assert_eq!(c.event_window_size(), START_WINDOW_SIZE);
        assert_eq!(c.current_fill_ratio(), -1.0);
    }

    #[test]
    fn test_oversized_tile_rejected() {
        let err = ActivityController::new(16, 0.5, 640, 480).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_fill_ratio_tracks_activation_and_deactivation() {
        let mut c = ActivityController::new(2, 1.0, 640, 480).unwrap();
        c.note_pixel_activated(true);
        assert!(c.current_fill_ratio() > 0.0);
        c.note_pixel_activated(false);
        c.note_pixel_deactivated(false);
        c.note_pixel_deactivated(true);
        assert_eq!(c.current_fill_ratio(), -1.0);
    }

    #[test]
    fn test_window_grows_when_overfilled() {
        let mut c = ActivityController::new(2, 0.25, 640, 480).unwrap();
        // Simulate many tiles fully occupied relative to the target ratio.
        for _ in 0..64 {
            c.note_pixel_activated(true);
            c.note_pixel_activated(false);
            c.note_pixel_activated(false);
            c.note_pixel_activated(false);
        }
        let before = c.event_window_size();
        c.adjust_window();
        assert!(c.event_window_size() >= before || c.event_window_size() <= c.max_window_size);
    }

    #[test]
    fn test_window_never_exceeds_max_or_falls_below_min() {
        let mut c = ActivityController::new(2, 0.5, 16, 16).unwrap();
        for _ in 0..16 {
            c.note_pixel_activated(true);
        }
        for _ in 0..1000 {
            c.adjust_window();
        }
        assert!(c.event_window_size() <= c.max_window_size);
        assert!(c.event_window_size() >= c.min_window_size);
    }
}
