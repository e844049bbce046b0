//! Per-pixel state storage.
//!
//! This module provides [`PixelState`] - the fixed-size record tracked for
//! every pixel - and [`StateBuffer`], the flat row-major array that owns
//! one `PixelState` per pixel.
//!
//! # Memory Layout
//!
//! States are stored in a single contiguous `Vec<PixelState>` in row-major
//! order, top-to-bottom, matching how [`crate::Reconstructor`] addresses
//! pixels:
//!
//! ```text
//! index = y * width + x
//! ```
//!
//! # Overloaded tile field
//!
//! `num_pix_active` on most cells is unused filler; on the cell that is the
//! top-left corner of a tile, it is the authoritative count of active
//! pixels within that tile (see [`crate::tile`]). This overload is
//! preserved from the source implementation rather than split into a
//! separate dense tile-counter array (see `DESIGN.md` for the tradeoff).

/// Per-pixel reconstruction state.
///
/// # Fields
///
/// - `l` - filtered log-intensity, the reconstructed image value
/// - `pbar` - polarity EMA driving the temporal filter
/// - `num_events_in_queue` - how many of this pixel's events are currently
///   buffered in the event queue; `> 0` means the pixel is *active*
/// - `num_pix_active` - overloaded tile-occupancy counter (see module docs)
/// - `scale` - per-pixel calibration gain, `1.0` when no calibration is loaded
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct PixelState {
    /// Filtered log-intensity.
    pub l: f32,
    /// Polarity exponential moving average.
    pub pbar: f32,
    /// Number of this pixel's events currently in the event queue.
    pub num_events_in_queue: u16,
    /// Overloaded: tile active-pixel count on a tile's top-left cell.
    pub num_pix_active: u8,
    /// Per-pixel calibration gain (1.0 when uncalibrated).
    pub scale: f32,
}

impl Default for PixelState {
    fn default() -> Self {
        Self {
            l: 0.0,
            pbar: 0.0,
            num_events_in_queue: 0,
            num_pix_active: 0,
            scale: 1.0,
        }
    }
}

impl PixelState {
    /// Returns `true` iff this pixel is active, i.e. has at least one of
    /// its events currently buffered in the event queue.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.num_events_in_queue > 0
    }
}

/// Flat row-major array of [`PixelState`], one entry per pixel.
///
/// Owns the only allocation the reconstruction core performs for pixel
/// data: a single contiguous `Vec<PixelState>` sized `width * height` at
/// construction, matching the allocation model in section 5 of the spec
/// (one contiguous array, no reallocation on the hot path).
#[derive(Debug, Clone)]
pub struct StateBuffer {
    states: Vec<PixelState>,
    width: u32,
    height: u32,
}

impl StateBuffer {
    /// Creates a buffer of `width * height` pixels, all in their default
    /// (zeroed, `scale = 1.0`) state.
    pub fn new(width: u32, height: u32) -> Self {
        let count = width as usize * height as usize;
        Self {
            states: vec![PixelState::default(); count],
            width,
            height,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if the buffer has zero pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Row-major flat index for pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns `true` if `(x, y)` lies within the buffer's bounds.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Immutable view of the whole state array.
    #[inline]
    pub fn as_slice(&self) -> &[PixelState] {
        &self.states
    }

    /// Mutable view of the whole state array.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [PixelState] {
        &mut self.states
    }

    /// Gets the state at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> PixelState {
        self.states[self.index(x, y)]
    }

    /// Gets a mutable reference to the state at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut PixelState {
        let idx = self.index(x, y);
        &mut self.states[idx]
    }

    /// Gets the state at a precomputed flat index, e.g. one produced by
    /// [`crate::tile::tile_index`].
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[inline]
    pub fn get_at(&self, idx: usize) -> PixelState {
        self.states[idx]
    }

    /// Gets a mutable reference to the state at a precomputed flat index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[inline]
    pub fn get_mut_at(&mut self, idx: usize) -> &mut PixelState {
        &mut self.states[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_zeroed() {
        let s = PixelState::default();
        assert_eq!(s.l, 0.0);
        assert_eq!(s.pbar, 0.0);
        assert_eq!(s.num_events_in_queue, 0);
        assert_eq!(s.num_pix_active, 0);
        assert_eq!(s.scale, 1.0);
        assert!(!s.is_active());
    }

    #[test]
    fn test_buffer_new() {
        let buf = StateBuffer::new(640, 480);
        assert_eq!(buf.width(), 640);
        assert_eq!(buf.height(), 480);
        assert_eq!(buf.len(), 640 * 480);
    }

    #[test]
    fn test_buffer_index() {
        let buf = StateBuffer::new(640, 480);
        assert_eq!(buf.index(0, 0), 0);
        assert_eq!(buf.index(639, 0), 639);
        assert_eq!(buf.index(0, 1), 640);
        assert_eq!(buf.index(320, 240), 240 * 640 + 320);
    }

    #[test]
    fn test_buffer_get_set() {
        let mut buf = StateBuffer::new(10, 10);
        buf.get_mut(5, 5).l = 1.5;
        assert_eq!(buf.get(5, 5).l, 1.5);
        assert_eq!(buf.get(0, 0).l, 0.0);
    }

    #[test]
    fn test_buffer_get_at_matches_get() {
        let mut buf = StateBuffer::new(10, 10);
        buf.get_mut(3, 4).l = 9.0;
        let idx = buf.index(3, 4);
        assert_eq!(buf.get_at(idx).l, 9.0);
        buf.get_mut_at(idx).l = 11.0;
        assert_eq!(buf.get(3, 4).l, 11.0);
    }

    #[test]
    fn test_buffer_contains() {
        let buf = StateBuffer::new(10, 10);
        assert!(buf.contains(9, 9));
        assert!(!buf.contains(10, 5));
        assert!(!buf.contains(5, 10));
    }
}
