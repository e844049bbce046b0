//! Tile indexing for the activity controller (C4).
//!
//! Activity is tracked per square tile of `tile_size x tile_size` pixels.
//! Rather than a separate dense tile-counter array, the authoritative
//! active-pixel count for a tile is stored piggybacked on
//! `PixelState::num_pix_active` of the tile's top-left corner pixel (see
//! [`crate::state`] module docs and `DESIGN.md`).
//!
//! [`tile_index`] is the generic form; [`tile_index_pow2`] is a
//! bit-shift specialization for `tile_size == 2`, the only tile size the
//! controller actually uses today, kept distinct because the division in
//! the generic form does not optimize to a shift unless the compiler can
//! prove `tile_size` is a power of two at the call site.

/// Maximum tile area (`tile_size * tile_size`) the 8-bit
/// `num_pix_active` occupancy counter can hold without overflow.
pub const MAX_TILE_AREA: u32 = 1 << 7;

/// Generic tile index: the flat [`crate::state::StateBuffer`] index of
/// the top-left pixel of the tile containing `(ex, ey)`.
///
/// `tile_stride_y` is the number of flat-index columns spanned by one row
/// of tiles, i.e. `width * tile_size`.
#[inline]
pub fn tile_index(ex: u32, ey: u32, tile_size: u32, tile_stride_y: u32) -> usize {
    ((ey / tile_size) * tile_stride_y + (ex / tile_size) * tile_size) as usize
}

/// Specialized tile index for `tile_size == 2`, using shifts/masks in
/// place of division.
#[inline]
pub fn tile_index_pow2(ex: u32, ey: u32, tile_stride_y: u32) -> usize {
    ((ey >> 1) * tile_stride_y + (ex & !1)) as usize
}
