//! Spatial Gaussian filter (C3).
//!
//! Blurs the `l` field of a single pixel using a small, fixed convolution
//! kernel, leaving `pbar`, `num_pix_active`, `num_events_in_queue` and
//! `scale` untouched (they belong to the pixel, not its intensity).
//!
//! Boundary policy: the kernel is summed only over in-bounds neighbours and
//! the result is **not** renormalized, so boundary pixels receive a
//! slightly dampened `l`. This is a deliberate cost of the fast path, not a
//! bug - see `DESIGN.md`.
//!
//! # Bit-identical fast path
//!
//! [`convolve_3x3`] is a specialized hot-path implementation for the 3x3
//! kernel with nine explicit boundary cases (interior + 4 edges + 4
//! corners). It accumulates terms in the same row-major order
//! (top-left, top, top-right, left, centre, right, bottom-left, bottom,
//! bottom-right, skipping any that are out of bounds) as the generic
//! [`convolve`] path, so the two are bit-identical for the same inputs -
//! floating point addition is not associative, so the ordering is load
//! bearing here, not incidental.

use crate::state::{PixelState, StateBuffer};

/// A square, compile-time-sized convolution kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel<const N: usize> {
    /// Kernel weights, indexed `[row][col]` (row = vertical offset).
    pub weights: [[f32; N]; N],
}

impl Kernel<3> {
    /// The 3x3 binomial-approximation Gaussian kernel, weights sum to 1.
    pub const GAUSSIAN_3X3: Self = Kernel {
        weights: [
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
            [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        ],
    };
}

impl Kernel<5> {
    /// The 5x5 binomial-outer-product Gaussian kernel, weights sum to 1.
    pub const GAUSSIAN_5X5: Self = Kernel {
        weights: [
            [0.003663, 0.01465201, 0.02564103, 0.01465201, 0.003663],
            [0.01465201, 0.05860806, 0.0952381, 0.05860806, 0.01465201],
            [0.02564103, 0.0952381, 0.15018315, 0.0952381, 0.02564103],
            [0.01465201, 0.05860806, 0.0952381, 0.05860806, 0.01465201],
            [0.003663, 0.01465201, 0.02564103, 0.01465201, 0.003663],
        ],
    };
}

/// Generic N x N spatial filter at a single pixel.
///
/// Returns a replacement [`PixelState`] whose `l` is the (unnormalized,
/// boundary-truncated) convolution and whose other fields are copied
/// unchanged from the centre pixel.
///
/// # Panics
///
/// Panics if `(x, y)` is out of bounds for `states`.
pub fn convolve<const N: usize>(states: &StateBuffer, x: u32, y: u32, kernel: &Kernel<N>) -> PixelState {
    debug_assert!(states.contains(x, y));
    let center = states.get(x, y);
    let w = (N / 2) as i64;
    let width = states.width() as i64;
    let height = states.height() as i64;

    let mut sum = 0.0f32;
    for (ky, row) in kernel.weights.iter().enumerate() {
        let iy = y as i64 + ky as i64 - w;
        if iy < 0 || iy >= height {
            continue;
        }
        for (kx, &weight) in row.iter().enumerate() {
            let ix = x as i64 + kx as i64 - w;
            if ix < 0 || ix >= width {
                continue;
            }
            sum += states.get(ix as u32, iy as u32).l * weight;
        }
    }

    PixelState { l: sum, ..center }
}

/// Specialized 3x3 spatial filter, bit-identical to
/// `convolve(states, x, y, &Kernel::GAUSSIAN_3X3)` but without the
/// per-neighbour bounds branch in the hot path.
///
/// # Panics
///
/// Panics if `(x, y)` is out of bounds for `states`.
pub fn convolve_3x3(states: &StateBuffer, x: u32, y: u32, kernel: &Kernel<3>) -> PixelState {
    debug_assert!(states.contains(x, y));
    let center = states.get(x, y);
    let width = states.width();
    let height = states.height();
    let k = &kernel.weights;

    let has_left = x > 0;
    let has_right = x + 1 < width;
    let has_top = y > 0;
    let has_bottom = y + 1 < height;

    let l = |dx: i32, dy: i32| -> f32 {
        states
            .get((x as i32 + dx) as u32, (y as i32 + dy) as u32)
            .l
    };

    let mut sum = 0.0f32;
    // Top row.
    if has_top {
        if has_left {
            sum += l(-1, -1) * k[0][0];
        }
        sum += l(0, -1) * k[0][1];
        if has_right {
            sum += l(1, -1) * k[0][2];
        }
    }
    // Middle row.
    if has_left {
        sum += l(-1, 0) * k[1][0];
    }
    sum += center.l * k[1][1];
    if has_right {
        sum += l(1, 0) * k[1][2];
    }
    // Bottom row.
    if has_bottom {
        if has_left {
            sum += l(-1, 1) * k[2][0];
        }
        sum += l(0, 1) * k[2][1];
        if has_right {
            sum += l(1, 1) * k[2][2];
        }
    }

    PixelState { l: sum, ..center }
}
