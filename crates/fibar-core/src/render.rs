//! Rendering the reconstruction state to 8-bit images (C7).
//!
//! Both renderers accept a `stride` (bytes per row, `>= width`) so callers
//! can write directly into a sub-rectangle of a larger image buffer, the
//! same convention the upstream `getImage`/`getActivePixelImage` pair use.

use crate::queue::EventQueue;
use crate::state::StateBuffer;

/// Renders the `l` channel as a min/max-normalized 8-bit grayscale image.
///
/// An empty image or flat input (`max == min`, including the all-zero
/// startup state) renders as all zero bytes rather than dividing by zero.
pub fn intensity_image(state: &StateBuffer, stride: usize) -> Vec<u8> {
    let width = state.width() as usize;
    let height = state.height() as usize;
    debug_assert!(stride >= width);

    let mut img = vec![0u8; stride * height];
    if state.is_empty() {
        return img;
    }

    // `f32::MIN` (the most-negative representable value) is the correct
    // identity for a running max, unlike `f32::MIN_POSITIVE` - using the
    // latter here would make any negative `l` fail to raise `max_l`.
    let mut min_l = f32::MAX;
    let mut max_l = f32::MIN;
    for s in state.as_slice() {
        if s.l > max_l {
            max_l = s.l;
        }
        if s.l < min_l {
            min_l = s.l;
        }
    }

    if max_l <= min_l {
        return img;
    }

    let scale = 255.0 / (max_l - min_l);
    for y in 0..height {
        let row_off = y * stride;
        for x in 0..width {
            let l = state.get(x as u32, y as u32).l;
            img[row_off + x] = ((l - min_l) * scale).round() as u8;
        }
    }
    img
}

/// Renders a heatmap of how many buffered events touch each pixel.
///
/// Counts saturate at `255` per pixel rather than wrapping, since a
/// genuinely hot pixel could otherwise silently roll back to a low count.
pub fn active_pixel_image(state: &StateBuffer, queue: &EventQueue, stride: usize) -> Vec<u8> {
    let height = state.height() as usize;
    debug_assert!(stride >= state.width() as usize);

    let mut img = vec![0u8; stride * height];
    for event in queue.iter() {
        let idx = event.y() as usize * stride + event.x() as usize;
        img[idx] = img[idx].saturating_add(1);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::Event;

    #[test]
    fn test_flat_image_renders_all_zero() {
        let state = StateBuffer::new(4, 4);
        let img = intensity_image(&state, 4);
        assert!(img.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_intensity_image_spans_full_range() {
        let mut state = StateBuffer::new(4, 4);
        state.get_mut(0, 0).l = -1.0;
        state.get_mut(3, 3).l = 1.0;
        let img = intensity_image(&state, 4);
        assert_eq!(img[0], 0);
        assert_eq!(img[15], 255);
    }

    #[test]
    fn test_intensity_image_respects_stride() {
        let mut state = StateBuffer::new(2, 2);
        state.get_mut(0, 0).l = -1.0;
        state.get_mut(1, 1).l = 1.0;
        let img = intensity_image(&state, 5);
        assert_eq!(img.len(), 10);
        // Row 1 starts at byte 5, not 2.
        assert_eq!(img[5 + 1], 255);
    }

    #[test]
    fn test_active_pixel_image_counts_events() {
        let state = StateBuffer::new(4, 4);
        let mut queue = EventQueue::new();
        queue.push(Event::new(2, 1, true));
        queue.push(Event::new(2, 1, false));
        queue.push(Event::new(0, 0, true));
        let img = active_pixel_image(&state, &queue, 4);
        assert_eq!(img[1 * 4 + 2], 2);
        assert_eq!(img[0], 1);
        assert_eq!(img[3 * 4 + 3], 0);
    }

    #[test]
    fn test_active_pixel_image_saturates() {
        let state = StateBuffer::new(2, 2);
        let mut queue = EventQueue::new();
        for _ in 0..300 {
            queue.push(Event::new(0, 0, true));
        }
        let img = active_pixel_image(&state, &queue, 2);
        assert_eq!(img[0], 255);
    }
}
