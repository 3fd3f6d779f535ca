//! Synthetic test images.

use crate::dims::Size;
use crate::image::ImageBuf;

/// Horizontal ramp from 0 at the left column to 255 at the right.
///
/// Column `x` holds `255 * x / max(1, width - 1)`, truncated.
pub fn gradient(size: Size) -> ImageBuf {
    let span = size.width.saturating_sub(1).max(1);
    ImageBuf::from_fn(size, |x, _| (255 * x as u64 / span as u64) as u8)
}

/// Black and white checkerboard with square cells of `cell` pixels.
///
/// The top-left cell is white. A zero cell size is treated as 1.
pub fn checker(size: Size, cell: u32) -> ImageBuf {
    let cell = cell.max(1);
    ImageBuf::from_fn(size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { 255 } else { 0 }
    })
}
