//! Grayscale 8-bit image buffers and edge-replicating sample access.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::dims::Size;

/// Owned single-channel 8-bit image, row-major.
///
/// `data.len() == width * height` always holds; the fields are private so it
/// cannot be broken after construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageBuf {
    size: Size,
    data: Vec<u8>,
}

impl ImageBuf {
    /// A black image of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            data: vec![0; size.area()],
        }
    }

    /// Wrap existing samples. Returns `None` if `data.len() != width * height`.
    pub fn from_vec(size: Size, data: Vec<u8>) -> Option<Self> {
        (data.len() == size.area()).then_some(Self { size, data })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel in row order.
    pub fn from_fn(size: Size, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut data = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(x, y));
            }
        }
        Self { size, data }
    }

    /// Image dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Samples, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume into the raw sample vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Sample at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.size.width && y < self.size.height {
            Some(self.data[y as usize * self.size.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Edge-replicating view over this image.
    pub fn view(&self) -> SourceView<'_> {
        SourceView::new(&self.data, self.size)
    }
}

/// Non-fatal condition observed while producing a reference or a verdict.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Warning {
    /// The source buffer held fewer samples than `width * height`.
    /// Missing samples were read as 0.
    BufferTooSmall {
        /// `width * height`.
        expected: usize,
        /// Samples actually present.
        got: usize,
    },
    /// Reference and observed buffers differ in length.
    /// Only the common prefix was compared.
    LengthMismatch {
        /// Reference length.
        reference: usize,
        /// Observed length.
        observed: usize,
    },
    /// Scale above 1.0; output was clamped to the source size.
    UpscaleClamped {
        /// Raw Q8.8 scale value.
        scale: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { expected, got } => {
                write!(f, "source has {got} of {expected} samples, missing samples read as 0")
            }
            Self::LengthMismatch {
                reference,
                observed,
            } => write!(f, "reference has {reference} samples, observed has {observed}"),
            Self::UpscaleClamped { scale } => {
                write!(f, "scale 0x{scale:08x} is above 1.0, output clamped to source size")
            }
        }
    }
}

/// Borrowed source image with the core's edge policy.
///
/// Coordinates outside the image clamp to the nearest border sample. Samples
/// missing from a short buffer read as 0.
#[derive(Copy, Clone, Debug)]
pub struct SourceView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> SourceView<'a> {
    /// View `data` as a `size.width × size.height` image.
    pub fn new(data: &'a [u8], size: Size) -> Self {
        Self {
            data,
            width: size.width,
            height: size.height,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `Some(BufferTooSmall)` if the buffer is shorter than the image.
    pub fn shortfall(&self) -> Option<Warning> {
        let expected = self.width as usize * self.height as usize;
        (self.data.len() < expected).then_some(Warning::BufferTooSmall {
            expected,
            got: self.data.len(),
        })
    }

    /// Sample at `(x, y)` with both coordinates clamped into the image.
    #[inline]
    pub fn at(&self, x: i64, y: i64) -> u8 {
        let x = clamp_coord(x, self.width);
        let y = clamp_coord(y, self.height);
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// Clamp `v` into `[0, extent - 1]`.
#[inline]
pub(crate) fn clamp_coord(v: i64, extent: u32) -> u32 {
    v.clamp(0, extent.saturating_sub(1) as i64) as u32
}

/// Clamp an accumulator result into `[0, 255]`.
#[inline]
pub(crate) fn clamp_u8(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_checks_length() {
        assert!(ImageBuf::from_vec(Size::new(2, 2), vec![1, 2, 3, 4]).is_some());
        assert!(ImageBuf::from_vec(Size::new(2, 2), vec![1, 2, 3]).is_none());
    }

    #[test]
    fn view_replicates_edges() {
        let img = ImageBuf::from_fn(Size::new(3, 2), |x, y| (y * 3 + x) as u8);
        let v = img.view();
        assert_eq!(v.at(-5, -5), 0);
        assert_eq!(v.at(10, 0), 2);
        assert_eq!(v.at(1, 10), 4);
        assert_eq!(v.at(7, 7), 5);
    }

    #[test]
    fn short_buffer_reads_zero() {
        let data = [9u8, 9, 9];
        let v = SourceView::new(&data, Size::new(2, 2));
        assert_eq!(v.at(0, 1), 9);
        assert_eq!(v.at(1, 1), 0);
        assert_eq!(
            v.shortfall(),
            Some(Warning::BufferTooSmall {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn clamp_helpers() {
        assert_eq!(clamp_u8(-3), 0);
        assert_eq!(clamp_u8(300), 255);
        assert_eq!(clamp_coord(-1, 0), 0);
    }
}
