//! Output dimension resolution.
//!
//! Reproduces the register arithmetic of the scaler's sequencer: the input
//! extent times the Q8.8 scale, bits `[23:8]` of the product, floored to one,
//! then clamped to the core's line-buffer capacity and to the source size.
//! Pure integer math, no allocations.
//!
//! # Example
//!
//! ```
//! use fixscale::{resolve_dims, Scale, Size};
//!
//! let out = resolve_dims(64, 48, Scale::HALF, 32, 32).unwrap();
//! assert_eq!(out, Size::new(32, 24));
//! ```

use core::fmt;

use crate::scale::{FRAC_BITS, Scale};

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels (`width * height`).
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Width of the `extent * scale` product before the `>> 8`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProductWidth {
    /// 32-bit multiply that wraps on overflow, as the sequencer computes it.
    #[default]
    Truncating32,
    /// 64-bit multiply; never overflows for 32-bit operands.
    Wide,
}

/// Dimension resolution error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DimensionError {
    /// Source image has zero width or height.
    InvalidDimensions {
        /// Source width as given.
        width: u32,
        /// Source height as given.
        height: u32,
    },
}

impl fmt::Display for DimensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid source dimensions {width}x{height}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DimensionError {}

/// Resolve output dimensions with the 32-bit truncating product.
///
/// See [`resolve_dims_with`] for the steps.
pub fn resolve_dims(
    img_w: u32,
    img_h: u32,
    scale: Scale,
    hw_max_w: u32,
    hw_max_h: u32,
) -> Result<Size, DimensionError> {
    resolve_dims_with(
        img_w,
        img_h,
        scale,
        Size::new(hw_max_w, hw_max_h),
        ProductWidth::Truncating32,
    )
}

/// Resolve output dimensions for a source of `img_w × img_h`.
///
/// Per axis: `max(1, (extent * scale) >> 8)`, then clamped to the hardware
/// capacity, then to the source extent. The result never upscales. A zero
/// scale resolves to 1×1.
pub fn resolve_dims_with(
    img_w: u32,
    img_h: u32,
    scale: Scale,
    hw_max: Size,
    product: ProductWidth,
) -> Result<Size, DimensionError> {
    if img_w == 0 || img_h == 0 {
        return Err(DimensionError::InvalidDimensions {
            width: img_w,
            height: img_h,
        });
    }

    let out = Size::new(
        resolve_axis(img_w, scale, hw_max.width, product),
        resolve_axis(img_h, scale, hw_max.height, product),
    );
    log::debug!(
        "resolved {img_w}x{img_h} @ {scale} -> {}x{} (capacity {}x{})",
        out.width,
        out.height,
        hw_max.width,
        hw_max.height
    );
    Ok(out)
}

fn resolve_axis(extent: u32, scale: Scale, hw_max: u32, product: ProductWidth) -> u32 {
    let scaled = match product {
        ProductWidth::Truncating32 => extent.wrapping_mul(scale.raw()) >> FRAC_BITS,
        // At most 56 significant bits; the cast back saturates.
        ProductWidth::Wide => {
            let full = (extent as u64 * scale.raw() as u64) >> FRAC_BITS;
            u32::try_from(full).unwrap_or(u32::MAX)
        }
    };
    // A zero capacity still yields one pixel, like a zero scale.
    scaled.max(1).min(hw_max.max(1)).min(extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_scale_halves() {
        assert_eq!(resolve_dims(32, 32, Scale::HALF, 32, 32), Ok(Size::new(16, 16)));
    }

    #[test]
    fn fractional_part_truncates() {
        // 30 * 0.75 = 22.5 -> 22
        assert_eq!(
            resolve_dims(30, 30, Scale::THREE_QUARTERS, 32, 32),
            Ok(Size::new(22, 22))
        );
        // 3 * 0.25 = 0.75 -> 0 -> floored to 1
        assert_eq!(resolve_dims(3, 5, Scale::QUARTER, 32, 32), Ok(Size::new(1, 1)));
    }

    #[test]
    fn zero_scale_floors_to_one() {
        assert_eq!(resolve_dims(16, 16, Scale::ZERO, 32, 32), Ok(Size::new(1, 1)));
    }

    #[test]
    fn hardware_capacity_clamps() {
        assert_eq!(resolve_dims(128, 64, Scale::ONE, 32, 32), Ok(Size::new(32, 32)));
        assert_eq!(resolve_dims(128, 64, Scale::HALF, 48, 16), Ok(Size::new(48, 16)));
    }

    #[test]
    fn never_upscales() {
        let big = Scale::from_raw(0x0400);
        assert_eq!(resolve_dims(8, 4, big, 32, 32), Ok(Size::new(8, 4)));
    }

    #[test]
    fn zero_source_errors() {
        assert_eq!(
            resolve_dims(0, 16, Scale::ONE, 32, 32),
            Err(DimensionError::InvalidDimensions {
                width: 0,
                height: 16
            })
        );
        assert!(resolve_dims(16, 0, Scale::ONE, 32, 32).is_err());
    }

    #[test]
    fn truncating_product_wraps_like_hardware() {
        // 0x0100_0000 * 0x0100 wraps to 0 in 32 bits.
        let w = 0x0100_0000;
        let cap = Size::new(u32::MAX, u32::MAX);
        let narrow = resolve_dims_with(w, 1, Scale::ONE, cap, ProductWidth::Truncating32).unwrap();
        let wide = resolve_dims_with(w, 1, Scale::ONE, cap, ProductWidth::Wide).unwrap();
        assert_eq!(narrow.width, 1);
        assert_eq!(wide.width, w);
    }

    #[test]
    fn bounds_hold_for_supported_scales() {
        for scale in [Scale::ONE, Scale::HALF, Scale::THREE_QUARTERS, Scale::QUARTER] {
            for n in [16u32, 32, 64] {
                let out = resolve_dims(n, n, scale, 32, 32).unwrap();
                assert!(out.width >= 1 && out.height >= 1, "{scale} {n}: {out:?}");
                assert!(out.width <= 32 && out.height <= 32, "{scale} {n}: {out:?}");
                assert!(out.width <= n && out.height <= n, "{scale} {n}: {out:?}");
            }
        }
    }
}
