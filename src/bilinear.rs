//! Q8.8 fixed-point bilinear downscaling.
//!
//! Two coordinate paths feed the same integer kernel:
//!
//! - [`resample`] maps output centers to source coordinates in floating point
//!   (`(o + 0.5) / scale - 0.5`) and quantizes the fraction to a Q8.8 weight
//!   with round-half-up.
//! - [`resample_reciprocal`] maps them entirely in Q8.8 integers through the
//!   truncated reciprocal `65536 / scale`, taking the weight as the low byte.
//!
//! Both blend with `(Σ I·wx·wy + 2^15) >> 16`, the rounding the pipeline
//! performs. Truncating or round-half-even variants disagree on boundary
//! fractions and would be reported as mismatches.

use alloc::vec::Vec;

use num_traits::Float;

use crate::dims::Size;
use crate::image::{ImageBuf, SourceView, clamp_coord, clamp_u8};
use crate::scale::{ONE_Q, Scale};

const HALF_Q: i64 = (ONE_Q / 2) as i64;
const ROUND_BIAS: i64 = 1 << 15;

/// Sampling positions and Q8.8 weights for one output pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tap {
    /// Output column.
    pub xo: u32,
    /// Output row.
    pub yo: u32,
    /// Left source column, clamped.
    pub x0: u32,
    /// Top source row, clamped.
    pub y0: u32,
    /// Right source column (`x0 + 1`, replicated at the last column).
    pub x1: u32,
    /// Bottom source row (`y0 + 1`, replicated at the last row).
    pub y1: u32,
    /// Horizontal weight of `x1`, 0..=255.
    pub tx_q: i32,
    /// Vertical weight of `y1`, 0..=255.
    pub ty_q: i32,
}

/// Positions and weights along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct AxisTap {
    i0: u32,
    i1: u32,
    t_q: i32,
}

/// Coordinate mapping of a bilinear core revision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mapping {
    /// Floating-point centers, weight rounded from the fraction.
    Float,
    /// Q8.8 centers through the integer reciprocal, weight = low byte.
    Reciprocal,
}

impl Mapping {
    fn axis(self, o: u32, scale: Scale, extent: u32) -> AxisTap {
        match self {
            Self::Float => float_axis(o, scale, extent),
            Self::Reciprocal => reciprocal_axis(o, scale.reciprocal(), extent),
        }
    }
}

fn float_axis(o: u32, scale: Scale, extent: u32) -> AxisTap {
    // Zero scale resolves to a 1x1 output; map it as identity instead of dividing by zero.
    let ratio = if scale.is_zero() { 1.0 } else { scale.to_f64() };
    let s = (o as f64 + 0.5) / ratio - 0.5;
    let i0 = clamp_coord(Float::floor(s) as i64, extent);
    let i1 = (i0 + 1).min(extent.saturating_sub(1));
    // Fraction is measured from the clamped position, as the core does.
    let t = s - i0 as f64;
    let t_q = (Float::floor(t * ONE_Q as f64 + 0.5) as i64).clamp(0, 255) as i32;
    AxisTap { i0, i1, t_q }
}

fn reciprocal_axis(o: u32, inv_q: u32, extent: u32) -> AxisTap {
    let o_q = ((o as i64) << 8) + HALF_Q;
    let s_q = ((o_q * inv_q as i64) >> 8) - HALF_Q;
    // Arithmetic shift: negative positions floor toward -1 and then clamp.
    let i0 = clamp_coord(s_q >> 8, extent);
    let i1 = (i0 + 1).min(extent.saturating_sub(1));
    AxisTap {
        i0,
        i1,
        t_q: (s_q & 0xFF) as i32,
    }
}

/// The four-tap kernel: `(Σ I·wx·wy + 2^15) >> 16`, clamped to a byte.
///
/// `tx_q` and `ty_q` are the Q8.8 weights of the right and bottom neighbours.
///
/// ```
/// // Equal weights on [0, 255, 255, 0] round half up to 128.
/// assert_eq!(fixscale::bilinear::blend(0, 255, 255, 0, 128, 128), 128);
/// ```
pub fn blend(i00: u8, i10: u8, i01: u8, i11: u8, tx_q: i32, ty_q: i32) -> u8 {
    let tx = tx_q as i64;
    let ty = ty_q as i64;
    let wx0 = ONE_Q as i64 - tx;
    let wy0 = ONE_Q as i64 - ty;
    let acc = i00 as i64 * wx0 * wy0
        + i10 as i64 * tx * wy0
        + i01 as i64 * wx0 * ty
        + i11 as i64 * tx * ty;
    clamp_u8((acc + ROUND_BIAS) >> 16)
}

/// Floating-point-mapped bilinear downscale of `src` to `out`.
///
/// `src` is read through a [`SourceView`], so a short buffer reads as zeros
/// past its end instead of panicking.
pub fn resample(src: SourceView<'_>, out: Size, scale: Scale) -> ImageBuf {
    run(src, out, scale, Mapping::Float)
}

/// Integer-reciprocal-mapped bilinear downscale of `src` to `out`.
pub fn resample_reciprocal(src: SourceView<'_>, out: Size, scale: Scale) -> ImageBuf {
    run(src, out, scale, Mapping::Reciprocal)
}

fn run(src: SourceView<'_>, out: Size, scale: Scale, mapping: Mapping) -> ImageBuf {
    // Taps depend on one coordinate only; compute each axis once.
    let cols: Vec<AxisTap> = (0..out.width)
        .map(|xo| mapping.axis(xo, scale, src.width()))
        .collect();
    let rows: Vec<AxisTap> = (0..out.height)
        .map(|yo| mapping.axis(yo, scale, src.height()))
        .collect();
    ImageBuf::from_fn(out, |xo, yo| {
        let c = cols[xo as usize];
        let r = rows[yo as usize];
        let (x0, x1, y0, y1) = (c.i0 as i64, c.i1 as i64, r.i0 as i64, r.i1 as i64);
        blend(
            src.at(x0, y0),
            src.at(x1, y0),
            src.at(x0, y1),
            src.at(x1, y1),
            c.t_q,
            r.t_q,
        )
    })
}

/// Per-pixel sampling taps in output row order, for generating kernel-level
/// test cases.
pub fn taps(src_size: Size, out: Size, scale: Scale, reciprocal: bool) -> Vec<Tap> {
    let mapping = if reciprocal {
        Mapping::Reciprocal
    } else {
        Mapping::Float
    };
    let mut taps = Vec::with_capacity(out.area());
    for yo in 0..out.height {
        let r = mapping.axis(yo, scale, src_size.height);
        for xo in 0..out.width {
            let c = mapping.axis(xo, scale, src_size.width);
            taps.push(Tap {
                xo,
                yo,
                x0: c.i0,
                y0: r.i0,
                x1: c.i1,
                y1: r.i1,
                tx_q: c.t_q,
                ty_q: r.t_q,
            });
        }
    }
    taps
}
