//! Division-free nearest-sample downscaling.
//!
//! The stepping core never multiplies or divides per pixel. Each axis keeps a
//! running error: every output step adds the source extent, and every time
//! the error reaches the output extent it is reduced by that extent and the
//! source position advances by one. Over `dst` steps this distributes `dst`
//! samples evenly over `src` positions, like a Bresenham line.
//!
//! The hardware revision only has room for a fixed number of corrections per
//! step ([`Corrections::Capped`]). For ratios that need more, its source
//! position falls behind and the error keeps growing; the capped stepper
//! reproduces that exactly. [`Corrections::Converge`] is the unbounded
//! stepper.

use core::fmt;

use crate::dims::Size;
use crate::image::{ImageBuf, SourceView};

/// How many error corrections one output step may apply.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Corrections {
    /// At most `n` corrections per step, as wired in the hardware.
    Capped(u8),
    /// Correct until the error is below the output extent.
    Converge,
}

impl Default for Corrections {
    /// Two corrections, the count the stepping core implements.
    fn default() -> Self {
        Self::Capped(2)
    }
}

impl fmt::Display for Corrections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capped(n) => write!(f, "capped at {n}"),
            Self::Converge => f.write_str("convergent"),
        }
    }
}

/// One axis of the error-accumulation stepper.
///
/// ```
/// use fixscale::incremental::{Corrections, Stepper};
///
/// let visited: Vec<u32> = Stepper::new(8, 4, Corrections::Converge).take(4).collect();
/// assert_eq!(visited, [0, 2, 4, 6]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stepper {
    src_extent: u32,
    dst_extent: u32,
    corrections: Corrections,
    pos: u32,
    err: u64,
    started: bool,
}

impl Stepper {
    /// Stepper distributing `dst_extent` output samples over `src_extent`
    /// source positions.
    pub fn new(src_extent: u32, dst_extent: u32, corrections: Corrections) -> Self {
        Self {
            src_extent,
            // A zero output extent would never leave the correction loop.
            dst_extent: dst_extent.max(1),
            corrections,
            pos: 0,
            err: 0,
            started: false,
        }
    }

    /// Current source position.
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Current accumulated error.
    pub fn error(&self) -> u64 {
        self.err
    }

    /// Return to position 0 with zero error.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.err = 0;
        self.started = false;
    }

    /// Advance by one output sample.
    pub fn advance(&mut self) {
        let dst = self.dst_extent as u64;
        self.err = self.err.saturating_add(self.src_extent as u64);
        let mut applied: u32 = 0;
        while self.err >= dst {
            if let Corrections::Capped(n) = self.corrections
                && applied >= n as u32
            {
                break;
            }
            self.err -= dst;
            self.pos = self.pos.saturating_add(1);
            applied += 1;
        }
        self.pos = self.pos.min(self.src_extent.saturating_sub(1));
    }
}

/// Visited source positions: 0 first, then one per [`advance`](Stepper::advance).
impl Iterator for Stepper {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.started {
            self.advance();
        }
        self.started = true;
        Some(self.pos)
    }
}

/// Walks the output raster, yielding the source coordinate of each pixel.
///
/// Row-major: the horizontal stepper restarts at the beginning of each row
/// and the vertical stepper advances once per row.
#[derive(Clone, Debug)]
pub struct Walk {
    out: Size,
    out_x: u32,
    out_y: u32,
    x: Stepper,
    y: Stepper,
    done: bool,
}

impl Walk {
    /// Walk for a `src` source producing an `out` image.
    pub fn new(src: Size, out: Size, corrections: Corrections) -> Self {
        Self {
            out,
            out_x: 0,
            out_y: 0,
            x: Stepper::new(src.width, out.width, corrections),
            y: Stepper::new(src.height, out.height, corrections),
            done: out.width == 0 || out.height == 0,
        }
    }
}

impl Iterator for Walk {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        if self.done {
            return None;
        }
        let emitted = (self.x.position(), self.y.position());

        if self.out_x + 1 == self.out.width {
            if self.out_y + 1 == self.out.height {
                self.done = true;
            } else {
                self.out_x = 0;
                self.x.reset();
                self.out_y += 1;
                self.y.advance();
            }
        } else {
            self.out_x += 1;
            self.x.advance();
        }
        Some(emitted)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let w = self.out.width as usize;
        let left = self.out.area() - (self.out_y as usize * w + self.out_x as usize);
        (left, Some(left))
    }
}

/// Nearest-sample downscale of `src` to `out` through the stepping core.
pub fn resample(src: SourceView<'_>, out: Size, corrections: Corrections) -> ImageBuf {
    let mut walk = Walk::new(Size::new(src.width(), src.height()), out, corrections);
    // The walk yields exactly one coordinate per output pixel, in raster order.
    ImageBuf::from_fn(out, |_, _| {
        walk.next().map_or(0, |(x, y)| src.at(x as i64, y as i64))
    })
}
