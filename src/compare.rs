//! Pixel-exact comparison of a reference image against captured output.
//!
//! The comparison never stops early: every differing pixel is counted, but
//! only the first [`Comparator::report_limit`] are kept as records so a badly
//! broken capture does not produce an unbounded report.
//!
//! # Example
//!
//! ```
//! use fixscale::compare;
//!
//! let reference = [10u8, 20, 30, 40];
//! let observed = [10u8, 20, 31, 40];
//! let verdict = compare(&reference, &observed, 2);
//!
//! assert!(!verdict.passed());
//! assert_eq!(verdict.total_mismatches, 1);
//! assert_eq!((verdict.records[0].x, verdict.records[0].y), (0, 1));
//! ```

use alloc::vec::Vec;
use core::fmt;

use crate::image::Warning;

/// Default number of mismatch records kept in a [`Verdict`].
pub const DEFAULT_REPORT_LIMIT: usize = 50;

/// One differing pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mismatch {
    /// Linear index into the buffers.
    pub index: usize,
    /// Column (`index % width`).
    pub x: u32,
    /// Row (`index / width`).
    pub y: u32,
    /// Reference sample.
    pub reference: u8,
    /// Observed sample.
    pub observed: u8,
}

impl Mismatch {
    /// Signed difference `observed - reference` in LSB.
    pub fn diff(&self) -> i16 {
        self.observed as i16 - self.reference as i16
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pixel {} (x={}, y={}): REF=0x{:02x} HW=0x{:02x} diff={}",
            self.index,
            self.x,
            self.y,
            self.reference,
            self.observed,
            self.diff()
        )
    }
}

/// Why a [`Verdict`] did not pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Failure {
    /// At least one pixel differs.
    PixelMismatch {
        /// Number of differing pixels.
        count: usize,
    },
    /// The buffers have different lengths.
    LengthMismatch {
        /// Reference length.
        reference: usize,
        /// Observed length.
        observed: usize,
    },
}

/// Outcome of a comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Pixels compared (length of the common prefix).
    pub compared: usize,
    /// True number of differing pixels.
    pub total_mismatches: usize,
    /// The first differing pixels, in index order, up to the report limit.
    pub records: Vec<Mismatch>,
    /// Largest absolute difference seen, in LSB.
    pub max_abs_diff: u8,
    /// Non-fatal conditions (length mismatch).
    pub warnings: Vec<Warning>,
}

impl Verdict {
    /// True iff no pixel differs and the lengths agree.
    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Every reason this verdict fails; empty when it passes.
    pub fn failures(&self) -> impl Iterator<Item = Failure> + '_ {
        let pixels = (self.total_mismatches > 0).then_some(Failure::PixelMismatch {
            count: self.total_mismatches,
        });
        let lengths = self.warnings.iter().filter_map(|w| match *w {
            Warning::LengthMismatch {
                reference,
                observed,
            } => Some(Failure::LengthMismatch {
                reference,
                observed,
            }),
            _ => None,
        });
        pixels.into_iter().chain(lengths)
    }

    /// Share of compared pixels that match, in percent. 100 for empty input.
    pub fn match_percent(&self) -> f64 {
        if self.compared == 0 {
            return 100.0;
        }
        100.0 * (self.compared - self.total_mismatches) as f64 / self.compared as f64
    }

    /// Whether more mismatches exist than were recorded.
    pub fn is_truncated(&self) -> bool {
        self.total_mismatches > self.records.len()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for w in &self.warnings {
            writeln!(f, "warning: {w}")?;
        }
        for m in &self.records {
            writeln!(f, "mismatch at {m}")?;
        }
        if self.passed() {
            write!(f, "[OK] {} pixels match the reference", self.compared)
        } else {
            write!(
                f,
                "[FAIL] {} mismatches in {} pixels ({:.2}% equal, max diff {} LSB, {} shown)",
                self.total_mismatches,
                self.compared,
                self.match_percent(),
                self.max_abs_diff,
                self.records.len()
            )?;
            if self.warnings.iter().any(|w| matches!(w, Warning::LengthMismatch { .. })) {
                f.write_str(", length mismatch")?;
            }
            Ok(())
        }
    }
}

/// Comparison settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Comparator {
    report_limit: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    /// Comparator keeping [`DEFAULT_REPORT_LIMIT`] records.
    pub const fn new() -> Self {
        Self {
            report_limit: DEFAULT_REPORT_LIMIT,
        }
    }

    /// Set how many mismatch records to keep. The total is always exact.
    pub const fn report_limit(mut self, limit: usize) -> Self {
        self.report_limit = limit;
        self
    }

    /// Compare `observed` against `reference` position by position.
    ///
    /// `width` decodes indices into `(x, y)`. Buffers of different length are
    /// compared over their common prefix and the verdict fails with
    /// [`Failure::LengthMismatch`].
    pub fn compare(&self, reference: &[u8], observed: &[u8], width: u32) -> Verdict {
        let mut warnings = Vec::new();
        if reference.len() != observed.len() {
            log::warn!(
                "reference has {} samples, observed has {}; comparing common prefix",
                reference.len(),
                observed.len()
            );
            warnings.push(Warning::LengthMismatch {
                reference: reference.len(),
                observed: observed.len(),
            });
        }

        let width = width.max(1) as usize;
        let mut records = Vec::new();
        let mut total_mismatches = 0;
        let mut max_abs_diff = 0;
        let compared = reference.len().min(observed.len());
        for (index, (&r, &o)) in reference.iter().zip(observed).enumerate() {
            if r == o {
                continue;
            }
            total_mismatches += 1;
            max_abs_diff = max_abs_diff.max(r.abs_diff(o));
            if records.len() < self.report_limit {
                let m = Mismatch {
                    index,
                    x: (index % width) as u32,
                    y: (index / width) as u32,
                    reference: r,
                    observed: o,
                };
                log::trace!("mismatch at {m}");
                records.push(m);
            }
        }

        Verdict {
            compared,
            total_mismatches,
            records,
            max_abs_diff,
            warnings,
        }
    }
}

/// Compare with the default report limit. See [`Comparator::compare`].
pub fn compare(reference: &[u8], observed: &[u8], width: u32) -> Verdict {
    Comparator::new().compare(reference, observed, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn identical_buffers_pass() {
        let a = [1u8, 2, 3, 4, 5, 6];
        let v = compare(&a, &a, 3);
        assert!(v.passed());
        assert_eq!(v.total_mismatches, 0);
        assert!(v.records.is_empty());
        assert_eq!(v.match_percent(), 100.0);
        assert_eq!(v.failures().count(), 0);
    }

    #[test]
    fn single_difference_decodes_coordinates() {
        let a = vec![0u8; 12];
        let mut b = a.clone();
        b[7] = 9;
        let v = compare(&a, &b, 4);
        assert_eq!(v.total_mismatches, 1);
        assert_eq!(
            v.records,
            [Mismatch {
                index: 7,
                x: 3,
                y: 1,
                reference: 0,
                observed: 9
            }]
        );
        assert_eq!(v.records[0].diff(), 9);
        assert_eq!(v.max_abs_diff, 9);
    }

    #[test]
    fn report_is_capped_but_total_is_exact() {
        let a = vec![0u8; 100];
        let b = vec![1u8; 100];
        let v = Comparator::new().report_limit(20).compare(&a, &b, 10);
        assert_eq!(v.total_mismatches, 100);
        assert_eq!(v.records.len(), 20);
        assert!(v.is_truncated());
        assert_eq!(v.records[19].index, 19);
    }

    #[test]
    fn length_mismatch_fails_without_counting_pixels() {
        let a = [5u8, 5, 5, 5];
        let b = [5u8, 5, 5];
        let v = compare(&a, &b, 2);
        assert_eq!(v.compared, 3);
        assert_eq!(v.total_mismatches, 0);
        assert!(!v.passed());
        assert_eq!(
            v.failures().collect::<Vec<_>>(),
            [Failure::LengthMismatch {
                reference: 4,
                observed: 3
            }]
        );
    }

    #[test]
    fn zero_width_does_not_divide() {
        let v = compare(&[1, 2], &[1, 3], 0);
        assert_eq!((v.records[0].x, v.records[0].y), (0, 1));
    }

    #[test]
    fn display_reports_hex_values() {
        let v = compare(&[0x10, 0x20], &[0x10, 0x2f], 2);
        let text = v.to_string();
        assert!(text.contains("REF=0x20 HW=0x2f diff=15"), "{text}");
        assert!(text.ends_with("[FAIL] 1 mismatches in 2 pixels (50.00% equal, max diff 15 LSB, 1 shown)"), "{text}");
        assert_eq!(compare(&[1], &[1], 1).to_string(), "[OK] 1 pixels match the reference");
    }
}
