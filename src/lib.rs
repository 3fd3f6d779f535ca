//! Bit-exact reference models for fixed-point image downscaling cores.
//!
//! Computes, on the CPU, the exact bytes a Q8.8 downscaler core should
//! produce, and compares them pixel by pixel against a hardware capture.
//! Every rounding, truncation and clamp follows the hardware arithmetic, so a
//! single-LSB divergence is reported as a mismatch.
//!
//! Single-channel 8-bit only. No file I/O, `no_std` compatible.
//!
//! # Modules
//!
//! - [`scale`] — Q8.8 scale factor
//! - [`dims`] — output dimensions from scale and core capacity
//! - [`image`] — 8-bit buffers and edge-replicating reads
//! - [`bilinear`] — Q8.8 bilinear resampling (float and reciprocal mapping)
//! - [`incremental`] — division-free nearest-sample stepping
//! - [`compare`] — pixel comparison and verdict
//! - [`pattern`] — synthetic test images
//! - [`profile`] — hardware core revisions
//!
//! # Example
//!
//! ```
//! use fixscale::{HwProfile, Scale, Size, reference, verify};
//!
//! let src = [0, 0, 0, 0, 0, 255, 255, 0, 0, 255, 255, 0, 0, 0, 0, 0];
//! let r = reference(&src, 4, 4, Scale::HALF, &HwProfile::default()).unwrap();
//! assert_eq!(r.image.size(), Size::new(2, 2));
//! assert_eq!(r.image.as_bytes(), &[64, 64, 64, 64]);
//!
//! // Compare against what the core produced.
//! let captured = [64, 64, 64, 65];
//! let run = verify(&src, 4, 4, Scale::HALF, &HwProfile::default(), &captured).unwrap();
//! assert!(!run.verdict.passed());
//! assert_eq!(run.verdict.total_mismatches, 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod bilinear;
pub mod compare;
pub mod dims;
pub mod image;
pub mod incremental;
pub mod pattern;
pub mod profile;
pub mod scale;

use alloc::vec::Vec;

pub use compare::{Comparator, Failure, Mismatch, Verdict, compare};
pub use dims::{DimensionError, ProductWidth, Size, resolve_dims, resolve_dims_with};
pub use image::{ImageBuf, SourceView, Warning};
pub use profile::{Algorithm, HwProfile};
pub use scale::{Scale, ScaleParseError};

/// Reference output for one source image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// The expected core output.
    pub image: ImageBuf,
    /// Non-fatal conditions met while computing it.
    pub warnings: Vec<Warning>,
}

/// A reference plus its comparison against captured output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    /// The expected core output.
    pub reference: Reference,
    /// Comparison of the capture against [`Run::reference`].
    pub verdict: Verdict,
}

/// Compute the expected core output for `src` (`width × height`, row-major).
///
/// Output dimensions come from [`resolve_dims_with`] and the profile's
/// capacity; pixels from the profile's [`Algorithm`]. A `src` shorter than
/// `width * height` is not an error: missing samples read as 0 and a
/// [`Warning::BufferTooSmall`] is attached.
pub fn reference(
    src: &[u8],
    width: u32,
    height: u32,
    scale: Scale,
    profile: &HwProfile,
) -> Result<Reference, DimensionError> {
    let out = resolve_dims_with(width, height, scale, profile.max, profile.product)?;

    let mut warnings = Vec::new();
    let view = SourceView::new(src, Size::new(width, height));
    if let Some(w) = view.shortfall() {
        log::warn!("{w}");
        warnings.push(w);
    }
    if scale > Scale::ONE {
        let w = Warning::UpscaleClamped { scale: scale.raw() };
        log::warn!("{w}");
        warnings.push(w);
    }

    log::debug!(
        "{} reference {width}x{height} -> {}x{} @ {scale}",
        profile.algorithm,
        out.width,
        out.height
    );
    let image = match profile.algorithm {
        Algorithm::Bilinear => bilinear::resample(view, out, scale),
        Algorithm::BilinearReciprocal => bilinear::resample_reciprocal(view, out, scale),
        Algorithm::Incremental(corrections) => incremental::resample(view, out, corrections),
    };
    Ok(Reference { image, warnings })
}

/// Compute the reference and compare `observed` against it.
///
/// `observed` is the raw capture from the core, expected to hold
/// `out_w * out_h` samples.
pub fn verify(
    src: &[u8],
    width: u32,
    height: u32,
    scale: Scale,
    profile: &HwProfile,
    observed: &[u8],
) -> Result<Run, DimensionError> {
    let reference = reference(src, width, height, scale, profile)?;
    let verdict = compare(
        reference.image.as_bytes(),
        observed,
        reference.image.width(),
    );
    if verdict.passed() {
        log::debug!("capture matches {} reference", profile.algorithm);
    } else {
        log::warn!(
            "capture differs from {} reference: {} mismatches",
            profile.algorithm,
            verdict.total_mismatches
        );
    }
    Ok(Run { reference, verdict })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn short_source_warns() {
        let r = reference(&[1, 2, 3], 2, 2, Scale::ONE, &HwProfile::default()).unwrap();
        assert_eq!(r.image.as_bytes(), &[1, 2, 3, 0]);
        assert_eq!(
            r.warnings,
            [Warning::BufferTooSmall {
                expected: 4,
                got: 3
            }]
        );
    }

    #[test]
    fn upscale_is_clamped_and_flagged() {
        let src = vec![50u8; 16];
        let r = reference(&src, 4, 4, Scale::from_raw(0x0200), &HwProfile::default()).unwrap();
        assert_eq!(r.image.size(), Size::new(4, 4));
        assert!(r.warnings.contains(&Warning::UpscaleClamped { scale: 0x0200 }));
    }

    #[test]
    fn invalid_dimensions_propagate() {
        assert_eq!(
            reference(&[], 0, 4, Scale::HALF, &HwProfile::default()),
            Err(DimensionError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn profile_selects_algorithm() {
        let src: Vec<u8> = (0..16).map(|v| v * 10).collect();
        let profile = HwProfile::default()
            .algorithm(Algorithm::Incremental(incremental::Corrections::default()));
        let r = reference(&src, 4, 4, Scale::HALF, &profile).unwrap();
        assert_eq!(r.image.as_bytes(), &[0, 20, 80, 100]);
    }

    #[test]
    fn verify_short_capture_fails() {
        let src = vec![9u8; 16];
        let run = verify(&src, 4, 4, Scale::HALF, &HwProfile::default(), &[9, 9, 9]).unwrap();
        assert_eq!(run.verdict.total_mismatches, 0);
        assert!(!run.verdict.passed());
    }
}
