//! Hardware core revisions: capacity, resampling algorithm, product width.

use core::fmt;

use crate::dims::{ProductWidth, Size};
use crate::incremental::Corrections;

/// Line-buffer capacity of the reference core, 32×32.
pub const DEFAULT_CAPACITY: Size = Size::new(32, 32);

/// Resampling algorithm implemented by the core under test.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Q8.8 bilinear with floating-point center mapping.
    #[default]
    Bilinear,
    /// Q8.8 bilinear with center mapping through the integer reciprocal.
    BilinearReciprocal,
    /// Division-free nearest-sample stepping.
    Incremental(Corrections),
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bilinear => f.write_str("bilinear"),
            Self::BilinearReciprocal => f.write_str("bilinear (reciprocal)"),
            Self::Incremental(c) => write!(f, "incremental ({c})"),
        }
    }
}

/// Description of one hardware core revision.
///
/// ```
/// use fixscale::{Algorithm, HwProfile, Size};
/// use fixscale::incremental::Corrections;
///
/// let profile = HwProfile::new(64, 48).algorithm(Algorithm::Incremental(Corrections::default()));
/// assert_eq!(profile.max, Size::new(64, 48));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HwProfile {
    /// Largest output the core can produce.
    pub max: Size,
    /// Resampling algorithm.
    pub algorithm: Algorithm,
    /// Width of the dimension multiply.
    pub product: ProductWidth,
}

impl Default for HwProfile {
    fn default() -> Self {
        Self {
            max: DEFAULT_CAPACITY,
            algorithm: Algorithm::default(),
            product: ProductWidth::default(),
        }
    }
}

impl HwProfile {
    /// Profile with the given capacity and default algorithm and product width.
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max: Size::new(max_width, max_height),
            ..Self::default()
        }
    }

    /// Set the resampling algorithm.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the width of the dimension multiply.
    pub fn product(mut self, product: ProductWidth) -> Self {
        self.product = product;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn default_matches_reference_core() {
        let p = HwProfile::default();
        assert_eq!(p.max, Size::new(32, 32));
        assert_eq!(p.algorithm, Algorithm::Bilinear);
        assert_eq!(p.product, ProductWidth::Truncating32);
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(
            Algorithm::Incremental(Corrections::default()).to_string(),
            "incremental (capped at 2)"
        );
        assert_eq!(Algorithm::BilinearReciprocal.to_string(), "bilinear (reciprocal)");
    }
}
