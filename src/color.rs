//! Color features and pairwise cost models.
//!
//! A [`CostModel`] converts raw 8-bit RGB colors into the feature space it
//! compares in — once per color, at problem construction — and then measures
//! distances between precomputed features. Two models are provided:
//!
//! - [`SquaredRgb`]: squared Euclidean distance over RGB channels. Integer
//!   arithmetic, exact in `f64`, the cheap default.
//! - [`CieLab76`]: CIE76 delta-E over Lab coordinates (sRGB → linear RGB →
//!   Lab, D65), more perceptually uniform.
//!
//! # References
//!
//! - CIE (1976), *Colorimetry — Part 4: CIE 1976 L\*a\*b\* colour space*

use palette::{FromColor, Lab, LinSrgb, Srgb};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// Pairwise distance between a target color and a candidate item color.
///
/// Implementations must be pure: the same pair of features always yields
/// the same non-negative distance, symmetric in its arguments. No triangle
/// inequality is assumed. Features are derived from raw colors up front so
/// that [`distance`](Self::distance) is the only call on the hot path.
pub trait CostModel: Send + Sync {
    /// Precomputed per-color feature compared by [`distance`](Self::distance).
    type Feature: Copy + Send + Sync;

    /// Maps a raw color into the model's feature space.
    fn feature(&self, color: Rgb) -> Self::Feature;

    /// Non-negative distance between two features.
    fn distance(&self, a: Self::Feature, b: Self::Feature) -> f64;
}

/// Squared Euclidean distance in RGB space.
///
/// The per-pair maximum is `3 * 255^2 = 195_075`, so totals over any
/// realistic slot count stay far below 2^53 and every sum and delta this
/// engine computes with it is exact in `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredRgb;

impl CostModel for SquaredRgb {
    type Feature = Rgb;

    fn feature(&self, color: Rgb) -> Rgb {
        color
    }

    fn distance(&self, a: Rgb, b: Rgb) -> f64 {
        let dr = a.r as i32 - b.r as i32;
        let dg = a.g as i32 - b.g as i32;
        let db = a.b as i32 - b.b as i32;
        (dr * dr + dg * dg + db * db) as f64
    }
}

/// CIE76 delta-E in Lab space.
///
/// Colors are converted sRGB → linear RGB → Lab (D65) when features are
/// built; the distance itself is plain Euclidean over (L, a, b). Totals are
/// subject to ordinary floating-point accumulation, so equality checks
/// against a full recomputation need a tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct CieLab76;

impl CostModel for CieLab76 {
    type Feature = [f32; 3];

    fn feature(&self, color: Rgb) -> [f32; 3] {
        let srgb: Srgb<f32> = Srgb::new(
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
        );
        let lin: LinSrgb<f32> = srgb.into_linear();
        let lab: Lab = Lab::from_color(lin);
        [lab.l, lab.a, lab.b]
    }

    fn distance(&self, a: [f32; 3], b: [f32; 3]) -> f64 {
        let dl = a[0] as f64 - b[0] as f64;
        let da = a[1] as f64 - b[1] as f64;
        let db = a[2] as f64 - b[2] as f64;
        (dl * dl + da * da + db * db).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_rgb_exact_values() {
        let m = SquaredRgb;
        let black = m.feature(Rgb::new(0, 0, 0));
        let white = m.feature(Rgb::new(255, 255, 255));
        let gray = m.feature(Rgb::new(10, 10, 10));

        assert_eq!(m.distance(black, white), 3.0 * 255.0 * 255.0);
        assert_eq!(m.distance(black, gray), 300.0);
        assert_eq!(m.distance(black, black), 0.0);
    }

    #[test]
    fn test_squared_rgb_symmetric() {
        let m = SquaredRgb;
        let a = m.feature(Rgb::new(12, 200, 7));
        let b = m.feature(Rgb::new(99, 3, 180));
        assert_eq!(m.distance(a, b), m.distance(b, a));
    }

    #[test]
    fn test_lab_zero_for_identical() {
        let m = CieLab76;
        let f = m.feature(Rgb::new(120, 64, 200));
        assert_eq!(m.distance(f, f), 0.0);
    }

    #[test]
    fn test_lab_symmetric_and_positive() {
        let m = CieLab76;
        let a = m.feature(Rgb::new(255, 0, 0));
        let b = m.feature(Rgb::new(0, 0, 255));
        let d = m.distance(a, b);
        assert!(d > 0.0, "distinct colors must have positive distance");
        assert!((d - m.distance(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_lab_black_white_extremes() {
        // L* spans roughly 0..100; black vs white should dominate the gray
        // midpoint distances.
        let m = CieLab76;
        let black = m.feature(Rgb::new(0, 0, 0));
        let white = m.feature(Rgb::new(255, 255, 255));
        let mid = m.feature(Rgb::new(128, 128, 128));

        let full = m.distance(black, white);
        assert!(full > 90.0 && full < 110.0, "got {full}");
        assert!(m.distance(black, mid) < full);
        assert!(m.distance(mid, white) < full);
    }

    #[test]
    fn test_rgb_conversions() {
        assert_eq!(Rgb::from([1, 2, 3]), Rgb::new(1, 2, 3));
        assert_eq!(Rgb::from((4, 5, 6)), Rgb::new(4, 5, 6));
    }
}
