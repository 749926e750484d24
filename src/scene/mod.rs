//! Scene builders: filtered survey rows → plain shapes.
//!
//! Nothing here draws. `section` produces a 2D cross-section for `egui_plot`,
//! `model3d` produces 3D primitives that `ui::view3d` projects through
//! [`camera::OrbitCamera`] and paints back to front.

pub mod camera;
pub mod model3d;
pub mod section;

pub use model3d::{build_model, ModelScene};
pub use section::{build_section, SectionScene};

use crate::data::model::{Table, WELL_PREFIX};

/// Fractional part of the golden ratio, for low-discrepancy sequences.
const GOLDEN: f64 = 0.618_033_988_749_895;

/// Deterministic spread of the `i`-th item over [0, 1).
/// Different `seed`s give different, repeatable sequences.
pub(crate) fn spread(i: usize, seed: f64) -> f64 {
    ((i as f64 + 1.0) * GOLDEN + seed).fract()
}

/// Map a [0, 1) sample into [lo, hi).
pub(crate) fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    lo + (hi - lo) * t
}

/// `n` values evenly spaced over [lo, hi]; a single value sits at the midpoint.
pub(crate) fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![(lo + hi) / 2.0],
        _ => (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Well reading columns of a (possibly filtered) well table.
pub(crate) fn well_columns(well: Option<&Table>) -> Vec<String> {
    well.map(|t| t.columns_with_prefix(WELL_PREFIX))
        .unwrap_or_default()
}

/// Selected month's precipitation for the first region row, or 0.
pub(crate) fn precipitation_value(precipitation: Option<&Table>, month: &str) -> f64 {
    precipitation
        .and_then(|t| t.f64_at(0, month))
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_is_deterministic_and_bounded() {
        let a: Vec<f64> = (0..50).map(|i| spread(i, 0.3)).collect();
        let b: Vec<f64> = (0..50).map(|i| spread(i, 0.3)).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn linspace_edges() {
        assert_eq!(linspace(-25.0, 25.0, 3), vec![-25.0, 0.0, 25.0]);
        assert_eq!(linspace(-25.0, 25.0, 1), vec![0.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
