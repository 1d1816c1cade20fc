//! Overlay entry point: canopy colour, holes and leaves for one round

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hole::{HolePath, vignette_radius};
use super::leaves::{LeafInstance, LeafLayer, LeafSet};
use super::rng::{OverlayRng, Stream};

/// Coverage used when the caller hands us NaN
pub const DEFAULT_COVERAGE: f32 = 0.5;

/// Base canopy fill (darker greens)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanopyColor {
    Moss,
    Forest,
    Pine,
    Shade,
}

pub const CANOPY_COLORS: [CanopyColor; 4] = [
    CanopyColor::Moss,
    CanopyColor::Forest,
    CanopyColor::Pine,
    CanopyColor::Shade,
];

impl CanopyColor {
    pub fn hex(&self) -> &'static str {
        match self {
            CanopyColor::Moss => "#1e3a0e",
            CanopyColor::Forest => "#243f12",
            CanopyColor::Pine => "#1a3510",
            CanopyColor::Shade => "#203d14",
        }
    }
}

/// Inputs for one overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayParams {
    /// Canopy density in [0, 1]
    pub coverage: f32,
    /// Primary hole centre, percent of the image
    pub hole_center: Vec2,
    pub seed: i32,
}

impl OverlayParams {
    /// Clamps coverage into [0, 1]
    pub fn new(coverage: f32, hole_center: Vec2, seed: i32) -> Self {
        let coverage = if coverage.is_nan() {
            DEFAULT_COVERAGE
        } else {
            coverage.clamp(0.0, 1.0)
        };
        Self {
            coverage,
            hole_center,
            seed,
        }
    }
}

/// Generated canopy mask and leaf layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafOverlay {
    pub canopy_color: CanopyColor,
    pub hole: HolePath,
    /// Dark ring around the hole edge
    pub vignette_radius: f32,
    /// Paint order: inner ring, outer ring, surface
    pub leaves: Vec<LeafInstance>,
}

impl LeafOverlay {
    pub fn ring_leaves(&self) -> impl Iterator<Item = &LeafInstance> {
        self.leaves.iter().filter(|l| l.layer != LeafLayer::Surface)
    }

    pub fn surface_leaves(&self) -> impl Iterator<Item = &LeafInstance> {
        self.leaves.iter().filter(|l| l.layer == LeafLayer::Surface)
    }
}

/// Generate the overlay. Pure: the same params always give the same overlay.
pub fn generate(params: &OverlayParams) -> LeafOverlay {
    let OverlayParams {
        coverage,
        hole_center,
        seed,
    } = OverlayParams::new(params.coverage, params.hole_center, params.seed);

    let canopy_color = CANOPY_COLORS[OverlayRng::new(seed, Stream::Canopy).index(CANOPY_COLORS.len())];

    let mut glimpse_rng = OverlayRng::new(seed, Stream::Glimpse);
    let hole = HolePath::build(hole_center, coverage, seed, &mut glimpse_rng);

    let mut leaves = LeafSet::default();
    let mut ring_rng = OverlayRng::new(seed, Stream::Ring);
    leaves.place_rings(hole_center, hole.radius, coverage, seed, &mut ring_rng);

    let mut positions = OverlayRng::new(seed, Stream::SurfacePosition);
    let mut surface_rng = OverlayRng::new(seed, Stream::SurfaceLeaf);
    leaves.place_surface(hole_center, hole.radius, coverage, &mut positions, &mut surface_rng);

    let overlay = LeafOverlay {
        canopy_color,
        hole,
        vignette_radius: vignette_radius(coverage),
        leaves: leaves.into_leaves(),
    };

    log::debug!(
        "Overlay seed={} coverage={:.2}: radius={:.1}, {} glimpses, {} leaves",
        seed,
        coverage,
        overlay.hole.radius,
        overlay.hole.glimpses.len(),
        overlay.leaves.len()
    );

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::hole::{GLIMPSE_EXCLUSION, hole_radius};
    use crate::overlay::leaves::SURFACE_EXCLUSION;
    use proptest::prelude::*;

    fn params(coverage: f32, x: f32, y: f32, seed: i32) -> OverlayParams {
        OverlayParams::new(coverage, Vec2::new(x, y), seed)
    }

    #[test]
    fn test_generate_basic() {
        let overlay = generate(&params(0.5, 50.0, 50.0, 12345));
        assert!(overlay.hole.main.is_closed());
        assert!(!overlay.leaves.is_empty());
        assert!(overlay.ring_leaves().count() > 0);
        assert!(overlay.hole.glimpses.len() <= 48);
        assert!(!overlay.canopy_color.hex().is_empty());
    }

    #[test]
    fn test_ids_unique_and_sequential() {
        let overlay = generate(&params(0.8, 40.0, 45.0, 7));
        for (i, leaf) in overlay.leaves.iter().enumerate() {
            assert_eq!(leaf.id, i as u32);
        }
        // Surface leaves always follow ring leaves
        let first_surface = overlay
            .leaves
            .iter()
            .position(|l| l.layer == LeafLayer::Surface)
            .unwrap_or(overlay.leaves.len());
        assert!(overlay.leaves[first_surface..]
            .iter()
            .all(|l| l.layer == LeafLayer::Surface));
    }

    #[test]
    fn test_degenerate_inputs() {
        for (coverage, seed) in [(0.0, 0), (1.0, 0), (0.0, i32::MIN), (1.0, i32::MAX)] {
            let overlay = generate(&params(coverage, 50.0, 50.0, seed));
            assert_eq!(overlay.hole.main.segments.len(), crate::overlay::hole::HOLE_SAMPLES);
            assert!(overlay.hole.radius > 0.0);
            assert!(!overlay.leaves.is_empty());
        }
    }

    #[test]
    fn test_coverage_clamped() {
        assert_eq!(params(-1.0, 50.0, 50.0, 1).coverage, 0.0);
        assert_eq!(params(3.0, 50.0, 50.0, 1).coverage, 1.0);
        assert_eq!(params(f32::NAN, 50.0, 50.0, 1).coverage, DEFAULT_COVERAGE);
    }

    #[test]
    fn test_hole_at_corner() {
        // Hole centred on the corner: glimpses and surface leaves still stay clear
        let overlay = generate(&params(0.9, 0.0, 0.0, 42));
        let center = Vec2::ZERO;
        for g in &overlay.hole.glimpses {
            assert!(g.center.distance(center) >= overlay.hole.radius * GLIMPSE_EXCLUSION);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate(&params(0.6, 50.0, 50.0, 1));
        let b = generate(&params(0.6, 50.0, 50.0, 2));
        assert_ne!(a.leaves, b.leaves);
    }

    #[test]
    fn test_serializes() {
        let overlay = generate(&params(0.6, 50.0, 50.0, 9));
        let json = serde_json::to_string(&overlay).unwrap();
        assert!(json.contains("\"leaves\""));
    }

    proptest! {
        #[test]
        fn prop_deterministic(
            coverage in 0.0f32..=1.0,
            x in 0.0f32..=100.0,
            y in 0.0f32..=100.0,
            seed in any::<i32>(),
        ) {
            let p = params(coverage, x, y, seed);
            let a = generate(&p);
            let b = generate(&p);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.hole.canopy_svg_path(), b.hole.canopy_svg_path());
        }

        #[test]
        fn prop_monotonic_in_coverage(
            c1 in 0.0f32..=1.0,
            c2 in 0.0f32..=1.0,
            x in 0.0f32..=100.0,
            y in 0.0f32..=100.0,
            seed in any::<i32>(),
        ) {
            let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
            let a = generate(&params(lo, x, y, seed));
            let b = generate(&params(hi, x, y, seed));
            prop_assert!(b.hole.radius <= a.hole.radius);
            prop_assert!(hole_radius(hi) <= hole_radius(lo));
            prop_assert!(b.leaves.len() >= a.leaves.len());
        }

        #[test]
        fn prop_containment(
            coverage in 0.0f32..=1.0,
            x in 0.0f32..=100.0,
            y in 0.0f32..=100.0,
            seed in any::<i32>(),
        ) {
            let overlay = generate(&params(coverage, x, y, seed));
            let center = Vec2::new(x, y);
            for leaf in overlay.surface_leaves() {
                prop_assert!(leaf.position.distance(center) >= overlay.hole.radius * SURFACE_EXCLUSION);
            }
            for g in &overlay.hole.glimpses {
                prop_assert!(g.center.distance(center) >= overlay.hole.radius * GLIMPSE_EXCLUSION);
            }
        }
    }
}
