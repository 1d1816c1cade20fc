//! Leaf canopy overlay
//!
//! Pure, seeded generation of the leafy mask drawn over a bird photo.
//! Identical `(coverage, hole_center, seed)` always yields identical output:
//! - Seeded RNG only (PCG32, one stream per concern)
//! - Hole radius and target counts depend on coverage alone
//! - No rendering dependencies; callers turn the result into SVG/CSS

pub mod canopy;
pub mod hole;
pub mod leaves;
pub mod rng;

pub use canopy::{CANOPY_COLORS, CanopyColor, LeafOverlay, OverlayParams, generate};
pub use hole::{
    ClosedCurve, Glimpse, HolePath, QuadSegment, glimpse_target, hole_radius, vignette_radius,
    wobble_radius,
};
pub use leaves::{
    LEAF_COLORS, LEAF_SHAPES, LeafInstance, LeafLayer, LeafShape, ring_count, surface_target,
};
pub use rng::{OverlayRng, Stream};
