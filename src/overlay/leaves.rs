//! Decorative leaves: silhouettes, palette and placement
//!
//! Two rings frame the hole (the inner ring overlaps into it slightly, the
//! outer ring sits just outside) and a scattered layer textures the canopy
//! surface away from the hole.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hole::wobble_radius;
use super::rng::OverlayRng;
use crate::polar_to_cartesian;

/// A stylised leaf silhouette (SVG path data)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafShape {
    pub view_box: &'static str,
    pub body: &'static str,
    pub vein: &'static str,
}

/// Leaf silhouette catalog
pub const LEAF_SHAPES: [LeafShape; 6] = [
    // Classic pointed
    LeafShape {
        view_box: "0 0 40 62",
        body: "M20 2 Q33 14 36 30 Q38 46 28 56 L20 60 L12 56 Q2 46 4 30 Q7 14 20 2Z",
        vein: "M20 6 L20 58",
    },
    // Willow
    LeafShape {
        view_box: "0 0 24 68",
        body: "M12 0 Q20 16 22 34 Q23 52 16 62 L12 68 L8 62 Q1 52 2 34 Q4 16 12 0Z",
        vein: "M12 4 L12 64",
    },
    // Aspen
    LeafShape {
        view_box: "0 0 48 54",
        body: "M24 2 Q40 10 46 26 Q48 40 36 50 L24 54 L12 50 Q0 40 2 26 Q8 10 24 2Z",
        vein: "M24 6 L24 50",
    },
    // Lobed oak
    LeafShape {
        view_box: "0 0 52 58",
        body: "M26 2 Q38 6 46 16 Q42 22 48 30 Q44 40 36 48 L26 56 L16 48 Q8 40 4 30 Q10 22 6 16 Q14 6 26 2Z",
        vein: "M26 6 L26 52",
    },
    // Small round filler
    LeafShape {
        view_box: "0 0 32 40",
        body: "M16 2 Q26 10 30 20 Q30 32 22 36 L16 40 L10 36 Q2 32 2 20 Q6 10 16 2Z",
        vein: "M16 5 L16 37",
    },
    // Fat teardrop
    LeafShape {
        view_box: "0 0 44 56",
        body: "M22 0 Q36 12 42 28 Q44 42 32 52 L22 56 L12 52 Q0 42 2 28 Q8 12 22 0Z",
        vein: "M22 4 L22 52",
    },
];

/// Leaf fill palette
pub const LEAF_COLORS: [&str; 10] = [
    "#2d5016", "#3a6b1e", "#4a8526", "#3d6b2e", "#2a4a12", "#466b22", "#3a7a28", "#325a1a",
    "#547a20", "#28400e",
];

/// Which population a leaf belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafLayer {
    InnerRing,
    OuterRing,
    Surface,
}

impl LeafLayer {
    /// Base stack order; surface leaves add 0..=2 on top
    pub fn base_stack_order(&self) -> u8 {
        match self {
            LeafLayer::InnerRing => 2,
            LeafLayer::OuterRing => 3,
            LeafLayer::Surface => 4,
        }
    }
}

/// One placed leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafInstance {
    pub id: u32,
    /// Centre in percent of the image
    pub position: Vec2,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
    pub shape_index: usize,
    pub color_index: usize,
    pub stack_order: u8,
    pub layer: LeafLayer,
    /// Blow-away animation: travel in px, spin in degrees, delay in ms
    pub blow_offset: Vec2,
    pub blow_spin: f32,
    pub blow_delay: f32,
}

impl LeafInstance {
    pub fn shape(&self) -> &'static LeafShape {
        &LEAF_SHAPES[self.shape_index]
    }

    pub fn color(&self) -> &'static str {
        LEAF_COLORS[self.color_index]
    }
}

/// Leaves in the inner ring; the outer ring gets 70% of this
#[inline]
pub fn ring_count(coverage: f32) -> usize {
    (22.0 + coverage * 14.0).round() as usize
}

#[inline]
fn outer_ring_count(coverage: f32) -> usize {
    (ring_count(coverage) as f32 * 0.7).round() as usize
}

/// Surface leaves to aim for
#[inline]
pub fn surface_target(coverage: f32) -> usize {
    (18.0 + coverage * 14.0).round() as usize
}

/// Surface candidates per target leaf
pub const SURFACE_ATTEMPTS_PER_TARGET: usize = 3;
/// Surface leaves must be at least this many hole radii from the centre
pub const SURFACE_EXCLUSION: f32 = 1.5;

/// Where and how a leaf sits, before the per-leaf random attributes
struct Placement {
    position: Vec2,
    rotation: f32,
    scale: f32,
    stack_order: u8,
    layer: LeafLayer,
}

/// Accumulates leaves with sequential ids
#[derive(Debug, Default)]
pub(crate) struct LeafSet {
    leaves: Vec<LeafInstance>,
    next_id: u32,
}

impl LeafSet {
    pub(crate) fn into_leaves(self) -> Vec<LeafInstance> {
        self.leaves
    }

    fn push(&mut self, rng: &mut OverlayRng, placement: Placement) {
        let shape_index = rng.index(LEAF_SHAPES.len());
        let color_index = rng.index(LEAF_COLORS.len());
        // Upward, fanned out up to ±81°
        let blow_angle = -FRAC_PI_2 + rng.centered() * PI * 0.9;
        let blow_dist = 120.0 + rng.unit() * 220.0;
        let blow_spin = rng.centered() * 720.0;
        let blow_delay = rng.unit() * 350.0;

        let id = self.next_id;
        self.next_id += 1;
        self.leaves.push(LeafInstance {
            id,
            position: placement.position,
            rotation: placement.rotation,
            scale: placement.scale,
            shape_index,
            color_index,
            stack_order: placement.stack_order,
            layer: placement.layer,
            blow_offset: polar_to_cartesian(blow_dist, blow_angle),
            blow_spin,
            blow_delay,
        });
    }

    /// Two rings straddling the wobbly hole edge
    pub(crate) fn place_rings(
        &mut self,
        center: Vec2,
        radius: f32,
        coverage: f32,
        seed: i32,
        rng: &mut OverlayRng,
    ) {
        for layer in [LeafLayer::InnerRing, LeafLayer::OuterRing] {
            let count = match layer {
                LeafLayer::InnerRing => ring_count(coverage),
                _ => outer_ring_count(coverage),
            };
            for i in 0..count {
                let slot = TAU / count as f32;
                let angle = i as f32 * slot + rng.centered() * slot * 0.6;
                let edge = wobble_radius(angle, radius, seed);

                let offset = match layer {
                    LeafLayer::InnerRing => edge * (0.88 + rng.unit() * 0.25),
                    _ => edge * (1.05 + rng.unit() * 0.35),
                };
                // Tip roughly toward the hole centre
                let rotation = angle.to_degrees() + 90.0 + rng.centered() * 70.0;
                let scale = match layer {
                    LeafLayer::InnerRing => 0.55 + rng.unit() * 0.7,
                    _ => 0.7 + rng.unit() * 0.9,
                };

                self.push(
                    rng,
                    Placement {
                        position: center + polar_to_cartesian(offset, angle),
                        rotation,
                        scale,
                        stack_order: layer.base_stack_order(),
                        layer,
                    },
                );
            }
        }
    }

    /// Scatter surface leaves away from the hole. Candidate positions come from
    /// their own stream so the same candidates are tried at every coverage.
    pub(crate) fn place_surface(
        &mut self,
        center: Vec2,
        radius: f32,
        coverage: f32,
        positions: &mut OverlayRng,
        rng: &mut OverlayRng,
    ) {
        let target = surface_target(coverage);
        let min_dist = radius * SURFACE_EXCLUSION;
        let mut placed = 0;

        for _ in 0..target * SURFACE_ATTEMPTS_PER_TARGET {
            if placed >= target {
                break;
            }
            let candidate = Vec2::new(-8.0 + positions.unit() * 116.0, -8.0 + positions.unit() * 116.0);
            if candidate.distance(center) < min_dist {
                continue;
            }

            let rotation = rng.unit() * 360.0;
            let scale = 0.7 + rng.unit() * 1.1;
            let stack_order = LeafLayer::Surface.base_stack_order() + rng.index(3) as u8;
            self.push(
                rng,
                Placement {
                    position: candidate,
                    rotation,
                    scale,
                    stack_order,
                    layer: LeafLayer::Surface,
                },
            );
            placed += 1;
        }

        log::debug!("Placed {}/{} surface leaves", placed, target);
    }
}
