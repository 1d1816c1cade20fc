//! Canopy hole geometry
//!
//! The main hole is a wobbly circle: its radius at each angle is perturbed by
//! four seeded harmonics, sampled at `HOLE_SAMPLES` points and closed with
//! quadratic segments through the midpoints so the outline has no corners.
//! Small "glimpse" holes use the same curve at a 2-5% radius.

use std::f32::consts::TAU;
use std::fmt::Write;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::OverlayRng;
use crate::polar_to_cartesian;

/// Boundary samples per hole
pub const HOLE_SAMPLES: usize = 48;

/// Hole radius at full coverage (percent of image)
pub const HOLE_BASE_RADIUS: f32 = 26.0;
/// Extra hole radius at zero coverage
pub const HOLE_RADIUS_SPREAD: f32 = 20.0;

/// Glimpse holes at full coverage
pub const GLIMPSE_MIN: usize = 30;
/// Extra glimpse holes at zero coverage (30 + 18 = 48)
pub const GLIMPSE_SPREAD: f32 = 18.0;
/// Glimpse placement attempts per target hole
pub const GLIMPSE_ATTEMPTS_PER_TARGET: usize = 4;
/// Glimpse centres must be at least this many main radii from the hole centre
pub const GLIMPSE_EXCLUSION: f32 = 1.4;
/// Glimpse seed offset per placed hole
const GLIMPSE_SEED_STEP: i32 = 777;

/// One perturbation term of the hole outline
struct Harmonic {
    frequency: f32,
    amplitude: f32,
    phase_per_seed: f32,
    cosine: bool,
}

const WOBBLE_HARMONICS: [Harmonic; 4] = [
    Harmonic { frequency: 3.7, amplitude: 0.14, phase_per_seed: 0.13, cosine: false },
    Harmonic { frequency: 5.3, amplitude: 0.09, phase_per_seed: 0.07, cosine: true },
    Harmonic { frequency: 7.1, amplitude: 0.06, phase_per_seed: 0.19, cosine: false },
    Harmonic { frequency: 11.3, amplitude: 0.04, phase_per_seed: 0.31, cosine: true },
];

/// Main hole radius for a coverage in [0, 1]. Higher coverage, smaller hole.
#[inline]
pub fn hole_radius(coverage: f32) -> f32 {
    HOLE_BASE_RADIUS + (1.0 - coverage) * HOLE_RADIUS_SPREAD
}

/// Radius of the dark ring drawn around the hole edge
#[inline]
pub fn vignette_radius(coverage: f32) -> f32 {
    28.0 + (1.0 - coverage) * 22.0
}

/// Number of glimpse holes to aim for
#[inline]
pub fn glimpse_target(coverage: f32) -> usize {
    (GLIMPSE_MIN as f32 + (1.0 - coverage) * GLIMPSE_SPREAD).round() as usize
}

/// Wobbly radius at `angle`. Shared by the hole outline and ring leaves so
/// leaves sit on the edge that is actually drawn.
pub fn wobble_radius(angle: f32, base_radius: f32, seed: i32) -> f32 {
    let s = seed as f32;
    let w = WOBBLE_HARMONICS.iter().fold(1.0, |acc, h| {
        let arg = angle * h.frequency + s * h.phase_per_seed;
        acc + h.amplitude * if h.cosine { arg.cos() } else { arg.sin() }
    });
    base_radius * w
}

/// Quadratic Bézier segment (start is the previous segment's end)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadSegment {
    pub control: Vec2,
    pub end: Vec2,
}

/// Closed curve made of quadratic segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedCurve {
    pub start: Vec2,
    pub segments: Vec<QuadSegment>,
}

impl ClosedCurve {
    /// Smoothed wobbly circle around `center`
    pub fn wobbly_circle(center: Vec2, base_radius: f32, seed: i32) -> Self {
        let points: Vec<Vec2> = (0..HOLE_SAMPLES)
            .map(|i| {
                let angle = (i as f32 / HOLE_SAMPLES as f32) * TAU;
                center + polar_to_cartesian(wobble_radius(angle, base_radius, seed), angle)
            })
            .collect();

        let n = points.len();
        let start = (points[n - 1] + points[0]) * 0.5;
        let segments = (0..n)
            .map(|i| QuadSegment {
                control: points[i],
                end: (points[i] + points[(i + 1) % n]) * 0.5,
            })
            .collect();

        Self { start, segments }
    }

    /// Append this curve as SVG path commands
    pub fn write_svg(&self, out: &mut String) {
        let _ = write!(out, "M {} {}", self.start.x, self.start.y);
        for seg in &self.segments {
            let _ = write!(
                out,
                " Q {} {} {} {}",
                seg.control.x, seg.control.y, seg.end.x, seg.end.y
            );
        }
        out.push_str(" Z");
    }

    /// SVG path data for this curve alone
    pub fn svg_path(&self) -> String {
        let mut out = String::new();
        self.write_svg(&mut out);
        out
    }

    /// Curve endpoints (on-curve points)
    pub fn on_curve_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        std::iter::once(self.start).chain(self.segments.iter().map(|s| s.end))
    }

    /// Closed when the last segment lands back on the start point
    pub fn is_closed(&self) -> bool {
        self.segments
            .last()
            .is_some_and(|s| s.end.distance(self.start) < 1e-3)
    }
}

/// A small secondary opening in the canopy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glimpse {
    pub center: Vec2,
    pub radius: f32,
    pub curve: ClosedCurve,
}

/// Main hole plus glimpse holes, punched out of the canopy with even-odd fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolePath {
    pub center: Vec2,
    pub radius: f32,
    pub main: ClosedCurve,
    pub glimpses: Vec<Glimpse>,
}

impl HolePath {
    /// Build the main hole and place glimpse holes around it
    pub fn build(center: Vec2, coverage: f32, seed: i32, rng: &mut OverlayRng) -> Self {
        let radius = hole_radius(coverage);
        let main = ClosedCurve::wobbly_circle(center, radius, seed);
        let glimpses = place_glimpses(center, radius, glimpse_target(coverage), seed, rng);
        Self {
            center,
            radius,
            main,
            glimpses,
        }
    }

    /// SVG path data for every hole (main first)
    pub fn svg_path(&self) -> String {
        let mut out = String::new();
        self.main.write_svg(&mut out);
        for g in &self.glimpses {
            out.push(' ');
            g.curve.write_svg(&mut out);
        }
        out
    }

    /// Full canopy: an outer rectangle slightly past the image with the holes
    /// cut out (render with `fill-rule="evenodd"`)
    pub fn canopy_svg_path(&self) -> String {
        format!("M-2 -2 H102 V102 H-2 Z {}", self.svg_path())
    }
}

/// Rejection-sample glimpse holes outside the main hole. Gives up after
/// `GLIMPSE_ATTEMPTS_PER_TARGET * target` candidates; fewer holes is fine.
fn place_glimpses(
    center: Vec2,
    radius: f32,
    target: usize,
    seed: i32,
    rng: &mut OverlayRng,
) -> Vec<Glimpse> {
    let mut glimpses = Vec::with_capacity(target);
    let min_dist = radius * GLIMPSE_EXCLUSION;

    for _ in 0..target * GLIMPSE_ATTEMPTS_PER_TARGET {
        if glimpses.len() >= target {
            break;
        }
        let candidate = Vec2::new(5.0 + rng.unit() * 90.0, 5.0 + rng.unit() * 90.0);
        if candidate.distance(center) < min_dist {
            continue;
        }
        let r = 2.0 + rng.unit() * 3.0;
        let glimpse_seed = seed.wrapping_add((glimpses.len() as i32).wrapping_mul(GLIMPSE_SEED_STEP));
        glimpses.push(Glimpse {
            center: candidate,
            radius: r,
            curve: ClosedCurve::wobbly_circle(candidate, r, glimpse_seed),
        });
    }

    log::debug!("Placed {}/{} glimpse holes", glimpses.len(), target);
    glimpses
}
