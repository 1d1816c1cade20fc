//! Seeded random source for overlay generation
//!
//! Every draw goes through PCG-XSH-RR 32 (`rand_pcg::Pcg32`) seeded from the
//! caller's 32-bit seed. Each concern gets its own stream so that, e.g., the
//! surface-leaf candidate positions do not shift when the ring leaf count
//! changes with coverage.

use rand::Rng;
use rand_pcg::Pcg32;

/// Independent PCG stream per overlay concern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Canopy = 1,
    Glimpse = 2,
    Ring = 3,
    SurfacePosition = 4,
    SurfaceLeaf = 5,
}

/// Deterministic uniform source for one stream
#[derive(Debug, Clone)]
pub struct OverlayRng {
    inner: Pcg32,
}

impl OverlayRng {
    /// Seed a stream. Negative seeds wrap to their u32 bit pattern.
    pub fn new(seed: i32, stream: Stream) -> Self {
        Self {
            inner: Pcg32::new(seed as u32 as u64, stream as u64),
        }
    }

    /// Uniform in [0, 1)
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform in [-0.5, 0.5)
    #[inline]
    pub fn centered(&mut self) -> f32 {
        self.unit() - 0.5
    }

    /// Uniform index in 0..len (len must be non-zero)
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        ((self.unit() * len as f32) as usize).min(len - 1)
    }
}
