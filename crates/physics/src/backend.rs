//! Trigonometry backends behind [`crate::VectorMath`].
//!
//! The backend is picked once when the math service is built; hot paths only
//! see a trait object and never re-check which implementation is active.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// Trigonometric primitives used by the vector helpers.
pub trait TrigBackend: Send + Sync + fmt::Debug {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Sine of an angle in radians.
    fn sin(&self, radians: f64) -> f64;

    /// Cosine of an angle in radians.
    fn cos(&self, radians: f64) -> f64;

    /// Four-quadrant arctangent in radians.
    fn atan2(&self, y: f64, x: f64) -> f64 {
        y.atan2(x)
    }
}

/// Selects the backend at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathBackend {
    /// libm-accurate `f64` functions.
    #[default]
    Portable,
    /// 65 536-entry sine table, matching the client's own rounding.
    Lookup,
}

impl MathBackend {
    /// Build the selected backend.
    pub fn build(self) -> Box<dyn TrigBackend> {
        match self {
            Self::Portable => Box::new(PortableTrig),
            Self::Lookup => Box::new(LookupTrig::new()),
        }
    }

    /// Parse a backend key (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "portable" => Some(Self::Portable),
            "lookup" | "table" => Some(Self::Lookup),
            _ => None,
        }
    }
}

/// Standard library trigonometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableTrig;

impl TrigBackend for PortableTrig {
    fn name(&self) -> &'static str {
        "portable"
    }

    fn sin(&self, radians: f64) -> f64 {
        radians.sin()
    }

    fn cos(&self, radians: f64) -> f64 {
        radians.cos()
    }
}

const TABLE_SIZE: usize = 65_536;
const TABLE_MASK: i64 = TABLE_SIZE as i64 - 1;
const QUARTER_TURN: i64 = TABLE_SIZE as i64 / 4;
const STEPS_PER_RADIAN: f64 = TABLE_SIZE as f64 / TAU;

/// Table-driven sine/cosine.
pub struct LookupTrig {
    table: Vec<f32>,
}

impl LookupTrig {
    /// Precompute the sine table.
    pub fn new() -> Self {
        let table = (0..TABLE_SIZE)
            .map(|i| (i as f64 / STEPS_PER_RADIAN).sin() as f32)
            .collect();
        Self { table }
    }

    fn lookup(&self, step: i64) -> f64 {
        self.table[(step & TABLE_MASK) as usize] as f64
    }
}

impl Default for LookupTrig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LookupTrig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTrig")
            .field("entries", &self.table.len())
            .finish()
    }
}

impl TrigBackend for LookupTrig {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn sin(&self, radians: f64) -> f64 {
        self.lookup((radians * STEPS_PER_RADIAN) as i64)
    }

    fn cos(&self, radians: f64) -> f64 {
        self.lookup((radians * STEPS_PER_RADIAN) as i64 + QUARTER_TURN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_tracks_portable_within_table_resolution() {
        let lookup = LookupTrig::new();
        let portable = PortableTrig;
        for i in -720..720 {
            let rad = (i as f64).to_radians() * 0.5;
            assert!((lookup.sin(rad) - portable.sin(rad)).abs() < 2e-4, "sin {rad}");
            assert!((lookup.cos(rad) - portable.cos(rad)).abs() < 2e-4, "cos {rad}");
        }
    }

    #[test]
    fn parse_backend_keys() {
        assert_eq!(MathBackend::parse("Portable"), Some(MathBackend::Portable));
        assert_eq!(MathBackend::parse("table"), Some(MathBackend::Lookup));
        assert_eq!(MathBackend::parse("simd"), None);
        assert_eq!(MathBackend::Lookup.build().name(), "lookup");
    }
}
