//! Parametric roof geometry.
//!
//! A shed roof has one free parameter, the ridge height `h`. Base width `w`
//! and depth `d` are fixed when the roof is built; everything else is derived:
//!
//! ```text
//! rafter_length = sqrt(w² + h²)
//! pitch_angle   = atan(h / w)
//! wall_scale    = h
//! ```

use serde::{Deserialize, Serialize};

/// Result of solving the roof for one height
pub type ParameterResult = Result<RoofSolution, ParameterError>;

/// Errors raised by the roof solver
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Base width is zero or negative
    DegenerateBase(f64),
    /// An input is NaN or infinite
    NonFinite { name: &'static str, value: f64 },
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::DegenerateBase(width) => {
                write!(f, "Degenerate roof base: width must be > 0, got {}", width)
            }
            ParameterError::NonFinite { name, value } => {
                write!(f, "Parameter '{}' is not finite: {}", name, value)
            }
        }
    }
}

impl std::error::Error for ParameterError {}

/// Fixed base plus the current free parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoofParameters {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl RoofParameters {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Solve for the current height
    pub fn solve(&self) -> ParameterResult {
        recompute(self.height, self.width, self.depth)
    }
}

/// Dimensions derived from the ridge height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofSolution {
    /// Length of the sloped roof plane
    pub rafter_length: f64,
    /// Slope of the roof plane in radians
    pub pitch_angle: f64,
    /// Scale applied to the unit side wall
    pub wall_scale: f64,
}

impl RoofSolution {
    pub fn pitch_degrees(&self) -> f64 {
        self.pitch_angle.to_degrees()
    }
}

/// Recompute the dependent roof dimensions for `height`.
///
/// Pure: identical inputs always give bit-identical outputs.
pub fn recompute(height: f64, base_width: f64, base_depth: f64) -> ParameterResult {
    for (name, value) in [
        ("height", height),
        ("base_width", base_width),
        ("base_depth", base_depth),
    ] {
        if !value.is_finite() {
            return Err(ParameterError::NonFinite { name, value });
        }
    }
    if base_width <= 0.0 {
        return Err(ParameterError::DegenerateBase(base_width));
    }

    Ok(RoofSolution {
        rafter_length: base_width.hypot(height),
        pitch_angle: (height / base_width).atan(),
        wall_scale: height,
    })
}
