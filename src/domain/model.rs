use crate::utils::error::StallError;
use serde::Serialize;

/// Successive Newton approximations, starting with the initial guess.
///
/// Never empty. The only way to grow it is through the iterator in
/// [`crate::core::newton`], so a produced sequence is effectively frozen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IterateSequence {
    values: Vec<f64>,
}

impl IterateSequence {
    pub fn starting_at(x0: f64) -> Self {
        Self { values: vec![x0] }
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

impl From<Vec<f64>> for IterateSequence {
    /// Builds a sequence from precomputed values; an empty vector is treated as `[0.0]`.
    fn from(values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::starting_at(0.0);
        }
        Self { values }
    }
}

/// Closed plotting interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    pub lo: f64,
    pub hi: f64,
}

impl Domain {
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Dashed `y = 0` reference line across the whole domain.
    pub fn zero_axis(&self) -> Segment {
        Segment {
            start: Point { x: self.lo, y: 0.0 },
            end: Point { x: self.hi, y: 0.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// One Newton step drawn as the tangent from `(x_i, f(x_i))` down to `(x_{i+1}, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TangentSegment {
    /// 1-based step number
    pub step: usize,
    pub start: Point,
    pub end: Point,
}

/// Plot data derived from an iterate sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceGeometry {
    pub domain: Domain,
    /// `f(x_i)` for each iterate
    pub residuals: Vec<f64>,
    pub curve_sample: Vec<Point>,
    pub tangents: Vec<TangentSegment>,
    pub zero_axis: Segment,
}

/// Result of the fixed-count iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonRun {
    pub iterates: IterateSequence,
    pub stall: Option<StallError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Completed { final_iterate: f64 },
    Stalled { stall: StallError, last_iterate: f64 },
}

impl Outcome {
    pub fn is_stalled(&self) -> bool {
        matches!(self, Outcome::Stalled { .. })
    }

    pub fn message(&self, requested_steps: usize) -> String {
        match self {
            Outcome::Completed { final_iterate } => format!(
                "Approximate root after {} iterations: x ≈ {}",
                requested_steps, final_iterate
            ),
            Outcome::Stalled { stall, last_iterate } => format!(
                "{}; last valid iterate x ≈ {}",
                stall, last_iterate
            ),
        }
    }
}

/// Everything the presentation layer needs for one compute invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub formula: String,
    pub derivative: String,
    pub requested_steps: usize,
    pub iterates: IterateSequence,
    #[serde(flatten)]
    pub geometry: TraceGeometry,
    pub outcome: Outcome,
}

impl Trace {
    pub fn domain(&self) -> Domain {
        self.geometry.domain
    }

    pub fn tangents(&self) -> &[TangentSegment] {
        &self.geometry.tangents
    }

    pub fn residuals(&self) -> &[f64] {
        &self.geometry.residuals
    }

    pub fn curve_sample(&self) -> &[Point] {
        &self.geometry.curve_sample
    }

    pub fn message(&self) -> String {
        self.outcome.message(self.requested_steps)
    }
}
