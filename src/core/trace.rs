use crate::domain::model::{Domain, IterateSequence, Point, TangentSegment, TraceGeometry};
use crate::domain::ports::Evaluator;
use crate::utils::error::{NewtonError, Result};

/// Number of curve samples across the plotting domain, endpoints included.
pub const CURVE_SAMPLES: usize = 1000;

/// Margin used when every iterate is the same value.
pub const DEGENERATE_MARGIN: f64 = 5.0;

/// Margin as a fraction of the iterate spread.
pub const MARGIN_FRACTION: f64 = 0.5;

pub fn plotting_domain(iterates: &IterateSequence) -> Domain {
    let lo = iterates.min();
    let hi = iterates.max();
    let margin = if lo == hi {
        DEGENERATE_MARGIN
    } else {
        MARGIN_FRACTION * (hi - lo)
    };
    Domain {
        lo: lo - margin,
        hi: hi + margin,
    }
}

/// `count` evenly spaced points over `domain`; the last one is exactly `domain.hi`.
pub fn linspace(domain: Domain, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![domain.lo],
        _ => {
            let step = domain.width() / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        domain.hi
                    } else {
                        domain.lo + step * i as f64
                    }
                })
                .collect()
        }
    }
}

pub fn sample_curve<F>(f: &F, domain: Domain) -> Result<Vec<Point>>
where
    F: Evaluator + ?Sized,
{
    linspace(domain, CURVE_SAMPLES)
        .into_iter()
        .map(|x| Ok::<_, NewtonError>(Point { x, y: f.eval(x)? }))
        .collect()
}

/// `f(x_i)` for every iterate.
pub fn residuals<F>(f: &F, iterates: &IterateSequence) -> Result<Vec<f64>>
where
    F: Evaluator + ?Sized,
{
    iterates
        .iter()
        .map(|x| f.eval(x).map_err(NewtonError::from))
        .collect()
}

pub fn tangent_segments<F>(f: &F, iterates: &IterateSequence) -> Result<Vec<TangentSegment>>
where
    F: Evaluator + ?Sized,
{
    iterates
        .as_slice()
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            Ok::<_, NewtonError>(TangentSegment {
                step: i + 1,
                start: Point {
                    x: pair[0],
                    y: f.eval(pair[0])?,
                },
                end: Point { x: pair[1], y: 0.0 },
            })
        })
        .collect()
}

/// Derives everything needed to draw the run: domain, sampled curve, tangents and the zero axis.
///
/// Any evaluation failure aborts the whole trace.
pub fn build_trace<F>(iterates: &IterateSequence, f: &F) -> Result<TraceGeometry>
where
    F: Evaluator + ?Sized,
{
    let domain = plotting_domain(iterates);
    tracing::debug!("Plotting domain [{}, {}]", domain.lo, domain.hi);

    let residuals = residuals(f, iterates)?;
    let tangents = tangent_segments(f, iterates)?;
    let curve_sample = sample_curve(f, domain)?;

    Ok(TraceGeometry {
        domain,
        residuals,
        curve_sample,
        tangents,
        zero_axis: domain.zero_axis(),
    })
}
