use anyhow::Result;
use newton_trace::core::trace::{CURVE_SAMPLES, DEGENERATE_MARGIN};
use newton_trace::domain::ports::{Evaluator, ExpressionCompiler};
use newton_trace::{compute, iterate, NewtonError, Outcome, SymbolicCompiler};

/// x² − 2 from x0 = 1 converges to √2 in five steps
#[test]
fn test_square_root_of_two() -> Result<()> {
    let trace = compute("x**2 - 2", 1.0, 5)?;

    assert_eq!(trace.iterates.len(), 6);
    match trace.outcome {
        Outcome::Completed { final_iterate } => {
            assert!((final_iterate - 2f64.sqrt()).abs() < 1e-9);
        }
        ref other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}

/// 預設公式：x³ − 2x + sin(x)，x0 = 1，7 次迭代
#[test]
fn test_default_formula_converges_without_stall() -> Result<()> {
    let trace = compute("x**3 - 2*x + sin(x)", 1.0, 7)?;

    assert_eq!(trace.iterates.len(), 8);
    assert!(!trace.outcome.is_stalled());

    // |f| keeps shrinking after the second step until it hits machine zero
    let residuals: Vec<f64> = trace.residuals().iter().map(|r| r.abs()).collect();
    for pair in residuals[2..].windows(2) {
        assert!(
            pair[1] < pair[0] || pair[1] <= 1e-15,
            "residuals not decreasing: {:?}",
            residuals
        );
    }
    assert!(residuals[7] < 1e-12);
    Ok(())
}

#[test]
fn test_iterates_follow_newton_update() -> Result<()> {
    let (f, f_prime) = SymbolicCompiler.compile("x**3 - 2*x + sin(x)")?;
    let run = iterate(&f, &f_prime, 1.0, 7)?;
    let xs = run.iterates.as_slice();

    for pair in xs.windows(2) {
        let expected = pair[0] - f.eval(pair[0])? / f_prime.eval(pair[0])?;
        assert!((pair[1] - expected).abs() <= 1e-15 * (1.0 + expected.abs()));
    }
    Ok(())
}

/// x² at 0: f'(0) = 0 on the very first step
#[test]
fn test_immediate_stall_keeps_initial_guess_only() -> Result<()> {
    let trace = compute("x**2", 0.0, 7)?;

    assert_eq!(trace.iterates.as_slice(), &[0.0]);
    assert!(trace.tangents().is_empty());
    match &trace.outcome {
        Outcome::Stalled { stall, last_iterate } => {
            assert_eq!(stall.step, 1);
            assert_eq!(stall.at, 0.0);
            assert_eq!(*last_iterate, 0.0);
        }
        other => panic!("expected a stall, got {:?}", other),
    }

    // degenerate plotting window around a single point
    let domain = trace.domain();
    assert_eq!(domain.width(), 2.0 * DEGENERATE_MARGIN);
    assert_eq!(trace.curve_sample().len(), CURVE_SAMPLES);
    Ok(())
}

/// x³ + 2 from 1: the first step lands exactly on 0, where f'(0) = 0
#[test]
fn test_stall_after_first_step_keeps_two_values() -> Result<()> {
    let trace = compute("x**3 + 2", 1.0, 5)?;

    assert_eq!(trace.iterates.as_slice(), &[1.0, 0.0]);
    assert_eq!(trace.tangents().len(), 1);
    match &trace.outcome {
        Outcome::Stalled { stall, .. } => {
            assert_eq!(stall.step, 2);
            assert_eq!(stall.at, 0.0);
        }
        other => panic!("expected a stall, got {:?}", other),
    }
    assert!(trace.message().contains("f'(0) = 0"));
    Ok(())
}

#[test]
fn test_tangent_geometry_matches_iterates() -> Result<()> {
    let trace = compute("cos(x) - x", 0.2, 6)?;
    let xs = trace.iterates.as_slice();

    assert_eq!(trace.tangents().len(), xs.len() - 1);
    for (i, tangent) in trace.tangents().iter().enumerate() {
        assert_eq!(tangent.step, i + 1);
        assert_eq!(tangent.start.x, xs[i]);
        let expected = xs[i].cos() - xs[i];
        assert!((tangent.start.y - expected).abs() <= 1e-15 * (1.0 + expected.abs()));
        assert_eq!(tangent.end.x, xs[i + 1]);
        assert_eq!(tangent.end.y, 0.0);
    }

    let domain = trace.domain();
    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(domain.lo < lo && domain.hi > hi);
    let axis = trace.geometry.zero_axis;
    assert_eq!((axis.start.x, axis.end.x), (domain.lo, domain.hi));
    assert_eq!((axis.start.y, axis.end.y), (0.0, 0.0));
    Ok(())
}

#[test]
fn test_parse_failure_produces_no_trace() {
    let err = compute("x +* 2", 1.0, 5).unwrap_err();

    match err {
        NewtonError::Parse(parse) => {
            assert_eq!(parse.text, "x +* 2");
            assert!(!parse.cause.is_empty());
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_domain_error_on_curve_is_reported() {
    // iterates stay positive but the plotting window reaches below zero
    let err = compute("log(x) - 1", 0.5, 4).unwrap_err();

    match err {
        NewtonError::Evaluation(e) => assert!(e.input <= 0.0),
        other => panic!("expected an evaluation error, got {:?}", other),
    }
}

#[test]
fn test_deeply_nested_formula_is_rejected_not_fatal() {
    let formula = format!("{}x{}", "(".repeat(600), ")".repeat(600));

    match compute(&formula, 1.0, 3).unwrap_err() {
        NewtonError::Parse(parse) => assert_eq!(parse.cause, "expression nested too deeply"),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

/// log(x, 2) - 3 has its root at 8
#[test]
fn test_log_with_base_converges() -> Result<()> {
    let trace = compute("log(x, 2) - 3", 6.0, 8)?;

    match trace.outcome {
        Outcome::Completed { final_iterate } => assert!((final_iterate - 8.0).abs() < 1e-9),
        ref other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}
