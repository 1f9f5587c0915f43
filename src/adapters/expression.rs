//! Formula text -> evaluable `f` and `f'`, backed by `symb_anafis`.
//!
//! Formulas are written the way the interactive form takes them
//! (`x**3 - 2*x + sin(x)`). Before parsing, the text is brought into the
//! dialect `symb_anafis` reads: `**` becomes `^`, `log` is the natural
//! logarithm and `log(x, b)` the base-`b` one, `Abs` and `E` are accepted.
//! Parsing, simplifying differentiation and compiled evaluation are left to
//! the crate.

use crate::domain::ports::{Evaluator, ExpressionCompiler};
use crate::utils::error::{EvaluationError, ParseError};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use symb_anafis::{parse, symb, CompiledEvaluator, Diff, Expr};

/// Deepest parenthesis nesting accepted in a formula.
pub const MAX_NESTING: usize = 64;

/// AST limits handed to the differentiator.
const MAX_DEPTH: usize = 256;
const MAX_NODES: usize = 10_000;

const VARIABLE: &str = "x";

const KNOWN_IDENTIFIERS: &[&str] = &[
    "x", "pi", "e", "E", "sin", "cos", "tan", "cot", "sec", "csc", "asin", "acos", "atan", "sinh",
    "cosh", "tanh", "exp", "ln", "log", "sqrt", "abs", "Abs", "sign",
];

/// A parsed expression compiled for repeated evaluation in `x`.
pub struct CompiledExpression {
    expr: Expr,
    evaluator: CompiledEvaluator,
}

impl CompiledExpression {
    fn compile(text: &str, expr: Expr) -> Result<Self, ParseError> {
        let evaluator = CompiledEvaluator::compile(&expr, &[VARIABLE], None)
            .map_err(|e| ParseError::new(text, e.to_string()))?;
        Ok(Self { expr, evaluator })
    }
}

impl Evaluator for CompiledExpression {
    fn eval(&self, x: f64) -> Result<f64, EvaluationError> {
        let y = self.evaluator.evaluate(&[x]);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(EvaluationError::new(
                x,
                format!("'{}' is not finite ({})", self.expr, y),
            ))
        }
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledExpression")
            .field(&format_args!("{}", self.expr))
            .finish()
    }
}

/// Default [`ExpressionCompiler`]: `symb_anafis` parser, differentiator and evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicCompiler;

impl ExpressionCompiler for SymbolicCompiler {
    type Output = CompiledExpression;

    fn compile(&self, text: &str) -> Result<(Self::Output, Self::Output), ParseError> {
        let normalized = normalize(text)?;

        let expr = parse(&normalized, &HashSet::new(), &HashSet::new(), None)
            .map_err(|e| ParseError::new(text, e.to_string()))?;
        let derivative = Diff::new()
            .max_depth(MAX_DEPTH)
            .max_nodes(MAX_NODES)
            .differentiate(&expr, &symb(VARIABLE))
            .map_err(|e| ParseError::new(text, format!("cannot differentiate: {}", e)))?;

        let f = CompiledExpression::compile(text, expr)?;
        let f_prime = CompiledExpression::compile(text, derivative)?;
        tracing::debug!("Compiled f(x) = {}, f'(x) = {}", f, f_prime);
        Ok((f, f_prime))
    }
}

/// Checks the formula and rewrites it into the `symb_anafis` dialect.
pub fn normalize(text: &str) -> Result<String, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::new(text, "empty expression"));
    }
    check_nesting(text)?;
    check_identifiers(text)?;

    let renamed = Regex::new(r"\b(Abs|E)\b")
        .map_err(|e| ParseError::new(text, format!("invalid rename pattern: {}", e)))?
        .replace_all(&text.replace("**", "^"), |caps: &regex::Captures| {
            match &caps[1] {
                "Abs" => "abs",
                _ => "e",
            }
            .to_string()
        })
        .into_owned();

    let log_call = Regex::new(r"\blog\s*\(")
        .map_err(|e| ParseError::new(text, format!("invalid log pattern: {}", e)))?;
    rewrite_log(text, &log_call, &renamed)
}

fn check_nesting(text: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::new(text, "expression nested too deeply"));
                }
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::new(text, "unmatched ')'"))?;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(ParseError::new(text, "missing ')'"));
    }
    Ok(())
}

fn check_identifiers(text: &str) -> Result<(), ParseError> {
    // 數字先吃掉，避免把 1e-3 的 e 當成識別字
    let tokens = Regex::new(r"(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?|([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| ParseError::new(text, format!("invalid identifier pattern: {}", e)))?;

    for caps in tokens.captures_iter(text) {
        if let Some(name) = caps.get(1) {
            if !KNOWN_IDENTIFIERS.contains(&name.as_str()) {
                return Err(ParseError::new(
                    text,
                    format!("unknown identifier '{}'", name.as_str()),
                ));
            }
        }
    }
    Ok(())
}

/// `log(a)` -> `ln(a)`, `log(a, b)` -> `(ln(a)/ln(b))`.
fn rewrite_log(text: &str, log_call: &Regex, source: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(m) = log_call.find(rest) {
        out.push_str(&rest[..m.start()]);

        let open = m.end() - 1;
        let close = matching_paren(rest, open)
            .ok_or_else(|| ParseError::new(text, "missing ')' after log"))?;
        let args = split_arguments(&rest[open + 1..close])
            .into_iter()
            .map(|arg| rewrite_log(text, log_call, arg.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        match args.as_slice() {
            [value] => out.push_str(&format!("ln({})", value)),
            [value, base] => out.push_str(&format!("(ln({})/ln({}))", value, base)),
            _ => return Err(ParseError::new(text, "log takes one or two arguments")),
        }
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn matching_paren(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in source[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas outside any parentheses.
fn split_arguments(source: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(&source[start..]);
    args
}
