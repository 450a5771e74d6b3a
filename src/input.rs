//! Caller-side input handling: operand validation, point file parsing and
//! random point generation. Engines assume input that passed through here.

use crate::config::PointBounds;
use crate::error::TraceError;
use crate::point::{Point, PointSet};
use num_bigint::BigUint;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Parses a non-negative decimal integer of any length.
pub fn parse_operand(input: &str) -> Result<BigUint, TraceError> {
    let digits = input.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TraceError::InvalidNumericInput {
            input: input.to_string(),
        });
    }
    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| TraceError::InvalidNumericInput {
        input: input.to_string(),
    })
}

/// Drops every character that is not an ASCII digit, mirroring an input
/// field that only accepts digit keystrokes.
pub fn sanitize_operand(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parses one point per line, fields separated by whitespace and/or commas.
///
/// Lines without two finite numbers are skipped, as are exact repeats of an
/// earlier coordinate pair. Ids follow the order of accepted lines.
pub fn parse_points(text: &str) -> Result<PointSet, TraceError> {
    let mut seen = HashSet::new();
    let mut points = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        let mut fields = line
            .trim()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty());
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            skipped += 1;
            continue;
        };
        let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) else {
            skipped += 1;
            continue;
        };
        if !x.is_finite() || !y.is_finite() {
            skipped += 1;
            continue;
        }
        if seen.insert(coordinate_key(x, y)) {
            points.push(Point::new(points.len(), x, y));
        } else {
            skipped += 1;
        }
    }

    debug!(accepted = points.len(), skipped, "parsed point list");
    PointSet::new(points)
}

pub fn read_points(path: impl AsRef<Path>) -> Result<PointSet, TraceError> {
    let text = std::fs::read_to_string(path)?;
    parse_points(&text)
}

/// Upper bound on the size of a generated point set.
pub const MAX_RANDOM_POINTS: usize = 100_000;

/// Draws `count` distinct points uniformly from `bounds`.
///
/// The same seed always yields the same points; without one a seed is taken
/// from the thread-local generator.
pub fn random_points(
    count: usize,
    bounds: &PointBounds,
    seed: Option<u64>,
) -> Result<PointSet, TraceError> {
    if count < 2 {
        return Err(TraceError::InsufficientPoints { found: count });
    }
    if count > MAX_RANDOM_POINTS {
        return Err(TraceError::InvalidConfig(format!(
            "cannot generate {count} points (max {MAX_RANDOM_POINTS})"
        )));
    }
    bounds.validate()?;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    debug!(count, seed, "generating random points");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut seen = HashSet::with_capacity(count);
    let mut points = Vec::with_capacity(count);
    while points.len() < count {
        let x = rng.random_range(bounds.min_x..bounds.max_x);
        let y = rng.random_range(bounds.min_y..bounds.max_y);
        if seen.insert(coordinate_key(x, y)) {
            points.push(Point::new(points.len(), x, y));
        }
    }
    PointSet::new(points)
}

// Adding 0.0 folds -0.0 into 0.0 so both count as the same coordinate.
fn coordinate_key(x: f64, y: f64) -> (u64, u64) {
    ((x + 0.0).to_bits(), (y + 0.0).to_bits())
}
