//! Planar points consumed by the closest-pair engine.

use crate::error::TraceError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A point in the plane with a stable identity.
///
/// Recursive subsets are copies, so `id` is the only way to correlate a point
/// across the trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A point set holding at least two points with finite coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Result<Self, TraceError> {
        if points.len() < 2 {
            return Err(TraceError::InsufficientPoints {
                found: points.len(),
            });
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(TraceError::NonFinitePoint { id: p.id });
        }
        let mut ids = HashSet::with_capacity(points.len());
        if let Some(p) = points.iter().find(|p| !ids.insert(p.id)) {
            return Err(TraceError::DuplicatePointId { id: p.id });
        }
        Ok(Self { points })
    }

    /// Builds a set from raw coordinates, numbering points in order.
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self, TraceError> {
        Self::new(
            coords
                .iter()
                .enumerate()
                .map(|(id, &(x, y))| Point::new(id, x, y))
                .collect(),
        )
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Looks a point up by id.
    pub fn get(&self, id: usize) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }
}
