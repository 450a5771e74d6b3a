//! Closest pair of points by divide and conquer, with a recorded trace.
//!
//! The recursion keeps two views of the current subset: `px` sorted by x
//! drives the split and the brute-force base case, `py` sorted by y drives
//! the strip scan. Each pair comparison and each split is recorded as a
//! [`ClosestPairStep`] in execution order.

use crate::playback::TraceStep;
use crate::point::{Point, PointSet};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace};

/// Subsets of at most this many points are brute-forced.
pub const BRUTE_FORCE_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Base,
    Divide,
    Strip,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Base => write!(f, "Base"),
            Phase::Divide => write!(f, "Divide"),
            Phase::Strip => write!(f, "Strip"),
        }
    }
}

/// One recorded event of a closest-pair run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestPairStep {
    pub phase: Phase,
    /// Ids of the two points compared, `None` for divide steps.
    pub comparing: Option<[usize; 2]>,
    pub distance: Option<f64>,
    /// Strict improvement over the best distance known at that point.
    pub is_best: bool,
    /// x coordinate of the dividing line, `None` for base steps.
    pub median_x: Option<f64>,
}

impl ClosestPairStep {
    fn comparison(
        phase: Phase,
        a: &Point,
        b: &Point,
        distance: f64,
        is_best: bool,
        median_x: Option<f64>,
    ) -> Self {
        Self {
            phase,
            comparing: Some([a.id, b.id]),
            distance: Some(distance),
            is_best,
            median_x,
        }
    }

    fn divide(median_x: f64) -> Self {
        Self {
            phase: Phase::Divide,
            comparing: None,
            distance: None,
            is_best: false,
            median_x: Some(median_x),
        }
    }
}

impl TraceStep for ClosestPairStep {
    fn label(&self) -> String {
        let mut label = match (self.phase, self.comparing) {
            (Phase::Divide, _) | (_, None) => format!("{}: split", self.phase),
            (phase, Some([a, b])) => format!("{phase}: comparing P{a} and P{b}"),
        };
        if let Some(distance) = self.distance {
            label.push_str(&format!(", distance {distance:.3}"));
        }
        if let Some(median_x) = self.median_x {
            label.push_str(&format!(", median line at x = {median_x:.2}"));
        }
        if self.is_best {
            label.push_str(" (new best)");
        }
        label
    }
}

/// Minimum distance, winning pair(s) and step list of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestPairRun {
    pub min_dist: f64,
    pub pair: (Point, Point),
    pub all_pairs: Vec<(Point, Point)>,
    pub steps: Vec<ClosestPairStep>,
}

impl ClosestPairRun {
    /// Whether the point with `id` belongs to one of the winning pairs.
    pub fn in_final_pair(&self, id: usize) -> bool {
        self.all_pairs.iter().any(|(a, b)| a.id == id || b.id == id)
    }
}

#[derive(Debug)]
struct Best {
    min_dist: f64,
    pairs: Vec<(Point, Point)>,
}

#[derive(Debug, Default)]
struct Recorder {
    steps: Vec<ClosestPairStep>,
}

impl Recorder {
    fn push(&mut self, step: ClosestPairStep) {
        trace!(
            phase = %step.phase,
            comparing = ?step.comparing,
            distance = ?step.distance,
            "closest-pair step"
        );
        self.steps.push(step);
    }
}

fn by_coordinate(key: fn(&Point) -> f64) -> impl Fn(&Point, &Point) -> Ordering {
    move |a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal)
}

/// Finds the closest pair of `points`, recording every comparison.
pub fn closest_pair(points: &PointSet) -> ClosestPairRun {
    debug!(points = points.len(), "closest-pair run started");

    // Stable sorts keep input order among equal coordinates.
    let mut sorted_by_x = points.points().to_vec();
    sorted_by_x.sort_by(by_coordinate(|p| p.x));
    let mut sorted_by_y = points.points().to_vec();
    sorted_by_y.sort_by(by_coordinate(|p| p.y));

    let mut recorder = Recorder::default();
    let best = closest_util(&mut recorder, &sorted_by_x, &sorted_by_y);

    // A PointSet has at least two points, so some base case recorded a pair.
    let pair = best.pairs[0];
    debug!(
        steps = recorder.steps.len(),
        min_dist = best.min_dist,
        pair = ?(pair.0.id, pair.1.id),
        "closest-pair run finished"
    );
    ClosestPairRun {
        min_dist: best.min_dist,
        pair,
        all_pairs: best.pairs,
        steps: recorder.steps,
    }
}

fn closest_util(recorder: &mut Recorder, px: &[Point], py: &[Point]) -> Best {
    let n = px.len();
    if n <= BRUTE_FORCE_LIMIT {
        return brute_force(recorder, px);
    }

    let mid = n / 2;
    let mid_point = px[mid];
    let pyl: Vec<Point> = py.iter().filter(|p| p.x <= mid_point.x).copied().collect();
    let pyr: Vec<Point> = py.iter().filter(|p| p.x > mid_point.x).copied().collect();

    recorder.push(ClosestPairStep::divide(mid_point.x));

    let left = closest_util(recorder, &px[..mid], &pyl);
    let right = closest_util(recorder, &px[mid..], &pyr);

    let mut min_dist = left.min_dist.min(right.min_dist);
    let mut pairs = if left.min_dist < right.min_dist {
        left.pairs
    } else {
        right.pairs
    };

    let strip: Vec<Point> = py
        .iter()
        .filter(|p| (p.x - mid_point.x).abs() < min_dist)
        .copied()
        .collect();
    for i in 0..strip.len() {
        // The bound is re-read after every improvement.
        let mut j = i + 1;
        while j < strip.len() && strip[j].y - strip[i].y < min_dist {
            let dist = strip[i].distance(&strip[j]);
            let is_best = dist < min_dist;
            recorder.push(ClosestPairStep::comparison(
                Phase::Strip,
                &strip[i],
                &strip[j],
                dist,
                is_best,
                Some(mid_point.x),
            ));
            if is_best {
                min_dist = dist;
                pairs = vec![(strip[i], strip[j])];
            }
            j += 1;
        }
    }

    Best { min_dist, pairs }
}

fn brute_force(recorder: &mut Recorder, px: &[Point]) -> Best {
    let mut best = Best {
        min_dist: f64::INFINITY,
        pairs: Vec::new(),
    };
    for i in 0..px.len() {
        for j in i + 1..px.len() {
            let dist = px[i].distance(&px[j]);
            // An empty set accepts the first pair even if its distance overflowed.
            let is_best = best.pairs.is_empty() || dist < best.min_dist;
            recorder.push(ClosestPairStep::comparison(
                Phase::Base,
                &px[i],
                &px[j],
                dist,
                is_best,
                None,
            ));
            if is_best {
                best.min_dist = dist;
                best.pairs.clear();
                best.pairs.push((px[i], px[j]));
            }
        }
    }
    best
}
