//! Instrumented divide-and-conquer engines.
//!
//! Each engine computes its answer and, in the same pass, records an ordered
//! trace of the primitive operations it performed.

pub mod closest_pair;
pub mod karatsuba;
