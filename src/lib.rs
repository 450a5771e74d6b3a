use serde::Serialize;
use sha2::{Digest, Sha256};

pub mod algorithms;
pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod playback;
pub mod point;

pub use algorithms::closest_pair::{ClosestPairRun, ClosestPairStep, Phase, closest_pair};
pub use algorithms::karatsuba::{KaratsubaRun, KaratsubaStep, TreeNode, multiply, multiply_u64};
pub use error::TraceError;
pub use point::{Point, PointSet};

pub fn digest_sha2(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Fingerprint of a step list: SHA-256 over its JSON encoding.
///
/// Two runs on the same input produce the same digest.
pub fn trace_digest<S: Serialize>(steps: &[S]) -> Result<[u8; 32], TraceError> {
    let encoded = serde_json::to_vec(steps)?;
    Ok(digest_sha2(&encoded))
}

/// Lowercase hex rendering of a digest.
pub fn to_hex(digest: &[u8]) -> String {
    hex::encode(digest)
}
