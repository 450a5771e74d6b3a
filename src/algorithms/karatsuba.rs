//! Karatsuba multiplication with a recorded recursion trace.
//!
//! Every call of the recursion produces one [`TreeNode`] and either a single
//! `base` step or a `split` step followed, after its three sub-products, by a
//! `combine` step. Node ids come from a per-run counter and grow with call
//! start order, so `nodes[id].id == id`.

use crate::playback::TraceStep;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

fn decimal<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Operation-specific payload of a [`KaratsubaStep`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum Operation {
    Base {
        #[serde(serialize_with = "decimal")]
        x: BigUint,
        #[serde(serialize_with = "decimal")]
        y: BigUint,
        #[serde(serialize_with = "decimal")]
        result: BigUint,
    },
    Split {
        #[serde(serialize_with = "decimal")]
        x: BigUint,
        #[serde(serialize_with = "decimal")]
        y: BigUint,
        #[serde(serialize_with = "decimal")]
        high1: BigUint,
        #[serde(serialize_with = "decimal")]
        low1: BigUint,
        #[serde(serialize_with = "decimal")]
        high2: BigUint,
        #[serde(serialize_with = "decimal")]
        low2: BigUint,
        m: u32,
    },
    Combine {
        #[serde(serialize_with = "decimal")]
        z0: BigUint,
        #[serde(serialize_with = "decimal")]
        z1: BigUint,
        #[serde(serialize_with = "decimal")]
        z2: BigUint,
        m: u32,
        #[serde(serialize_with = "decimal")]
        result: BigUint,
    },
}

/// One recorded event of a Karatsuba run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KaratsubaStep {
    pub depth: usize,
    #[serde(flatten)]
    pub operation: Operation,
    pub node_id: usize,
    pub description: String,
}

impl KaratsubaStep {
    pub fn is_combine(&self) -> bool {
        matches!(self.operation, Operation::Combine { .. })
    }
}

impl TraceStep for KaratsubaStep {
    fn label(&self) -> String {
        self.description.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Base,
    Split {
        #[serde(serialize_with = "decimal")]
        high1: BigUint,
        #[serde(serialize_with = "decimal")]
        low1: BigUint,
        #[serde(serialize_with = "decimal")]
        high2: BigUint,
        #[serde(serialize_with = "decimal")]
        low2: BigUint,
        m: u32,
    },
}

/// A resolved node of the recursion tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: usize,
    pub parent_id: Option<usize>,
    pub depth: usize,
    #[serde(serialize_with = "decimal")]
    pub x: BigUint,
    #[serde(serialize_with = "decimal")]
    pub y: BigUint,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(serialize_with = "decimal")]
    pub result: BigUint,
}

impl TreeNode {
    pub fn is_base(&self) -> bool {
        matches!(self.kind, NodeKind::Base)
    }
}

/// A node whose sub-products are still being computed.
#[derive(Debug, Clone)]
struct PendingNode {
    id: usize,
    parent_id: Option<usize>,
    depth: usize,
    x: BigUint,
    y: BigUint,
    kind: NodeKind,
}

impl PendingNode {
    fn resolve(self, result: BigUint) -> TreeNode {
        TreeNode {
            id: self.id,
            parent_id: self.parent_id,
            depth: self.depth,
            x: self.x,
            y: self.y,
            kind: self.kind,
            result,
        }
    }
}

#[derive(Debug)]
enum NodeSlot {
    Pending(PendingNode),
    Resolved(TreeNode),
}

/// Per-run accumulator threaded through the recursion.
#[derive(Debug, Default)]
struct Recorder {
    steps: Vec<KaratsubaStep>,
    slots: Vec<NodeSlot>,
}

impl Recorder {
    fn open(
        &mut self,
        parent_id: Option<usize>,
        depth: usize,
        x: &BigUint,
        y: &BigUint,
        kind: NodeKind,
    ) -> usize {
        let id = self.slots.len();
        self.slots.push(NodeSlot::Pending(PendingNode {
            id,
            parent_id,
            depth,
            x: x.clone(),
            y: y.clone(),
            kind,
        }));
        id
    }

    fn resolve(&mut self, id: usize, result: BigUint) {
        let slot = &mut self.slots[id];
        match slot {
            NodeSlot::Pending(pending) => {
                let node = pending.clone().resolve(result);
                *slot = NodeSlot::Resolved(node);
            }
            NodeSlot::Resolved(_) => debug_assert!(false, "node {id} resolved twice"),
        }
    }

    fn push(&mut self, step: KaratsubaStep) {
        trace!(node_id = step.node_id, depth = step.depth, "{}", step.description);
        self.steps.push(step);
    }

    fn finish(self, result: BigUint) -> KaratsubaRun {
        let expected = self.slots.len();
        let nodes: Vec<TreeNode> = self
            .slots
            .into_iter()
            .filter_map(|slot| match slot {
                NodeSlot::Resolved(node) => Some(node),
                NodeSlot::Pending(_) => None,
            })
            .collect();
        debug_assert_eq!(nodes.len(), expected, "unresolved nodes after run");
        KaratsubaRun {
            result,
            steps: self.steps,
            nodes,
        }
    }
}

/// Product, step list and recursion tree of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KaratsubaRun {
    #[serde(serialize_with = "decimal")]
    pub result: BigUint,
    pub steps: Vec<KaratsubaStep>,
    pub nodes: Vec<TreeNode>,
}

impl KaratsubaRun {
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: usize) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

fn digit_count(value: &BigUint) -> usize {
    if value.is_zero() {
        1
    } else {
        value.to_str_radix(10).len()
    }
}

/// Multiplies `x` and `y`, recording every split, base case and combine.
pub fn multiply(x: &BigUint, y: &BigUint) -> KaratsubaRun {
    debug!(x = %x, y = %y, "karatsuba run started");
    let mut recorder = Recorder::default();
    let result = multiply_node(&mut recorder, x, y, 0, None);
    let run = recorder.finish(result);
    debug!(
        steps = run.steps.len(),
        nodes = run.nodes.len(),
        result = %run.result,
        "karatsuba run finished"
    );
    run
}

pub fn multiply_u64(x: u64, y: u64) -> KaratsubaRun {
    multiply(&BigUint::from(x), &BigUint::from(y))
}

fn multiply_node(
    recorder: &mut Recorder,
    x: &BigUint,
    y: &BigUint,
    depth: usize,
    parent_id: Option<usize>,
) -> BigUint {
    let ten = BigUint::from(10u32);

    if x < &ten || y < &ten {
        let result = x * y;
        let id = recorder.open(parent_id, depth, x, y, NodeKind::Base);
        recorder.resolve(id, result.clone());
        recorder.push(KaratsubaStep {
            depth,
            description: format!("Base: {x} × {y} = {result}"),
            operation: Operation::Base {
                x: x.clone(),
                y: y.clone(),
                result: result.clone(),
            },
            node_id: id,
        });
        return result;
    }

    let n = digit_count(x).max(digit_count(y));
    let m = (n / 2) as u32;
    let p = ten.pow(m);
    let high1 = x / &p;
    let low1 = x % &p;
    let high2 = y / &p;
    let low2 = y % &p;

    let id = recorder.open(
        parent_id,
        depth,
        x,
        y,
        NodeKind::Split {
            high1: high1.clone(),
            low1: low1.clone(),
            high2: high2.clone(),
            low2: low2.clone(),
            m,
        },
    );
    recorder.push(KaratsubaStep {
        depth,
        description: format!(
            "Split: {x} = {high1}·10^{m} + {low1}, {y} = {high2}·10^{m} + {low2}"
        ),
        operation: Operation::Split {
            x: x.clone(),
            y: y.clone(),
            high1: high1.clone(),
            low1: low1.clone(),
            high2: high2.clone(),
            low2: low2.clone(),
            m,
        },
        node_id: id,
    });

    // z0, z1, z2 in this order; it fixes both step order and node ids.
    let z0 = multiply_node(recorder, &low1, &low2, depth + 1, Some(id));
    let z1 = multiply_node(
        recorder,
        &(&low1 + &high1),
        &(&low2 + &high2),
        depth + 1,
        Some(id),
    );
    let z2 = multiply_node(recorder, &high1, &high2, depth + 1, Some(id));

    // z1 - z2 - z0 = low1*high2 + high1*low2, never negative.
    let middle = &z1 - &z2 - &z0;
    let result = &z2 * ten.pow(2 * m) + middle * &p + &z0;

    recorder.resolve(id, result.clone());
    recorder.push(KaratsubaStep {
        depth,
        description: format!("Combine: {result}"),
        operation: Operation::Combine {
            z0,
            z1,
            z2,
            m,
            result: result.clone(),
        },
        node_id: id,
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_base_case_single_step() {
        let run = multiply_u64(7, 8);
        assert_eq!(run.result, big(56));
        assert_eq!(run.steps.len(), 1);
        assert_eq!(run.nodes.len(), 1);
        assert_eq!(
            run.steps[0].operation,
            Operation::Base {
                x: big(7),
                y: big(8),
                result: big(56)
            }
        );
        assert_eq!(run.steps[0].description, "Base: 7 × 8 = 56");
        let root = run.root().unwrap();
        assert!(root.is_base());
        assert_eq!(root.parent_id, None);
        assert_eq!(root.result, big(56));
    }

    #[test]
    fn test_zero_operand_is_base_case() {
        let run = multiply_u64(0, 987_654_321);
        assert_eq!(run.result, big(0));
        assert_eq!(run.steps.len(), 1);
        assert_eq!(run.nodes.len(), 1);
    }

    #[test]
    fn test_1234_times_5678() {
        let run = multiply_u64(1234, 5678);
        assert_eq!(run.result, big(7_006_652));
        assert_eq!(
            run.steps[0].operation,
            Operation::Split {
                x: big(1234),
                y: big(5678),
                high1: big(12),
                low1: big(34),
                high2: big(56),
                low2: big(78),
                m: 2
            }
        );
        assert_eq!(
            run.steps[0].description,
            "Split: 1234 = 12·10^2 + 34, 5678 = 56·10^2 + 78"
        );
        let last = run.steps.last().unwrap();
        assert!(last.is_combine());
        assert_eq!(last.node_id, 0);
        assert_eq!(last.description, "Combine: 7006652");
    }

    #[test]
    fn test_first_child_is_low_product() {
        let run = multiply_u64(1234, 5678);
        let child = run.node(1).unwrap();
        assert_eq!(child.parent_id, Some(0));
        assert_eq!(child.depth, 1);
        assert_eq!(child.x, big(34));
        assert_eq!(child.y, big(78));
        assert_eq!(child.result, big(34 * 78));
    }

    #[test]
    fn test_asymmetric_split_keeps_zero_high_part() {
        // 12345 has five digits, 67 two: both split at m = 2.
        let run = multiply_u64(12345, 67);
        assert_eq!(run.result, big(12345 * 67));
        match &run.steps[0].operation {
            Operation::Split {
                high1,
                low1,
                high2,
                low2,
                m,
                ..
            } => {
                assert_eq!(*m, 2);
                assert_eq!(*high1, big(123));
                assert_eq!(*low1, big(45));
                assert_eq!(*high2, big(0));
                assert_eq!(*low2, big(67));
            }
            other => panic!("expected split, got {other:?}"),
        }
        // z2 = 123 × 0 is its own base call.
        let z2 = run
            .nodes
            .iter()
            .rev()
            .find(|n| n.parent_id == Some(0))
            .unwrap();
        assert_eq!(z2.y, big(0));
        assert_eq!(z2.result, big(0));
    }

    #[test]
    fn test_nodes_indexed_by_id_and_resolved() {
        let run = multiply_u64(98_765_432, 12_345_678);
        for (index, node) in run.nodes.iter().enumerate() {
            assert_eq!(node.id, index);
            assert_eq!(node.result, &node.x * &node.y);
        }
    }

    #[test]
    fn test_beyond_u64_range() {
        let x: BigUint = "123456789012345678901234567890".parse().unwrap();
        let y: BigUint = "987654321098765432109876543210".parse().unwrap();
        let run = multiply(&x, &y);
        assert_eq!(run.result, &x * &y);
        assert_eq!(run.root().unwrap().result, run.result);
    }

    #[test]
    fn test_json_uses_decimal_strings() {
        let run = multiply_u64(7, 8);
        let json = serde_json::to_value(&run.steps[0]).unwrap();
        assert_eq!(json["operation"], "base");
        assert_eq!(json["x"], "7");
        assert_eq!(json["result"], "56");
        assert_eq!(json["nodeId"], 0);
        let node = serde_json::to_value(&run.nodes[0]).unwrap();
        assert_eq!(node["type"], "base");
        assert!(node["parentId"].is_null());
    }
}
