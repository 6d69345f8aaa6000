//! First/last-use derivation from the execution order.

use crate::analysis::GraphUsage;
use crate::execution::ExecutionPath;

/// Fills `first_used`/`last_used` per target from the nodes recorded in
/// `node_usage` that have a known execution order. Targets with no ordered
/// use keep both fields None. Iteration is ascending node index, so results
/// are stable.
pub fn compute_lifetimes(usage: &mut GraphUsage, path: &ExecutionPath) {
    for target in &mut usage.targets {
        let mut first: Option<(u32, u32)> = None;
        let mut last: Option<(u32, u32)> = None;
        for &node in target.node_usage.keys() {
            let Some(order) = path.order_of(node) else {
                continue;
            };
            if first.is_none_or(|(o, _)| order < o) {
                first = Some((order, node));
            }
            if last.is_none_or(|(o, _)| order > o) {
                last = Some((order, node));
            }
        }
        target.first_used = first.map(|(_, node)| node);
        target.last_used = last.map(|(_, node)| node);
    }
}
