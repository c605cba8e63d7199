use std::collections::HashSet;

use tracing::debug;

use crate::slurm::{Node, NodeState};

/// Nodes the user asked to see. Predicates that are `None` match every node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Names of the nodes to show
    pub nodes: Option<HashSet<String>>,
    pub partition: Option<String>,
    pub state: Option<NodeState>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_none() && self.partition.is_none() && self.state.is_none()
    }

    /// Tests a node against every active predicate. A state predicate also
    /// matches nodes that are flagged as not responding.
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(nodes) = &self.nodes {
            if !nodes.contains(&node.name) {
                return false;
            }
        }

        if let Some(partition) = &self.partition {
            if node.partition_name() != partition {
                return false;
            }
        }

        if let Some(state) = self.state {
            if node.state != state && node.state.responding() != state {
                return false;
            }
        }

        true
    }
}

/// Moves the nodes matching `selection` to the front of `nodes`, preserving
/// their relative order, and returns their number. Nodes past that count are
/// left in unspecified order.
///
/// Nodes are left untouched if nothing was selected or if a summary across
/// all partitions was requested.
pub fn filter_nodes(nodes: &mut [Node], selection: &Selection, summarize: bool) -> usize {
    if summarize || selection.is_empty() {
        return nodes.len();
    }

    let mut kept = 0;
    for idx in 0..nodes.len() {
        if selection.matches(&nodes[idx]) {
            if kept != idx {
                nodes.swap(kept, idx);
            }
            kept += 1;
        }
    }

    debug!(kept, total = nodes.len(), "filtered nodes");
    kept
}
