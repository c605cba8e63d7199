use tracing::debug;

use crate::slurm::{or_empty, Node, Partition};

use super::{GroupRecord, MatchCriteria};

/// Looks up a partition by exact name; a missing name is looked up as ""
pub fn find_partition<'a>(
    partitions: &'a [Partition],
    name: Option<&str>,
) -> Option<&'a Partition> {
    let name = or_empty(name);
    partitions.iter().find(|partition| partition.name == name)
}

/// Folds `nodes` into groups of nodes that agree on every attribute selected
/// by `criteria`. Each node joins the first matching group, in order of
/// creation, or starts a new group at the end of the list.
///
/// Nodes whose partition cannot be found are grouped with a `None` partition.
pub fn build_groups<'a>(
    nodes: &'a [Node],
    partitions: &'a [Partition],
    criteria: &MatchCriteria,
) -> Vec<GroupRecord<'a>> {
    let mut groups: Vec<GroupRecord<'a>> = Vec::new();

    for node in nodes {
        let partition = find_partition(partitions, node.partition.as_deref());
        if partition.is_none() {
            debug!(node = %node.name, partition = node.partition_name(), "partition not found");
        }

        match groups
            .iter_mut()
            .find(|group| criteria.matches(group, node, partition))
        {
            Some(group) => group.absorb(node),
            None => groups.push(GroupRecord::new(node, partition)),
        }
    }

    debug!(nodes = nodes.len(), groups = groups.len(), "grouped nodes");
    groups
}
