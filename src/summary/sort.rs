use crate::slurm::cmp_or_empty;

use super::GroupRecord;

/// Orders groups by partition name, with unresolved partitions sorting as "".
/// A node-centric listing keeps the order in which groups were created.
///
/// The order of groups within the same partition is unspecified.
pub fn sort_groups(groups: &mut [GroupRecord], node_centric: bool) {
    if node_centric {
        return;
    }

    groups.sort_unstable_by(|a, b| cmp_or_empty(a.partition_name(), b.partition_name()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slurm::{node, partition, Node, NodeState};
    use crate::summary::{build_groups, MatchCriteria};

    fn partition_names<'a>(groups: &[GroupRecord<'a>]) -> Vec<Option<&'a str>> {
        groups.iter().map(GroupRecord::partition_name).collect()
    }

    fn by_partition_and_state() -> MatchCriteria {
        MatchCriteria {
            partition: true,
            state: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_by_partition() {
        let partitions = vec![partition("batch"), partition("gpu"), partition("debug")];
        let nodes = vec![
            node("n3", "gpu", NodeState::IDLE, 8),
            node("n1", "batch", NodeState::IDLE, 4),
            node("n4", "debug", NodeState::IDLE, 4),
            node("n2", "batch", NodeState::ALLOCATED, 4),
        ];

        let mut groups = build_groups(&nodes, &partitions, &by_partition_and_state());
        sort_groups(&mut groups, false);

        assert_eq!(
            partition_names(&groups),
            vec![Some("batch"), Some("batch"), Some("debug"), Some("gpu")]
        );

        // Either order is acceptable for the two "batch" groups
        let mut batch: Vec<String> = groups[..2].iter().map(|g| g.nodes.to_string()).collect();
        batch.sort();
        assert_eq!(batch, vec!["n1", "n2"]);
    }

    #[test]
    fn test_node_centric_keeps_order() {
        let partitions = vec![partition("batch"), partition("gpu")];
        let nodes = vec![
            node("n3", "gpu", NodeState::IDLE, 8),
            node("n1", "batch", NodeState::IDLE, 4),
        ];

        let mut groups = build_groups(&nodes, &partitions, &by_partition_and_state());
        sort_groups(&mut groups, true);
        assert_eq!(partition_names(&groups), vec![Some("gpu"), Some("batch")]);
    }

    #[test]
    fn test_unresolved_sorts_first() {
        let partitions = vec![partition("batch")];
        let mut orphan: Node = node("n9", "", NodeState::IDLE, 1);
        orphan.partition = Some("missing".to_string());
        let nodes = vec![node("n1", "batch", NodeState::IDLE, 4), orphan];

        let mut groups = build_groups(&nodes, &partitions, &by_partition_and_state());
        sort_groups(&mut groups, false);
        assert_eq!(partition_names(&groups), vec![None, Some("batch")]);
    }
}
