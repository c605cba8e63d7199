use crate::slurm::{or_empty, Node, Partition};

use super::GroupRecord;

/// Attributes on which nodes must agree to be summarized in the same group.
/// Attributes that are switched off are ignored when matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    /// Partition availability (up/down)
    pub avail: bool,
    /// Node features
    pub features: bool,
    /// Groups allowed to use the partition
    pub groups: bool,
    /// Minimum and maximum job size of the partition
    pub job_size: bool,
    /// Partition time limit
    pub max_time: bool,
    /// Partition name
    pub partition: bool,
    /// Partition is restricted to root
    pub root: bool,
    /// Node sharing policy of the partition
    pub share: bool,
    /// Node state, including the "not responding" modifier
    pub state: bool,
}

impl MatchCriteria {
    pub fn all() -> Self {
        Self {
            avail: true,
            features: true,
            groups: true,
            job_size: true,
            max_time: true,
            partition: true,
            root: true,
            share: true,
            state: true,
        }
    }

    /// Tests if a node and its partition agree with the group on every active
    /// attribute. An unresolved partition only matches another unresolved partition.
    pub fn matches(&self, group: &GroupRecord, node: &Node, partition: Option<&Partition>) -> bool {
        let ours = group.partition;

        if self.avail && !same(ours, partition, |p| p.state_up) {
            return false;
        }
        if self.features && or_empty(group.features) != or_empty(node.features.as_deref()) {
            return false;
        }
        if self.groups
            && ours.map(|p| or_empty(p.allow_groups.as_deref()))
                != partition.map(|p| or_empty(p.allow_groups.as_deref()))
        {
            return false;
        }
        if self.job_size && !same(ours, partition, |p| (p.min_nodes, p.max_nodes)) {
            return false;
        }
        if self.max_time && !same(ours, partition, |p| p.max_time) {
            return false;
        }
        if self.partition && group.partition_name() != partition.map(|p| p.name.as_str()) {
            return false;
        }
        if self.root && !same(ours, partition, |p| p.root_only) {
            return false;
        }
        if self.share && !same(ours, partition, |p| p.shared) {
            return false;
        }
        if self.state && group.state != node.state {
            return false;
        }

        true
    }
}

fn same<T, F>(a: Option<&Partition>, b: Option<&Partition>, attribute: F) -> bool
where
    T: PartialEq,
    F: Fn(&Partition) -> T,
{
    a.map(&attribute) == b.map(&attribute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slurm::{node, partition, Limit, NodeState, Shared, TimeLimit};

    #[test]
    fn test_inactive_criteria_are_wildcards() {
        let batch = partition("batch");
        let mut gpu = partition("gpu");
        gpu.state_up = false;
        gpu.max_time = TimeLimit::Minutes(60);
        gpu.shared = Shared::Force;

        let n1 = node("n1", "batch", NodeState::IDLE, 4);
        let n2 = node("n2", "gpu", NodeState::ALLOCATED, 8);
        let group = GroupRecord::new(&n1, Some(&batch));

        assert!(MatchCriteria::default().matches(&group, &n2, Some(&gpu)));
        assert!(!MatchCriteria::all().matches(&group, &n2, Some(&gpu)));
    }

    #[test]
    fn test_single_criteria() {
        let batch = partition("batch");
        let n1 = node("n1", "batch", NodeState::IDLE, 4);
        let group = GroupRecord::new(&n1, Some(&batch));

        type Change = fn(&mut Partition, &mut Node);
        let cases: [(fn(&mut MatchCriteria), Change); 9] = [
            (|c| c.avail = true, |p, _| p.state_up = false),
            (|c| c.features = true, |_, n| n.features = Some("gpu".to_string())),
            (|c| c.groups = true, |p, _| p.allow_groups = Some("staff".to_string())),
            (|c| c.job_size = true, |p, _| p.max_nodes = Limit::Finite(4)),
            (|c| c.max_time = true, |p, _| p.max_time = TimeLimit::Minutes(5)),
            (|c| c.partition = true, |p, _| p.name = "other".to_string()),
            (|c| c.root = true, |p, _| p.root_only = true),
            (|c| c.share = true, |p, _| p.shared = Shared::Yes),
            (|c| c.state = true, |_, n| n.state = NodeState::IDLE.not_responding()),
        ];

        for (enable, change) in cases {
            let mut criteria = MatchCriteria::default();
            enable(&mut criteria);

            let mut other_partition = batch.clone();
            let mut other_node = node("n2", "batch", NodeState::IDLE, 4);
            assert!(criteria.matches(&group, &other_node, Some(&other_partition)));

            change(&mut other_partition, &mut other_node);
            let matches = criteria.matches(&group, &other_node, Some(&other_partition));
            assert!(!matches, "{:?}", criteria);

            let wildcard = MatchCriteria::default();
            assert!(wildcard.matches(&group, &other_node, Some(&other_partition)));
        }
    }

    #[test]
    fn test_missing_strings_are_empty() {
        let mut batch = partition("batch");
        batch.allow_groups = Some(String::new());
        let mut n1 = node("n1", "batch", NodeState::IDLE, 4);
        n1.features = Some(String::new());
        let group = GroupRecord::new(&n1, Some(&batch));

        let mut other = partition("batch");
        other.allow_groups = None;
        let n2 = node("n2", "batch", NodeState::IDLE, 4);

        let criteria = MatchCriteria {
            features: true,
            groups: true,
            ..Default::default()
        };
        assert!(criteria.matches(&group, &n2, Some(&other)));
    }

    #[test]
    fn test_unresolved_partition() {
        let batch = partition("batch");
        let orphan = node("n1", "missing", NodeState::IDLE, 4);
        let group = GroupRecord::new(&orphan, None);

        let criteria = MatchCriteria {
            partition: true,
            avail: true,
            ..Default::default()
        };
        assert!(criteria.matches(&group, &node("n2", "gone", NodeState::IDLE, 4), None));
        assert!(!criteria.matches(
            &group,
            &node("n3", "batch", NodeState::IDLE, 4),
            Some(&batch)
        ));
        assert!(MatchCriteria::default().matches(
            &group,
            &node("n3", "batch", NodeState::IDLE, 4),
            Some(&batch)
        ));
    }
}
