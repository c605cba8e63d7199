use crate::hostlist::HostList;
use crate::slurm::{Node, NodeState, Partition};

/// Smallest and largest value seen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + Ord> MinMax<T> {
    pub fn new(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn widen(&mut self, value: T) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn is_single(&self) -> bool {
        self.min == self.max
    }
}

/// Summary of a set of nodes that agree on every attribute being matched on.
///
/// The partition, state, and features are those of the first node added; the
/// remaining fields are aggregated over every member.
#[derive(Clone, Debug)]
pub struct GroupRecord<'a> {
    /// Partition of the first member; `None` if it could not be resolved
    pub partition: Option<&'a Partition>,
    pub state: NodeState,
    pub features: Option<&'a str>,

    pub cpus: MinMax<u32>,
    /// Memory in MB
    pub memory: MinMax<u64>,
    /// Temporary disk space in MB
    pub disk: MinMax<u64>,
    pub weight: MinMax<u32>,

    /// Nodes in the allocated state
    pub nodes_alloc: usize,
    /// Nodes in the idle state
    pub nodes_idle: usize,
    /// Nodes in any other state, including non-responding allocated/idle nodes
    pub nodes_other: usize,
    pub nodes_total: usize,

    /// Names of member nodes
    pub nodes: HostList,
}

impl<'a> GroupRecord<'a> {
    /// Creates a group with `node` as its representative and only member
    pub fn new(node: &'a Node, partition: Option<&'a Partition>) -> Self {
        let mut group = Self {
            partition,
            state: node.state,
            features: node.features.as_deref(),
            cpus: MinMax::new(node.cpus),
            memory: MinMax::new(node.real_memory),
            disk: MinMax::new(node.tmp_disk),
            weight: MinMax::new(node.weight),
            nodes_alloc: 0,
            nodes_idle: 0,
            nodes_other: 0,
            nodes_total: 0,
            nodes: HostList::new(),
        };

        group.absorb(node);
        group
    }

    /// Adds a node to the group, updating counters and ranges
    pub fn absorb(&mut self, node: &Node) {
        match node.state {
            NodeState::ALLOCATED => self.nodes_alloc += 1,
            NodeState::IDLE => self.nodes_idle += 1,
            _ => self.nodes_other += 1,
        }
        self.nodes_total += 1;

        self.cpus.widen(node.cpus);
        self.memory.widen(node.real_memory);
        self.disk.widen(node.tmp_disk);
        self.weight.widen(node.weight);

        self.nodes.push(node.name.as_str());
    }

    pub fn partition_name(&self) -> Option<&'a str> {
        self.partition.map(|partition| partition.name.as_str())
    }
}
