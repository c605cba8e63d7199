mod fetch;
mod misc;
mod nodes;
mod partitions;
mod scontrol;
mod snapshot_dir;

use std::time::SystemTime;

pub use fetch::StateFetcher;
pub use misc::{cmp_or_empty, or_empty};
pub use nodes::{Node, NodeState, SlurmState};
pub use partitions::{Limit, Partition, Shared, TimeLimit};
pub use scontrol::Scontrol;
pub use snapshot_dir::SnapshotDir;

#[cfg(test)]
pub(crate) use fetch::tests::ScriptedController;
#[cfg(test)]
pub(crate) use nodes::node;
#[cfg(test)]
pub(crate) use partitions::partition;

use color_eyre::Result;

/// A complete set of records as of `last_update`
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<T> {
    pub last_update: SystemTime,
    pub records: Vec<T>,
}

impl<T> Snapshot<T> {
    /// Creates a snapshot of records fetched just now
    pub fn new(records: Vec<T>) -> Self {
        Self {
            last_update: SystemTime::now(),
            records,
        }
    }
}

/// Result of asking the controller for changes since a previous snapshot
#[derive(Debug)]
pub enum Update<T> {
    /// State has changed (or no previous snapshot was given)
    Changed(Snapshot<T>),
    /// Nothing has changed since the given time; the previous snapshot is still current
    Unchanged,
}

/// Source of partition and node state, e.g. the Slurm controller.
///
/// `since` is the `last_update` of the snapshot currently held by the caller, or
/// `None` if an unconditional transfer is required.
pub trait Controller {
    fn load_partitions(&self, since: Option<SystemTime>) -> Result<Update<Partition>>;

    fn load_nodes(&self, since: Option<SystemTime>) -> Result<Update<Node>>;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn load_partitions(&self, since: Option<SystemTime>) -> Result<Update<Partition>> {
        (**self).load_partitions(since)
    }

    fn load_nodes(&self, since: Option<SystemTime>) -> Result<Update<Node>> {
        (**self).load_nodes(since)
    }
}
