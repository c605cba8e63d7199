use std::time::SystemTime;

use color_eyre::eyre::{bail, Context};
use color_eyre::Result;
use tracing::{debug, info};

use super::{Controller, Node, Partition, Snapshot, Update};

/// Holds the most recent partition and node snapshots and refreshes them
/// differentially, re-using a snapshot when the controller reports no change
#[derive(Debug, Default)]
pub struct StateFetcher {
    partitions: Option<Snapshot<Partition>>,
    nodes: Option<Snapshot<Node>>,
}

impl StateFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings both snapshots up to date. The first call transfers everything;
    /// later calls only ask for changes since the snapshot currently held.
    ///
    /// Node records are returned mutably so that they may be filtered in place.
    pub fn fetch<C>(&mut self, controller: &C) -> Result<(&[Partition], &mut [Node])>
    where
        C: Controller + ?Sized,
    {
        refresh(&mut self.partitions, "partition", |since| {
            controller.load_partitions(since)
        })
        .wrap_err("failed to load partition information")?;

        refresh(&mut self.nodes, "node", |since| controller.load_nodes(since))
            .wrap_err("failed to load node information")?;

        match (&self.partitions, &mut self.nodes) {
            (Some(partitions), Some(nodes)) => {
                Ok((partitions.records.as_slice(), nodes.records.as_mut_slice()))
            }
            _ => bail!("no snapshot available"),
        }
    }

    pub fn partitions(&self) -> Option<&Snapshot<Partition>> {
        self.partitions.as_ref()
    }

    pub fn nodes(&self) -> Option<&Snapshot<Node>> {
        self.nodes.as_ref()
    }
}

/// Replaces `current` with a newer snapshot if the controller reports a change.
/// On failure `current` is left untouched.
fn refresh<T, F>(current: &mut Option<Snapshot<T>>, kind: &str, load: F) -> Result<()>
where
    F: FnOnce(Option<SystemTime>) -> Result<Update<T>>,
{
    let since = current.as_ref().map(|snapshot| snapshot.last_update);

    match load(since)? {
        Update::Changed(snapshot) => {
            debug!(kind, records = snapshot.records.len(), "received new snapshot");
            // The superseded snapshot is dropped here
            *current = Some(snapshot);
        }
        Update::Unchanged => match current {
            Some(snapshot) => {
                info!(kind, records = snapshot.records.len(), "no change in data");
            }
            None => bail!("controller reported no change, but no previous {} data exists", kind),
        },
    }

    Ok(())
}
