use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use color_eyre::eyre::Context;
use color_eyre::Result;
use tracing::debug;

use super::{Controller, Node, Partition, Snapshot, Update};

pub const PARTITIONS_FILE: &str = "partitions.csv";
pub const NODES_FILE: &str = "nodes.csv";

/// Reads controller state dumped to `partitions.csv` and `nodes.csv` in a
/// directory. The modification time of each file serves as its update time,
/// so unmodified files are reported as unchanged without being re-read.
#[derive(Clone, Debug)]
pub struct SnapshotDir {
    path: PathBuf,
}

impl SnapshotDir {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn load<T, F>(&self, name: &str, since: Option<SystemTime>, parse: F) -> Result<Update<T>>
    where
        F: FnOnce(BufReader<File>) -> Result<Vec<T>>,
    {
        let path = self.path.join(name);
        let modified = modified(&path)?;

        if since.is_some_and(|since| modified <= since) {
            debug!(path = %path.display(), "snapshot file not modified");
            return Ok(Update::Unchanged);
        }

        let file = File::open(&path).wrap_err_with(|| format!("failed to open {:?}", path))?;
        let records = parse(BufReader::new(file))
            .wrap_err_with(|| format!("failed to parse {:?}", path))?;

        Ok(Update::Changed(Snapshot {
            last_update: modified,
            records,
        }))
    }
}

fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .wrap_err_with(|| format!("failed to stat {:?}", path))
}

impl Controller for SnapshotDir {
    fn load_partitions(&self, since: Option<SystemTime>) -> Result<Update<Partition>> {
        self.load(PARTITIONS_FILE, since, Partition::parse)
    }

    fn load_nodes(&self, since: Option<SystemTime>) -> Result<Update<Node>> {
        self.load(NODES_FILE, since, Node::parse)
    }
}
