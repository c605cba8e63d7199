use std::path::PathBuf;
use std::time::Duration;

use color_eyre::eyre::Context;
use color_eyre::Result;

use crate::args::Args;
use crate::format::Format;
use crate::hostlist;
use crate::slurm::{Controller, NodeState, Scontrol, SnapshotDir};
use crate::summary::{MatchCriteria, Selection};

/// Where partition and node state is read from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Query the controller using the given `scontrol` executable
    Scontrol(String),
    /// Read snapshots from a directory
    Snapshots(PathBuf),
}

impl Source {
    pub fn controller(&self) -> Box<dyn Controller> {
        match self {
            Source::Scontrol(exe) => Box::new(Scontrol::new(exe.as_str())),
            Source::Snapshots(path) => Box::new(SnapshotDir::new(path.clone())),
        }
    }
}

/// Settings for a run, derived once from the command-line
#[derive(Clone, Debug)]
pub struct Config {
    pub source: Source,
    pub selection: Selection,
    pub criteria: MatchCriteria,
    pub format: Format,
    pub summarize: bool,
    pub node_centric: bool,
    pub long: bool,
    pub verbose: bool,
    /// Delay between reports; `None` to report once
    pub iterate: Option<Duration>,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let nodes = match &args.nodes {
            Some(expr) => Some(
                hostlist::expand(expr)
                    .wrap_err("invalid --nodes")?
                    .into_iter()
                    .collect(),
            ),
            None => None,
        };

        let state = match &args.state {
            Some(value) => Some(
                value
                    .parse::<NodeState>()
                    .wrap_err_with(|| format!("invalid --state {:?}", value))?,
            ),
            None => None,
        };

        let format = match &args.format {
            Some(value) => value.parse::<Format>().wrap_err("invalid --format")?,
            None => Format::default_for(args.summarize, args.node_oriented, args.long),
        };

        let source = match &args.snapshots {
            Some(path) => Source::Snapshots(path.clone()),
            None => Source::Scontrol(args.scontrol.clone()),
        };

        Ok(Self {
            source,
            selection: Selection {
                nodes,
                partition: args.partition.clone(),
                state,
            },
            criteria: format.criteria(),
            format,
            summarize: args.summarize,
            node_centric: args.node_oriented,
            long: args.long,
            verbose: args.verbose,
            iterate: (args.iterate > 0).then(|| Duration::from_secs(args.iterate)),
        })
    }

    /// The date is printed above each report when monitoring in detail
    pub fn show_date(&self) -> bool {
        self.iterate.is_some() && (self.verbose || self.long)
    }
}
