use std::path::PathBuf;

use argh::FromArgs;

/// Report the state of partitions and nodes managed by Slurm
#[derive(FromArgs, Debug, Default)]
pub struct Args {
    /// only report on the listed nodes, e.g. `n[01-04],login`
    #[argh(option, short = 'n')]
    pub nodes: Option<String>,

    /// only report on the named partition
    #[argh(option, short = 'p')]
    pub partition: Option<String>,

    /// only report on nodes in the given state; a trailing `*` selects nodes
    /// that are not responding
    #[argh(option, short = 't')]
    pub state: Option<String>,

    /// repeat the report every N seconds; a value of zero reports once
    #[argh(option, short = 'i', default = "0")]
    pub iterate: u64,

    /// summarize partitions, counting nodes as allocated/idle/other/total
    #[argh(switch, short = 's')]
    pub summarize: bool,

    /// list nodes rather than partitions
    #[argh(switch, short = 'N')]
    pub node_oriented: bool,

    /// report more details
    #[argh(switch, short = 'l')]
    pub long: bool,

    /// comma separated list of columns, e.g. `partition,nodes,state,nodelist`
    #[argh(option, short = 'o')]
    pub format: Option<String>,

    /// log details of each query to stderr
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// read `partitions.csv` and `nodes.csv` from a directory instead of
    /// querying the controller
    #[argh(option)]
    pub snapshots: Option<PathBuf>,

    /// location of `scontrol` executable
    #[argh(option, default = "\"scontrol\".to_string()")]
    pub scontrol: String,

    /// print version information
    #[argh(switch, short = 'V')]
    pub version: bool,
}
