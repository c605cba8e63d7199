use std::fmt;
use std::str::FromStr;

use color_eyre::eyre::{bail, eyre, Context};
use color_eyre::Result;

use crate::summary::MatchCriteria;

/// A column of the summary report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Partition,
    Avail,
    TimeLimit,
    JobSize,
    Root,
    Share,
    Groups,
    Features,
    State,
    Nodes,
    /// Nodes as allocated/idle/other/total
    NodesAiot,
    Cpus,
    Memory,
    TmpDisk,
    Weight,
    NodeList,
}

impl Column {
    const ALL: [Column; 16] = [
        Column::Partition,
        Column::Avail,
        Column::TimeLimit,
        Column::JobSize,
        Column::Root,
        Column::Share,
        Column::Groups,
        Column::Features,
        Column::State,
        Column::Nodes,
        Column::NodesAiot,
        Column::Cpus,
        Column::Memory,
        Column::TmpDisk,
        Column::Weight,
        Column::NodeList,
    ];

    /// Name used to select the column with `--format`
    pub fn name(&self) -> &'static str {
        match self {
            Column::Partition => "partition",
            Column::Avail => "avail",
            Column::TimeLimit => "timelimit",
            Column::JobSize => "jobsize",
            Column::Root => "root",
            Column::Share => "share",
            Column::Groups => "groups",
            Column::Features => "features",
            Column::State => "state",
            Column::Nodes => "nodes",
            Column::NodesAiot => "nodes_aiot",
            Column::Cpus => "cpus",
            Column::Memory => "memory",
            Column::TmpDisk => "tmp_disk",
            Column::Weight => "weight",
            Column::NodeList => "nodelist",
        }
    }

    /// Numeric columns are right aligned
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Column::Nodes
                | Column::Cpus
                | Column::Memory
                | Column::TmpDisk
                | Column::Weight
                | Column::JobSize
        )
    }

    /// Enables the criterion that nodes must share to be shown in one row;
    /// aggregated columns do not constrain grouping
    fn restrict(&self, criteria: &mut MatchCriteria) {
        match self {
            Column::Partition => criteria.partition = true,
            Column::Avail => criteria.avail = true,
            Column::TimeLimit => criteria.max_time = true,
            Column::JobSize => criteria.job_size = true,
            Column::Root => criteria.root = true,
            Column::Share => criteria.share = true,
            Column::Groups => criteria.groups = true,
            Column::Features => criteria.features = true,
            Column::State => criteria.state = true,
            Column::Nodes
            | Column::NodesAiot
            | Column::Cpus
            | Column::Memory
            | Column::TmpDisk
            | Column::Weight
            | Column::NodeList => {}
        }
    }
}

/// Column header
impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Column::Partition => "PARTITION",
            Column::Avail => "AVAIL",
            Column::TimeLimit => "TIMELIMIT",
            Column::JobSize => "JOB_SIZE",
            Column::Root => "ROOT",
            Column::Share => "SHARE",
            Column::Groups => "GROUPS",
            Column::Features => "FEATURES",
            Column::State => "STATE",
            Column::Nodes => "NODES",
            Column::NodesAiot => "NODES(A/I/O/T)",
            Column::Cpus => "CPUS",
            Column::Memory => "MEMORY",
            Column::TmpDisk => "TMP_DISK",
            Column::Weight => "WEIGHT",
            Column::NodeList => "NODELIST",
        })
    }
}

impl FromStr for Column {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Column::ALL
            .into_iter()
            .find(|column| column.name() == name)
            .ok_or_else(|| eyre!("unknown column {:?}", s))
    }
}

/// Ordered list of columns to display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Format {
    pub columns: Vec<Column>,
}

impl Format {
    /// Selects the default columns for the requested kind of report
    pub fn default_for(summarize: bool, node_centric: bool, long: bool) -> Self {
        use Column::*;

        let columns = match (summarize, node_centric, long) {
            (true, _, _) => vec![Partition, Avail, TimeLimit, NodesAiot, NodeList],
            (false, true, false) => vec![NodeList, Nodes, Partition, State],
            (false, true, true) => vec![
                NodeList, Nodes, Partition, State, Cpus, Memory, TmpDisk, Weight, Features,
            ],
            (false, false, false) => vec![Partition, Avail, TimeLimit, Nodes, State, NodeList],
            (false, false, true) => vec![
                Partition, Avail, TimeLimit, JobSize, Root, Share, Groups, Nodes, State, NodeList,
            ],
        };

        Self { columns }
    }

    /// Nodes are grouped by every attribute shown in a non-aggregated column
    pub fn criteria(&self) -> MatchCriteria {
        let mut criteria = MatchCriteria::default();
        for column in &self.columns {
            column.restrict(&mut criteria);
        }

        criteria
    }
}

/// Parses a comma separated list of column names, e.g. `partition,nodes,nodelist`
impl FromStr for Format {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let columns = s
            .split(',')
            .filter(|v| !v.trim().is_empty())
            .map(Column::from_str)
            .collect::<Result<Vec<_>>>()
            .wrap_err_with(|| format!("invalid format {:?}", s))?;

        if columns.is_empty() {
            bail!("format {:?} contains no columns", s);
        }

        Ok(Self { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        let format: Format = "partition, NODES ,nodelist".parse().unwrap();
        assert_eq!(
            format.columns,
            vec![Column::Partition, Column::Nodes, Column::NodeList]
        );

        assert!("partition,bogus".parse::<Format>().is_err());
        assert!(",,".parse::<Format>().is_err());
    }

    #[test]
    fn test_column_names() {
        for column in Column::ALL {
            assert_eq!(column.name().parse::<Column>().unwrap(), column);
        }
    }

    #[test]
    fn test_default_criteria() {
        let criteria = Format::default_for(false, false, false).criteria();
        assert_eq!(
            criteria,
            MatchCriteria {
                partition: true,
                avail: true,
                max_time: true,
                state: true,
                ..Default::default()
            }
        );

        let criteria = Format::default_for(true, false, true).criteria();
        assert_eq!(
            criteria,
            MatchCriteria {
                partition: true,
                avail: true,
                max_time: true,
                ..Default::default()
            }
        );

        let criteria = Format::default_for(false, false, true).criteria();
        assert!(criteria.job_size && criteria.root && criteria.share && criteria.groups);
        assert!(!criteria.features);
    }

    #[test]
    fn test_aggregated_columns() {
        let format: Format = "nodes,nodes_aiot,cpus,memory,tmp_disk,weight,nodelist"
            .parse()
            .unwrap();
        assert_eq!(format.criteria(), MatchCriteria::default());
    }

    #[test]
    fn test_node_oriented() {
        let format = Format::default_for(false, true, true);
        assert_eq!(format.columns[0], Column::NodeList);
        assert!(format.columns.contains(&Column::Features));
        assert!(format.criteria().features);
    }
}
