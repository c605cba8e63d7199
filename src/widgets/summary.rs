use ratatui::text::Text;

use crate::format::Column;
use crate::slurm::{Limit, Partition};
use crate::summary::GroupRecord;

use super::{
    misc::{range_to_string, right_align_text},
    table::{GenericTable, GenericTableState},
};

pub type SummaryTable<'g, 'a> = GenericTable<Column, SummaryTableState<'g, 'a>>;

/// Rows of summarized nodes, one per group
#[derive(Debug)]
pub struct SummaryTableState<'g, 'a> {
    /// Visible columns
    columns: &'g [Column],
    groups: &'g [GroupRecord<'a>],
    /// Show ranges as `min-max` rather than `min+`
    long: bool,
}

impl<'g, 'a> SummaryTableState<'g, 'a> {
    pub fn new(columns: &'g [Column], groups: &'g [GroupRecord<'a>], long: bool) -> Self {
        Self {
            columns,
            groups,
            long,
        }
    }

    fn partition_text(partition: Option<&Partition>, column: Column) -> String {
        // Nodes whose partition could not be found have no partition attributes
        let Some(partition) = partition else {
            return String::new();
        };

        match column {
            Column::Partition => partition.to_string(),
            Column::Avail => partition.avail().to_string(),
            Column::TimeLimit => partition.max_time.to_string(),
            Column::JobSize => match partition.max_nodes {
                Limit::Finite(max) if max == partition.min_nodes => max.to_string(),
                max => format!("{}-{}", partition.min_nodes, max),
            },
            Column::Root => yes_no(partition.root_only).to_string(),
            Column::Share => partition.shared.to_string(),
            Column::Groups => partition
                .allow_groups
                .clone()
                .unwrap_or_else(|| "all".to_string()),
            _ => String::new(),
        }
    }
}

impl GenericTableState<Column> for SummaryTableState<'_, '_> {
    fn nrows(&self) -> usize {
        self.groups.len()
    }

    fn columns(&self) -> &[Column] {
        self.columns
    }

    fn text<'t>(&self, row: usize, column: Column) -> Text<'t> {
        let group = &self.groups[row];

        let text = match column {
            Column::Partition
            | Column::Avail
            | Column::TimeLimit
            | Column::JobSize
            | Column::Root
            | Column::Share
            | Column::Groups => Self::partition_text(group.partition, column),
            Column::Features => group.features.unwrap_or("(null)").to_string(),
            Column::State => group.state.to_string(),
            Column::Nodes => group.nodes_total.to_string(),
            Column::NodesAiot => format!(
                "{}/{}/{}/{}",
                group.nodes_alloc, group.nodes_idle, group.nodes_other, group.nodes_total
            ),
            Column::Cpus => range_to_string(&group.cpus, self.long),
            Column::Memory => range_to_string(&group.memory, self.long),
            Column::TmpDisk => range_to_string(&group.disk, self.long),
            Column::Weight => range_to_string(&group.weight, self.long),
            Column::NodeList => group.nodes.to_string(),
        };

        if column.is_numeric() {
            right_align_text(text)
        } else {
            Text::from(text)
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
