mod criteria;
mod filter;
mod group;
mod record;
mod sort;

pub use criteria::MatchCriteria;
pub use filter::{filter_nodes, Selection};
pub use group::{build_groups, find_partition};
pub use record::{GroupRecord, MinMax};
pub use sort::sort_groups;
