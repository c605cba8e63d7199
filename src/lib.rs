/// Orchestration of reports
pub mod app;
/// Command-line arguments
pub mod args;
/// Settings derived from command-line arguments
pub mod config;
/// Report columns
pub mod format;
/// Host list expressions
pub mod hostlist;
/// Querying of Slurm state
pub mod slurm;
/// Grouping of nodes into summary records
pub mod summary;
/// Report writer
pub mod ui;
/// Custom widgets
pub mod widgets;
