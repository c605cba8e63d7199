use std::io::Write;

use chrono::{DateTime, TimeZone};
use color_eyre::eyre::Context;
use color_eyre::Result;
use ratatui::{buffer::Buffer, widgets::StatefulWidget};

use crate::config::Config;
use crate::summary::GroupRecord;
use crate::widgets::{SummaryTable, SummaryTableState};

/// Writes summary reports as column-aligned text
#[derive(Debug)]
pub struct Presenter<'c> {
    config: &'c Config,
}

impl<'c> Presenter<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Renders the table into an off-screen buffer and returns its rows with
    /// trailing whitespace removed
    pub fn render(&self, groups: &[GroupRecord]) -> Result<Vec<String>> {
        let columns = &self.config.format.columns;
        let mut state = SummaryTableState::new(columns, groups, self.config.long);
        let area = SummaryTable::area(&state)?;
        let mut buf = Buffer::empty(area);
        SummaryTable::new().render(area, &mut buf, &mut state);

        let lines = (area.top()..area.bottom())
            .map(|y| {
                let line = (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>();

                line.trim_end().to_string()
            })
            .collect();

        Ok(lines)
    }

    /// Writes the date line preceding a report, e.g. `Tue Oct 13 09:05:00 2026`
    pub fn write_date<W, Tz>(&self, out: &mut W, date: &DateTime<Tz>) -> Result<()>
    where
        W: Write,
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        writeln!(out, "{}", date.format("%a %b %e %H:%M:%S %Y")).wrap_err("failed to write date")
    }

    /// Writes a report; repeated reports are separated by a blank line
    pub fn write_report<W: Write>(&self, out: &mut W, groups: &[GroupRecord]) -> Result<()> {
        for line in self.render(groups)? {
            writeln!(out, "{}", line).wrap_err("failed to write report")?;
        }

        if self.config.iterate.is_some() {
            writeln!(out).wrap_err("failed to write report")?;
        }

        out.flush().wrap_err("failed to write report")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::args::Args;
    use crate::slurm::{node, partition, Node, NodeState};
    use crate::summary::build_groups;

    fn config_from(args: Args) -> Config {
        Config::from_args(&args).unwrap()
    }

    #[test]
    fn test_render() {
        let config = config_from(Args::default());
        let partitions = vec![partition("batch"), partition("gpu")];
        let nodes = vec![
            node("n1", "batch", NodeState::IDLE, 4),
            node("n2", "batch", NodeState::IDLE, 4),
            node("g10", "gpu", NodeState::ALLOCATED, 8),
        ];
        let groups = build_groups(&nodes, &partitions, &config.criteria);

        let lines = Presenter::new(&config).render(&groups).unwrap();
        assert_eq!(
            lines,
            vec![
                "PARTITION AVAIL TIMELIMIT NODES STATE     NODELIST",
                "batch     up    infinite      2 idle      n[1-2]",
                "gpu       up    infinite      1 allocated g10",
            ]
        );
    }

    #[test]
    fn test_render_empty() {
        let config = config_from(Args {
            format: Some("partition,nodes".to_string()),
            ..Default::default()
        });

        let lines = Presenter::new(&config).render(&[]).unwrap();
        assert_eq!(lines, vec!["PARTITION NODES"]);
    }

    #[test]
    fn test_render_too_many_rows() {
        let config = config_from(Args {
            format: Some("nodes".to_string()),
            ..Default::default()
        });
        let batch = partition("batch");
        let nodes: Vec<Node> = (0..u16::MAX)
            .map(|i| node(&format!("n{}", i), "batch", NodeState::IDLE, 1))
            .collect();
        let groups: Vec<GroupRecord> = nodes
            .iter()
            .map(|node| GroupRecord::new(node, Some(&batch)))
            .collect();

        let err = Presenter::new(&config).render(&groups).unwrap_err();
        assert!(err.to_string().contains("too many rows"));
    }

    #[test]
    fn test_write_report() {
        let config = config_from(Args {
            format: Some("nodes".to_string()),
            ..Default::default()
        });
        let mut out = Vec::new();
        Presenter::new(&config).write_report(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "NODES\n");

        let mut config = config;
        config.iterate = Some(Duration::from_secs(1));
        let mut out = Vec::new();
        Presenter::new(&config).write_report(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "NODES\n\n");
    }

    #[test]
    fn test_write_date() {
        let config = config_from(Args::default());
        let date = Utc.with_ymd_and_hms(2026, 10, 6, 9, 5, 0).unwrap();

        let mut out = Vec::new();
        Presenter::new(&config).write_date(&mut out, &date).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Tue Oct  6 09:05:00 2026\n");
    }
}
