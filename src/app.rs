use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use color_eyre::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::slurm::{Controller, StateFetcher};
use crate::summary::{build_groups, filter_nodes, sort_groups};
use crate::ui::Presenter;

/// Granularity with which termination is noticed while waiting between reports
const SLEEP_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct App<C: Controller> {
    /// Settings for the run
    pub config: Config,
    controller: C,
    fetcher: StateFetcher,
    /// Cleared to stop repeated reports
    running: Arc<AtomicBool>,
}

impl<C: Controller> App<C> {
    pub fn new(config: Config, controller: C) -> Self {
        Self {
            config,
            controller,
            fetcher: StateFetcher::new(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns a flag that stops the application when cleared, e.g. from a signal handler
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Fetches, filters, groups, sorts, and writes a single report
    pub fn cycle<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let presenter = Presenter::new(&self.config);
        if self.config.show_date() {
            presenter.write_date(out, &Local::now())?;
        }

        let (partitions, nodes) = self.fetcher.fetch(&self.controller)?;
        let kept = filter_nodes(nodes, &self.config.selection, self.config.summarize);
        let nodes = &nodes[..kept];

        let mut groups = build_groups(nodes, partitions, &self.config.criteria);
        sort_groups(&mut groups, self.config.node_centric);
        debug!(groups = groups.len(), "writing report");

        presenter.write_report(out, &groups)
    }

    /// Writes a report, repeating it every `iterate` interval until stopped.
    /// A failed fetch ends the run with an error.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        loop {
            self.cycle(out)?;

            match self.config.iterate {
                Some(interval) if self.sleep(interval) => {}
                Some(_) => {
                    info!("terminated");
                    break;
                }
                None => break,
            }
        }

        Ok(())
    }

    /// Waits for `interval`; returns false if the application was stopped meanwhile
    fn sleep(&self, interval: Duration) -> bool {
        let mut remaining = interval;
        while remaining > Duration::ZERO && self.running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(SLEEP_SLICE);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }

        self.running.load(Ordering::SeqCst)
    }
}
