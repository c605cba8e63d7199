use std::io;
use std::sync::atomic::Ordering;

use color_eyre::eyre::Context;
use color_eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use slurminfo::app::App;
use slurminfo::args::Args;
use slurminfo::config::Config;

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("slurminfo={}", level)))
        .wrap_err("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    if args.version {
        println!("slurminfo v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    color_eyre::install()?;
    init_logging(args.verbose)?;

    let config = Config::from_args(&args)?;
    let controller = config.source.controller();
    let mut app = App::new(config, controller);

    let running = app.running();
    ctrlc::set_handler(move || {
        info!("received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })
    .wrap_err("failed to install signal handler")?;

    app.run(&mut io::stdout().lock())
}
