use anyhow::Result;
use clap::Parser;

use tagsync_cli::cli::{Cli, Commands, ConfigCommands};
use tagsync_cli::{commands, config, exit, observability};

fn main() {
    if let Err(e) = run() {
        std::process::exit(exit::report(&e));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::loader::load_config(cli.config.as_deref()).map_err(anyhow::Error::msg)?;
    observability::init_tracing(&cfg.logging.level);

    let format = cli.format.unwrap_or_default();
    let additional = cfg.additional_tags_with(&cli.additional);
    tracing::debug!(
        config = cli.config.as_deref().unwrap_or("tagsync.toml"),
        additional = additional.len(),
        requeue_interval_secs = cfg.reconcile.requeue_interval_secs,
        "configuration loaded"
    );

    match &cli.command {
        Commands::Reconcile(args) => {
            commands::reconcile::run(&cfg, additional, args, format)?;
        }
        Commands::Diff(args) => {
            commands::diff::run(additional, &args.existing, format)?;
        }
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => commands::config::show(&cfg)?,
        },
    }

    Ok(())
}
