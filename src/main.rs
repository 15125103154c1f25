//! Binary entry point: parse options, bring up logging, start the catalog
//! fetch and hand control to either the TUI or the plain-text listing.
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use catalog_browser::catalog::{CatalogFetch, GraphqlCatalog};
use catalog_browser::cli::Cli;
use catalog_browser::logging::{self, LogTarget};
use catalog_browser::{listing, run_app, App, AppConfig};

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let target = if cli.print {
        LogTarget::Stderr
    } else {
        LogTarget::File(logging::default_log_path()?)
    };
    logging::init(&target).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    let source =
        GraphqlCatalog::new(cli.endpoint.as_str(), cli.timeout()).context("build catalog client")?;
    tracing::info!(endpoint = source.endpoint(), print = cli.print, "starting catalog browser");

    if cli.print {
        return listing::run(&cli, &source);
    }

    let config = AppConfig {
        slicing: cli.slicing(),
        asset_base: cli.asset_base.clone(),
    };
    let mut app = App::new(CatalogFetch::spawn(source), config);
    run_app(&mut app)
}
