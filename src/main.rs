//! Compiles the nixpkgs library reference, the Nixpkgs and NixOS manuals and
//! the NixOS options reference into Dash/Zeal docsets, one per revision.

mod cli;
mod error;
mod library;
mod locators;
mod manuals;
mod nix;
mod pipeline;
mod revision;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use crate::nix::Nix;
use crate::pipeline::Context;
use clap::Parser;
use exn::ResultExt;
use nixdocs_config::Config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    cli.apply(&mut config);
    config.validate().or_raise(|| ErrorKind::Config)?;
    let nix = Nix::locate(&config.nix, &config.store_root)?.verbose(cli.verbose);
    match cli.command {
        Command::Build { revisions, .. } => {
            let revisions = revision::resolve(&revisions, &config.stable_branch);
            tracing::info!(revisions = ?revisions.iter().map(|r| &r.name).collect::<Vec<_>>(), "building");
            let context = Context::new(&config, nix)?;
            pipeline::build_all(&context, revisions).await
        },
        Command::Index { nixpkgs, index, output, branch } => {
            pipeline::index_library(&nix, &nixpkgs, &index, &output, config.listing_policy, &branch).await
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}
