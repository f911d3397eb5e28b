use clap::{Parser, Subcommand};
use nixdocs_config::Config;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nixdocs", version)]
#[command(about = "Compile nixpkgs documentation into Dash/Zeal docsets", long_about = None)]
pub struct Cli {
    /// Debug logging, and pass the output of nix through
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build docsets and manuals for nixpkgs revisions
    Build {
        /// Branches or revisions to build (e.g. master release-24.11 stable)
        #[arg(required = true)]
        revisions: Vec<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Revisions built concurrently
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Archive compression (gzip, bzip2, none, ...)
        #[arg(long)]
        compression: Option<String>,
    },

    /// Index the library documentation of a nixpkgs checkout
    Index {
        /// Root of the nixpkgs tree
        #[arg(long)]
        nixpkgs: PathBuf,

        /// Search index file to (re)create
        #[arg(long)]
        index: PathBuf,

        /// HTML listing to write
        #[arg(long)]
        output: PathBuf,

        /// Revision the tree belongs to
        #[arg(short, long, default_value = "master")]
        branch: String,
    },
}

impl Cli {
    /// Command-line flags take precedence over every configuration source.
    pub fn apply(&self, config: &mut Config) {
        if let Command::Build { output, jobs, compression, .. } = &self.command {
            if let Some(output) = output {
                config.output = output.clone();
            }
            if let Some(jobs) = jobs {
                config.jobs = *jobs;
            }
            if let Some(compression) = compression {
                config.compression = compression.clone();
            }
        }
    }
}
