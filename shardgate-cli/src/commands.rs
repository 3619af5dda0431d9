use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Partition, materialize and write the deployment manifest.
    Build {
        #[command(flatten)]
        build: BuildArgs,
        /// Write the manifest here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show how operations are classified and batched, without provisioning.
    Batches {
        #[command(flatten)]
        build: BuildArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode the router's compressed tables.
    Decode {
        #[command(flatten)]
        payload: PayloadArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run the router locally.
    Serve {
        #[command(flatten)]
        payload: PayloadArgs,
        #[command(flatten)]
        serve: ServeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
