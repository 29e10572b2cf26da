use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "placement")]
#[command(bin_name = "placement")]
#[command(version)]
#[command(about = "Predict a candidate's placement package from their profile")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Write a diagnostics log under the config directory"
    )]
    pub diagnostics: bool,

    #[arg(
        long,
        global = true,
        value_name = "URL",
        help = "Prediction endpoint, overriding the environment and config file"
    )]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run configuration and endpoint checks")]
    Doctor,
}
