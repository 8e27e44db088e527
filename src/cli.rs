use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to config.yaml.
    ///
    /// *Falls back to $CLIPFEED_CONFIG, then ~/.config/clipfeed/config.yaml*
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the http api
    Serve {
        /// Address to listen on, overrides config
        #[clap(short, long)]
        listen: Option<String>,
    },
    /// Fetch videos for a tag once and print them as json
    Videos {
        /// Topic tag
        #[clap(short, long, default_value = "")]
        tag: String,
    },
    /// Print the upstream url requested for a tag
    Url {
        /// Topic tag
        #[clap(short, long, default_value = "")]
        tag: String,
    },
}
