use std::path::PathBuf;

use clap::Parser;

/// Briefcast podcast synthesis service
#[derive(Debug, Parser)]
#[command(name = "briefcast", about = "Script-to-podcast text-to-speech synthesis service")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "briefcast.toml", env = "BRIEFCAST_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "BRIEFCAST_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
