use clap::{ArgAction, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Socket address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8002")]
    pub listen: SocketAddr,

    #[arg(
        help = "Directory to serve files from (--help for more)",
        long_help = r"Directory to serve files from:
    - resolved to an absolute path at startup
    - everything readable under it is served, nothing above it ever is
Examples:
    - .
    - ./public
    - /var/www/site"
    )]
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,
}
