use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "xnx-install",
    about = "Install the prebuilt xnx binary into a Homebrew-style prefix"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Alternative formula descriptor (TOML). Defaults to the built-in xnx formula.
    #[arg(short, long, global = true)]
    pub formula: Option<PathBuf>,

    /// Install prefix (defaults to $HOMEBREW_PREFIX, then the platform default)
    #[arg(long, global = true)]
    pub prefix: Option<PathBuf>,

    /// Override the cellar root (defaults to <prefix>/Cellar)
    #[arg(long, global = true)]
    pub cellar: Option<PathBuf>,

    /// Override the directory receiving the symlink (defaults to <prefix>/bin)
    #[arg(long, global = true)]
    pub bin_dir: Option<PathBuf>,

    /// Download cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show package metadata and the download resolved for this host
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the download URL for this host or the given OS (Linux|macOS)
    Url {
        #[arg(long)]
        os: Option<String>,
    },
    /// Download, verify, extract and link
    Install {
        /// Use an already downloaded archive instead of fetching one
        #[arg(long, value_name = "PATH")]
        archive: Option<PathBuf>,
        /// Skip checksum verification of --archive (use with caution)
        #[arg(long, requires = "archive")]
        skip_verify: bool,
    },
    /// Remove the symlink and the installed keg
    Uninstall,
    /// Check the formula descriptor (digests, URLs, version)
    Verify,
}
