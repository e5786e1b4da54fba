//! # CLI Interface
//!
//! Command-line argument structure for the `vernal` binary, built on `clap`
//! derive. Every configurable value has a corresponding environment
//! variable for container-friendly deployment — because nobody wants to
//! pass half a dozen flags to a Docker entrypoint.

use clap::{Parser, Subcommand};

use vernal_protocol::config::DEFAULT_PORT;

/// Vernal — a Spring '83 server and tools.
///
/// Spring '83 is a small scale, independent publishing protocol that
/// doesn't encourage the bad feedback loops of traditional social media.
/// One key, one board, 2217 bytes, no counters.
#[derive(Parser, Debug)]
#[command(
    name = "vernal",
    about = "Vernal Spring '83 server and tools",
    version,
    propagate_version = true
)]
pub struct VernalCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `vernal` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the board server.
    Serve(ServeArgs),
    /// Brute-force a conforming Spring '83 keypair.
    ///
    /// Keys must end in `83eMMYY`, which builds an automatic challenge
    /// factor into generating one. This command runs the search across all
    /// hardware threads and, depending on the machine, may still take
    /// minutes to finish. Prints the private and public hex on success.
    Keygen,
    /// Print version information and exit.
    Version,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Port for the board API.
    #[arg(long, short = 'p', env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "METRICS_PORT", default_value_t = 9209)]
    pub metrics_port: u16,

    /// Object storage bucket holding board objects. When unset, boards
    /// live in process memory and die with it.
    #[arg(long, env = "GCP_STORAGE_BUCKET")]
    pub storage_bucket: Option<String>,

    /// Service account credentials JSON granting access to the bucket.
    #[arg(long, env = "GCP_CREDENTIALS_JSON", hide_env_values = true)]
    pub gcp_credentials_json: Option<String>,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}
