use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI parser for the `doc-insight` binary.
#[derive(Debug, Parser)]
#[command(
    name = "doc-insight",
    version,
    about = "Analyze documents with a four-stage LLM pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root containing `.doc-insight/` (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on, overriding `server.bind`
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Analyze a single document (PDF, or plain text for any other extension)
    Analyze {
        file: PathBuf,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent analysis sessions
    Sessions {
        /// Number of sessions to show
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Show totals over every stored session
    Summary,

    /// Create a `.doc-insight/` directory with the default config and prompts
    Init {
        /// Overwrite an existing `.doc-insight/` directory
        #[arg(short, long)]
        force: bool,

        /// Only write `config.toml`
        #[arg(long)]
        minimal: bool,
    },
}

impl Cli {
    /// The project root, falling back to the current directory.
    pub fn project_root(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }
}
