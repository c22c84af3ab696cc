//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "reform")]
#[command(
    author,
    version,
    about = "Improve renovation descriptions with retrieved context"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Improve a description
    Improve(ImproveArgs),

    /// Start the HTTP server
    Serve(ServeArgs),

    /// List vector index collections
    Collections,

    /// Show resolved settings
    Config,
}

#[derive(Args)]
pub struct ImproveArgs {
    /// Description text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Print the reply as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Generation model (used only for single-word input)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(short, long)]
    pub temperature: Option<f32>,
}

impl ImproveArgs {
    pub fn joined(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Args)]
pub struct ServeArgs {
    /// Bind host
    #[arg(long, env = "REFORM_HOST", default_value = reform_server::DEFAULT_HOST)]
    pub host: String,

    /// Bind port
    #[arg(short, long, env = "REFORM_PORT", default_value_t = reform_server::DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
