use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jpf",
    about = "Compile search filters into a JSONPath filter predicate",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile filter strings into a single JSONPath predicate
    Compile(CompileArgs),
    /// Parse one filter string and show the resulting term
    Parse(ParseArgs),
}

#[derive(Args)]
pub struct CompileArgs {
    /// Filters in compact form: `key:value`, `key~regex` or free text
    pub filters: Vec<String>,

    /// Free-text search over the whole document
    #[arg(long)]
    pub all_like: Option<String>,

    /// JSON file with an array of persisted terms to start from
    #[arg(long)]
    pub terms_file: Option<PathBuf>,

    /// Print the compact form of every resulting term before the predicate
    #[arg(long)]
    pub list: bool,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Filter in compact form: `key:value`, `key~regex` or free text
    pub filter: String,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
