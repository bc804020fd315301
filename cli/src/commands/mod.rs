mod compile;
mod parse;

use crate::argparse::Commands;
pub use compile::handle_compile_command;
pub use parse::handle_parse_command;

pub fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Compile(args) => handle_compile_command(args),
        Commands::Parse(args) => handle_parse_command(args),
    }
}
