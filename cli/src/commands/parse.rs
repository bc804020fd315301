use crate::argparse::ParseArgs;
use anyhow::Context;
use jsonpath_filter::Term;

pub fn handle_parse_command(args: ParseArgs) -> anyhow::Result<()> {
    let term: Term = args
        .filter
        .parse()
        .with_context(|| format!("Invalid filter {:?}", args.filter))?;

    println!("{}", serde_json::to_string_pretty(&term)?);
    println!("compact:  {}", term);
    println!("jsonpath: {}", term.to_json_path());
    Ok(())
}
