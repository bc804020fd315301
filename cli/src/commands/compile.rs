use crate::argparse::CompileArgs;
use anyhow::Context;
use jsonpath_filter::{FilterSet, Term, TermJson};
use log::info;
use std::path::Path;

pub fn handle_compile_command(args: CompileArgs) -> anyhow::Result<()> {
    let mut filters = FilterSet::new();

    if let Some(path) = &args.terms_file {
        filters.extend(load_terms(path)?);
    }
    for filter in &args.filters {
        filters
            .add_from_string(filter)
            .with_context(|| format!("Invalid filter {:?}", filter))?;
    }
    if let Some(text) = &args.all_like {
        filters.set_all_like(text.as_str());
    }

    if args.list {
        for filter in filters.to_filter_strings() {
            println!("{}", filter);
        }
    }

    match filters.create_json_path() {
        Some(json_path) => println!("{}", json_path),
        None => info!("No filter terms given, nothing to compile"),
    }
    Ok(())
}

fn load_terms(path: &Path) -> anyhow::Result<Vec<Term>> {
    let contents = fs_err::read_to_string(path)?;
    let payloads: Vec<TermJson> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse terms file {}", path.display()))?;
    let terms = payloads
        .into_iter()
        .map(Term::from_json)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid term in {}", path.display()))?;
    info!("Loaded {} terms from {}", terms.len(), path.display());
    Ok(terms)
}
