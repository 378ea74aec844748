//! Command-line interface for proze
//! This binary compiles a proze project into a finished document.
//!
//! Usage:
//!   proze `<doctype>` [--path `<dir>`] [--output `<base>`] [--config `<file>`]
//!   proze --list-formats

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use proze::proze::{compile_project, CompileRequest, StrategyRegistry};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("proze")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile a proze project")
        .arg(
            Arg::new("doctype")
                .help("The output format of the compiled document (txt, pdf)")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .short('p')
                .help("Path to the root folder of the proze project")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file path without extension (default: <path>/output)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file to use instead of the one in the project folder")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let registry = StrategyRegistry::with_defaults();

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return Ok(());
    }

    let root = match matches.get_one::<PathBuf>("path") {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let doctype = matches
        .get_one::<String>("doctype")
        .context("Missing doctype")?;

    let mut request = CompileRequest::new(root, doctype.as_str());
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        request = request.with_output(output);
    }
    if let Some(config) = matches.get_one::<PathBuf>("config") {
        request = request.with_config(config);
    }

    compile_project(&request, &registry)
        .with_context(|| format!("Failed to compile {}", request.root.display()))?;
    Ok(())
}

/// Handle the --list-formats flag
fn handle_list_formats_command(registry: &StrategyRegistry) {
    println!("Available output formats:\n");
    for name in registry.list_strategies() {
        if let Some(strategy) = registry.get(&name) {
            println!("  {}", name);
            println!("    {}", strategy.description());
        }
    }
}
