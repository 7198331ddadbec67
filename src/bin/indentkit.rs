//! Command-line interface for indentkit
//!
//! Usage:
//!   indentkit tokenize `<path>` [--classifier `<name>`] [--format `<format>`]  - Print the token stream
//!   indentkit scaffold `<root>` `<spec>` [--dry-run] [--clear] [--debug]      - Build a directory tree
//!   indentkit symbols [`<path>`] [--lookup `<sym>`]... [--imports `<sym>`]...  - Query a symbols file

use clap::{Arg, ArgAction, ArgMatches, Command};
use indentkit::classify::{Classifier, DefaultClassifier, ScaffoldClassifier, SymbolsClassifier};
use indentkit::levels::LevelTracker;
use indentkit::scaffold::{build_tree_with, render_ops};
use indentkit::settings::{IndentKitConfig, Loader, PROJECT_CONFIG};
use indentkit::symbols::SymbolTable;
use indentkit::{logging, tokenize_with, Token};
use serde::Serialize;
use std::error::Error;
use std::fmt::Display;
use std::path::Path;

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() {
    let matches = Command::new("indentkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize indentation structured documents, build scaffolds and query symbols files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Configuration file layered over the defaults and ./indentkit.toml"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .subcommand(
            Command::new("tokenize")
                .about("Print the token stream of a document")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("classifier")
                        .long("classifier")
                        .short('c')
                        .help("Line classifier")
                        .value_parser(["default", "scaffold", "symbols"])
                        .default_value("default"),
                )
                .arg(format_arg(&["simple", "json", "yaml"], "simple")),
        )
        .subcommand(
            Command::new("scaffold")
                .about("Build a directory tree from a scaffold description")
                .arg(
                    Arg::new("root")
                        .help("Directory to build into")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("spec")
                        .help("Path to the scaffold description")
                        .required(true)
                        .index(2),
                )
                .arg(flag("dry-run", "Print the operations instead of performing them"))
                .arg(flag("clear", "Remove an existing root directory first"))
                .arg(flag("debug", "Log the planned operations"))
                .arg(format_arg(&["table", "json", "yaml"], "table")),
        )
        .subcommand(
            Command::new("symbols")
                .about("Load a symbols file and query it")
                .arg(
                    Arg::new("path")
                        .help("Path to the symbols file (default: symbols.path setting)")
                        .index(1),
                )
                .arg(flag("check-files", "Fail if a library path does not exist"))
                .arg(
                    Arg::new("lookup")
                        .long("lookup")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .help("Print the library providing each symbol"),
                )
                .arg(
                    Arg::new("imports")
                        .long("imports")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .help("Print the import statements needed for the symbols"),
                ),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help).action(ArgAction::SetTrue)
}

fn format_arg(formats: &[&'static str], default: &'static str) -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(formats.to_vec())
        .default_value(default)
}

fn run(matches: &ArgMatches) -> CliResult<()> {
    let config = load_config(matches)?;
    let level = matches
        .get_one::<String>("log-level")
        .unwrap_or(&config.log.level);
    logging::init(level);

    match matches.subcommand() {
        Some(("tokenize", sub)) => handle_tokenize_command(sub, &config),
        Some(("scaffold", sub)) => handle_scaffold_command(sub, &config),
        Some(("symbols", sub)) => handle_symbols_command(sub, &config),
        _ => unreachable!(),
    }
}

/// Defaults, then ./indentkit.toml, then --config, then flags.
fn load_config(matches: &ArgMatches) -> CliResult<IndentKitConfig> {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(("scaffold", sub)) = matches.subcommand() {
        for (flag, key) in [
            ("dry-run", "scaffold.dry_run"),
            ("clear", "scaffold.clear"),
            ("debug", "scaffold.debug"),
        ] {
            if sub.get_flag(flag) {
                loader = loader.set_override(key, true)?;
            }
        }
    }
    if let Some(("symbols", sub)) = matches.subcommand() {
        if sub.get_flag("check-files") {
            loader = loader.set_override("symbols.check_files", true)?;
        }
    }
    Ok(loader.build()?)
}

/// Handle the tokenize command
fn handle_tokenize_command(matches: &ArgMatches, config: &IndentKitConfig) -> CliResult<()> {
    let path = required(matches, "path");
    let format = required(matches, "format");
    let source = read_source(path)?;
    let mut tracker = config.indent.tracker()?;

    let output = match required(matches, "classifier") {
        "scaffold" => render_tokens(&mut tracker, &source, &mut ScaffoldClassifier, format)?,
        "symbols" => render_tokens(&mut tracker, &source, &mut SymbolsClassifier, format)?,
        _ => render_tokens(&mut tracker, &source, &mut DefaultClassifier, format)?,
    };
    println!("{}", output);
    Ok(())
}

fn render_tokens<C>(
    tracker: &mut LevelTracker,
    source: &str,
    classifier: &mut C,
    format: &str,
) -> CliResult<String>
where
    C: Classifier,
    C::Kind: Display + Serialize,
{
    let tokens = tokenize_with(tracker, source, classifier)?;
    Ok(match format {
        "json" => serde_json::to_string_pretty(&tokens)?,
        "yaml" => serde_yaml::to_string(&tokens)?,
        _ => simple_tokens(&tokens),
    })
}

/// One token per line, content indented by its depth.
fn simple_tokens<K: Display>(tokens: &[Token<K>]) -> String {
    let mut depth = 0usize;
    let mut lines = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Indent => {
                lines.push(format!("{}{}", "  ".repeat(depth), token));
                depth += 1;
            }
            Token::Undent => {
                depth = depth.saturating_sub(1);
                lines.push(format!("{}{}", "  ".repeat(depth), token));
            }
            Token::Content(_) => lines.push(format!("{}{}", "  ".repeat(depth), token)),
        }
    }
    lines.join("\n")
}

/// Handle the scaffold command
fn handle_scaffold_command(matches: &ArgMatches, config: &IndentKitConfig) -> CliResult<()> {
    let root = required(matches, "root");
    let spec = read_source(required(matches, "spec"))?;
    let options = config.scaffold.options();
    let mut tracker = config.indent.tracker()?;

    let ops = build_tree_with(&mut tracker, root, &spec, &options)?;
    if !options.scaffold {
        return Ok(());
    }
    let output = match required(matches, "format") {
        "json" => serde_json::to_string_pretty(&ops)?,
        "yaml" => serde_yaml::to_string(&ops)?,
        _ => render_ops(&ops),
    };
    println!("{}", output);
    Ok(())
}

/// Handle the symbols command
fn handle_symbols_command(matches: &ArgMatches, config: &IndentKitConfig) -> CliResult<()> {
    let path = matches
        .get_one::<String>("path")
        .map(Path::new)
        .unwrap_or(config.symbols.path.as_path());
    let table = SymbolTable::from_path(path, &config.symbols.options("."))?;

    let lookups = values(matches, "lookup");
    let imports = values(matches, "imports");

    if lookups.is_empty() && imports.is_empty() {
        for (symbol, lib) in table.entries() {
            println!("{}\t{}", symbol, lib);
        }
        return Ok(());
    }
    for symbol in lookups {
        match table.source_lib(symbol) {
            Some(lib) => println!("{}\t{}", symbol, lib),
            None => println!("{}\t(not found)", symbol),
        }
    }
    for statement in table.needed_import_statements(imports) {
        println!("{}", statement);
    }
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn values<'a>(matches: &'a ArgMatches, name: &str) -> Vec<&'a str> {
    matches
        .get_many::<String>(name)
        .map(|vals| vals.map(String::as_str).collect())
        .unwrap_or_default()
}

fn read_source(path: &str) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e).into())
}
