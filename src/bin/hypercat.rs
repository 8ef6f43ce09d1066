//! Command-line front end for the Hypercat catalogue model.
//!
//! Builds a catalogue from a description, decodes catalogues or items from
//! JSON (file, stdin, or inline), and runs flat searches, printing the encoded
//! result on stdout. Errors go to stderr with exit status 1.

use anyhow::{Context, Result, bail};
use hypercat::logging::init_logging;
use hypercat::{Catalogue, Item, load_catalogue_from_path, load_item_from_path};
use std::env;
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;

/// When set to a non-empty value other than `0`, output defaults to pretty JSON.
const PRETTY_ENV: &str = "HYPERCAT_PRETTY";

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse(env::args_os().skip(1), pretty_from_env())?;
    let output = match args.command {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Create { description } => {
            let catalogue = Catalogue::new(description).context("creating catalogue")?;
            encode_catalogue(&catalogue, args.pretty)?
        }
        Command::Parse { source } => {
            let catalogue = source.catalogue()?;
            encode_catalogue(&catalogue, args.pretty)?
        }
        Command::Item { source } => {
            let item = source.item()?;
            if args.pretty {
                item.to_pretty_json()?
            } else {
                item.to_json()?
            }
        }
        Command::Search { query, source } => {
            let catalogue = source.catalogue()?;
            let results = catalogue.search(&query);
            encode_catalogue(&results, args.pretty)?
        }
    };
    println!("{output}");
    Ok(())
}

fn encode_catalogue(catalogue: &Catalogue, pretty: bool) -> Result<String> {
    let text = if pretty {
        catalogue.to_pretty_json()?
    } else {
        catalogue.to_json()?
    };
    Ok(text)
}

fn pretty_from_env() -> bool {
    env::var(PRETTY_ENV)
        .ok()
        .map(|v| !v.trim().is_empty() && v != "0")
        .unwrap_or(false)
}

#[derive(Debug)]
enum Command {
    Create { description: String },
    Parse { source: InputSource },
    Item { source: InputSource },
    Search { query: String, source: InputSource },
    Help,
}

#[derive(Debug, PartialEq)]
enum InputSource {
    File(PathBuf),
    Stdin,
    Inline(String),
}

impl InputSource {
    fn catalogue(&self) -> Result<Catalogue> {
        match self {
            InputSource::File(path) => load_catalogue_from_path(path)
                .with_context(|| format!("loading catalogue from {}", path.display())),
            InputSource::Stdin => {
                Catalogue::from_json(&read_stdin()?).context("decoding catalogue from stdin")
            }
            InputSource::Inline(text) => {
                Catalogue::from_json(text).context("decoding catalogue from --json")
            }
        }
    }

    fn item(&self) -> Result<Item> {
        match self {
            InputSource::File(path) => load_item_from_path(path)
                .with_context(|| format!("loading item from {}", path.display())),
            InputSource::Stdin => Item::from_json(&read_stdin()?).context("decoding item from stdin"),
            InputSource::Inline(text) => Item::from_json(text).context("decoding item from --json"),
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}

#[derive(Debug)]
struct CliArgs {
    command: Command,
    pretty: bool,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = OsString>, pretty_default: bool) -> Result<Self> {
        let mut args = args.into_iter();
        let Some(subcommand) = args.next() else {
            bail!(usage());
        };
        let subcommand = subcommand
            .into_string()
            .map_err(|_| anyhow::anyhow!("subcommand is not valid UTF-8"))?;
        if matches!(subcommand.as_str(), "--help" | "-h" | "help") {
            return Ok(CliArgs {
                command: Command::Help,
                pretty: pretty_default,
            });
        }

        let mut pretty = pretty_default;
        let mut description: Option<String> = None;
        let mut query: Option<String> = None;
        let mut source: Option<InputSource> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--pretty" => pretty = true,
                "--description" => description = Some(next_value(&mut args, "--description")?),
                "--query" => query = Some(next_value(&mut args, "--query")?),
                "--file" => {
                    let path = next_value(&mut args, "--file")?;
                    set_source(&mut source, InputSource::File(PathBuf::from(path)))?;
                }
                "--stdin" => set_source(&mut source, InputSource::Stdin)?,
                "--json" => {
                    let text = next_value(&mut args, "--json")?;
                    set_source(&mut source, InputSource::Inline(text))?;
                }
                "--help" | "-h" => {
                    return Ok(CliArgs {
                        command: Command::Help,
                        pretty,
                    });
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        let command = match subcommand.as_str() {
            "create" => {
                if source.is_some() {
                    bail!("create does not read input; use --description");
                }
                let Some(description) = description else {
                    bail!("create requires --description");
                };
                Command::Create { description }
            }
            "parse" => Command::Parse {
                source: source.unwrap_or(InputSource::Stdin),
            },
            "item" => Command::Item {
                source: source.unwrap_or(InputSource::Stdin),
            },
            "search" => {
                let Some(query) = query else {
                    bail!("search requires --query");
                };
                Command::Search {
                    query,
                    source: source.unwrap_or(InputSource::Stdin),
                }
            }
            other => bail!("unknown subcommand: {other}\n\n{}", usage()),
        };

        Ok(CliArgs { command, pretty })
    }
}

fn set_source(slot: &mut Option<InputSource>, source: InputSource) -> Result<()> {
    if slot.is_some() {
        bail!("--file/--stdin/--json may only be provided once");
    }
    *slot = Some(source);
    Ok(())
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: hypercat <command> [options]\n\n\
Commands:\n  \
create --description TEXT                      Build a minimal catalogue.\n  \
parse  [--file PATH|--stdin|--json TEXT]       Decode and re-encode a catalogue.\n  \
item   [--file PATH|--stdin|--json TEXT]       Decode and re-encode a single item.\n  \
search --query QUERY [--file PATH|--stdin|--json TEXT]\n                                                 \
Search a catalogue (href=, rel=, val= joined by &).\n\n\
Options:\n  \
--pretty    Indent output (default when HYPERCAT_PRETTY is set).\n"
}

fn print_usage() {
    print!("{}", usage());
}
