//! nodemeta - Tool for inspecting and building node metadata files.

use std::env;
use std::path::Path;

use node_metadata::io::{binary, json};
use node_metadata::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Build command - create a file from key:type=value arguments
        "build" | "b" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing output file");
                eprintln!("Usage: nodemeta build <out.nmd> <key:type=value>...");
                std::process::exit(1);
            }
            cmd_build(filtered_args[1], &filtered_args[2..])
        }

        // Dump command - slot table
        "dump" | "d" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: nodemeta dump <file.nmd>");
                std::process::exit(1);
            }
            cmd_dump(filtered_args[1])
        }

        // JSON command - export
        "json" | "j" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: nodemeta json <file.nmd>");
                std::process::exit(1);
            }
            cmd_json(filtered_args[1])
        }

        // Get command - typed lookup by key
        "get" | "g" => {
            if filtered_args.len() < 4 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: nodemeta get <file.nmd> <key> <type>");
                std::process::exit(1);
            }
            cmd_get(filtered_args[1], filtered_args[2], filtered_args[3])
        }

        // Help
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        // Default: if file exists, dump it; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_dump(filtered_args[0])
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` overrides the level picked by the verbosity flags.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("nodemeta - node metadata toolkit");
    println!();
    println!("USAGE:");
    println!("    nodemeta [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    b, build <out> <key:type=value>...   Write a metadata file");
    println!("    d, dump  <file>                      Show all slots");
    println!("    j, json  <file>                      Export slots as JSON");
    println!("    g, get   <file> <key> <type>         Print the first value stored under key");
    println!("    h, help                              Show this help");
    println!();
    println!("TYPES:");
    println!("    bool, int32, uint64, float32, string, vector3 (x,y,z)");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show warnings and errors");
    println!();
    println!("EXAMPLES:");
    println!("    nodemeta build node.nmd scale:float32=2.5 name:string=root");
    println!("    nodemeta get node.nmd scale float32");
    println!("    nodemeta json node.nmd");
    println!();
    println!("NOTES:");
    println!("    - Passing a file directly is equivalent to 'dump'");
    println!("    - RUST_LOG overrides the verbosity flags");
}

fn cmd_build(path: &str, assignments: &[&str]) -> Result<()> {
    let mut meta = NodeMetadata::new(assignments.len());
    for (index, text) in assignments.iter().enumerate() {
        let (key, value) = parse_assignment(text)?;
        debug!("[{}] {} = {}", index, key, value);
        meta.set(index, key, value);
    }

    binary::save(path, &meta)?;
    info!("Wrote {} entries to {}", meta.len(), path);
    Ok(())
}

fn cmd_dump(path: &str) -> Result<()> {
    info!("Opening metadata: {}", path);
    let meta = binary::load(path)?;

    println!("File: {}", path);
    println!("Slots: {}", meta.len());
    println!();
    for (index, entry) in meta.iter().enumerate() {
        match entry.value() {
            Some(value) => println!("[{index}] {} : {} = {}", entry.key(), value.kind(), value),
            None => println!("[{index}] {} : <unset>", entry.key()),
        }
    }
    Ok(())
}

fn cmd_json(path: &str) -> Result<()> {
    let meta = binary::load(path)?;
    println!("{}", json::to_json_string(&meta));
    Ok(())
}

fn cmd_get(path: &str, key: &str, type_name: &str) -> Result<()> {
    let kind = ValueKind::from_name(type_name)
        .ok_or_else(|| Error::other(format!("unknown type: {type_name}")))?;
    let meta = binary::load(path)?;

    let index = meta
        .find(key)
        .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
    let value = meta.value(index).ok_or(Error::Unset { index })?;
    if value.kind() != kind {
        return Err(Error::TypeMismatch {
            expected: kind,
            actual: value.kind(),
        });
    }

    println!("{}", value);
    Ok(())
}

/// Split `key:type=value`. The key may itself contain `:`; the last one
/// before `=` separates the type.
fn parse_assignment(text: &str) -> Result<(String, MetadataValue)> {
    let bad = || Error::other(format!("expected key:type=value, got {text:?}"));
    let (lhs, raw) = text.split_once('=').ok_or_else(bad)?;
    let (key, type_name) = lhs.rsplit_once(':').ok_or_else(bad)?;
    let kind = ValueKind::from_name(type_name)
        .ok_or_else(|| Error::other(format!("unknown type: {type_name}")))?;
    Ok((key.to_string(), MetadataValue::parse(kind, raw)?))
}
