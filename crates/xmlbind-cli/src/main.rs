//! xmlbind CLI - reformat and check XML documents, decode node declarations.

mod node;

use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xmlbind::xml;
use xmlbind::{Codec, Element, EmitOptions, Formatting};

use node::{NodeSpec, Summary};

#[derive(Parser)]
#[command(name = "xmlbind")]
#[command(author, version, about = "Type-directed XML codec", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-emit a document compact or pretty-printed
    Fmt {
        /// Input file (use - for stdin)
        input: PathBuf,

        /// Output file (use - for stdout, or omit to use stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print when this is "true"; anything else emits compact output
        #[arg(long, value_name = "VALUE", default_value = "false")]
        pretty_print: String,

        /// Leave out the XML declaration
        #[arg(long)]
        no_declaration: bool,
    },

    /// Check that documents are well-formed
    Check {
        /// Input files (use - for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Decode a compute node declaration and print it with defaults applied
    Node {
        /// Input file (use - for stdin)
        input: PathBuf,

        /// Pretty-print when this is "true"; anything else emits compact output
        #[arg(long, value_name = "VALUE", default_value = "false")]
        pretty_print: String,

        /// Also print the declaration re-encoded
        #[arg(long)]
        emit: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Fmt {
            input,
            output,
            pretty_print,
            no_declaration,
        } => {
            let mut options = EmitOptions::new(Formatting::from_flag(&pretty_print));
            if no_declaration {
                options = options.without_declaration();
            }
            fmt(&input, output.as_deref(), &options)?;
        }
        Commands::Check { inputs } => {
            check(&inputs)?;
        }
        Commands::Node {
            input,
            pretty_print,
            emit,
        } => {
            node(&input, &pretty_print, emit)?;
        }
    }

    Ok(())
}

fn fmt(input: &Path, output: Option<&Path>, options: &EmitOptions) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let root = xml::parse(&text)?;
    info!(root = %root.name, format = %options.format, "reformatting document");

    let mut out = reformat(root, options)?;
    out.push('\n');

    match output {
        Some(path) if path.as_os_str() != "-" => fs::write(path, out)?,
        _ => io::stdout().write_all(out.as_bytes())?,
    }
    Ok(())
}

/// Re-emit a parsed document. Compact output keeps every text node; pretty
/// output replaces the indentation and refuses mixed content.
fn reformat(mut root: Element, options: &EmitOptions) -> Result<String, Box<dyn std::error::Error>> {
    if options.format.is_pretty() {
        if root.has_mixed_content() {
            return Err(format!("`{}` has mixed content and cannot be pretty-printed", root.name).into());
        }
        root.strip_indentation();
    }
    Ok(xml::emit_with_options(&root, options)?)
}

fn check(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut failed = 0;
    for input in inputs {
        let result = read_input(input)
            .map_err(|e| e.to_string())
            .and_then(|text| xml::parse(&text).map_err(|e| e.to_string()));
        match result {
            Ok(root) => {
                debug!(path = %input.display(), root = %root.name, "well-formed");
                println!("ok    {}", input.display());
            }
            Err(e) => {
                failed += 1;
                println!("FAIL  {}: {e}", input.display());
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} documents are not well-formed", inputs.len()).into());
    }
    Ok(())
}

fn node(input: &Path, pretty_print: &str, emit: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let codec = Codec::from_pretty_print_flag(pretty_print);
    let node: NodeSpec = codec.decode(&text)?;
    node.open_ports()?;

    print!("{}", Summary(&node));
    if emit {
        println!();
        println!("{}", codec.encode(&node)?);
    }
    Ok(())
}

fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "<p><b>bold</b> <i>italic</i></p>";

    #[test]
    fn test_reformat_compact_keeps_whitespace() {
        let options = EmitOptions::new(Formatting::Compact).without_declaration();
        let root = xml::parse(MIXED).unwrap();
        assert_eq!(reformat(root, &options).unwrap(), MIXED);
    }

    #[test]
    fn test_reformat_pretty_refuses_mixed_content() {
        let options = EmitOptions::new(Formatting::Pretty).without_declaration();
        let err = reformat(xml::parse(MIXED).unwrap(), &options).unwrap_err();
        assert_eq!(err.to_string(), "`p` has mixed content and cannot be pretty-printed");
    }

    #[test]
    fn test_reformat_pretty_reindents() {
        let options = EmitOptions::new(Formatting::Pretty).without_declaration();
        let root = xml::parse("<node>\n\t<os>linux</os>\n\t<size> </size>\n</node>").unwrap();
        assert_eq!(
            reformat(root, &options).unwrap(),
            "<node>\n  <os>linux</os>\n  <size> </size>\n</node>"
        );
    }
}
