use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use felt_lens::config::{self, Config};
use felt_lens::infrastructure::abi::ParsedAbi;
use felt_lens::infrastructure::{AbiScanner, CallDecoder};
use felt_lens::logging;
use felt_lens::modules::toolkit::{self, decode::Direction, ToolResult};

#[derive(Debug, Parser)]
#[command(
    name = "felt-lens",
    version,
    about = "felt-lens: inspect Starknet ABIs and encode/decode calldata"
)]
struct Args {
    /// Config file (defaults to $FELT_LENS_CONFIG or ~/.config/felt-lens/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the functions of an ABI with their selectors
    Functions {
        /// ABI file (raw ABI array or contract class JSON)
        #[arg(long)]
        abi: PathBuf,
    },
    /// Print the JSON Schema of a function's inputs or of a type
    Schema {
        #[arg(long)]
        abi: PathBuf,
        /// Function name
        #[arg(required_unless_present = "type_name")]
        function: Option<String>,
        /// Resolve a type string instead of a function
        #[arg(long = "type", conflicts_with = "function")]
        type_name: Option<String>,
    },
    /// Encode JSON arguments into calldata
    Encode {
        #[arg(long)]
        abi: PathBuf,
        function: String,
        /// JSON object keyed by input name, or a JSON array in input order
        #[arg(default_value = "")]
        args: String,
    },
    /// Decode calldata (or a call result with --outputs)
    Decode {
        #[arg(long)]
        abi: PathBuf,
        function: String,
        /// Decode against the function outputs instead of its inputs
        #[arg(long)]
        outputs: bool,
        /// Felt tokens, space/comma separated or as one JSON array
        tokens: Vec<String>,
    },
    /// Split account `__execute__` calldata and decode each call
    Multicall {
        /// ABI files or directories to resolve selectors (repeatable)
        #[arg(long)]
        abi: Vec<String>,
        tokens: Vec<String>,
    },
    /// Compute the entry point selector of a function name
    Selector { name: String },
    /// Convert a felt between hex, decimal and short string
    Felt { value: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };

    logging::init(&logging::filter_directive(
        config.log.filter.as_deref(),
        args.verbose,
    ))?;

    let result = run(args.command, &config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    } else {
        print!("{}", result.render_text());
    }
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<ToolResult> {
    let scanner = AbiScanner::new(config.scan_options());

    match command {
        Command::Functions { abi } => Ok(toolkit::functions::functions(&load_abi(&scanner, &abi)?)),
        Command::Schema {
            abi,
            function,
            type_name,
        } => {
            let parsed = load_abi(&scanner, &abi)?;
            match (function, type_name) {
                (_, Some(type_name)) => toolkit::schema::type_schema(&parsed, &type_name),
                (Some(function), None) => toolkit::schema::schema(&parsed, &function),
                (None, None) => bail!("either a function name or --type is required"),
            }
        }
        Command::Encode {
            abi,
            function,
            args,
        } => toolkit::encode::encode(&load_abi(&scanner, &abi)?, &function, &args),
        Command::Decode {
            abi,
            function,
            outputs,
            tokens,
        } => {
            let parsed = load_abi(&scanner, &abi)?;
            let tokens = toolkit::parse_tokens(&tokens)?;
            let direction = if outputs {
                Direction::Outputs
            } else {
                Direction::Inputs
            };
            toolkit::decode::decode(&parsed, &function, &tokens, direction)
        }
        Command::Multicall { abi, tokens } => {
            let tokens = toolkit::parse_tokens(&tokens)?;
            let roots = abi_scan_roots(&abi, config)?;
            let registry = scanner.scan_roots(&roots);
            debug!(
                roots = roots.len(),
                files = registry.scanned_files,
                functions = registry.loaded_functions,
                scan_ms = registry.scan_ms as u64,
                "selector registry ready"
            );
            Ok(toolkit::multicall::multicall(
                &CallDecoder::new(registry),
                &tokens,
            ))
        }
        Command::Selector { name } => toolkit::selector::selector(&name),
        Command::Felt { value } => toolkit::felt::felt_convert(&value),
    }
}

fn load_abi(scanner: &AbiScanner, path: &Path) -> Result<ParsedAbi> {
    scanner
        .load_file(path)
        .with_context(|| format!("failed to load ABI from {}", path.display()))?
        .with_context(|| format!("{} holds no ABI", path.display()))
}

/// Command-line roots first, then configured ones; the working directory
/// when neither is set
fn abi_scan_roots(cli: &[String], config: &Config) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut roots: Vec<PathBuf> = cli
        .iter()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| config::expand_path(raw.trim(), &cwd))
        .collect();
    roots.extend(config.abi_roots(&cwd));
    if roots.is_empty() {
        roots.push(cwd);
    }
    Ok(roots)
}
