//! yulsmith Replay Binary
//!
//! Rebuilds a program from a seed (or a JSON tree), applies mutation passes
//! and prints the resulting source.
//!
//! Run with: `yulsmith-replay [OPTIONS] <COMMAND>`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arbitrary::{Arbitrary, Unstructured};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use yulsmith::program::{convert_with_config, Program, ProgramMutator};
use yulsmith::yul::{emit_with_config, YulMutator, YulProgram};
use yulsmith::{FuzzConfig, MinStdRand};

/// Bytes of generator output fed to the tree generator.
const GENERATOR_BYTES: usize = 1024;

#[derive(Parser)]
#[command(name = "yulsmith-replay")]
#[command(about = "Regenerate and mutate yulsmith programs from a seed")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (TOML, or JSON with a .json extension)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a Yul object
    Yul(ReplayArgs),
    /// Replay a Solidity program with its test triples
    Program(ReplayArgs),
    /// Print the default configuration
    Config,
}

#[derive(Args)]
struct ReplayArgs {
    /// Seed of the generated tree and of the mutation passes
    #[arg(short, long, default_value = "0")]
    seed: u32,

    /// Number of mutation passes
    #[arg(short = 'n', long, default_value = "3")]
    iterations: u32,

    /// Start from a JSON tree instead of a generated one
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the mutated tree as JSON instead of source
    #[arg(long)]
    tree: bool,

    /// Print the conversion result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => FuzzConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => FuzzConfig::default(),
    };

    match &cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&FuzzConfig::default())?);
            Ok(())
        }
        Commands::Yul(args) => replay_yul(args, &config),
        Commands::Program(args) => replay_program(args, &config),
    }
}

fn replay_yul(args: &ReplayArgs, config: &FuzzConfig) -> Result<()> {
    let mut program: YulProgram = initial_tree(args)?;
    let mutator = YulMutator::yul(&config.mutation);

    let mut seeds = MinStdRand::new(args.seed);
    for iteration in 0..args.iterations {
        let fired = mutator.mutate_program(&mut program, seeds.draw());
        debug!(iteration, fired, "mutation pass");
    }

    if args.tree {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let emitted = emit_with_config(&program, &config.emit).context("Failed to emit Yul object")?;
    info!(fingerprint = %emitted.fingerprint(), bytes = emitted.source.len(), "emitted");
    print!("{}", emitted.source);
    Ok(())
}

fn replay_program(args: &ReplayArgs, config: &FuzzConfig) -> Result<()> {
    let mut program: Program = initial_tree(args)?;
    let mutator = ProgramMutator::program(&config.mutation);

    let mut seeds = MinStdRand::new(args.seed);
    for iteration in 0..args.iterations {
        let fired = mutator.mutate_program(&mut program, seeds.draw());
        debug!(iteration, fired, "mutation pass");
    }

    if args.tree {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let converted = convert_with_config(&program, config).context("Failed to convert program")?;
    info!(
        fingerprint = %converted.fingerprint(),
        uses_library = converted.uses_library,
        "converted"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&converted)?);
        return Ok(());
    }

    print!("{}", converted.source);
    for test in &converted.library_tests {
        println!("// library test: {}.{}() == {}", test.library, test.function, test.expected);
    }
    for (contract, functions) in &converted.contract_tests {
        for (function, expected) in functions {
            println!("// contract test: {}.{}() == {}", contract, function, expected);
        }
    }
    Ok(())
}

/// Loads the tree from `--input`, or generates it from the seed.
fn initial_tree<T>(args: &ReplayArgs) -> Result<T>
where
    T: DeserializeOwned + for<'a> Arbitrary<'a>,
{
    match &args.input {
        Some(path) => load_tree(path),
        None => {
            let bytes = MinStdRand::new(args.seed).bytes(GENERATOR_BYTES);
            let mut u = Unstructured::new(&bytes);
            T::arbitrary(&mut u).context("Failed to generate tree from seed")
        }
    }
}

fn load_tree<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse tree file: {}", path.display()))
}
