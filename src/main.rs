use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use sqlcheck::config;
use sqlcheck::commands::{self, GenerateOptions};
use sqlcheck::core::ClientPathRegistry;
use sqlcheck::export::{ClipboardSink, SystemClipboard};
use sqlcheck::session::Session;
use sqlcheck::terminal::{print_clients, Repl};
use sqlcheck::utils::read_input;

#[derive(Parser, Debug)]
#[command(
    name = "sqlcheck",
    version,
    about = "Extract .sql filenames from deployment notes and generate existence-check scripts"
)]
struct Cli {
    /// TOML file with the client/environment path table
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List clients, environments and path prefixes
    Clients,

    /// Print the .sql filenames referenced in the input
    Extract(ExtractArgs),

    /// Generate the existence-check batch script
    Generate(GenerateArgs),

    /// Interactive session: paste notes, switch client/environment, copy or download
    Interactive,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Read notes from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print a JSON array instead of one name per line
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Read notes from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Client whose path prefix is checked
    #[arg(short, long)]
    client: String,

    /// Environment (defaults to the client's first environment)
    #[arg(short, long)]
    env: Option<String>,

    /// Also write existance_check.bat into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also copy the script to the clipboard
    #[arg(long)]
    copy: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = config::config_path(cli.config);
    let registry = config::load_registry(config_path.as_deref()).context("Failed to load client table")?;

    match cli.command {
        Commands::Clients => print_clients(&mut io::stdout(), &registry)?,
        Commands::Extract(args) => run_extract(args)?,
        Commands::Generate(args) => run_generate(args, &registry)?,
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut repl = Repl::new(Session::new(registry), io::stdout());
            repl.run(stdin.lock())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    commands::run_extract(&text, args.json, &mut io::stdout())
}

fn run_generate(args: GenerateArgs, registry: &ClientPathRegistry) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    let options = GenerateOptions {
        client: args.client,
        environment: args.env,
        output_dir: args.output,
        copy: args.copy,
    };

    commands::run_generate(
        registry,
        &text,
        &options,
        &mut io::stdout(),
        &mut io::stderr(),
        || SystemClipboard::new().map(|clipboard| Box::new(clipboard) as Box<dyn ClipboardSink>),
    )?;
    Ok(())
}
