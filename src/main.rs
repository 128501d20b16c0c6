// Command-line entry point for Roxas.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use roxas::application::AnalyzeUsecase;
use roxas::domain::{JsonEcho, WalkOptions};
use roxas::infrastructure::frontend_runner::DEFAULT_INTERPRETER;
use roxas::infrastructure::{FrontendInvocation, JsonFileSource, PythonFrontend};
use roxas::ports::ParseTreeSource;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Python module implementing the compiler frontend
    module_name: Option<String>,

    /// Directory containing the frontend module
    module_path: Option<PathBuf>,

    /// Source program to parse
    source: Option<PathBuf>,

    /// Virtual environment holding the frontend's dependencies
    env_path: Option<PathBuf>,

    /// Read an already serialized parse tree instead of running a frontend
    #[arg(long, value_name = "FILE", conflicts_with_all = ["module_name", "module_path", "source", "env_path"])]
    tree: Option<PathBuf>,

    /// Python interpreter (ignored when ENV_PATH is given)
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    python: String,

    /// Echo the parse tree before the leaf report
    #[arg(long)]
    print: bool,

    /// Leaf report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Reject trees nested deeper than this
    #[arg(long)]
    max_depth: Option<usize>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

const USAGE_EXIT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(path) = &cli.tree {
        return finish(run(&cli, &JsonFileSource::new(path)));
    }

    let invocation = match (&cli.module_name, &cli.module_path, &cli.source) {
        (None, None, None) => {
            println!("roxas {} :: nothing to compile", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        (Some(name), Some(path), Some(source)) => FrontendInvocation::new(name, path, source)
            .with_env_path(cli.env_path.clone())
            .with_interpreter(cli.python.clone()),
        _ => {
            eprintln!(
                "Invalid arguments :: please provide the frontend module name, \
                 module path, and source program to compile"
            );
            return ExitCode::from(USAGE_EXIT);
        }
    };

    let frontend = PythonFrontend::new(invocation);
    finish(run(&cli, &frontend))
}

fn finish(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "roxas=debug" } else { "roxas=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli, source: &dyn ParseTreeSource) -> Result<()> {
    let usecase = AnalyzeUsecase {
        source,
        options: WalkOptions {
            max_depth: cli.max_depth,
        },
    };

    let analysis = usecase.run()?;

    if cli.print {
        println!("{}", JsonEcho(&analysis.document));
    }

    match cli.format {
        OutputFormat::Text => {
            if !analysis.report.is_empty() {
                println!("{}", analysis.report.to_text());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis.report)?),
    }

    Ok(())
}
