use clap::Parser;
use lexkit_access::LexerRegistry;
use lexkit_check::{CheckError, FileFilter, FileOutcome, run_tree};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Check lexers against example files and their expected renderings.
#[derive(Parser, Debug)]
#[command(name = "lexkit-check")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directories searched for `lexkit.yaml` example directories
    #[arg(value_name = "DIR", required = true)]
    dirs: Vec<PathBuf>,

    /// `;`-separated lexer libraries to load (`.` is the built-in set)
    #[arg(short, long, value_name = "LIST", default_value = ".")]
    libraries: String,

    /// Only check example files whose path matches this regular expression
    #[arg(long, value_name = "REGEX")]
    only: Option<String>,

    /// Verbose logging (ignored when RUST_LOG is set)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn report(outcome: &FileOutcome) {
    for problem in &outcome.problems {
        println!("{}: {problem}", outcome.path.display());
    }
}

fn run(args: &Args) -> Result<bool, CheckError> {
    let mut registry = LexerRegistry::default();
    if !registry.load(&args.libraries) {
        tracing::error!(libraries = args.libraries.as_str(), "no lexer library loaded");
        return Ok(false);
    }

    let filter = match &args.only {
        Some(pattern) => FileFilter::matching(pattern)?,
        None => FileFilter::all(),
    };

    let mut checked = 0;
    let mut failed = 0;
    for dir in &args.dirs {
        for outcome in run_tree(dir, &registry, &filter)? {
            checked += 1;
            if !outcome.passed() {
                failed += 1;
                report(&outcome);
            }
        }
    }
    tracing::info!(checked, failed, "finished");
    if checked == 0 {
        tracing::warn!("no example files found");
    }
    Ok(failed == 0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("lexkit-check: {err}");
            ExitCode::FAILURE
        }
    }
}
