use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracetm::{report, Explorer, MachineLoader, DEFAULT_MAX_CONFIGURATIONS, DEFAULT_MAX_DEPTH};
use tracing_subscriber::EnvFilter;

/// Traces a nondeterministic Turing machine on an input string.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tracetm machines/a_plus.csv aaa
  tracetm --max-depth 50 --json machines/equal_01s.csv 0011")]
struct Cli {
    /// The machine description file
    machine: PathBuf,

    /// The input string, placed on the tape to the right of the head
    input: String,

    /// Number of breadth-first levels to explore before timing out
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Number of configurations the search may generate before giving up
    #[clap(long, default_value_t = DEFAULT_MAX_CONFIGURATIONS)]
    max_configurations: usize,

    /// Print the result as JSON
    #[clap(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let machine = MachineLoader::load_machine(&cli.machine)
        .with_context(|| format!("failed to load machine from {}", cli.machine.display()))?;

    let result = Explorer::new(&machine)
        .max_depth(cli.max_depth)
        .max_configurations(cli.max_configurations)
        .explore(&cli.input);

    if cli.json {
        let mut json = report::render_json(&machine, &cli.input, &result)
            .context("failed to serialize result")?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(report::render_text(&machine, &cli.input, &result))
    }
}

/// Logs go to stderr so that stdout only carries the report. `-v` flags take precedence
/// over `RUST_LOG`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
