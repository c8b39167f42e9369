use clap::Parser;
use tracing_subscriber::EnvFilter;

use thingif::cli::{self, exit_codes, output::OutputMode, Cli};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here and are not failures
            let code = if e.use_stderr() {
                exit_codes::INVALID_ARGS
            } else {
                exit_codes::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);
    let code = match cli::run(cli) {
        Ok(code) => code,
        Err(e) => cli::report_error(mode, &e),
    };
    std::process::exit(code);
}

/// logs go to stderr so JSON on stdout stays clean
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
