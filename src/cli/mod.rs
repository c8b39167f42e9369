mod commands;
pub mod exit_codes;
pub mod output;

pub use commands::{Cli, Commands, ConfigCommands, TriggerCommands};

use anyhow::Result;

use crate::error::Error;
use output::{JsonRpcError, OutputMode};

/// a config file that can't be located, read, parsed or applied
#[derive(Debug, thiserror::Error)]
#[error("{0:#}")]
pub struct ConfigError(pub anyhow::Error);

/// run the command, returning the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    commands::execute(cli)
}

pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        return exit_codes::CONFIG_ERROR;
    }
    match err.downcast_ref::<Error>() {
        Some(Error::UnsupportedVariant(_)) => exit_codes::UNSUPPORTED,
        Some(Error::MalformedInput { .. }) | Some(Error::InvalidClause(_)) => {
            exit_codes::MALFORMED_INPUT
        }
        None => exit_codes::ERROR,
    }
}

/// print the error the way the output mode asks and return its exit code
pub fn report_error(mode: OutputMode, err: &anyhow::Error) -> i32 {
    let code = exit_code_for(err);

    if mode.is_json() {
        let path = err
            .downcast_ref::<Error>()
            .and_then(Error::path)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        output::print_json_error(
            &JsonRpcError::new(code, format!("{:#}", err)).with_data(path, vec![]),
        );
    } else {
        eprintln!("error: {:#}", err);
    }

    code
}
