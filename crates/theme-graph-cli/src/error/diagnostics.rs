//! Miette diagnostic conversion for CLI errors.

use crate::error::{CliError, ConfigError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::DeadLinks(count) => miette::miette!(
            help = "Create the missing files or remove the references listed above",
            "{} dead link(s) found",
            count
        ),
        CliError::NotADirectory(path) => miette::miette!(
            help = "Pass the directory that contains templates/, sections/ and snippets/",
            "Not a theme directory: {}",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::InvalidValue { field, value, hint } => miette::miette!(
            help = hint,
            "Invalid value for '{}' in configuration: {}",
            field,
            value
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}
