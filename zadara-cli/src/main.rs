//! zadarapy - command-line interface for the Zadara VPSA and VPSA Object
//! Storage REST APIs.

mod commands;
mod observability;
mod output;
mod registry;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::FromArgMatches;
use zadara_client::{CallOptions, ClientError, ReturnType};

use observability::{TracingConfig, init_tracing};
use output::DisplayOptions;
use registry::{GlobalArgs, Params};

/// Set up logging from the `-v` count, `ZADARAPY_LOG_FORMAT` and `RUST_LOG`.
fn setup_logging(verbosity: u8) -> Result<()> {
    init_tracing(&TracingConfig::for_cli(verbosity))
}

/// How a failed command is reported.
fn classify(err: &anyhow::Error) -> Option<String> {
    let client = err.downcast_ref::<ClientError>()?;
    if client.is_runtime() {
        Some(format!(
            "There was an error at runtime returned by the API: \"{client}\""
        ))
    } else if client.is_parameter() {
        Some(format!(
            "There was an error with a parameter passed to the API: \"{client}\""
        ))
    } else {
        None
    }
}

async fn run() -> Result<()> {
    let specs = commands::registry();
    let matches = registry::build_cli(&commands::groups(), &specs).get_matches();
    let globals = GlobalArgs::from_arg_matches(&matches)?;

    setup_logging(globals.verbose)?;

    let (command, group) = matches.subcommand().context("No command given")?;
    let (subcommand, args) = group.subcommand().context("No subcommand given")?;
    let spec = registry::find(&specs, command, subcommand)
        .with_context(|| format!("Unknown command: {command} {subcommand}"))?;

    let session = globals.session()?;
    tracing::info!(
        host = session.host(),
        port = ?session.port(),
        secure = session.secure(),
        command,
        subcommand,
        "Running command"
    );

    let mut options = CallOptions::default();
    if globals.json {
        options = options.with_return_type(ReturnType::Json);
    }
    let params = Params::new(args.clone(), options);
    let response = (spec.handler)(&session, &params).await?;
    tracing::debug!(response = ?response, "Command response");

    let display = DisplayOptions {
        json: globals.json,
        vertical: globals.vertical,
        fields: globals.fields(),
    };
    println!("{}", output::render(&response, spec.return_key, &display)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    match run().await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match classify(&err) {
            Some(message) => {
                eprintln!("{message}");
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_errors_are_reported() {
        let err = anyhow::Error::from(ClientError::Api("Pool is busy".to_string()));
        assert_eq!(
            classify(&err).unwrap(),
            "There was an error at runtime returned by the API: \"The API server returned an error: \"Pool is busy\".\""
        );
    }

    #[test]
    fn test_parameter_errors_are_reported() {
        let err = anyhow::Error::from(ClientError::Validation(
            "pool-1 is not a valid storage pool ID.".to_string(),
        ));
        assert_eq!(
            classify(&err).unwrap(),
            "There was an error with a parameter passed to the API: \"pool-1 is not a valid storage pool ID.\""
        );
    }

    #[test]
    fn test_other_errors_propagate() {
        assert!(classify(&anyhow::anyhow!("disk full")).is_none());
    }
}
