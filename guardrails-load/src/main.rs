use std::process::ExitCode;

use clap::Parser;
use guardrails_load::{args::LoadArgs, config::AUTH_ENV_VAR, telemetry, Harness, LoadError};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    match run(LoadArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: LoadArgs) -> Result<(), LoadError> {
    let json = args.json;
    let config = args.into_config(std::env::var(AUTH_ENV_VAR).ok())?;
    let report = Harness::new(config)?.run().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        println!("{}", report.summary);
    }
    Ok(())
}
