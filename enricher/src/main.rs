use std::process::ExitCode;

use tracing::{error, info};

use enricher::{logging, Dependencies, EnricherConfig, EnricherError};
use enrichment_pipeline::RunOutcome;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenv::dotenv();

    let config = match EnricherConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(RunOutcome::Failed(_)) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Enricher failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &EnricherConfig) -> Result<RunOutcome, EnricherError> {
    info!("Starting reference enricher");
    config.log();

    let mut deps = Dependencies::new(config)?;
    let summary = deps.orchestrator.run().await?;

    Ok(summary.outcome)
}
