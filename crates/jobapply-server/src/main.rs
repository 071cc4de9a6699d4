use clap::Parser;
use jobapply_common::config::Config;
use jobapply_common::logging::setup_logging;
use jobapply_server::app::App;
use jobapply_server::cli::Args;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Existing environment variables take precedence over .env
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut config);

    if let Err(e) = setup_logging(&config, args.tracing.into()) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "starting jobapply-server"
    );

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = ?e, "failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    // Run the application (lifecycle, Axum server, graceful shutdown)
    app.run().await
}
