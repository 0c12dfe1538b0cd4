use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{debug, error, info};

use fauxrest::cli::{Cli, Command};
use fauxrest::logging::init_tracing;
use fauxrest::router::init_router;
use fauxrest::state::{AppState, init_app_state};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::HashPassword { ref password, cost }) => hash_password(password, cost),
        Some(Command::Serve) | None => {
            init_tracing();
            serve(&cli).await
        }
    }
}

fn hash_password(password: &str, cost: u32) -> ExitCode {
    match bcrypt::hash(password, cost) {
        Ok(hashed) => {
            println!("{hashed}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to hash password: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(cli: &Cli) -> ExitCode {
    let state = match init_app_state(&cli.database).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, database = %cli.database.display(), "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    spawn_revocation_pruner(&state);

    let address = cli.bind_address();
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %address, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(%address, "Server running");
    info!("Swagger UI available at http://{address}/swagger-ui");

    if let Err(e) = axum::serve(listener, init_router(state)).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Drops revocations whose tokens have expired anyway.
fn spawn_revocation_pruner(state: &AppState) {
    let revocations = state.revocations.clone();
    let interval_secs = state.jwt_config.revocation_prune_interval_secs.max(1);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            let pruned = revocations.prune(Utc::now().timestamp());
            if pruned > 0 {
                debug!(pruned, remaining = revocations.len(), "Pruned expired revocations");
            }
        }
    });
}
