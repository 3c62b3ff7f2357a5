//! Counsel CLI and REST API entry point.
//!
//! Binary name: `counsel`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use counsel_observe::TracingOptions;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    counsel_observe::init_tracing(&TracingOptions {
        json: cli.log_json,
        otel: cli.otel,
        ..TracingOptions::for_verbosity(cli.verbose, cli.quiet)
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    counsel_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "counsel", &mut std::io::stdout());
        return Ok(());
    }

    if let Commands::Services = &cli.command {
        return cli::catalog::list_services(cli.json);
    }

    // Initialize application state (DB, provider, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::New {
            user,
            title,
            description,
            service,
        } => {
            cli::session::new_session(&state, user, title, description, service, cli.json).await?;
        }

        Commands::Sessions { user } => {
            cli::session::list_sessions(&state, user, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::session::show_session(&state, &id, cli.json).await?;
        }

        Commands::Send { id, message } => {
            cli::session::send_message(&state, &id, &message, cli.json).await?;
        }

        Commands::Retry { id } => {
            cli::session::retry(&state, &id, cli.json).await?;
        }

        Commands::Rename { id, title } => {
            cli::session::rename_session(&state, &id, &title, cli.json).await?;
        }

        Commands::Delete { id, force } => {
            cli::session::delete_session(&state, &id, force, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            tracing::info!(
                %addr,
                provider = %state.config.provider.name,
                data_dir = %state.data_dir.display(),
                "API server starting"
            );
            if !cli.quiet {
                println!(
                    "  {} Counsel API listening on {}",
                    console::style(">").green().bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {} {}",
                    console::style("data:").dim(),
                    state.data_dir.display()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Services | Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
