use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use departure_board::board::{BoardState, Renderer};
use departure_board::config::WidgetConfig;
use departure_board::poller::{PollSettings, Poller};
use departure_board::transport::{BoardSource, MockBoardSource, TransportClient};
use departure_board::web::{AppState, RouteLabel, SharedBoard, create_router};

/// Path of the configuration file, unless overridden.
const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Directory served under `/static`.
const STATIC_DIR: &str = "static";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config_path =
        std::env::var("BOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match WidgetConfig::load(&config_path) {
        Ok(config) => config.with_credentials_from(|name| std::env::var(name).ok()),
        Err(e) => {
            error!(path = %config_path, error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let board = SharedBoard::new();

    let route = match config.validate() {
        Ok(api) => {
            let route = RouteLabel {
                from: api.from.to_string(),
                to: api.to.to_string(),
            };
            let settings = PollSettings::from(&config);

            match std::env::var("BOARD_MOCK_DIR") {
                Ok(dir) => {
                    info!(%dir, "Using mock board data");
                    match MockBoardSource::new(&dir) {
                        Ok(source) => spawn_poller(source, board.clone(), settings),
                        Err(e) => {
                            error!(%dir, error = %e, "Failed to load mock board data");
                            return ExitCode::FAILURE;
                        }
                    }
                }
                Err(_) => match TransportClient::new(api) {
                    Ok(source) => spawn_poller(source, board.clone(), settings),
                    Err(e) => {
                        error!(error = %e, "Failed to create TransportAPI client");
                        return ExitCode::FAILURE;
                    }
                },
            }
            route
        }
        Err(errors) => {
            for e in &errors {
                error!("{e}");
            }
            warn!("Configuration invalid; serving errors without polling");
            board.render(&BoardState::from_config_errors(&errors)).await;
            RouteLabel {
                from: config.from.clone().unwrap_or_default(),
                to: config.to.clone().unwrap_or_default(),
            }
        }
    };

    let app = create_router(AppState::new(board, route), STATIC_DIR);

    let addr = config.listen_addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!("Departure board listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn spawn_poller<S>(source: S, board: SharedBoard, settings: PollSettings)
where
    S: BoardSource + Send + Sync + 'static,
{
    tokio::spawn(Poller::new(source, board, settings).run());
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
