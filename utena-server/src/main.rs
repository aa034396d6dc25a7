//! utena server - zellij session daemon

use std::sync::Arc;

use tracing::{error, info};

use utena_utils::{init_logging_with_config, LogConfig, Result};

mod cli;

use cli::Args;
use utena_server::config::ConfigLoader;
use utena_server::http;
use utena_server::plugin::ZellijPipe;
use utena_server::AppState;

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

async fn run_daemon(args: Args) -> Result<()> {
    let mut config = ConfigLoader::load_and_validate(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }

    let transport = Arc::new(ZellijPipe::new(
        config.plugin.binary.clone(),
        config.plugin.pipe_name.clone(),
    ));
    let listen_addr = config.server.listen_addr.clone();
    let state = AppState::new(config, transport)?;

    let listener = http::bind(&listen_addr).await?;

    let signal_state = Arc::clone(&state);
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_state.shutdown();
    });

    info!("utena server started");
    http::serve(listener, state).await?;

    info!("utena server stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    let log_config = if args.stderr {
        LogConfig::development()
    } else {
        LogConfig::server()
    };
    init_logging_with_config(log_config)?;

    if let Err(e) = run_daemon(args).await {
        error!("utena server failed: {}", e);
        return Err(e);
    }
    Ok(())
}
