use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use printbot::ai::LlmClient;
use printbot::api::{self, AppState};
use printbot::core::config::AppConfig;
use printbot::documents::PdfRenderer;
use printbot::features::Services;
use printbot::printer::EpsonConnectClient;
use printbot::slack::SlackClient;
use printbot::worker::{Dispatcher, HttpCallbackSink};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    printbot::setup_logging();

    let config = Arc::new(
        AppConfig::from_env()
            .map_err(anyhow::Error::msg)
            .context("invalid configuration")?,
    );

    let services = Services::new(
        Arc::new(
            SlackClient::new(config.slack_bot_token.clone())
                .context("failed to init Slack client")?,
        ),
        Arc::new(LlmClient::new(&config).context("failed to init OpenAI client")?),
        Arc::new(EpsonConnectClient::new(&config).context("failed to init Epson client")?),
        PdfRenderer::new(config.pdf_max_chars_per_line),
    );
    let sink = HttpCallbackSink::new().context("failed to init callback client")?;
    let dispatcher = Dispatcher::new(Arc::new(services), Arc::new(sink));

    let router = api::router::new(AppState::new(Arc::clone(&config), dispatcher.clone()));

    let socket_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&socket_addr)
        .await
        .with_context(|| format!("failed to bind {socket_addr}"))?;
    info!("starting axum server on {}", socket_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum server failed")?;

    dispatcher.shutdown().await;
    info!("process terminated");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install C-c handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install sigterm handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {
            info!("ctrl-c hit, graceful shutdown...");
        },
        () = sigterm => {
            info!("SIGTERM received, graceful shutdown...");
        },
    }
}
