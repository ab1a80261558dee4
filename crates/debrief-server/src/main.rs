use debrief_server::scheduler::spawn_sweeper;
use debrief_server::settings::Settings;
use debrief_server::state::AppState;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(
        bind_addr = %settings.bind_addr,
        workbook = %settings.workbook_path.display(),
        model = %settings.gemini.model,
        "starting debrief server"
    );

    let state = AppState::from_settings(&settings)?;

    match settings.sweep_interval {
        Some(every) => {
            tracing::info!(interval_secs = every.as_secs(), "periodic sweep enabled");
            spawn_sweeper(state.pipeline.clone(), every);
        }
        None => tracing::info!("periodic sweep disabled"),
    }

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .wrap_err_with(|| format!("cannot bind {}", settings.bind_addr))?;
    axum::serve(listener, debrief_server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
