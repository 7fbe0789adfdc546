use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidsum::{app, config::settings::Settings, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vidsum=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Credentials are checked here, once; requests never re-read the environment.
    let settings = Settings::from_env().context("Failed to load configuration")?;
    tracing::info!(?settings, "configuration loaded");

    let addr = settings.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("listening on {}", addr);

    axum::serve(listener, app(AppState::new(settings))).await?;

    Ok(())
}
