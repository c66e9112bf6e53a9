use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutorhub_backend::{
    app,
    config::Config,
    db::connection::{create_pool, DbPool},
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutorhub_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        jwt_secret = %mask_secret(&config.jwt_secret),
        jwt_expiration_hours = config.jwt_expiration_hours,
        refresh_expiration_days = config.refresh_expiration_days,
        time_zone = %config.time_zone,
        "Loaded configuration from environment/.env"
    );

    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.bind_port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(pool, config)).await?;

    Ok(())
}
