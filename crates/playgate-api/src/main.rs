//! playgate account API server entry point.

use std::sync::Arc;

use playgate_api::{
    config::ApiConfig,
    db::{connect_and_migrate, PgAccountStore},
    mailer::SesNotifier,
    router::{build_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = ApiConfig::from_env()?;
    let pool = connect_and_migrate(&config.database_url).await?;
    let aws_cfg = aws_config::load_from_env().await;
    let state = AppState::new(
        Arc::new(PgAccountStore::new(pool)),
        Arc::new(SesNotifier::new(
            aws_sdk_sesv2::Client::new(&aws_cfg),
            config.from_email.clone(),
        )),
        config.service_settings(),
    );
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
