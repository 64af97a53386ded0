//src/main.rs

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

// Importações principais
use crate::config::{AppConfig, AppState};
use crate::db::PgGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env();

    let app = match (&config.credentials.database_url, &config.credentials.jwt_secret) {
        (Some(database_url), Some(jwt_secret)) if config.credentials.is_configured() => {
            let pool = db::connect(database_url).await?;

            // Faz o app rodar as migrações do SQLx na inicialização
            sqlx::migrate!().run(&pool).await?;
            tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

            let gateway = Arc::new(PgGateway::new(pool));
            let app_state = AppState::new(config.credentials.clone(), gateway, jwt_secret.clone());
            routes::app_router(app_state)
        }
        _ => {
            tracing::warn!("⚠️ DATABASE_URL/JWT_SECRET ausentes ou com placeholder: servindo apenas /setup");
            routes::setup_router(Arc::new(config.credentials.clone()))
        }
    };

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
