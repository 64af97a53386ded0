pub mod user_repo;
pub use user_repo::UserRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod interaction_repo;
pub use interaction_repo::InteractionRepository;
pub mod gateway;
pub use gateway::{PersistenceGateway, PgGateway};

#[cfg(test)]
pub mod memory;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

// Conecta ao banco de dados, usando '?' para propagar erros
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(pool)
}
