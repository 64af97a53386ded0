// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PersistenceGateway,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn PersistenceGateway>,
    jwt_secret: String,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, jwt_secret: String) -> Self {
        Self {
            gateway,
            jwt_secret,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Custo do bcrypt (os testes usam o mínimo para não ficarem lentos)
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub async fn register_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        // Hashing é CPU pesado: vai para uma thread de bloqueio
        let password_clone = password.to_owned();
        let cost = self.hash_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self.gateway.create_user(email, &hashed_password).await?;
        tracing::info!("👤 Usuário {} registrado", new_user.id);

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .gateway
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    /// Resolve a sessão: token válido -> usuário
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.gateway
            .find_user_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
