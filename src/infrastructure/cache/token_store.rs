use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::{AsyncCommands, RedisResult};

use crate::{errors::AuthError, repositories::token::TokenRevocationRepository};

const KEY_PREFIX: &str = "revoked_jti:";

/// Redis-backed deny-list. Without a Redis URL every call is a no-op and
/// logout only ends the client's copy of the tokens.
#[derive(Clone)]
pub struct RedisTokenStore {
    pool: Option<Pool>,
}

impl RedisTokenStore {
    pub fn new(redis_url: Option<&str>) -> Self {
        let pool = redis_url.and_then(|url| {
            Config::from_url(url)
                .create_pool(Some(Runtime::Tokio1))
                .map_err(|e| tracing::error!("Redis pool creation error: {}", e))
                .ok()
        });
        RedisTokenStore { pool }
    }

    pub fn disabled() -> Self {
        RedisTokenStore { pool: None }
    }

    pub fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    fn key(jti: &str) -> String {
        format!("{KEY_PREFIX}{jti}")
    }

    async fn connection(pool: &Pool) -> Result<deadpool_redis::Connection, AuthError> {
        pool.get().await.map_err(|e| AuthError::RevocationStore(e.to_string()))
    }
}

#[async_trait]
impl TokenRevocationRepository for RedisTokenStore {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), AuthError> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        let mut conn = Self::connection(pool).await?;
        conn.set_ex::<_, _, ()>(Self::key(jti), 1, ttl_secs.max(1))
            .await
            .map_err(|e| AuthError::RevocationStore(e.to_string()))
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        let Some(pool) = &self.pool else {
            return Ok(false);
        };
        let mut conn = Self::connection(pool).await?;
        conn.exists::<_, bool>(Self::key(jti))
            .await
            .map_err(|e| AuthError::RevocationStore(e.to_string()))
    }

    async fn ping(&self) -> Option<bool> {
        let pool = self.pool.as_ref()?;
        let Ok(mut conn) = pool.get().await else {
            return Some(false);
        };
        let result: RedisResult<String> = conn.ping().await;
        Some(matches!(result, Ok(pong) if pong == "PONG"))
    }
}
