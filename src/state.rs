use std::sync::Arc;

use tracing::warn;

use crate::auth::{
    jwt::JwtKeys,
    password::PasswordHasher,
    repo::{PgUserRepo, UserRepo},
    services::AuthService,
};
use crate::books::{BookRepo, PgBookRepo};
use crate::config::AppConfig;
use crate::db;
use crate::memory::MemoryStore;
use crate::quotes::{PgQuoteRepo, QuoteRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub keys: JwtKeys,
    pub books: Arc<dyn BookRepo>,
    pub quotes: Arc<dyn QuoteRepo>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match config.database_url.clone() {
            Some(url) => {
                let pool = db::connect(&url).await?;
                Self::from_parts(
                    config,
                    Arc::new(PgUserRepo::new(pool.clone())),
                    Arc::new(PgBookRepo::new(pool.clone())),
                    Arc::new(PgQuoteRepo::new(pool)),
                )
            }
            None => {
                warn!("DATABASE_URL not set; data is kept in memory only");
                Self::in_memory(config)
            }
        }
    }

    pub fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store.clone(), store)
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepo>,
        books: Arc<dyn BookRepo>,
        quotes: Arc<dyn QuoteRepo>,
    ) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::new(config.hash)?;
        let keys = JwtKeys::new(&config.jwt);
        let auth = Arc::new(AuthService::new(users, hasher, keys.clone()));
        Ok(Self {
            config: Arc::new(config),
            auth,
            keys,
            books,
            quotes,
        })
    }

    #[cfg(test)]
    pub fn fake(secret: &str) -> Self {
        use crate::config::{HashConfig, JwtConfig};

        let config = AppConfig {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: secret.into(),
            },
            hash: HashConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        };
        Self::in_memory(config).expect("fake state")
    }
}
