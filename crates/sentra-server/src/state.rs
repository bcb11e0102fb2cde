//! Application state assembly.
//!
//! All collaborators (identity storage, token issuer, policy evaluator,
//! cache) are built once here at startup and shared. There is no global
//! registry; anything a handler needs travels through this state.

use std::sync::Arc;

use deadpool_redis::Runtime;
use sentra_auth::credential::hash_password;
use sentra_auth::storage::IdentityStorage;
use sentra_auth::{
    AuthService, Identity, MemoryIdentityStorage, PolicyEvaluator, Role, TokenIssuer,
};
use sentra_cache::{CacheAside, CacheBackend};

use crate::config::{AppConfig, BootstrapConfig};

/// Errors that can occur while assembling the application state.
///
/// All of them are fatal: the process should exit rather than serve
/// without signing keys or a cache connection.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Auth configuration or component construction failed.
    #[error("auth initialization failed: {0}")]
    Auth(#[from] sentra_auth::AuthError),

    /// The cache connection pool could not be created.
    #[error("cache initialization failed: {0}")]
    Cache(String),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service (login, register, provisioning).
    pub auth: Arc<AuthService>,

    /// Policy evaluator for request authorization.
    pub evaluator: Arc<PolicyEvaluator>,

    /// Cache-aside store shared by every resource endpoint.
    pub cache: CacheAside,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Builds the application state from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`StateError`] if the auth configuration is
    /// invalid (e.g. a signing key is missing) or the Redis pool cannot
    /// be created.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StateError> {
        config.auth.validate()?;

        let issuer = Arc::new(TokenIssuer::from_config(&config.auth)?);
        let storage = Arc::new(MemoryIdentityStorage::new());
        let auth = Arc::new(AuthService::new(
            storage.clone(),
            storage.clone(),
            issuer.clone(),
        ));
        let evaluator = Arc::new(PolicyEvaluator::new(issuer));

        let backend = if config.redis.enabled {
            let pool = deadpool_redis::Config::from_url(&config.redis.url)
                .create_pool(Some(Runtime::Tokio1))
                .map_err(|e| StateError::Cache(e.to_string()))?;
            tracing::info!(url = %config.redis.url, "redis cache enabled");
            CacheBackend::new_redis(pool)
        } else {
            tracing::info!("redis disabled, using local cache");
            CacheBackend::new_local()
        };

        bootstrap_root_user(storage.as_ref(), &config.bootstrap).await?;

        Ok(Self {
            auth,
            evaluator,
            cache: CacheAside::new(backend),
        })
    }
}

/// Creates the configured root account unless it already exists.
async fn bootstrap_root_user(
    storage: &MemoryIdentityStorage,
    bootstrap: &BootstrapConfig,
) -> Result<(), StateError> {
    let Some(root) = &bootstrap.root_user else {
        return Ok(());
    };

    if storage.find_by_username(&root.username).await?.is_some() {
        tracing::debug!(username = %root.username, "root account already present");
        return Ok(());
    }

    let email = root
        .email
        .clone()
        .unwrap_or_else(|| format!("{}@sentra.local", root.username));
    let identity = Identity::builder(&root.username, email)
        .password_hash(hash_password(&root.password)?)
        .email_confirmed(true)
        .build();
    storage.create(&identity).await?;
    storage.assign_role(&identity.id, Role::Root).await?;

    tracing::info!(username = %root.username, "root account bootstrapped");
    Ok(())
}
