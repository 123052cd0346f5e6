//! Builders for the HTTP state and the storage it runs on.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use kanban_backend::domain::{IdentifierAllocator, RandomIdentifierAllocator};
use kanban_backend::inbound::http::state::HttpState;
use kanban_backend::outbound::memory::{InMemoryBoardRepository, InMemoryUserRepository};
use kanban_backend::outbound::persistence::{
    DbPool, DieselBoardRepository, DieselUserRepository, run_pending_migrations,
};

use super::ServerSettings;

/// Open the database pool described by `settings`, applying migrations first
/// when enabled.
///
/// Returns `Ok(None)` when no database URL is configured.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be
/// built.
pub async fn connect_storage(settings: &ServerSettings) -> std::io::Result<Option<DbPool>> {
    let Some(pool_config) = settings.pool_config() else {
        return Ok(None);
    };
    if settings.run_migrations {
        let applied = run_pending_migrations(pool_config.database_url())
            .await
            .map_err(std::io::Error::other)?;
        info!(applied, "database migrations complete");
    }
    let max_size = pool_config.max_size();
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;
    info!(max_size, "database pool ready");
    Ok(Some(pool))
}

/// Build the HTTP state over PostgreSQL when a pool is available, otherwise
/// over process-local in-memory stores.
pub fn build_http_state(db_pool: Option<&DbPool>) -> web::Data<HttpState> {
    let ids: Arc<dyn IdentifierAllocator> = Arc::new(RandomIdentifierAllocator);
    let state = match db_pool {
        Some(pool) => HttpState::from_repositories(
            Arc::new(DieselBoardRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
            ids,
        ),
        None => {
            warn!("no database configured; boards and users are kept in memory");
            HttpState::from_repositories(
                Arc::new(InMemoryBoardRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
                ids,
            )
        }
    };
    web::Data::new(state)
}
