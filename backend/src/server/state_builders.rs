//! Builders wiring driven adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use messpro::inbound::http::state::{HttpState, StoreAdapters};
use messpro::outbound::crypto::Argon2PasswordHasher;
use messpro::outbound::memory::InMemoryMessStore;
use messpro::outbound::persistence::{
    DbPool, DieselAttendanceRepository, DieselIssueRepository, DieselUserRepository,
};

use super::ServerConfig;

fn diesel_adapters(
    pool: &DbPool,
    hasher: Arc<Argon2PasswordHasher>,
) -> StoreAdapters<
    DieselAttendanceRepository,
    DieselUserRepository,
    DieselIssueRepository,
    Argon2PasswordHasher,
> {
    StoreAdapters {
        attendance: Arc::new(DieselAttendanceRepository::new(pool.clone())),
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        issues: Arc::new(DieselIssueRepository::new(pool.clone())),
        hasher,
    }
}

/// Build the handler state over PostgreSQL when a pool is configured,
/// otherwise over a fresh in-process store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match &config.db_pool {
        Some(pool) => {
            info!("serving attendance from PostgreSQL");
            HttpState::from_adapters(diesel_adapters(pool, hasher), config.rates, clock)
        }
        None => {
            info!("no database configured; serving attendance from memory");
            HttpState::from_adapters(
                StoreAdapters::shared(Arc::new(InMemoryMessStore::default()), hasher),
                config.rates,
                clock,
            )
        }
    };
    web::Data::new(state)
}
