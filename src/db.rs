use serde::Deserialize;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::DatabaseConfig;
use crate::errors::AppError;
use crate::models::event::StatusEvent;
use crate::models::notification::Notification;
use crate::models::order::{self, NewOrder, Order};
use crate::models::request::{self, GadgetRequest, NewGadgetRequest};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const DEMO_SEED: &str = include_str!("../data/seed/demo.json");

/// Backing storage for orders, requests and their audit trail.
///
/// Query functions in `models::*::queries` match on the variant, so both
/// backends expose the same behavior to the consoles.
#[derive(Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl Store {
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<MemoryTables>>,
}

#[derive(Default)]
pub(crate) struct MemoryTables {
    pub orders: BTreeMap<i64, Order>,
    pub requests: BTreeMap<i64, GadgetRequest>,
    pub events: Vec<StatusEvent>,
    pub notifications: Vec<Notification>,
    last_id: i64,
}

impl MemoryTables {
    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, MemoryTables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, MemoryTables> {
        self.tables.write().await
    }
}

/// Connect to Postgres when configured, otherwise fall back to memory.
pub async fn connect(database: Option<&DatabaseConfig>) -> Result<Store, AppError> {
    match database {
        Some(cfg) => {
            let pool = PgPoolOptions::new()
                .max_connections(cfg.max_connections)
                .connect(&cfg.url)
                .await?;
            run_migrations(&pool).await?;
            Ok(Store::Postgres(pool))
        }
        None => {
            log::warn!("No DATABASE_URL set, using in-memory store (data lost on restart)");
            Ok(Store::memory())
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SeedPayload {
    #[serde(default)]
    pub orders: Vec<NewOrder>,
    #[serde(default)]
    pub requests: Vec<NewGadgetRequest>,
}

/// Import a seed payload. Skipped entirely when the store already holds
/// orders or requests. Returns (orders, requests) created.
pub async fn import_seed(store: &Store, payload: &SeedPayload) -> Result<(usize, usize), AppError> {
    if order::count(store).await? > 0 || request::count(store).await? > 0 {
        log::info!("Seed skipped: store is not empty");
        return Ok((0, 0));
    }
    for new in &payload.orders {
        order::create(store, new).await?;
    }
    for new in &payload.requests {
        request::create(store, new).await?;
    }
    log::info!(
        "Seed: created {} orders, {} requests",
        payload.orders.len(),
        payload.requests.len()
    );
    Ok((payload.orders.len(), payload.requests.len()))
}

pub async fn seed_demo(store: &Store) -> Result<(usize, usize), AppError> {
    let payload: SeedPayload = serde_json::from_str(DEMO_SEED)?;
    import_seed(store, &payload).await
}
