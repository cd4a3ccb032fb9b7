use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::errors::AppError;
use crate::workflow::EntityKind;
use super::types::*;

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    entity_kind: String,
    entity_id: i64,
    from_status: String,
    to_status: String,
    action: String,
    correlation_id: String,
    at: DateTime<Utc>,
}

impl TryFrom<EventRow> for StatusEvent {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(StatusEvent {
            id: row.id,
            entity_kind: row.entity_kind.parse().map_err(AppError::Validation)?,
            entity_id: row.entity_id,
            from_status: row.from_status,
            to_status: row.to_status,
            action: row.action,
            correlation_id: row.correlation_id,
            at: row.at,
        })
    }
}

pub async fn insert(store: &Store, new: &NewStatusEvent) -> Result<StatusEvent, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, EventRow>(
                "INSERT INTO status_events \
                     (entity_kind, entity_id, from_status, to_status, action, correlation_id) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING id, entity_kind, entity_id, from_status, to_status, action, correlation_id, at",
            )
            .bind(new.entity_kind.as_str())
            .bind(new.entity_id)
            .bind(&new.from_status)
            .bind(&new.to_status)
            .bind(&new.action)
            .bind(&new.correlation_id)
            .fetch_one(pool)
            .await?;
            StatusEvent::try_from(row)
        }
        Store::Memory(mem) => {
            let mut tables = mem.write().await;
            let event = StatusEvent {
                id: tables.next_id(),
                entity_kind: new.entity_kind,
                entity_id: new.entity_id,
                from_status: new.from_status.clone(),
                to_status: new.to_status.clone(),
                action: new.action.clone(),
                correlation_id: new.correlation_id.clone(),
                at: Utc::now(),
            };
            tables.events.push(event.clone());
            Ok(event)
        }
    }
}

/// Audit trail of one entity, oldest first.
pub async fn find_for_entity(
    store: &Store,
    kind: EntityKind,
    entity_id: i64,
) -> Result<Vec<StatusEvent>, AppError> {
    match store {
        Store::Postgres(pool) => {
            let rows = sqlx::query_as::<_, EventRow>(
                "SELECT id, entity_kind, entity_id, from_status, to_status, action, correlation_id, at \
                 FROM status_events \
                 WHERE entity_kind = $1 AND entity_id = $2 \
                 ORDER BY at, id",
            )
            .bind(kind.as_str())
            .bind(entity_id)
            .fetch_all(pool)
            .await?;
            rows.into_iter().map(StatusEvent::try_from).collect()
        }
        Store::Memory(mem) => Ok(mem
            .read()
            .await
            .events
            .iter()
            .filter(|e| e.entity_kind == kind && e.entity_id == entity_id)
            .cloned()
            .collect()),
    }
}
