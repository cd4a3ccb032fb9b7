use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::errors::AppError;
use super::types::*;

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    request_id: i64,
    kind: String,
    recipient: String,
    payload: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            request_id: row.request_id,
            kind: row.kind.parse().map_err(AppError::Validation)?,
            recipient: row.recipient,
            payload: serde_json::from_str(&row.payload)?,
            created_at: row.created_at,
        })
    }
}

/// Append to the outbox.
pub async fn enqueue(store: &Store, new: &NewNotification) -> Result<Notification, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, NotificationRow>(
                "INSERT INTO notifications (request_id, kind, recipient, payload) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, request_id, kind, recipient, payload, created_at",
            )
            .bind(new.request_id)
            .bind(new.kind.as_str())
            .bind(&new.recipient)
            .bind(new.payload.to_string())
            .fetch_one(pool)
            .await?;
            Notification::try_from(row)
        }
        Store::Memory(mem) => {
            let mut tables = mem.write().await;
            let notification = Notification {
                id: tables.next_id(),
                request_id: new.request_id,
                kind: new.kind,
                recipient: new.recipient.clone(),
                payload: new.payload.clone(),
                created_at: Utc::now(),
            };
            tables.notifications.push(notification.clone());
            Ok(notification)
        }
    }
}

pub async fn find_for_request(store: &Store, request_id: i64) -> Result<Vec<Notification>, AppError> {
    match store {
        Store::Postgres(pool) => {
            let rows = sqlx::query_as::<_, NotificationRow>(
                "SELECT id, request_id, kind, recipient, payload, created_at \
                 FROM notifications WHERE request_id = $1 ORDER BY created_at, id",
            )
            .bind(request_id)
            .fetch_all(pool)
            .await?;
            rows.into_iter().map(Notification::try_from).collect()
        }
        Store::Memory(mem) => Ok(mem
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.request_id == request_id)
            .cloned()
            .collect()),
    }
}
