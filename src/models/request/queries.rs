use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::errors::AppError;
use crate::workflow::RequestState;
use super::types::*;

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: i64,
    requester_name: String,
    requester_email: String,
    gadget_name: String,
    description: String,
    status: String,
    chat_enabled: bool,
    offer_price: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for GadgetRequest {
    type Error = AppError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        Ok(GadgetRequest {
            id: row.id,
            requester_name: row.requester_name,
            requester_email: row.requester_email,
            gadget_name: row.gadget_name,
            description: row.description,
            status: row.status.parse()?,
            chat_enabled: row.chat_enabled,
            offer_price: row.offer_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub async fn count(store: &Store) -> Result<i64, AppError> {
    match store {
        Store::Postgres(pool) => {
            let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM gadget_requests")
                .fetch_one(pool)
                .await?;
            Ok(n)
        }
        Store::Memory(mem) => Ok(mem.read().await.requests.len() as i64),
    }
}

pub async fn create(store: &Store, new: &NewGadgetRequest) -> Result<GadgetRequest, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, RequestRow>(
                "INSERT INTO gadget_requests \
                     (requester_name, requester_email, gadget_name, description, status, chat_enabled, offer_price) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING id, requester_name, requester_email, gadget_name, description, status, \
                           chat_enabled, offer_price, created_at, updated_at",
            )
            .bind(&new.requester_name)
            .bind(&new.requester_email)
            .bind(&new.gadget_name)
            .bind(&new.description)
            .bind(new.status.as_str())
            .bind(new.chat_enabled)
            .bind(new.offer_price)
            .fetch_one(pool)
            .await?;
            GadgetRequest::try_from(row)
        }
        Store::Memory(mem) => {
            let mut tables = mem.write().await;
            let now = Utc::now();
            let request = GadgetRequest {
                id: tables.next_id(),
                requester_name: new.requester_name.clone(),
                requester_email: new.requester_email.clone(),
                gadget_name: new.gadget_name.clone(),
                description: new.description.clone(),
                status: new.status,
                chat_enabled: new.chat_enabled,
                offer_price: new.offer_price,
                created_at: now,
                updated_at: now,
            };
            tables.requests.insert(request.id, request.clone());
            Ok(request)
        }
    }
}

pub async fn find_all(store: &Store, filter: &RequestFilter) -> Result<Vec<GadgetRequest>, AppError> {
    let requests = match store {
        Store::Postgres(pool) => {
            let rows = sqlx::query_as::<_, RequestRow>(
                "SELECT id, requester_name, requester_email, gadget_name, description, status, \
                        chat_enabled, offer_price, created_at, updated_at \
                 FROM gadget_requests \
                 WHERE ($1::TEXT IS NULL OR status = $1) \
                 ORDER BY created_at DESC, id DESC",
            )
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await?;
            rows.into_iter()
                .map(GadgetRequest::try_from)
                .collect::<Result<Vec<_>, _>>()?
        }
        Store::Memory(mem) => mem.read().await.requests.values().rev().cloned().collect(),
    };

    Ok(requests.into_iter().filter(|r| filter.matches(r)).collect())
}

pub async fn find_by_id(store: &Store, id: i64) -> Result<Option<GadgetRequest>, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, RequestRow>(
                "SELECT id, requester_name, requester_email, gadget_name, description, status, \
                        chat_enabled, offer_price, created_at, updated_at \
                 FROM gadget_requests WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await?;
            row.map(GadgetRequest::try_from).transpose()
        }
        Store::Memory(mem) => Ok(mem.read().await.requests.get(&id).cloned()),
    }
}

/// Persist a new workflow state. Applies only while the stored state
/// (status, chat flag and offer price) still equals `expected`, so a
/// concurrent chat toggle or offer is never overwritten.
pub async fn update_state(
    store: &Store,
    id: i64,
    expected: &RequestState,
    next: &RequestState,
) -> Result<GadgetRequest, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, RequestRow>(
                "UPDATE gadget_requests \
                 SET status = $5, chat_enabled = $6, offer_price = $7, updated_at = now() \
                 WHERE id = $1 AND status = $2 AND chat_enabled = $3 \
                   AND offer_price IS NOT DISTINCT FROM $4 \
                 RETURNING id, requester_name, requester_email, gadget_name, description, status, \
                           chat_enabled, offer_price, created_at, updated_at",
            )
            .bind(id)
            .bind(expected.status.as_str())
            .bind(expected.chat_enabled)
            .bind(expected.offer_price)
            .bind(next.status.as_str())
            .bind(next.chat_enabled)
            .bind(next.offer_price)
            .fetch_optional(pool)
            .await?;
            match row {
                Some(row) => GadgetRequest::try_from(row),
                None if find_by_id(store, id).await?.is_some() => Err(AppError::Conflict(
                    format!("request {id} changed concurrently"),
                )),
                None => Err(AppError::NotFound),
            }
        }
        Store::Memory(mem) => {
            let mut tables = mem.write().await;
            let request = tables.requests.get_mut(&id).ok_or(AppError::NotFound)?;
            if request.state() != *expected {
                return Err(AppError::Conflict(format!(
                    "request {id} changed concurrently"
                )));
            }
            request.status = next.status;
            request.chat_enabled = next.chat_enabled;
            request.offer_price = next.offer_price;
            request.updated_at = Utc::now();
            Ok(request.clone())
        }
    }
}
