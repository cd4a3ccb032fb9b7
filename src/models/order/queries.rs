use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::errors::AppError;
use crate::workflow::OrderStatus;
use super::types::*;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    customer_email: String,
    item_summary: String,
    total: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            item_summary: row.item_summary,
            total: row.total,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn from_rows(rows: Vec<OrderRow>) -> Result<Vec<Order>, AppError> {
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn count(store: &Store) -> Result<i64, AppError> {
    match store {
        Store::Postgres(pool) => {
            let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
                .fetch_one(pool)
                .await?;
            Ok(n)
        }
        Store::Memory(mem) => Ok(mem.read().await.orders.len() as i64),
    }
}

pub async fn create(store: &Store, new: &NewOrder) -> Result<Order, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, OrderRow>(
                "INSERT INTO orders (customer_name, customer_email, item_summary, total, status) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING id, customer_name, customer_email, item_summary, total, status, created_at, updated_at",
            )
            .bind(&new.customer_name)
            .bind(&new.customer_email)
            .bind(&new.item_summary)
            .bind(new.total)
            .bind(new.status.as_str())
            .fetch_one(pool)
            .await?;
            Order::try_from(row)
        }
        Store::Memory(mem) => {
            let mut tables = mem.write().await;
            let now = Utc::now();
            let order = Order {
                id: tables.next_id(),
                customer_name: new.customer_name.clone(),
                customer_email: new.customer_email.clone(),
                item_summary: new.item_summary.clone(),
                total: new.total,
                status: new.status,
                created_at: now,
                updated_at: now,
            };
            tables.orders.insert(order.id, order.clone());
            Ok(order)
        }
    }
}

/// All orders matching the filter, newest first.
pub async fn find_all(store: &Store, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
    let orders = match store {
        Store::Postgres(pool) => {
            let rows = sqlx::query_as::<_, OrderRow>(
                "SELECT id, customer_name, customer_email, item_summary, total, status, created_at, updated_at \
                 FROM orders \
                 WHERE ($1::TEXT IS NULL OR status = $1) \
                 ORDER BY created_at DESC, id DESC",
            )
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await?;
            from_rows(rows)?
        }
        Store::Memory(mem) => mem.read().await.orders.values().rev().cloned().collect(),
    };

    // Text search runs in Rust so both backends agree on matching rules.
    Ok(orders.into_iter().filter(|o| filter.matches(o)).collect())
}

pub async fn find_by_id(store: &Store, id: i64) -> Result<Option<Order>, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, OrderRow>(
                "SELECT id, customer_name, customer_email, item_summary, total, status, created_at, updated_at \
                 FROM orders WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await?;
            row.map(Order::try_from).transpose()
        }
        Store::Memory(mem) => Ok(mem.read().await.orders.get(&id).cloned()),
    }
}

/// Orders for the given ids, in the order the ids were given.
/// Ids that do not exist are left out.
pub async fn find_by_ids(store: &Store, ids: &[i64]) -> Result<Vec<Order>, AppError> {
    let found = match store {
        Store::Postgres(pool) => {
            let rows = sqlx::query_as::<_, OrderRow>(
                "SELECT id, customer_name, customer_email, item_summary, total, status, created_at, updated_at \
                 FROM orders WHERE id = ANY($1)",
            )
            .bind(ids)
            .fetch_all(pool)
            .await?;
            from_rows(rows)?
        }
        Store::Memory(mem) => {
            let tables = mem.read().await;
            ids.iter().filter_map(|id| tables.orders.get(id).cloned()).collect()
        }
    };
    Ok(ids
        .iter()
        .filter_map(|id| found.iter().find(|o| o.id == *id).cloned())
        .collect())
}

/// Compare-and-set status update: applies only while the stored status
/// still equals `expected`.
pub async fn update_status(
    store: &Store,
    id: i64,
    expected: OrderStatus,
    target: OrderStatus,
) -> Result<Order, AppError> {
    match store {
        Store::Postgres(pool) => {
            let row = sqlx::query_as::<_, OrderRow>(
                "UPDATE orders SET status = $3, updated_at = now() \
                 WHERE id = $1 AND status = $2 \
                 RETURNING id, customer_name, customer_email, item_summary, total, status, created_at, updated_at",
            )
            .bind(id)
            .bind(expected.as_str())
            .bind(target.as_str())
            .fetch_optional(pool)
            .await?;
            match row {
                Some(row) => Order::try_from(row),
                None => Err(missing_or_conflict(find_by_id(store, id).await?.is_some(), id)),
            }
        }
        Store::Memory(mem) => {
            let mut tables = mem.write().await;
            let order = tables.orders.get_mut(&id).ok_or(AppError::NotFound)?;
            if order.status != expected {
                return Err(missing_or_conflict(true, id));
            }
            order.status = target;
            order.updated_at = Utc::now();
            Ok(order.clone())
        }
    }
}

/// Bulk compare-and-set. Either every order moves from `expected` to
/// `target` or none does.
pub async fn update_status_bulk(
    store: &Store,
    ids: &[i64],
    expected: OrderStatus,
    target: OrderStatus,
) -> Result<Vec<Order>, AppError> {
    match store {
        Store::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let rows = sqlx::query_as::<_, OrderRow>(
                "UPDATE orders SET status = $3, updated_at = now() \
                 WHERE id = ANY($1) AND status = $2 \
                 RETURNING id, customer_name, customer_email, item_summary, total, status, created_at, updated_at",
            )
            .bind(ids)
            .bind(expected.as_str())
            .bind(target.as_str())
            .fetch_all(&mut *tx)
            .await?;
            if rows.len() != ids.len() {
                tx.rollback().await?;
                return Err(AppError::Conflict(format!(
                    "{} of {} orders changed status concurrently",
                    ids.len() - rows.len(),
                    ids.len()
                )));
            }
            tx.commit().await?;
            let updated = from_rows(rows)?;
            Ok(ids
                .iter()
                .filter_map(|id| updated.iter().find(|o| o.id == *id).cloned())
                .collect())
        }
        Store::Memory(mem) => {
            let mut tables = mem.write().await;
            for id in ids {
                let order = tables.orders.get(id).ok_or(AppError::NotFound)?;
                if order.status != expected {
                    return Err(missing_or_conflict(true, *id));
                }
            }
            let now = Utc::now();
            let mut updated = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(order) = tables.orders.get_mut(id) {
                    order.status = target;
                    order.updated_at = now;
                    updated.push(order.clone());
                }
            }
            Ok(updated)
        }
    }
}

fn missing_or_conflict(exists: bool, id: i64) -> AppError {
    if exists {
        AppError::Conflict(format!("order {id} changed status concurrently"))
    } else {
        AppError::NotFound
    }
}
