use serde::Serialize;

use crate::audit;
use crate::db::Store;
use crate::errors::AppError;
use crate::models::event::{self, StatusEvent};
use crate::models::order::{self, Order, OrderFilter};
use crate::workflow::gate;
use crate::workflow::guard::{ActionKey, InFlightGuard};
use crate::workflow::{EntityKind, OrderStatus, Present, StatusBadge};
use super::ACTION_STATUS;

/// An order together with what the console shows next to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub badge: StatusBadge,
    pub next_options: Vec<OrderStatus>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            badge: order.status.badge(),
            next_options: gate::next_options_for(order.status).to_vec(),
            order,
        }
    }
}

#[derive(Clone)]
pub struct OrderConsole {
    store: Store,
    guard: InFlightGuard,
}

impl OrderConsole {
    pub fn new(store: Store, guard: InFlightGuard) -> Self {
        Self { store, guard }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderView>, AppError> {
        let orders = order::find_all(&self.store, filter).await?;
        Ok(orders.into_iter().map(OrderView::from).collect())
    }

    pub async fn detail(&self, id: i64) -> Result<OrderView, AppError> {
        let found = order::find_by_id(&self.store, id).await?.ok_or(AppError::NotFound)?;
        Ok(OrderView::from(found))
    }

    pub async fn events(&self, id: i64) -> Result<Vec<StatusEvent>, AppError> {
        order::find_by_id(&self.store, id).await?.ok_or(AppError::NotFound)?;
        event::find_for_entity(&self.store, EntityKind::Order, id).await
    }

    pub async fn change_status(
        &self,
        id: i64,
        target: OrderStatus,
        correlation_id: &str,
    ) -> Result<OrderView, AppError> {
        let _ticket = self
            .guard
            .try_acquire(ActionKey::new(EntityKind::Order, id, ACTION_STATUS))
            .ok_or_else(|| AppError::InFlight(format!("status change of order {id}")))?;

        let current = order::find_by_id(&self.store, id).await?.ok_or(AppError::NotFound)?;
        gate::check(current.status, target)?;

        let updated = order::update_status(&self.store, id, current.status, target).await?;
        log::info!(
            "Order {id}: {} -> {} (correlation {correlation_id})",
            current.status,
            target
        );
        audit::log(
            &self.store,
            EntityKind::Order,
            id,
            current.status.as_str(),
            target.as_str(),
            ACTION_STATUS,
            correlation_id,
        )
        .await;

        Ok(OrderView::from(updated))
    }

    /// Options for a bulk "change status" menu. Empty for an empty or
    /// mixed-status selection.
    pub async fn bulk_options(&self, ids: &[i64]) -> Result<Vec<OrderStatus>, AppError> {
        let ids = dedup(ids);
        let orders = self.load_selection(&ids).await?;
        Ok(gate::next_options_for_bulk::<OrderStatus, _>(&orders).to_vec())
    }

    pub async fn bulk_change_status(
        &self,
        ids: &[i64],
        target: OrderStatus,
        correlation_id: &str,
    ) -> Result<Vec<OrderView>, AppError> {
        let ids = dedup(ids);
        let keys = ids
            .iter()
            .map(|id| ActionKey::new(EntityKind::Order, *id, ACTION_STATUS))
            .collect();
        let _ticket = self
            .guard
            .try_acquire_all(keys)
            .ok_or_else(|| AppError::InFlight("status change of a selected order".into()))?;

        let orders = self.load_selection(&ids).await?;
        let common = gate::check_bulk(&orders, target)?;

        let updated = order::update_status_bulk(&self.store, &ids, common, target).await?;
        log::info!(
            "Bulk status change of {} orders: {common} -> {target} (correlation {correlation_id})",
            updated.len()
        );
        for order in &updated {
            audit::log(
                &self.store,
                EntityKind::Order,
                order.id,
                common.as_str(),
                target.as_str(),
                "bulk-status",
                correlation_id,
            )
            .await;
        }

        Ok(updated.into_iter().map(OrderView::from).collect())
    }

    /// Every id must exist; a selection with unknown ids is rejected as a whole.
    async fn load_selection(&self, ids: &[i64]) -> Result<Vec<Order>, AppError> {
        let orders = order::find_by_ids(&self.store, ids).await?;
        if orders.len() != ids.len() {
            return Err(AppError::NotFound);
        }
        Ok(orders)
    }
}

fn dedup(ids: &[i64]) -> Vec<i64> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}
