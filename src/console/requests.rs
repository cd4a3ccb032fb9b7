use serde::Serialize;

use crate::audit;
use crate::db::Store;
use crate::errors::AppError;
use crate::models::event::{self, StatusEvent};
use crate::models::notification::{self, NewNotification, Notification, NotificationKind};
use crate::models::request::{self, GadgetRequest, RequestFilter};
use crate::workflow::gate;
use crate::workflow::guard::{ActionKey, InFlightGuard, InFlightTicket};
use crate::workflow::{EntityKind, PriceRules, Present, RequestState, RequestStatus, StatusBadge};
use super::{ACTION_CHAT, ACTION_CLOSE_OFFER, ACTION_CREATE_OFFER, ACTION_STATUS};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    #[serde(flatten)]
    pub request: GadgetRequest,
    pub badge: StatusBadge,
    pub next_options: Vec<RequestStatus>,
    pub can_create_offer: bool,
    pub can_close_offer: bool,
}

impl From<GadgetRequest> for RequestView {
    fn from(request: GadgetRequest) -> Self {
        let state = request.state();
        Self {
            badge: request.status.badge(),
            next_options: gate::next_options_for(request.status).to_vec(),
            can_create_offer: state.can_create_offer(),
            can_close_offer: state.can_close_offer(),
            request,
        }
    }
}

#[derive(Clone)]
pub struct RequestConsole {
    store: Store,
    guard: InFlightGuard,
    price_rules: PriceRules,
}

impl RequestConsole {
    pub fn new(store: Store, guard: InFlightGuard, price_rules: PriceRules) -> Self {
        Self { store, guard, price_rules }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn price_rules(&self) -> PriceRules {
        self.price_rules
    }

    pub async fn list(&self, filter: &RequestFilter) -> Result<Vec<RequestView>, AppError> {
        let requests = request::find_all(&self.store, filter).await?;
        Ok(requests.into_iter().map(RequestView::from).collect())
    }

    pub async fn detail(&self, id: i64) -> Result<RequestView, AppError> {
        Ok(RequestView::from(self.load(id).await?))
    }

    pub async fn events(&self, id: i64) -> Result<Vec<StatusEvent>, AppError> {
        self.load(id).await?;
        event::find_for_entity(&self.store, EntityKind::Request, id).await
    }

    pub async fn notifications(&self, id: i64) -> Result<Vec<Notification>, AppError> {
        self.load(id).await?;
        notification::find_for_request(&self.store, id).await
    }

    /// Graph transition. Entering `in-progress` also enables chat.
    pub async fn change_status(
        &self,
        id: i64,
        target: RequestStatus,
        correlation_id: &str,
    ) -> Result<RequestView, AppError> {
        let _ticket = self.claim(id, ACTION_STATUS)?;
        let current = self.load(id).await?;
        let next = current.state().transition(target)?;
        let updated = self.commit(&current, next, ACTION_STATUS, correlation_id).await?;
        if next.chat_enabled && !current.chat_enabled {
            log::info!("Request {id}: chat enabled on entering {target}");
        }
        Ok(RequestView::from(updated))
    }

    /// Put a price on an in-progress request and queue the payment link
    /// notification for the requester.
    pub async fn create_offer(
        &self,
        id: i64,
        price: f64,
        correlation_id: &str,
    ) -> Result<RequestView, AppError> {
        let price = self.price_rules.validate(price)?;
        let _ticket = self.claim(id, ACTION_CREATE_OFFER)?;
        let current = self.load(id).await?;
        let next = current.state().create_offer(price)?;
        let updated = self.commit(&current, next, ACTION_CREATE_OFFER, correlation_id).await?;

        let notice = NewNotification {
            request_id: id,
            kind: NotificationKind::PaymentLinkSent,
            recipient: updated.requester_email.clone(),
            payload: serde_json::json!({
                "gadgetName": updated.gadget_name,
                "price": price,
                "correlationId": correlation_id,
            }),
        };
        match notification::enqueue(&self.store, &notice).await {
            Ok(_) => log::info!(
                "Request {id}: payment link for {price} queued to {}",
                updated.requester_email
            ),
            Err(e) => log::error!("Request {id}: failed to queue payment link notification: {e}"),
        }

        Ok(RequestView::from(updated))
    }

    pub async fn close_offer(&self, id: i64, correlation_id: &str) -> Result<RequestView, AppError> {
        let _ticket = self.claim(id, ACTION_CLOSE_OFFER)?;
        let current = self.load(id).await?;
        let next = current.state().close_offer()?;
        let updated = self.commit(&current, next, ACTION_CLOSE_OFFER, correlation_id).await?;
        Ok(RequestView::from(updated))
    }

    /// `None` flips the flag. Returns the stored value.
    pub async fn toggle_chat(
        &self,
        id: i64,
        enabled: Option<bool>,
        correlation_id: &str,
    ) -> Result<bool, AppError> {
        let _ticket = self.claim(id, ACTION_CHAT)?;
        let current = self.load(id).await?;
        let next = current.state().toggle_chat(enabled);
        let updated = self.commit(&current, next, ACTION_CHAT, correlation_id).await?;
        Ok(updated.chat_enabled)
    }

    async fn load(&self, id: i64) -> Result<GadgetRequest, AppError> {
        request::find_by_id(&self.store, id).await?.ok_or(AppError::NotFound)
    }

    fn claim(&self, id: i64, action: &'static str) -> Result<InFlightTicket, AppError> {
        self.guard
            .try_acquire(ActionKey::new(EntityKind::Request, id, action))
            .ok_or_else(|| AppError::InFlight(format!("{action} on request {id}")))
    }

    async fn commit(
        &self,
        current: &GadgetRequest,
        next: RequestState,
        action: &str,
        correlation_id: &str,
    ) -> Result<GadgetRequest, AppError> {
        let updated = request::update_state(&self.store, current.id, &current.state(), &next).await?;
        log::info!(
            "Request {}: {action} {} -> {} (correlation {correlation_id})",
            current.id,
            current.status,
            updated.status
        );
        audit::log(
            &self.store,
            EntityKind::Request,
            current.id,
            current.status.as_str(),
            updated.status.as_str(),
            action,
            correlation_id,
        )
        .await;
        Ok(updated)
    }
}
