//! Offer and chat sub-workflow of gadget requests.
//!
//! Offers move a request through `offer-made` / `offer-declined`, which are
//! outside the general transition graph. Chat is a flag orthogonal to the
//! status, except that entering `in-progress` always switches it on.

use super::WorkflowError;
use super::gate;
use super::status::RequestStatus;

pub const ACTION_CREATE_OFFER: &str = "create-offer";
pub const ACTION_CLOSE_OFFER: &str = "close-offer";

/// The mutable part of a gadget request as seen by the workflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestState {
    pub status: RequestStatus,
    pub chat_enabled: bool,
    pub offer_price: Option<f64>,
}

impl RequestState {
    pub fn new(status: RequestStatus) -> Self {
        Self { status, chat_enabled: false, offer_price: None }
    }

    /// Graph transition. Entering `in-progress` forces chat on.
    pub fn transition(self, target: RequestStatus) -> Result<Self, WorkflowError> {
        gate::check(self.status, target)?;
        let chat_enabled = self.chat_enabled || target == RequestStatus::InProgress;
        Ok(Self { status: target, chat_enabled, ..self })
    }

    pub fn can_create_offer(&self) -> bool {
        self.status == RequestStatus::InProgress
    }

    pub fn can_close_offer(&self) -> bool {
        self.status == RequestStatus::OfferMade
    }

    pub fn create_offer(self, price: f64) -> Result<Self, WorkflowError> {
        self.require(RequestStatus::InProgress, ACTION_CREATE_OFFER)?;
        Ok(Self {
            status: RequestStatus::OfferMade,
            offer_price: Some(price),
            ..self
        })
    }

    pub fn close_offer(self) -> Result<Self, WorkflowError> {
        self.require(RequestStatus::OfferMade, ACTION_CLOSE_OFFER)?;
        Ok(Self { status: RequestStatus::OfferDeclined, ..self })
    }

    /// `None` flips the flag. Never changes the status.
    pub fn toggle_chat(self, enabled: Option<bool>) -> Self {
        let chat_enabled = enabled.unwrap_or(!self.chat_enabled);
        Self { chat_enabled, ..self }
    }

    fn require(&self, required: RequestStatus, action: &'static str) -> Result<(), WorkflowError> {
        if self.status == required {
            Ok(())
        } else {
            Err(WorkflowError::Precondition {
                action,
                required: required.as_str(),
                actual: self.status.as_str(),
            })
        }
    }
}

/// Validation applied to offer prices before an offer is created.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRules {
    pub max: Option<f64>,
}

impl PriceRules {
    pub fn validate(&self, price: f64) -> Result<f64, WorkflowError> {
        if !price.is_finite() {
            return Err(WorkflowError::InvalidPrice("price must be a finite number".into()));
        }
        if price <= 0.0 {
            return Err(WorkflowError::InvalidPrice("price must be greater than zero".into()));
        }
        if let Some(max) = self.max {
            if price > max {
                return Err(WorkflowError::InvalidPrice(format!("price must not exceed {max}")));
            }
        }
        Ok(price)
    }

    /// Accepts the textual form the admin form posts, e.g. `" 149.90 "`.
    pub fn parse(&self, raw: &str) -> Result<f64, WorkflowError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkflowError::InvalidPrice("price is required".into()));
        }
        let price = trimmed
            .parse::<f64>()
            .map_err(|_| WorkflowError::InvalidPrice(format!("'{trimmed}' is not a number")))?;
        self.validate(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::status::WireStatus;

    #[test]
    fn entering_in_progress_enables_chat() {
        let state = RequestState::new(RequestStatus::Pending);
        assert!(!state.chat_enabled);
        let next = state.transition(RequestStatus::InProgress).unwrap();
        assert_eq!(next.status, RequestStatus::InProgress);
        assert!(next.chat_enabled);
    }

    #[test]
    fn other_transitions_keep_chat_flag() {
        let off = RequestState::new(RequestStatus::Pending);
        let next = off.transition(RequestStatus::NotAvailable).unwrap();
        assert!(!next.chat_enabled);

        let on = RequestState { status: RequestStatus::InProgress, chat_enabled: true, offer_price: None };
        assert!(on.transition(RequestStatus::Shipped).unwrap().chat_enabled);

        let off_shipped = RequestState::new(RequestStatus::Shipped);
        assert!(!off_shipped.transition(RequestStatus::Completed).unwrap().chat_enabled);
    }

    #[test]
    fn disabling_chat_keeps_status() {
        let state = RequestState::new(RequestStatus::Pending)
            .transition(RequestStatus::InProgress)
            .unwrap()
            .toggle_chat(Some(false));
        assert_eq!(state.status, RequestStatus::InProgress);
        assert!(!state.chat_enabled);
        assert!(state.toggle_chat(None).chat_enabled);
    }

    #[test]
    fn offer_only_from_in_progress() {
        for status in RequestStatus::ALL.iter().copied() {
            let result = RequestState::new(status).create_offer(100.0);
            if status == RequestStatus::InProgress {
                let state = result.unwrap();
                assert_eq!(state.status, RequestStatus::OfferMade);
                assert_eq!(state.offer_price, Some(100.0));
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    WorkflowError::Precondition {
                        action: ACTION_CREATE_OFFER,
                        required: "in-progress",
                        actual: status.as_str(),
                    }
                );
            }
        }
    }

    #[test]
    fn close_only_from_offer_made() {
        let made = RequestState::new(RequestStatus::InProgress).create_offer(20.0).unwrap();
        let closed = made.close_offer().unwrap();
        assert_eq!(closed.status, RequestStatus::OfferDeclined);
        assert_eq!(closed.offer_price, Some(20.0));
        assert!(closed.close_offer().is_err());
        assert!(RequestState::new(RequestStatus::Pending).close_offer().is_err());
    }

    #[test]
    fn price_rules() {
        let rules = PriceRules::default();
        assert_eq!(rules.validate(12.5), Ok(12.5));
        assert!(rules.validate(0.0).is_err());
        assert!(rules.validate(-3.0).is_err());
        assert!(rules.validate(f64::NAN).is_err());
        assert!(rules.validate(f64::INFINITY).is_err());

        let capped = PriceRules { max: Some(1000.0) };
        assert!(capped.validate(1000.0).is_ok());
        assert!(capped.validate(1000.01).is_err());
    }

    #[test]
    fn price_parsing() {
        let rules = PriceRules::default();
        assert_eq!(rules.parse(" 149.90 "), Ok(149.90));
        assert!(rules.parse("").is_err());
        assert!(rules.parse("NaN").is_err());
        assert!(rules.parse("abc").is_err());
    }
}
