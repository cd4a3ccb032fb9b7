use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::{HasStatus, RequestState, RequestStatus};

/// A customer's request for a gadget the marketplace does not list yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GadgetRequest {
    pub id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub gadget_name: String,
    pub description: String,
    pub status: RequestStatus,
    pub chat_enabled: bool,
    pub offer_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GadgetRequest {
    pub fn state(&self) -> RequestState {
        RequestState {
            status: self.status,
            chat_enabled: self.chat_enabled,
            offer_price: self.offer_price,
        }
    }
}

impl HasStatus<RequestStatus> for GadgetRequest {
    fn status(&self) -> RequestStatus {
        self.status
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGadgetRequest {
    pub requester_name: String,
    pub requester_email: String,
    pub gadget_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_status")]
    pub status: RequestStatus,
    #[serde(default)]
    pub chat_enabled: bool,
    #[serde(default)]
    pub offer_price: Option<f64>,
}

fn default_status() -> RequestStatus {
    RequestStatus::Pending
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub q: Option<String>,
}

impl RequestFilter {
    pub fn matches(&self, request: &GadgetRequest) -> bool {
        if let Some(status) = self.status {
            if request.status != status {
                return false;
            }
        }
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let needle = q.to_lowercase();
                [&request.requester_name, &request.requester_email, &request.gadget_name]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}
