use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::EntityKind;

/// One entry of the status audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub from_status: String,
    pub to_status: String,
    pub action: String,
    pub correlation_id: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStatusEvent {
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub from_status: String,
    pub to_status: String,
    pub action: String,
    pub correlation_id: String,
}
