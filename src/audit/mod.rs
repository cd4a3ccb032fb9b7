use crate::db::Store;
use crate::models::event::{self, NewStatusEvent};
use crate::workflow::EntityKind;

/// Record a status-affecting action in the audit trail.
///
/// The action itself has already been committed when this runs, so a
/// failure here is logged and swallowed rather than reported to the caller.
pub async fn log(
    store: &Store,
    kind: EntityKind,
    entity_id: i64,
    from_status: &str,
    to_status: &str,
    action: &str,
    correlation_id: &str,
) {
    let new = NewStatusEvent {
        entity_kind: kind,
        entity_id,
        from_status: from_status.to_string(),
        to_status: to_status.to_string(),
        action: action.to_string(),
        correlation_id: correlation_id.to_string(),
    };
    if let Err(e) = event::insert(store, &new).await {
        log::error!(
            "Audit write failed for {kind} {entity_id} ({action}, correlation {correlation_id}): {e}"
        );
    }
}
