use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::status::EntityKind;

/// Identifies one logical action against one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub kind: EntityKind,
    pub id: i64,
    pub action: &'static str,
}

impl ActionKey {
    pub fn new(kind: EntityKind, id: i64, action: &'static str) -> Self {
        Self { kind, id, action }
    }
}

/// Refuses a second identical action while the first is still running.
///
/// Acquiring returns a ticket; the key is released when the ticket drops.
#[derive(Clone, Default)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<ActionKey>>>,
}

pub struct InFlightTicket {
    active: Arc<Mutex<HashSet<ActionKey>>>,
    keys: Vec<ActionKey>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` if the same action is already in flight.
    pub fn try_acquire(&self, key: ActionKey) -> Option<InFlightTicket> {
        self.try_acquire_all(vec![key])
    }

    /// All-or-nothing acquisition for bulk actions.
    pub fn try_acquire_all(&self, keys: Vec<ActionKey>) -> Option<InFlightTicket> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if keys.iter().any(|k| active.contains(k)) {
            return None;
        }
        active.extend(keys.iter().cloned());
        Some(InFlightTicket {
            active: Arc::clone(&self.active),
            keys,
        })
    }

    pub fn is_active(&self, key: &ActionKey) -> bool {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.contains(key)
    }
}

impl InFlightTicket {
    pub fn keys(&self) -> &[ActionKey] {
        &self.keys
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        for key in &self.keys {
            active.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_drop() {
        let guard = InFlightGuard::new();
        let key = ActionKey::new(EntityKind::Request, 7, "close-offer");
        let ticket = guard.try_acquire(key.clone()).expect("first acquire");
        assert!(guard.is_active(&key));
        assert!(guard.try_acquire(key.clone()).is_none());
        drop(ticket);
        assert!(!guard.is_active(&key));
        assert!(guard.try_acquire(key).is_some());
    }

    #[test]
    fn different_actions_do_not_collide() {
        let guard = InFlightGuard::new();
        let _a = guard.try_acquire(ActionKey::new(EntityKind::Order, 1, "status")).unwrap();
        assert!(guard.try_acquire(ActionKey::new(EntityKind::Order, 2, "status")).is_some());
        assert!(guard.try_acquire(ActionKey::new(EntityKind::Request, 1, "status")).is_some());
    }

    #[test]
    fn bulk_acquire_is_all_or_nothing() {
        let guard = InFlightGuard::new();
        let _held = guard.try_acquire(ActionKey::new(EntityKind::Order, 2, "status")).unwrap();
        let keys = (1..=3).map(|id| ActionKey::new(EntityKind::Order, id, "status")).collect();
        assert!(guard.try_acquire_all(keys).is_none());
        assert!(!guard.is_active(&ActionKey::new(EntityKind::Order, 1, "status")));
        assert!(!guard.is_active(&ActionKey::new(EntityKind::Order, 3, "status")));
    }
}
