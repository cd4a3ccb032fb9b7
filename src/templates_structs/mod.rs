// Template context structures for Askama templates, organized by console.
// All types are re-exported: `use marketdesk::templates_structs::*`

use crate::workflow::{Present, StatusBadge, WireStatus};

pub const APP_NAME: &str = "Marketdesk";

/// Common context shared by all console pages.
/// Templates access these as `ctx.app_name`, `ctx.notice`, etc.
pub struct PageContext {
    pub app_name: String,
    pub active: &'static str,
    pub notice: Option<String>,
}

impl PageContext {
    pub fn new(active: &'static str, notice: Option<String>) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            active,
            notice: notice.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// One `<option>` of a status dropdown.
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl StatusOption {
    pub fn of<S: WireStatus + Present>(status: S, selected: bool) -> Self {
        Self {
            value: status.as_str(),
            label: status.badge().label,
            selected,
        }
    }

    pub fn list<S: WireStatus + Present>(statuses: &[S], selected: Option<S>) -> Vec<Self> {
        statuses
            .iter()
            .map(|s| Self::of(*s, selected == Some(*s)))
            .collect()
    }
}

/// Badge fields flattened for templates.
pub struct BadgeCell {
    pub label: &'static str,
    pub icon: &'static str,
    pub color_class: &'static str,
}

impl From<StatusBadge> for BadgeCell {
    fn from(badge: StatusBadge) -> Self {
        Self {
            label: badge.label,
            icon: badge.icon,
            color_class: badge.color_class,
        }
    }
}

mod admin;

pub use self::admin::{OrderRow, OrdersPageTemplate, RequestRow, RequestsPageTemplate};
