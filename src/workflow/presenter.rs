use serde::Serialize;

use super::status::{OrderStatus, RequestStatus};

/// Display metadata for a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBadge {
    pub label: &'static str,
    pub icon: &'static str,
    pub color_class: &'static str,
}

impl StatusBadge {
    const fn new(label: &'static str, icon: &'static str, color_class: &'static str) -> Self {
        Self { label, icon, color_class }
    }
}

pub trait Present {
    fn badge(self) -> StatusBadge;
}

impl Present for OrderStatus {
    fn badge(self) -> StatusBadge {
        match self {
            Self::Pending => StatusBadge::new("Pending", "clock", "badge-yellow"),
            Self::Processing => StatusBadge::new("Processing", "loader", "badge-blue"),
            Self::Shipped => StatusBadge::new("Shipped", "truck", "badge-indigo"),
            Self::Delivered => StatusBadge::new("Delivered", "check-circle", "badge-green"),
            Self::Cancelled => StatusBadge::new("Cancelled", "x-circle", "badge-red"),
            Self::Returned => StatusBadge::new("Returned", "rotate-ccw", "badge-gray"),
        }
    }
}

impl Present for RequestStatus {
    fn badge(self) -> StatusBadge {
        match self {
            Self::Pending => StatusBadge::new("Pending", "clock", "badge-yellow"),
            Self::InProgress => StatusBadge::new("In progress", "loader", "badge-blue"),
            Self::NotAvailable => StatusBadge::new("Not available", "slash", "badge-gray"),
            Self::OfferMade => StatusBadge::new("Offer made", "tag", "badge-purple"),
            Self::OfferDeclined => StatusBadge::new("Offer declined", "x-circle", "badge-red"),
            Self::OfferExpired => StatusBadge::new("Offer expired", "hourglass", "badge-orange"),
            Self::Paid => StatusBadge::new("Paid", "credit-card", "badge-teal"),
            Self::Shipped => StatusBadge::new("Shipped", "truck", "badge-indigo"),
            Self::Completed => StatusBadge::new("Completed", "check-circle", "badge-green"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::status::WireStatus;

    #[test]
    fn every_status_has_a_distinct_label() {
        let labels: std::collections::HashSet<_> =
            OrderStatus::ALL.iter().map(|s| s.badge().label).collect();
        assert_eq!(labels.len(), OrderStatus::ALL.len());

        let labels: std::collections::HashSet<_> =
            RequestStatus::ALL.iter().map(|s| s.badge().label).collect();
        assert_eq!(labels.len(), RequestStatus::ALL.len());
    }

    #[test]
    fn badges_are_filled_in() {
        for badge in OrderStatus::ALL
            .iter()
            .map(|s| s.badge())
            .chain(RequestStatus::ALL.iter().map(|s| s.badge()))
        {
            assert!(!badge.icon.is_empty());
            assert!(badge.color_class.starts_with("badge-"));
        }
    }

    #[test]
    fn badge_serializes_camel_case() {
        let json = serde_json::to_value(RequestStatus::OfferMade.badge()).unwrap();
        assert_eq!(json["colorClass"], "badge-purple");
        assert_eq!(json["icon"], "tag");
    }
}
