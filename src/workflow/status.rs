use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use super::WorkflowError;

/// Which kind of entity a status, event or in-flight action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Order,
    Request,
}

impl EntityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Request => "request",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(Self::Order),
            "request" => Ok(Self::Request),
            other => Err(format!("unknown entity kind '{other}'")),
        }
    }
}

/// A closed status enumeration with a stable wire literal per variant.
///
/// The literals are lowercase and hyphen-separated and are shared with
/// existing clients, so they must never change.
pub trait WireStatus:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr<Err = WorkflowError> + 'static
{
    const KIND: EntityKind;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

/// Lifecycle of a checkout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }
}

impl WireStatus for OrderStatus {
    const KIND: EntityKind = EntityKind::Order;
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];

    fn as_str(self) -> &'static str {
        OrderStatus::as_str(&self)
    }
}

impl FromStr for OrderStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "returned" => Ok(Self::Returned),
            _ => Err(WorkflowError::UnknownStatus {
                kind: EntityKind::Order,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a gadget request, including the offer statuses that are
/// only reachable through dedicated offer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    Pending,
    InProgress,
    NotAvailable,
    OfferMade,
    OfferDeclined,
    OfferExpired,
    Paid,
    Shipped,
    Completed,
}

impl RequestStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::NotAvailable => "not-available",
            Self::OfferMade => "offer-made",
            Self::OfferDeclined => "offer-declined",
            Self::OfferExpired => "offer-expired",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
        }
    }
}

impl WireStatus for RequestStatus {
    const KIND: EntityKind = EntityKind::Request;
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::InProgress,
        Self::NotAvailable,
        Self::OfferMade,
        Self::OfferDeclined,
        Self::OfferExpired,
        Self::Paid,
        Self::Shipped,
        Self::Completed,
    ];

    fn as_str(self) -> &'static str {
        RequestStatus::as_str(&self)
    }
}

impl FromStr for RequestStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "not-available" => Ok(Self::NotAvailable),
            "offer-made" => Ok(Self::OfferMade),
            "offer-declined" => Ok(Self::OfferDeclined),
            "offer-expired" => Ok(Self::OfferExpired),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            _ => Err(WorkflowError::UnknownStatus {
                kind: EntityKind::Request,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
