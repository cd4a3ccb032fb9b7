use super::status::{OrderStatus, RequestStatus, WireStatus};

/// Static one-step transition table of a status domain.
///
/// Every variant has an entry; an empty slice marks a status that has no
/// successor under the graph. Slice order is the order options are shown in.
pub trait StatusGraph: WireStatus {
    fn allowed_next(self) -> &'static [Self];

    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    fn can_transition_to(self, target: Self) -> bool {
        self.allowed_next().contains(&target)
    }
}

impl StatusGraph for OrderStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Shipped],
            Self::Processing => &[Self::Shipped],
            Self::Shipped => &[Self::Delivered, Self::Returned],
            Self::Delivered | Self::Returned | Self::Cancelled => &[],
        }
    }
}

impl StatusGraph for RequestStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress, Self::NotAvailable],
            Self::InProgress => &[Self::Shipped],
            Self::Shipped => &[Self::Completed],
            // Offer statuses move through dedicated offer actions only.
            Self::NotAvailable
            | Self::OfferMade
            | Self::OfferDeclined
            | Self::OfferExpired
            | Self::Paid
            | Self::Completed => &[],
        }
    }
}

/// Lookup by wire literal. Literals outside the domain yield no options.
pub fn allowed_next_str<S: StatusGraph>(value: &str) -> &'static [S] {
    value.parse::<S>().map(S::allowed_next).unwrap_or(&[])
}
