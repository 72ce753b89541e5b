//! Shared status definitions for invoices and purchase orders.
//!
//! Both vocabularies are closed. Whatever the CRUD backend hands us is
//! normalized at the seam so unrecognized values never reach transition or
//! aggregation logic.

use serde::{Deserialize, Serialize};

/// Invoice lifecycle status, stored as a string by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Pending,
    Approved,
    Paid,
    Overdue,
    Cancelled,
}

/// Registry order, as offered in selection lists.
pub const INVOICE_STATUSES: [InvoiceStatus; 5] = [
    InvoiceStatus::Pending,
    InvoiceStatus::Approved,
    InvoiceStatus::Paid,
    InvoiceStatus::Overdue,
    InvoiceStatus::Cancelled,
];

impl InvoiceStatus {
    /// The string the backend stores for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Returns the status unchanged when recognized, `Pending` otherwise.
/// Total: unrecognized values coerce instead of erroring.
pub fn normalize_invoice_status(raw: &str) -> InvoiceStatus {
    match raw {
        "Pending" => InvoiceStatus::Pending,
        "Approved" => InvoiceStatus::Approved,
        "Paid" => InvoiceStatus::Paid,
        "Overdue" => InvoiceStatus::Overdue,
        "Cancelled" => InvoiceStatus::Cancelled,
        _ => InvoiceStatus::Pending,
    }
}

/// Purchase-order lifecycle status, stored as a small integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    Cancelled,
    Received,
    Ordered,
    UnderReview,
}

/// Registry order, as offered in selection lists.
pub const PURCHASE_ORDER_STATUSES: [PurchaseOrderStatus; 4] = [
    PurchaseOrderStatus::UnderReview,
    PurchaseOrderStatus::Ordered,
    PurchaseOrderStatus::Received,
    PurchaseOrderStatus::Cancelled,
];

impl PurchaseOrderStatus {
    /// The integer code the backend stores for this status.
    pub fn code(&self) -> i64 {
        match self {
            Self::Cancelled => 0,
            Self::Received => 1,
            Self::Ordered => 2,
            Self::UnderReview => 3,
        }
    }

    /// Decodes a stored status code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Cancelled),
            1 => Some(Self::Received),
            2 => Some(Self::Ordered),
            3 => Some(Self::UnderReview),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cancelled => "Cancelled",
            Self::Received => "Received",
            Self::Ordered => "Ordered",
            Self::UnderReview => "Under Review",
        }
    }

    /// Everything except a cancelled order counts as active.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Missing and out-of-range codes fall back to `UnderReview`.
pub fn normalize_purchase_order_status(raw: Option<i64>) -> PurchaseOrderStatus {
    raw.and_then(PurchaseOrderStatus::from_code)
        .unwrap_or(PurchaseOrderStatus::UnderReview)
}

/// Display label for a raw status code. Out-of-range codes render as
/// "Unknown" but take no part in transition logic.
pub fn purchase_order_status_label(raw: Option<i64>) -> &'static str {
    match raw {
        None => PurchaseOrderStatus::UnderReview.label(),
        Some(code) => match PurchaseOrderStatus::from_code(code) {
            Some(status) => status.label(),
            None => "Unknown",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in PURCHASE_ORDER_STATUSES {
            assert_eq!(PurchaseOrderStatus::from_code(status.code()), Some(status));
        }
    }

    #[test]
    fn out_of_range_code_has_no_variant() {
        assert_eq!(PurchaseOrderStatus::from_code(4), None);
        assert_eq!(PurchaseOrderStatus::from_code(-1), None);
        assert_eq!(purchase_order_status_label(Some(9)), "Unknown");
    }
}
