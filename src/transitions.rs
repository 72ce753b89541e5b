//! Allowed status transitions, used to constrain edit-form choices.
//!
//! The tables are advisory at the edit seam and not re-checked on write.
//! Both lifecycles form a DAG: Cancelled is reachable from every state in
//! one step, and only Cancelled remains reachable after Paid or Received.

use crate::status::{
    InvoiceStatus, PurchaseOrderStatus, normalize_invoice_status, normalize_purchase_order_status,
};

/// Statuses an invoice may move to next. The current status is always
/// included so an edit that leaves it untouched stays valid.
pub fn invoice_transitions(current: InvoiceStatus) -> &'static [InvoiceStatus] {
    use InvoiceStatus::*;
    match current {
        Pending => &[Pending, Approved, Paid, Overdue, Cancelled],
        Approved => &[Approved, Paid, Overdue, Cancelled],
        Paid => &[Paid, Cancelled],
        Overdue => &[Overdue, Paid, Cancelled],
        Cancelled => &[Cancelled],
    }
}

/// Statuses a purchase order may move to next, current included.
pub fn purchase_order_transitions(current: PurchaseOrderStatus) -> &'static [PurchaseOrderStatus] {
    use PurchaseOrderStatus::*;
    match current {
        UnderReview => &[UnderReview, Ordered, Cancelled],
        Ordered => &[Ordered, Received, Cancelled],
        Received => &[Received, Cancelled],
        Cancelled => &[Cancelled],
    }
}

/// Choices offered when editing an existing invoice. Unrecognized raw
/// statuses normalize to Pending, which offers everything. A new invoice
/// offers the whole of [`crate::status::INVOICE_STATUSES`] instead.
pub fn invoice_status_choices(raw: &str) -> &'static [InvoiceStatus] {
    invoice_transitions(normalize_invoice_status(raw))
}

/// Choices offered when editing an existing purchase order. A missing or
/// unrecognized status is treated as Under Review. A new order offers the
/// whole of [`crate::status::PURCHASE_ORDER_STATUSES`] instead.
pub fn purchase_order_status_choices(raw: Option<i64>) -> &'static [PurchaseOrderStatus] {
    purchase_order_transitions(normalize_purchase_order_status(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{INVOICE_STATUSES, PURCHASE_ORDER_STATUSES};

    #[test]
    fn new_records_are_offered_every_status() {
        assert_eq!(INVOICE_STATUSES.len(), 5);
        assert_eq!(PURCHASE_ORDER_STATUSES.len(), 4);
    }

    #[test]
    fn unknown_invoice_status_offers_the_pending_row() {
        assert_eq!(
            invoice_status_choices("Draft"),
            invoice_transitions(InvoiceStatus::Pending)
        );
    }

    #[test]
    fn missing_po_status_offers_the_under_review_row() {
        assert_eq!(
            purchase_order_status_choices(None),
            purchase_order_transitions(PurchaseOrderStatus::UnderReview)
        );
    }
}
