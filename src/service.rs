//! Service layer tying the CRUD seam to the approval log.
//!
//! Mirrors what the dashboard's action handlers do: approving a purchase
//! order moves it to Ordered before the decision is logged, rejecting one
//! cancels it; invoice decisions only touch the log, since invoice status
//! is edited through its own form.

use anyhow::Context;

use crate::approvals::{ApprovalAction, ApprovalBackend, ApprovalStore, EntityKind, WriteOutcome};
use crate::crud::{RecordStore, fetch_source_rows};
use crate::dashboard::{DashboardSnapshot, build_dashboard};
use crate::display::{self, RowDisplay};
use crate::records::{Invoice, PurchaseOrder};
use crate::status::PurchaseOrderStatus;

pub struct OpsService<S, B> {
    records: S,
    approvals: ApprovalStore<B>,
}

impl<S: RecordStore, B: ApprovalBackend> OpsService<S, B> {
    pub fn new(records: S, approvals: ApprovalStore<B>) -> Self {
        Self { records, approvals }
    }

    pub fn records(&self) -> &S {
        &self.records
    }

    pub fn approvals(&self) -> &ApprovalStore<B> {
        &self.approvals
    }

    /// Moves the order to Ordered, then records the decision. A failed
    /// status update propagates and leaves the log untouched.
    pub fn approve_purchase_order(&self, id: i64) -> anyhow::Result<WriteOutcome> {
        self.records
            .update_purchase_order_status(id, PurchaseOrderStatus::Ordered.code())
            .context("purchase order approval failed on status update")?;
        Ok(self
            .approvals
            .record(EntityKind::PurchaseOrder, id, ApprovalAction::Approved))
    }

    /// Cancels the order, then records the rejection.
    pub fn reject_purchase_order(&self, id: i64) -> anyhow::Result<WriteOutcome> {
        self.records
            .update_purchase_order_status(id, PurchaseOrderStatus::Cancelled.code())
            .context("purchase order rejection failed on status update")?;
        Ok(self
            .approvals
            .record(EntityKind::PurchaseOrder, id, ApprovalAction::Rejected))
    }

    /// Records the decision only; the invoice's status stays as edited.
    pub fn approve_invoice(&self, id: i64) -> WriteOutcome {
        self.approvals
            .record(EntityKind::Invoice, id, ApprovalAction::Approved)
    }

    /// Records the decision only; the invoice's status stays as edited.
    pub fn reject_invoice(&self, id: i64) -> WriteOutcome {
        self.approvals
            .record(EntityKind::Invoice, id, ApprovalAction::Rejected)
    }

    /// Per-row display state for an invoice, reconciled with the log.
    pub fn invoice_display(
        &self,
        invoice: &Invoice,
        now: chrono::DateTime<chrono::Utc>,
    ) -> RowDisplay {
        let last = self.approvals.last_decision(EntityKind::Invoice, invoice.id);
        display::invoice_display(invoice, last.as_ref(), now)
    }

    /// Per-row display state for a purchase order, reconciled with the log.
    pub fn purchase_order_display(&self, purchase_order: &PurchaseOrder) -> RowDisplay {
        let last = self
            .approvals
            .last_decision(EntityKind::PurchaseOrder, purchase_order.id);
        display::purchase_order_display(purchase_order, last.as_ref())
    }

    /// Fetches all six collections and rebuilds the dashboard view model.
    pub fn dashboard(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<DashboardSnapshot> {
        let rows = fetch_source_rows(&self.records).context("dashboard source fetch failed")?;
        Ok(build_dashboard(&rows, now))
    }
}
