//! Deterministic per-row display state for table views.
//!
//! Reconciles an entity's status with its logged approval state. Status is
//! the source of truth for terminal states; the approval log is
//! authoritative only while a decision is still outstanding. The matches
//! below are exhaustive over the status variants so a new status cannot be
//! added without deciding its display rules.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::approvals::{ApprovalState, HistoryEntry};
use crate::records::{Invoice, PurchaseOrder};
use crate::status::{
    InvoiceStatus, PurchaseOrderStatus, normalize_invoice_status, normalize_purchase_order_status,
};

/// Approval badge shown next to the status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayApproval {
    Pending,
    Approved,
    Rejected,
    NotApplicable,
}

impl DisplayApproval {
    pub fn badge_label(&self) -> &'static str {
        match self {
            Self::Pending => "Approval: Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::NotApplicable => "Approval: N/A",
        }
    }
}

impl From<ApprovalState> for DisplayApproval {
    fn from(state: ApprovalState) -> Self {
        match state {
            ApprovalState::Pending => Self::Pending,
            ApprovalState::Approved => Self::Approved,
            ApprovalState::Rejected => Self::Rejected,
        }
    }
}

/// Last action named in the audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Pending,
    Approved,
    Rejected,
    Paid,
    Overdue,
    Cancelled,
    Received,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
            Self::Cancelled => "Cancelled",
            Self::Received => "Received",
        }
    }
}

/// Static actor attribution, derived from the action alone. Cosmetic; not
/// an identity or authorization mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Controller,
    Buyer,
    Warehouse,
    System,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Controller => "Controller",
            Self::Buyer => "Buyer",
            Self::Warehouse => "Warehouse",
            Self::System => "System",
        }
    }
}

/// Human-readable last-action summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLine {
    pub action: AuditAction,
    pub timestamp: Option<DateTime<Utc>>,
    pub actor: ActorRole,
}

impl AuditLine {
    /// E.g. `Last action: Approved on 2026-08-05 14:02`.
    pub fn text(&self) -> String {
        let when = match &self.timestamp {
            Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
            None => "--".to_string(),
        };
        format!("Last action: {} on {}", self.action.as_str(), when)
    }
}

/// The reconciled display state for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDisplay {
    pub approval: DisplayApproval,
    pub audit: AuditLine,
    pub overdue_by_days: Option<i64>,
}

impl RowDisplay {
    /// Approve/reject actions are offered only while a decision is open.
    pub fn offers_decision(&self) -> bool {
        self.approval == DisplayApproval::Pending
    }
}

fn invoice_actor(action: AuditAction) -> ActorRole {
    use AuditAction::*;
    match action {
        Approved | Rejected | Cancelled | Pending => ActorRole::Controller,
        Paid | Overdue => ActorRole::System,
        // not produced for invoices
        Received => ActorRole::System,
    }
}

fn purchase_order_actor(action: AuditAction) -> ActorRole {
    use AuditAction::*;
    match action {
        Approved | Rejected | Cancelled => ActorRole::Controller,
        Received => ActorRole::Warehouse,
        Pending => ActorRole::Buyer,
        // not produced for purchase orders
        Paid | Overdue => ActorRole::System,
    }
}

/// Whole days past due, at least one.
fn overdue_days(due_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due = due_date.and_time(NaiveTime::MIN).and_utc();
    let days = ((now - due).num_seconds() as f64 / 86_400.0).ceil() as i64;
    days.max(1)
}

// Store entry timestamp, else the row's update time, else its creation.
fn audit_timestamp(
    last_decision: Option<&HistoryEntry>,
    updated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
) -> DateTime<Utc> {
    last_decision
        .map(|entry| entry.timestamp)
        .or(updated_at)
        .unwrap_or(created_at)
}

/// Display state for one invoice row. Every recognized status forces the
/// badge; the log only contributes the audit timestamp.
pub fn invoice_display(
    invoice: &Invoice,
    last_decision: Option<&HistoryEntry>,
    now: DateTime<Utc>,
) -> RowDisplay {
    use InvoiceStatus::*;

    let status = normalize_invoice_status(&invoice.status);
    let timestamp = audit_timestamp(last_decision, invoice.updated_at, invoice.created_at);

    let (approval, action, overdue_by_days) = match status {
        Cancelled => (DisplayApproval::NotApplicable, AuditAction::Cancelled, None),
        Pending => (DisplayApproval::Pending, AuditAction::Pending, None),
        Approved => (DisplayApproval::Approved, AuditAction::Approved, None),
        Paid => (DisplayApproval::Approved, AuditAction::Paid, None),
        Overdue => (
            DisplayApproval::Approved,
            AuditAction::Overdue,
            Some(overdue_days(invoice.due_date, now)),
        ),
    };

    RowDisplay {
        approval,
        audit: AuditLine {
            action,
            timestamp: Some(timestamp),
            actor: invoice_actor(action),
        },
        overdue_by_days,
    }
}

/// Display state for one purchase-order row. Cancelled and Ordered force
/// the badge; Received and Under Review defer to the log.
pub fn purchase_order_display(
    purchase_order: &PurchaseOrder,
    last_decision: Option<&HistoryEntry>,
) -> RowDisplay {
    use PurchaseOrderStatus::*;

    let status = normalize_purchase_order_status(purchase_order.status);
    let stored = last_decision
        .map(|entry| ApprovalState::from(entry.action))
        .unwrap_or(ApprovalState::Pending);
    let timestamp = audit_timestamp(
        last_decision,
        purchase_order.updated_at,
        purchase_order.created_at,
    );

    let approval = match status {
        Cancelled => DisplayApproval::NotApplicable,
        Ordered => DisplayApproval::Approved,
        Received | UnderReview => stored.into(),
    };

    let action = match status {
        Cancelled => AuditAction::Cancelled,
        Received => AuditAction::Received,
        Ordered => AuditAction::Approved,
        UnderReview => match stored {
            ApprovalState::Approved => AuditAction::Approved,
            ApprovalState::Rejected => AuditAction::Rejected,
            ApprovalState::Pending => AuditAction::Pending,
        },
    };

    RowDisplay {
        approval,
        audit: AuditLine {
            action,
            timestamp: Some(timestamp),
            actor: purchase_order_actor(action),
        },
        overdue_by_days: None,
    }
}
