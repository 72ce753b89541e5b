//! Dashboard aggregation over raw collections.
//!
//! Every value here is a pure function of one wholesale fetch; a snapshot
//! is recomputed from scratch on every refresh and never patched in place,
//! so it is always safe to call again with whatever rows are available.
//! Amounts are summed as raw numbers with no currency conversion, a
//! documented simplification carried over from the dashboard this feeds.

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::records::{Invoice, Project, SourceRows};
use crate::status::{InvoiceStatus, normalize_invoice_status, normalize_purchase_order_status};

/// Calendar months in the revenue trend, current month included.
const REVENUE_WINDOW_MONTHS: u32 = 6;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Headline counters and totals for the stat cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_customers: usize,
    /// Projects currently in the Active status.
    pub total_projects: usize,
    pub total_employees: usize,
    pub total_vendors: usize,
    pub active_purchase_orders: usize,
    pub pending_invoices: usize,
    pub overdue_invoices: usize,
    pub total_revenue: f64,
    /// Revenue of the current calendar month, the series' last bucket.
    pub monthly_revenue: f64,
}

/// One bucket of the revenue trend, labelled like "Aug 2026".
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenuePoint {
    pub month: String,
    pub revenue: f64,
}

/// One slice of the project status distribution chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSlice {
    pub name: String,
    pub value: usize,
}

/// Derived, ephemeral view model; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub project_status: Vec<StatusSlice>,
    pub monthly_revenue: Vec<MonthlyRevenuePoint>,
}

// Calendar month `back` months before the anchor, as (year, month).
fn month_back(anchor_year: i32, anchor_month: u32, back: u32) -> (i32, u32) {
    let months = anchor_year * 12 + anchor_month as i32 - 1 - back as i32;
    (months.div_euclid(12), (months.rem_euclid(12) + 1) as u32)
}

fn month_label(year: i32, month: u32) -> String {
    format!("{} {}", MONTH_NAMES[(month - 1) as usize], year)
}

fn count_by_status(invoices: &[Invoice], status: InvoiceStatus) -> usize {
    invoices
        .iter()
        .filter(|invoice| normalize_invoice_status(&invoice.status) == status)
        .count()
}

// Group-by-count over the raw status field, first-seen order.
fn project_status_distribution(projects: &[Project]) -> Vec<StatusSlice> {
    let mut slices: Vec<StatusSlice> = Vec::new();
    for project in projects {
        match slices.iter_mut().find(|slice| slice.name == project.status) {
            Some(slice) => slice.value += 1,
            None => slices.push(StatusSlice {
                name: project.status.clone(),
                value: 1,
            }),
        }
    }
    slices
}

/// Trailing revenue series ending at `now`'s calendar month, oldest first.
/// Bucket membership is calendar-month equality on the invoice date, not a
/// rolling window.
pub fn monthly_revenue_series(invoices: &[Invoice], now: DateTime<Utc>) -> Vec<MonthlyRevenuePoint> {
    (0..REVENUE_WINDOW_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = month_back(now.year(), now.month(), back);
            let revenue = invoices
                .iter()
                .filter(|invoice| {
                    invoice.invoice_date.year() == year && invoice.invoice_date.month() == month
                })
                .map(|invoice| invoice.amount)
                .sum();
            MonthlyRevenuePoint {
                month: month_label(year, month),
                revenue,
            }
        })
        .collect()
}

/// Builds the complete dashboard view model for one fetch of the six
/// collections. Empty collections yield zero counts and an all-zero
/// six-bucket series.
pub fn build_dashboard(rows: &SourceRows, now: DateTime<Utc>) -> DashboardSnapshot {
    let monthly_revenue = monthly_revenue_series(&rows.invoices, now);
    let project_status = project_status_distribution(&rows.projects);

    let stats = DashboardStats {
        total_customers: rows.customers.len(),
        total_projects: rows
            .projects
            .iter()
            .filter(|project| project.status == "Active")
            .count(),
        total_employees: rows.employees.len(),
        total_vendors: rows.vendors.len(),
        active_purchase_orders: rows
            .purchase_orders
            .iter()
            .filter(|order| normalize_purchase_order_status(order.status).is_active())
            .count(),
        pending_invoices: count_by_status(&rows.invoices, InvoiceStatus::Pending),
        overdue_invoices: count_by_status(&rows.invoices, InvoiceStatus::Overdue),
        total_revenue: rows.invoices.iter().map(|invoice| invoice.amount).sum(),
        monthly_revenue: monthly_revenue
            .last()
            .map(|point| point.revenue)
            .unwrap_or(0.0),
    };

    debug!(
        invoices = rows.invoices.len(),
        purchase_orders = rows.purchase_orders.len(),
        projects = rows.projects.len(),
        "dashboard snapshot rebuilt"
    );

    DashboardSnapshot {
        stats,
        project_status,
        monthly_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_back_wraps_across_year_boundaries() {
        assert_eq!(month_back(2026, 2, 0), (2026, 2));
        assert_eq!(month_back(2026, 2, 1), (2026, 1));
        assert_eq!(month_back(2026, 2, 2), (2025, 12));
        assert_eq!(month_back(2026, 2, 5), (2025, 9));
        assert_eq!(month_back(2026, 12, 24), (2024, 12));
    }

    #[test]
    fn month_labels_use_short_names() {
        assert_eq!(month_label(2026, 8), "Aug 2026");
        assert_eq!(month_label(2025, 12), "Dec 2025");
    }
}
