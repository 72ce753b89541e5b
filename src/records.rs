//! Row types for the six collections served by the CRUD backend.
//!
//! Only the fields the core reads are modelled; the persisted records carry
//! more and stay owned by the external store. Status fields are kept raw
//! here and normalized at the seams.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_no: String,
    pub project_no: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: i64,
    pub project_no: Option<String>,
    pub vendor_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
}

/// One wholesale fetch of all six collections, the aggregation input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRows {
    pub customers: Vec<Customer>,
    pub employees: Vec<Employee>,
    pub projects: Vec<Project>,
    pub vendors: Vec<Vendor>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub invoices: Vec<Invoice>,
}
