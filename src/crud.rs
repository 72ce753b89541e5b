//! Seam to the external CRUD store.
//!
//! The core only needs "fetch all rows of a collection" and "set the
//! status field of one row". Query languages, pagination and the wire
//! client stay on the other side of this trait; failures surface as string
//! messages and never corrupt already-computed state.

use std::sync::RwLock;

use chrono::Utc;

use crate::error::CrudError;
use crate::records::{Customer, Employee, Invoice, Project, PurchaseOrder, SourceRows, Vendor};

pub trait RecordStore {
    fn customers(&self) -> Result<Vec<Customer>, CrudError>;
    fn employees(&self) -> Result<Vec<Employee>, CrudError>;
    fn projects(&self) -> Result<Vec<Project>, CrudError>;
    fn vendors(&self) -> Result<Vec<Vendor>, CrudError>;
    fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>, CrudError>;
    fn invoices(&self) -> Result<Vec<Invoice>, CrudError>;

    /// Sets one invoice's status field, stamping `updated_at`.
    fn update_invoice_status(&self, id: i64, status: &str) -> Result<(), CrudError>;

    /// Sets one purchase order's status code, stamping `updated_at`.
    fn update_purchase_order_status(&self, id: i64, status: i64) -> Result<(), CrudError>;
}

/// Fetches all six collections wholesale, the dashboard's input.
pub fn fetch_source_rows(store: &impl RecordStore) -> Result<SourceRows, CrudError> {
    Ok(SourceRows {
        customers: store.customers()?,
        employees: store.employees()?,
        projects: store.projects()?,
        vendors: store.vendors()?,
        purchase_orders: store.purchase_orders()?,
        invoices: store.invoices()?,
    })
}

/// In-memory store for tests and demos.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<SourceRows>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: SourceRows) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, SourceRows>, CrudError> {
        self.rows
            .read()
            .map_err(|_| CrudError::Backend("record store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, SourceRows>, CrudError> {
        self.rows
            .write()
            .map_err(|_| CrudError::Backend("record store lock poisoned".into()))
    }
}

impl RecordStore for MemoryStore {
    fn customers(&self) -> Result<Vec<Customer>, CrudError> {
        Ok(self.read()?.customers.clone())
    }

    fn employees(&self) -> Result<Vec<Employee>, CrudError> {
        Ok(self.read()?.employees.clone())
    }

    fn projects(&self) -> Result<Vec<Project>, CrudError> {
        Ok(self.read()?.projects.clone())
    }

    fn vendors(&self) -> Result<Vec<Vendor>, CrudError> {
        Ok(self.read()?.vendors.clone())
    }

    fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>, CrudError> {
        Ok(self.read()?.purchase_orders.clone())
    }

    fn invoices(&self) -> Result<Vec<Invoice>, CrudError> {
        Ok(self.read()?.invoices.clone())
    }

    fn update_invoice_status(&self, id: i64, status: &str) -> Result<(), CrudError> {
        let mut rows = self.write()?;
        let invoice = rows
            .invoices
            .iter_mut()
            .find(|invoice| invoice.id == id)
            .ok_or(CrudError::RowNotFound {
                collection: "invoices",
                id,
            })?;
        invoice.status = status.to_string();
        invoice.updated_at = Some(Utc::now());
        Ok(())
    }

    fn update_purchase_order_status(&self, id: i64, status: i64) -> Result<(), CrudError> {
        let mut rows = self.write()?;
        let order = rows
            .purchase_orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(CrudError::RowNotFound {
                collection: "purchase_orders",
                id,
            })?;
        order.status = Some(status);
        order.updated_at = Some(Utc::now());
        Ok(())
    }
}
