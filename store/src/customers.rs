//! In-memory customer registry.

use crate::poisoned;
use frontdesk_core::error::StoreError;
use frontdesk_core::repository::{BoxFuture, CustomerRepository, StoreResult};
use frontdesk_core::types::{Customer, CustomerId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct CustomerTables {
    customers: HashMap<CustomerId, Customer>,
    // First registration wins for each contact key.
    by_email: HashMap<String, CustomerId>,
    by_phone: HashMap<String, CustomerId>,
}

/// Customers held in memory, indexed by email and phone.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCustomers {
    tables: Arc<RwLock<CustomerTables>>,
}

impl InMemoryCustomers {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered customers
    ///
    /// Returns zero if the table lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().map_or(0, |tables| tables.customers.len())
    }

    /// Check if no customer is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CustomerRepository for InMemoryCustomers {
    fn customer(&self, id: CustomerId) -> BoxFuture<'_, StoreResult<Option<Customer>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.customers.get(&id).cloned())
        })
    }

    fn find_by_email(&self, email: String) -> BoxFuture<'_, StoreResult<Option<Customer>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables
                .by_email
                .get(&email)
                .and_then(|id| tables.customers.get(id))
                .cloned())
        })
    }

    fn find_by_phone(&self, phone: String) -> BoxFuture<'_, StoreResult<Option<Customer>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables
                .by_phone
                .get(&phone)
                .and_then(|id| tables.customers.get(id))
                .cloned())
        })
    }

    fn insert(&self, customer: Customer) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let mut tables = self.tables.write().map_err(poisoned)?;
            if tables.customers.contains_key(&customer.id) {
                return Err(StoreError::Duplicate(format!("customer {}", customer.id)));
            }
            if let Some(email) = &customer.email {
                tables.by_email.entry(email.clone()).or_insert(customer.id);
            }
            if let Some(phone) = &customer.phone {
                tables.by_phone.entry(phone.clone()).or_insert(customer.id);
            }
            tracing::debug!(customer_id = %customer.id, "Customer registered");
            tables.customers.insert(customer.id, customer);
            Ok(())
        })
    }
}
