//! Customer directory: find-or-create by contact details.
//!
//! A submission is matched on email first, then on phone. A match is returned
//! as stored; the submitted name and nationality never overwrite it.

use frontdesk_core::environment::Clock;
use frontdesk_core::error::{BookingError, Result};
use frontdesk_core::repository::CustomerRepository;
use frontdesk_core::types::{Customer, CustomerId, CustomerInfo};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Normalize an email for identity comparison.
///
/// Trims and lowercases; blank input is no email at all.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Normalize a phone number for identity comparison.
///
/// Strips all whitespace; blank input is no phone at all.
#[must_use]
pub fn normalize_phone(phone: &str) -> Option<String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    (!compact.is_empty()).then_some(compact)
}

/// Resolves booking contact details to a single customer record.
pub struct CustomerDirectory {
    customers: Arc<dyn CustomerRepository>,
    clock: Arc<dyn Clock>,
    // Serializes lookup-then-insert so concurrent submissions with the same
    // contact details register one customer.
    registration: Mutex<()>,
}

impl CustomerDirectory {
    /// Create a directory over a customer repository
    #[must_use]
    pub fn new(customers: Arc<dyn CustomerRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            customers,
            clock,
            registration: Mutex::new(()),
        }
    }

    /// Find the customer matching `info`, or register a new one.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidInput`] if the name is blank
    /// - [`BookingError::Store`] if the repository fails
    #[tracing::instrument(skip(self, info), fields(name = %info.full_name))]
    pub async fn resolve_customer(&self, info: &CustomerInfo) -> Result<Customer> {
        let full_name = info.full_name.trim();
        if full_name.is_empty() {
            return Err(BookingError::invalid_input("customer name is required"));
        }
        let email = info.email.as_deref().and_then(normalize_email);
        let phone = info.phone.as_deref().and_then(normalize_phone);

        let _registration = self.registration.lock().await;

        if let Some(email) = &email {
            if let Some(existing) = self.customers.find_by_email(email.clone()).await? {
                tracing::debug!(customer_id = %existing.id, "Matched customer by email");
                return Ok(existing);
            }
        }
        if let Some(phone) = &phone {
            if let Some(existing) = self.customers.find_by_phone(phone.clone()).await? {
                tracing::debug!(customer_id = %existing.id, "Matched customer by phone");
                return Ok(existing);
            }
        }

        let customer = Customer {
            id: CustomerId::new(),
            full_name: full_name.to_string(),
            email,
            phone,
            nationality: info
                .nationality
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            created_at: self.clock.now(),
        };
        self.customers.insert(customer.clone()).await?;
        tracing::info!(customer_id = %customer.id, "Registered new customer");
        Ok(customer)
    }

    /// Load a customer by id.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotFound`] for an unknown id.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer> {
        self.customers
            .customer(id)
            .await?
            .ok_or_else(|| BookingError::not_found("Customer", id))
    }
}
