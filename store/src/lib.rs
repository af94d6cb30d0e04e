//! In-memory repositories for the front desk booking engine.
//!
//! This crate implements the repository traits from `frontdesk-core` on top
//! of id-indexed maps guarded by `RwLock`s:
//!
//! - [`InMemoryCatalog`]: hotels, room types and rooms
//! - [`InMemoryCustomers`]: customers with email and phone indexes
//! - [`InMemoryBookings`]: bookings, a per-room index and the history log
//!
//! Every repository method takes its table lock once, does its work
//! synchronously and releases the lock before returning, so no lock is ever
//! held across an `.await`. Handles are cheap to clone and share one set of
//! tables.
//!
//! # Example
//!
//! ```
//! use frontdesk_core::repository::CatalogRepository;
//! use frontdesk_core::types::Hotel;
//! use frontdesk_store::InMemoryCatalog;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = InMemoryCatalog::new();
//! let hotel = Hotel::new("Riverside", "12 Ton Duc Thang", "Ho Chi Minh City");
//! catalog.insert_hotel(hotel.clone()).await?;
//!
//! assert_eq!(catalog.hotel(hotel.id).await?, Some(hotel));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bookings;
mod catalog;
mod customers;

pub use bookings::InMemoryBookings;
pub use catalog::InMemoryCatalog;
pub use customers::InMemoryCustomers;

use frontdesk_core::error::StoreError;
use std::sync::PoisonError;

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("in-memory table lock poisoned".to_string())
}
