//! Application facade.
//!
//! [`FrontDesk`] wires the repositories, clock and hold policy into the four
//! services and exposes the operations the front desk UI and HTTP layer call.
//! It is cheap to clone; every clone shares the same services.

use crate::availability::AvailabilityEngine;
use crate::config::Config;
use crate::customers::CustomerDirectory;
use crate::lifecycle::BookingManager;
use crate::revenue::RevenueAggregator;
use chrono::NaiveDate;
use frontdesk_core::environment::{Clock, SystemClock};
use frontdesk_core::error::Result;
use frontdesk_core::repository::{BookingRepository, CatalogRepository, CustomerRepository};
use frontdesk_core::status::{BookingStatus, HoldPolicy};
use frontdesk_core::types::{Booking, BookingId, CreateBookingRequest, HotelId, RevenueSummary, Room};
use frontdesk_store::{InMemoryBookings, InMemoryCatalog, InMemoryCustomers};
use std::sync::Arc;

/// The booking engine, assembled.
#[derive(Clone)]
pub struct FrontDesk {
    catalog: Arc<dyn CatalogRepository>,
    availability: Arc<AvailabilityEngine>,
    customers: Arc<CustomerDirectory>,
    bookings: Arc<BookingManager>,
    revenue: Arc<RevenueAggregator>,
}

impl FrontDesk {
    /// Assemble the services over the given repositories.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        customers: Arc<dyn CustomerRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
        policy: HoldPolicy,
    ) -> Self {
        let directory = Arc::new(CustomerDirectory::new(customers, Arc::clone(&clock)));
        Self {
            availability: Arc::new(AvailabilityEngine::new(
                Arc::clone(&catalog),
                Arc::clone(&bookings),
                policy,
            )),
            bookings: Arc::new(BookingManager::new(
                Arc::clone(&catalog),
                Arc::clone(&bookings),
                Arc::clone(&directory),
                clock,
                policy,
            )),
            revenue: Arc::new(RevenueAggregator::new(
                Arc::clone(&catalog),
                bookings,
                policy,
            )),
            customers: directory,
            catalog,
        }
    }

    /// In-memory engine on the system clock.
    #[must_use]
    pub fn in_memory(policy: HoldPolicy) -> Self {
        Self::in_memory_with_clock(Arc::new(SystemClock), policy)
    }

    /// In-memory engine on a caller-supplied clock.
    #[must_use]
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>, policy: HoldPolicy) -> Self {
        Self::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(InMemoryCustomers::new()),
            Arc::new(InMemoryBookings::new()),
            clock,
            policy,
        )
    }

    /// In-memory engine configured from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::in_memory(config.booking.hold_policy)
    }

    /// Room catalog
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogRepository> {
        &self.catalog
    }

    /// Availability engine
    #[must_use]
    pub fn availability(&self) -> &AvailabilityEngine {
        &self.availability
    }

    /// Customer directory
    #[must_use]
    pub fn customers(&self) -> &CustomerDirectory {
        &self.customers
    }

    /// Booking lifecycle manager
    #[must_use]
    pub fn bookings(&self) -> &BookingManager {
        &self.bookings
    }

    /// Revenue and occupancy reporting
    #[must_use]
    pub fn revenue(&self) -> &RevenueAggregator {
        &self.revenue
    }

    /// Rooms that can host `guests` for the stay.
    ///
    /// # Errors
    ///
    /// See [`AvailabilityEngine::find_available_rooms`].
    pub async fn search_availability(
        &self,
        hotel_id: HotelId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Vec<Room>> {
        self.availability
            .find_available_rooms(hotel_id, check_in, check_out, guests)
            .await
    }

    /// Reserve rooms, producing a PENDING booking.
    ///
    /// # Errors
    ///
    /// See [`BookingManager::create_booking`].
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking> {
        self.bookings.create_booking(request).await
    }

    /// Move a booking to a new status.
    ///
    /// # Errors
    ///
    /// See [`BookingManager::transition`].
    pub async fn transition_booking(
        &self,
        booking_id: BookingId,
        new_status: BookingStatus,
        changed_by: &str,
        reason: Option<String>,
    ) -> Result<Booking> {
        self.bookings
            .transition(booking_id, new_status, changed_by, reason)
            .await
    }

    /// Revenue of bookings checking in within `[from, to]`.
    ///
    /// # Errors
    ///
    /// See [`RevenueAggregator::revenue`].
    pub async fn get_revenue(
        &self,
        hotel_id: HotelId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RevenueSummary> {
        self.revenue.revenue(hotel_id, from, to).await
    }
}
