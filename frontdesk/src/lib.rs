//! Front Desk - hotel booking lifecycle and room availability engine
//!
//! This crate decides which rooms can be offered for a stay, prices the stay,
//! creates reservations without double-booking a room or duplicating a
//! customer, and moves each reservation through its status lifecycle with an
//! auditable history.
//!
//! # Architecture
//!
//! ```text
//!                         ┌─────────────────────┐
//!   HTTP (axum) ────────▶ │      FrontDesk      │ ◀──────── library callers
//!                         └─────────────────────┘
//!          │                 │                │                 │
//!          ▼                 ▼                ▼                 ▼
//! ┌────────────────┐ ┌──────────────┐ ┌───────────────┐ ┌────────────────┐
//! │  Availability  │ │   Customer   │ │    Booking    │ │    Revenue     │
//! │     Engine     │ │  Directory   │ │    Manager    │ │   Aggregator   │
//! └────────────────┘ └──────────────┘ └───────────────┘ └────────────────┘
//!          │                 │                │                 │
//!          └─────────────────┴────────────────┴─────────────────┘
//!                                    │
//!                   Catalog / Customer / Booking repositories
//! ```
//!
//! # Key Features
//!
//! ## 1. No double-booking
//!
//! Booking creation locks every requested room, re-checks for overlapping
//! blocking bookings and inserts, all before releasing the locks. Of N
//! concurrent requests for the same room and dates exactly one succeeds; the
//! rest get `RoomUnavailable`.
//!
//! ## 2. Audited state machine
//!
//! Every accepted status change appends one history row in the same store
//! call that changes the status. Transitions are compare-and-set on the
//! stored status. The rules themselves are a pure
//! [`BookingReducer`](frontdesk_core::booking::BookingReducer); the booking
//! manager executes the effects it returns.
//!
//! ## 3. Configurable holds
//!
//! [`HoldPolicy`](frontdesk_core::status::HoldPolicy) decides whether a
//! pending booking already takes the room or only reserves it softly until
//! confirmation.
//!
//! # Example
//!
//! ```no_run
//! use frontdesk::FrontDesk;
//! use frontdesk::seed::seed_demo_hotel;
//! use frontdesk_core::status::HoldPolicy;
//! use chrono::NaiveDate;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let desk = FrontDesk::in_memory(HoldPolicy::default());
//! let demo = seed_demo_hotel(desk.catalog().as_ref()).await?;
//!
//! let check_in = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();
//! let check_out = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap_or_default();
//! let rooms = desk.search_availability(demo.hotel.id, check_in, check_out, 2).await?;
//! println!("{} rooms free", rooms.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod availability;
pub mod config;
pub mod customers;
pub mod lifecycle;
pub mod locks;
pub mod metrics;
pub mod revenue;
pub mod seed;
pub mod server;

pub use app::FrontDesk;
pub use config::Config;
