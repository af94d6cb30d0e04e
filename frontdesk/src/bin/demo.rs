//! Front Desk Demo
//!
//! Walks through a full stay against an in-memory hotel:
//! - Availability search and priced offers
//! - Booking creation and a rejected double booking
//! - Confirmation, check-in and check-out with room status updates
//! - A cancellation, a no-show sweep and the resulting revenue report
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use chrono::NaiveDate;
use frontdesk::seed::seed_demo_hotel;
use frontdesk::{Config, FrontDesk, metrics};
use frontdesk_core::error::BookingError;
use frontdesk_core::types::{CreateBookingRequest, CustomerInfo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, BookingError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| BookingError::invalid_input(format!("{year}-{month}-{day}")))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,frontdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n============================================");
    println!("   Front Desk - Live Demo");
    println!("============================================\n");

    let config = Config::from_env();
    metrics::register_business_metrics();
    let desk = FrontDesk::from_config(&config);
    let demo = seed_demo_hotel(desk.catalog().as_ref()).await?;
    let hotel_id = demo.hotel.id;
    let staff = "reception";

    println!("Hotel: {} ({} rooms)", demo.hotel.name, demo.rooms.len());
    println!("Hold policy: {:?}\n", config.booking.hold_policy);

    // Step 1: search
    let check_in = date(2024, 1, 15)?;
    let check_out = date(2024, 1, 17)?;
    println!("1. Offers for 2 guests, {check_in} → {check_out}:");
    let offers = desk
        .availability()
        .quote(hotel_id, check_in, check_out, 2)
        .await?;
    for offer in &offers {
        println!(
            "   room {:>4}  {:<9} {} nights  {}",
            offer.room.number, offer.room_type.name, offer.nights, offer.total
        );
    }

    // Step 2: book a deluxe room
    let Some(deluxe) = offers.iter().find(|offer| offer.room_type.name == "Deluxe") else {
        return Err("demo hotel has no deluxe room".into());
    };
    let request = CreateBookingRequest {
        customer: CustomerInfo::new("Nguyen Van A")
            .with_email("a@x.com")
            .with_phone("090 123 4567"),
        hotel_id,
        check_in,
        check_out,
        room_ids: vec![deluxe.room.id],
        guests: 2,
    };
    let booking = desk.create_booking(request.clone()).await?;
    println!(
        "\n2. Booked room {} for {}: {} ({})",
        deluxe.room.number, booking.customer_id, booking.total_cost, booking.status
    );

    // Step 3: the same room again
    let second = CreateBookingRequest {
        customer: CustomerInfo::new("Tran Thi B").with_email("b@x.com"),
        ..request
    };
    match desk.create_booking(second).await {
        Err(err @ BookingError::RoomUnavailable { .. }) => println!("\n3. Second request rejected: {err}"),
        Ok(other) => println!("\n3. Unexpectedly booked twice: {}", other.id),
        Err(err) => return Err(err.into()),
    }

    // Step 4: the stay
    println!("\n4. Lifecycle:");
    for booking in [
        desk.bookings().confirm(booking.id, staff).await?,
        desk.bookings().check_in(booking.id, staff).await?,
    ] {
        println!("   → {}", booking.status);
    }
    if let Some(room) = desk.catalog().room(deluxe.room.id).await? {
        println!("   room {} is {}", room.number, room.status);
    }
    let finished = desk.bookings().check_out(booking.id, staff).await?;
    println!("   → {}", finished.status);
    if let Some(room) = desk.catalog().room(deluxe.room.id).await? {
        println!("   room {} is {}", room.number, room.status);
    }

    // Step 5: cancellations and no-shows
    let Some(standard) = offers.iter().find(|offer| offer.room_type.name == "Standard") else {
        return Err("demo hotel has no standard room".into());
    };
    let cancelled = desk
        .create_booking(CreateBookingRequest {
            customer: CustomerInfo::new("Le Van C").with_phone("0912 000 111"),
            hotel_id,
            check_in,
            check_out,
            room_ids: vec![standard.room.id],
            guests: 1,
        })
        .await?;
    desk.bookings()
        .cancel(cancelled.id, staff, Some("change of plans".to_string()))
        .await?;

    let late = desk
        .create_booking(CreateBookingRequest {
            customer: CustomerInfo::new("Pham Thi D").with_email("d@x.com"),
            hotel_id,
            check_in: date(2024, 1, 16)?,
            check_out: date(2024, 1, 18)?,
            room_ids: vec![standard.room.id],
            guests: 1,
        })
        .await?;
    desk.bookings().confirm(late.id, staff).await?;
    let no_shows = desk
        .bookings()
        .sweep_no_shows(hotel_id, date(2024, 1, 17)?, &config.booking.no_show_actor)
        .await?;
    println!("\n5. Cancelled 1 booking, marked {} no-show(s)", no_shows.len());

    // Step 6: history and revenue
    println!("\n6. History of {}:", booking.id);
    for row in desk.bookings().history(booking.id).await? {
        let from = row.old_status.map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("   {from:>11} → {:<11} by {}", row.new_status, row.changed_by);
    }
    let revenue = desk
        .get_revenue(hotel_id, date(2024, 1, 1)?, date(2024, 1, 31)?)
        .await?;
    println!(
        "\n   January revenue: {} over {} booking(s), average {}",
        revenue.total, revenue.count, revenue.average
    );

    println!("\n============================================\n");
    Ok(())
}
