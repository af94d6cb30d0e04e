//! Tests for the seeded hotel fixture and property strategies.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use frontdesk_core::repository::CatalogRepository;
use frontdesk_store::InMemoryCatalog;
use frontdesk_testing::properties::stay_period;
use frontdesk_testing::{HotelFixture, date};
use proptest::prelude::*;

#[tokio::test]
async fn test_fixture_registers_layout() {
    let catalog = InMemoryCatalog::new();
    let fixture = HotelFixture::seed(&catalog).await.unwrap();

    let rooms = catalog.rooms_for_hotel(fixture.hotel.id).await.unwrap();
    let numbers: Vec<_> = rooms.iter().map(|room| room.number.clone()).collect();
    assert_eq!(numbers, vec!["101", "102", "201", "202", "301"]);

    let suite = catalog.room_type(fixture.suite.id).await.unwrap().unwrap();
    assert_eq!(suite.max_guests, 4);
    assert_eq!(suite.nightly_price, HotelFixture::SUITE_RATE);
    assert_eq!(fixture.room("201").map(|room| room.type_id), Some(fixture.deluxe.id));
}

proptest! {
    #[test]
    fn prop_generated_periods_are_valid(period in stay_period(date(2024, 1, 1), 90, 14)) {
        prop_assert!(period.check_out() > period.check_in());
        prop_assert!(period.nights() >= 1 && period.nights() <= 14);
    }
}
