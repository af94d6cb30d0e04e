//! Demo catalog data for local runs.

use frontdesk_core::error::StoreError;
use frontdesk_core::repository::CatalogRepository;
use frontdesk_core::types::{Hotel, Money, Room, RoomStatus, RoomType};

/// What [`seed_demo_hotel`] registered.
#[derive(Clone, Debug)]
pub struct DemoHotel {
    /// The hotel
    pub hotel: Hotel,
    /// Its room types, cheapest first
    pub room_types: Vec<RoomType>,
    /// Its rooms, sorted by number
    pub rooms: Vec<Room>,
}

// (name, max guests, nightly price, floor)
const ROOM_TYPES: [(&str, u32, u64, i32); 4] = [
    ("Standard", 2, 500_000, 1),
    ("Deluxe", 2, 800_000, 2),
    ("Family", 4, 1_200_000, 3),
    ("Suite", 4, 2_000_000, 4),
];

const ROOMS_PER_FLOOR: i32 = 3;

/// Register a demo hotel with four room types and three rooms per floor.
///
/// Room 303 is put under maintenance so the demo shows an excluded room.
///
/// # Errors
///
/// Returns the catalog's error if any insert fails.
pub async fn seed_demo_hotel(catalog: &dyn CatalogRepository) -> Result<DemoHotel, StoreError> {
    let mut hotel = Hotel::new(
        "Saigon Riverside Hotel",
        "12 Ton Duc Thang, District 1",
        "Ho Chi Minh City",
    );
    hotel.phone = Some("+84 28 3822 0000".to_string());
    catalog.insert_hotel(hotel.clone()).await?;

    let mut room_types = Vec::with_capacity(ROOM_TYPES.len());
    let mut rooms = Vec::new();
    for (name, max_guests, price, floor) in ROOM_TYPES {
        let room_type = RoomType::new(hotel.id, name, max_guests, Money::new(price));
        catalog.insert_room_type(room_type.clone()).await?;

        for index in 1..=ROOMS_PER_FLOOR {
            let number = format!("{floor}{index:02}");
            let status = if number == "303" {
                RoomStatus::Maintenance
            } else {
                RoomStatus::Available
            };
            let room = Room::new(hotel.id, room_type.id, number, floor).with_status(status);
            catalog.insert_room(room.clone()).await?;
            rooms.push(room);
        }
        room_types.push(room_type);
    }

    tracing::info!(
        hotel_id = %hotel.id,
        rooms = rooms.len(),
        "Demo hotel registered"
    );
    Ok(DemoHotel {
        hotel,
        room_types,
        rooms,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use frontdesk_store::InMemoryCatalog;

    #[tokio::test]
    async fn test_demo_hotel_layout() {
        let catalog = InMemoryCatalog::new();
        let demo = seed_demo_hotel(&catalog).await.unwrap();

        assert_eq!(demo.rooms.len(), 12);
        assert_eq!(catalog.room_count(), 12);
        let maintenance: Vec<_> = demo
            .rooms
            .iter()
            .filter(|room| room.status == RoomStatus::Maintenance)
            .map(|room| room.number.as_str())
            .collect();
        assert_eq!(maintenance, vec!["303"]);
    }
}
