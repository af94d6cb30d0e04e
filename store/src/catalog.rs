//! In-memory room catalog.

use crate::poisoned;
use frontdesk_core::error::StoreError;
use frontdesk_core::repository::{BoxFuture, CatalogRepository, StoreResult};
use frontdesk_core::types::{Hotel, HotelId, Room, RoomId, RoomStatus, RoomType, RoomTypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct CatalogTables {
    hotels: HashMap<HotelId, Hotel>,
    room_types: HashMap<RoomTypeId, RoomType>,
    rooms: HashMap<RoomId, Room>,
}

/// Hotels, room types and rooms held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    tables: Arc<RwLock<CatalogTables>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms across all hotels
    ///
    /// Returns zero if the table lock is poisoned.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.tables.read().map_or(0, |tables| tables.rooms.len())
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn hotel(&self, id: HotelId) -> BoxFuture<'_, StoreResult<Option<Hotel>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.hotels.get(&id).cloned())
        })
    }

    fn room_type(&self, id: RoomTypeId) -> BoxFuture<'_, StoreResult<Option<RoomType>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.room_types.get(&id).cloned())
        })
    }

    fn room_types_for_hotel(
        &self,
        hotel_id: HotelId,
    ) -> BoxFuture<'_, StoreResult<Vec<RoomType>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            let mut room_types: Vec<RoomType> = tables
                .room_types
                .values()
                .filter(|room_type| room_type.hotel_id == hotel_id)
                .cloned()
                .collect();
            room_types.sort_by(|a, b| a.nightly_price.cmp(&b.nightly_price).then(a.name.cmp(&b.name)));
            Ok(room_types)
        })
    }

    fn room(&self, id: RoomId) -> BoxFuture<'_, StoreResult<Option<Room>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.rooms.get(&id).cloned())
        })
    }

    fn rooms_for_hotel(&self, hotel_id: HotelId) -> BoxFuture<'_, StoreResult<Vec<Room>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            let mut rooms: Vec<Room> = tables
                .rooms
                .values()
                .filter(|room| room.hotel_id == hotel_id)
                .cloned()
                .collect();
            rooms.sort_by(Room::listing_order);
            Ok(rooms)
        })
    }

    fn set_room_status(
        &self,
        id: RoomId,
        status: RoomStatus,
    ) -> BoxFuture<'_, StoreResult<Room>> {
        Box::pin(async move {
            let mut tables = self.tables.write().map_err(poisoned)?;
            let room = tables
                .rooms
                .get_mut(&id)
                .ok_or_else(|| StoreError::Missing(format!("room {id}")))?;
            room.status = status;
            tracing::debug!(room_id = %id, room_number = %room.number, %status, "Room status updated");
            Ok(room.clone())
        })
    }

    fn insert_hotel(&self, hotel: Hotel) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let mut tables = self.tables.write().map_err(poisoned)?;
            if tables.hotels.contains_key(&hotel.id) {
                return Err(StoreError::Duplicate(format!("hotel {}", hotel.id)));
            }
            tables.hotels.insert(hotel.id, hotel);
            Ok(())
        })
    }

    fn insert_room_type(&self, room_type: RoomType) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let mut tables = self.tables.write().map_err(poisoned)?;
            if !tables.hotels.contains_key(&room_type.hotel_id) {
                return Err(StoreError::Missing(format!("hotel {}", room_type.hotel_id)));
            }
            if tables.room_types.contains_key(&room_type.id) {
                return Err(StoreError::Duplicate(format!("room type {}", room_type.id)));
            }
            tables.room_types.insert(room_type.id, room_type);
            Ok(())
        })
    }

    fn insert_room(&self, room: Room) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let mut tables = self.tables.write().map_err(poisoned)?;
            if !tables.hotels.contains_key(&room.hotel_id) {
                return Err(StoreError::Missing(format!("hotel {}", room.hotel_id)));
            }
            match tables.room_types.get(&room.type_id) {
                Some(room_type) if room_type.hotel_id == room.hotel_id => {}
                _ => {
                    return Err(StoreError::Missing(format!(
                        "room type {} in hotel {}",
                        room.type_id, room.hotel_id
                    )));
                }
            }
            let number_taken = tables
                .rooms
                .values()
                .any(|existing| existing.hotel_id == room.hotel_id && existing.number == room.number);
            if number_taken || tables.rooms.contains_key(&room.id) {
                return Err(StoreError::Duplicate(format!(
                    "room {} in hotel {}",
                    room.number, room.hotel_id
                )));
            }
            tables.rooms.insert(room.id, room);
            Ok(())
        })
    }
}
