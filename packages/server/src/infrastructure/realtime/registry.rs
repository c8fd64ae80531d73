//! Process-wide class id → room registry.
//!
//! Rooms are created lazily on first use and are never evicted, so the map
//! grows with the number of distinct classes seen by this process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ClassId, Message, MessageBroadcaster};

use super::room::RoomHandle;

/// Registry of live rooms
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<ClassId, RoomHandle>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the room for a class, creating it if this is the first request.
    ///
    /// Concurrent first callers for the same class always get the same room.
    pub async fn get_or_create(&self, class_id: ClassId) -> RoomHandle {
        if let Some(room) = self.rooms.read().await.get(&class_id) {
            return room.clone();
        }

        let mut rooms = self.rooms.write().await;
        rooms
            .entry(class_id)
            .or_insert_with(|| {
                tracing::info!(%class_id, "Creating room");
                RoomHandle::spawn(class_id)
            })
            .clone()
    }

    /// Look up an existing room without creating one.
    pub async fn get(&self, class_id: ClassId) -> Option<RoomHandle> {
        self.rooms.read().await.get(&class_id).cloned()
    }

    /// (class id, member count) for every room, sorted by class id.
    pub async fn snapshot(&self) -> Vec<(ClassId, usize)> {
        let rooms: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();

        let mut summary = Vec::with_capacity(rooms.len());
        for room in rooms {
            summary.push((room.class_id(), room.member_count().await));
        }
        summary.sort_by_key(|(class_id, _)| *class_id);
        summary
    }
}

#[async_trait]
impl MessageBroadcaster for RoomRegistry {
    async fn publish(&self, class_id: ClassId, message: Message) {
        self.get_or_create(class_id).await.publish(message);
    }
}
