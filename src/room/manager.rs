//! Room registry - the boundary the transport layer talks to
//!
//! Rooms are independent: each has its own lock and timer, so the registry
//! lock is only held long enough to find or insert a room.

use std::sync::Arc;

use ahash::AHashMap;
use tokio::sync::{broadcast, RwLock};

use crate::core::config::EngineConfig;
use crate::core::error::{EchoError, Result};
use crate::core::types::{ParticipantId, RoomCode};
use crate::room::{DelaySettings, JoinInfo, Room, RoomEvent};

pub struct RoomManager {
    config: EngineConfig,
    rooms: RwLock<AHashMap<RoomCode, Arc<Room>>>,
}

impl RoomManager {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            rooms: RwLock::new(AHashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn create_room(&self, code: RoomCode) -> Result<Arc<Room>> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&code) {
            tracing::warn!("Rejected room creation: {} already exists", code);
            return Err(EchoError::RoomAlreadyExists(code));
        }
        let room = Arc::new(Room::new(code.clone(), &self.config));
        rooms.insert(code.clone(), room.clone());
        tracing::info!("Room {} created ({} rooms)", code, rooms.len());
        Ok(room)
    }

    /// Remove a room and stop its timer; false if there was no such room
    pub async fn delete_room(&self, code: &RoomCode) -> bool {
        let removed = self.rooms.write().await.remove(code);
        match removed {
            Some(room) => {
                room.shutdown().await;
                tracing::info!("Room {} deleted", code);
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, code: &RoomCode) -> Result<Arc<Room>> {
        self.rooms
            .read()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| EchoError::RoomNotFound(code.clone()))
    }

    pub async fn room_codes(&self) -> Vec<RoomCode> {
        let mut codes: Vec<RoomCode> = self.rooms.read().await.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub async fn join_room(&self, code: &RoomCode, participant: ParticipantId) -> Result<JoinInfo> {
        let room = self.get(code).await?;
        Ok(room.add_participant(participant).await)
    }

    pub async fn leave_room(&self, code: &RoomCode, participant: &ParticipantId) -> Result<()> {
        let room = self.get(code).await?;
        room.remove_participant(participant).await;
        Ok(())
    }

    /// Remove a participant from every room it is in (client disconnected)
    pub async fn leave_all(&self, participant: &ParticipantId) -> usize {
        let rooms: Vec<Arc<Room>> = self.rooms.read().await.values().cloned().collect();
        let mut left = 0;
        for room in rooms {
            if room.remove_participant(participant).await {
                left += 1;
            }
        }
        left
    }

    pub async fn submit_cell_edit(&self, code: &RoomCode, row: i64, col: i64, key: &str) -> Result<()> {
        self.get(code).await?.submit_cell_edit(row, col, key).await
    }

    pub async fn submit_delay_change(&self, code: &RoomCode, delay_ms: u64) -> Result<DelaySettings> {
        self.get(code).await?.submit_delay_change(delay_ms).await
    }

    pub async fn subscribe(&self, code: &RoomCode) -> Result<broadcast::Receiver<RoomEvent>> {
        Ok(self.get(code).await?.subscribe())
    }

    /// Stop every room's timer and drop all rooms
    pub async fn shutdown(&self) {
        let rooms: Vec<Arc<Room>> = self.rooms.write().await.drain().map(|(_, room)| room).collect();
        for room in &rooms {
            room.shutdown().await;
        }
        tracing::info!("Shut down {} rooms", rooms.len());
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
