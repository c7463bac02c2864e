//! Room manager: creates rooms, hands out codes and routes players.
//!
//! [`RoomManager`] is the bookkeeping: which rooms exist and who sits
//! where. [`SharedRooms`] puts it behind a lock for the connection tasks
//! and runs the actor round-trips of joining and leaving with that lock
//! released, so a room that is busy with a slow commit never holds up
//! lookups for the other rooms.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scrabr_protocol::{PlayerId, RoomCode};
use scrabr_rules::{DictionaryOracle, Variant};
use tokio::sync::{Mutex, MutexGuard};

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle, RoomSession};

/// Tracks every live room and which room each player is in.
///
/// A player is in at most one room at a time. A seat is recorded here as
/// soon as a join is under way, so the same player cannot race into two
/// rooms. A room with no recorded seats is closed.
pub struct RoomManager<D: DictionaryOracle> {
    rooms: HashMap<RoomCode, RoomHandle>,
    player_rooms: HashMap<PlayerId, RoomCode>,
    oracle: Arc<D>,
    config: RoomConfig,
    rng: StdRng,
}

impl<D: DictionaryOracle> RoomManager<D> {
    pub fn new(oracle: Arc<D>, config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            oracle,
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Spawns an empty room and returns its code.
    pub fn create_room(&mut self, variant: Variant) -> RoomCode {
        let code = self.fresh_code();
        let session = RoomSession::new(code.clone(), variant, self.config.clone());
        let handle = spawn_room(session, Arc::clone(&self.oracle), self.config.command_buffer);
        self.rooms.insert(code.clone(), handle);
        tracing::info!(room = %code, ?variant, open = self.room_count(), "room created");
        code
    }

    /// Draws random codes until one is not in use.
    fn fresh_code(&mut self) -> RoomCode {
        loop {
            let raw: String = (0..RoomCode::LEN)
                .map(|_| {
                    let i = self.rng.random_range(0..RoomCode::ALPHABET.len());
                    char::from(RoomCode::ALPHABET[i])
                })
                .collect();
            if let Ok(code) = RoomCode::parse(&raw) {
                if !self.rooms.contains_key(&code) {
                    return code;
                }
                tracing::debug!(room = %code, "room code collision, drawing again");
            }
        }
    }

    fn ensure_unseated(&self, player_id: PlayerId) -> Result<(), RoomError> {
        match self.player_rooms.get(&player_id) {
            Some(current) => Err(RoomError::AlreadyInRoom(player_id, current.clone())),
            None => Ok(()),
        }
    }

    /// Records a seat for `player_id` in `code` and hands back the room to
    /// join. Undo with [`release_seat`](Self::release_seat) if the room
    /// turns the player away.
    fn reserve_seat(
        &mut self,
        player_id: PlayerId,
        code: &RoomCode,
    ) -> Result<RoomHandle, RoomError> {
        self.ensure_unseated(player_id)?;
        let handle = self
            .rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        self.player_rooms.insert(player_id, code.clone());
        Ok(handle)
    }

    /// Creates a room with a seat already reserved for `player_id`.
    fn reserve_new_room(
        &mut self,
        player_id: PlayerId,
        variant: Variant,
    ) -> Result<RoomHandle, RoomError> {
        self.ensure_unseated(player_id)?;
        let code = self.create_room(variant);
        self.reserve_seat(player_id, &code)
    }

    /// Drops the seat `player_id` holds in `code`, if any. Returns the room
    /// when nobody else holds a seat in it; it is then no longer listed and
    /// the caller shuts it down.
    fn release_seat(&mut self, player_id: PlayerId, code: &RoomCode) -> Option<RoomHandle> {
        if self.player_rooms.get(&player_id) == Some(code) {
            self.player_rooms.remove(&player_id);
        }
        self.close_if_unseated(code)
    }

    /// Takes away the seat of `player_id` and returns the room it was in.
    fn vacate(&mut self, player_id: PlayerId) -> Result<RoomHandle, RoomError> {
        let code = self
            .player_rooms
            .remove(&player_id)
            .ok_or(RoomError::NotSeated(player_id))?;
        self.rooms
            .get(&code)
            .cloned()
            .ok_or(RoomError::NotFound(code))
    }

    /// Unlists `code` when no seat refers to it.
    fn close_if_unseated(&mut self, code: &RoomCode) -> Option<RoomHandle> {
        if self.player_rooms.values().any(|c| c == code) {
            return None;
        }
        let handle = self.rooms.remove(code)?;
        tracing::info!(room = %code, open = self.room_count(), "room closed");
        Some(handle)
    }

    /// Returns the handle for `code`, provided `player_id` sits in that room.
    pub fn route(&self, player_id: PlayerId, code: &RoomCode) -> Result<RoomHandle, RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        if self.player_rooms.get(&player_id) != Some(code) {
            return Err(RoomError::NotInRoom(player_id, code.clone()));
        }
        Ok(handle.clone())
    }

    pub fn room(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).cloned()
    }

    pub fn player_room(&self, player_id: PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(&player_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// A [`RoomManager`] shared by every connection.
///
/// The lock is held only for bookkeeping. Waiting on a room actor always
/// happens with it released.
pub struct SharedRooms<D: DictionaryOracle> {
    inner: Mutex<RoomManager<D>>,
}

impl<D: DictionaryOracle> SharedRooms<D> {
    pub fn new(manager: RoomManager<D>) -> Self {
        Self {
            inner: Mutex::new(manager),
        }
    }

    /// Locks the bookkeeping. Do not await a room while holding the guard.
    pub async fn lock(&self) -> MutexGuard<'_, RoomManager<D>> {
        self.inner.lock().await
    }

    /// Creates a room and seats `player_id` in it.
    pub async fn create_and_join(
        &self,
        player_id: PlayerId,
        name: String,
        variant: Variant,
        sender: PlayerSender,
    ) -> Result<RoomCode, RoomError> {
        let handle = self.lock().await.reserve_new_room(player_id, variant)?;
        self.enter(player_id, handle, name, sender).await
    }

    /// Seats a player in an existing room.
    pub async fn join_room(
        &self,
        player_id: PlayerId,
        code: &RoomCode,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let handle = self.lock().await.reserve_seat(player_id, code)?;
        self.enter(player_id, handle, name, sender).await?;
        Ok(())
    }

    /// Asks the room to seat a player whose seat is already reserved.
    async fn enter(
        &self,
        player_id: PlayerId,
        handle: RoomHandle,
        name: String,
        sender: PlayerSender,
    ) -> Result<RoomCode, RoomError> {
        let code = handle.code().clone();
        let joined = handle.join(player_id, name, sender).await;

        let still_seated = self.lock().await.player_room(player_id) == Some(&code);
        match joined {
            Ok(()) if still_seated => Ok(code),
            // The player left while the room was answering.
            Ok(()) => {
                let _ = handle.leave(player_id).await;
                self.shut_if_unseated(&code).await;
                Err(RoomError::Unavailable(code))
            }
            Err(err) => {
                let closed = self.lock().await.release_seat(player_id, &code);
                if let Some(room) = closed {
                    let _ = room.shutdown().await;
                }
                Err(err)
            }
        }
    }

    async fn shut_if_unseated(&self, code: &RoomCode) {
        let closed = self.lock().await.close_if_unseated(code);
        if let Some(room) = closed {
            let _ = room.shutdown().await;
        }
    }

    /// Takes a player out of their room, shutting the room down if it is
    /// now empty.
    pub async fn leave_room(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let handle = self.lock().await.vacate(player_id)?;
        let left = handle.leave(player_id).await;
        self.shut_if_unseated(handle.code()).await;
        left.map(|_remaining| ())
    }
}
