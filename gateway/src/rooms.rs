//! Multi-room supervisor. The teacher never ran more than one live table per
//! process; here every `session_id` (§4.5) gets its own [`Room`] actor, held
//! behind the same `Arc<Mutex<..>>` shape the teacher uses for its single
//! shared engine.

use std::collections::HashMap;
use std::sync::Mutex as StdMutex;

use bluffhouse_engine::Room;
use bluffhouse_types::protocol::OutboundFrame;
use tokio::sync::{broadcast, mpsc};
use tracing::info;

/// One room's shared state plus its fan-out plumbing. `state` is the only
/// thing a command touches; `broadcaster` and `connections` exist purely to
/// route the [`bluffhouse_engine::RoomEvent`]s a command produces.
pub struct RoomHandle {
    pub room_id: String,
    pub state: StdMutex<Room>,
    pub broadcaster: broadcast::Sender<OutboundFrame>,
    connections: StdMutex<HashMap<String, mpsc::UnboundedSender<OutboundFrame>>>,
}

impl RoomHandle {
    fn new(room_id: String, max_players: usize, seed_override: Option<u64>) -> Self {
        let (broadcaster, _) = broadcast::channel(1024);
        Self {
            room_id: room_id.clone(),
            state: StdMutex::new(Room::new(room_id, max_players, seed_override)),
            broadcaster,
            connections: StdMutex::new(HashMap::new()),
        }
    }

    /// Registers the connection's private-delivery sink under its claimed
    /// `user_id`, so a later `RoomEvent::Private` finds its way home even
    /// though the room's broadcast channel has no per-recipient filtering.
    pub fn register(&self, user_id: String, tx: mpsc::UnboundedSender<OutboundFrame>) {
        self.connections.lock().expect("connections mutex poisoned").insert(user_id, tx);
    }

    pub fn unregister(&self, user_id: &str) {
        self.connections.lock().expect("connections mutex poisoned").remove(user_id);
    }

    /// Fans a batch of events out: broadcasts go to every subscriber,
    /// privates go to exactly the registered connection (silently dropped
    /// if that connection has since disconnected).
    pub fn dispatch(&self, events: Vec<bluffhouse_engine::RoomEvent>) -> Vec<bluffhouse_engine::RoomEvent> {
        use bluffhouse_engine::RoomEvent;
        for event in &events {
            match event {
                RoomEvent::Broadcast(frame) => {
                    let _ = self.broadcaster.send(frame.clone());
                }
                RoomEvent::Private { user_id, frame } => {
                    let connections = self.connections.lock().expect("connections mutex poisoned");
                    if let Some(tx) = connections.get(user_id) {
                        let _ = tx.send(frame.clone());
                    }
                }
                RoomEvent::GameEnded { .. } => {}
            }
        }
        events
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().expect("room mutex poisoned").is_empty()
    }
}

/// Holds every live room, keyed by `session_id` (§4.5 "demultiplexes by
/// session_id ... to the owning Room").
pub struct RoomRegistry {
    rooms: StdMutex<HashMap<String, std::sync::Arc<RoomHandle>>>,
    max_players: usize,
    seed_override: Option<u64>,
}

/// `session_id` used when a client omits one, for a default single-room
/// deployment (§4.5).
pub const DEFAULT_ROOM_ID: &str = "default";

impl RoomRegistry {
    pub fn new(max_players: usize, seed_override: Option<u64>) -> Self {
        Self {
            rooms: StdMutex::new(HashMap::new()),
            max_players,
            seed_override,
        }
    }

    pub fn get_or_create(&self, room_id: &str) -> std::sync::Arc<RoomHandle> {
        let mut rooms = self.rooms.lock().expect("rooms mutex poisoned");
        if let Some(handle) = rooms.get(room_id) {
            return handle.clone();
        }
        info!(room_id, "room created");
        let handle = std::sync::Arc::new(RoomHandle::new(
            room_id.to_string(),
            self.max_players,
            self.seed_override,
        ));
        rooms.insert(room_id.to_string(), handle.clone());
        handle
    }

    /// §3 Lifecycles: a room with nobody seated and nobody waiting is
    /// destroyed. Run periodically rather than only from the disconnect
    /// handler so a lost disconnect frame can't leak a room forever.
    pub fn reap_idle(&self) {
        let mut rooms = self.rooms.lock().expect("rooms mutex poisoned");
        let before = rooms.len();
        rooms.retain(|_, handle| !handle.is_empty());
        let reaped = before - rooms.len();
        if reaped > 0 {
            info!(reaped, "idle rooms destroyed");
        }
    }
}
