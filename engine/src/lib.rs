//! The Card & Hand Model's deck operations (§4.1), the bluff membership
//! predicate (§4.2), and the Room game state machine (§4.4).

pub mod bluff;
pub mod deck;
pub mod room;

pub use bluff::holds;
pub use deck::{deal, make_rng, shuffle, DeckError};
pub use room::{JoinOutcome, Phase, Room, RoomError, RoomEvent};
