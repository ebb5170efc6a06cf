//! §3: Player record.

use crate::cards::Card;
use serde::{Deserialize, Serialize};

/// A seated player. `private_hand` is populated only on the Room's own copy
/// and the owning seat's `player_update` projection — never on any
/// broadcast view (see `PublicPlayerView`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub user_id: String,
    pub username: String,
    pub seat: usize,
    pub loss_count: u8,
    pub is_eliminated: bool,
    pub private_hand: Vec<Card>,
}

/// Maximum loss count before elimination (§3: "lossCount reaches 5").
pub const ELIMINATION_LOSS_COUNT: u8 = 5;

impl Player {
    pub fn new(user_id: String, username: String, seat: usize) -> Self {
        Self {
            user_id,
            username,
            seat,
            loss_count: 0,
            is_eliminated: false,
            private_hand: Vec::new(),
        }
    }

    /// §3 invariant: cardCount = lossCount + 1 during a round.
    pub fn card_count(&self) -> u8 {
        self.loss_count + 1
    }
}
