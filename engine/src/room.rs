//! §4.4: the Room / Game State Machine, the single writer of its own state.
//!
//! Every public method here is one command dispatch: it validates, mutates
//! (or doesn't, on error), and returns the wire events the caller must fan
//! out. There is no `await` anywhere in this module — per §5, transitions
//! are non-suspending and atomic with respect to other commands on the same
//! room; all I/O happens in the Gateway that owns this Room.

use std::collections::{HashMap, VecDeque};

use bluffhouse_types::player::ELIMINATION_LOSS_COUNT;
use bluffhouse_types::protocol::{
    CallBluffData, CurrentCallView, GameStateUpdateData, GameStateView, HostChangedData,
    OutboundFrame, PlayerUpdateData, PublicPlayerView, RevealedHand, RoundStartData,
    ShowCardsData, UserKickedData, UserLeaveData, WaitingForGameData,
};
use bluffhouse_types::{gt, Card, HandDeclaration, Player};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error as ThisError;
use tracing::info;

use crate::bluff;
use crate::deck;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Playing,
    Ended,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Playing => "playing",
            Phase::Ended => "ended",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentCall {
    pub caller_id: String,
    pub declaration: HandDeclaration,
}

#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// Fanned out to every connection currently attached to this room.
    Broadcast(OutboundFrame),
    /// Delivered to exactly one seat's connection.
    Private { user_id: String, frame: OutboundFrame },
    /// Not a wire frame — tells the Gateway to update the Registry's
    /// leaderboard counters. The Room has no Registry handle of its own.
    GameEnded {
        winner_id: String,
        participant_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Seated { is_host: bool },
    Queued,
}

/// §7 error kinds a Room command can raise. `Transport`, `Persistence` and
/// plain `Internal` errors are not modeled here — they belong to the
/// Gateway and Registry respectively.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    AuthorizationOrTurn(String),
    #[error("{0}")]
    Ordering(String),
}

/// One instance per active room (§2, §4.4). Owns players, seating, the turn
/// cursor, and the room's RNG stream.
pub struct Room {
    pub room_id: String,
    pub max_players: usize,
    pub host_user_id: Option<String>,
    pub phase: Phase,
    pub round_number: u32,
    pub seated: Vec<Player>,
    pub eliminated: Vec<Player>,
    pub waiting_list: VecDeque<(String, String)>,
    pub current_turn: Option<String>,
    pub current_call: Option<CurrentCall>,
    pub previous_round_dealt_cards: HashMap<String, Vec<Card>>,
    round_starting_user: Option<String>,
    rng: ChaCha20Rng,
}

impl Room {
    pub fn new(room_id: String, max_players: usize, seed_override: Option<u64>) -> Self {
        Self {
            room_id,
            max_players,
            host_user_id: None,
            phase: Phase::Waiting,
            round_number: 0,
            seated: Vec::new(),
            eliminated: Vec::new(),
            waiting_list: VecDeque::new(),
            current_turn: None,
            current_call: None,
            previous_round_dealt_cards: HashMap::new(),
            round_starting_user: None,
            rng: deck::make_rng(seed_override),
        }
    }

    /// §3 Lifecycles: a room with nobody seated and nobody waiting is dead.
    pub fn is_empty(&self) -> bool {
        self.seated.is_empty() && self.waiting_list.is_empty()
    }

    // ---- §4.4.1 admission -------------------------------------------------

    pub fn join(&mut self, user_id: String, username: String) -> (JoinOutcome, Vec<RoomEvent>) {
        if self.phase == Phase::Waiting && self.seated.len() < self.max_players {
            let is_host = self.seated.is_empty();
            let seat = self.seated.len();
            self.seated.push(Player::new(user_id.clone(), username, seat));
            if is_host {
                self.host_user_id = Some(user_id);
            }
            (
                JoinOutcome::Seated { is_host },
                vec![self.game_state_update_event(None)],
            )
        } else {
            self.waiting_list.push_back((user_id.clone(), username));
            let events = vec![
                RoomEvent::Private {
                    user_id,
                    frame: OutboundFrame::new(
                        "waiting_for_game",
                        &WaitingForGameData {
                            message: "a game is in progress; you'll be seated once it ends"
                                .to_string(),
                        },
                    ),
                },
                self.game_state_update_event(None),
            ];
            (JoinOutcome::Queued, events)
        }
    }

    pub fn leave(&mut self, user_id: &str) -> Vec<RoomEvent> {
        if let Some(pos) = self.waiting_list.iter().position(|(id, _)| id == user_id) {
            self.waiting_list.remove(pos);
            return vec![self.game_state_update_event(None)];
        }

        let seat_idx = match self.seated.iter().position(|p| p.user_id == user_id) {
            Some(idx) => idx,
            None => return Vec::new(),
        };

        let username = self.seated[seat_idx].username.clone();
        let was_host = self.host_user_id.as_deref() == Some(user_id);
        let leave_notice = RoomEvent::Broadcast(OutboundFrame::new(
            "user_leave",
            &UserLeaveData { username },
        ));

        if self.phase == Phase::Playing && self.seated.len() == 2 {
            // §4.4.5a: only one non-eliminated player would remain.
            let winner_id = self.seated[1 - seat_idx].user_id.clone();
            self.seated.remove(seat_idx);
            self.reindex_seats();
            let mut events = vec![leave_notice];
            events.extend(self.end_game(winner_id, None));
            return events;
        }

        let next_turn = if self.phase == Phase::Playing
            && self.current_turn.as_deref() == Some(user_id)
        {
            next_seat_clockwise(&self.seated, user_id)
        } else {
            self.current_turn.clone()
        };

        self.seated.remove(seat_idx);
        self.reindex_seats();
        self.current_turn = next_turn;

        let mut events = vec![leave_notice];
        if was_host {
            if let Some(new_host) = self.pick_random_seated_id() {
                self.host_user_id = Some(new_host.clone());
                events.push(self.host_changed_event(new_host));
            } else {
                self.host_user_id = None;
            }
        }
        events.push(self.game_state_update_event(None));
        events
    }

    pub fn kick(&mut self, host_id: &str, target_username: &str) -> Result<Vec<RoomEvent>, RoomError> {
        if self.host_user_id.as_deref() != Some(host_id) {
            return Err(RoomError::AuthorizationOrTurn(
                "only the host can kick".to_string(),
            ));
        }
        let target_id = self
            .seated
            .iter()
            .find(|p| p.username == target_username)
            .map(|p| p.user_id.clone())
            .or_else(|| {
                self.waiting_list
                    .iter()
                    .find(|(_, username)| username == target_username)
                    .map(|(id, _)| id.clone())
            });
        let target_id = match target_id {
            Some(id) => id,
            None => {
                return Err(RoomError::Validation(format!(
                    "no such user: {target_username}"
                )))
            }
        };

        let mut events = vec![RoomEvent::Private {
            user_id: target_id.clone(),
            frame: OutboundFrame::new(
                "user_kicked",
                &UserKickedData {
                    message: "you have been removed from the room".to_string(),
                },
            ),
        }];
        events.extend(self.leave(&target_id));
        Ok(events)
    }

    // ---- §4.4.2 game start --------------------------------------------------

    pub fn start_game(&mut self, host_id: &str) -> Result<Vec<RoomEvent>, RoomError> {
        if self.host_user_id.as_deref() != Some(host_id) {
            return Err(RoomError::AuthorizationOrTurn(
                "only the host can start the game".to_string(),
            ));
        }
        if self.phase != Phase::Waiting {
            return Err(RoomError::AuthorizationOrTurn(
                "a game is already in progress".to_string(),
            ));
        }
        if self.seated.len() < 2 {
            return Err(RoomError::Validation(
                "need at least 2 players to start".to_string(),
            ));
        }

        for player in &mut self.seated {
            player.loss_count = 0;
            player.is_eliminated = false;
        }
        self.phase = Phase::Playing;
        self.round_number = 0;
        self.round_starting_user = self.pick_random_seated_id();
        info!(room_id = %self.room_id, seated = self.seated.len(), "game started");
        Ok(self.start_round(None))
    }

    pub fn restart_game(&mut self, host_id: &str) -> Result<Vec<RoomEvent>, RoomError> {
        if self.host_user_id.as_deref() != Some(host_id) {
            return Err(RoomError::AuthorizationOrTurn(
                "only the host can restart the game".to_string(),
            ));
        }
        if self.phase == Phase::Playing {
            return Err(RoomError::AuthorizationOrTurn(
                "cannot restart while a round is in progress".to_string(),
            ));
        }

        self.reinstate_eliminated_and_reset_losses();
        if self.seated.len() < 2 {
            return Err(RoomError::Validation(
                "need at least 2 players to start".to_string(),
            ));
        }
        self.phase = Phase::Playing;
        self.round_number = 0;
        self.round_starting_user = self.pick_random_seated_id();
        info!(room_id = %self.room_id, seated = self.seated.len(), "game restarted");
        Ok(self.start_round(None))
    }

    // ---- §4.4.4 turn cycle --------------------------------------------------

    pub fn call_hand(&mut self, user_id: &str, hand_spec: &str) -> Result<Vec<RoomEvent>, RoomError> {
        if self.phase != Phase::Playing {
            return Err(RoomError::AuthorizationOrTurn(
                "no round in progress".to_string(),
            ));
        }
        if self.current_turn.as_deref() != Some(user_id) {
            return Err(RoomError::AuthorizationOrTurn("not your turn".to_string()));
        }
        let declaration = bluffhouse_types::parse_hand_spec(hand_spec)
            .map_err(|e| RoomError::Validation(e.to_string()))?;

        if let Some(current) = &self.current_call {
            if matches!(current.declaration, HandDeclaration::RoyalFlush { .. }) {
                return Err(RoomError::Ordering(
                    "a royal flush can only be bluffed, never raised".to_string(),
                ));
            }
            if !gt(&declaration, &current.declaration) {
                return Err(RoomError::Ordering(
                    "call must strictly exceed the current call".to_string(),
                ));
            }
        }

        self.current_call = Some(CurrentCall {
            caller_id: user_id.to_string(),
            declaration,
        });
        self.current_turn = next_seat_clockwise(&self.seated, user_id);
        Ok(vec![self.game_state_update_event(None)])
    }

    pub fn call_bluff(&mut self, user_id: &str) -> Result<Vec<RoomEvent>, RoomError> {
        if self.phase != Phase::Playing {
            return Err(RoomError::AuthorizationOrTurn(
                "no round in progress".to_string(),
            ));
        }
        if self.current_turn.as_deref() != Some(user_id) {
            return Err(RoomError::AuthorizationOrTurn("not your turn".to_string()));
        }
        let current = self
            .current_call
            .clone()
            .ok_or_else(|| RoomError::Ordering("no call to bluff".to_string()))?;

        let union: Vec<Card> = self
            .seated
            .iter()
            .flat_map(|p| p.private_hand.iter().copied())
            .collect();
        let held = bluff::holds(&current.declaration, &union);
        let loser_id = if held {
            user_id.to_string()
        } else {
            current.caller_id.clone()
        };

        let reveal: Vec<RevealedHand> = self
            .seated
            .iter()
            .map(|p| RevealedHand {
                user_id: p.user_id.clone(),
                cards: p.private_hand.clone(),
            })
            .collect();

        let mut events = vec![
            RoomEvent::Broadcast(OutboundFrame::new("show_cards", &ShowCardsData {})),
            RoomEvent::Broadcast(OutboundFrame::new(
                "call_bluff",
                &CallBluffData {
                    message: if held {
                        "the call holds".to_string()
                    } else {
                        "the call was a bluff".to_string()
                    },
                    loser_id: loser_id.clone(),
                    previous_round_cards: reveal,
                },
            )),
        ];
        events.extend(self.finish_round(loser_id));
        Ok(events)
    }

    // ---- §4.4.3 / §4.4.5 internal transitions -------------------------------

    fn start_round(&mut self, reveal: Option<Vec<RevealedHand>>) -> Vec<RoomEvent> {
        self.round_number += 1;
        self.current_call = None;
        self.current_turn = self.round_starting_user.clone();

        let counts: Vec<u8> = self.seated.iter().map(|p| p.loss_count + 1).collect();
        let mut deck = deck::shuffle(&mut self.rng);
        let hands = deck::deal(&mut deck, &counts)
            .expect("at most 8 seats needing at most 5 cards never exceeds a 52-card deck");
        for (player, hand) in self.seated.iter_mut().zip(hands) {
            player.private_hand = hand;
        }

        let mut events = vec![RoomEvent::Broadcast(OutboundFrame::new(
            "round_start",
            &RoundStartData {
                round_number: self.round_number,
            },
        ))];
        for player in &self.seated {
            events.push(RoomEvent::Private {
                user_id: player.user_id.clone(),
                frame: OutboundFrame::new(
                    "player_update",
                    &PlayerUpdateData {
                        your_cards: player.private_hand.clone(),
                    },
                ),
            });
        }
        events.push(self.game_state_update_event(reveal));
        events
    }

    fn finish_round(&mut self, loser_id: String) -> Vec<RoomEvent> {
        let reveal: Vec<RevealedHand> = self
            .seated
            .iter()
            .map(|p| RevealedHand {
                user_id: p.user_id.clone(),
                cards: p.private_hand.clone(),
            })
            .collect();
        self.previous_round_dealt_cards = reveal
            .iter()
            .map(|r| (r.user_id.clone(), r.cards.clone()))
            .collect();
        for player in &mut self.seated {
            player.private_hand.clear();
        }

        let starter = self
            .round_starting_user
            .clone()
            .expect("a round in progress always has a starting seat");

        // §4.4.5a: the nominal loser may have already left mid-round (`leave`
        // doesn't touch `current_call`); nothing to eliminate, so just move
        // the round on as if this call had no loser. `starter` may itself
        // have left, same as a departed host falls back to a random seat.
        let Some(loser_idx) = self.seated.iter().position(|p| p.user_id == loser_id) else {
            self.round_starting_user =
                next_seat_clockwise(&self.seated, &starter).or_else(|| self.pick_random_seated_id());
            return self.start_round(Some(reveal));
        };
        self.seated[loser_idx].loss_count += 1;
        let eliminated_now = self.seated[loser_idx].loss_count >= ELIMINATION_LOSS_COUNT;

        let mut events = Vec::new();

        if eliminated_now {
            let next_start = clockwise_skip(&self.seated, &starter, &loser_id);
            let mut removed = self.seated.remove(loser_idx);
            removed.is_eliminated = true;
            self.eliminated.push(removed);
            self.reindex_seats();

            if self.host_user_id.as_deref() == Some(loser_id.as_str()) {
                if let Some(new_host) = self.pick_random_seated_id() {
                    self.host_user_id = Some(new_host.clone());
                    events.push(self.host_changed_event(new_host));
                }
            }

            if self.seated.len() == 1 {
                let winner_id = self.seated[0].user_id.clone();
                events.extend(self.end_game(winner_id, Some(reveal)));
                return events;
            }
            self.round_starting_user = next_start;
        } else {
            self.round_starting_user = next_seat_clockwise(&self.seated, &starter);
        }

        events.extend(self.start_round(Some(reveal)));
        events
    }

    fn end_game(&mut self, winner_id: String, reveal: Option<Vec<RevealedHand>>) -> Vec<RoomEvent> {
        info!(room_id = %self.room_id, winner_id = %winner_id, "game ended");
        self.phase = Phase::Ended;
        self.current_call = None;
        self.current_turn = None;

        let participant_ids: Vec<String> = self
            .seated
            .iter()
            .chain(self.eliminated.iter())
            .map(|p| p.user_id.clone())
            .collect();

        let mut events = vec![
            RoomEvent::GameEnded {
                winner_id,
                participant_ids,
            },
            self.game_state_update_event(reveal),
        ];

        self.reinstate_eliminated_and_reset_losses();
        self.phase = Phase::Waiting;
        self.round_number = 0;
        self.admit_waiting_list();
        events.push(self.game_state_update_event(None));
        events
    }

    fn reinstate_eliminated_and_reset_losses(&mut self) {
        for mut player in self.eliminated.drain(..) {
            player.is_eliminated = false;
            player.loss_count = 0;
            player.private_hand.clear();
            self.seated.push(player);
        }
        for player in &mut self.seated {
            player.loss_count = 0;
            player.private_hand.clear();
        }
        self.reindex_seats();
    }

    fn admit_waiting_list(&mut self) {
        while self.seated.len() < self.max_players {
            let Some((user_id, username)) = self.waiting_list.pop_front() else {
                break;
            };
            let seat = self.seated.len();
            self.seated.push(Player::new(user_id, username, seat));
        }
        if self.host_user_id.is_none() {
            self.host_user_id = self.pick_random_seated_id();
        }
    }

    // ---- helpers -------------------------------------------------------------

    fn reindex_seats(&mut self) {
        for (idx, player) in self.seated.iter_mut().enumerate() {
            player.seat = idx;
        }
    }

    fn pick_random_seated_id(&mut self) -> Option<String> {
        if self.seated.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.seated.len());
        Some(self.seated[idx].user_id.clone())
    }

    fn host_changed_event(&self, new_host_id: String) -> RoomEvent {
        let username = self
            .seated
            .iter()
            .find(|p| p.user_id == new_host_id)
            .map(|p| p.username.clone())
            .unwrap_or_default();
        info!(room_id = %self.room_id, new_host_id = %new_host_id, "host changed");
        RoomEvent::Broadcast(OutboundFrame::new(
            "host_changed",
            &HostChangedData {
                new_host: username,
                host_id: new_host_id,
            },
        ))
    }

    fn game_state_update_event(&self, reveal: Option<Vec<RevealedHand>>) -> RoomEvent {
        let players: Vec<PublicPlayerView> = self
            .seated
            .iter()
            .chain(self.eliminated.iter())
            .map(|p| PublicPlayerView {
                user_id: p.user_id.clone(),
                username: p.username.clone(),
                card_count: if self.phase == Phase::Playing {
                    p.card_count()
                } else {
                    0
                },
                losses: p.loss_count,
                is_eliminated: p.is_eliminated,
            })
            .collect();
        let current_call = self.current_call.as_ref().map(|c| CurrentCallView {
            player_id: c.caller_id.clone(),
            hand: c.declaration.clone(),
        });
        let view = GameStateView {
            phase: self.phase.as_str(),
            round_number: self.round_number,
            current_player_id: self.current_turn.clone(),
            current_call,
            players,
            waiting_players_count: self.waiting_list.len(),
        };
        let online_users: Vec<String> = self
            .seated
            .iter()
            .chain(self.eliminated.iter())
            .map(|p| p.username.clone())
            .chain(self.waiting_list.iter().map(|(_, username)| username.clone()))
            .collect();
        RoomEvent::Broadcast(OutboundFrame::new(
            "game_state_update",
            &GameStateUpdateData {
                game_state: view,
                online_users,
                current_round_cards: reveal,
            },
        ))
    }
}

fn next_seat_clockwise(seated: &[Player], from_user_id: &str) -> Option<String> {
    let idx = seated.iter().position(|p| p.user_id == from_user_id)?;
    let next = (idx + 1) % seated.len();
    Some(seated[next].user_id.clone())
}

/// Next seat clockwise of `from_user_id`, skipping `excluded` (the seat
/// about to be removed). Used when computing the next round's starting
/// seat across an elimination (§4.4.5).
fn clockwise_skip(seated_before_removal: &[Player], from_user_id: &str, excluded: &str) -> Option<String> {
    let idx = seated_before_removal
        .iter()
        .position(|p| p.user_id == from_user_id)?;
    let n = seated_before_removal.len();
    for step in 1..=n {
        let candidate = &seated_before_removal[(idx + step) % n];
        if candidate.user_id != excluded {
            return Some(candidate.user_id.clone());
        }
    }
    None
}

#[cfg(test)]
#[path = "room_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod scenario_tests;
