//! §6: the wire protocol. Every frame is `{"type": ..., "data": {...},
//! "session_id": optional}`. Inbound frames are decoded by `type` into an
//! [`InboundCommand`]; outbound messages are built as an [`OutboundFrame`]
//! whose `data` is whichever payload struct matches its `msg_type`.

use crate::cards::Card;
use crate::hand::HandDeclaration;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

/// The raw envelope as received from the socket, before `data` is
/// interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown frame type {0:?}")]
    UnknownType(String),
    #[error("malformed data for {0:?}: {1}")]
    MalformedData(String, String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserJoinRequest {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameStartRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameRestartRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KickUserRequest {
    pub host_id: String,
    pub target_username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallHandRequest {
    pub user_id: String,
    pub hand_spec: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallBluffRequest {
    pub user_id: String,
}

/// A decoded inbound command, §6 "Inbound types (client→server)".
#[derive(Debug, Clone)]
pub enum InboundCommand {
    UserJoin(UserJoinRequest),
    GameStart(GameStartRequest),
    GameRestart(GameRestartRequest),
    KickUser(KickUserRequest),
    CallHand(CallHandRequest),
    CallBluff(CallBluffRequest),
}

impl InboundCommand {
    pub fn decode(frame: &InboundFrame) -> Result<Self, ProtocolError> {
        fn from_value<T: for<'de> Deserialize<'de>>(
            ty: &str,
            data: &Value,
        ) -> Result<T, ProtocolError> {
            serde_json::from_value(data.clone())
                .map_err(|e| ProtocolError::MalformedData(ty.to_string(), e.to_string()))
        }

        match frame.msg_type.as_str() {
            "user_join" => Ok(Self::UserJoin(from_value(&frame.msg_type, &frame.data)?)),
            "game_start" => Ok(Self::GameStart(from_value(&frame.msg_type, &frame.data)?)),
            "game_restart" => Ok(Self::GameRestart(from_value(&frame.msg_type, &frame.data)?)),
            "kick_user" => Ok(Self::KickUser(from_value(&frame.msg_type, &frame.data)?)),
            "call_hand" => Ok(Self::CallHand(from_value(&frame.msg_type, &frame.data)?)),
            "call_bluff" => Ok(Self::CallBluff(from_value(&frame.msg_type, &frame.data)?)),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}

/// The envelope an outbound message is serialized into.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundFrame {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub data: Value,
}

impl OutboundFrame {
    pub fn new<T: Serialize>(msg_type: &'static str, data: &T) -> Self {
        Self {
            msg_type,
            data: serde_json::to_value(data).expect("outbound payload always serializes"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub wins: u64,
    pub games_played: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserJoinSuccessData {
    pub success: bool,
    pub user_id: String,
    pub username: String,
    pub is_host: bool,
    pub message: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsernameErrorData {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPlayerView {
    pub user_id: String,
    pub username: String,
    pub card_count: u8,
    pub losses: u8,
    pub is_eliminated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentCallView {
    pub player_id: String,
    pub hand: HandDeclaration,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevealedHand {
    pub user_id: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateView {
    pub phase: &'static str,
    pub round_number: u32,
    pub current_player_id: Option<String>,
    pub current_call: Option<CurrentCallView>,
    pub players: Vec<PublicPlayerView>,
    pub waiting_players_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateUpdateData {
    pub game_state: GameStateView,
    pub online_users: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_round_cards: Option<Vec<RevealedHand>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerUpdateData {
    pub your_cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundStartData {
    pub round_number: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallBluffData {
    pub message: String,
    pub loser_id: String,
    pub previous_round_cards: Vec<RevealedHand>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowCardsData {}

#[derive(Debug, Clone, Serialize)]
pub struct HostChangedData {
    pub new_host: String,
    pub host_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLeaveData {
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserKickedData {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaitingForGameData {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub message: String,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
