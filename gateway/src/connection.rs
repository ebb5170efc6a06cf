//! One WebSocket connection's lifetime: decode, dispatch to the owning
//! [`Room`](bluffhouse_engine::Room), fan out the resulting events. Grounded
//! on `services/live-table/src/main.rs`'s `ws_handler`/`handle_socket` split
//! (`WebSocketUpgrade`, a `split()` sender/receiver pair, an `mpsc` write
//! task, a `broadcast` subscriber task) — generalized here to also register
//! a per-connection sink for [`RoomEvent::Private`](bluffhouse_engine::RoomEvent::Private)
//! frames, since this protocol (unlike the teacher's single shared table)
//! must keep private hands off the broadcast channel entirely.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use bluffhouse_engine::{Room, RoomError, RoomEvent};
use bluffhouse_types::protocol::{
    ErrorData, InboundCommand, InboundFrame, OutboundFrame, UserJoinSuccessData, UsernameErrorData,
};
use bluffhouse_registry::{ClaimOutcome, Registry};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info_span, warn, Instrument};

use crate::rooms::{RoomHandle, RoomRegistry, DEFAULT_ROOM_ID};

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomRegistry>,
    pub registry: Registry,
}

struct Session {
    room: Arc<RoomHandle>,
    user_id: String,
}

pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundFrame>();

    let write_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let Ok(payload) = serde_json::to_string(&frame) else {
                continue;
            };
            if ws_sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    let mut session: Option<Session> = None;
    let mut broadcast_task: Option<tokio::task::JoinHandle<()>> = None;

    while let Some(Ok(message)) = ws_receiver.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let inbound: InboundFrame = match serde_json::from_str(&text) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "malformed frame");
                send_error(&tx, "malformed frame".to_string());
                continue;
            }
        };
        let command = match InboundCommand::decode(&inbound) {
            Ok(command) => command,
            Err(err) => {
                warn!(%err, "unrecognized frame type");
                send_error(&tx, err.to_string());
                continue;
            }
        };

        handle_command(
            command,
            inbound.session_id,
            &state,
            &tx,
            &mut session,
            &mut broadcast_task,
        )
        .await;
    }

    write_task.abort();
    if let Some(task) = broadcast_task {
        task.abort();
    }

    if let Some(Session { room, user_id }) = session {
        let events = {
            let mut room_state = room.state.lock().expect("room mutex poisoned");
            room_state.leave(&user_id)
        };
        for event in room.dispatch(events) {
            record_game_end(&state.registry, event).await;
        }
        room.unregister(&user_id);
        let _ = state.registry.release(user_id).await;
    }
}

async fn handle_command(
    command: InboundCommand,
    session_id: Option<String>,
    state: &AppState,
    tx: &mpsc::UnboundedSender<OutboundFrame>,
    session: &mut Option<Session>,
    broadcast_task: &mut Option<tokio::task::JoinHandle<()>>,
) {
    match command {
        InboundCommand::UserJoin(req) => {
            handle_user_join(req, session_id, state, tx, session, broadcast_task).await;
        }
        InboundCommand::GameStart(req) => {
            dispatch_result(state, tx, session, |room| room.start_game(&req.user_id)).await;
        }
        InboundCommand::GameRestart(req) => {
            dispatch_result(state, tx, session, |room| room.restart_game(&req.user_id)).await;
        }
        InboundCommand::KickUser(req) => {
            dispatch_result(state, tx, session, |room| {
                room.kick(&req.host_id, &req.target_username)
            })
            .await;
        }
        InboundCommand::CallHand(req) => {
            dispatch_result(state, tx, session, |room| {
                room.call_hand(&req.user_id, &req.hand_spec)
            })
            .await;
        }
        InboundCommand::CallBluff(req) => {
            dispatch_result(state, tx, session, |room| room.call_bluff(&req.user_id)).await;
        }
    }
}

async fn handle_user_join(
    req: bluffhouse_types::protocol::UserJoinRequest,
    session_id: Option<String>,
    state: &AppState,
    tx: &mpsc::UnboundedSender<OutboundFrame>,
    session: &mut Option<Session>,
    broadcast_task: &mut Option<tokio::task::JoinHandle<()>>,
) {
    if session.is_some() {
        send_error(tx, "already joined a room on this connection".to_string());
        return;
    }

    let claim = match state.registry.claim(req.username.clone()).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(%err, "registry claim failed");
            send_error(tx, "registry unavailable".to_string());
            return;
        }
    };

    let user_id = match claim {
        ClaimOutcome::Claimed(user_id) => user_id,
        ClaimOutcome::Taken => {
            send_username_error(tx, "username already online".to_string());
            return;
        }
        ClaimOutcome::Invalid(message) => {
            send_username_error(tx, message);
            return;
        }
    };

    let room_id = session_id.unwrap_or_else(|| DEFAULT_ROOM_ID.to_string());
    let room = state.rooms.get_or_create(&room_id);
    room.register(user_id.clone(), tx.clone());

    let mut broadcast_rx = room.broadcaster.subscribe();
    let forward_tx = tx.clone();
    let room_id_for_span = room_id.clone();
    *broadcast_task = Some(tokio::spawn(
        async move {
            while let Ok(frame) = broadcast_rx.recv().await {
                if forward_tx.send(frame).is_err() {
                    break;
                }
            }
        }
        .instrument(info_span!("room", room_id = %room_id_for_span)),
    ));

    let (outcome, events) = {
        let mut room_state = room.state.lock().expect("room mutex poisoned");
        room_state.join(user_id.clone(), req.username.clone())
    };
    let is_host = matches!(outcome, bluffhouse_engine::JoinOutcome::Seated { is_host: true });

    let leaderboard = state
        .registry
        .snapshot_leaderboard(10)
        .await
        .unwrap_or_default();
    let _ = tx.send(OutboundFrame::new(
        "user_join",
        &UserJoinSuccessData {
            success: true,
            user_id: user_id.clone(),
            username: req.username,
            is_host,
            message: "joined".to_string(),
            leaderboard,
        },
    ));

    for event in room.dispatch(events) {
        record_game_end(&state.registry, event).await;
    }

    *session = Some(Session { room, user_id });
}

async fn dispatch_result<F>(
    state: &AppState,
    tx: &mpsc::UnboundedSender<OutboundFrame>,
    session: &Option<Session>,
    f: F,
) where
    F: FnOnce(&mut Room) -> Result<Vec<RoomEvent>, RoomError>,
{
    let Some(Session { room, .. }) = session else {
        send_error(tx, "join the room first".to_string());
        return;
    };

    let result = {
        let mut room_state = room.state.lock().expect("room mutex poisoned");
        f(&mut room_state)
    };

    match result {
        Ok(events) => {
            for event in room.dispatch(events) {
                record_game_end(&state.registry, event).await;
            }
        }
        Err(err) => send_error(tx, err.to_string()),
    }
}

async fn record_game_end(registry: &Registry, event: RoomEvent) {
    if let RoomEvent::GameEnded { winner_id, participant_ids } = event {
        if let Err(err) = registry.record_win(winner_id).await {
            warn!(%err, "failed to record win");
        }
        for participant_id in participant_ids {
            if let Err(err) = registry.record_game(participant_id).await {
                warn!(%err, "failed to record game");
            }
        }
    }
}

fn send_error(tx: &mpsc::UnboundedSender<OutboundFrame>, message: String) {
    let _ = tx.send(OutboundFrame::new("error", &ErrorData { message }));
}

fn send_username_error(tx: &mpsc::UnboundedSender<OutboundFrame>, message: String) {
    let _ = tx.send(OutboundFrame::new(
        "username_error",
        &UsernameErrorData { message },
    ));
}
