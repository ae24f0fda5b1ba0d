//! WebSocket handler for live status updates

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::api::AppState;
use crate::health::StatusUpdate;

/// Handles WebSocket upgrade requests for status updates
pub async fn handle(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Sends the current snapshot, then one per completed poll cycle.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the initial snapshot so no cycle is missed
    let mut rx = state.ws_broadcast.subscribe();
    let initial = StatusUpdate::service_status(state.poller.table().snapshot());

    let send_task = tokio::spawn(async move {
        if send_update(&mut sender, &initial).await.is_err() {
            return;
        }
        loop {
            match rx.recv().await {
                Ok(update) => {
                    if send_update(&mut sender, &update).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "WebSocket subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Drain incoming frames until the client closes
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    first_to_finish(send_task, recv_task).await;
}

/// Wait for either task, then abort the other and wait for it to drop.
async fn first_to_finish(mut a: JoinHandle<()>, mut b: JoinHandle<()>) {
    let other = tokio::select! {
        _ = &mut a => b,
        _ = &mut b => a,
    };
    other.abort();
    let _ = other.await;
}

async fn send_update<S>(sender: &mut S, update: &StatusUpdate) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    match serde_json::to_string(update) {
        Ok(json) => sender.send(Message::Text(json)).await.map_err(|_| ()),
        Err(e) => {
            tracing::error!("Failed to serialize WebSocket update: {}", e);
            Ok(())
        }
    }
}
