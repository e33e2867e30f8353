//! WebSocket entrypoint and connection handler.
//!
//! Upgrades HTTP to WS, routes each request frame through the message bus, and
//! pushes relayed messages to the client.

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use truthlens_core::RuntimeClient;

use crate::server::GatewayState;
use crate::ws_protocol::{WsFrame, WsRequest};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: GatewayState) {
    let conn_id = Uuid::new_v4();
    info!(%conn_id, "WebSocket connection opened");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsFrame>();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let Ok(json) = serde_json::to_string(&frame) else {
                continue;
            };
            if sender.send(WsMessage::Text(json)).await.is_err() {
                break;
            }
        }
    });

    // Relayed messages go to every connection.
    let relay_tx = tx.clone();
    let mut relays = BroadcastStream::new(state.relay_tx.subscribe());
    let relay_task = tokio::spawn(async move {
        while let Some(item) = relays.next().await {
            match item {
                Ok(message) => {
                    if relay_tx.send(WsFrame::Relay { message }).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Relay stream lagged"),
            }
        }
    });

    let client = state.client.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                WsMessage::Text(text) => {
                    // Requests run concurrently; the id pairs replies with requests.
                    let client = client.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(handle_frame(&text, &client).await);
                    });
                }
                WsMessage::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }
    relay_task.abort();

    info!(%conn_id, "WebSocket connection closed");
}

/// Parse one request frame, send it over the bus, and build the reply frame.
pub(crate) async fn handle_frame(text: &str, client: &RuntimeClient) -> WsFrame {
    let request: WsRequest = match serde_json::from_str(text) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "Received invalid protocol frame");
            return WsFrame::Error {
                id: None,
                message: format!("invalid message: {e}"),
            };
        }
    };

    debug!(action = request.message.action(), id = ?request.id, "WebSocket request");
    match client.send_message(request.message).await {
        Ok(reply) => WsFrame::Reply {
            id: request.id,
            reply,
        },
        Err(e) => WsFrame::Error {
            id: request.id,
            message: e.to_string(),
        },
    }
}
