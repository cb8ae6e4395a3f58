//! WebSocket upgrade handler.
//!
//! The handshake is authenticated before the upgrade; a refused credential
//! is answered with a plain 401. An accepted socket is attached to the
//! gateway and pumped in both directions until either side closes.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use taskhub_auth::SessionIdentity;
use taskhub_realtime::Attached;

use crate::dto::request::WsQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    let identity = match state
        .ws_authenticator
        .authenticate(query.token.as_deref(), authorization)
        .await
    {
        Ok(identity) => identity,
        Err(err) => {
            warn!(error = %err, "WebSocket handshake rejected");
            return ApiError(err).into_response();
        }
    };

    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| run_session(state, identity, socket)),
        Err(rejection) => rejection.into_response(),
    }
}

/// Drive one established socket until it closes or the gateway drops it.
async fn run_session(state: AppState, identity: SessionIdentity, socket: WebSocket) {
    let gateway = state.gateway.clone();
    let Attached {
        handle,
        mut outbound,
    } = gateway.attach(identity);
    let conn_id = handle.id;
    let (mut ws_tx, mut ws_rx) = socket.split();

    let writer_handle = handle.clone();
    let writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                frame = outbound.recv() => {
                    let Some(frame) = frame else { break };
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                _ = writer_handle.closed() => {
                    // Flush what was queued before the close.
                    while let Ok(frame) = outbound.try_recv() {
                        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    gateway.handle_inbound(conn_id, text.as_str()).await;
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => handle.touch(),
                Some(Ok(Message::Binary(_))) => {
                    debug!(conn_id = %conn_id, "Ignoring binary frame");
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(conn_id = %conn_id, error = %e, "WebSocket read error");
                    break;
                }
            },
            _ = handle.closed() => break,
        }
    }

    gateway.detach(conn_id);
    if let Err(e) = writer.await {
        warn!(conn_id = %conn_id, error = %e, "WebSocket writer task failed");
    }
    info!(conn_id = %conn_id, "WebSocket session ended");
}
