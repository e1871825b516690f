//! WebSocket upgrade + message loop. Each connection owns one quiz session for
//! its lifetime. Every client message is parsed as JSON and answered with a
//! single JSON message.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::{apply, render, Action, Outcome};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::session::QuizSession;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "mzquiz_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "mzquiz_backend", "WebSocket connected");
  let mut session = QuizSession::new();

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "mzquiz_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session)
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "mzquiz_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "mzquiz_backend", page = session.page(), "WebSocket disconnected; session discarded");
}

fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut QuizSession) -> ServerWsMessage {
  let action = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::View => return ServerWsMessage::View { view: render(state, session) },
    ClientWsMessage::Start { username } => Action::Start { username },
    ClientWsMessage::Submit { answer } => Action::Submit { answer },
    ClientWsMessage::Restart => Action::Restart,
  };

  match apply(state, session, action) {
    Ok(Outcome::Moved(view)) => ServerWsMessage::View { view },
    Ok(Outcome::Rejected { warning, view }) => ServerWsMessage::Warning { message: warning.to_string(), view },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}
