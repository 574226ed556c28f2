//! WebSocket upgrade + message loop. The connection owns one quiz session for
//! its whole lifetime; it is never registered in the shared map. Each client
//! message is parsed as JSON, applied to that session, and answered with a
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

use crate::protocol::{to_out, ClientWsMessage, ErrorOut, ServerWsMessage};
use crate::quiz::QuizSession;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "studybuddy_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "studybuddy_backend", "WebSocket connected");
  let mut session = QuizSession::default();

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "studybuddy_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &mut session, &state).await
          }
          Err(e) => ServerWsMessage::Error {
            error: ErrorOut { kind: "invalid_input", message: format!("Invalid JSON: {}", e), raw: None },
          },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "kind": "internal", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "studybuddy_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "studybuddy_backend", phase = session.phase(), "WebSocket disconnected; session discarded");
}

#[instrument(level = "info", skip(session, state))]
async fn handle_client_ws(msg: ClientWsMessage, session: &mut QuizSession, state: &AppState) -> ServerWsMessage {
  let result = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::GetSession => Ok(()),
    ClientWsMessage::StartQuiz { topic } => {
      session.start_generation(&topic, state.gateway.as_ref(), &state.prompts).await
    }
    ClientWsMessage::RecordAnswer { index, choice } => session.record_answer(index, &choice),
    ClientWsMessage::SubmitQuiz => session.submit(),
    ClientWsMessage::ResetQuiz => {
      session.reset();
      Ok(())
    }
  };

  match result {
    Ok(()) => ServerWsMessage::Session { session: to_out(session) },
    Err(e) => ServerWsMessage::Error { error: ErrorOut::from(&e) },
  }
}
