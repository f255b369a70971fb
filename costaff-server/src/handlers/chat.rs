// costaff-server/src/handlers/chat.rs

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use uuid::Uuid;

use costaff_ai::StreamEvent;
use costaff_common::Error;
use costaff_core::services::chat_service::MAX_RESPONSE_TOKENS;

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

/// Conversation id also rides in this header so clients that drop the
/// stream early still learn where the thread lives.
pub const CONVERSATION_ID_HEADER: &str = "x-conversation-id";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<Uuid>,
}

/// Streams the assistant reply as plain text chunks. On clean completion
/// the full reply is persisted and a final `__CONV_ID__` trailer line is
/// sent; an aborted or failed stream persists nothing, so the next turn
/// replays the user message against unchanged history.
pub async fn chat(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Json(req): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let turn = ctx
        .chat
        .begin_turn(user.0, req.conversation_id, &req.message)
        .await?;
    let conversation_id = turn.conversation_id;

    let provider = ctx.providers.create(turn.provider_config);
    let events = provider
        .chat_stream(&turn.system_prompt, turn.history, MAX_RESPONSE_TOKENS)
        .await
        .map_err(|e| ApiError(Error::Provider(e.to_string())))?;

    let (tx, rx) = mpsc::channel::<Result<Bytes, io::Error>>(32);
    let relay_ctx = ctx.clone();

    tokio::spawn(relay(conversation_id, events, tx, move |full: String| {
        async move { relay_ctx.chat.finish_turn(conversation_id, &full).await }
    }));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONVERSATION_ID_HEADER, conversation_id.to_string())
        .body(Body::from_stream(ReceiverStream::new(rx)))
        .map_err(|e| ApiError(Error::Parse(e.to_string())))?;

    Ok(response)
}

/// Forwards provider deltas to the client and assembles the full reply.
/// `persist` runs exactly once, and only after the provider's completion
/// marker; a provider error, an aborted stream, or a client disconnect all
/// return without persisting anything.
async fn relay<F, Fut>(
    conversation_id: Uuid,
    mut events: mpsc::Receiver<StreamEvent>,
    tx: mpsc::Sender<Result<Bytes, io::Error>>,
    persist: F,
) where
    F: FnOnce(String) -> Fut + Send,
    Fut: Future<Output = Result<(), Error>> + Send,
{
    let mut full = String::new();
    let mut completed = false;

    while let Some(event) = events.recv().await {
        match event {
            StreamEvent::Delta(text) => {
                full.push_str(&text);
                if tx.send(Ok(Bytes::from(text))).await.is_err() {
                    // Client went away; the partial reply is discarded.
                    return;
                }
            }
            StreamEvent::Done => {
                completed = true;
                break;
            }
            StreamEvent::Error(e) => {
                warn!(conversation = %conversation_id, "provider stream failed: {}", e);
                let _ = tx.send(Err(io::Error::other(e))).await;
                return;
            }
        }
    }

    // A channel that closed without Done means the provider aborted.
    if !completed {
        warn!(conversation = %conversation_id, "provider stream ended without completion");
        return;
    }

    if let Err(e) = persist(full).await {
        error!(conversation = %conversation_id, "failed to persist assistant reply: {}", e);
    }
    let _ = tx.send(Ok(Bytes::from(conversation_trailer(conversation_id)))).await;
}

/// Final stream line pointing the client at the conversation row.
fn conversation_trailer(conversation_id: Uuid) -> String {
    format!("\n__CONV_ID__:{conversation_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Harness {
        events: mpsc::Sender<StreamEvent>,
        body: mpsc::Receiver<Result<Bytes, io::Error>>,
        persisted: Arc<Mutex<Vec<String>>>,
    }

    fn run_relay() -> (Harness, impl Future<Output = ()>) {
        let (etx, erx) = mpsc::channel(16);
        let (tx, rx) = mpsc::channel(16);
        let persisted = Arc::new(Mutex::new(Vec::new()));
        let sink = persisted.clone();
        let fut = relay(Uuid::nil(), erx, tx, move |full: String| async move {
            sink.lock().unwrap().push(full);
            Ok(())
        });
        (
            Harness {
                events: etx,
                body: rx,
                persisted,
            },
            fut,
        )
    }

    async fn drain(mut body: mpsc::Receiver<Result<Bytes, io::Error>>) -> Vec<Result<String, String>> {
        let mut out = Vec::new();
        while let Some(item) = body.recv().await {
            out.push(
                item.map(|b| String::from_utf8_lossy(&b).into_owned())
                    .map_err(|e| e.to_string()),
            );
        }
        out
    }

    #[tokio::test]
    async fn clean_stream_persists_full_reply_and_sends_trailer() {
        let (h, fut) = run_relay();
        h.events.send(StreamEvent::Delta("Hel".to_string())).await.unwrap();
        h.events.send(StreamEvent::Delta("lo".to_string())).await.unwrap();
        h.events.send(StreamEvent::Done).await.unwrap();
        drop(h.events);
        fut.await;

        assert_eq!(*h.persisted.lock().unwrap(), vec!["Hello".to_string()]);

        let chunks = drain(h.body).await;
        assert_eq!(chunks[0].as_deref(), Ok("Hel"));
        assert_eq!(chunks[1].as_deref(), Ok("lo"));
        assert_eq!(
            chunks[2].as_deref(),
            Ok("\n__CONV_ID__:00000000-0000-0000-0000-000000000000")
        );
        assert_eq!(chunks.len(), 3);
    }

    #[tokio::test]
    async fn provider_error_discards_partial_text() {
        let (h, fut) = run_relay();
        h.events.send(StreamEvent::Delta("partial".to_string())).await.unwrap();
        h.events
            .send(StreamEvent::Error("overloaded".to_string()))
            .await
            .unwrap();
        drop(h.events);
        fut.await;

        assert!(h.persisted.lock().unwrap().is_empty());

        // The client saw the partial chunk and then the error; no trailer.
        let chunks = drain(h.body).await;
        assert_eq!(chunks[0].as_deref(), Ok("partial"));
        assert!(chunks[1].is_err());
        assert_eq!(chunks.len(), 2);
    }

    #[tokio::test]
    async fn stream_closing_without_done_persists_nothing() {
        let (h, fut) = run_relay();
        h.events.send(StreamEvent::Delta("partial".to_string())).await.unwrap();
        drop(h.events);
        fut.await;

        assert!(h.persisted.lock().unwrap().is_empty());
        let chunks = drain(h.body).await;
        assert_eq!(chunks.len(), 1, "no trailer after an aborted stream");
    }

    #[tokio::test]
    async fn client_disconnect_stops_the_relay_without_persisting() {
        let (h, fut) = run_relay();
        drop(h.body);
        h.events.send(StreamEvent::Delta("Hel".to_string())).await.unwrap();
        h.events.send(StreamEvent::Delta("lo".to_string())).await.unwrap();
        h.events.send(StreamEvent::Done).await.unwrap();
        drop(h.events);
        fut.await;

        assert!(h.persisted.lock().unwrap().is_empty());
    }

    #[test]
    fn trailer_is_a_single_marker_line() {
        let id = Uuid::nil();
        assert_eq!(
            conversation_trailer(id),
            "\n__CONV_ID__:00000000-0000-0000-0000-000000000000"
        );
    }
}
