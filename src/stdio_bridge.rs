//! Line-oriented transport.
//!
//! Each input line is either a page message
//! `{"id": "...", "name": "...", "origin": "...", "body": {...}}` or a
//! control line `{"control": "navigate"}`. Each reply is written as one line,
//! `{"id": "...", "response": {...}}` or `{"id": "...", "error": "..."}`, in
//! the order replies resolve. End of input tears the page down.

use std::sync::Arc;

use autofill_protocols::InboundMessage;
use autofill_userscript::AutofillUserScript;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "stdio_bridge_tests.rs"]
mod tests;

#[derive(Debug, Error)]
pub(crate) enum StdioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Writer task failed: {0}")]
    Writer(#[from] JoinError),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InboundLine {
    Control { control: ControlCommand },
    Message(InboundMessage),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ControlCommand {
    /// The page navigated away; everything outstanding is answered.
    Navigate,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OutboundLine {
    Reply { id: Option<String>, response: Value },
    Error { id: Option<String>, error: String },
}

impl OutboundLine {
    fn reply(id: Option<String>, payload: Option<String>) -> Self {
        // Payloads are JSON produced by the vault manager; anything else is
        // passed through as a string.
        let response = match payload {
            Some(payload) => serde_json::from_str(&payload).unwrap_or(Value::String(payload)),
            None => Value::Null,
        };
        OutboundLine::Reply { id, response }
    }

    fn error(id: Option<String>, error: impl ToString) -> Self {
        OutboundLine::Error {
            id,
            error: error.to_string(),
        }
    }
}

/// Serve requests from `reader` until end of input.
pub(crate) async fn run<R, W>(
    script: Arc<AutofillUserScript>,
    reader: R,
    writer: W,
) -> Result<(), StdioError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let writer_task = tokio::spawn(write_lines(writer, rx));
    let mut waiters = JoinSet::new();

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message = match serde_json::from_str::<InboundLine>(line) {
            Ok(InboundLine::Control {
                control: ControlCommand::Navigate,
            }) => {
                let cancelled = script.reset();
                debug!("Navigation cancelled {} replies", cancelled);
                continue;
            }
            Ok(InboundLine::Message(message)) => message,
            Err(e) => {
                warn!("Unreadable input line: {}", e);
                let _ = tx.send(OutboundLine::error(None, e));
                continue;
            }
        };

        let id = message.id.clone();
        let (message_type, receiver) = match script.accept(&message) {
            Ok(accepted) => accepted,
            Err(e) => {
                let _ = tx.send(OutboundLine::error(id, e));
                continue;
            }
        };

        let script = script.clone();
        let tx = tx.clone();
        waiters.spawn(async move {
            let line = match script.wait_for_reply(message_type, receiver).await {
                Ok(payload) => OutboundLine::reply(id, payload),
                Err(e) => OutboundLine::error(id, e),
            };
            let _ = tx.send(line);
        });
    }

    let cancelled = script.reset();
    info!("Input closed, {} outstanding replies cancelled", cancelled);

    while waiters.join_next().await.is_some() {}
    drop(tx);
    writer_task.await??;
    Ok(())
}

async fn write_lines<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<OutboundLine>,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        let mut encoded = serde_json::to_vec(&line)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    writer.shutdown().await
}
