use crate::model::Property;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Debug, Error)]
pub enum PushError {
    #[error("failed to connect to push endpoint: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
}

/// One live subscription to the server's property feed.
///
/// Messages arrive in the order received, at most once each; a payload that
/// fails to decode is logged and dropped. On any transport error or
/// server-initiated close the channel goes back to `Disconnected` and stays
/// there; reconnect policy belongs to the caller.
pub struct PushChannel {
    task: JoinHandle<()>,
    receiver: mpsc::UnboundedReceiver<Property>,
    state: watch::Receiver<ChannelState>,
}

impl PushChannel {
    pub async fn connect(url: &str) -> Result<Self, PushError> {
        let (state_tx, state) = watch::channel(ChannelState::Connecting);
        let (tx, receiver) = mpsc::unbounded_channel();

        let (ws, _) = connect_async(url).await.map_err(|e| {
            let _ = state_tx.send(ChannelState::Disconnected);
            PushError::Connect(e)
        })?;
        let _ = state_tx.send(ChannelState::Connected);

        let task = tokio::spawn(async move {
            let (_write, mut read) = ws.split();
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(txt)) => {
                        if let Some(property) = decode_push(&txt) {
                            if tx.send(property).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        eprintln!("push channel transport error: {e}");
                        break;
                    }
                }
            }
            let _ = state_tx.send(ChannelState::Disconnected);
        });

        Ok(Self {
            task,
            receiver,
            state,
        })
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Next decoded record, `None` once the channel has shut down.
    pub async fn next(&mut self) -> Option<Property> {
        self.receiver.recv().await
    }

    /// Tear down the subscription: closes the transport and guarantees no
    /// further deliveries once this returns.
    pub fn close(&mut self) {
        self.task.abort();
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Decode one inbound payload as a full property record. Malformed payloads
/// are dropped after logging; they must never take the session down.
pub fn decode_push(payload: &str) -> Option<Property> {
    match serde_json::from_str::<Property>(payload) {
        Ok(property) => Some(property),
        Err(e) => {
            eprintln!("dropping malformed push payload: {e}");
            None
        }
    }
}
