//! One client's WebSocket session.
//!
//! The writer task owns the sink and the receiving half of the outbound
//! queue; the reader loop owns the stream. They share only the queue and a
//! oneshot close signal. Whichever side notices the end of the connection
//! first moves the lifecycle to `Closing`, and only that transition removes
//! the client from its room.

use std::{
    collections::HashSet,
    fmt::Display,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
    time::Duration,
};

use axum::{body::Bytes, extract::ws::Message as WsMessage};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant, MissedTickBehavior},
};

use crate::{
    domain::{
        ClassId, ConnectionId, ConnectionIdFactory, Identity, Message, MessageContent, MessageId,
        UserId, ValueObjectError,
    },
    infrastructure::{
        dto::websocket::{Envelope, InboundFrame},
        realtime::{HubConfig, Member, Outbound, RoomHandle},
    },
    usecase::{RecentMessagesUseCase, SendMessageUseCase},
};

/// Connection lifecycle states, in the only order they are entered.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting = 0,
    Authorizing = 1,
    Active = 2,
    Closing = 3,
    Closed = 4,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Authorizing,
            2 => Self::Active,
            3 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Atomically shared connection state.
#[derive(Debug)]
pub struct Lifecycle(AtomicU8);

impl Lifecycle {
    pub fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Connecting as u8))
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move forward to `next`. Never moves backwards.
    pub fn advance(&self, next: ConnectionState) {
        self.0.fetch_max(next as u8, Ordering::AcqRel);
    }

    /// `Active → Closing`. Returns true for the single caller that won.
    pub fn begin_closing(&self) -> bool {
        self.0
            .compare_exchange(
                ConnectionState::Active as u8,
                ConnectionState::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Use cases a session drives after admission
#[derive(Clone)]
pub struct SessionServices {
    pub send_message: Arc<SendMessageUseCase>,
    pub recent_messages: Arc<RecentMessagesUseCase>,
}

/// Why an inbound frame was discarded
#[derive(Debug, Error)]
enum FrameError {
    #[error("frame is not a JSON object with a content field: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Content(#[from] ValueObjectError),
}

fn decode_content(text: &str) -> Result<MessageContent, FrameError> {
    let frame: InboundFrame = serde_json::from_str(text)?;
    Ok(MessageContent::new(frame.content)?)
}

/// Shared by both loops; removes the client from its room exactly once.
#[derive(Debug, Clone)]
struct Teardown {
    lifecycle: Arc<Lifecycle>,
    room: RoomHandle,
    connection_id: ConnectionId,
    user_id: UserId,
}

impl Teardown {
    fn close(&self, reason: &'static str) {
        if self.lifecycle.begin_closing() {
            tracing::info!(
                class_id = %self.room.class_id(),
                user_id = %self.user_id,
                connection_id = %self.connection_id,
                reason,
                "Closing connection"
            );
            self.room.leave(self.connection_id);
        }
    }
}

/// Suppresses duplicates between live delivery and the one-shot backfill.
///
/// Until the backfill item is written, ids delivered live are remembered and
/// skipped in the backfill. Ids written by the backfill are skipped if they
/// later arrive live.
#[derive(Debug)]
struct BackfillWindow {
    pending: bool,
    live_seen: HashSet<MessageId>,
    backfilled: HashSet<MessageId>,
}

impl BackfillWindow {
    fn new() -> Self {
        Self {
            pending: true,
            live_seen: HashSet::new(),
            backfilled: HashSet::new(),
        }
    }

    fn admit_live(&mut self, id: MessageId) -> bool {
        if self.backfilled.remove(&id) {
            return false;
        }
        if self.pending {
            self.live_seen.insert(id);
        }
        true
    }

    fn admit_backfill(&mut self, messages: Vec<Message>) -> Vec<Message> {
        let fresh: Vec<Message> = messages
            .into_iter()
            .filter(|message| !self.live_seen.contains(&message.id))
            .collect();
        self.backfilled = fresh.iter().map(|message| message.id).collect();
        self.live_seen.clear();
        self.pending = false;
        fresh
    }
}

fn text_frame(envelope: &Envelope<'_>) -> Option<WsMessage> {
    match envelope.to_json() {
        Ok(json) => Some(WsMessage::Text(json.into())),
        Err(e) => {
            tracing::error!("Failed to serialize envelope: {}", e);
            None
        }
    }
}

struct Writer<S> {
    sink: S,
    queue: mpsc::Receiver<Outbound>,
    keepalive: Duration,
    window: BackfillWindow,
    teardown: Teardown,
    close_tx: oneshot::Sender<()>,
}

impl<S> Writer<S>
where
    S: Sink<WsMessage> + Unpin + Send + 'static,
    S::Error: Display + Send,
{
    async fn run(mut self) {
        let mut keepalive = time::interval_at(Instant::now() + self.keepalive, self.keepalive);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                item = self.queue.recv() => {
                    let Some(item) = item else {
                        // Room and reader have both let go
                        let _ = self.sink.send(WsMessage::Close(None)).await;
                        break;
                    };
                    if let Err(e) = self.deliver(item).await {
                        tracing::warn!(
                            connection_id = %self.teardown.connection_id,
                            "Write failed: {}", e
                        );
                        break;
                    }
                    keepalive.reset();
                }
                _ = keepalive.tick() => {
                    if let Err(e) = self.sink.send(WsMessage::Ping(Bytes::new())).await {
                        tracing::warn!(
                            connection_id = %self.teardown.connection_id,
                            "Keepalive ping failed: {}", e
                        );
                        break;
                    }
                }
            }
        }

        self.teardown.close("write loop ended");
        let _ = self.close_tx.send(());
        let _ = self.sink.close().await;
    }

    async fn deliver(&mut self, item: Outbound) -> Result<(), S::Error> {
        match item {
            Outbound::Live(message) => {
                if !self.window.admit_live(message.id) {
                    tracing::debug!(message_id = %message.id, "Skipping already backfilled message");
                    return Ok(());
                }
                self.write(&Envelope::Message(&message)).await
            }
            Outbound::Backfill(messages) => {
                for message in self.window.admit_backfill(messages) {
                    self.write(&Envelope::Message(&message)).await?;
                }
                Ok(())
            }
            Outbound::Error(reason) => self.write(&Envelope::Error(&reason)).await,
        }
    }

    async fn write(&mut self, envelope: &Envelope<'_>) -> Result<(), S::Error> {
        match text_frame(envelope) {
            Some(frame) => self.sink.send(frame).await,
            None => Ok(()),
        }
    }
}

/// An admitted client, ready to join its room
pub struct ClientSession {
    identity: Identity,
    class_id: ClassId,
    connection_id: ConnectionId,
    room: RoomHandle,
    lifecycle: Arc<Lifecycle>,
    queue_capacity: usize,
    keepalive: Duration,
    backfill_limit: usize,
}

impl ClientSession {
    pub fn new(
        identity: Identity,
        room: RoomHandle,
        config: &HubConfig,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        lifecycle.advance(ConnectionState::Active);
        Self {
            identity,
            class_id: room.class_id(),
            connection_id: ConnectionIdFactory::generate(),
            room,
            lifecycle,
            queue_capacity: config.queue_capacity.max(1),
            keepalive: config.keepalive_interval.max(Duration::from_millis(1)),
            backfill_limit: config.backfill_limit,
        }
    }

    /// Join the room, backfill, then pump frames until either side closes.
    pub async fn run<S, R, E>(self, sink: S, stream: R, services: SessionServices)
    where
        S: Sink<WsMessage> + Unpin + Send + 'static,
        S::Error: Display + Send,
        R: Stream<Item = Result<WsMessage, E>> + Unpin,
        E: Display,
    {
        let (outbound, queue) = mpsc::channel(self.queue_capacity);
        let (close_tx, close_rx) = oneshot::channel();
        let teardown = Teardown {
            lifecycle: Arc::clone(&self.lifecycle),
            room: self.room.clone(),
            connection_id: self.connection_id,
            user_id: self.identity.user_id,
        };

        let writer = tokio::spawn(
            Writer {
                sink,
                queue,
                keepalive: self.keepalive,
                window: BackfillWindow::new(),
                teardown: teardown.clone(),
                close_tx,
            }
            .run(),
        );

        self.room
            .join(Member::new(
                self.connection_id,
                self.identity.user_id,
                outbound.clone(),
            ))
            .await;
        if self.lifecycle.state() != ConnectionState::Active {
            // The writer gave up before the join landed
            self.room.leave(self.connection_id);
        }

        self.backfill(&outbound, &services).await;
        self.read_loop(stream, close_rx, outbound, &teardown, &services)
            .await;

        if let Err(e) = writer.await {
            tracing::error!(connection_id = %self.connection_id, "Write loop panicked: {}", e);
        }
        self.lifecycle.advance(ConnectionState::Closed);
        tracing::debug!(connection_id = %self.connection_id, "Connection closed");
    }

    async fn backfill(&self, outbound: &mpsc::Sender<Outbound>, services: &SessionServices) {
        let history = match services
            .recent_messages
            .execute(self.class_id, self.backfill_limit)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(class_id = %self.class_id, "Backfill lookup failed: {}", e);
                Vec::new()
            }
        };
        tracing::debug!(
            class_id = %self.class_id,
            connection_id = %self.connection_id,
            count = history.len(),
            "Sending backfill"
        );
        // Always sent, even when empty, so the writer's dedup window closes
        let _ = outbound.send(Outbound::Backfill(history)).await;
    }

    async fn read_loop<R, E>(
        &self,
        mut stream: R,
        mut close_rx: oneshot::Receiver<()>,
        outbound: mpsc::Sender<Outbound>,
        teardown: &Teardown,
        services: &SessionServices,
    ) where
        R: Stream<Item = Result<WsMessage, E>> + Unpin,
        E: Display,
    {
        let user_id = self.identity.user_id;
        loop {
            tokio::select! {
                _ = &mut close_rx => break,
                frame = stream.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        let content = match decode_content(text.as_str()) {
                            Ok(content) => content,
                            Err(e) => {
                                tracing::debug!(%user_id, "Discarding inbound frame: {}", e);
                                continue;
                            }
                        };
                        match services
                            .send_message
                            .execute(user_id, self.class_id, content)
                            .await
                        {
                            Ok(message) => {
                                tracing::debug!(%user_id, message_id = %message.id, "Message accepted");
                            }
                            Err(e) => {
                                tracing::warn!(%user_id, class_id = %self.class_id, "Message rejected: {}", e);
                                if outbound.send(Outbound::Error(e.to_string())).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        tracing::info!(%user_id, "Client requested close");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(%user_id, "Read failed: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
        teardown.close("read loop ended");
    }
}
