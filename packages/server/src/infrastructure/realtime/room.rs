//! Per-class broadcast room.
//!
//! Each room is an actor task that owns its member map. Join, leave and
//! publish are commands on one unbounded channel, so every mutation and every
//! delivery for a class happens on that single task, in arrival order.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{
    mpsc::{self, error::TrySendError},
    oneshot,
};

use crate::domain::{ClassId, ConnectionId, Message, UserId};

use super::outbound::Outbound;

/// One joined connection, as seen by the room.
#[derive(Debug)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    outbound: mpsc::Sender<Outbound>,
}

impl Member {
    /// Create a member that delivers into the given outbound queue
    pub fn new(
        connection_id: ConnectionId,
        user_id: UserId,
        outbound: mpsc::Sender<Outbound>,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            outbound,
        }
    }
}

enum RoomCommand {
    Join {
        member: Member,
        ack: oneshot::Sender<()>,
    },
    Leave {
        connection_id: ConnectionId,
    },
    Publish {
        message: Arc<Message>,
    },
    MemberCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Result of one publish, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Delivery {
    delivered: usize,
    dropped: usize,
    pruned: usize,
}

/// Room state, owned exclusively by the actor task.
struct Room {
    class_id: ClassId,
    members: HashMap<ConnectionId, Member>,
}

impl Room {
    fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            members: HashMap::new(),
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<RoomCommand>) {
        tracing::debug!(class_id = %self.class_id, "Room actor started");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        tracing::debug!(class_id = %self.class_id, "Room actor stopped");
    }

    fn handle(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Join { member, ack } => {
                self.join(member);
                let _ = ack.send(());
            }
            RoomCommand::Leave { connection_id } => {
                self.leave(connection_id);
            }
            RoomCommand::Publish { message } => {
                let delivery = self.publish(&message);
                tracing::debug!(
                    class_id = %self.class_id,
                    message_id = %message.id,
                    delivered = delivery.delivered,
                    dropped = delivery.dropped,
                    pruned = delivery.pruned,
                    "Message dispatched"
                );
            }
            RoomCommand::MemberCount { reply } => {
                let _ = reply.send(self.members.len());
            }
        }
    }

    fn join(&mut self, member: Member) {
        let connection_id = member.connection_id;
        let user_id = member.user_id;
        self.members.insert(connection_id, member);
        tracing::info!(
            class_id = %self.class_id,
            %user_id,
            %connection_id,
            total = self.members.len(),
            "Client joined room"
        );
    }

    /// Dropping the member releases the room's handle on the client's queue.
    fn leave(&mut self, connection_id: ConnectionId) -> bool {
        match self.members.remove(&connection_id) {
            Some(member) => {
                tracing::info!(
                    class_id = %self.class_id,
                    user_id = %member.user_id,
                    %connection_id,
                    total = self.members.len(),
                    "Client left room"
                );
                true
            }
            None => false,
        }
    }

    /// Try-enqueue to every member; a full queue drops this message for that
    /// member only, a closed queue removes the member.
    fn publish(&mut self, message: &Arc<Message>) -> Delivery {
        let mut delivery = Delivery::default();
        let mut closed = Vec::new();

        for (connection_id, member) in &self.members {
            match member.outbound.try_send(Outbound::Live(Arc::clone(message))) {
                Ok(()) => delivery.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    delivery.dropped += 1;
                    tracing::debug!(
                        class_id = %self.class_id,
                        %connection_id,
                        "Outbound queue full, dropping message for this client"
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(*connection_id),
            }
        }

        for connection_id in closed {
            if self.leave(connection_id) {
                delivery.pruned += 1;
            }
        }
        delivery
    }
}

/// Cloneable handle to a running room actor.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    class_id: ClassId,
    commands: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    /// Spawn the actor for a class and return its handle.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(class_id: ClassId) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        tokio::spawn(Room::new(class_id).run(receiver));
        Self { class_id, commands }
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Add a member. Returns once the room has applied the join, so every
    /// publish issued afterwards reaches the new member.
    pub async fn join(&self, member: Member) {
        let (ack, joined) = oneshot::channel();
        if self.commands.send(RoomCommand::Join { member, ack }).is_err() {
            tracing::warn!(class_id = %self.class_id, "Room actor is gone, join ignored");
            return;
        }
        let _ = joined.await;
    }

    /// Remove a member if present. Idempotent.
    pub fn leave(&self, connection_id: ConnectionId) {
        let _ = self.commands.send(RoomCommand::Leave { connection_id });
    }

    /// Queue a message for delivery to every current member. Never blocks.
    pub fn publish(&self, message: Message) {
        let message = Arc::new(message);
        let _ = self.commands.send(RoomCommand::Publish { message });
    }

    pub async fn member_count(&self) -> usize {
        let (reply, count) = oneshot::channel();
        if self.commands.send(RoomCommand::MemberCount { reply }).is_err() {
            return 0;
        }
        count.await.unwrap_or(0)
    }
}
