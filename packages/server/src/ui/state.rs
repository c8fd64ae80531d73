//! Shared application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use classchat_shared::time::now_utc;

use crate::{
    domain::{ClassMembershipRepository, CredentialValidator, MessageRepository},
    infrastructure::{
        realtime::{HubConfig, RoomRegistry},
        repository::{InMemoryClassMembershipRepository, InMemoryMessageRepository, SchoolDirectory},
    },
    usecase::{AdmitParticipantUseCase, RecentMessagesUseCase, SendMessageUseCase},
};

use super::session::SessionServices;

/// Shared application state
pub struct AppState {
    /// Process-wide class rooms
    pub registry: Arc<RoomRegistry>,
    /// Access gateway (認証 → 認可)
    pub admit: AdmitParticipantUseCase,
    /// Use cases driven by admitted sessions
    pub services: SessionServices,
    pub hub: HubConfig,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the collaborators together.
    pub fn new(
        credentials: Arc<dyn CredentialValidator>,
        membership: Arc<dyn ClassMembershipRepository>,
        messages: Arc<dyn MessageRepository>,
        hub: HubConfig,
    ) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        Self {
            admit: AdmitParticipantUseCase::new(credentials, membership.clone()),
            services: SessionServices {
                send_message: Arc::new(SendMessageUseCase::new(
                    membership,
                    messages.clone(),
                    registry.clone(),
                )),
                recent_messages: Arc::new(RecentMessagesUseCase::new(messages)),
            },
            registry,
            hub,
            started_at: now_utc(),
        }
    }

    /// State backed by the in-memory stores seeded from a directory.
    pub fn in_memory(
        credentials: Arc<dyn CredentialValidator>,
        directory: &SchoolDirectory,
        hub: HubConfig,
    ) -> Self {
        Self::new(
            credentials,
            Arc::new(InMemoryClassMembershipRepository::new(directory)),
            Arc::new(InMemoryMessageRepository::new(directory)),
            hub,
        )
    }
}
