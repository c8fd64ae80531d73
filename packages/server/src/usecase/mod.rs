//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層と realtime ハブから呼び出され、Domain 層のトレイトを操作します。

pub mod admit_participant;
pub mod error;
pub mod recent_messages;
pub mod send_message;

pub use admit_participant::AdmitParticipantUseCase;
pub use error::{ConnectError, SendMessageError};
pub use recent_messages::RecentMessagesUseCase;
pub use send_message::SendMessageUseCase;
