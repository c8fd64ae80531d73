//! InMemory Repository 実装
//!
//! `SchoolDirectory`（ユーザー・クラス・所属）を起点に、
//! HashMap をインメモリ DB として使用します。

pub mod directory;
pub mod membership;
pub mod message;

pub use directory::{ClassRecord, DirectoryError, SchoolDirectory, UserRecord};
pub use membership::InMemoryClassMembershipRepository;
pub use message::InMemoryMessageRepository;
