//! Storage adapters
//!
//! `domain::repository` の trait（所属確認・メッセージ保存）を実装します。
//! 現在はシードデータから構築するインメモリ実装のみです。

pub mod inmemory;

pub use inmemory::{
    DirectoryError, InMemoryClassMembershipRepository, InMemoryMessageRepository,
    SchoolDirectory,
};
