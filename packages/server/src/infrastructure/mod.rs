//! Infrastructure layer: adapters behind the domain traits.

pub mod auth;
pub mod dto;
pub mod realtime;
pub mod repository;
