pub mod chat;
pub mod config;
pub mod entity;
pub mod error;
pub mod snapshot;
pub mod stream;
