//! Durable storage for planbook: the lesson collection and the signed-in
//! user, each held in its own JSON slot.

pub mod config;
pub mod models;
pub mod queries;
pub mod slot;

pub use config::StoreConfig;
pub use slot::SlotStore;
