//! Read and write operations on the durable slots.

pub mod lessons;
pub mod session;
