//! REST API over the statistics service

pub mod handlers;
pub mod server;
pub mod types;

pub use server::{router, serve};
