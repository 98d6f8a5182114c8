//! HTTP handlers and routers for the service.

pub mod content;
pub mod health;
