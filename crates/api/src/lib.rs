//! HTTP API: server, routing, and request/response mapping for the
//! authentication core.

pub mod app;
pub mod context;
pub mod middleware;
