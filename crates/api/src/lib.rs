//! HTTP surface of both services: routers, request/response mapping, and
//! control-plane wiring.

pub mod app;
