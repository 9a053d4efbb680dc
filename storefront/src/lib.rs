//! Host for the sweet shop storefront: configuration, network transport,
//! and the event loop that drives the `sweets_core` view.

pub mod app;
pub mod config;
pub mod runtime;
pub mod transport;
