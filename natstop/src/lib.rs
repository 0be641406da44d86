//! natstop: a live `top`-style monitor for a NATS server's monitoring endpoint.

pub mod app;
pub mod config;
pub mod history;
pub mod input;
pub mod logging;
pub mod sampler;
pub mod sort;
pub mod source;
pub mod types;
pub mod ui;
pub mod widgets;
