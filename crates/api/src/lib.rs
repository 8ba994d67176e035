//! HTTP API: thin adapter translating requests into invoice and payment operations.

pub mod app;
pub mod config;
