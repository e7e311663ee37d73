//! Blog summarizer that saves each summary to a document store and a record store.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod transform;
pub mod tui;
