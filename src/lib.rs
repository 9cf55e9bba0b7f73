//! Core library for event-stars
pub mod config;
pub mod models;
pub mod api;
pub mod view_model;
pub mod shell;
pub mod util;
