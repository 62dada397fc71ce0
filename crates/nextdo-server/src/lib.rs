//! HTTP front end for the nextdo scheduler.
//!
//! Serves the JSON task API, the `nextdate` calculator and, optionally, a
//! static web UI. Build the router with [`app::build_router`].

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
