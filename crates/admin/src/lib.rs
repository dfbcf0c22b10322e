//! Paws & Whiskers admin panel library.
//!
//! The admin functionality lives in this library crate so handlers,
//! services, and repositories can be tested and reused; `main.rs` is a thin
//! binary wrapper around [`routes::routes`].
//!
//! The panel manages the catalog, customer orders, quick-order callbacks,
//! review moderation, and admin accounts. It binds to localhost by default
//! and is meant to sit behind a private network, never on the public site's
//! hostname.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
