//! Paws & Whiskers storefront library.
//!
//! The storefront functionality lives in this library crate so handlers,
//! services, and repositories can be tested and reused; `main.rs` is a thin
//! binary wrapper around [`routes::routes`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collections;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
