//! Paws & Whiskers Core - Shared domain library.
//!
//! This crate provides the common types and pure domain logic used across
//! all Paws & Whiskers components:
//! - `storefront` - Public-facing pet shop site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Category trees are assembled here from flat rows the
//! callers fetch; cart, favorites, and comparison arithmetic happens here
//! on items the callers load from session storage. This keeps the
//! interesting rules testable without a running server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`models`] - Entity structs shared by the storefront and admin panel
//! - [`catalog`] - Category tree assembly and flattening
//! - [`collection`] - Cart, favorites, and comparison list logic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod collection;
pub mod models;
pub mod types;

pub use types::*;
