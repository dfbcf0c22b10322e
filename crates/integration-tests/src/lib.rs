//! Integration tests for Paws & Whiskers.
//!
//! Two kinds of tests live in `tests/`:
//!
//! - Session and contract tests that run on their own with plain
//!   `cargo test -p paws-integration-tests`.
//! - End-to-end HTTP tests marked `#[ignore]`, which expect a migrated,
//!   seeded database and both servers running locally:
//!
//! ```bash
//! cargo run -p paws-cli -- migrate
//! cargo run -p paws-cli -- seed
//! cargo run -p paws-storefront &
//! cargo run -p paws-admin &
//! cargo test -p paws-integration-tests -- --ignored
//! ```

/// Storefront base URL, overridable for non-default ports.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Admin panel base URL.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

/// HTTP client with a cookie store, so session cookies survive across
/// requests the way a browser's would.
///
/// # Panics
///
/// Panics if the client cannot be constructed; only static configuration
/// is involved.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
