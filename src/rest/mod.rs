//! tao.app REST API client.
//!
//! # Trait-based API
//!
//! The [`TaoClient`] trait abstracts every relayed operation, enabling:
//! - Mock implementations for testing
//! - Decorator pattern (e.g., the rate limiting wrapper)
//!
//! ```rust,ignore
//! use tao_income_api::rest::{TaoClient, TaoRestClient};
//!
//! async fn show_tags<C: TaoClient>(client: &C) -> tao_income_api::Result<()> {
//!     let tags = client.subnet_tags().await?;
//!     println!("Tags: {tags}");
//!     Ok(())
//! }
//! ```

mod accounting;
mod analytics;
mod client;
mod endpoints;
mod traits;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, TaoRestClient, TaoRestClientBuilder};
pub use endpoints::*;
pub use traits::TaoClient;
pub use types::*;
