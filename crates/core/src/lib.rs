//! Core library for instafeed
//!
//! This crate implements the **Functional Core** of the instafeed application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The instafeed project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`instafeed_core`** (this crate): Pure transformation of API responses into markup
//! - **`instafeed`**: HTTP transport, output containers and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: The same response and configuration always produce the same markup
//!   (given the same random source for `random` ordering)
//! - **No network I/O**: Responses arrive already decoded, markup leaves through a
//!   [`pipeline::MarkupSink`] supplied by the caller
//! - **No hidden state**: The next-page cursor is returned, never stored
//!
//! # Module Organization
//!
//! - [`path`]: Dotted/bracketed property path resolution
//! - [`template`]: `{{path}}` placeholder substitution
//! - [`validate`]: Structural validation of raw items into typed items
//! - [`order`]: Sort and shuffle policies
//! - [`render`]: Per-type projection of items into template values
//! - [`pipeline`]: The response-to-markup pass, hooks and cursor bookkeeping
//! - [`envelope`]: The `{meta, data, pagination}` response envelope
//! - [`config`]: Feed options and their validated configuration
//! - [`request`]: First-page URL construction
//! - [`pagination`]: On-disk storage of next-page cursors
//! - [`error`]: Error types and user-facing messages
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use instafeed_core::config::{FeedConfig, FeedOptions};
//! use instafeed_core::pipeline::FeedTransform;
//!
//! let config = FeedConfig::from_options(&FeedOptions {
//!     image_template: Some("{{source}}:{{orientation}}".to_string()),
//!     ..Default::default()
//! })?;
//!
//! let transform = FeedTransform::new(config);
//! let outcome = transform.run(&response, &mut rand::thread_rng(), &mut sink, &mut hooks);
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod order;
pub mod pagination;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod request;
pub mod template;
pub mod validate;
