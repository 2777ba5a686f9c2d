//! Swatch relay library.
//!
//! Proxies the Shopify Admin GraphQL API: walks the complete `swatches`
//! metaobject collection, resolves each record's `main_image` media
//! reference to a CDN URL, and serves the result as one flat JSON array.
//!
//! # Architecture
//!
//! - Axum web framework, one JSON endpoint plus a health check
//! - Handwritten Admin API GraphQL queries over `reqwest`
//! - Stateless: every request re-fetches the whole collection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collector;
pub mod config;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
