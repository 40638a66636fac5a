//! Formrelay is a multipart form relay for the HubSpot forms API.
//!
//! It receives a `multipart/form-data` submission, pulls the routing
//! identifiers out of underscore-prefixed control fields, re-encodes the
//! remaining fields and files as a fresh multipart body, and posts it to
//! the regional HubSpot submission endpoint. The upstream response (or a
//! local validation error) is relayed back to the caller as JSON.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- Upstream endpoint template, URL construction, and
//!   startup validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`submit`] -- The submission pipeline: multipart ingestion, control
//!   field extraction, outbound body construction, and response relay.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sentry-integration` | Sentry error tracking |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod server;
pub mod submit;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
