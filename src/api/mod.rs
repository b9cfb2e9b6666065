//! # API Module
//!
//! This module provides the HTTP handlers for the top-items web application.
//! It is the boundary where token-lifecycle errors are translated into
//! user-visible behavior: every [`crate::error::AuthError`] is recovered here
//! and turned into a redirect to the entry or login page - never a raw error
//! in the browser, never a crash.
//!
//! ## Endpoints
//!
//! ### Pages
//!
//! - [`welcome`] - Entry page with the login link (`GET /`)
//! - [`home`] - Landing page after authorization (`GET /home`); requires a
//!   fresh credential, otherwise redirects to login
//! - [`about`], [`privacy`] - Static informational pages
//!
//! ### Authorization
//!
//! - [`login`] - Mints the visitor identity if needed, clears any stale
//!   credential and redirects to the provider's consent dialog
//! - [`callback`] - Handles the provider redirect (`GET /redirect`),
//!   exchanging the one-time code for the initial credential
//! - [`logout`] - Clears the stored credential and the visitor identity
//!
//! ### Data
//!
//! - [`top_items`] - Top tracks or artists over a selectable time range,
//!   shaped for display (`GET /{item_type}/{time_range}`)
//!
//! ### Monitoring
//!
//! - [`health`] - Status endpoint returning application version information
//!
//! ## Architecture
//!
//! The module is built using the [Axum](https://docs.rs/axum) web framework.
//! Handlers receive the session via the `tower-sessions` extractor and the
//! shared [`crate::server::AppState`] via an `Extension` layer; the credential
//! store for the request is obtained from the startup-selected backend.

mod auth;
mod health;
mod pages;
mod top;

pub use auth::{callback, login, logout};
pub use health::health;
pub use pages::{about, home, privacy, welcome};
pub use top::top_items;
