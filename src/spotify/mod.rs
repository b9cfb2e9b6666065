//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify accounts service and Web
//! API, implementing the OAuth 2.0 authorization-code flow and the top-items
//! queries. It is the only layer that talks to Spotify over the network;
//! higher-level code deals in [`crate::types::Credential`] values and typed
//! responses.
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorization-code flow against the accounts service:
//!   authorize-URL construction, one-time code exchange and refresh-token
//!   exchange. All token-endpoint requests carry the client id and secret
//!   and run with a bounded timeout.
//! - [`top`] - Authenticated Web API queries for the visitor's top tracks
//!   and artists over a selectable time range.
//!
//! ## Authentication Strategy
//!
//! The server-side authorization-code grant is used rather than PKCE: the
//! client secret never leaves the server, and the browser only ever sees the
//! provider's consent dialog and the one-time code in the callback query
//! string. The consent dialog is always shown (`show_dialog=true`) so a
//! fresh login never silently resumes a previous authorization.
//!
//! ## Error Types
//!
//! Token-endpoint failures surface as [`crate::error::AuthError`] variants
//! (`CodeExchangeFailed`, `RefreshFailed`); Web API failures surface as
//! `reqwest::Error` and are translated at the handler boundary.

pub mod auth;
pub mod top;
