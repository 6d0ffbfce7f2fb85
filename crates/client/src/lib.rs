//! # Ayura Client
//!
//! Authenticated REST client for the Ayura's Lab backend.
//!
//! Handles:
//! - One configured `reqwest` client per process, built from `CoreConfig`
//! - Bearer authentication from the shared session, with one 401 handler
//! - Endpoint wrappers for orders, reports, patients, catalog and testimonials
//! - Delivering fetch results into list screens
//!
//! Domain types and the list-view pipeline come from `ayura-core`.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;
pub mod orders;
pub mod patients;
pub mod reports;
pub mod screen;
pub mod testimonials;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use reports::ReportUpload;
pub use screen::{refresh, SharedScreen};
