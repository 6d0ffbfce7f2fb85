//! # Ayura Core
//!
//! Core logic for the Ayura's Lab admin tools.
//!
//! This crate contains:
//! - Wire models for orders, reports, patients, the test catalog and testimonials
//! - The derived list-view pipeline (filter, sort, aggregates) and screen state
//! - Session persistence with a single read/write boundary
//! - Startup configuration
//!
//! **No HTTP concerns**: the REST client lives in `ayura-client`, the terminal
//! front end in `ayura-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod forms;
pub mod models;
pub mod session;
pub mod time;
pub mod view;

pub use config::{CoreConfig, EnvValues};
pub use error::{DashboardError, DashboardResult};
pub use forms::RequiredText;
pub use session::{AdminProfile, Session, SessionHandle, SessionStore};
pub use view::{
    DateRange, ListScreen, LoadState, QueryFor, Record, Selection, SortDirection, SortSpec,
    Summary, ViewContext, ViewQuery,
};
