//! Core shared types for the Divergence client
//!
//! This crate contains:
//! - View models and the backend JSON normalizer (with its default dataset)
//! - The auth session store over a pluggable storage provider
//! - Backend HTTP contract types
//! - The project-scoping chat session
//! - Page routes and OAuth redirect parsing
//! - The post-login polling controller and dashboard loader (with `async` feature)
//! - Shared UI components (with `ui` feature)

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod session;
pub mod view;

#[cfg(feature = "async")]
pub mod loader;
#[cfg(feature = "async")]
pub mod polling;

#[cfg(feature = "ui")]
pub mod ui;

pub use api::*;
pub use chat::*;
pub use config::*;
pub use error::*;
pub use models::*;
pub use normalize::{normalize_translated_data, normalize_user_data, RawUserData};
pub use routes::{LoginRedirect, Route};
pub use session::*;

#[cfg(feature = "async")]
pub use loader::{load_dashboard, DashboardApi, DashboardLoad};
#[cfg(feature = "async")]
pub use polling::{DataSource, PollOutcome, PollState, PollingController, Sleeper};

#[cfg(feature = "ui")]
pub use ui::*;
