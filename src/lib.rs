//! # deskplan
//!
//! deskplan is the core of an infrastructure-as-code provider for a
//! helpdesk platform. It translates declarative configuration of helpdesk
//! objects (business rules, schedules, fields, forms, SLA policies,
//! webhooks and account objects) into REST API records and back.
//!
//! ## Architecture
//!
//! - [`framework`] - Tri-state values, diagnostics, and the state container
//! - [`models`] - Wire records of the helpdesk REST API
//! - [`transform`] - Conversions shared by several resources
//! - [`resources`] - Configuration models, one per managed object
//! - [`crud`] - Generic create/read/update/delete/import procedures
//! - [`client`] - HTTP client implementing the remote operations
//! - [`config`] - Configuration loading from environment variables
//! - [`error`] - Error types with token redaction
//!
//! ## Configuration
//!
//! The client needs three environment variables:
//!
//! - `HELPDESK_URL`: Base URL of the helpdesk account
//! - `HELPDESK_EMAIL`: Agent email the API token belongs to
//! - `HELPDESK_API_TOKEN`: API token
//!
//! Optional:
//! - `RUST_LOG`: Log level (e.g., `deskplan=debug`)
//!
//! ## Example
//!
//! Importing a trigger into state:
//!
//! ```ignore
//! use deskplan::client::HelpdeskClient;
//! use deskplan::config::Config;
//! use deskplan::crud::{self, ImportResourceStateRequest};
//! use deskplan::resources::TriggerModel;
//!
//! async fn example() -> Result<(), deskplan::error::DeskError> {
//!     let config = Config::from_env()?;
//!     let client = HelpdeskClient::new(&config)?;
//!
//!     let request = ImportResourceStateRequest { id: "360001".to_string() };
//!     let response = crud::import::<TriggerModel, _>(&client, request).await;
//!     for diagnostic in &response.diagnostics {
//!         eprintln!("{diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod crud;
pub mod error;
pub mod framework;
pub mod models;
pub mod resources;
pub mod transform;
