//! # Mapprint - Map Print Job Client
//!
//! Mapprint submits map-print jobs to a remote print service and keeps track
//! of what came back. It provides:
//!
//! - **Options and requests**: user-editable print settings turned into
//!   immutable job requests
//! - **Asynchronous execution**: jobs run concurrently and resolve in any order
//! - **History**: per-session record of every job and its outcome
//! - **Display titles**: unique, stable file names for the result list
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mapprint::{
//!     PrintSession,
//!     config::PrintConfig,
//!     service::HttpPrintService,
//!     view::{Extent, FixedView, SpatialReference, ViewContext},
//! };
//!
//! # async fn example() -> Result<(), mapprint::PrintError> {
//! let config = PrintConfig {
//!     service_url: "https://gis.example.com/print".to_string(),
//!     ..Default::default()
//! };
//! let service = HttpPrintService::new(reqwest::Client::new(), &config.service_url);
//! let view = ViewContext::new(
//!     SpatialReference::WEB_MERCATOR,
//!     Extent::parse("-13630000,4540000,-13620000,4550000").unwrap(),
//! );
//!
//! let mut session = PrintSession::new(
//!     config.initial_options(),
//!     Arc::new(service),
//!     Box::new(FixedView::new(view)),
//! );
//!
//! session.print()?;
//! session.print()?;
//! session.wait_all().await;
//!
//! for entry in session.results() {
//!     println!("{} {}", entry.file_name, entry.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`options`] | Print options, format and layout ids |
//! | [`request`] | Job request building |
//! | [`executor`] | Print service trait and async submission |
//! | [`history`] | Job records and their lifecycle |
//! | [`dedupe`] | Unique display titles and file names |
//! | [`capability`] | Layout/format choices from the service |
//! | [`service`] | HTTP print service |
//! | [`session`] | Everything wired together |
//! | [`view`] | Map view and overlay collaborators |
//! | [`config`] | TOML configuration |
//! | [`error`] | Error types |

pub mod capability;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod executor;
pub mod history;
pub mod logging;
pub mod options;
pub mod request;
pub mod service;
pub mod session;
pub mod view;

// Re-exports for convenience
pub use error::PrintError;
pub use options::PrintOptions;
pub use session::PrintSession;
