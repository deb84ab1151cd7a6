//! lus-drive: Google Drive data source.
//!
//! This crate wraps the Drive v3 REST API behind a process-lifetime
//! [`client::DriveClient`] (service-account auth with an in-process token
//! cache), and builds the two domain components on top of it:
//!
//! - [`catalog::Catalog`] -- resolves the patient/class/video folder
//!   hierarchy, swallowing transient listing failures into empty results
//! - [`stream::stream_file`] -- relays file bytes as a lazy chunk stream
//!   that terminates cleanly on any mid-stream failure

pub mod auth;
pub mod catalog;
pub mod client;
pub mod stream;

pub use auth::ServiceAccountKey;
pub use catalog::{Catalog, DriveVideo, LUS_CLASSES};
pub use client::{DriveClient, DriveFile};
