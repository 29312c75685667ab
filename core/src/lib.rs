//! Client core for the product management screen.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! product REST resource, keeps a local cache in sync with it, and models
//! the screen (table, editor, delete confirmation) as a state machine.
//!
//! # Design
//! - `ProductClient` is stateless; it holds only `base_url`.
//! - `Transport` is the one I/O seam; `HttpTransport` is built from an
//!   explicit `ClientConfig`.
//! - `ProductStore` patches its cache only after a remote success and
//!   ignores list responses that were overtaken by a newer fetch.
//! - `ProductForm` validates drafts before anything reaches the network.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod page;
pub mod service;
pub mod store;
pub mod table;
pub mod transport;
pub mod types;

pub use client::ProductClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, StoreError, StoreOperation};
pub use form::{EditorMode, Field, FieldErrors, ProductDraft, ProductForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use page::{Notification, NotificationLevel, Overlay, ProductsPage, SubmitOutcome};
pub use service::ProductService;
pub use store::{FetchOutcome, FetchTicket, MutationTicket, ProductStore};
pub use table::{Column, SortColumn, Sorting, TableState};
pub use transport::{HttpTransport, Transport};
pub use types::{Product, ProductId, ProductInput, ProductPatch};
