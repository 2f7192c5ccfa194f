//! Async API client core for the PocketShelf inventory service.
//!
//! # Overview
//! Two thin clients, one for the item catalog and one for intake forms, that
//! list records (optionally filtered by name) and create new ones. Each call
//! is a single stateless request/response round trip.
//!
//! # Design
//! - `ResourceClient` holds only a base URL and a `Transport`; `ItemClient`
//!   and `FormClient` are the same type over different `Resource`s.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response). `list` / `create` run the pair around one
//!   transport call; hosts that do their own I/O can drive the pair directly.
//! - `Transport` is the only I/O seam. `ReqwestTransport` (default `reqwest`
//!   feature) is the production implementation.
//! - Records are an identifier plus opaque server-owned fields. DTOs are
//!   defined independently from the mock-server crate; integration tests catch
//!   schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{FormClient, Forms, ItemClient, Items, PocketShelf, Resource, ResourceClient};
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{CreatedId, Form, Item, NameFilter, NewForm, NewItem};
