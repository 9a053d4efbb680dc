//! API client core and view model for the sweet shop storefront.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The `Storefront` view sits
//! on top of the client and turns completed round trips into list state, an
//! inline error, or a purchase notification.
//!
//! # Design
//! - `SweetsClient` holds only `base_url` and the bearer `Credential`; the
//!   credential can be rotated between requests.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Responses are decoded strictly into typed DTOs; a malformed payload is
//!   an `ApiError::Decode`, never a partially rendered page.
//! - Pending requests carry tickets so stale completions are dropped.

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod render;
pub mod types;
pub mod view;

pub use auth::Credential;
pub use client::SweetsClient;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::{Card, Page};
pub use types::{AccessToken, LoginRequest, Sweet};
pub use view::{
    ListPhase, LoadResult, LoadTicket, Outcome, PendingLoad, PendingPurchase, PurchaseResult,
    PurchaseTicket, Storefront,
};
