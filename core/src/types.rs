//! Domain DTOs for the sweets API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift. Decoding is strict: every field is
//! required and typed, so a malformed payload fails in `parse_*` instead of
//! surfacing later as a half-rendered card.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchasable catalog entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Sweet {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    /// Remaining stock.
    pub quantity: u32,
}

impl Sweet {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Request payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response payload of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}
