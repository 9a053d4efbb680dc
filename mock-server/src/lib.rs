//! In-memory stand-in for the sweet shop API.
//!
//! Serves the three endpoints the storefront talks to: list, purchase and
//! login. Sweets routes require `Authorization: Bearer <token>`; failures are
//! reported as `{"detail": "..."}` with the matching status code.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_TOKEN: &str = "mock-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Sweet {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Server state: the catalog, the accepted bearer token and the login users.
#[derive(Debug, Default)]
pub struct Shop {
    sweets: BTreeMap<u64, Sweet>,
    token: String,
    users: HashMap<String, String>,
}

impl Shop {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..Self::default()
        }
    }

    /// A small catalog with one sold-out entry.
    pub fn seeded(token: &str) -> Self {
        Self::new(token)
            .with_sweet(1, "Gulab Jamun", "Indian", 2.5, 10)
            .with_sweet(2, "Kaju Katli", "Indian", 4.0, 0)
            .with_sweet(3, "Dark Truffle", "Chocolate", 1.75, 3)
            .with_user("demo", "demo")
    }

    pub fn with_sweet(mut self, id: u64, name: &str, category: &str, price: f64, quantity: u32) -> Self {
        self.sweets.insert(
            id,
            Sweet {
                id,
                name: name.to_string(),
                category: category.to_string(),
                price,
                quantity,
            },
        );
        self
    }

    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.insert(username.to_string(), password.to_string());
        self
    }
}

pub type Db = Arc<RwLock<Shop>>;

pub fn app() -> Router {
    router(Shop::seeded(DEFAULT_TOKEN))
}

pub fn router(shop: Shop) -> Router {
    let db: Db = Arc::new(RwLock::new(shop));
    Router::new()
        .route("/api/sweets", get(list_sweets))
        .route("/api/sweets/{id}/purchase", post(purchase_sweet))
        .route("/api/auth/login", post(login))
        .with_state(db)
}

pub async fn serve(listener: TcpListener, shop: Shop) -> Result<(), std::io::Error> {
    axum::serve(listener, router(shop)).await
}

/// An error response in the `{"detail": ...}` shape.
#[derive(Debug)]
pub struct Failure(StatusCode, &'static str);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "detail": self.1 }))).into_response()
    }
}

fn authorize(shop: &Shop, headers: &HeaderMap) -> Result<(), Failure> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == shop.token => Ok(()),
        _ => {
            tracing::debug!("rejecting request with missing or invalid bearer token");
            Err(Failure(StatusCode::UNAUTHORIZED, "Invalid token"))
        }
    }
}

async fn list_sweets(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<Sweet>>, Failure> {
    let shop = db.read().await;
    authorize(&shop, &headers)?;
    Ok(Json(shop.sweets.values().cloned().collect()))
}

async fn purchase_sweet(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Sweet>, Failure> {
    let mut shop = db.write().await;
    authorize(&shop, &headers)?;
    let sweet = shop
        .sweets
        .get_mut(&id)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Not found"))?;
    if sweet.quantity == 0 {
        return Err(Failure(StatusCode::BAD_REQUEST, "Out of stock"));
    }
    sweet.quantity -= 1;
    tracing::info!(id, remaining = sweet.quantity, "sweet purchased");
    Ok(Json(sweet.clone()))
}

async fn login(State(db): State<Db>, Json(input): Json<Login>) -> Result<Json<Token>, Failure> {
    let shop = db.read().await;
    match shop.users.get(&input.username) {
        Some(password) if *password == input.password => Ok(Json(Token {
            access_token: shop.token.clone(),
            token_type: "bearer".to_string(),
        })),
        _ => Err(Failure(StatusCode::UNAUTHORIZED, "Invalid username or password")),
    }
}
