use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, router, Shop, Sweet, Token, DEFAULT_TOKEN};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn detail(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    value["detail"].as_str().unwrap().to_string()
}

fn authed(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {DEFAULT_TOKEN}"))
        .body(String::new())
        .unwrap()
}

fn login_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_sweets_returns_catalog_in_id_order() {
    let resp = app().oneshot(authed("GET", "/api/sweets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let sweets: Vec<Sweet> = body_json(resp).await;
    assert_eq!(sweets.len(), 3);
    assert!(sweets.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn list_sweets_without_token_is_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/sweets").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(detail(resp).await, "Invalid token");
}

#[tokio::test]
async fn list_sweets_with_wrong_token_is_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/sweets")
                .header(http::header::AUTHORIZATION, "Bearer nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- purchase ---

#[tokio::test]
async fn purchase_decrements_quantity() {
    let resp = app().oneshot(authed("POST", "/api/sweets/1/purchase")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let sweet: Sweet = body_json(resp).await;
    assert_eq!(sweet.id, 1);
    assert_eq!(sweet.quantity, 9);
}

#[tokio::test]
async fn purchase_sold_out_is_400() {
    let resp = app().oneshot(authed("POST", "/api/sweets/2/purchase")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(resp).await, "Out of stock");
}

#[tokio::test]
async fn purchase_unknown_is_404() {
    let resp = app().oneshot(authed("POST", "/api/sweets/999/purchase")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(resp).await, "Not found");
}

#[tokio::test]
async fn purchase_bad_id_returns_400() {
    let resp = app().oneshot(authed("POST", "/api/sweets/not-a-number/purchase")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- login ---

#[tokio::test]
async fn login_returns_bearer_token() {
    let resp = app()
        .oneshot(login_request(r#"{"username":"demo","password":"demo"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let token: Token = body_json(resp).await;
    assert_eq!(token.access_token, DEFAULT_TOKEN);
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let resp = app()
        .oneshot(login_request(r#"{"username":"demo","password":"wrong"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(detail(resp).await, "Invalid username or password");
}

// --- purchase until sold out ---

#[tokio::test]
async fn purchase_until_sold_out() {
    use tower::Service;

    let mut app = router(Shop::new(DEFAULT_TOKEN).with_sweet(7, "Jalebi", "Indian", 1.25, 2)).into_service();

    for expected in [1, 0] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(authed("POST", "/api/sweets/7/purchase"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let sweet: Sweet = body_json(resp).await;
        assert_eq!(sweet.quantity, expected);
    }

    // third purchase — sold out
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("POST", "/api/sweets/7/purchase"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // list reflects the server-side decrement
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/sweets"))
        .await
        .unwrap();
    let sweets: Vec<Sweet> = body_json(resp).await;
    assert_eq!(sweets[0].quantity, 0);
}
