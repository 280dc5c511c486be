//! End-to-end request flows through the full router, backed by the in-memory store

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use menu_cloud::api::build_app;
use menu_cloud::config::Config;
use menu_cloud::db::memory::MemoryStore;
use menu_cloud::state::AppState;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "menu-cloud-test-boundary";

struct TestApp {
    app: Router,
    _uploads: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let upload_dir = uploads.path().to_string_lossy().to_string();
        let config = Config::from_lookup(move |name| match name {
            "UPLOAD_DIR" => Some(upload_dir.clone()),
            _ => None,
        })
        .unwrap();
        let state = AppState::with_store(config, Arc::new(MemoryStore::new()));
        Self {
            app: build_app(state),
            _uploads: uploads,
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(req.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    async fn multipart(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Vec<u8>,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .unwrap();
        self.send(req).await
    }

    async fn register(&self, email: &str) -> (StatusCode, Value) {
        self.json(
            "POST",
            "/api/v1/auth/register-user",
            None,
            json!({ "email": email, "password": "secret-pass" }),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={email}&password={password}")))
            .unwrap();
        self.send(req).await
    }

    /// Registers and logs in, returning the token pair
    async fn sign_up(&self, email: &str) -> Value {
        let (status, _) = self.register(email).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, pair) = self.login(email, "secret-pass").await;
        assert_eq!(status, StatusCode::OK);
        pair
    }

    async fn create_restaurant(&self, token: &str, name: &str, slug: &str) -> (StatusCode, Value) {
        self.json(
            "POST",
            "/api/v1/restaurant",
            Some(token),
            json!({
                "business_number": format!("BN-{slug}"),
                "restaurant_name": name,
                "url_slug": slug,
                "tagline": "Best pizza",
            }),
        )
        .await
    }
}

fn access(pair: &Value) -> String {
    pair["access_token"].as_str().unwrap().to_string()
}

/// Multipart body from text fields and optional (field, file name, bytes) parts
fn form_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "menu-cloud");
}

#[tokio::test]
async fn test_owner_creates_restaurant() {
    let app = TestApp::new();
    let pair = app.sign_up("a@x.com").await;
    assert_eq!(pair["token_type"], "bearer");
    let token = access(&pair);

    let (status, restaurant) = app.create_restaurant(&token, "Pizza Co", "pizza-co").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(restaurant["restaurant_name"], "Pizza Co");
    assert_eq!(restaurant["is_branch"], false);

    let (status, me) = app.get("/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["restaurant_id"], restaurant["id"]);
    assert!(me.get("password").is_none());

    // One restaurant per owner
    let (status, body) = app.create_restaurant(&token, "Pizza Two", "pizza-two").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3003);

    let (status, detail) = app.get("/api/v1/restaurant/user-restaurant", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["url_slug"], "pizza-co");

    let (status, list) = app
        .get("/api/v1/restaurant/fetch-restaurants?skip=0&limit=10", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_slug_rejected() {
    let app = TestApp::new();
    let first = access(&app.sign_up("a@x.com").await);
    let second = access(&app.sign_up("b@x.com").await);

    let (status, _) = app.create_restaurant(&first, "Pizza Co", "pizza-co").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.create_restaurant(&second, "Burger Co", "pizza-co").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/v1/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = app.get("/api/v1/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/category", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_and_login_errors() {
    let app = TestApp::new();
    app.sign_up("a@x.com").await;

    let (status, body) = app.register("A@X.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    let (status, _) = app.login("a@x.com", "wrong-pass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.login("nobody@x.com", "secret-pass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let app = TestApp::new();
    let pair = app.sign_up("a@x.com").await;
    let refresh = pair["refresh_token"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/auth/refresh-token?token={refresh}");
    let (status, renewed) = app.json("POST", &uri, None, Value::Null).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(renewed["refresh_token"], refresh.as_str());

    let (status, _) = app.get("/api/v1/auth/me", Some(&access(&renewed))).await;
    assert_eq!(status, StatusCode::OK);

    // Access tokens are not accepted as refresh tokens
    let uri = format!("/api/v1/auth/refresh-token?token={}", access(&pair));
    let (status, _) = app.json("POST", &uri, None, Value::Null).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A new login replaces the stored refresh token
    app.login("a@x.com", "secret-pass").await;
    let uri = format!("/api/v1/auth/refresh-token?token={refresh}");
    let (status, _) = app.json("POST", &uri, None, Value::Null).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .json("POST", "/api/v1/auth/refresh-token", None, Value::Null)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_restaurant_images() {
    let app = TestApp::new();
    let token = access(&app.sign_up("a@x.com").await);
    app.create_restaurant(&token, "Pizza Co", "pizza-co").await;

    let png = png_bytes();
    let body = form_body(&[], &[("logo", "logo.png", &png)]);
    let (status, images) = app
        .multipart("PUT", "/api/v1/restaurant/upload_images", &token, body)
        .await;
    assert_eq!(status, StatusCode::OK);
    let logo = images["logo"].as_str().unwrap();
    assert!(logo.starts_with("/static/"));
    assert!(logo.ends_with("logo.png"));

    // The stored file is served back
    let (status, _) = app.get(logo, None).await;
    assert_eq!(status, StatusCode::OK);

    let body = form_body(&[], &[("logo", "logo.gif", &png)]);
    let (status, _) = app
        .multipart("PUT", "/api/v1/restaurant/upload_images", &token, body)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_menu_flow() {
    let app = TestApp::new();
    let token = access(&app.sign_up("a@x.com").await);
    app.create_restaurant(&token, "Pizza Co", "pizza-co").await;

    let (status, category) = app
        .json(
            "POST",
            "/api/v1/category",
            Some(&token),
            json!({ "name": "Pizzas" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["status"], "active");
    let category_id = category["id"].as_i64().unwrap();

    let (status, addon) = app
        .json(
            "POST",
            "/api/v1/addon",
            Some(&token),
            json!({ "name": "Extra cheese", "price": "1.50" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let addon_id = addon["id"].as_i64().unwrap();

    let category_field = category_id.to_string();
    let addon_field = addon_id.to_string();
    let png = png_bytes();
    let body = form_body(
        &[
            ("category_id", &category_field),
            ("name", "Margherita"),
            ("price", "8.50"),
            ("spice_level", "mild"),
            ("addon_ids", &addon_field),
        ],
        &[("image", "margherita.png", &png)],
    );
    let (status, dish) = app.multipart("POST", "/api/v1/dish", &token, body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dish["name"], "Margherita");
    assert_eq!(dish["addons"].as_array().unwrap().len(), 1);
    assert!(dish["image"].as_str().unwrap().starts_with("/static/"));
    let dish_id = dish["id"].as_i64().unwrap();

    // Same name in the same restaurant
    let body = form_body(
        &[
            ("category_id", &category_field),
            ("name", "Margherita"),
            ("price", "9.00"),
            ("spice_level", "mild"),
        ],
        &[],
    );
    let (status, _) = app.multipart("POST", "/api/v1/dish", &token, body).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Public lookups
    let (status, detail) = app.get(&format!("/api/v1/dish/{dish_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["category"]["name"], "Pizzas");

    let (status, menu) = app.get("/api/v1/dish/restaurant/pizza-co", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/v1/dish/restaurant/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A category in use cannot be deleted
    let (status, _) = app
        .json(
            "DELETE",
            &format!("/api/v1/category/{category_id}"),
            Some(&token),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = form_body(&[("price", "9.25"), ("addon_ids", "")], &[]);
    let (status, updated) = app
        .multipart("PUT", &format!("/api/v1/dish/{dish_id}"), &token, body)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], "9.25");
    assert!(updated["addons"].as_array().unwrap().is_empty());

    let (status, _) = app
        .json(
            "DELETE",
            &format!("/api/v1/dish/{dish_id}"),
            Some(&token),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get("/api/v1/dish/restaurant/pizza-co", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No dishes found");

    let (status, _) = app
        .json(
            "DELETE",
            &format!("/api/v1/category/{category_id}"),
            Some(&token),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_catalog_is_scoped_to_owner() {
    let app = TestApp::new();
    let owner = access(&app.sign_up("a@x.com").await);
    let other = access(&app.sign_up("b@x.com").await);
    app.create_restaurant(&owner, "Pizza Co", "pizza-co").await;
    app.create_restaurant(&other, "Burger Co", "burger-co").await;

    let (_, category) = app
        .json(
            "POST",
            "/api/v1/category",
            Some(&owner),
            json!({ "name": "Pizzas" }),
        )
        .await;
    let id = category["id"].as_i64().unwrap();

    let (status, _) = app
        .json(
            "PUT",
            &format!("/api/v1/category/{id}"),
            Some(&other),
            json!({ "name": "Stolen" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = app.get("/api/v1/category", Some(&other)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_branch_restaurants() {
    let app = TestApp::new();
    let token = access(&app.sign_up("a@x.com").await);
    let (_, parent) = app.create_restaurant(&token, "Pizza Co", "pizza-co").await;

    let (status, created) = app
        .json(
            "POST",
            "/api/v1/restaurant/create-branch-restaurant",
            Some(&token),
            json!({
                "business_number": "BN-downtown",
                "restaurant_name": "Pizza Co Downtown",
                "url_slug": "pizza-co-downtown",
                "tagline": "Best pizza downtown",
                "user_email": "downtown@x.com",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["restaurant"]["parent_restaurant_id"], parent["id"]);
    let password = created["generated_password"].as_str().unwrap().to_string();

    // The provisioned owner can log in to the branch
    let (status, pair) = app.login("downtown@x.com", &password).await;
    assert_eq!(status, StatusCode::OK);
    let (_, me) = app.get("/api/v1/auth/me", Some(&access(&pair))).await;
    assert_eq!(me["restaurant_id"], created["restaurant"]["id"]);

    let (status, branches) = app
        .get("/api/v1/restaurant/get-branch-restaurants", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(branches.as_array().unwrap().len(), 1);

    let branch_id = created["restaurant"]["id"].as_i64().unwrap();
    let (status, _) = app
        .json(
            "DELETE",
            &format!("/api/v1/restaurant/{branch_id}"),
            Some(&token),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
