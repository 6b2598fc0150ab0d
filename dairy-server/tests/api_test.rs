//! HTTP tests against the fully assembled router (oneshot, embedded RocksDB)
//! Run: cargo test -p dairy-server --test api_test

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use chrono::Local;
use dairy_server::auth::JwtConfig;
use dairy_server::{Config, ServerState};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_SECRET: &str = "let-me-in";

struct TestApp {
    app: Router,
    _tmp: tempfile::TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let jwt = JwtConfig {
            access_secret: "a".repeat(48),
            refresh_secret: "r".repeat(48),
            access_expiration_minutes: 60,
            refresh_expiration_minutes: 600,
            issuer: "dairy-server".to_string(),
            audience: "dairy-spa".to_string(),
            ephemeral: false,
        };
        let mut config = Config::with_overrides(tmp.path().to_string_lossy(), jwt);
        config.admin_secret = Some(ADMIN_SECRET.to_string());
        config.cors_origin = None;

        let state = ServerState::initialize(&config).await.unwrap();
        Self {
            app: dairy_server::api::build_app(state),
            _tmp: tmp,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    /// Register and log in an admin, returning the access token
    async fn admin_token(&self) -> String {
        let (status, _) = self
            .post(
                "/api/v1/users/register-admin",
                None,
                json!({"secret": ADMIN_SECRET, "username": "Owner", "fullName": "Dairy Owner", "password": "pass-1234"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .post(
                "/api/v1/users/login",
                None,
                json!({"username": "owner", "password": "pass-1234"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["accessToken"].as_str().unwrap().to_string()
    }

    async fn create_customer(&self, token: &str, name: &str, mobile: &str, rate: f64) -> String {
        let (status, body) = self
            .post(
                "/api/v1/customers",
                Some(token),
                json!({"fullName": name, "mobile": mobile, "baseFatRate": rate}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/api/v1/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1001);

    let (status, _) = app.get("/api/v1/customers", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_registration_and_login() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/users/register-admin",
            None,
            json!({"secret": "wrong", "username": "a", "fullName": "A", "password": "p"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 1007);

    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/v1/users/register-admin",
            None,
            json!({"secret": ADMIN_SECRET, "username": "OWNER", "fullName": "Again", "password": "p"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), 1010);

    let (status, body) = app
        .post(
            "/api/v1/users/login",
            None,
            json!({"username": "owner", "password": "wrong"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1002);

    let (status, body) = app.get("/api/v1/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "owner");
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"].get("hashPass").is_none());
}

#[tokio::test]
async fn customer_crud() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/v1/customers",
            Some(&token),
            json!({"fullName": "Asha", "mobile": "9800000001"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), 7);
    assert_eq!(body["details"]["field"], "baseFatRate");

    let (status, body) = app
        .post(
            "/api/v1/customers",
            Some(&token),
            json!({"fullName": "Asha", "mobile": "9800000001", "baseFatRate": -1.0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), 3003);

    let asha = app.create_customer(&token, "Asha", "9800000001", 2.0).await;

    let (status, body) = app
        .post(
            "/api/v1/customers",
            Some(&token),
            json!({"fullName": "Copy", "mobile": "9800000001", "baseFatRate": 1.0}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), 3002);

    let (status, body) = app.get(&format!("/api/v1/customers/{asha}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paymentMode"], "weekly");
    assert_eq!(body["data"]["baseFatRate"], 2.0);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/v1/customers/{asha}"),
            Some(&token),
            Some(json!({"baseFatRate": 3.0, "paymentMode": "monthly"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["baseFatRate"], 3.0);
    assert_eq!(body["data"]["fullName"], "Asha");

    let (status, body) = app.get("/api/v1/customers", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(Method::DELETE, &format!("/api/v1/customers/{asha}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/v1/customers/{asha}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), 3001);
}

#[tokio::test]
async fn milk_entries_and_weekly_summary() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let asha = app.create_customer(&token, "Asha", "9800000001", 2.0).await;

    // validation
    let (status, body) = app
        .post(
            "/api/v1/milkentry",
            Some(&token),
            json!({"customerId": asha, "date": "2024-03-02", "session": "night", "liters": 5.0, "fat": 4.0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), 4004);

    let (status, body) = app
        .post(
            "/api/v1/milkentry",
            Some(&token),
            json!({"customerId": asha, "date": "2024-03-02", "session": "morning", "liters": -5.0, "fat": 4.0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), 4002);

    let (status, body) = app
        .post(
            "/api/v1/milkentry",
            Some(&token),
            json!({"customerId": "customer:ghost", "date": "2024-03-02", "session": "morning", "liters": 5.0, "fat": 4.0}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), 3001);

    // 2024-03-02 is a Saturday, 2024-03-01 belongs to the previous week
    let mut ids = Vec::new();
    for (date, session, liters, fat) in [
        ("2024-03-01", "evening", 7.0, 4.0),
        ("2024-03-02", "morning", 5.0, 4.0),
        ("2024-03-02", "evening", 3.0, 4.0),
        ("2024-03-03", "morning", 4.0, 4.5),
    ] {
        let (status, body) = app
            .post(
                "/api/v1/milkentry",
                Some(&token),
                json!({"customerId": asha, "date": date, "session": session, "liters": liters, "fat": fat}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let (status, body) = app.get(&format!("/api/v1/milkentry/{}", ids[1]), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 40.0);
    assert_eq!(body["data"]["customerName"], "Asha");

    let (status, body) = app
        .get("/api/v1/milkentry/entries?date=2024-03-02", &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let uri = format!(
        "/api/v1/milkentry/summary/weekly?customerId={asha}&startDate=2024-03-02&endDate=2024-03-08T23:59:59.999Z"
    );
    let (status, body) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    let daily = body["data"]["daily"].as_array().unwrap();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0]["day"], "2024-03-02");
    assert_eq!(daily[0]["totalAmount"], 64.0);
    assert_eq!(daily[0]["entries"].as_array().unwrap().len(), 2);
    assert_eq!(daily[1]["totalAmount"], 36.0);
    assert_eq!(body["data"]["weeklyTotal"]["amount"], 100.0);
    assert_eq!(body["data"]["weeklyTotal"]["liters"], 12.0);

    // Amount follows the customer's current rate when liters change
    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/v1/milkentry/{}", ids[1]),
            Some(&token),
            Some(json!({"liters": 10.0})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 80.0);
    assert_eq!(body["data"]["fat"], 4.0);

    let (status, _) = app
        .call(Method::DELETE, &format!("/api/v1/milkentry/{}", ids[0]), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&format!("/api/v1/milkentry/{}", ids[0]), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), 4001);

    let (status, body) = app.get("/api/v1/milkentry/summary/weekly", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "customerId");
}

#[tokio::test]
async fn weekly_payouts_for_current_week() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let asha = app.create_customer(&token, "Asha", "9800000001", 2.0).await;
    let ravi = app.create_customer(&token, "Ravi", "9800000002", 1.0).await;

    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    for (customer, liters) in [(&asha, 5.0), (&asha, 3.0), (&ravi, 10.0)] {
        let (status, _) = app
            .post(
                "/api/v1/milkentry",
                Some(&token),
                json!({"customerId": customer, "date": today, "session": "morning", "liters": liters, "fat": 4.0}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/v1/milkentry/all-weekly-payouts", &token).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let asha_row = rows.iter().find(|r| r["customerId"] == asha.as_str()).unwrap();
    assert_eq!(asha_row["customerName"], "Asha");
    assert_eq!(asha_row["totalAmount"], 64.0);
    assert_eq!(asha_row["profit"], 64.0);
    assert!(asha_row["weekRange"].as_str().unwrap().contains(" to "));

    let ravi_row = rows.iter().find(|r| r["customerId"] == ravi.as_str()).unwrap();
    assert_eq!(ravi_row["totalAmount"], 40.0);

    // Deleting a customer leaves an unresolved row
    let (status, _) = app
        .call(Method::DELETE, &format!("/api/v1/customers/{ravi}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/v1/milkentry/all-weekly-payouts", &token).await;
    let rows = body["data"].as_array().unwrap();
    let orphan = rows.iter().find(|r| r["customerId"] == ravi.as_str()).unwrap();
    assert!(orphan["customerName"].is_null());
}

#[tokio::test]
async fn customers_only_see_their_own_data() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let asha = app.create_customer(&token, "Asha", "9800000001", 2.0).await;
    let ravi = app.create_customer(&token, "Ravi", "9800000002", 1.0).await;

    let (status, body) = app
        .post("/api/v1/users/login-customer", None, json!({"mobile": "0000"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), 3001);

    let (status, body) = app
        .post("/api/v1/users/login-customer", None, json!({"mobile": "9800000001"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "customer");
    let customer_token = body["data"]["accessToken"].as_str().unwrap().to_string();

    let (status, _) = app
        .get(
            &format!("/api/v1/milkentry/customer-milk-entry?customerId={asha}"),
            &customer_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(
            &format!("/api/v1/milkentry/summary/weekly?customerId={ravi}"),
            &customer_token,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 2003);

    let (status, body) = app.get("/api/v1/milkentry", &customer_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 2002);

    let (status, _) = app.get("/api/v1/customers", &customer_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn refresh_token_rotation_and_logout() {
    let app = TestApp::new().await;
    app.admin_token().await;

    let (_, body) = app
        .post(
            "/api/v1/users/login",
            None,
            json!({"username": "owner", "password": "pass-1234"}),
        )
        .await;
    let access = body["data"]["accessToken"].as_str().unwrap().to_string();
    let refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();

    let (status, body) = app.post("/api/v1/users/refresh-token", None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1005);

    // A refresh token is not an access token
    let (status, _) = app.get("/api/v1/users/me", &refresh).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Tokens issued within the same second are identical
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, body) = app
        .post("/api/v1/users/refresh-token", None, json!({"refreshToken": refresh}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let rotated = body["data"]["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // The previous refresh token is no longer held by the account
    let (status, body) = app
        .post("/api/v1/users/refresh-token", None, json!({"refreshToken": refresh}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 1006);

    let (status, _) = app.post("/api/v1/users/logout", Some(&access), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/api/v1/users/refresh-token", None, json!({"refreshToken": rotated}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn change_password() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/v1/users/change-password",
            Some(&token),
            json!({"currentPassword": "pass-1234", "newPassword": "pass-1234"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), 1008);

    let (status, body) = app
        .post(
            "/api/v1/users/change-password",
            Some(&token),
            json!({"currentPassword": "nope", "newPassword": "pass-5678"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1009);

    let (status, _) = app
        .post(
            "/api/v1/users/change-password",
            Some(&token),
            json!({"currentPassword": "pass-1234", "newPassword": "pass-5678"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/api/v1/users/login",
            None,
            json!({"username": "owner", "password": "pass-5678"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
