//! End-to-end HTTP flows against the in-process router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use stockroom_admin::services::assistant::SALES_REPLY;
use stockroom_integration_tests::TestConsole;

#[tokio::test]
async fn test_health_is_outside_the_gate() {
    let mut console = TestConsole::new();
    let response = console.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_anonymous_products_returns_after_login() {
    let mut console = TestConsole::new();

    let response = console.get("/products").await;
    assert!(response.redirects_to("/login"), "{response:?}");

    let response = console.get("/login").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("admin@inventory.com"));

    let response = console.login("admin@inventory.com").await;
    assert!(response.redirects_to("/products"), "{response:?}");

    let response = console.get("/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Wireless Headphones"));
    assert!(response.body.contains("Low stock alert"));
    assert!(response.body.contains("Coffee Mug"));
}

#[tokio::test]
async fn test_root_redirects_by_session() {
    let mut console = TestConsole::new();
    assert!(console.get("/").await.redirects_to("/login"));

    console.login("cashier@inventory.com").await;
    assert!(console.get("/").await.redirects_to("/dashboard"));
    assert!(console.get("/login").await.redirects_to("/dashboard"));

    let dashboard = console.get("/dashboard").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains("Welcome back, Cashier User!"));
}

#[tokio::test]
async fn test_login_without_return_path_lands_on_dashboard() {
    let mut console = TestConsole::new();
    let response = console.login("assistant@inventory.com").await;
    assert!(response.redirects_to("/dashboard"), "{response:?}");
}

#[tokio::test]
async fn test_bad_credentials_stay_on_login() {
    let mut console = TestConsole::new();

    let response = console
        .post_form(
            "/login",
            &[("email", "admin@inventory.com"), ("password", "password124")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Invalid email or password"));

    let response = console
        .post_form("/login", &[("email", "admin@inventory.com"), ("password", "short")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Password must be at least 6 characters"));

    assert!(console.get("/dashboard").await.redirects_to("/login"));
}

#[tokio::test]
async fn test_cashier_is_forbidden_from_admin_pages() {
    let mut console = TestConsole::new();
    console.login("cashier@inventory.com").await;

    let response = console.get("/users").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.contains("Access denied"));

    let response = console
        .post_form("/products/1/delete", &[])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let sales = console.get("/sales").await;
    assert_eq!(sales.status, StatusCode::OK);
    assert!(sales.body.contains("Wireless Headphones"));
    assert!(!sales.body.contains("href=\"/users\""));
}

#[tokio::test]
async fn test_api_gate_uses_status_codes() {
    let mut console = TestConsole::new();
    let response = console
        .post_json("/api/assistant/messages", &json!({ "content": "hi" }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_assistant_round_trip() {
    let mut console = TestConsole::new();
    console.login("cashier@inventory.com").await;

    let page = console.get("/assistant").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Hello Cashier User!"));

    let response = console
        .post_json("/api/assistant/messages", &json!({ "content": "Tell me about sales" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["human"]["sender"], "human");
    assert_eq!(body["human"]["content"], "Tell me about sales");
    assert_eq!(body["reply"]["sender"], "responder");
    assert_eq!(body["reply"]["content"], SALES_REPLY);

    let page = console.get("/assistant").await;
    assert!(page.body.contains("Tell me about sales"));

    let response = console
        .post_json("/api/assistant/messages", &json!({ "content": "   " }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assistant_reset_starts_over() {
    let mut console = TestConsole::new();
    console.login("admin@inventory.com").await;
    console
        .post_json("/api/assistant/messages", &json!({ "content": "stock?" }))
        .await;

    let response = console.post_json("/api/assistant/reset", &json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "responder");
}

#[tokio::test]
async fn test_product_crud() {
    let mut console = TestConsole::new();
    console.login("assistant@inventory.com").await;

    let lamp = [
        ("name", "Desk Lamp"),
        ("description", "LED desk lamp"),
        ("sku", "LAMP-001"),
        ("category", "Home"),
        ("price", "39.99"),
        ("cost", "18.50"),
        ("stock", "12"),
        ("min_stock", "4"),
        ("supplier", "BrightCo"),
    ];
    let response = console.post_form("/products", &lamp).await;
    assert!(response.redirects_to("/products?notice=created"), "{response:?}");

    let listing = console.get("/products?q=lamp").await;
    assert!(listing.body.contains("Desk Lamp"));

    let response = console.post_form("/products", &lamp).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("SKU LAMP-001 is already in use"));

    let response = console.post_form("/products", &[("name", "Nameless")]).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("SKU is required"));

    let response = console.post_form("/products/4/delete", &[]).await;
    assert!(response.redirects_to("/products?notice=deleted"));
    let response = console.post_form("/products/4/delete", &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_management() {
    let mut console = TestConsole::new();
    console.login("admin@inventory.com").await;

    let response = console
        .post_form(
            "/users",
            &[
                ("name", "Sam Stock"),
                ("email", "sam@inventory.com"),
                ("role", "cashier"),
            ],
        )
        .await;
    assert!(response.redirects_to("/users?notice=created"), "{response:?}");

    let listing = console.get("/users?q=sam").await;
    assert!(listing.body.contains("sam@inventory.com"));

    let response = console.post_form("/users/1/delete", &[]).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("you cannot delete your own account"));

    let response = console.post_form("/users/4/delete", &[]).await;
    assert!(response.redirects_to("/users?notice=deleted"));
}

#[tokio::test]
async fn test_settings_update() {
    let mut console = TestConsole::new();
    console.login("admin@inventory.com").await;

    let response = console
        .post_form(
            "/settings",
            &[
                ("company_name", "Acme Stores"),
                ("admin_email", "ops@acme.io"),
                ("low_stock_threshold", "8"),
                ("email_notifications", "on"),
                ("backup_frequency", "weekly"),
            ],
        )
        .await;
    assert!(response.redirects_to("/settings?notice=saved"), "{response:?}");

    let page = console.get("/settings").await;
    assert!(page.body.contains("Acme Stores"));
    assert!(page.body.contains("ops@acme.io"));
    assert_eq!(
        console.state.store().settings.read().await.low_stock_threshold,
        8
    );

    let response = console
        .post_form("/settings", &[("company_name", ""), ("admin_email", "nope")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Company name is required"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let mut console = TestConsole::new();
    console.login("admin@inventory.com").await;
    assert_eq!(console.get("/dashboard").await.status, StatusCode::OK);

    let response = console.post_form("/logout", &[]).await;
    assert!(response.redirects_to("/login?notice=signed_out"));
    assert!(console.get("/dashboard").await.redirects_to("/login"));

    let login = console.get("/login?notice=signed_out").await;
    assert!(login.body.contains("You have been signed out."));
}

#[tokio::test]
async fn test_theme_toggle_stays_local() {
    let mut console = TestConsole::new();
    console.login("admin@inventory.com").await;

    let response = console
        .post_form("/preferences/theme", &[("return_to", "/analytics")])
        .await;
    assert!(response.redirects_to("/analytics"));
    assert!(console.get("/analytics").await.body.contains("theme-dark"));

    let response = console
        .post_form("/preferences/theme", &[("return_to", "//evil.example")])
        .await;
    assert!(response.redirects_to("/dashboard"));
    assert!(console.get("/dashboard").await.body.contains("theme-light"));
}

#[tokio::test]
async fn test_browsers_have_separate_sessions() {
    let mut first = TestConsole::new();
    first.login("admin@inventory.com").await;

    let mut second = first.another_browser();
    assert!(second.get("/dashboard").await.redirects_to("/login"));
    assert_eq!(first.get("/dashboard").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let mut console = TestConsole::new();
    let response = console.get("/warehouse").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("/warehouse"));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let mut console = TestConsole::new();
    let response = console.get("/static/admin.css").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("theme-dark"));
}

#[tokio::test]
async fn test_user_edits_apply_to_sign_in() {
    let mut admin = TestConsole::new();
    admin.login("admin@inventory.com").await;

    let response = admin
        .post_form(
            "/users/2",
            &[
                ("name", "Assistant User"),
                ("email", "assistant@inventory.com"),
                ("role", "cashier"),
            ],
        )
        .await;
    assert!(response.redirects_to("/users?notice=updated"), "{response:?}");

    let mut demoted = admin.another_browser();
    assert!(demoted.login("assistant@inventory.com").await.redirects_to("/dashboard"));
    assert_eq!(demoted.get("/products").await.status, StatusCode::FORBIDDEN);

    admin.post_form("/users/3/delete", &[]).await;
    let mut removed = admin.another_browser();
    let response = removed.login("cashier@inventory.com").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let login = removed.get("/login").await;
    assert!(!login.body.contains("cashier@inventory.com"));
}
