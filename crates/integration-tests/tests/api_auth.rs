use axum::http::StatusCode;
use integration_tests::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn signup_then_signin_round_trip() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "  Admin@RightPool.test ", "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["user"]["email"], ADMIN_EMAIL);
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let token = body["token"].as_str().unwrap();
    let (status, _) = app.get("/api/dashboard/stats", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = TestApp::new();
    app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": ADMIN_EMAIL.to_uppercase(), "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/auth/signup", None, json!({ "email": ADMIN_EMAIL, "password": "short" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 8 characters long");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_identical() {
    let app = TestApp::new();
    app.admin_token().await;

    let (wrong_status, wrong_body) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": ADMIN_EMAIL, "password": "not-the-password" }),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": "nobody@rightpool.test", "password": ADMIN_PASSWORD }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Incorrect email or password");
}

#[tokio::test]
async fn signin_requires_both_fields() {
    let app = TestApp::new();
    let (status, body) = app.post("/api/auth/signin", None, json!({ "email": ADMIN_EMAIL })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide email and password!");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/applications", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token. Please log in again!");
}

#[tokio::test]
async fn logout_is_public_and_stateless() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app.post("/api/auth/logout", None, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully. Please clear your token.");

    let (status, _) = app.get("/api/applications", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn change_password_swaps_credentials() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .patch(
            "/api/auth/change-password",
            Some(&token),
            json!({ "oldPassword": "wrong-old-password", "newPassword": "another-long-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Your current password is wrong");

    let (status, body) = app
        .patch(
            "/api/auth/change-password",
            Some(&token),
            json!({ "oldPassword": ADMIN_PASSWORD, "newPassword": "another-long-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully!");
    assert!(body["token"].is_string());

    let (status, _) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": ADMIN_EMAIL, "password": "another-long-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn change_password_requires_a_token() {
    let app = TestApp::new();
    let (status, body) = app
        .patch(
            "/api/auth/change-password",
            None,
            json!({ "oldPassword": ADMIN_PASSWORD, "newPassword": "another-long-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "You are not logged in! Please log in to get access.");
}
