//! Shared fixtures for the end-to-end suites.
//!
//! [`TestApp`] is the full router over the in-memory stores, real Argon2
//! hashing and real JWTs. The stores stay reachable so tests can seed records
//! with controlled timestamps.

use chrono::{DateTime, Utc};
use domains::{Opportunity, OpportunityInput, OpportunityStatus};
use serde_json::{json, Value};

pub mod contracts;

#[cfg(feature = "web-axum")]
pub use http::TestApp;

pub const ADMIN_EMAIL: &str = "admin@rightpool.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// A valid create payload.
pub fn opportunity_body(title: &str) -> Value {
    json!({
        "title": title,
        "company": "Acme Relief",
        "location": "Nairobi",
        "oppType": "Job",
        "workType": "Full Time",
        "industry": "NGO",
        "deadline": "2031-12-31",
        "tags": ["field", "logistics"],
        "description": "Coordinate field logistics."
    })
}

/// A valid public submission against `opportunity_id`.
pub fn application_body(opportunity_id: &str) -> Value {
    json!({
        "opportunityId": opportunity_id,
        "fullName": "Jane Doe",
        "email": "jane@example.com",
        "phone": "+254700000000",
        "resumeUrl": "https://assets.example.com/resumes/jane.pdf",
        "coverLetter": "I would like to help."
    })
}

/// An opportunity with controlled timestamps, for seeding stores directly.
pub fn opportunity(
    title: &str,
    status: OpportunityStatus,
    deadline: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> Opportunity {
    let mut opportunity = OpportunityInput {
        title: Some(title.into()),
        company: Some("Acme Relief".into()),
        location: Some("Nairobi".into()),
        opp_type: Some("Job".into()),
        work_type: Some("Full Time".into()),
        industry: Some("NGO".into()),
        status: Some(status.as_str().into()),
        deadline: Some(deadline.to_rfc3339()),
        description: Some("Coordinate field logistics.".into()),
        ..Default::default()
    }
    .create(created_at)
    .expect("fixture opportunity is valid");
    opportunity.updated_at = created_at;
    opportunity
}

#[cfg(feature = "web-axum")]
mod http {
    use std::sync::Arc;

    use api_adapters::web::{build_router, ApiConfig, AppState, CorsConfig, Ports};
    use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use storage_adapters::{
        MemoryAccountRepository, MemoryApplicationRepository, MemoryOpportunityRepository,
    };
    use tower::ServiceExt;

    use super::{ADMIN_EMAIL, ADMIN_PASSWORD};

    pub struct TestApp {
        pub router: Router,
        pub accounts: Arc<MemoryAccountRepository>,
        pub opportunities: Arc<MemoryOpportunityRepository>,
        pub applications: Arc<MemoryApplicationRepository>,
    }

    impl Default for TestApp {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestApp {
        pub fn new() -> Self {
            let accounts = Arc::new(MemoryAccountRepository::new());
            let opportunities = Arc::new(MemoryOpportunityRepository::new());
            let applications = Arc::new(MemoryApplicationRepository::new());
            let secret = SecretString::from("integration-test-secret-of-decent-length".to_string());

            let state = AppState::new(
                ApiConfig {
                    cors: CorsConfig {
                        allowed_origins: vec!["http://localhost:5173".into()],
                        mirror_any_origin: false,
                    },
                    expose_error_detail: false,
                    service_name: "RightPool".into(),
                },
                Ports {
                    accounts: accounts.clone(),
                    opportunities: opportunities.clone(),
                    applications: applications.clone(),
                    hasher: Arc::new(Argon2PasswordHasher::new()),
                    tokens: Arc::new(JwtTokenService::new(
                        &secret,
                        auth_adapters::jwt::DEFAULT_TOKEN_TTL,
                    )),
                },
            );

            Self {
                router: build_router(state),
                accounts,
                opportunities,
                applications,
            }
        }

        /// Sends one request and returns the status and JSON body (`Null` when
        /// the body is empty).
        pub async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string())),
                None => builder.body(Body::empty()),
            }
            .unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }

        pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            self.send(Method::GET, uri, token, None).await
        }

        pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
            self.send(Method::POST, uri, token, Some(body)).await
        }

        pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
            self.send(Method::PATCH, uri, token, Some(body)).await
        }

        /// Signs up the default admin and returns the issued token.
        pub async fn admin_token(&self) -> String {
            let (status, body) = self
                .post(
                    "/api/auth/signup",
                    None,
                    json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
            body["token"].as_str().unwrap().to_string()
        }

        /// Creates an opportunity through the API and returns its id.
        pub async fn create_opportunity(&self, token: &str, body: Value) -> String {
            let (status, body) = self.post("/api/opportunities", Some(token), body).await;
            assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
            body["data"]["opportunity"]["id"].as_str().unwrap().to_string()
        }
    }
}
