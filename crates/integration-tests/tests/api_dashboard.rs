use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use domains::{ApplicationInput, ApplicationRepository, OpportunityRepository, OpportunityStatus};
use integration_tests::{opportunity, TestApp};
use uuid::Uuid;

async fn apply(app: &TestApp, opportunity_id: Uuid, at: DateTime<Utc>) {
    let application = ApplicationInput {
        opportunity_id: Some(opportunity_id.to_string()),
        full_name: Some("Jane Doe".into()),
        email: Some("jane@example.com".into()),
        phone: Some("+254700000000".into()),
        resume_url: Some("https://assets.example.com/resumes/jane.pdf".into()),
        cover_letter: None,
    }
    .into_application(opportunity_id, at)
    .unwrap();
    app.applications.insert(application).await.unwrap();
}

#[tokio::test]
async fn dashboard_requires_a_token() {
    let app = TestApp::new();
    for uri in ["/api/dashboard/stats", "/api/dashboard/recent-opportunities"] {
        let (status, _) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn empty_store_reports_flat_trends() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app.get("/api/dashboard/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"]["stats"];
    assert_eq!(stats["totalOpportunities"], 0);
    assert_eq!(stats["trends"]["opportunities"]["change"], "0.0%");
    assert_eq!(stats["trends"]["applicants"]["direction"], "neutral");
}

#[tokio::test]
async fn expired_active_postings_are_not_counted_as_live() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let now = Utc::now();
    let created = now - Duration::days(2);

    let closing = app
        .opportunities
        .insert(opportunity("Closing", OpportunityStatus::Active, now + Duration::days(3), created))
        .await
        .unwrap();
    for (title, status, deadline) in [
        ("Open", OpportunityStatus::Active, now + Duration::days(20)),
        ("Lapsed", OpportunityStatus::Active, now - Duration::days(1)),
        ("Shut", OpportunityStatus::Closed, now + Duration::days(3)),
    ] {
        app.opportunities
            .insert(opportunity(title, status, deadline, created))
            .await
            .unwrap();
    }
    apply(&app, closing.id, now - Duration::days(1)).await;
    apply(&app, closing.id, now - Duration::days(40)).await;
    apply(&app, closing.id, now - Duration::days(45)).await;

    let (status, body) = app.get("/api/dashboard/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"]["stats"];
    assert_eq!(stats["totalOpportunities"], 4);
    assert_eq!(stats["totalApplicants"], 3);
    assert_eq!(stats["activeNow"], 2);
    assert_eq!(stats["closingSoon"], 1);
    assert_eq!(stats["trends"]["opportunities"]["change"], "+100.0%");
    assert_eq!(stats["trends"]["applicants"]["current"], 1);
    assert_eq!(stats["trends"]["applicants"]["previous"], 2);
    assert_eq!(stats["trends"]["applicants"]["change"], "-50.0%");

    let cards = body["data"]["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[3]["label"], "Closing Soon");
    assert_eq!(cards[3]["change"], "-1");
    assert_eq!(cards[3]["trend"], "down");
}

#[tokio::test]
async fn recent_returns_newest_with_live_counts() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let now = Utc::now();

    let mut ids = Vec::new();
    for hours in 1..=5 {
        let posting = opportunity(
            &format!("Posting {}", hours),
            OpportunityStatus::Active,
            now + Duration::days(30),
            now - Duration::hours(hours),
        );
        ids.push(app.opportunities.insert(posting).await.unwrap().id);
    }
    apply(&app, ids[0], now).await;
    apply(&app, ids[0], now).await;
    apply(&app, ids[1], now).await;
    apply(&app, ids[4], now).await;

    let (status, body) = app
        .get("/api/dashboard/recent-opportunities?limit=2", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], 2);

    let recent = body["data"]["opportunities"].as_array().unwrap();
    assert_eq!(recent[0]["title"], "Posting 1");
    assert_eq!(recent[0]["applicants"], 2);
    assert_eq!(recent[0]["posted"], "1 hour ago");
    assert_eq!(recent[1]["title"], "Posting 2");
    assert_eq!(recent[1]["applicants"], 1);
    assert_eq!(recent[1]["posted"], "2 hours ago");

    apply(&app, ids[1], now).await;
    let (_, body) = app
        .get("/api/dashboard/recent-opportunities?limit=2", Some(&token))
        .await;
    assert_eq!(body["data"]["opportunities"][1]["applicants"], 2);
}

#[tokio::test]
async fn recent_falls_back_to_default_limit() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let now = Utc::now();
    for hours in 1..=7 {
        let posting = opportunity(
            &format!("Posting {}", hours),
            OpportunityStatus::Active,
            now + Duration::days(30),
            now - Duration::hours(hours),
        );
        app.opportunities.insert(posting).await.unwrap();
    }

    for query in ["", "?limit=abc", "?limit=0", "?limit=-4"] {
        let (status, body) = app
            .get(&format!("/api/dashboard/recent-opportunities{}", query), Some(&token))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], 5, "query {:?}", query);
    }
}
