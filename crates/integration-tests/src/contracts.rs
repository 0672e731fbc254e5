//! Behaviour every repository implementation must share. Each suite drives a
//! fresh store through the port traits only; `tests/port_contracts.rs` runs
//! them against the in-memory adapters and `tests/postgres_contracts.rs`
//! against a throwaway Postgres.

use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};
use domains::{
    clock, Account, AccountRepository, Application, ApplicationCount, ApplicationFilter,
    ApplicationInput, ApplicationRepository, ApplicationStatus, DomainError, OpportunityCount,
    OpportunityQuery, OpportunityRepository, OpportunityStatus, TimeWindow,
};
use uuid::Uuid;

use crate::opportunity;

fn application(opportunity_id: Uuid, at: DateTime<Utc>) -> Application {
    ApplicationInput {
        opportunity_id: Some(opportunity_id.to_string()),
        full_name: Some("Jane Doe".into()),
        email: Some("jane@example.com".into()),
        phone: Some("+254700000000".into()),
        resume_url: Some("https://assets.example.com/resumes/jane.pdf".into()),
        cover_letter: None,
    }
    .into_application(opportunity_id, at)
    .expect("fixture application is valid")
}

pub async fn account_contract(repo: Arc<dyn AccountRepository>) {
    let now = clock::now();
    let account = repo
        .insert(Account::new("ops@rightpool.test".into(), "$argon2id$stub".into(), now))
        .await
        .unwrap();

    let again = repo
        .insert(Account::new("ops@rightpool.test".into(), "$argon2id$other".into(), now))
        .await;
    assert!(matches!(again, Err(DomainError::Conflict(_))));

    let found = repo.find_by_email("ops@rightpool.test").await.unwrap().unwrap();
    assert_eq!(found, account);

    let later = now + Duration::seconds(5);
    let updated = repo
        .set_password_hash(account.id, "$argon2id$rotated".into(), later)
        .await
        .unwrap();
    assert_eq!(updated.password_hash, "$argon2id$rotated");
    assert_eq!(updated.updated_at, later);
    assert_eq!(repo.find_by_id(account.id).await.unwrap(), Some(updated));
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

/// Whatever `insert` hands back is exactly what a later read returns, even
/// when the caller's timestamps carry nanoseconds.
pub async fn account_insert_matches_read(repo: Arc<dyn AccountRepository>) {
    let raw = Utc::now().with_nanosecond(123_456_789).unwrap_or_else(Utc::now);
    let stored = repo
        .insert(Account::new("clock@rightpool.test".into(), "$argon2id$stub".into(), raw))
        .await
        .unwrap();
    assert_eq!(repo.find_by_id(stored.id).await.unwrap(), Some(stored));
}

pub async fn opportunity_contract(repo: Arc<dyn OpportunityRepository>) {
    let now = clock::now();
    let live = repo
        .insert(opportunity("Live", OpportunityStatus::Active, now + Duration::days(3), now))
        .await
        .unwrap();
    let draft = repo
        .insert(opportunity(
            "Draft",
            OpportunityStatus::Draft,
            now + Duration::days(3),
            now - Duration::days(1),
        ))
        .await
        .unwrap();

    let listed = repo.list(&OpportunityQuery::default()).await.unwrap();
    assert_eq!(listed, [live.clone(), draft.clone()]);

    let live_count = OpportunityCount {
        status: Some(OpportunityStatus::Active),
        deadline: Some(TimeWindow::since(now)),
        created: None,
    };
    assert_eq!(repo.count(&live_count).await.unwrap(), 1);
    assert_eq!(repo.count(&OpportunityCount::default()).await.unwrap(), 2);

    let many = repo.find_many(&[draft.id, Uuid::new_v4()]).await.unwrap();
    assert_eq!(many, [draft.clone()]);

    let mut renamed = draft.clone();
    renamed.title = "Renamed".into();
    assert_eq!(repo.replace(renamed).await.unwrap().unwrap().title, "Renamed");

    assert!(repo.delete(draft.id).await.unwrap());
    assert!(!repo.delete(draft.id).await.unwrap());
    assert!(repo.replace(draft).await.unwrap().is_none());
}

pub async fn opportunity_insert_matches_read(repo: Arc<dyn OpportunityRepository>) {
    let raw = Utc::now().with_nanosecond(987_654_321).unwrap_or_else(Utc::now);
    let stored = repo
        .insert(opportunity("Clocked", OpportunityStatus::Active, raw + Duration::days(7), raw))
        .await
        .unwrap();
    assert_eq!(repo.find_by_id(stored.id).await.unwrap(), Some(stored));
}

pub async fn application_contract(repo: Arc<dyn ApplicationRepository>) {
    let now = clock::now();
    let opportunity_id = Uuid::new_v4();
    let stored = repo.insert(application(opportunity_id, now)).await.unwrap();

    let noted = repo
        .update_status(stored.id, ApplicationStatus::Reviewed, Some("Call back".into()), now)
        .await
        .unwrap()
        .unwrap();
    let kept = repo
        .update_status(stored.id, ApplicationStatus::Contacted, None, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(noted.admin_notes, kept.admin_notes);
    assert_eq!(kept.status, ApplicationStatus::Contacted);

    let filter = ApplicationFilter { status: Some(ApplicationStatus::Contacted), opportunity_id: None };
    assert_eq!(repo.list(&filter).await.unwrap(), [kept]);
    assert_eq!(
        repo.count(&ApplicationCount::for_opportunity(opportunity_id)).await.unwrap(),
        1
    );
    assert!(repo
        .update_status(Uuid::new_v4(), ApplicationStatus::New, None, now)
        .await
        .unwrap()
        .is_none());
}

pub async fn application_insert_matches_read(repo: Arc<dyn ApplicationRepository>) {
    let raw = Utc::now().with_nanosecond(555_555_555).unwrap_or_else(Utc::now);
    let opportunity_id = Uuid::new_v4();
    let stored = repo.insert(application(opportunity_id, raw)).await.unwrap();
    let filter = ApplicationFilter { status: None, opportunity_id: Some(opportunity_id) };
    assert_eq!(repo.list(&filter).await.unwrap(), [stored]);
}
