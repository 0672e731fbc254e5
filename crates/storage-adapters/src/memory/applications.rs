use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use domains::{
    Application, ApplicationCount, ApplicationFilter, ApplicationRepository, ApplicationStatus,
    DomainResult,
};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryApplicationRepository {
    applications: DashMap<Uuid, Application>,
}

impl MemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationRepository for MemoryApplicationRepository {
    async fn insert(&self, application: Application) -> DomainResult<Application> {
        self.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn list(&self, filter: &ApplicationFilter) -> DomainResult<Vec<Application>> {
        let mut matched: Vec<_> = self
            .applications
            .iter()
            .filter(|a| filter.matches(a.value()))
            .map(|a| a.value().clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        admin_notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Option<Application>> {
        Ok(self.applications.get_mut(&id).map(|mut application| {
            application.status = status;
            if let Some(notes) = admin_notes {
                application.admin_notes = Some(notes);
            }
            application.updated_at = updated_at;
            application.clone()
        }))
    }

    async fn count(&self, predicate: &ApplicationCount) -> DomainResult<u64> {
        Ok(self
            .applications
            .iter()
            .filter(|a| predicate.matches(a.value()))
            .count() as u64)
    }
}
