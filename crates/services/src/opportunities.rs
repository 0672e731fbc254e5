use std::sync::Arc;

use domains::{
    clock, DomainError, DomainResult, Opportunity, OpportunityInput, OpportunityQuery,
    OpportunityRepository,
};
use tracing::info;

use crate::parse_id;

pub const OPPORTUNITY_NOT_FOUND: &str = "No opportunity found with that ID";

#[derive(Clone)]
pub struct OpportunityService {
    opportunities: Arc<dyn OpportunityRepository>,
}

impl OpportunityService {
    pub fn new(opportunities: Arc<dyn OpportunityRepository>) -> Self {
        Self { opportunities }
    }

    pub async fn list(&self, query: &OpportunityQuery) -> DomainResult<Vec<Opportunity>> {
        self.opportunities.list(query).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Opportunity> {
        let id = parse_id(id, OPPORTUNITY_NOT_FOUND)?;
        self.opportunities
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(OPPORTUNITY_NOT_FOUND))
    }

    pub async fn create(&self, input: OpportunityInput) -> DomainResult<Opportunity> {
        let opportunity = input.create(clock::now())?;
        let opportunity = self.opportunities.insert(opportunity).await?;
        info!(opportunity_id = %opportunity.id, title = %opportunity.title, "opportunity created");
        Ok(opportunity)
    }

    /// Applies only the supplied fields, then re-validates the merged record.
    pub async fn update(&self, id: &str, patch: OpportunityInput) -> DomainResult<Opportunity> {
        let existing = self.get(id).await?;
        let merged = patch.merge_into(&existing, clock::now())?;
        let updated = self
            .opportunities
            .replace(merged)
            .await?
            .ok_or_else(|| DomainError::not_found(OPPORTUNITY_NOT_FOUND))?;
        info!(opportunity_id = %updated.id, status = %updated.status, "opportunity updated");
        Ok(updated)
    }

    /// Hard delete. Applications that reference the posting are left alone.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let id = parse_id(id, OPPORTUNITY_NOT_FOUND)?;
        if !self.opportunities.delete(id).await? {
            return Err(DomainError::not_found(OPPORTUNITY_NOT_FOUND));
        }
        info!(opportunity_id = %id, "opportunity deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::MockOpportunityRepository;

    fn input() -> OpportunityInput {
        OpportunityInput {
            title: Some("Data Analyst".into()),
            company: Some("Acme".into()),
            location: Some("Kampala".into()),
            opp_type: Some("Internship".into()),
            work_type: Some("Hybrid".into()),
            industry: Some("Finance".into()),
            deadline: Some("2031-03-01".into()),
            description: Some("Crunch numbers".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn malformed_id_is_not_found_without_touching_the_store() {
        let mut repo = MockOpportunityRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_delete().never();
        let service = OpportunityService::new(Arc::new(repo));

        assert_eq!(
            service.get("42").await.unwrap_err(),
            DomainError::not_found(OPPORTUNITY_NOT_FOUND)
        );
        assert_eq!(
            service.delete("not-a-uuid").await.unwrap_err(),
            DomainError::not_found(OPPORTUNITY_NOT_FOUND)
        );
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_the_store() {
        let mut repo = MockOpportunityRepository::new();
        repo.expect_insert().never();
        let service = OpportunityService::new(Arc::new(repo));

        let bad = OpportunityInput { opp_type: Some("Gig".into()), ..input() };
        assert!(matches!(service.create(bad).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let mut repo = MockOpportunityRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_replace().never();
        let service = OpportunityService::new(Arc::new(repo));

        let id = uuid::Uuid::new_v4().to_string();
        let err = service.update(&id, OpportunityInput::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_persists_merged_record() {
        let existing = input().create(Utc::now()).unwrap();
        let id = existing.id;
        let mut repo = MockOpportunityRepository::new();
        let stored = existing.clone();
        repo.expect_find_by_id().returning(move |_| Ok(Some(stored.clone())));
        repo.expect_replace()
            .withf(move |o| o.id == id && o.salary == "USD 900" && o.title == "Data Analyst")
            .returning(|o| Ok(Some(o)));
        let service = OpportunityService::new(Arc::new(repo));

        let patch = OpportunityInput { salary: Some("USD 900".into()), ..Default::default() };
        let updated = service.update(&id.to_string(), patch).await.unwrap();
        assert_eq!(updated.salary, "USD 900");
    }
}
