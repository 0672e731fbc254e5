use async_trait::async_trait;
use dashmap::DashMap;
use domains::{
    DomainResult, Opportunity, OpportunityCount, OpportunityQuery, OpportunityRepository,
};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryOpportunityRepository {
    opportunities: DashMap<Uuid, Opportunity>,
}

impl MemoryOpportunityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OpportunityRepository for MemoryOpportunityRepository {
    async fn list(&self, query: &OpportunityQuery) -> DomainResult<Vec<Opportunity>> {
        let mut matched: Vec<_> = self
            .opportunities
            .iter()
            .filter(|o| query.filter.matches(o.value()))
            .map(|o| o.value().clone())
            .collect();
        query.arrange(&mut matched);
        Ok(matched)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Opportunity>> {
        Ok(self.opportunities.get(&id).map(|o| o.clone()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> DomainResult<Vec<Opportunity>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.opportunities.get(id).map(|o| o.clone()))
            .collect())
    }

    async fn insert(&self, opportunity: Opportunity) -> DomainResult<Opportunity> {
        self.opportunities.insert(opportunity.id, opportunity.clone());
        Ok(opportunity)
    }

    async fn replace(&self, opportunity: Opportunity) -> DomainResult<Option<Opportunity>> {
        Ok(self.opportunities.get_mut(&opportunity.id).map(|mut slot| {
            *slot = opportunity.clone();
            opportunity
        }))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.opportunities.remove(&id).is_some())
    }

    async fn count(&self, predicate: &OpportunityCount) -> DomainResult<u64> {
        Ok(self
            .opportunities
            .iter()
            .filter(|o| predicate.matches(o.value()))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domains::{OpportunityInput, OpportunityStatus, TimeWindow};

    fn posting(title: &str, age_days: i64, deadline: &str) -> Opportunity {
        OpportunityInput {
            title: Some(title.into()),
            company: Some("Acme".into()),
            location: Some("Nairobi".into()),
            opp_type: Some("Job".into()),
            work_type: Some("Remote".into()),
            industry: Some("Tech".into()),
            deadline: Some(deadline.into()),
            description: Some("Build things".into()),
            ..Default::default()
        }
        .create(Utc::now() - Duration::days(age_days))
        .unwrap()
    }

    #[tokio::test]
    async fn list_filters_sorts_and_pages() {
        let repo = MemoryOpportunityRepository::new();
        for (title, age) in [("a", 3), ("b", 1), ("c", 2)] {
            repo.insert(posting(title, age, "2035-01-01")).await.unwrap();
        }

        let newest: Vec<_> = repo
            .list(&OpportunityQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.title)
            .collect();
        assert_eq!(newest, ["b", "c", "a"]);

        let query = OpportunityQuery::from_params([("sort", "title"), ("page", "2"), ("limit", "2")]).unwrap();
        let page: Vec<_> = repo.list(&query).await.unwrap().into_iter().map(|o| o.title).collect();
        assert_eq!(page, ["c"]);
    }

    #[tokio::test]
    async fn replace_and_delete_report_absence() {
        let repo = MemoryOpportunityRepository::new();
        let ghost = posting("ghost", 0, "2035-01-01");
        assert_eq!(repo.replace(ghost.clone()).await.unwrap(), None);
        assert!(!repo.delete(ghost.id).await.unwrap());

        repo.insert(ghost.clone()).await.unwrap();
        assert!(repo.delete(ghost.id).await.unwrap());
        assert!(repo.find_by_id(ghost.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn count_respects_deadline_window() {
        let repo = MemoryOpportunityRepository::new();
        repo.insert(posting("live", 0, "2035-01-01")).await.unwrap();
        repo.insert(posting("lapsed", 0, "2001-01-01")).await.unwrap();

        let active = OpportunityCount {
            status: Some(OpportunityStatus::Active),
            deadline: Some(TimeWindow::since(Utc::now())),
            created: None,
        };
        assert_eq!(repo.count(&active).await.unwrap(), 1);
        assert_eq!(repo.count(&OpportunityCount::default()).await.unwrap(), 2);
    }
}
