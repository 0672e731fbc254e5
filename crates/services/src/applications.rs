use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use domains::{
    clock, Application, ApplicationFilter, ApplicationInput, ApplicationListing, ApplicationRepository,
    DomainError, DomainResult, OpportunityRepository, OpportunitySummary, StatusUpdate,
};
use tracing::{debug, info};

use crate::parse_id;

pub const OPPORTUNITY_MISSING: &str = "The job you are applying for does not exist.";
pub const APPLICATION_NOT_FOUND: &str = "No application found with that ID";

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    opportunities: Arc<dyn OpportunityRepository>,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        opportunities: Arc<dyn OpportunityRepository>,
    ) -> Self {
        Self { applications, opportunities }
    }

    /// Resolves the opportunity first, so nothing is written for a posting
    /// that does not exist. The check is advisory: a delete racing the insert
    /// can still orphan the new record.
    pub async fn submit(&self, input: ApplicationInput) -> DomainResult<Application> {
        let opportunity_id = input
            .opportunity_ref()
            .ok_or_else(|| DomainError::not_found(OPPORTUNITY_MISSING))?;
        if self.opportunities.find_by_id(opportunity_id).await?.is_none() {
            return Err(DomainError::not_found(OPPORTUNITY_MISSING));
        }

        let application = input.into_application(opportunity_id, clock::now())?;
        let application = self.applications.insert(application).await?;
        info!(
            application_id = %application.id,
            opportunity_id = %opportunity_id,
            "application submitted"
        );
        Ok(application)
    }

    /// Newest first, each joined with its opportunity's title and company.
    /// Applications whose opportunity was deleted get a placeholder summary.
    pub async fn list(&self, filter: &ApplicationFilter) -> DomainResult<Vec<ApplicationListing>> {
        let applications = self.applications.list(filter).await?;

        let ids: Vec<_> = applications
            .iter()
            .map(|a| a.opportunity_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let summaries: HashMap<_, _> = self
            .opportunities
            .find_many(&ids)
            .await?
            .iter()
            .map(|o| (o.id, OpportunitySummary::of(o)))
            .collect();

        let listings: Vec<_> = applications
            .into_iter()
            .map(|application| {
                let opportunity = summaries
                    .get(&application.opportunity_id)
                    .cloned()
                    .unwrap_or_else(|| OpportunitySummary::missing(application.opportunity_id));
                ApplicationListing { application, opportunity }
            })
            .collect();

        let orphaned = listings.iter().filter(|l| l.opportunity.orphaned).count();
        if orphaned > 0 {
            debug!(orphaned, "applications reference deleted opportunities");
        }
        Ok(listings)
    }

    /// Any status may follow any other.
    pub async fn update_status(&self, id: &str, update: StatusUpdate) -> DomainResult<Application> {
        let id = parse_id(id, APPLICATION_NOT_FOUND)?;
        let (status, admin_notes) = update.parse()?;
        let application = self
            .applications
            .update_status(id, status, admin_notes, clock::now())
            .await?
            .ok_or_else(|| DomainError::not_found(APPLICATION_NOT_FOUND))?;
        info!(application_id = %id, status = %status, "application status updated");
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{
        ApplicationStatus, MockApplicationRepository, MockOpportunityRepository, OpportunityInput,
    };
    use uuid::Uuid;

    fn application_input(opportunity_id: &str) -> ApplicationInput {
        ApplicationInput {
            opportunity_id: Some(opportunity_id.to_string()),
            full_name: Some("Amina K".into()),
            email: Some("amina@example.com".into()),
            phone: Some("0700 000 000".into()),
            resume_url: Some("https://res.cloudinary.com/demo/raw/upload/cv.pdf".into()),
            cover_letter: None,
        }
    }

    #[tokio::test]
    async fn submit_against_missing_opportunity_writes_nothing() {
        let mut opportunities = MockOpportunityRepository::new();
        opportunities.expect_find_by_id().returning(|_| Ok(None));
        let mut applications = MockApplicationRepository::new();
        applications.expect_insert().never();

        let service = ApplicationService::new(Arc::new(applications), Arc::new(opportunities));
        let err = service
            .submit(application_input(&Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found(OPPORTUNITY_MISSING));
    }

    #[tokio::test]
    async fn submit_with_malformed_reference_is_not_found() {
        let mut opportunities = MockOpportunityRepository::new();
        opportunities.expect_find_by_id().never();
        let service = ApplicationService::new(
            Arc::new(MockApplicationRepository::new()),
            Arc::new(opportunities),
        );
        let err = service.submit(application_input("abc")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_tolerates_deleted_opportunities() {
        let live = OpportunityInput {
            title: Some("Grant Writer".into()),
            company: Some("Fund".into()),
            location: Some("Remote".into()),
            opp_type: Some("Consultancy".into()),
            work_type: Some("Remote".into()),
            industry: Some("NGO".into()),
            deadline: Some("2032-01-01".into()),
            description: Some("Write grants".into()),
            ..Default::default()
        }
        .create(Utc::now())
        .unwrap();
        let gone = Uuid::new_v4();

        let live_app = application_input(&live.id.to_string())
            .into_application(live.id, Utc::now())
            .unwrap();
        let orphan_app = application_input(&gone.to_string())
            .into_application(gone, Utc::now())
            .unwrap();

        let mut applications = MockApplicationRepository::new();
        let rows = vec![orphan_app.clone(), live_app.clone()];
        applications.expect_list().returning(move |_| Ok(rows.clone()));
        let mut opportunities = MockOpportunityRepository::new();
        let found = live.clone();
        opportunities
            .expect_find_many()
            .returning(move |_| Ok(vec![found.clone()]));

        let service = ApplicationService::new(Arc::new(applications), Arc::new(opportunities));
        let listings = service.list(&ApplicationFilter::default()).await.unwrap();

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].application.id, orphan_app.id);
        assert!(listings[0].opportunity.orphaned);
        assert_eq!(listings[1].opportunity.title, "Grant Writer");
        assert!(!listings[1].opportunity.orphaned);
    }

    #[tokio::test]
    async fn update_status_validates_before_writing() {
        let mut applications = MockApplicationRepository::new();
        applications.expect_update_status().never();
        let service = ApplicationService::new(
            Arc::new(applications),
            Arc::new(MockOpportunityRepository::new()),
        );
        let err = service
            .update_status(
                &Uuid::new_v4().to_string(),
                StatusUpdate { status: Some("Hired".into()), admin_notes: None },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_status_of_missing_application() {
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_update_status()
            .returning(|_, _, _, _| Ok(None));
        let service = ApplicationService::new(
            Arc::new(applications),
            Arc::new(MockOpportunityRepository::new()),
        );
        let err = service
            .update_status(
                &Uuid::new_v4().to_string(),
                StatusUpdate { status: Some(ApplicationStatus::Contacted.to_string()), admin_notes: None },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found(APPLICATION_NOT_FOUND));
    }
}
